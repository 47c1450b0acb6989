//! Output naming conventions.
//!
//! Pure string functions. The result ends up in a `Content-Disposition`
//! header, so identifiers are reduced to a header-safe character set.

/// `maintenance_report_<inspection_id>_<YYYYMMDD>.pdf`
pub fn report_pdf(inspection_id: &str, date: &str) -> String {
    format!("maintenance_report_{}_{date}.pdf", header_safe(inspection_id))
}

fn header_safe(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
