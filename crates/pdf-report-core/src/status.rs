//! Display labels for maintenance item statuses.

/// Signature of the status label function handed to the renderer.
pub type StatusFormatter = fn(&str) -> String;

/// Map a checklist status to the label printed in the report.
///
/// `completed` reads as `YES`, `pending` as `NO`; any other status is shown
/// uppercased.
pub fn format_status(status: &str) -> String {
    match status {
        "completed" => "YES".to_string(),
        "pending" => "NO".to_string(),
        other => other.to_uppercase(),
    }
}
