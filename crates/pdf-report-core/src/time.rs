//! Local-time stamps printed in the report and its filename.

use jiff::Zoned;

pub const GENERATED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const FILENAME_DATE_FORMAT: &str = "%Y%m%d";

/// `YYYY-MM-DD HH:MM:SS` for the report footer.
pub fn generated_time(now: &Zoned) -> String {
    now.strftime(GENERATED_TIME_FORMAT).to_string()
}

/// `YYYYMMDD` for the download filename.
pub fn filename_date(now: &Zoned) -> String {
    now.strftime(FILENAME_DATE_FORMAT).to_string()
}

/// Current wall-clock time in the system time zone.
pub fn now_local() -> Zoned {
    Zoned::now()
}
