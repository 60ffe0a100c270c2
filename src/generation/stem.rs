use chrono::NaiveDateTime;

use crate::core::ProviderKind;

/// Minute-granularity timestamp used in output filenames
pub const TIMESTAMP_FORMAT: &str = "%d_%m_%Y_%Hh%Mmin";

/// `<provider>_response_<DD_MM_YYYY_HHhMMmin>`
pub fn filename_stem(provider: ProviderKind, time: NaiveDateTime) -> String {
    format!(
        "{}_response_{}",
        provider.label(),
        time.format(TIMESTAMP_FORMAT)
    )
}
