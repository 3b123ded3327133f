// Shared utility functions for the power-quality service

use std::path::Path;

/// Round `value` half away from zero to `places` decimal places
///
/// # Examples
///
/// ```
/// use power_quality_service::utils::round_to;
///
/// assert_eq!(round_to(33.333333, 4), 33.3333);
/// assert_eq!(round_to(66.666666, 4), 66.6667);
/// assert_eq!(round_to(12.5, 0), 13.0);
/// ```
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Short identifier for a file in log events and reports
///
/// Uses the file name when there is one, otherwise the full path.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
