//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use semver::Version;

/// Validate a release version argument.
///
/// Surrounding whitespace is ignored; the rest must be a full
/// `major.minor.patch` semantic version.
pub fn validate_version(s: &str) -> Result<Version, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Release version cannot be empty".to_string());
    }

    Version::parse(s).map_err(|e| {
        format!("Invalid release version '{s}': {e}. Expected format: major.minor.patch (e.g., 4.19.0)")
    })
}
