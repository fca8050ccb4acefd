//! Field-level validation beyond what the storage types express.

use crate::error::ApiError;

pub const MAX_SKILL_LEVEL: i32 = 5;

/// Proficiency level must lie in [0, 5].
pub fn validate_level(level: i32) -> Result<(), ApiError> {
    if !(0..=MAX_SKILL_LEVEL).contains(&level) {
        return Err(ApiError::validation(
            "level",
            format!("must be between 0 and {MAX_SKILL_LEVEL}, got {level}"),
        ));
    }
    Ok(())
}

/// Edge strength must lie in the closed unit interval.
pub fn validate_strength(strength: f64) -> Result<(), ApiError> {
    if !(0.0..=1.0).contains(&strength) || strength.is_nan() {
        return Err(ApiError::validation(
            "strength",
            format!("must be between 0.0 and 1.0, got {strength}"),
        ));
    }
    Ok(())
}

/// Lenient parse for `min_strength`/`max_strength` query parameters.
/// An unparseable bound is ignored rather than rejected, so a bad
/// value widens the filter instead of failing the request.
pub fn parse_strength_bound(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
}
