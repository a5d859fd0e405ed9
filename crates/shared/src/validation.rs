//! Common validation rules for `validator` derives.

use validator::ValidationError;

/// Smallest accepted average service time, in minutes.
pub const MIN_AVG_MINUTES: i32 = 1;
/// Largest accepted average service time, in minutes.
pub const MAX_AVG_MINUTES: i32 = 120;

/// Rejects strings that are empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Please provide a name".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates the average service time range.
pub fn validate_avg_minutes(minutes: i32) -> Result<(), ValidationError> {
    if (MIN_AVG_MINUTES..=MAX_AVG_MINUTES).contains(&minutes) {
        Ok(())
    } else {
        let mut err = ValidationError::new("avg_minutes_range");
        err.message = Some("avgTimePerCustomer must be between 1 and 120 minutes".into());
        Err(err)
    }
}
