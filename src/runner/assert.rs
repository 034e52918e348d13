use std::fmt::Debug;

use crate::error::HarnessError;

/// Fail the scenario with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<(), HarnessError> {
    if condition {
        Ok(())
    } else {
        Err(HarnessError::Assertion(message.into()))
    }
}

pub fn ensure_eq<T: PartialEq + Debug>(
    actual: T,
    expected: T,
    message: &str,
) -> Result<(), HarnessError> {
    if actual == expected {
        Ok(())
    } else {
        Err(HarnessError::Assertion(format!(
            "{}: expected {:?}, got {:?}",
            message, expected, actual
        )))
    }
}

/// `haystack` must contain `needle`, compared case-insensitively.
pub fn ensure_contains(haystack: &str, needle: &str, message: &str) -> Result<(), HarnessError> {
    if haystack.to_lowercase().contains(&needle.to_lowercase()) {
        Ok(())
    } else {
        Err(HarnessError::Assertion(format!(
            "{}: '{}' does not contain '{}'",
            message, haystack, needle
        )))
    }
}

/// Stop the scenario and report it as skipped.
pub fn skip<T>(reason: impl Into<String>) -> Result<T, HarnessError> {
    Err(HarnessError::Skipped(reason.into()))
}
