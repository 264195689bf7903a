//! WebDriver error mapping.
//!
//! Maps fantoccini command failures onto [`DriverError`] so the resolver can
//! tell "matched nothing" and "bad query" apart from session failures.

use byall_core::DriverError;
use fantoccini::error::{CmdError, ErrorStatus, NewSessionError};

pub fn map_cmd_error(err: CmdError) -> DriverError {
    match &err {
        CmdError::Standard(wd) => map_status(&wd.error, wd.message.to_string()),
        _ if err.is_no_such_element() => DriverError::NoSuchElement(err.to_string()),
        _ => DriverError::Session(err.to_string()),
    }
}

/// Maps a W3C error status and its message.
pub fn map_status(status: &ErrorStatus, message: String) -> DriverError {
    match status {
        ErrorStatus::NoSuchElement => DriverError::NoSuchElement(message),
        ErrorStatus::InvalidSelector => DriverError::InvalidSelector(message),
        ErrorStatus::StaleElementReference => DriverError::StaleElement(message),
        _ => DriverError::Session(message),
    }
}

pub fn map_session_error(url: &str, err: NewSessionError) -> DriverError {
    DriverError::Session(format!("Failed to connect to WebDriver at {}: {}", url, err))
}
