//! Bridge error types and the result codes handed across the native boundary

use thiserror::Error;

use crate::config::ConfigError;

/// Errors reported by bridge operations
///
/// None of these conditions panic or unwind across the native boundary: entry
/// points return them, and [`BridgeError::result_code`] converts them to the
/// numeric code native callers expect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// A selector or handle did not resolve to anything
    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    /// The element already backs another window
    #[error("Duplicate target: {0}")]
    DuplicateTarget(String),

    /// The operation is not meaningful for the given target
    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    /// A platform operation failed or is unavailable
    #[error("Platform failure: {0}")]
    PlatformFailure(String),

    /// The bridge has not been initialized (or was torn down)
    #[error("Bridge is not initialized")]
    NotInitialized,

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ConfigError> for BridgeError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}

impl BridgeError {
    /// Numeric result code for this error
    pub const fn result_code(&self) -> ResultCode {
        match self {
            Self::UnknownTarget(_) => ResultCode::UnknownTarget,
            Self::DuplicateTarget(_) => ResultCode::InvalidTarget,
            Self::InvalidParam(_) | Self::Config(_) => ResultCode::InvalidParam,
            Self::PlatformFailure(_) | Self::NotInitialized => ResultCode::Failed,
        }
    }

    /// Native error code used when reporting this error through the error callback
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnknownTarget(_)
            | Self::DuplicateTarget(_)
            | Self::InvalidParam(_)
            | Self::Config(_) => ErrorCode::InvalidValue,
            Self::PlatformFailure(_) | Self::NotInitialized => ErrorCode::PlatformError,
        }
    }
}

/// Result codes returned from synchronous entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ResultCode {
    /// Operation succeeded
    Success = 0,
    /// Target exists but cannot be used (already bound)
    InvalidTarget = -3,
    /// Target could not be found
    UnknownTarget = -4,
    /// Parameter not meaningful for the target
    InvalidParam = -5,
    /// Operation failed
    Failed = -6,
}

impl ResultCode {
    /// Collapse an operation result into its code
    pub fn of<T>(result: &Result<T, BridgeError>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(error) => error.result_code(),
        }
    }
}

impl From<ResultCode> for i32 {
    fn from(code: ResultCode) -> Self {
        code as Self
    }
}

/// Error codes passed to the native error callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    /// A value passed by the caller was invalid
    InvalidValue = 0x0001_0004,
    /// The platform reported an error
    PlatformError = 0x0001_0008,
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code as Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_codes() {
        assert_eq!(ResultCode::of::<()>(&Ok(())), ResultCode::Success);
        assert_eq!(
            ResultCode::of::<()>(&Err(BridgeError::UnknownTarget("#nope".into()))),
            ResultCode::UnknownTarget
        );
        assert_eq!(
            i32::from(BridgeError::DuplicateTarget("#canvas".into()).result_code()),
            -3
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(i32::from(BridgeError::InvalidParam(String::new()).error_code()), 0x0001_0004);
        assert_eq!(i32::from(BridgeError::PlatformFailure(String::new()).error_code()), 0x0001_0008);
    }

    #[test]
    fn test_config_error_conversion() {
        let error: BridgeError = ConfigError::Invalid("bad alias".into()).into();
        assert_eq!(error.result_code(), ResultCode::InvalidParam);
        assert!(error.to_string().contains("bad alias"));
    }
}
