//! Configuration errors

use super::SaltError;

/// Creates a missing required key error
pub fn missing_key(key: impl Into<String>) -> SaltError {
    SaltError::ConfigMissingKey { key: key.into() }
}

/// Creates an unknown key error
pub fn unknown_key(key: impl Into<String>) -> SaltError {
    SaltError::ConfigUnknownKey { key: key.into() }
}

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> SaltError {
    SaltError::ConfigInvalid {
        message: message.into(),
    }
}

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> SaltError {
    SaltError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a config read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> SaltError {
    SaltError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
