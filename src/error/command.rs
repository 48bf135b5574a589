//! Command synthesis errors

use super::SaltError;

/// Creates an unsupported OS/version combination error
pub fn unsupported(os: impl Into<String>, version: impl Into<String>) -> SaltError {
    SaltError::CommandUnsupported {
        os: os.into(),
        version: version.into(),
    }
}

/// Creates an invalid package spec error
pub fn package_spec(template: impl Into<String>, reason: impl Into<String>) -> SaltError {
    SaltError::PackageSpecInvalid {
        template: template.into(),
        reason: reason.into(),
    }
}
