//! Sandbox materialization errors

use std::path::Path;

use super::SaltError;

/// Creates a template read failed error
pub fn template_read_failed(path: &Path, err: &std::io::Error) -> SaltError {
    SaltError::TemplateReadFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Creates a sandbox source read failed error
pub fn read_failed(path: &Path, err: impl ToString) -> SaltError {
    SaltError::SandboxReadFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Creates a sandbox write failed error
pub fn write_failed(path: &Path, err: impl ToString) -> SaltError {
    SaltError::SandboxWriteFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Creates a duplicate entry error
pub fn duplicate_entry(path: &Path) -> SaltError {
    SaltError::SandboxDuplicateEntry {
        path: path.display().to_string(),
    }
}
