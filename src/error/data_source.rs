//! Data source errors (mine files, mock data, templates)

use super::SaltError;

/// Creates a data source not found error
pub fn not_found(path: impl Into<String>) -> SaltError {
    SaltError::DataSourceNotFound { path: path.into() }
}

/// Creates a data source parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> SaltError {
    SaltError::DataSourceParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a template render failed error
pub fn render_failed(template: impl Into<String>, reason: impl Into<String>) -> SaltError {
    SaltError::TemplateRenderFailed {
        template: template.into(),
        reason: reason.into(),
    }
}
