//! Template rendering
//!
//! Sandbox files and install scripts are produced by rendering a template
//! against an explicit [`TemplateContext`]. Nothing is captured implicitly:
//! a template can only see the values its caller put into the context.

pub mod builtin;
mod placeholder;

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::{Result, data_source};

pub use placeholder::PlaceholderRenderer;

/// Template text plus a name used in error messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub text: String,
}

impl Template {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Values visible to a template
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateContext {
    values: Mapping,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from the top-level fields of a serializable value
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        match serde_yaml::to_value(value)? {
            Value::Mapping(values) => Ok(Self { values }),
            Value::Null => Ok(Self::new()),
            _ => Err(data_source::render_failed(
                "<context>",
                "context must serialize to a mapping",
            )),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(Value::String(key.into()), value.into());
        self
    }

    /// Look up a dotted path such as `grains.role`
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.values.get(first)?;
        for part in parts {
            current = current.as_mapping()?.get(part)?;
        }
        Some(current)
    }
}

/// Renders template text against a context
pub trait TemplateRenderer {
    fn render(&self, template: &Template, context: &TemplateContext) -> Result<String>;
}
