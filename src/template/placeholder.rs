//! Minimal mustache-style renderer
//!
//! Supported syntax:
//! - `{{ key }}` / `{{ key.sub }}` substitutes a value. Strings are inserted
//!   verbatim, null renders empty, lists and mappings render as JSON flow text
//!   (valid YAML). An unknown key is an error.
//! - `{{#key}} ... {{/key}}` keeps the body only when `key` is truthy.
//! - `{{^key}} ... {{/key}}` keeps the body only when `key` is falsy or absent.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_yaml::Value;

use super::{Template, TemplateContext, TemplateRenderer};
use crate::error::{Result, data_source};

#[allow(clippy::expect_used)]
static SECTION_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([#^])\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("section pattern should compile")
});

#[allow(clippy::expect_used)]
static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("variable pattern should compile")
});

/// The built-in [`TemplateRenderer`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl TemplateRenderer for PlaceholderRenderer {
    fn render(&self, template: &Template, context: &TemplateContext) -> Result<String> {
        let expanded = expand_sections(&template.name, &template.text, context)?;
        substitute(&template.name, &expanded, context)
    }
}

fn expand_sections(name: &str, text: &str, context: &TemplateContext) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(caps) = SECTION_OPEN.captures(rest) {
        let (Some(open), Some(kind), Some(key)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            break;
        };
        let closing = format!("{{{{/{}}}}}", key.as_str());
        let body_start = open.end();
        let Some(body_len) = rest[body_start..].find(&closing) else {
            return Err(data_source::render_failed(
                name,
                format!("section '{}' is never closed", key.as_str()),
            ));
        };

        out.push_str(&rest[..open.start()]);

        // section tags on their own line do not leave blank lines behind
        let mut body = &rest[body_start..body_start + body_len];
        if at_line_start(&out) {
            body = body.strip_prefix('\n').unwrap_or(body);
        }

        let truthy = context.lookup(key.as_str()).is_some_and(is_truthy);
        let keep = if kind.as_str() == "#" { truthy } else { !truthy };
        if keep {
            out.push_str(&expand_sections(name, body, context)?);
        }

        rest = &rest[body_start + body_len + closing.len()..];
        if at_line_start(&out) {
            rest = rest.strip_prefix('\n').unwrap_or(rest);
        }
    }

    out.push_str(rest);
    Ok(out)
}

fn at_line_start(out: &str) -> bool {
    out.is_empty() || out.ends_with('\n')
}

fn substitute(name: &str, text: &str, context: &TemplateContext) -> Result<String> {
    let mut failure = None;
    let rendered = VARIABLE.replace_all(text, |caps: &Captures<'_>| {
        let key = &caps[1];
        match context.lookup(key).map(render_value) {
            Some(Ok(value)) => value,
            Some(Err(reason)) => {
                failure.get_or_insert_with(|| data_source::render_failed(name, reason));
                String::new()
            }
            None => {
                failure.get_or_insert_with(|| {
                    data_source::render_failed(name, format!("unknown placeholder '{key}'"))
                });
                String::new()
            }
        }
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(rendered.into_owned()),
    }
}

fn render_value(value: &Value) -> std::result::Result<String, String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => Ok(text.clone()),
        Value::Sequence(_) | Value::Mapping(_) => {
            serde_json::to_string(value).map_err(|e| e.to_string())
        }
        Value::Tagged(tagged) => render_value(&tagged.value),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(_) => true,
        Value::String(text) => !text.is_empty(),
        Value::Sequence(items) => !items.is_empty(),
        Value::Mapping(entries) => !entries.is_empty(),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}
