//! Mine data: shared key/value data published to the minion
//!
//! Mine entries come from an ordered list of YAML files plus the inline
//! `mine` option. Files are folded in order with a shallow top-level merge
//! (later files win on colliding keys) and the inline mapping is laid over
//! the result, so inline values always win.

pub mod external;
pub mod mock;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::common::paths::resolve_local;
use crate::error::{Result, SaltError, data_source};

/// Merged mine entries, keyed by entry name
pub type MineData = Mapping;

/// Salt's match-all target; it must never reach the minion tagged
const WILDCARD: &str = "*";

/// Merge mine files (in order) and the inline mapping
pub fn merge(file_paths: &[PathBuf], inline: &Mapping) -> Result<MineData> {
    info!("Collecting mine data");
    debug!(files = ?file_paths, "mine files");

    let mut data = file_paths
        .iter()
        .try_fold(Mapping::new(), |mut memo, path| {
            memo.extend(load_mapping(path)?);
            Ok::<_, SaltError>(memo)
        })?;

    debug!(keys = inline.len(), "inline mine entries");
    data.extend(inline.iter().map(|(k, v)| (k.clone(), v.clone())));

    Ok(data)
}

/// Read a YAML document that must be a mapping
///
/// An empty document is an empty mapping.
pub fn load_mapping(path: &Path) -> Result<Mapping> {
    let resolved = resolve_local(path);
    let label = path.display().to_string();

    let content = fs::read_to_string(&resolved).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => data_source::not_found(&label),
        _ => data_source::parse_failed(&label, e.to_string()),
    })?;

    let value: Value = serde_yaml::from_str(&content)
        .map_err(|e| data_source::parse_failed(&label, e.to_string()))?;

    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(data_source::parse_failed(
            &label,
            "expected a mapping at the top level",
        )),
    }
}

/// Serialize a value to YAML with every tagged wildcard untagged
pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let tree = serde_yaml::to_value(value)
        .map_err(|e| data_source::render_failed("<yaml>", e.to_string()))?;
    serde_yaml::to_string(&untag_wildcards(tree))
        .map_err(|e| data_source::render_failed("<yaml>", e.to_string()))
}

/// Replace each tagged `*` scalar (`! '*'`) with the plain string, in keys
/// and values at any depth; other tags are kept
pub fn untag_wildcards(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            if value.as_str() == Some(WILDCARD) {
                value
            } else {
                Value::Tagged(Box::new(TaggedValue {
                    tag,
                    value: untag_wildcards(value),
                }))
            }
        }
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| (untag_wildcards(key), untag_wildcards(value)))
                .collect(),
        ),
        Value::Sequence(items) => {
            Value::Sequence(items.into_iter().map(untag_wildcards).collect())
        }
        other => other,
    }
}

/// YAML document for one mine entry: `{name: value}`
pub fn entry_document(name: &Value, value: &Value) -> Result<String> {
    let mut entry = Mapping::new();
    entry.insert(name.clone(), value.clone());
    to_yaml(&entry)
}

/// File name for a mine entry key
pub fn entry_name(name: &Value) -> String {
    match name {
        Value::String(text) => text.clone(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}
