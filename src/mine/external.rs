//! External mine payloads
//!
//! `external-mine` maps a mine key to a local file that is copied verbatim to
//! `<salt_mine_root>/<key>`. The payload is never parsed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::common::paths::{is_contained, remote_join, resolve_local, sandbox_relative};
use crate::error::{Result, config, data_source};
use crate::sandbox::SandboxWriter;

/// Copy every external mine file into the sandbox
pub fn copy_into(
    writer: &mut SandboxWriter,
    external: &BTreeMap<String, PathBuf>,
    mine_root: &str,
) -> Result<()> {
    if external.is_empty() {
        return Ok(());
    }
    info!("Copying external mine data into {mine_root}");

    for (key, source) in external {
        if !is_contained(Path::new(key)) {
            return Err(config::invalid(format!(
                "external-mine key '{key}' must be a relative name"
            )));
        }
        let resolved = resolve_local(source);
        if !resolved.is_file() {
            return Err(data_source::not_found(source.display().to_string()));
        }
        writer.copy(sandbox_relative(&remote_join(mine_root, key)), &resolved)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SaltError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_copies_bytes_verbatim() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("web.bin");
        fs::write(&source, b"\x00not yaml: [").unwrap();
        let sandbox = temp.path().join("sandbox");
        let mut writer = SandboxWriter::new(&sandbox);

        let external = BTreeMap::from([("web".to_string(), source)]);
        copy_into(&mut writer, &external, "/srv/mine").unwrap();

        assert_eq!(
            fs::read(sandbox.join("srv/mine/web")).unwrap(),
            b"\x00not yaml: ["
        );
    }

    #[test]
    fn test_missing_source() {
        let temp = TempDir::new().unwrap();
        let mut writer = SandboxWriter::new(temp.path());

        let external = BTreeMap::from([("web".to_string(), temp.path().join("nope.yaml"))]);
        let err = copy_into(&mut writer, &external, "/srv/mine").unwrap_err();

        assert!(matches!(err, SaltError::DataSourceNotFound { ref path } if path.contains("nope.yaml")));
    }

    #[test]
    fn test_key_must_stay_under_mine_root() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("web.yaml");
        fs::write(&source, "a: 1\n").unwrap();
        let mut writer = SandboxWriter::new(temp.path().join("sandbox"));

        let external = BTreeMap::from([("../../etc/passwd".to_string(), source)]);
        let err = copy_into(&mut writer, &external, "/srv/mine").unwrap_err();

        assert!(matches!(err, SaltError::ConfigInvalid { .. }));
    }
}
