//! Temporary sandbox directories
//!
//! Temp dirs are never created under the current working directory, even
//! when TMPDIR is relative (e.g. TMPDIR=tmp).

use std::env;
use std::path::PathBuf;

use tempfile::{Builder, TempDir};

use crate::error::{Result, sandbox};

const SANDBOX_PREFIX: &str = "saltsolo-sandbox-";

/// Returns a directory path suitable for creating temporary directories.
/// Never returns a relative path.
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        #[cfg(windows)]
        {
            env::var("TEMP")
                .or_else(|_| env::var("TMP"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
        }
        #[cfg(not(windows))]
        {
            PathBuf::from("/tmp")
        }
    }
}

/// A unique sandbox directory removed when the handle is dropped
pub fn scratch_sandbox() -> Result<TempDir> {
    let base = temp_dir_base();
    Builder::new()
        .prefix(SANDBOX_PREFIX)
        .tempdir_in(&base)
        .map_err(|e| sandbox::write_failed(&base, e))
}

/// A unique sandbox directory that outlives this process
pub fn persistent_sandbox() -> Result<PathBuf> {
    Ok(scratch_sandbox()?.keep())
}
