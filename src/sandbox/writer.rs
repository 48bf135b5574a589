//! Write-once access to the sandbox directory
//!
//! Every artifact goes through [`SandboxWriter`], which creates parent
//! directories, refuses paths outside the root, and records each entry in a
//! [`SandboxTree`]. Writing the same relative path twice in one run is a
//! [`SaltError::SandboxDuplicateEntry`](crate::error::SaltError).

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::paths::{is_contained, sandbox_relative, to_forward_slashes};
use crate::error::{Result, sandbox};

/// Where the bytes of an entry came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    /// Content generated during this run
    Written,
    /// Byte-for-byte copy of a local file
    Copied(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxEntry {
    /// Path relative to the sandbox root
    pub path: PathBuf,
    pub source: EntrySource,
}

/// Manifest of everything written into one sandbox, in write order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxTree {
    root: PathBuf,
    entries: Vec<SandboxEntry>,
}

impl SandboxTree {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[SandboxEntry] {
        &self.entries
    }

    /// Relative paths of every entry, forward-slash separated
    pub fn paths(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| to_forward_slashes(&entry.path))
            .collect()
    }

    #[allow(dead_code)]
    pub fn contains(&self, relative: impl AsRef<Path>) -> bool {
        let relative = relative.as_ref();
        self.entries.iter().any(|entry| entry.path == relative)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct SandboxWriter {
    tree: SandboxTree,
    seen: HashSet<PathBuf>,
}

impl SandboxWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            tree: SandboxTree {
                root: root.into(),
                entries: Vec::new(),
            },
            seen: HashSet::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.tree.root
    }

    /// Write generated content at a sandbox-relative path
    pub fn write(&mut self, relative: impl AsRef<Path>, content: impl AsRef<[u8]>) -> Result<()> {
        let relative = relative.as_ref();
        let target = self.claim(relative)?;
        fs::write(&target, content).map_err(|e| sandbox::write_failed(&target, e))?;
        debug!("  ...{}", to_forward_slashes(relative));
        self.record(relative, EntrySource::Written);
        Ok(())
    }

    /// Write generated content at the sandbox location of a remote path
    pub fn write_remote(&mut self, remote: &str, content: impl AsRef<[u8]>) -> Result<()> {
        self.write(sandbox_relative(remote), content)
    }

    /// Copy a local file to a sandbox-relative path
    pub fn copy(&mut self, relative: impl AsRef<Path>, source: &Path) -> Result<()> {
        let relative = relative.as_ref();
        if !source.is_file() {
            return Err(sandbox::read_failed(source, "not a readable file"));
        }
        let target = self.claim(relative)?;
        fs::copy(source, &target).map_err(|e| sandbox::write_failed(&target, e))?;
        debug!("  ...{} (from {})", to_forward_slashes(relative), source.display());
        self.record(relative, EntrySource::Copied(source.to_path_buf()));
        Ok(())
    }

    pub fn finish(self) -> SandboxTree {
        self.tree
    }

    /// Reserve a relative path and make sure its parent directory exists
    fn claim(&mut self, relative: &Path) -> Result<PathBuf> {
        let target = self.tree.root.join(relative);
        if !is_contained(relative) {
            return Err(sandbox::write_failed(
                &target,
                "path is outside the sandbox root",
            ));
        }
        if !self.seen.insert(relative.to_path_buf()) {
            return Err(sandbox::duplicate_entry(relative));
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| sandbox::write_failed(parent, e))?;
        }
        Ok(target)
    }

    fn record(&mut self, relative: &Path, source: EntrySource) {
        self.tree.entries.push(SandboxEntry {
            path: relative.to_path_buf(),
            source,
        });
    }
}
