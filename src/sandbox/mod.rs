//! Sandbox materialization
//!
//! The sandbox is a local directory mirroring what gets uploaded to
//! `root_path` on the target host. [`SandboxBuilder::build`] writes every
//! artifact the configuration implies, in a fixed order:
//!
//! 1. data directory
//! 2. staged install sources
//! 3. minion config, extra options and drop-ins
//! 4. pillars and the pillar top file
//! 5. grains
//! 6. mine entries and external mine payloads
//! 7. mock data
//! 8. state top file
//! 9. spm config and dependency scripts
//!
//! A failed build leaves a partial tree behind; callers discard it.

mod dependencies;
mod minion;
mod states;
pub mod writer;

use std::path::Path;

use tracing::{debug, info};

use crate::command::InstallPlan;
use crate::common::fs::{CopyFilter, walk_files};
use crate::common::paths::{remote_join, resolve_local};
use crate::config::SaltConfig;
use crate::error::{Result, sandbox};
use crate::mine;
use crate::template::TemplateRenderer;

pub use writer::{EntrySource, SandboxTree, SandboxWriter};

/// Directory under the sandbox root receiving `data_path`
pub const DATA_DIR: &str = "data";

pub struct SandboxBuilder<'a> {
    config: &'a SaltConfig,
    plan: &'a InstallPlan,
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> SandboxBuilder<'a> {
    pub fn new(
        config: &'a SaltConfig,
        plan: &'a InstallPlan,
        renderer: &'a dyn TemplateRenderer,
    ) -> Self {
        Self {
            config,
            plan,
            renderer,
        }
    }

    /// Write the full sandbox and return its manifest
    pub fn build(&self) -> Result<SandboxTree> {
        let root = self.config.sandbox_root();
        debug!("sandbox is {}", root.display());
        let mut writer = SandboxWriter::new(root);

        self.prepare_data(&mut writer)?;
        self.prepare_install(&mut writer)?;
        minion::prepare(&mut writer, self.config, self.renderer)?;
        states::prepare_pillars(&mut writer, self.config)?;
        self.prepare_grains(&mut writer)?;
        self.prepare_mine(&mut writer)?;
        mine::mock::prepare(&mut writer, self.config, self.renderer)?;
        states::prepare_state_top(&mut writer, self.config)?;
        dependencies::prepare(&mut writer, self.config, self.renderer)?;

        let tree = writer.finish();
        info!("Sandbox ready with {} entries", tree.len());
        Ok(tree)
    }

    fn prepare_data(&self, writer: &mut SandboxWriter) -> Result<()> {
        let Some(data_path) = &self.config.data_path else {
            return Ok(());
        };
        info!("Preparing data");
        let source = resolve_local(data_path);
        debug!("Using data from {}", source.display());
        if !source.is_dir() {
            return Err(sandbox::read_failed(&source, "data_path is not a directory"));
        }

        let filter = CopyFilter::new(self.config.salt_copy_filter.iter().cloned());
        let files = walk_files(&source, &filter).map_err(|e| {
            let path = e.path().map(|p| p.to_path_buf()).unwrap_or_else(|| source.clone());
            sandbox::read_failed(&path, e)
        })?;

        for file in files {
            writer.copy(Path::new(DATA_DIR).join(&file.relative), &file.source)?;
        }
        Ok(())
    }

    fn prepare_install(&self, writer: &mut SandboxWriter) -> Result<()> {
        let Some(staged) = self.plan.staged() else {
            return Ok(());
        };
        debug!("Staging {} as {}", staged.local.display(), staged.relative);
        writer.copy(&staged.relative, &staged.local)
    }

    fn prepare_grains(&self, writer: &mut SandboxWriter) -> Result<()> {
        debug!("Grains Hash: {:?}", self.config.grains());
        let Some(grains) = self.config.grains() else {
            return Ok(());
        };
        info!("Preparing grains into {}/grains", self.config.salt_config);
        let content = mine::to_yaml(grains)?;
        writer.write_remote(&remote_join(&self.config.salt_config, "grains"), content)
    }

    fn prepare_mine(&self, writer: &mut SandboxWriter) -> Result<()> {
        let config = self.config;
        let data = mine::merge(&config.mine_from_files, &config.mine)?;
        if !data.is_empty() {
            info!("Preparing mine into {}", config.salt_mine_root);
        }
        for (name, value) in &data {
            let file = mine::entry_name(name);
            let content = mine::entry_document(name, value)?;
            writer.write_remote(&remote_join(&config.salt_mine_root, &file), content)?;
        }

        mine::external::copy_into(writer, &config.external_mine, &config.salt_mine_root)
    }
}
