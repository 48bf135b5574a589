//! Provision operation: install plan, sandbox, then command strings

use tracing::info;

use crate::command::{CommandSynthesizer, InstallPlan, LocalFilesystem, plan_install};
use crate::config::SaltConfig;
use crate::error::Result;
use crate::sandbox::{SandboxBuilder, SandboxTree};
use crate::template::TemplateRenderer;

/// Everything one provisioning run produces for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOutput {
    pub tree: SandboxTree,
    pub plan: InstallPlan,
    /// Install script for the install step, when salt is installed there
    pub install_command: Option<String>,
    /// Install script for the prepare step (pip, or install after init)
    pub prepare_command: Option<String>,
    pub init_command: String,
    pub run_command: String,
}

/// High-level provision operation
///
/// Stages run synchronously and in order; the first error aborts the run
/// and leaves whatever was already written in the sandbox.
pub struct Provisioner<'a> {
    config: &'a SaltConfig,
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> Provisioner<'a> {
    pub fn new(config: &'a SaltConfig, renderer: &'a dyn TemplateRenderer) -> Self {
        Self { config, renderer }
    }

    pub fn provision(&self) -> Result<ProvisionOutput> {
        info!(
            "Provisioning with salt {} ({})",
            self.config.salt_version, self.config.salt_install
        );
        let plan = plan_install(self.config, &LocalFilesystem)?;
        let tree = SandboxBuilder::new(self.config, &plan, self.renderer).build()?;

        let synthesizer = CommandSynthesizer::new(self.config, &plan, self.renderer);
        let install_command = synthesizer.install_command()?;
        let prepare_command = synthesizer.prepare_command()?;
        let init_command = synthesizer.init_command();
        let run_command = synthesizer.run_command()?;

        Ok(ProvisionOutput {
            tree,
            plan,
            install_command,
            prepare_command,
            init_command,
            run_command,
        })
    }
}
