//! Command synthesis
//!
//! Builds the command strings handed to the transport that runs them on
//! the target host: the install script, the environment init command and
//! the highstate run command. Everything here reads the effective
//! configuration and the [`InstallPlan`]; nothing looks at the sandbox.

pub mod install;
pub mod protocol;
pub mod shell;

use tracing::debug;

use crate::common::paths::remote_join;
use crate::config::{InstallMethod, OsFamily, SaltConfig};
use crate::error::{Result, command};
use crate::template::{TemplateContext, TemplateRenderer, builtin};

pub use install::{InstallPlan, LocalFilesystem, plan_install};
pub use protocol::RunProtocol;

const SALT_CALL_POSIX: &str = "salt-call";
const SALT_CALL_WINDOWS: &str = r"c:\salt\salt-call.bat";

pub struct CommandSynthesizer<'a> {
    config: &'a SaltConfig,
    plan: &'a InstallPlan,
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> CommandSynthesizer<'a> {
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

    pub fn protocol(&self) -> RunProtocol {
        RunProtocol::select(&self.plan.version)
    }

    /// Install command, unless installation is deferred to the prepare step
    pub fn install_command(&self) -> Result<Option<String>> {
        if self.install_deferred() {
            Ok(None)
        } else {
            self.setup_salt().map(Some)
        }
    }

    /// Prepare command: the install script when pip is used or installation
    /// must follow `init_environment`
    pub fn prepare_command(&self) -> Result<Option<String>> {
        if self.install_deferred() {
            self.setup_salt().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Create the root directory on the target and run `init_environment`
    pub fn init_command(&self) -> String {
        let root = &self.config.root_path;
        let mkdir = match self.config.os() {
            OsFamily::Posix => format!("mkdir -p '{root}';"),
            OsFamily::Windows => format!("mkdir -Force -Path {root}\n"),
        };
        format!("{mkdir}{}\n", self.config.init_environment)
    }

    /// The salt-call highstate invocation
    pub fn salt_command(&self) -> String {
        let config = self.config;
        let os = config.os();
        let root = &config.root_path;
        let mut cmd = String::new();

        let salt_call = match os {
            OsFamily::Windows => {
                let minion = os.translate(&remote_join(
                    &remote_join(root, &config.salt_config),
                    "minion",
                ));
                cmd.push_str(&format!(
                    "(get-content {minion}).replace(\"`$env`:TEMP\", $env:TEMP) | set-content {minion} ;"
                ));
                SALT_CALL_WINDOWS
            }
            OsFamily::Posix => {
                cmd.push_str(&shell::sudo(config, &format!("chmod +x {root}/*.sh;")));
                cmd.push_str(&shell::sudo(config, &format!("{root}/dependencies.sh;")));
                SALT_CALL_POSIX
            }
        };

        let config_dir = os.translate(&remote_join(root, &config.salt_config));
        cmd.push_str(&shell::sudo(
            config,
            &format!(
                "{salt_call} --state-output=changes --config-dir={config_dir} --local state.highstate"
            ),
        ));
        if let Some(level) = &config.log_level {
            cmd.push_str(&format!(" --log-level={level}"));
        }
        if let Some(id) = &config.salt_minion_id {
            cmd.push_str(&format!(" --id={id}"));
        }
        if config.dry_run {
            cmd.push_str(" test=true");
        }
        if config.salt_force_color {
            cmd.push_str(" --force-color");
        }
        if self.protocol() == RunProtocol::RetcodePassthrough {
            cmd.push_str(" --retcode-passthrough");
        }
        if os == OsFamily::Windows {
            cmd.push_str(" ; exit $LASTEXITCODE");
        }
        cmd
    }

    /// The command the transport runs to apply the highstate
    ///
    /// With [`RunProtocol::OutputScan`] the invocation is wrapped so that a
    /// non-zero salt-call exit fails the run, and otherwise any failure
    /// marker in the captured output fails it.
    pub fn run_command(&self) -> Result<String> {
        match self.protocol() {
            RunProtocol::RetcodePassthrough => Ok(self.salt_command()),
            RunProtocol::OutputScan => {
                if self.config.is_windows() {
                    return Err(command::unsupported(
                        self.config.os().to_string(),
                        self.plan.version.to_string(),
                    ));
                }
                debug!("scanning salt-call output for failures");
                Ok(output_scan(&self.salt_command()))
            }
        }
    }

    fn install_deferred(&self) -> bool {
        self.config.install_method() == InstallMethod::Pip
            || self.config.install_after_init_environment
    }

    fn setup_salt(&self) -> Result<String> {
        let template = match self.config.os() {
            OsFamily::Posix => builtin::install_posix(),
            OsFamily::Windows => builtin::install_windows(),
        };
        let rendered = self.renderer.render(&template, &self.install_context())?;
        debug!("Install Command: {rendered}");
        Ok(rendered)
    }

    fn install_context(&self) -> TemplateContext {
        let config = self.config;
        let plan = self.plan;
        let extra_index_flags: String = config
            .pip_extra_index_url
            .iter()
            .map(|url| format!(" --extra-index-url {url}"))
            .collect();
        let sudo_prefix = if config.sudo && !config.is_windows() {
            format!("{} ", config.sudo_command)
        } else {
            String::new()
        };

        let mut context = TemplateContext::new();
        context
            .insert("install_method", plan.method.to_string())
            .insert("salt_version", plan.version.to_string())
            .insert("pip", plan.method == InstallMethod::Pip)
            .insert("bootstrap", plan.method == InstallMethod::Bootstrap)
            .insert("sudo", sudo_prefix)
            .insert("pip_bin", config.pip_bin.as_str())
            .insert("pip_index_url", config.pip_index_url.as_str())
            .insert("extra_index_flags", extra_index_flags)
            .insert("pip_editable", config.pip_editable)
            .insert("pip_install", plan.install_reference())
            .insert("staged_bootstrap", plan.staged().is_some())
            .insert("root_path", config.root_path.as_str())
            .insert("salt_bootstrap_url", config.salt_bootstrap_url.as_str())
            .insert("bootstrap_options", plan.bootstrap_options.as_str());
        context
    }
}

/// Wrap a POSIX salt-call invocation in the output-scanning protocol
fn output_scan(salt_command: &str) -> String {
    let fail_grep = protocol::fail_grep();
    let capture = protocol::OUTPUT_CAPTURE;
    let mut cmd = format!("set -o pipefail ; {salt_command}");
    cmd.push_str(&format!(
        " 2>&1 | tee {capture} ; SC=$? ; echo salt-call exit code: $SC ;"
    ));
    cmd.push_str(&format!(
        " (sed '/{fail_grep}/d' {capture} | {fail_grep} ; EC=$? ; echo salt-call output grep exit code ${{EC}} ;"
    ));
    cmd.push_str(" [ ${SC} -ne 0 ] && exit ${SC} ; [ ${EC} -eq 0 ] && exit 1 ; [ ${EC} -eq 1 ] && exit 0)");
    cmd
}
