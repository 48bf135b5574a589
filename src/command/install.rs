//! Install-method selection
//!
//! Decides where salt comes from (a pip package spec, a staged sdist, a
//! remote or staged bootstrap script) and which bootstrap options apply.
//! The result is an [`InstallPlan`]; the configuration itself is never
//! modified.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::paths::{basename, remote_join, resolve_local};
use crate::config::{InstallMethod, OsFamily, SaltConfig, SaltVersion};
use crate::error::{Result, command};

/// Version placeholder inside `pip_pkg`
const VERSION_PLACEHOLDER: &str = "%s";
/// Version pin stripped from `pip_pkg` when installing the latest release
const VERSION_PIN: &str = "==%s";

/// Answers whether a configured source is a file on this host
pub trait LocalFiles {
    fn is_local_file(&self, path: &Path) -> bool;
}

/// `LocalFiles` backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFiles for LocalFilesystem {
    fn is_local_file(&self, path: &Path) -> bool {
        resolve_local(path).is_file()
    }
}

impl<F> LocalFiles for F
where
    F: Fn(&Path) -> bool,
{
    fn is_local_file(&self, path: &Path) -> bool {
        self(path)
    }
}

/// A local file copied into the sandbox before upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub local: PathBuf,
    /// Forward-slash path relative to the sandbox root
    pub relative: String,
    /// Location on the target host after upload
    pub remote: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallSource {
    /// pip package spec resolved against the index (`salt==2017.7.0`, `salt`)
    Package(String),
    /// Bootstrap script downloaded on the target
    Remote(String),
    Staged(StagedFile),
}

/// Derived install values for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub method: InstallMethod,
    pub version: SaltVersion,
    pub source: InstallSource,
    /// Effective bootstrap options (empty for pip)
    pub bootstrap_options: String,
}

impl InstallPlan {
    /// What the install step installs from: package spec, URL or staged path
    pub fn install_reference(&self) -> &str {
        match &self.source {
            InstallSource::Package(spec) => spec,
            InstallSource::Remote(url) => url,
            InstallSource::Staged(file) => &file.remote,
        }
    }

    pub fn staged(&self) -> Option<&StagedFile> {
        match &self.source {
            InstallSource::Staged(file) => Some(file),
            _ => None,
        }
    }
}

/// Select the install source and options for `config`
pub fn plan_install(config: &SaltConfig, files: &dyn LocalFiles) -> Result<InstallPlan> {
    let version = config.version().clone();

    let (source, bootstrap_options) = match config.install_method() {
        InstallMethod::Pip => (pip_source(config, &version, files)?, String::new()),
        InstallMethod::Bootstrap => (
            bootstrap_source(config, files),
            bootstrap_options(&config.salt_bootstrap_options, &version),
        ),
    };

    let plan = InstallPlan {
        method: config.install_method(),
        version,
        source,
        bootstrap_options,
    };
    debug!(
        method = %plan.method,
        reference = plan.install_reference(),
        "selected install source"
    );
    Ok(plan)
}

fn pip_source(
    config: &SaltConfig,
    version: &SaltVersion,
    files: &dyn LocalFiles,
) -> Result<InstallSource> {
    let pip_pkg = config.pip_pkg.as_str();

    if files.is_local_file(Path::new(pip_pkg)) {
        debug!("Installing with pip from sdist");
        let name = basename(Path::new(pip_pkg));
        return Ok(InstallSource::Staged(staged(
            config,
            Path::new(pip_pkg),
            &format!("pip/{name}"),
        )));
    }

    debug!("Installing with pip from download");
    package_spec(pip_pkg, version).map(InstallSource::Package)
}

/// Resolve a `pip_pkg` template against the requested version
pub fn package_spec(template: &str, version: &SaltVersion) -> Result<String> {
    match version {
        SaltVersion::Pinned(version) => {
            if !template.contains(VERSION_PLACEHOLDER) {
                return Err(command::package_spec(
                    template,
                    format!("no '{VERSION_PLACEHOLDER}' to place version {version} into"),
                ));
            }
            Ok(template.replacen(VERSION_PLACEHOLDER, version, 1))
        }
        SaltVersion::Latest => {
            let spec = template.replacen(VERSION_PIN, "", 1);
            if spec.contains(VERSION_PLACEHOLDER) {
                return Err(command::package_spec(
                    template,
                    format!("only a '{VERSION_PIN}' pin can be dropped for the latest release"),
                ));
            }
            Ok(spec)
        }
    }
}

fn bootstrap_source(config: &SaltConfig, files: &dyn LocalFiles) -> InstallSource {
    let url = config.salt_bootstrap_url.as_str();
    if files.is_local_file(Path::new(url)) {
        let name = match config.os() {
            OsFamily::Posix => "bootstrap.sh",
            OsFamily::Windows => "bootstrap.ps1",
        };
        InstallSource::Staged(staged(config, Path::new(url), name))
    } else {
        InstallSource::Remote(url.to_string())
    }
}

/// Bootstrap options, synthesizing a git install of a pinned version when
/// none were given
pub fn bootstrap_options(configured: &str, version: &SaltVersion) -> String {
    match version {
        SaltVersion::Pinned(version) if configured.trim().is_empty() => {
            debug!("Using bootstrap git to install {version}");
            format!("-P git v{version}")
        }
        _ => configured.to_string(),
    }
}

fn staged(config: &SaltConfig, local: &Path, relative: &str) -> StagedFile {
    StagedFile {
        local: resolve_local(local),
        relative: relative.to_string(),
        remote: config.os().translate(&remote_join(&config.root_path, relative)),
    }
}
