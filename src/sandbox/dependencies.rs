//! spm configuration and dependency scripts at the sandbox root

use tracing::{debug, info};

use crate::command::shell::quote;
use crate::common::paths::remote_join;
use crate::config::{Dependency, DependencyKind, RepoKind, SaltConfig, VendorRepo};
use crate::error::{Result, config as config_error};
use crate::template::{TemplateContext, TemplateRenderer, builtin};

use super::SandboxWriter;

/// Aggregated spm repository definitions, relative to `salt_config`
pub const SPM_REPO_FILE: &str = "spm.repos.d/spm.repo";
const DEFAULT_BRANCH: &str = "master";

pub(super) fn prepare(
    writer: &mut SandboxWriter,
    config: &SaltConfig,
    renderer: &dyn TemplateRenderer,
) -> Result<()> {
    info!("Preparing scripts into {}", writer.root().display());

    let repo_file = remote_join(&config.salt_config, SPM_REPO_FILE);
    let mut spm_context = TemplateContext::new();
    spm_context
        .insert("spm_repos_config", config.remote_path(&repo_file))
        .insert("spm_root", config.remote_path(&config.salt_spm_root))
        .insert("file_root", config.remote_path(&config.salt_file_root))
        .insert("pillar_root", config.remote_path(&config.salt_pillar_root));
    let spm = renderer.render(&builtin::spm(), &spm_context)?;
    writer.write_remote(&remote_join(&config.salt_config, "spm"), spm)?;

    let spm_repos: Vec<&VendorRepo> = config.spm_repos().collect();
    if !spm_repos.is_empty() {
        writer.write_remote(&repo_file, spm_repo_file(&spm_repos))?;
    }

    for (name, content) in builtin::STATIC_SCRIPTS {
        writer.write(name, content)?;
    }

    let mut context = TemplateContext::new();
    context
        .insert("root_path", config.root_path.as_str())
        .insert("repository_lines", repository_lines(config).join("\n"))
        .insert("dependency_lines", dependency_lines(config)?.join("\n"));
    let script = renderer.render(&builtin::dependencies(), &context)?;
    writer.write("dependencies.sh", script)
}

/// One `<id>:\n  url: <url>` block per spm repository
fn spm_repo_file(repos: &[&VendorRepo]) -> String {
    repos
        .iter()
        .map(|repo| {
            debug!("spm repo {} -> {}", repo.repo_id(), repo.url);
            format!("{}:\n  url: {}\n", repo.repo_id(), repo.url)
        })
        .collect()
}

fn repository_lines(config: &SaltConfig) -> Vec<String> {
    let mut lines: Vec<String> = config
        .vendor_repo
        .iter()
        .filter_map(|repo| {
            let kind = match repo.kind {
                RepoKind::Apt => "apt",
                RepoKind::Ppa => "ppa",
                RepoKind::Yum => "yum",
                RepoKind::Spm => return None,
            };
            let mut line = format!("sh \"$ROOT/repository-setup.sh\" {kind} {}", quote(&repo.url));
            if let Some(key_url) = &repo.key_url {
                line.push(' ');
                line.push_str(&quote(key_url));
            }
            Some(line)
        })
        .collect();

    if config.spm_repos().next().is_some() {
        lines.push("spm update_repo".to_string());
    }
    lines
}

fn dependency_lines(config: &SaltConfig) -> Result<Vec<String>> {
    config
        .dependencies
        .iter()
        .map(|dependency| dependency_line(config, dependency))
        .collect()
}

fn dependency_line(config: &SaltConfig, dependency: &Dependency) -> Result<String> {
    let package = quote(dependency.package_name());
    let line = match dependency.kind {
        DependencyKind::Git => {
            let Some(repo) = &dependency.repo else {
                return Err(config_error::invalid(format!(
                    "git dependency '{}' needs a repo URL",
                    dependency.name
                )));
            };
            let branch = dependency.branch.as_deref().unwrap_or(DEFAULT_BRANCH);
            format!(
                "sh \"$ROOT/formula-fetch.sh\" {} {} {} {}",
                quote(repo),
                quote(branch),
                quote(&dependency.name),
                quote(&config.remote_path(&config.salt_file_root))
            )
        }
        DependencyKind::Apt => format!("DEBIAN_FRONTEND=noninteractive apt-get install -y {package}"),
        DependencyKind::Yum => format!("yum install -y {package}"),
        DependencyKind::Spm => format!("spm install -y {package}"),
        DependencyKind::Pip => format!("{} install {package}", config.pip_bin),
    };
    Ok(line)
}
