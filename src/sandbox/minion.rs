//! Minion configuration: base config, extra options and drop-in files

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::common::paths::{basename, resolve_local};
use crate::config::SaltConfig;
use crate::error::{Result, config as config_error, data_source, sandbox};
use crate::mine;
use crate::template::{Template, TemplateContext, TemplateRenderer, builtin};

use super::SandboxWriter;

/// Drop-in directory, relative to the sandbox root
pub const DROPIN_DIR: &str = "etc/salt/minion.d";
/// File receiving `salt_minion_extra_config`
pub const EXTRA_CONFIG_FILE: &str = "99-minion.conf";
/// Extension marking a user minion template as one to render
const TEMPLATE_EXTENSION: &str = "tmpl";

pub(super) fn prepare(
    writer: &mut SandboxWriter,
    config: &SaltConfig,
    renderer: &dyn TemplateRenderer,
) -> Result<()> {
    info!("Preparing salt-minion");
    base_config(writer, config, renderer)?;
    extra_config(writer, config, renderer)?;
    dropin_files(writer, config)
}

/// Render the minion config to `salt_minion_config`
///
/// A user template ending in `.tmpl` is rendered; any other file is used
/// as-is.
fn base_config(
    writer: &mut SandboxWriter,
    config: &SaltConfig,
    renderer: &dyn TemplateRenderer,
) -> Result<()> {
    let content = match &config.salt_minion_config_template {
        Some(path) => {
            let resolved = resolve_local(path);
            let text = fs::read_to_string(&resolved)
                .map_err(|e| sandbox::template_read_failed(path, &e))?;
            let is_template = resolved
                .extension()
                .is_some_and(|ext| ext == TEMPLATE_EXTENSION);
            if is_template {
                let template = Template::new(path.display().to_string(), text);
                renderer.render(&template, &minion_context(config)?)?
            } else {
                text
            }
        }
        None => renderer.render(&builtin::minion(), &minion_context(config)?)?,
    };

    writer.write_remote(config.minion_config_path(), content)
}

/// Context for minion templates: every option plus the roots as the
/// minion sees them after upload
fn minion_context(config: &SaltConfig) -> Result<TemplateContext> {
    let mut context = TemplateContext::from_serialize(config)?;
    context
        .insert("file_root", config.remote_path(&config.salt_file_root))
        .insert("pillar_root", config.remote_path(&config.salt_pillar_root))
        .insert("spm_root", config.remote_path(&config.salt_spm_root));
    Ok(context)
}

fn extra_config(
    writer: &mut SandboxWriter,
    config: &SaltConfig,
    renderer: &dyn TemplateRenderer,
) -> Result<()> {
    let extra = config.minion_extra_config();
    if extra.is_empty() {
        return Ok(());
    }
    debug!("Extra minion options: {:?}", extra.keys().collect::<Vec<_>>());

    let rendered_options = mine::to_yaml(&extra)?;
    let mut context = TemplateContext::new();
    context.insert("extra_config", rendered_options.trim_end());

    let content = renderer.render(&builtin::minion_extra_config(), &context)?;
    writer.write(Path::new(DROPIN_DIR).join(EXTRA_CONFIG_FILE), content)
}

/// Copy drop-in files so the last listed one sorts last (`99-<name>`)
fn dropin_files(writer: &mut SandboxWriter, config: &SaltConfig) -> Result<()> {
    let files = &config.salt_minion_config_dropin_files;
    if files.is_empty() {
        return Ok(());
    }

    let names = dropin_names(files.iter().map(|p| basename(p)))?;
    for (source, name) in files.iter().zip(names) {
        let resolved = resolve_local(source);
        if !resolved.is_file() {
            return Err(data_source::not_found(source.display().to_string()));
        }
        writer.copy(Path::new(DROPIN_DIR).join(name), &resolved)?;
    }
    Ok(())
}

/// `NN-<name>` for each basename, with `NN = 99 - count + position` and
/// positions counted from one
pub fn dropin_names<I>(basenames: I) -> Result<Vec<String>>
where
    I: ExactSizeIterator<Item = String>,
{
    let count = basenames.len();
    if count > 99 {
        return Err(config_error::invalid(format!(
            "salt_minion_config_dropin_files lists {count} files, at most 99 are supported"
        )));
    }
    Ok(basenames
        .enumerate()
        .map(|(i, name)| format!("{:02}-{name}", 99 - count + i + 1))
        .collect())
}
