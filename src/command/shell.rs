//! Small shell string helpers

use crate::config::SaltConfig;

/// Prefix a POSIX command with the configured elevation command
///
/// Windows commands are returned unchanged.
pub fn sudo(config: &SaltConfig, script: &str) -> String {
    if config.sudo && !config.is_windows() {
        format!("{} {}", config.sudo_command, script)
    } else {
        script.to_string()
    }
}

/// Quote a word for a POSIX shell when it contains anything unusual
pub fn quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
