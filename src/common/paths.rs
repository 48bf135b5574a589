//! Path helpers for local sources and remote sandbox locations
//!
//! Remote paths (`/etc/salt/minion`, `/srv/mine`) are plain strings because
//! they describe the target host, not this one. They are mapped into the
//! sandbox by dropping the leading separator.

use std::path::{Component, Path, PathBuf};

/// Convert a path to forward slashes for display and glob matching
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Map a remote absolute path to a path relative to the sandbox root
///
/// Both separators are accepted; empty and `.` segments are dropped.
pub fn sandbox_relative(remote: &str) -> PathBuf {
    remote
        .split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != ".")
        .collect()
}

/// Join a remote directory and a relative name into a remote path
pub fn remote_join(base: &str, rest: &str) -> String {
    let base = base.trim_end_matches(['/', '\\']);
    let rest = rest.trim_start_matches(['/', '\\']);
    if base.is_empty() {
        format!("/{rest}")
    } else {
        format!("{base}/{rest}")
    }
}

/// True if a relative path stays below the directory it is joined to
pub fn is_contained(relative: &Path) -> bool {
    !relative.as_os_str().is_empty()
        && relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

/// Expand a leading `~` in a local path to the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Resolve a configured local source path
///
/// Expands `~` and canonicalizes when the path exists (without the `\\?\`
/// prefix on Windows); a missing path is returned expanded but otherwise
/// untouched so the caller can report it as configured.
pub fn resolve_local(path: &Path) -> PathBuf {
    let expanded = expand_home(path);
    dunce::canonicalize(&expanded).unwrap_or(expanded)
}

/// Final component of a local path as a string
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_relative() {
        assert_eq!(
            sandbox_relative("/etc/salt/minion"),
            PathBuf::from("etc").join("salt").join("minion")
        );
        assert_eq!(sandbox_relative("srv//mine/./"), PathBuf::from("srv").join("mine"));
        assert_eq!(
            sandbox_relative("\\etc\\salt"),
            PathBuf::from("etc").join("salt")
        );
    }

    #[test]
    fn test_remote_join() {
        assert_eq!(remote_join("/tmp/kitchen", "/etc/salt"), "/tmp/kitchen/etc/salt");
        assert_eq!(remote_join("/tmp/kitchen/", "pip/salt.tgz"), "/tmp/kitchen/pip/salt.tgz");
        assert_eq!(remote_join("", "srv"), "/srv");
    }

    #[test]
    fn test_is_contained() {
        assert!(is_contained(Path::new("srv/mine/web")));
        assert!(!is_contained(Path::new("../outside")));
        assert!(!is_contained(Path::new("srv/../../outside")));
        assert!(!is_contained(Path::new("")));
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        assert_eq!(expand_home(Path::new("data/mine.yaml")), PathBuf::from("data/mine.yaml"));
    }

    #[test]
    fn test_expand_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/mine.yaml")), home.join("mine.yaml"));
        }
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename(Path::new("/tmp/conf/a.conf")), "a.conf");
    }
}
