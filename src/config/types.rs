//! Typed values used by the effective configuration
//!
//! String-valued options that select behaviour (install method, target OS,
//! repository kind) are closed enums so every dialect is handled exhaustively.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// How salt itself gets onto the target host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallMethod {
    /// `pip install` from an index or a staged sdist
    Pip,
    /// salt-bootstrap shell script
    Bootstrap,
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pip => f.write_str("pip"),
            Self::Bootstrap => f.write_str("bootstrap"),
        }
    }
}

/// Target host command dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Posix,
    Windows,
}

impl OsFamily {
    /// Translate a forward-slash path into this dialect
    pub fn translate(self, path: &str) -> String {
        match self {
            Self::Posix => path.to_string(),
            Self::Windows => path.replace('/', "\\"),
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posix => f.write_str("posix"),
            Self::Windows => f.write_str("windows"),
        }
    }
}

/// Requested salt version: `latest` or a dotted version string
///
/// Versions are only ever compared as strings; see
/// [`crate::command::RunProtocol::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaltVersion {
    Latest,
    Pinned(String),
}

impl SaltVersion {
    pub const LATEST: &'static str = "latest";

    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == Self::LATEST {
            Self::Latest
        } else {
            Self::Pinned(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Latest => Self::LATEST,
            Self::Pinned(version) => version,
        }
    }
}

impl fmt::Display for SaltVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SaltVersion {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SaltVersion {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_yaml::Number),
        }

        let raw = match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text,
            // `2019.20` would come back as `2019.2`
            Raw::Number(number) if number.is_f64() => {
                return Err(de::Error::custom(format!(
                    "salt_version {number} was read as a decimal number and may have lost digits; quote it"
                )));
            }
            Raw::Number(number) => number.to_string(),
        };
        Ok(Self::parse(&raw))
    }
}

/// Kind of vendor repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoKind {
    Apt,
    Ppa,
    Yum,
    Spm,
}

/// Extra package repository configured on the target before dependencies install
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorRepo {
    #[serde(rename = "type")]
    pub kind: RepoKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_url: Option<String>,
}

impl VendorRepo {
    /// Repository identifier derived from the URL
    ///
    /// Every `h`, `t`, `p`, `:`, `/` and `.` character is dropped, so
    /// `http://repo.example.com/spm` becomes `reoexamlecomsm`.
    pub fn repo_id(&self) -> String {
        self.url
            .chars()
            .filter(|c| !matches!(c, 'h' | 't' | 'p' | ':' | '/' | '.'))
            .collect()
    }
}

/// How a formula dependency is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Git,
    Apt,
    Yum,
    Spm,
    Pip,
}

/// A formula or package installed by `dependencies.sh` before the highstate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DependencyKind,
    /// Git URL for `git` dependencies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Package name when it differs from `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl Dependency {
    pub fn package_name(&self) -> &str {
        self.package.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        assert_eq!(SaltVersion::parse("latest"), SaltVersion::Latest);
        assert_eq!(
            SaltVersion::parse(" 2017.7.0 "),
            SaltVersion::Pinned("2017.7.0".to_string())
        );
    }

    #[test]
    fn test_version_from_yaml_integer() {
        let version: SaltVersion = serde_yaml::from_str("3006").unwrap();
        assert_eq!(version.as_str(), "3006");
    }

    #[test]
    fn test_version_float_rejected() {
        let result: std::result::Result<SaltVersion, _> = serde_yaml::from_str("2019.20");
        assert!(result.unwrap_err().to_string().contains("quote it"));

        let quoted: SaltVersion = serde_yaml::from_str("'2019.20'").unwrap();
        assert_eq!(quoted.as_str(), "2019.20");
    }

    #[test]
    fn test_version_roundtrip_latest() {
        let yaml = serde_yaml::to_string(&SaltVersion::Latest).unwrap();
        assert_eq!(yaml.trim(), "latest");
    }

    #[test]
    fn test_repo_id_strips_url_characters() {
        let repo = VendorRepo {
            kind: RepoKind::Spm,
            url: "https://spm.example.org/repo".to_string(),
            key_url: None,
        };
        assert_eq!(repo.repo_id(), "ssmexamleorgreo");
    }

    #[test]
    fn test_windows_translate() {
        assert_eq!(OsFamily::Windows.translate("/etc/salt"), "\\etc\\salt");
        assert_eq!(OsFamily::Posix.translate("/etc/salt"), "/etc/salt");
    }

    #[test]
    fn test_dependency_package_name() {
        let dep: Dependency =
            serde_yaml::from_str("name: nginx\ntype: apt\npackage: nginx-full\n").unwrap();
        assert_eq!(dep.package_name(), "nginx-full");
    }

    #[test]
    fn test_unknown_install_method_rejected() {
        let result: std::result::Result<InstallMethod, _> = serde_yaml::from_str("apt");
        assert!(result.is_err());
    }
}
