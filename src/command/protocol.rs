//! Run protocol selection
//!
//! salt-call before `--retcode-passthrough` existed exits 0 even when states
//! fail, so older versions get their output scanned for failure markers.

use crate::config::{RETCODE_VERSION, SaltVersion};

/// Patterns that mark a failed highstate in salt-call output
pub const FAIL_PATTERNS: &[&str] = &[
    "Result.*False",
    "Data.failed.to.compile",
    "No.matching.sls.found.for",
];

/// Where salt-call output is captured for scanning
pub const OUTPUT_CAPTURE: &str = "/tmp/salt-call-output";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunProtocol {
    /// Trust salt-call's own exit code
    RetcodePassthrough,
    /// Capture output and grep it for failure markers
    OutputScan,
}

impl RunProtocol {
    /// Pick the protocol for a salt version
    ///
    /// Versions are compared to [`RETCODE_VERSION`] as plain strings, so
    /// `0.9.0` sorts above `0.17.5`.
    pub fn select(version: &SaltVersion) -> Self {
        match version {
            SaltVersion::Latest => Self::RetcodePassthrough,
            SaltVersion::Pinned(version) if version.as_str() > RETCODE_VERSION => {
                Self::RetcodePassthrough
            }
            SaltVersion::Pinned(_) => Self::OutputScan,
        }
    }
}

/// The `grep -e ... -e ...` command matching any failure pattern
pub fn fail_grep() -> String {
    let mut cmd = String::from("grep");
    for pattern in FAIL_PATTERNS {
        cmd.push_str(" -e ");
        cmd.push_str(pattern);
    }
    cmd
}
