//! Version command implementation

use crate::config::RETCODE_VERSION;
use crate::config::defaults::DEFAULT_BOOTSTRAP_URL;
use crate::error::Result;

/// Run version command
pub fn run() -> Result<()> {
    println!("saltsolo {}", env!("CARGO_PKG_VERSION"));
    println!("  retcode passthrough: salt above {RETCODE_VERSION}");
    println!("  default bootstrap: {DEFAULT_BOOTSTRAP_URL}");

    Ok(())
}
