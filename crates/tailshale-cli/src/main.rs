//! tailshale - SSH known_hosts for Tailscale SSH hosts
//!
//! Hooks into OpenSSH's `KnownHostsCommand` so tailnet hosts are trusted
//! through the keys Tailscale already knows.

use std::process::ExitCode;

use anyhow::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tailshale_cli::run().await
}
