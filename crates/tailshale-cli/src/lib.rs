//! # tailshale-cli
//!
//! Command-line interface that feeds Tailscale SSH host keys to OpenSSH.
//!
//! ## Commands
//!
//! - **known-hosts**: print `known_hosts` lines for tailnet hosts, or probe
//!   a single host with `--check`
//! - **configure**: install or remove the `KnownHostsCommand` block in the
//!   SSH client config

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
