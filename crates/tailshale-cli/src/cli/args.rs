//! Command-line argument definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// SSH known_hosts for your tailnet
///
/// Lets OpenSSH trust Tailscale SSH hosts through the host keys the
/// tailnet already knows, instead of trust-on-first-use.
///
/// Run `tailshale configure` once to hook it into ~/.ssh/config.
#[derive(Parser, Debug)]
#[command(name = "tailshale")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// SSH client config to manage (default: ~/.ssh/config)
    #[arg(long, env = "TAILSHALE_SSH_CONFIG", global = true, value_name = "PATH")]
    pub ssh_config: Option<PathBuf>,

    /// tailshale config file
    #[arg(long, env = "TAILSHALE_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print known_hosts lines for tailnet hosts
    KnownHosts(KnownHostsArgs),

    /// Add or remove the tailshale block in the SSH config
    Configure(ConfigureArgs),
}

#[derive(Args, Debug)]
pub struct KnownHostsArgs {
    /// Host names or tailnet addresses
    #[arg(required = true, value_name = "HOST")]
    pub hosts: Vec<String>,

    /// Only report, via the exit code, whether the host runs Tailscale SSH
    #[arg(long)]
    pub check: bool,

    /// Include RSA keys (`--rsa=false` to skip)
    #[arg(
        long,
        action = ArgAction::Set,
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub rsa: bool,

    /// Include ECDSA keys (`--ecdsa=false` to skip)
    #[arg(
        long,
        action = ArgAction::Set,
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub ecdsa: bool,

    /// Include Ed25519 keys (`--ed25519=false` to skip)
    #[arg(
        long,
        action = ArgAction::Set,
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub ed25519: bool,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Args, Debug)]
pub struct ConfigureArgs {
    /// Remove the tailshale block instead of writing it
    #[arg(long)]
    pub clean: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_key_type_flags() {
        let cli = Cli::parse_from(["tailshale", "known-hosts", "--rsa=false", "--ecdsa", "host"]);
        let Commands::KnownHosts(args) = cli.command else {
            panic!("expected known-hosts");
        };
        assert!(!args.rsa);
        assert!(args.ecdsa);
        assert!(args.ed25519);
        assert_eq!(args.hosts, vec!["host"]);
    }

    #[test]
    fn test_check_with_timeout() {
        let cli = Cli::parse_from([
            "tailshale",
            "known-hosts",
            "--check",
            "server",
            "--timeout",
            "5",
        ]);
        let Commands::KnownHosts(args) = cli.command else {
            panic!("expected known-hosts");
        };
        assert!(args.check);
        assert_eq!(args.timeout, Some(5));
    }

    #[test]
    fn test_hosts_required() {
        assert!(Cli::try_parse_from(["tailshale", "known-hosts"]).is_err());
    }

    #[test]
    fn test_configure_clean() {
        let cli = Cli::parse_from(["tailshale", "--ssh-config", "/tmp/cfg", "configure", "--clean"]);
        assert_eq!(cli.ssh_config, Some(PathBuf::from("/tmp/cfg")));
        assert!(matches!(cli.command, Commands::Configure(ConfigureArgs { clean: true })));
    }
}
