//! `tailshale known-hosts` - known_hosts lines for tailnet hosts.
//!
//! OpenSSH runs this as `KnownHostsCommand`, so stdout carries nothing but
//! known_hosts lines.

use anyhow::{bail, Result};
use std::process::ExitCode;
use std::time::Duration;
use tailshale::{known_hosts, KeyTypeFilter, Resolver, TailshaleError};
use tracing::debug;

use super::Context;
use crate::cli::args::KnownHostsArgs;
use crate::output;

pub async fn execute(ctx: Context, args: KnownHostsArgs) -> Result<ExitCode> {
    if args.check && args.hosts.len() != 1 {
        bail!("--check takes exactly one host, got {}", args.hosts.len());
    }

    let filter = KeyTypeFilter {
        rsa: args.rsa,
        ecdsa: args.ecdsa,
        ed25519: args.ed25519,
    };

    let Some(secs) = args.timeout else {
        return lookup(&ctx, &args, filter).await;
    };

    match tokio::time::timeout(Duration::from_secs(secs), lookup(&ctx, &args, filter)).await {
        Ok(result) => result,
        Err(_) if args.check => {
            debug!(secs, "check timed out");
            Ok(ExitCode::FAILURE)
        }
        Err(_) => Err(TailshaleError::Timeout(secs).into()),
    }
}

async fn lookup(ctx: &Context, args: &KnownHostsArgs, filter: KeyTypeFilter) -> Result<ExitCode> {
    let resolver = match Resolver::new(ctx.directory()).await {
        Ok(resolver) => resolver,
        Err(e) if args.check => {
            debug!(error = %e, "cannot reach tailscale");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    if args.check {
        let enabled = resolver.check(&args.hosts[0]).await;
        return Ok(if enabled {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let hosts = resolver.resolve_all(&args.hosts).await?;
    match known_hosts::emit(&hosts, filter) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(TailshaleError::NoHostKeys) => {
            output::error("no host keys found");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}
