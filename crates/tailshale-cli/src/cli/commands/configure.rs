//! `tailshale configure` - manage the block in the SSH client config.

use anyhow::{Context as _, Result};
use std::process::ExitCode;
use tailshale::ssh_config;

use super::Context;
use crate::cli::args::ConfigureArgs;
use crate::output;

pub fn execute(ctx: &Context, args: &ConfigureArgs) -> Result<ExitCode> {
    let path = &ctx.ssh_config;

    let outcome = if args.clean {
        ssh_config::clean_managed_block(path)
            .with_context(|| format!("failed to clean {}", path.display()))?
    } else {
        let exe = std::env::current_exe()
            .context("could not determine the path of the tailshale executable")?;
        ssh_config::write_managed_block(path, &exe.to_string_lossy())
            .with_context(|| format!("failed to configure {}", path.display()))?
    };

    output::outcome(outcome, path);
    Ok(ExitCode::SUCCESS)
}
