//! Human-facing messages on stderr.
//!
//! stdout belongs to `known_hosts` lines, so everything else goes here.

use colored::Colorize;
use std::path::Path;
use tailshale::ssh_config::MergeOutcome;

/// Print a diagnostic.
pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

/// Describe what a config merge did.
#[must_use]
pub fn describe_outcome(outcome: MergeOutcome, path: &Path) -> String {
    let path = path.display().to_string();
    match outcome {
        MergeOutcome::Created => format!("{} {}", "Created".green().bold(), path.cyan()),
        MergeOutcome::Updated => format!("{} {}", "Updated".green().bold(), path.cyan()),
        MergeOutcome::Removed => {
            format!("{} tailshale block from {}", "Removed".green().bold(), path.cyan())
        }
        MergeOutcome::Unchanged => format!("{} is already up to date", path.cyan()),
        MergeOutcome::Missing => format!("{} does not exist, nothing to do", path.cyan()),
    }
}

/// Print what a config merge did.
pub fn outcome(outcome: MergeOutcome, path: &Path) {
    eprintln!("{}", describe_outcome(outcome, path));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_outcome() {
        colored::control::set_override(false);
        let path = Path::new("/home/me/.ssh/config");

        assert_eq!(
            describe_outcome(MergeOutcome::Created, path),
            "Created /home/me/.ssh/config"
        );
        assert_eq!(
            describe_outcome(MergeOutcome::Unchanged, path),
            "/home/me/.ssh/config is already up to date"
        );
        assert!(describe_outcome(MergeOutcome::Missing, path).contains("nothing to do"));
    }
}
