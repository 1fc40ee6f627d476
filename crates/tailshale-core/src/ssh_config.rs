//! Managed block inside the user's SSH client config.
//!
//! The block is delimited by two marker lines and is the only part of the
//! file this tool ever changes:
//!
//! ```text
//! Host example.com
//!   User me
//! ###### Start Tailshale ######
//! # Tailshale SSH configuration
//! ...
//! ###### End Tailshale ######
//! Host other.com
//! ```
//!
//! Text is handled as the lines produced by splitting on `\n`, so parsing
//! and serializing are exact inverses and everything outside the block is
//! reproduced byte for byte.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, TailshaleError};

/// First line of the managed block
pub const CONFIG_START: &str = "###### Start Tailshale ######";

/// Last line of the managed block
pub const CONFIG_END: &str = "###### End Tailshale ######";

/// Seconds the `Match exec` probe may spend deciding whether a host runs
/// Tailscale SSH
pub const CHECK_TIMEOUT_SECS: u64 = 5;

/// Lines of the managed block for the given executable.
///
/// `exe_path` is inserted verbatim; paths containing spaces are not quoted.
#[must_use]
pub fn managed_block(exe_path: &str) -> Vec<String> {
    vec![
        "# Tailshale SSH configuration".to_string(),
        format!("# Managed by `{exe_path} configure`; remove with `{exe_path} configure --clean`"),
        format!("Match exec \"{exe_path} known-hosts --check %h --timeout {CHECK_TIMEOUT_SECS}\""),
        format!("    KnownHostsCommand {exe_path} known-hosts %h"),
        "Match all".to_string(),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Beginning,
    Config,
    End,
}

/// An SSH config file split around the managed block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SshConfig {
    beginning: Vec<String>,
    config: Vec<String>,
    end: Vec<String>,
    has_markers: bool,
    // Marker lines that ended in `\r`
    start_cr: bool,
    end_cr: bool,
    crlf: bool,
}

impl SshConfig {
    /// Split config text into its three segments.
    ///
    /// Marker lines only switch state from the state that expects them; a
    /// stray marker elsewhere is kept as ordinary content. A start marker
    /// that is never closed is an error.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_at(text, Path::new("<input>"))
    }

    fn parse_at(text: &str, path: &Path) -> Result<Self> {
        let mut doc = Self {
            crlf: text.contains("\r\n"),
            ..Self::default()
        };
        let mut state = ScanState::Beginning;
        let mut start_line = 0;

        for (idx, line) in text.split('\n').enumerate() {
            let bare = line.strip_suffix('\r').unwrap_or(line);
            match (state, bare) {
                (ScanState::Beginning, CONFIG_START) => {
                    state = ScanState::Config;
                    start_line = idx + 1;
                    doc.start_cr = bare.len() != line.len();
                }
                (ScanState::Config, CONFIG_END) => {
                    state = ScanState::End;
                    doc.end_cr = bare.len() != line.len();
                }
                (ScanState::Beginning, _) => doc.beginning.push(line.to_string()),
                (ScanState::Config, _) => doc.config.push(line.to_string()),
                (ScanState::End, _) => doc.end.push(line.to_string()),
            }
        }

        if state == ScanState::Config {
            return Err(TailshaleError::UnterminatedBlock {
                path: path.to_path_buf(),
                line: start_line,
            });
        }

        doc.has_markers = state == ScanState::End;
        Ok(doc)
    }

    /// Read and parse a config file. A missing file yields `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse_at(&text, path).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TailshaleError::config_io(path, e)),
        }
    }

    /// Content before the managed block (the whole file if there is none)
    #[must_use]
    pub fn beginning(&self) -> String {
        self.beginning.join("\n")
    }

    /// Body of the managed block, empty if there is none
    #[must_use]
    pub fn config(&self) -> String {
        self.config.join("\n")
    }

    /// Content after the managed block
    #[must_use]
    pub fn end(&self) -> String {
        self.end.join("\n")
    }

    /// Returns true if the parsed text contained a start/end marker pair
    #[must_use]
    pub const fn has_block(&self) -> bool {
        self.has_markers
    }

    /// Replace the block body with the one for `exe_path`.
    ///
    /// A new block goes at the end of the file; the file's final newline
    /// moves after the end marker. Files using CRLF get CRLF block lines.
    pub fn set_config(&mut self, exe_path: &str) {
        if !self.has_markers {
            if self.beginning.last().is_some_and(String::is_empty) {
                self.beginning.pop();
            }
            self.end = vec![String::new()];
            self.has_markers = true;
            self.start_cr = self.crlf;
            self.end_cr = self.crlf;
        }

        let mut block = managed_block(exe_path);
        if self.crlf {
            for line in &mut block {
                line.push('\r');
            }
        }
        self.config = block;
    }

    /// Drop the block body; serialization then omits the markers too.
    pub fn clear_config(&mut self) {
        self.config.clear();
    }
}

impl fmt::Display for SshConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = marker(CONFIG_START, self.start_cr);
        let end = marker(CONFIG_END, self.end_cr);

        let mut lines: Vec<&str> = self.beginning.iter().map(String::as_str).collect();
        if !self.config.is_empty() {
            lines.push(&start);
            lines.extend(self.config.iter().map(String::as_str));
            lines.push(&end);
        }
        lines.extend(self.end.iter().map(String::as_str));
        f.write_str(&lines.join("\n"))
    }
}

fn marker(text: &str, cr: bool) -> String {
    if cr {
        format!("{text}\r")
    } else {
        text.to_string()
    }
}

/// What a merge did to the file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The file did not exist and was created
    Created,
    /// The file was rewritten
    Updated,
    /// The managed block was removed
    Removed,
    /// The file already had the wanted content and was not touched
    Unchanged,
    /// The file does not exist and nothing was done
    Missing,
}

/// Write or refresh the managed block for `exe_path` in the config at `path`.
///
/// Creates the file (mode 0600) and its directory (mode 0700) when needed.
/// Running it twice leaves the file unchanged the second time.
pub fn write_managed_block(path: &Path, exe_path: &str) -> Result<MergeOutcome> {
    let existing = SshConfig::load(path)?;
    let created = existing.is_none();
    let original = existing.as_ref().map(ToString::to_string);

    let mut doc = existing.unwrap_or_default();
    doc.set_config(exe_path);
    let content = doc.to_string();

    if original.as_deref() == Some(content.as_str()) {
        debug!(path = %path.display(), "managed block already up to date");
        return Ok(MergeOutcome::Unchanged);
    }

    write_file(path, &content)?;
    info!(path = %path.display(), created, "wrote managed block");

    Ok(if created {
        MergeOutcome::Created
    } else {
        MergeOutcome::Updated
    })
}

/// Remove the managed block from the config at `path`.
///
/// A missing file or a file without a block is left alone.
pub fn clean_managed_block(path: &Path) -> Result<MergeOutcome> {
    let Some(mut doc) = SshConfig::load(path)? else {
        debug!(path = %path.display(), "ssh config does not exist, nothing to clean");
        return Ok(MergeOutcome::Missing);
    };

    if !doc.has_block() {
        debug!(path = %path.display(), "no managed block present");
        return Ok(MergeOutcome::Unchanged);
    }

    doc.clear_config();
    write_file(path, &doc.to_string())?;
    info!(path = %path.display(), "removed managed block");

    Ok(MergeOutcome::Removed)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            create_private_dir(parent).map_err(|e| TailshaleError::config_io(parent, e))?;
        }
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .map_err(|e| TailshaleError::config_io(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| TailshaleError::config_io(path, e))
}

fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}

/// Default location of the user's SSH client config
#[must_use]
pub fn default_ssh_config_path(home: &Path) -> PathBuf {
    home.join(".ssh").join("config")
}
