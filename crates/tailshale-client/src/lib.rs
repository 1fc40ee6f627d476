//! Directory access and host resolution for tailshale.
//!
//! This crate provides the [`DirectoryClient`] seam, the production
//! [`LocalDirectory`] backed by tailscaled, an in-memory
//! [`MemoryDirectory`], and the [`Resolver`] that turns host identifiers
//! into verified [`TailscaleHost`](tailshale_core::TailscaleHost) records.
//!
//! ```rust,ignore
//! use tailshale_client::{LocalDirectory, Resolver};
//!
//! let resolver = Resolver::new(LocalDirectory::new()).await?;
//! let host = resolver.resolve("server").await?;
//! ```

mod client;
mod config;
mod directory;
mod memory;
mod resolver;
pub mod api;

pub use client::{LocalDirectory, LocalDirectoryBuilder};
pub use config::*;
pub use directory::{DirectoryClient, DirectoryNode, DirectoryStatus};
pub use memory::{DirectoryCall, MemoryDirectory};
pub use resolver::{DirectorySession, Resolver};
pub use tailshale_core::{Result, TailshaleError};
