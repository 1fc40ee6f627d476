//! Endpoints of the local tailscaled.

mod dns;
mod status;
mod whois;

pub use dns::DnsApi;
pub use status::StatusApi;
pub use whois::WhoIsApi;
