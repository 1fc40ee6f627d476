//! Tailnet address ranges.
//!
//! Every Tailscale node gets an address from the CGNAT block `100.64.0.0/10`
//! and from the ULA block `fd7a:115c:a1e0::/48`. Anything outside these is
//! not a tailnet node, no matter what DNS says.

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Tailscale IPv4 range (CGNAT)
pub const TAILNET_V4_CIDR: &str = "100.64.0.0/10";

/// Tailscale IPv6 range (ULA)
pub const TAILNET_V6_CIDR: &str = "fd7a:115c:a1e0::/48";

const TAILNET_V4: Ipv4Net = Ipv4Net::new_assert(Ipv4Addr::new(100, 64, 0, 0), 10);
const TAILNET_V6: Ipv6Net =
    Ipv6Net::new_assert(Ipv6Addr::new(0xfd7a, 0x115c, 0xa1e0, 0, 0, 0, 0, 0), 48);

/// Both tailnet ranges.
#[must_use]
pub const fn tailnet_ranges() -> [IpNet; 2] {
    [IpNet::V4(TAILNET_V4), IpNet::V6(TAILNET_V6)]
}

/// Check if an address belongs to the tailnet.
///
/// IPv4-mapped IPv6 addresses are checked against the IPv4 range.
#[must_use]
pub fn is_tailnet_addr(ip: IpAddr) -> bool {
    let ip = match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(ip, IpAddr::V4),
        IpAddr::V4(_) => ip,
    };
    tailnet_ranges().iter().any(|net| net.contains(&ip))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_tailnet_addresses() {
        assert!(is_tailnet_addr(addr("100.64.0.5")));
        assert!(is_tailnet_addr(addr("100.100.100.100")));
        assert!(is_tailnet_addr(addr("100.127.255.255")));
        assert!(is_tailnet_addr(addr("fd7a:115c:a1e0::1")));
        assert!(is_tailnet_addr(addr("fd7a:115c:a1e0:ab12:4843:cd96:6258:b240")));
        assert!(is_tailnet_addr(addr("::ffff:100.64.0.5")));
    }

    #[test]
    fn test_non_tailnet_addresses() {
        assert!(!is_tailnet_addr(addr("192.168.0.1")));
        assert!(!is_tailnet_addr(addr("8.8.8.8")));
        assert!(!is_tailnet_addr(addr("100.63.255.255")));
        assert!(!is_tailnet_addr(addr("100.128.0.0")));
        assert!(!is_tailnet_addr(addr("fd7a:115c:a1e1::1")));
        assert!(!is_tailnet_addr(addr("::1")));
    }

    #[test]
    fn test_ranges_match_cidr_strings() {
        let [v4, v6] = tailnet_ranges();
        assert_eq!(v4.to_string(), TAILNET_V4_CIDR);
        assert_eq!(v6.to_string(), TAILNET_V6_CIDR);
    }
}
