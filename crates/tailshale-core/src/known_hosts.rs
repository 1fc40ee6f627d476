//! Rendering of `known_hosts` lines for resolved tailnet nodes.
//!
//! Each key becomes one line of the form
//!
//! ```text
//! 100.100.100.100,test.example.ts.net.,test.example.ts.net,test ssh-ed25519 AAAA...
//! ```
//!
//! so the entry matches whichever spelling of the host the user typed.

use ssh_key::PublicKey;
use tracing::debug;

use crate::error::{Result, TailshaleError};
use crate::types::{KeyTypeFilter, TailscaleHost};

/// Hostname patterns a node's keys are valid for.
///
/// Address, FQDN with and without trailing dot, and the short name.
#[must_use]
pub fn host_patterns(host: &TailscaleHost) -> Vec<String> {
    vec![
        host.ip().to_string(),
        format!("{}.", host.name()),
        host.name().to_string(),
        host.short_name().to_string(),
    ]
}

/// Render a single known_hosts line.
///
/// The key comment is not part of the output.
pub fn line(patterns: &[String], key: &PublicKey) -> Result<String> {
    let key = PublicKey::new(key.key_data().clone(), "");
    let encoded = key
        .to_openssh()
        .map_err(|e| TailshaleError::MalformedHostKey {
            name: patterns.first().cloned().unwrap_or_default(),
            reason: e.to_string(),
        })?;

    Ok(format!("{} {}", patterns.join(","), encoded))
}

/// Render known_hosts lines for every host and every enabled key type.
///
/// Lines keep host order, then key order within a host. An empty result is
/// [`TailshaleError::NoHostKeys`].
pub fn emit(hosts: &[TailscaleHost], filter: KeyTypeFilter) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    for host in hosts {
        let patterns = host_patterns(host);
        for (key_type, key) in host.keys() {
            if !filter.allows(*key_type) {
                debug!(host = host.name(), key_type = %key_type, "key type filtered out");
                continue;
            }
            lines.push(line(&patterns, key)?);
        }
    }

    if lines.is_empty() {
        return Err(TailshaleError::NoHostKeys);
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HostKeyType;

    const ED25519: &str =
        "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAILiup8poNplQGlzXuLDbn2Tz+/L3WxAwimSq7e+eTKjp testkey";
    const ECDSA: &str = "ecdsa-sha2-nistp256 AAAAE2VjZHNhLXNoYTItbmlzdHAyNTYAAAAIbmlzdHAyNTYAAABBBAmzsWSoGAD500oHWoBBsF5zX3EmpRcsJlKHVAaoUcW9Y+yAx257WPzua3SbF7VJ7+xE2oxCSmoVLzHuatPPS9c=";
    const RSA: &str = "ssh-rsa AAAAB3NzaC1yc2EAAAADAQABAAABAQCUBdUmBGE43iPTeqxUaxCq+KvPDLBFnsKH9W7cMr/wP4R1pJnoM5ENlWGA538ntUvcLGi59Lm9RBdqzG3W2fZtuOwY/rIjOOwpZgXGfHm5WjK0xvy4XnabNqjxwaP2lUJFIlscBf7S0WGV3o+IQTDUv8Pl5wHLz78kzJlxd33d3CyTIjVB1NbDX1B3O5RBbReTdR2BcEkK7TbVbUJZydXABznWp+n2fhULCXHkUeSWWFgQtLa89kCmMGRwabut6JTR+BQk//AKOmX8fLRKxFv0j58JdB5wghliW/ASPS5ayfEkOnEavlsVfQwgw1YQEWnb+oxirxMnzrYEAM6Feh3X";

    fn key(s: &str) -> PublicKey {
        PublicKey::from_openssh(s).unwrap()
    }

    fn test_host() -> TailscaleHost {
        TailscaleHost::new("test.example.ts.net", "100.100.100.100".parse().unwrap())
            .unwrap()
            .with_key(key(ED25519))
            .with_key(key(ECDSA))
            .with_key(key(RSA))
    }

    #[test]
    fn test_host_patterns() {
        let patterns = host_patterns(&test_host());
        assert_eq!(patterns.len(), 4);
        assert!(patterns.contains(&"100.100.100.100".to_string()));
        assert!(patterns.contains(&"test.example.ts.net.".to_string()));
        assert!(patterns.contains(&"test.example.ts.net".to_string()));
        assert!(patterns.contains(&"test".to_string()));
    }

    #[test]
    fn test_line_drops_comment() {
        let patterns = host_patterns(&test_host());
        let line = line(&patterns, &key(ED25519)).unwrap();
        assert_eq!(
            line,
            "100.100.100.100,test.example.ts.net.,test.example.ts.net,test \
             ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAILiup8poNplQGlzXuLDbn2Tz+/L3WxAwimSq7e+eTKjp"
        );
    }

    #[test]
    fn test_emit_all_types_in_key_order() {
        let lines = emit(&[test_host()], KeyTypeFilter::all()).unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(" ssh-rsa "));
        assert!(lines[1].contains(" ecdsa-sha2-nistp256 "));
        assert!(lines[2].contains(" ssh-ed25519 "));
        assert!(lines[1].ends_with(ECDSA.split(' ').nth(1).unwrap()));
    }

    #[test]
    fn test_emit_respects_filter() {
        let filter = KeyTypeFilter {
            rsa: false,
            ecdsa: false,
            ..KeyTypeFilter::all()
        };
        let lines = emit(&[test_host()], filter).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(HostKeyType::Ed25519.label()));
    }

    #[test]
    fn test_emit_keeps_host_order() {
        let other = TailscaleHost::new("other.example.ts.net", "100.64.0.7".parse().unwrap())
            .unwrap()
            .with_key(key(ED25519));
        let lines = emit(&[other, test_host()], KeyTypeFilter::all()).unwrap();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("100.64.0.7,other.example.ts.net.,"));
        assert!(lines[1].starts_with("100.100.100.100,"));
    }

    #[test]
    fn test_emit_empty_is_error() {
        let err = emit(&[test_host()], KeyTypeFilter::none()).unwrap_err();
        assert!(matches!(err, TailshaleError::NoHostKeys));

        let err = emit(&[], KeyTypeFilter::all()).unwrap_err();
        assert!(matches!(err, TailshaleError::NoHostKeys));
    }
}
