use std::collections::BTreeMap;
use std::net::IpAddr;

use ssh_key::PublicKey;

use super::HostKeyType;
use crate::error::{Result, TailshaleError};
use crate::mesh;

/// A tailnet node whose address has been verified and whose SSH host keys
/// have been parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailscaleHost {
    name: String,
    ip: IpAddr,
    keys: BTreeMap<HostKeyType, PublicKey>,
}

impl TailscaleHost {
    /// Build a host record for a tailnet address.
    ///
    /// Fails with [`TailshaleError::NotAMeshNode`] when `ip` is outside the
    /// tailnet ranges. A trailing dot on `name` is dropped.
    pub fn new(name: impl Into<String>, ip: IpAddr) -> Result<Self> {
        if !mesh::is_tailnet_addr(ip) {
            return Err(TailshaleError::NotAMeshNode { addr: ip });
        }

        let mut name = name.into();
        if name.ends_with('.') {
            name.pop();
        }

        Ok(Self {
            name,
            ip,
            keys: BTreeMap::new(),
        })
    }

    /// Canonical node name, without trailing dot
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tailnet address of the node
    #[must_use]
    pub const fn ip(&self) -> IpAddr {
        self.ip
    }

    /// Host keys by type, in emission order
    #[must_use]
    pub const fn keys(&self) -> &BTreeMap<HostKeyType, PublicKey> {
        &self.keys
    }

    /// Returns true if the node advertises at least one usable host key
    #[must_use]
    pub fn has_keys(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Store a key under its type, returning the key it replaced.
    ///
    /// Keys whose algorithm is not one of [`HostKeyType`] are handed back in
    /// `Err` untouched.
    pub fn insert_key(
        &mut self,
        key: PublicKey,
    ) -> std::result::Result<Option<PublicKey>, PublicKey> {
        match HostKeyType::from_algorithm(&key.algorithm()) {
            Some(key_type) => Ok(self.keys.insert(key_type, key)),
            None => Err(key),
        }
    }

    /// Builder-style variant of [`insert_key`](Self::insert_key) that drops
    /// unsupported keys
    #[must_use]
    pub fn with_key(mut self, key: PublicKey) -> Self {
        let _ = self.insert_key(key);
        self
    }

    /// Leftmost label of the node name (`test` for `test.example.ts.net`)
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.name.split('.').next().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ED25519: &str =
        "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAILiup8poNplQGlzXuLDbn2Tz+/L3WxAwimSq7e+eTKjp testkey";
    const ED25519_OTHER: &str =
        "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIGOrooKfauC/IqxF04GOdDptA56JDEQSbbMbLr9kQE0b";

    #[test]
    fn test_rejects_non_tailnet_address() {
        let err = TailscaleHost::new("test.example.ts.net", "192.168.0.1".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, TailshaleError::NotAMeshNode { .. }));
    }

    #[test]
    fn test_name_normalization() {
        let host =
            TailscaleHost::new("test.example.ts.net.", "100.100.100.100".parse().unwrap()).unwrap();
        assert_eq!(host.name(), "test.example.ts.net");
        assert_eq!(host.short_name(), "test");
        assert!(!host.has_keys());
    }

    #[test]
    fn test_last_key_per_type_wins() {
        let first = PublicKey::from_openssh(ED25519).unwrap();
        let second = PublicKey::from_openssh(ED25519_OTHER).unwrap();

        let mut host =
            TailscaleHost::new("test.example.ts.net", "100.100.100.100".parse().unwrap()).unwrap();
        assert_eq!(host.insert_key(first.clone()).unwrap(), None);
        assert_eq!(host.insert_key(second.clone()).unwrap(), Some(first));

        assert_eq!(host.keys().len(), 1);
        assert_eq!(host.keys().get(&HostKeyType::Ed25519), Some(&second));
    }
}
