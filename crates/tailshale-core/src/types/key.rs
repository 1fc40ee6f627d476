use serde::{Deserialize, Serialize};
use ssh_key::Algorithm;

/// Host key types advertised by Tailscale SSH
///
/// The declaration order is the order keys are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostKeyType {
    /// `ssh-rsa`
    Rsa,
    /// `ecdsa-sha2-nistp256` (and the other NIST curves)
    Ecdsa,
    /// `ssh-ed25519`
    Ed25519,
}

impl HostKeyType {
    /// All supported key types, in emission order
    pub const ALL: [Self; 3] = [Self::Rsa, Self::Ecdsa, Self::Ed25519];

    /// Map an OpenSSH key algorithm onto a supported type.
    ///
    /// Returns `None` for algorithms outside the set (DSA, security keys, ...).
    #[must_use]
    pub const fn from_algorithm(algorithm: &Algorithm) -> Option<Self> {
        match algorithm {
            Algorithm::Rsa { .. } => Some(Self::Rsa),
            Algorithm::Ecdsa { .. } => Some(Self::Ecdsa),
            Algorithm::Ed25519 => Some(Self::Ed25519),
            _ => None,
        }
    }

    /// Short lowercase label, as used by the CLI flags
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rsa => "rsa",
            Self::Ecdsa => "ecdsa",
            Self::Ed25519 => "ed25519",
        }
    }
}

impl std::fmt::Display for HostKeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Selects which key types end up in the known_hosts output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTypeFilter {
    /// Emit RSA keys
    pub rsa: bool,
    /// Emit ECDSA keys
    pub ecdsa: bool,
    /// Emit Ed25519 keys
    pub ed25519: bool,
}

impl Default for KeyTypeFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl KeyTypeFilter {
    /// Every key type enabled
    #[must_use]
    pub const fn all() -> Self {
        Self {
            rsa: true,
            ecdsa: true,
            ed25519: true,
        }
    }

    /// Every key type disabled
    #[must_use]
    pub const fn none() -> Self {
        Self {
            rsa: false,
            ecdsa: false,
            ed25519: false,
        }
    }

    /// Returns true if keys of this type should be emitted
    #[must_use]
    pub const fn allows(&self, key_type: HostKeyType) -> bool {
        match key_type {
            HostKeyType::Rsa => self.rsa,
            HostKeyType::Ecdsa => self.ecdsa,
            HostKeyType::Ed25519 => self.ed25519,
        }
    }

    /// Returns true if no key type is enabled
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.rsa || self.ecdsa || self.ed25519)
    }
}
