//! In-memory directory for tests and offline use.

use crate::directory::{DirectoryClient, DirectoryNode, DirectoryStatus};
use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::collections::HashMap;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use tailshale_core::{Result, TailshaleError};

/// A call made against a [`MemoryDirectory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCall {
    Status,
    QueryDns { name: String, qtype: String },
    WhoIs(IpAddr),
}

/// Directory backed by fixed tables
///
/// Names are answered with real DNS wire responses, so the resolver's
/// decoding path runs unchanged. Unknown names get NXDOMAIN.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    suffix: String,
    records: HashMap<String, IpAddr>,
    nodes: HashMap<IpAddr, DirectoryNode>,
    raw_dns: Option<Vec<u8>>,
    fail_status: bool,
    fail_dns: bool,
    fail_who_is: bool,
    calls: Mutex<Vec<DirectoryCall>>,
}

impl MemoryDirectory {
    /// Create an empty directory for the tailnet `suffix`
    #[must_use]
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            ..Self::default()
        }
    }

    /// Add a DNS record for `name`
    #[must_use]
    pub fn with_record(mut self, name: &str, ip: IpAddr) -> Self {
        self.records.insert(normalize(name), ip);
        self
    }

    /// Add the node owning `ip`
    #[must_use]
    pub fn with_node(mut self, ip: IpAddr, node: DirectoryNode) -> Self {
        self.nodes.insert(ip, node);
        self
    }

    /// Add a DNS record and an SSH-enabled node in one go
    #[must_use]
    pub fn with_host(self, name: &str, ip: IpAddr, host_keys: &[&str]) -> Self {
        let node = DirectoryNode {
            name: format!("{}.", normalize(name)),
            ssh_enabled: !host_keys.is_empty(),
            host_keys: host_keys.iter().map(ToString::to_string).collect(),
        };
        self.with_record(name, ip).with_node(ip, node)
    }

    /// Answer every DNS query with these bytes
    #[must_use]
    pub fn with_raw_dns(mut self, bytes: Vec<u8>) -> Self {
        self.raw_dns = Some(bytes);
        self
    }

    /// Make `status()` fail
    #[must_use]
    pub const fn fail_status(mut self) -> Self {
        self.fail_status = true;
        self
    }

    /// Make `query_dns()` fail
    #[must_use]
    pub const fn fail_dns(mut self) -> Self {
        self.fail_dns = true;
        self
    }

    /// Make `who_is()` fail
    #[must_use]
    pub const fn fail_who_is(mut self) -> Self {
        self.fail_who_is = true;
        self
    }

    /// Calls made so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<DirectoryCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: DirectoryCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn answer(&self, name: &str, qtype: &str) -> Result<Vec<u8>> {
        let proto = |e: hickory_proto::ProtoError| TailshaleError::Directory(e.to_string());

        let record_type = RecordType::from_str(&qtype.to_ascii_uppercase()).map_err(proto)?;
        let mut fqdn = Name::from_ascii(name).map_err(proto)?;
        fqdn.set_fqdn(true);

        let mut message = Message::new();
        message
            .set_message_type(MessageType::Response)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(true)
            .set_recursion_available(true)
            .add_query(Query::query(fqdn.clone(), record_type));

        match self.records.get(&normalize(name)) {
            Some(ip) => {
                let rdata = match (ip, record_type) {
                    (IpAddr::V4(v4), RecordType::A) => Some(RData::A(A(*v4))),
                    (IpAddr::V6(v6), RecordType::AAAA) => Some(RData::AAAA(AAAA(*v6))),
                    _ => None,
                };
                if let Some(rdata) = rdata {
                    message.add_answer(Record::from_rdata(fqdn, 600, rdata));
                }
            }
            None => {
                message.set_response_code(ResponseCode::NXDomain);
            }
        }

        message.to_vec().map_err(proto)
    }
}

#[async_trait]
impl DirectoryClient for MemoryDirectory {
    async fn status(&self) -> Result<DirectoryStatus> {
        self.record(DirectoryCall::Status);
        if self.fail_status {
            return Err(TailshaleError::Directory("status unavailable".to_string()));
        }
        Ok(DirectoryStatus {
            trust_suffix: self.suffix.clone(),
        })
    }

    async fn query_dns(&self, name: &str, qtype: &str) -> Result<Vec<u8>> {
        self.record(DirectoryCall::QueryDns {
            name: name.to_string(),
            qtype: qtype.to_string(),
        });
        if self.fail_dns {
            return Err(TailshaleError::Directory("dns unavailable".to_string()));
        }
        if let Some(raw) = &self.raw_dns {
            return Ok(raw.clone());
        }
        self.answer(name, qtype)
    }

    async fn who_is(&self, addr: IpAddr) -> Result<DirectoryNode> {
        self.record(DirectoryCall::WhoIs(addr));
        if self.fail_who_is {
            return Err(TailshaleError::Directory("whois unavailable".to_string()));
        }
        self.nodes
            .get(&addr)
            .cloned()
            .ok_or_else(|| TailshaleError::Directory(format!("no node owns {addr}")))
    }
}

fn normalize(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}
