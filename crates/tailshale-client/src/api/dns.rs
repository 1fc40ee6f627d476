//! MagicDNS queries over UDP.

use crate::LocalDirectory;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use tailshale_core::{Result, TailshaleError};
use tokio::net::UdpSocket;
use tracing::trace;

/// Largest response we accept; MagicDNS answers are small
const MAX_RESPONSE: usize = 4096;

/// DNS queries against the MagicDNS resolver
pub struct DnsApi<'a> {
    client: &'a LocalDirectory,
}

impl<'a> DnsApi<'a> {
    pub(crate) fn new(client: &'a LocalDirectory) -> Self {
        Self { client }
    }

    /// Send one query and return the raw wire-format response
    pub async fn query(&self, name: &str, qtype: &str) -> Result<Vec<u8>> {
        let server = self.client.dns_server();
        let id = query_id();
        let request = build_query(id, name, qtype)?;

        trace!(%server, name, qtype, id, "sending DNS query");

        self.client
            .with_timeout(async {
                let bind: SocketAddr = if server.is_ipv4() {
                    (Ipv4Addr::UNSPECIFIED, 0).into()
                } else {
                    (Ipv6Addr::UNSPECIFIED, 0).into()
                };
                let socket = UdpSocket::bind(bind).await.map_err(dns_io)?;
                socket.connect(server).await.map_err(dns_io)?;
                socket.send(&request).await.map_err(dns_io)?;

                let mut buf = vec![0u8; MAX_RESPONSE];
                loop {
                    let len = socket.recv(&mut buf).await.map_err(dns_io)?;
                    // Ignore stray datagrams for other queries
                    if len >= 2 && u16::from_be_bytes([buf[0], buf[1]]) == id {
                        buf.truncate(len);
                        return Ok(buf);
                    }
                }
            })
            .await
    }
}

/// Encode a recursive query for `name`
pub(crate) fn build_query(id: u16, name: &str, qtype: &str) -> Result<Vec<u8>> {
    let invalid = |e: hickory_proto::ProtoError| TailshaleError::ResolutionFailed {
        host: name.to_string(),
        reason: e.to_string(),
    };

    let record_type = RecordType::from_str(&qtype.to_ascii_uppercase()).map_err(invalid)?;
    let mut fqdn = Name::from_ascii(name).map_err(invalid)?;
    fqdn.set_fqdn(true);

    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Query::query(fqdn, record_type));

    message.to_vec().map_err(invalid)
}

#[allow(clippy::cast_possible_truncation)]
fn query_id() -> u16 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    (nanos ^ std::process::id()) as u16
}

fn dns_io(e: std::io::Error) -> TailshaleError {
    TailshaleError::Directory(format!("MagicDNS query failed: {e}"))
}
