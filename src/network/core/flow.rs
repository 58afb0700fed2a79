//! Flow metadata and classification verdicts.

use std::fmt;
use std::net::Ipv4Addr;

/// The four-tuple identifying one outbound IPv4 transport flow.
///
/// Addresses and ports arrive from the host as fixed-width integers in
/// host byte order; nothing here is retained across invocations.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FlowTuple {
    pub local_addr: u32,
    pub remote_addr: u32,
    pub local_port: u16,
    pub remote_port: u16,
}

impl FlowTuple {
    pub fn new(local_addr: u32, remote_addr: u32, local_port: u16, remote_port: u16) -> Self {
        Self {
            local_addr,
            remote_addr,
            local_port,
            remote_port,
        }
    }

    /// Convenience constructor for flows where only the remote port
    /// matters to the decision.
    pub fn to_remote_port(remote_port: u16) -> Self {
        Self::new(0, 0, 0, remote_port)
    }
}

impl fmt::Display for FlowTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} -> {}:{}",
            Ipv4Addr::from(self.local_addr),
            self.local_port,
            Ipv4Addr::from(self.remote_addr),
            self.remote_port
        )
    }
}

/// The decision returned to the host for one packet.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Forward the packet, possibly after payload rewriting
    Permit,
    /// Drop the packet
    Block,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Permit => write!(f, "PERMIT"),
            Verdict::Block => write!(f, "BLOCK"),
        }
    }
}
