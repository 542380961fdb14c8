//! Listener traits for received notifications.

use std::net::SocketAddr;

use bytes::Bytes;

use crate::error::Error;
use crate::pdu::{TrapV1Pdu, TrapV2Pdu};
use crate::version::Version;

/// Where a received PDU came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Datagram source address.
    pub source: SocketAddr,
    /// Message version.
    pub version: Version,
    /// Message community string.
    pub community: Bytes,
}

/// Receives SNMPv1 Trap PDUs.
pub trait TrapV1Listener: Send + Sync {
    fn on_trap_v1(&self, origin: &Origin, trap: &TrapV1Pdu);
}

/// Receives SNMPv2-Trap PDUs.
pub trait TrapV2Listener: Send + Sync {
    fn on_trap_v2(&self, origin: &Origin, trap: &TrapV2Pdu);
}

/// Receives InformRequest PDUs.
///
/// The receiver acknowledges the inform itself (unless configured not to);
/// listeners only observe it.
pub trait InformRequestListener: Send + Sync {
    fn on_inform(&self, origin: &Origin, inform: &TrapV2Pdu);
}

impl<F> TrapV1Listener for F
where
    F: Fn(&Origin, &TrapV1Pdu) + Send + Sync,
{
    fn on_trap_v1(&self, origin: &Origin, trap: &TrapV1Pdu) {
        self(origin, trap)
    }
}

impl<F> TrapV2Listener for F
where
    F: Fn(&Origin, &TrapV2Pdu) + Send + Sync,
{
    fn on_trap_v2(&self, origin: &Origin, trap: &TrapV2Pdu) {
        self(origin, trap)
    }
}

impl<F> InformRequestListener for F
where
    F: Fn(&Origin, &TrapV2Pdu) + Send + Sync,
{
    fn on_inform(&self, origin: &Origin, inform: &TrapV2Pdu) {
        self(origin, inform)
    }
}

/// Destination for per-datagram failures in the receive loop.
///
/// `source` is `None` when the failure happened before a datagram was read
/// (a socket error).
pub trait ErrorSink: Send + Sync {
    fn report(&self, source: Option<SocketAddr>, error: &Error);
}

impl<F> ErrorSink for F
where
    F: Fn(Option<SocketAddr>, &Error) + Send + Sync,
{
    fn report(&self, source: Option<SocketAddr>, error: &Error) {
        self(source, error)
    }
}

/// Logs every reported error at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, source: Option<SocketAddr>, error: &Error) {
        match source {
            Some(source) => tracing::warn!(
                target: "snmp_trap::receiver",
                { snmp.source = %source, error = %error },
                "dropped datagram"
            ),
            None => tracing::warn!(
                target: "snmp_trap::receiver",
                { error = %error },
                "receive failed"
            ),
        }
    }
}
