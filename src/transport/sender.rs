//! Trap and inform senders.

use std::marker::PhantomData;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use bytes::Bytes;
use tokio::net::UdpSocket;

use super::TRAP_PORT;
use crate::error::{Error, Result};
use crate::message::Message;
use crate::oid::Oid;
use crate::pdu::{Pdu, TrapV1Pdu, TrapV2Pdu};
use crate::request_id::RequestIdGenerator;
use crate::util;
use crate::varbind::VarBind;
use crate::version::Version;

/// Builder for [`TrapSender`] and [`InformSender`].
///
/// ```rust,no_run
/// use snmp_trap::TrapSender;
///
/// # async fn example() -> snmp_trap::Result<()> {
/// let sender = TrapSender::builder()
///     .community("monitoring")
///     .port(1162)
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct SenderBuilder<S> {
    bind: String,
    port: u16,
    community: Bytes,
    request_ids: Option<Arc<RequestIdGenerator>>,
    _sender: PhantomData<fn() -> S>,
}

impl<S> SenderBuilder<S> {
    fn new() -> Self {
        Self {
            bind: "0.0.0.0:0".to_string(),
            port: TRAP_PORT,
            community: Bytes::from_static(b"public"),
            request_ids: None,
            _sender: PhantomData,
        }
    }

    /// Local address to send from (default `0.0.0.0:0`).
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.bind = addr.into();
        self
    }

    /// Destination port (default 162).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Community string (default `public`).
    pub fn community(mut self, community: impl Into<Bytes>) -> Self {
        self.community = community.into();
        self
    }

    /// Share a request-id counter with other senders.
    pub fn request_ids(mut self, ids: Arc<RequestIdGenerator>) -> Self {
        self.request_ids = Some(ids);
        self
    }

    async fn build_core(self) -> Result<SenderCore> {
        let socket = util::bind(&self.bind)?;
        let local_addr = socket.local_addr().map_err(|e| Error::io(None, e))?;
        tracing::debug!(
            target: "snmp_trap::transport",
            { snmp.local_addr = %local_addr, snmp.port = self.port },
            "sender bound"
        );
        Ok(SenderCore {
            socket,
            local_addr,
            port: self.port,
            community: self.community,
            request_ids: self.request_ids.unwrap_or_default(),
        })
    }
}

impl SenderBuilder<TrapSender> {
    /// Bind the socket and build the sender.
    pub async fn build(self) -> Result<TrapSender> {
        Ok(TrapSender {
            inner: Arc::new(self.build_core().await?),
        })
    }
}

impl SenderBuilder<InformSender> {
    /// Bind the socket and build the sender.
    pub async fn build(self) -> Result<InformSender> {
        Ok(InformSender {
            inner: Arc::new(self.build_core().await?),
        })
    }
}

struct SenderCore {
    socket: UdpSocket,
    local_addr: SocketAddr,
    port: u16,
    community: Bytes,
    request_ids: Arc<RequestIdGenerator>,
}

impl SenderCore {
    async fn send(&self, target: SocketAddr, msg: &Message) -> Result<()> {
        let data = msg.encode();
        tracing::trace!(
            target: "snmp_trap::transport",
            { snmp.target = %target, snmp.bytes = data.len(), pdu = msg.pdu.kind_name() },
            "UDP send"
        );
        self.socket
            .send_to(&data, target)
            .await
            .map_err(|e| Error::io(Some(target), e))?;
        Ok(())
    }

    async fn send_pdu(&self, host: IpAddr, version: Version, pdu: Pdu) -> Result<()> {
        let msg = Message::new(version, self.community.clone(), pdu);
        self.send(SocketAddr::new(host, self.port), &msg).await
    }
}

/// Sends SNMPv1 and SNMPv2c traps. Fire-and-forget: nothing is awaited
/// after the datagram leaves the socket.
///
/// Cloning is cheap and shares the socket.
#[derive(Clone)]
pub struct TrapSender {
    inner: Arc<SenderCore>,
}

impl TrapSender {
    /// Start configuring a sender.
    pub fn builder() -> SenderBuilder<TrapSender> {
        SenderBuilder::new()
    }

    /// Bind with all defaults.
    pub async fn bind() -> Result<Self> {
        Self::builder().build().await
    }

    /// Send a v1 Trap PDU to `host`.
    pub async fn send_v1_trap(&self, host: IpAddr, trap: &TrapV1Pdu) -> Result<()> {
        self.inner
            .send_pdu(host, Version::V1, Pdu::TrapV1(trap.clone()))
            .await
    }

    /// Send a v2c SNMPv2-Trap PDU to `host`.
    pub async fn send_v2_trap(&self, host: IpAddr, trap: &TrapV2Pdu) -> Result<()> {
        self.inner
            .send_pdu(host, Version::V2c, Pdu::TrapV2(trap.clone()))
            .await
    }

    /// Build and send a v2c trap with a fresh request id.
    ///
    /// Returns the request id used.
    pub async fn notify(
        &self,
        host: IpAddr,
        uptime: u32,
        trap_oid: Oid,
        varbinds: impl IntoIterator<Item = VarBind>,
    ) -> Result<i32> {
        let request_id = self.inner.request_ids.next();
        let trap = TrapV2Pdu::notification(request_id, uptime, trap_oid, varbinds);
        self.inner
            .send_pdu(host, Version::V2c, Pdu::TrapV2(trap))
            .await?;
        Ok(request_id)
    }

    /// Send an already-built message to an explicit address.
    pub async fn send_message(&self, target: SocketAddr, msg: &Message) -> Result<()> {
        self.inner.send(target, msg).await
    }

    /// Allocate a request id from this sender's counter.
    pub fn next_request_id(&self) -> i32 {
        self.inner.request_ids.next()
    }

    /// Local address of the sending socket.
    pub fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr
    }
}

impl std::fmt::Debug for TrapSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrapSender")
            .field("local_addr", &self.inner.local_addr)
            .field("port", &self.inner.port)
            .finish_non_exhaustive()
    }
}

/// Sends SNMPv2c InformRequest PDUs.
///
/// The acknowledging Response is not awaited; pair this with a
/// [`TrapReceiver`](super::TrapReceiver) on the sending side if you need it.
#[derive(Clone)]
pub struct InformSender {
    inner: Arc<SenderCore>,
}

impl InformSender {
    /// Start configuring a sender.
    pub fn builder() -> SenderBuilder<InformSender> {
        SenderBuilder::new()
    }

    /// Bind with all defaults.
    pub async fn bind() -> Result<Self> {
        Self::builder().build().await
    }

    /// Send an InformRequest PDU to `host`.
    pub async fn send_inform(&self, host: IpAddr, inform: &TrapV2Pdu) -> Result<()> {
        self.inner
            .send_pdu(host, Version::V2c, Pdu::InformRequest(inform.clone()))
            .await
    }

    /// Build and send an inform with a fresh request id.
    ///
    /// Returns the request id used.
    pub async fn inform(
        &self,
        host: IpAddr,
        uptime: u32,
        trap_oid: Oid,
        varbinds: impl IntoIterator<Item = VarBind>,
    ) -> Result<i32> {
        let request_id = self.inner.request_ids.next();
        let inform = TrapV2Pdu::notification(request_id, uptime, trap_oid, varbinds);
        self.inner
            .send_pdu(host, Version::V2c, Pdu::InformRequest(inform))
            .await?;
        Ok(request_id)
    }

    /// Allocate a request id from this sender's counter.
    pub fn next_request_id(&self) -> i32 {
        self.inner.request_ids.next()
    }

    /// Local address of the sending socket.
    pub fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr
    }
}

impl std::fmt::Debug for InformSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InformSender")
            .field("local_addr", &self.inner.local_addr)
            .field("port", &self.inner.port)
            .finish_non_exhaustive()
    }
}
