//! Trap receiver: a UDP listen loop dispatching to listener registries.

use std::net::SocketAddr;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, instrument};

use super::listener::{
    ErrorSink, InformRequestListener, Origin, TracingErrorSink, TrapV1Listener, TrapV2Listener,
};
use super::registry::ListenerRegistry;
use super::{DEFAULT_BUFFER_SIZE, MIN_BUFFER_SIZE};
use crate::error::{Error, Result};
use crate::message::Message;
use crate::pdu::{Pdu, TrapV2Pdu};
use crate::util;
use crate::version::Version;

const MAX_BUFFER_SIZE: usize = 65_535;
const MAX_RECV_BACKOFF: Duration = Duration::from_secs(1);

fn clamp_buffer_size(size: usize) -> usize {
    size.clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE)
}

/// Pause before the next `recv_from` after `failures` errors in a row.
///
/// A single error retries at once; repeats back off from 10ms up to 1s.
fn recv_backoff(failures: u32) -> Option<Duration> {
    if failures <= 1 {
        return None;
    }
    let millis = 10u64.saturating_mul(1 << (failures - 2).min(10));
    Some(Duration::from_millis(millis).min(MAX_RECV_BACKOFF))
}

/// Builder for [`TrapReceiver`].
pub struct TrapReceiverBuilder {
    bind: String,
    buffer_size: usize,
    error_sink: Arc<dyn ErrorSink>,
    acknowledge_informs: bool,
}

impl TrapReceiverBuilder {
    fn new() -> Self {
        Self {
            bind: "0.0.0.0:162".to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            error_sink: Arc::new(TracingErrorSink),
            acknowledge_informs: true,
        }
    }

    /// Address to listen on (default `0.0.0.0:162`).
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.bind = addr.into();
        self
    }

    /// Receive buffer size in bytes (default 512, never below 484).
    ///
    /// Datagrams longer than this are truncated by the socket and then fail
    /// to decode.
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Where per-datagram failures go (default: `warn` log events).
    pub fn error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.error_sink = sink;
        self
    }

    /// Answer each InformRequest with a Response PDU (default true).
    pub fn acknowledge_informs(mut self, enabled: bool) -> Self {
        self.acknowledge_informs = enabled;
        self
    }

    /// Bind the socket. The receive loop is not started.
    pub async fn build(self) -> Result<TrapReceiver> {
        let socket = util::bind(&self.bind)?;
        let local_addr = socket.local_addr().map_err(|e| Error::io(None, e))?;

        tracing::debug!(
            target: "snmp_trap::receiver",
            { snmp.local_addr = %local_addr },
            "trap receiver bound"
        );

        Ok(TrapReceiver {
            inner: Arc::new(ReceiverInner {
                socket,
                local_addr,
                buffer_size: AtomicUsize::new(clamp_buffer_size(self.buffer_size)),
                error_sink: self.error_sink,
                acknowledge_informs: self.acknowledge_informs,
                trap_v1: ListenerRegistry::new(),
                trap_v2: ListenerRegistry::new(),
                informs: ListenerRegistry::new(),
                stats: Counters::default(),
            }),
            task: Mutex::new(None),
        })
    }
}

impl Default for TrapReceiverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters since the receiver was built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    /// Datagrams read from the socket.
    pub received: u64,
    /// Datagrams that did not decode as a v1/v2c message.
    pub decode_failures: u64,
    /// Successful listener invocations.
    pub dispatched: u64,
}

#[derive(Default)]
struct Counters {
    received: AtomicU64,
    decode_failures: AtomicU64,
    dispatched: AtomicU64,
}

struct ReceiverInner {
    socket: UdpSocket,
    local_addr: SocketAddr,
    buffer_size: AtomicUsize,
    error_sink: Arc<dyn ErrorSink>,
    acknowledge_informs: bool,
    trap_v1: ListenerRegistry<dyn TrapV1Listener>,
    trap_v2: ListenerRegistry<dyn TrapV2Listener>,
    informs: ListenerRegistry<dyn InformRequestListener>,
    stats: Counters,
}

struct RunningTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Listens for SNMP notifications and dispatches them by PDU variant.
///
/// Three registries are kept: v1 traps, v2 traps and inform requests.
/// Each decoded PDU goes to every listener in the matching registry. Any
/// failure along the way (socket error, undecodable datagram, a request PDU
/// arriving on the trap port, a panicking listener) is handed to the
/// [`ErrorSink`] and the loop moves on to the next datagram.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use snmp_trap::transport::{Origin, TrapReceiver, TrapV2Listener};
/// use snmp_trap::TrapV2Pdu;
///
/// # async fn example() -> snmp_trap::Result<()> {
/// let receiver = TrapReceiver::builder().bind("0.0.0.0:1162").build().await?;
///
/// let print: Arc<dyn TrapV2Listener> = Arc::new(|origin: &Origin, trap: &TrapV2Pdu| {
///     println!("{} sent {:?}", origin.source, trap.trap_oid());
/// });
/// receiver.add_trap_v2_listener(print);
/// receiver.start();
/// # receiver.stop().await;
/// # Ok(())
/// # }
/// ```
///
/// Dropping the receiver cancels the receive loop.
pub struct TrapReceiver {
    inner: Arc<ReceiverInner>,
    task: Mutex<Option<RunningTask>>,
}

impl TrapReceiver {
    /// Start configuring a receiver.
    pub fn builder() -> TrapReceiverBuilder {
        TrapReceiverBuilder::new()
    }

    /// Bind to `addr` with default settings.
    pub async fn bind(addr: impl Into<String>) -> Result<Self> {
        Self::builder().bind(addr).build().await
    }

    /// Register a v1 trap listener. Returns false if already registered.
    pub fn add_trap_v1_listener(&self, listener: Arc<dyn TrapV1Listener>) -> bool {
        self.inner.trap_v1.add(listener)
    }

    /// Unregister a v1 trap listener. Returns false if it was not registered.
    pub fn remove_trap_v1_listener(&self, listener: &Arc<dyn TrapV1Listener>) -> bool {
        self.inner.trap_v1.remove(listener)
    }

    /// Register a v2 trap listener. Returns false if already registered.
    pub fn add_trap_v2_listener(&self, listener: Arc<dyn TrapV2Listener>) -> bool {
        self.inner.trap_v2.add(listener)
    }

    /// Unregister a v2 trap listener. Returns false if it was not registered.
    pub fn remove_trap_v2_listener(&self, listener: &Arc<dyn TrapV2Listener>) -> bool {
        self.inner.trap_v2.remove(listener)
    }

    /// Register an inform listener. Returns false if already registered.
    pub fn add_inform_listener(&self, listener: Arc<dyn InformRequestListener>) -> bool {
        self.inner.informs.add(listener)
    }

    /// Unregister an inform listener. Returns false if it was not registered.
    pub fn remove_inform_listener(&self, listener: &Arc<dyn InformRequestListener>) -> bool {
        self.inner.informs.remove(listener)
    }

    /// Spawn the receive loop on the current tokio runtime.
    ///
    /// Returns false if the loop was already running.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[instrument(skip(self), fields(snmp.local_addr = %self.inner.local_addr))]
    pub fn start(&self) -> bool {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if task.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            return false;
        }

        let cancel = CancellationToken::new();
        let span = tracing::info_span!(
            target: "snmp_trap::receiver",
            "trap_receiver",
            snmp.local_addr = %self.inner.local_addr
        );
        let handle = tokio::spawn(
            Arc::clone(&self.inner)
                .run(cancel.clone())
                .instrument(span),
        );
        *task = Some(RunningTask { cancel, handle });
        true
    }

    /// Stop the receive loop and wait for it to finish.
    ///
    /// Returns false if it was not running.
    #[instrument(skip(self), fields(snmp.local_addr = %self.inner.local_addr))]
    pub async fn stop(&self) -> bool {
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(task) = task else {
            return false;
        };

        let was_running = !task.handle.is_finished();
        task.cancel.cancel();
        if let Err(e) = task.handle.await {
            tracing::warn!(target: "snmp_trap::receiver", { error = %e }, "receive loop aborted");
        }
        was_running
    }

    /// True while the receive loop is running.
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }

    /// Address the socket is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr
    }

    /// Current receive buffer size.
    pub fn buffer_size(&self) -> usize {
        self.inner.buffer_size.load(Ordering::Relaxed)
    }

    /// Change the receive buffer size, effective from the next datagram.
    ///
    /// The value is clamped to `484..=65535`.
    pub fn set_buffer_size(&self, size: usize) {
        self.inner
            .buffer_size
            .store(clamp_buffer_size(size), Ordering::Relaxed);
    }

    /// Snapshot of the receive counters.
    pub fn stats(&self) -> ReceiverStats {
        let stats = &self.inner.stats;
        ReceiverStats {
            received: stats.received.load(Ordering::Relaxed),
            decode_failures: stats.decode_failures.load(Ordering::Relaxed),
            dispatched: stats.dispatched.load(Ordering::Relaxed),
        }
    }
}

impl Drop for TrapReceiver {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = task.take() {
            task.cancel.cancel();
        }
    }
}

impl std::fmt::Debug for TrapReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrapReceiver")
            .field("local_addr", &self.inner.local_addr)
            .field("buffer_size", &self.buffer_size())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl ReceiverInner {
    async fn run(self: Arc<Self>, cancel: CancellationToken) {
        tracing::info!(target: "snmp_trap::receiver", "trap receiver started");

        let mut failures = 0u32;
        loop {
            let mut buf = vec![0u8; self.buffer_size.load(Ordering::Relaxed)];

            let (len, source) = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                result = self.socket.recv_from(&mut buf) => match result {
                    Ok(read) => read,
                    Err(e) => {
                        failures = failures.saturating_add(1);
                        self.error_sink.report(None, &Error::io(None, e));
                        if let Some(pause) = recv_backoff(failures) {
                            tokio::select! {
                                biased;
                                _ = cancel.cancelled() => break,
                                _ = tokio::time::sleep(pause) => {}
                            }
                        }
                        continue;
                    }
                },
            };
            failures = 0;

            buf.truncate(len);
            self.stats.received.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(
                target: "snmp_trap::receiver",
                { snmp.source = %source, snmp.bytes = len },
                "UDP recv"
            );

            self.handle_datagram(Bytes::from(buf), source).await;
        }

        tracing::info!(target: "snmp_trap::receiver", "trap receiver stopped");
    }

    async fn handle_datagram(&self, data: Bytes, source: SocketAddr) {
        let msg = match Message::decode(data) {
            Ok(msg) => msg,
            Err(e) => {
                self.stats.decode_failures.fetch_add(1, Ordering::Relaxed);
                self.error_sink.report(Some(source), &e);
                return;
            }
        };

        let origin = Origin {
            source,
            version: msg.version,
            community: msg.community.clone(),
        };

        match &msg.pdu {
            Pdu::TrapV1(trap) => {
                self.dispatch("trapV1", &self.trap_v1, source, |l| {
                    l.on_trap_v1(&origin, trap)
                });
            }
            Pdu::TrapV2(trap) => {
                self.dispatch("trapV2", &self.trap_v2, source, |l| {
                    l.on_trap_v2(&origin, trap)
                });
            }
            Pdu::InformRequest(inform) => {
                self.dispatch("inform", &self.informs, source, |l| {
                    l.on_inform(&origin, inform)
                });
                if !self.acknowledge_informs {
                    return;
                }
                if origin.version == Version::V2c {
                    self.acknowledge(&origin, inform).await;
                } else {
                    tracing::debug!(
                        target: "snmp_trap::receiver",
                        { snmp.source = %source, snmp.version = %origin.version },
                        "not acknowledging inform outside SNMPv2c"
                    );
                }
            }
            Pdu::Basic(pdu) => {
                let err = Error::UnexpectedPdu {
                    pdu_type: pdu.pdu_type,
                };
                self.error_sink.report(Some(source), &err);
            }
        }
    }

    fn dispatch<L: ?Sized>(
        &self,
        registry: &'static str,
        listeners: &ListenerRegistry<L>,
        source: SocketAddr,
        call: impl Fn(&L),
    ) {
        let snapshot = listeners.snapshot();
        if snapshot.is_empty() {
            tracing::trace!(
                target: "snmp_trap::receiver",
                { snmp.source = %source, registry },
                "no listeners registered"
            );
            return;
        }

        for listener in snapshot.iter() {
            match catch_unwind(AssertUnwindSafe(|| call(&**listener))) {
                Ok(()) => {
                    self.stats.dispatched.fetch_add(1, Ordering::Relaxed);
                }
                Err(_) => {
                    self.error_sink
                        .report(Some(source), &Error::ListenerPanicked { registry });
                }
            }
        }
    }

    async fn acknowledge(&self, origin: &Origin, inform: &TrapV2Pdu) {
        let response = Message::new(
            origin.version,
            origin.community.clone(),
            Pdu::Basic(inform.to_response()),
        );
        let data = response.encode();
        tracing::trace!(
            target: "snmp_trap::receiver",
            { snmp.target = %origin.source, snmp.request_id = inform.request_id },
            "acknowledging inform"
        );
        if let Err(e) = self.socket.send_to(&data, origin.source).await {
            self.error_sink
                .report(Some(origin.source), &Error::io(Some(origin.source), e));
        }
    }
}
