//! Shared test infrastructure for snmp-trap.
//!
//! Provides loopback receivers, channel-backed listeners and fixtures.

// Allow dead code and unused imports since not all test files use all utilities
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fixtures;

use std::fmt::Debug;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use snmp_trap::transport::{
    ErrorSink, InformRequestListener, Origin, ReceiverStats, TrapReceiverBuilder, TrapV1Listener,
    TrapV2Listener,
};
use snmp_trap::{Error, Message, TrapReceiver, TrapV1Pdu, TrapV2Pdu};
use tokio::net::UdpSocket;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

pub use fixtures::*;

/// How long to wait for something that should happen.
pub const WAIT: Duration = Duration::from_secs(2);

/// How long to wait before concluding something did not happen.
pub const QUIET: Duration = Duration::from_millis(200);

/// An error handed to the receiver's error sink.
#[derive(Debug, Clone)]
pub struct Reported {
    pub source: Option<SocketAddr>,
    pub message: String,
    pub is_decode: bool,
}

/// A receiver on 127.0.0.1 plus the stream of errors it reported.
pub struct Harness {
    pub receiver: TrapReceiver,
    pub errors: UnboundedReceiver<Reported>,
}

impl Harness {
    /// Bind with defaults and start the loop.
    pub async fn start() -> Self {
        Self::start_with(|b| b).await
    }

    /// Bind with extra builder settings and start the loop.
    pub async fn start_with(
        configure: impl FnOnce(TrapReceiverBuilder) -> TrapReceiverBuilder,
    ) -> Self {
        let (tx, errors) = unbounded_channel();
        let sink: Arc<dyn ErrorSink> = Arc::new(move |source: Option<SocketAddr>, error: &Error| {
            let _ = tx.send(Reported {
                source,
                message: error.to_string(),
                is_decode: error.is_decode(),
            });
        });

        let builder = TrapReceiver::builder().bind("127.0.0.1:0").error_sink(sink);
        let receiver = configure(builder).build().await.expect("bind receiver");
        assert!(receiver.start());
        Self { receiver, errors }
    }

    pub fn addr(&self) -> SocketAddr {
        self.receiver.local_addr()
    }

    pub fn port(&self) -> u16 {
        self.addr().port()
    }
}

/// A plain UDP socket for hand-crafted datagrams.
pub async fn client_socket() -> UdpSocket {
    UdpSocket::bind("127.0.0.1:0").await.expect("bind client")
}

/// Send an encoded message from `socket` to `target`.
pub async fn send_message(socket: &UdpSocket, target: SocketAddr, msg: &Message) {
    socket
        .send_to(&msg.encode(), target)
        .await
        .expect("send message");
}

/// Wait for the next item, failing the test after [`WAIT`].
pub async fn recv_within<T>(rx: &mut UnboundedReceiver<T>) -> T {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("channel closed")
}

/// Assert nothing arrives within [`QUIET`].
pub async fn assert_quiet<T: Debug>(rx: &mut UnboundedReceiver<T>) {
    if let Ok(Some(item)) = tokio::time::timeout(QUIET, rx.recv()).await {
        panic!("unexpected event: {:?}", item);
    }
}

/// Poll the receiver's counters until `done` holds, failing after [`WAIT`].
pub async fn wait_for_stats(receiver: &TrapReceiver, done: impl Fn(&ReceiverStats) -> bool) {
    let deadline = tokio::time::Instant::now() + WAIT;
    loop {
        let stats = receiver.stats();
        if done(&stats) {
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            panic!("counters never reached expected state: {:?}", stats);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// A v1 trap listener that forwards into a channel.
pub fn v1_channel() -> (Arc<dyn TrapV1Listener>, UnboundedReceiver<(Origin, TrapV1Pdu)>) {
    let (tx, rx) = unbounded_channel();
    let listener: Arc<dyn TrapV1Listener> = Arc::new(move |origin: &Origin, trap: &TrapV1Pdu| {
        let _ = tx.send((origin.clone(), trap.clone()));
    });
    (listener, rx)
}

/// A v2 trap listener that forwards into a channel.
pub fn v2_channel() -> (Arc<dyn TrapV2Listener>, UnboundedReceiver<(Origin, TrapV2Pdu)>) {
    let (tx, rx) = unbounded_channel();
    let listener: Arc<dyn TrapV2Listener> = Arc::new(move |origin: &Origin, trap: &TrapV2Pdu| {
        let _ = tx.send((origin.clone(), trap.clone()));
    });
    (listener, rx)
}

/// An inform listener that forwards into a channel.
pub fn inform_channel() -> (
    Arc<dyn InformRequestListener>,
    UnboundedReceiver<(Origin, TrapV2Pdu)>,
) {
    let (tx, rx) = unbounded_channel();
    let listener: Arc<dyn InformRequestListener> =
        Arc::new(move |origin: &Origin, inform: &TrapV2Pdu| {
            let _ = tx.send((origin.clone(), inform.clone()));
        });
    (listener, rx)
}
