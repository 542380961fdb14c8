//! UDP notification transport.
//!
//! [`TrapSender`] and [`InformSender`] push single datagrams at a manager;
//! [`TrapReceiver`] listens for them and fans each decoded PDU out to the
//! listeners registered for its variant.

mod listener;
mod receiver;
mod registry;
mod sender;

pub use listener::{
    ErrorSink, InformRequestListener, Origin, TracingErrorSink, TrapV1Listener, TrapV2Listener,
};
pub use receiver::{ReceiverStats, TrapReceiver, TrapReceiverBuilder};
pub use registry::ListenerRegistry;
pub use sender::{InformSender, SenderBuilder, TrapSender};

/// Well-known SNMP trap port.
pub const TRAP_PORT: u16 = 162;

/// Smallest receive buffer the receiver will use (RFC 1157 minimum message size).
pub const MIN_BUFFER_SIZE: usize = 484;

/// Default receive buffer size.
pub const DEFAULT_BUFFER_SIZE: usize = 512;
