//! # snmp-trap
//!
//! SNMP v1/v2c notification library for Rust.
//!
//! ## Features
//!
//! - BER codec for the SNMP SMI types, with offset-carrying decode errors
//! - v1 Trap, SNMPv2-Trap and InformRequest PDUs plus the basic request PDUs
//! - Async trap and inform senders built on Tokio
//! - A trap receiver that dispatches each PDU variant to its own listener set
//!
//! ## Sending
//!
//! ```rust,no_run
//! use snmp_trap::{TrapSender, VarBind, oid};
//!
//! #[tokio::main]
//! async fn main() -> snmp_trap::Result<()> {
//!     let sender = TrapSender::builder().community("public").build().await?;
//!
//!     sender
//!         .notify(
//!             "192.168.1.10".parse().unwrap(),
//!             12_345,
//!             oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 3),
//!             [VarBind::new(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 1, 2), 2)],
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Receiving
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use snmp_trap::transport::{Origin, TrapV1Listener};
//! use snmp_trap::{TrapReceiver, TrapV1Pdu};
//!
//! #[tokio::main]
//! async fn main() -> snmp_trap::Result<()> {
//!     let receiver = TrapReceiver::bind("0.0.0.0:162").await?;
//!     let listener: Arc<dyn TrapV1Listener> = Arc::new(|origin: &Origin, trap: &TrapV1Pdu| {
//!         println!(
//!             "{}: generic={} specific={}",
//!             origin.source, trap.generic_trap, trap.specific_trap
//!         );
//!     });
//!     receiver.add_trap_v1_listener(listener);
//!     receiver.start();
//!
//!     tokio::signal::ctrl_c().await.ok();
//!     receiver.stop().await;
//!     Ok(())
//! }
//! ```

pub mod ber;
pub mod error;
pub mod message;
pub mod oid;
pub mod pdu;
pub mod prelude;
pub mod request_id;
pub mod sequence;
pub mod transport;
pub mod value;
pub mod varbind;
pub mod version;

pub(crate) mod util;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use error::{DecodeErrorKind, Error, ErrorStatus, Result, ValueErrorKind};
pub use message::Message;
pub use oid::Oid;
pub use pdu::{BasicPdu, GenericTrap, Pdu, PduType, TrapV1Pdu, TrapV2Pdu};
pub use request_id::RequestIdGenerator;
pub use sequence::Sequence;
pub use transport::{InformSender, TrapReceiver, TrapSender};
pub use value::Value;
pub use varbind::VarBind;
pub use version::Version;
