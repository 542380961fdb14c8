//! Common imports.
//!
//! ```
//! use snmp_trap::prelude::*;
//!
//! let vb = VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), "core-sw-1");
//! assert_eq!(vb.value.as_str(), Some("core-sw-1"));
//! ```

pub use crate::error::{Error, ErrorStatus, Result};
pub use crate::message::Message;
pub use crate::oid;
pub use crate::oid::Oid;
pub use crate::pdu::{BasicPdu, GenericTrap, Pdu, TrapV1Pdu, TrapV2Pdu};
pub use crate::transport::{
    InformRequestListener, InformSender, Origin, TrapReceiver, TrapSender, TrapV1Listener,
    TrapV2Listener,
};
pub use crate::value::Value;
pub use crate::varbind::VarBind;
pub use crate::version::Version;
