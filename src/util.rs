//! Internal utilities.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use crate::error::{Error, Result};

/// Create and bind a UDP socket.
///
/// IPv6 sockets set `IPV6_V6ONLY` so they never see IPv4-mapped traffic.
pub(crate) fn bind_udp_socket(addr: SocketAddr) -> io::Result<UdpSocket> {
    let domain = if addr.is_ipv6() {
        Domain::IPV6
    } else {
        Domain::IPV4
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;

    if addr.is_ipv6() {
        socket.set_only_v6(true)?;
    }

    // Allow address reuse for quick restarts
    socket.set_reuse_address(true)?;

    // Set non-blocking before converting to tokio socket
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;

    UdpSocket::from_std(socket.into())
}

/// Resolve `addr` to its first socket address.
///
/// Text that is neither `ip:port` nor a resolvable `host:port` is a
/// configuration error.
pub(crate) fn resolve_bind_addr(addr: &str) -> Result<SocketAddr> {
    if let Ok(parsed) = addr.parse() {
        return Ok(parsed);
    }
    addr.to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| Error::Config(format!("invalid bind address {addr:?}").into()).boxed())
}

/// Resolve and bind, mapping failures onto the crate error type.
pub(crate) fn bind(addr: &str) -> Result<UdpSocket> {
    let resolved = resolve_bind_addr(addr)?;
    bind_udp_socket(resolved).map_err(|e| Error::io(Some(resolved), e))
}
