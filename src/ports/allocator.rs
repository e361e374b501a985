use std::collections::HashSet;
use std::io;
use std::net::{TcpListener, UdpSocket};
use crate::ports::bindings::PortProtocol;
use crate::runtime::error::RuntimeError;

const BIND_ADDRESS: &str = "0.0.0.0:0";
const MAX_ATTEMPTS: usize = 64;

/// Where candidate ports come from. A port stays taken until the source is dropped.
trait PortSource {
    fn open(&mut self, protocol: PortProtocol) -> io::Result<u16>;
}

/// Sockets kept open while a batch of ports is picked.
#[derive(Default)]
struct Probes {
    tcp: Vec<TcpListener>,
    udp: Vec<UdpSocket>,
}

impl PortSource for Probes {
    fn open(&mut self, protocol: PortProtocol) -> io::Result<u16> {
        match protocol {
            PortProtocol::Tcp => {
                let listener = TcpListener::bind(BIND_ADDRESS)?;
                let port = listener.local_addr()?.port();
                self.tcp.push(listener);
                Ok(port)
            }
            PortProtocol::Udp => {
                let socket = UdpSocket::bind(BIND_ADDRESS)?;
                let port = socket.local_addr()?.port();
                self.udp.push(socket);
                Ok(port)
            }
        }
    }
}

/// Hands out free host ports picked by the OS.
///
/// Every port returned is remembered for the lifetime of the allocator, so a
/// port released by one call is never handed out again by a later call even
/// if the OS would reuse it.
#[derive(Debug, Default)]
pub(crate) struct PortAllocator {
    reserved: HashSet<u16>,
}

impl PortAllocator {
    pub(crate) fn new() -> Self {
        PortAllocator { reserved: HashSet::new() }
    }

    /// One port per requested protocol, all distinct.
    pub(crate) fn allocate(&mut self, protocols: &[PortProtocol]) -> Result<Vec<u16>, RuntimeError> {
        // probes stay open until every port of the batch is picked
        let mut probes = Probes::default();
        let ports = self.allocate_from(&mut probes, protocols)?;
        drop(probes);

        debug!("Allocated host ports {:?}", ports);

        Ok(ports)
    }

    fn allocate_from(&mut self, source: &mut impl PortSource, protocols: &[PortProtocol]) -> Result<Vec<u16>, RuntimeError> {
        let mut ports: Vec<u16> = Vec::with_capacity(protocols.len());

        for protocol in protocols {
            let mut collisions = 0;

            loop {
                let port = source.open(*protocol).map_err(|e| {
                    RuntimeError::PortAllocationFailed(format!("unable to bind a {} port: {}", protocol, e))
                })?;

                if !self.reserved.contains(&port) && !ports.contains(&port) {
                    ports.push(port);
                    break;
                }

                collisions += 1;
                debug!("Port {}/{} already handed out, asking again", port, protocol);

                if collisions >= MAX_ATTEMPTS {
                    return Err(RuntimeError::PortAllocationFailed(format!(
                        "no fresh {} port after {} attempts",
                        protocol, MAX_ATTEMPTS
                    )));
                }
            }
        }

        self.reserved.extend(ports.iter().copied());

        Ok(ports)
    }
}
