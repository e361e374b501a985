use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use bollard::models::PortBinding;
use serde::{Deserialize, Serialize};
use crate::ports::allocator::PortAllocator;
use crate::runtime::error::RuntimeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum PortProtocol {
    Tcp,
    Udp,
}

impl fmt::Display for PortProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortProtocol::Tcp => write!(f, "tcp"),
            PortProtocol::Udp => write!(f, "udp"),
        }
    }
}

/// A port exposed by the container, written `8554/tcp`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct ContainerPort {
    pub(crate) port: u16,
    pub(crate) protocol: PortProtocol,
}

impl ContainerPort {
    pub(crate) fn tcp(port: u16) -> Self {
        ContainerPort { port, protocol: PortProtocol::Tcp }
    }
}

impl fmt::Display for ContainerPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.port, self.protocol)
    }
}

impl FromStr for ContainerPort {
    type Err = RuntimeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (port, protocol) = match value.trim().split_once('/') {
            Some((port, protocol)) => (port, protocol),
            None => (value.trim(), "tcp"),
        };

        let protocol = match protocol.to_lowercase().as_str() {
            "tcp" => PortProtocol::Tcp,
            "udp" => PortProtocol::Udp,
            other => {
                return Err(RuntimeError::InvalidConfig(format!(
                    "unknown protocol '{}' in port '{}'",
                    other, value
                )))
            }
        };

        let port: u16 = port
            .parse()
            .map_err(|_| RuntimeError::InvalidConfig(format!("invalid port '{}'", value)))?;

        if port == 0 {
            return Err(RuntimeError::InvalidConfig(format!("invalid port '{}'", value)));
        }

        Ok(ContainerPort { port, protocol })
    }
}

impl TryFrom<String> for ContainerPort {
    type Error = RuntimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContainerPort> for String {
    fn from(port: ContainerPort) -> Self {
        port.to_string()
    }
}

/// Two media ingest ports and the RTSP control port.
pub(crate) fn default_container_ports() -> Vec<ContainerPort> {
    vec![
        ContainerPort::tcp(8000),
        ContainerPort::tcp(8001),
        ContainerPort::tcp(8554),
    ]
}

pub(crate) fn ensure_unique(ports: &[ContainerPort]) -> Result<(), RuntimeError> {
    let mut seen = HashSet::new();
    for port in ports {
        if !seen.insert(port) {
            return Err(RuntimeError::InvalidConfig(format!("container port {} declared twice", port)));
        }
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct PortMapping {
    pub(crate) container: ContainerPort,
    pub(crate) host_ip: String,
    pub(crate) host_port: u16,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct PortTable {
    pub(crate) mappings: Vec<PortMapping>,
}

impl PortTable {
    pub(crate) fn allocate(host_ip: &str, container_ports: &[ContainerPort], allocator: &mut PortAllocator) -> Result<PortTable, RuntimeError> {
        ensure_unique(container_ports)?;

        let protocols: Vec<PortProtocol> = container_ports.iter().map(|port| port.protocol).collect();
        let host_ports = allocator.allocate(&protocols)?;

        let mappings = container_ports
            .iter()
            .zip(host_ports)
            .map(|(container, host_port)| PortMapping {
                container: *container,
                host_ip: host_ip.to_string(),
                host_port,
            })
            .collect();

        Ok(PortTable { mappings })
    }

    pub(crate) fn to_docker(&self) -> HashMap<String, Option<Vec<PortBinding>>> {
        self.mappings
            .iter()
            .map(|mapping| {
                let binding = PortBinding {
                    host_ip: Some(mapping.host_ip.clone()),
                    host_port: Some(mapping.host_port.to_string()),
                };
                (mapping.container.to_string(), Some(vec![binding]))
            })
            .collect()
    }
}

impl fmt::Display for PortTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.mappings
            .iter()
            .map(|m| format!("{}:{}->{}", m.host_ip, m.host_port, m.container))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
