use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::runtime::error::RuntimeError;

/// Environment variable read by the streaming server to pick its transports.
pub(crate) const TRANSPORT_ENV: &str = "RTSP_PROTOCOLS";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Protocol {
    Tcp,
    Udp,
    Multicast,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
            Protocol::Multicast => write!(f, "multicast"),
        }
    }
}

/// One or more transport protocols, written `tcp` or `udp,tcp`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct Transport(Vec<Protocol>);

impl Transport {
    pub(crate) fn env(&self) -> String {
        format!("{}={}", TRANSPORT_ENV, self)
    }
}

impl Default for Transport {
    fn default() -> Self {
        Transport(vec![Protocol::Tcp])
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", names.join(","))
    }
}

impl FromStr for Transport {
    type Err = RuntimeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut protocols = vec![];

        for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let protocol = match part.to_lowercase().as_str() {
                "tcp" => Protocol::Tcp,
                "udp" => Protocol::Udp,
                "multicast" => Protocol::Multicast,
                other => {
                    return Err(RuntimeError::InvalidConfig(format!("unknown transport '{}'", other)))
                }
            };

            if !protocols.contains(&protocol) {
                protocols.push(protocol);
            }
        }

        if protocols.is_empty() {
            return Err(RuntimeError::InvalidConfig("transport cannot be empty".to_string()));
        }

        Ok(Transport(protocols))
    }
}

impl TryFrom<String> for Transport {
    type Error = RuntimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Transport> for String {
    fn from(transport: Transport) -> Self {
        transport.to_string()
    }
}
