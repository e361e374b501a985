use std::fmt;

#[derive(Debug)]
pub enum RuntimeError {
    ConnectionFailed(String),
    ImageNotFound(String),
    ImagePullFailed(String),
    InstanceCreationFailed(String),
    InstanceStartFailed(String),
    InstanceStopFailed(String),
    InstanceRemovalFailed(String),
    PortAllocationFailed(String),
    TeardownIncomplete(Vec<String>),
    InvalidConfig(String),
    Other(String),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            RuntimeError::ImageNotFound(msg) => write!(f, "Image not found: {}", msg),
            RuntimeError::ImagePullFailed(msg) => write!(f, "Image pull failed: {}", msg),
            RuntimeError::InstanceCreationFailed(msg) => {
                write!(f, "Instance creation failed: {}", msg)
            }
            RuntimeError::InstanceStartFailed(msg) => write!(f, "Instance start failed: {}", msg),
            RuntimeError::InstanceStopFailed(msg) => write!(f, "Instance stop failed: {}", msg),
            RuntimeError::InstanceRemovalFailed(msg) => {
                write!(f, "Instance removal failed: {}", msg)
            }
            RuntimeError::PortAllocationFailed(msg) => write!(f, "Port allocation failed: {}", msg),
            RuntimeError::TeardownIncomplete(ids) => {
                write!(f, "Teardown incomplete, instances still present: {}", ids.join(", "))
            }
            RuntimeError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            RuntimeError::Other(msg) => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl std::error::Error for RuntimeError {}
