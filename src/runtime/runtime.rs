use std::collections::HashMap;
use std::str::FromStr;
use async_trait::async_trait;
use bollard::Docker;
use serde::{Deserialize, Serialize};
use crate::ports::bindings::PortTable;
use crate::runtime::docker;
use crate::runtime::error::RuntimeError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum InstanceStatus {
    Running,
    Exited,
    Other(String),
}

impl InstanceStatus {
    /// Docker reports `Up 3 minutes`, `Exited (0) 2 hours ago`, `Created`...
    pub(crate) fn from_status_text(status: &str) -> Self {
        if status.starts_with("Exited") {
            InstanceStatus::Exited
        } else if status.starts_with("Up") {
            InstanceStatus::Running
        } else {
            InstanceStatus::Other(status.to_string())
        }
    }

    pub(crate) fn is_exited(&self) -> bool {
        *self == InstanceStatus::Exited
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Instance {
    pub(crate) id: String,
    pub(crate) image: String,
    pub(crate) names: Vec<String>,
    pub(crate) status: InstanceStatus,
    pub(crate) status_text: String,
}

impl Instance {
    pub(crate) fn short_id(&self) -> &str {
        let end = self.id.len().min(10);
        &self.id[..end]
    }

    pub(crate) fn display_name(&self) -> String {
        self.names
            .first()
            .map(|name| name.trim_start_matches('/').to_string())
            .unwrap_or_else(|| self.short_id().to_string())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum PullPolicy {
    Always,
    #[default]
    IfNotPresent,
    Never,
}

impl FromStr for PullPolicy {
    type Err = RuntimeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "always" => Ok(PullPolicy::Always),
            "ifnotpresent" | "missing" => Ok(PullPolicy::IfNotPresent),
            "never" => Ok(PullPolicy::Never),
            other => Err(RuntimeError::InvalidConfig(format!("unknown pull policy '{}'", other))),
        }
    }
}

/// Everything needed to create one replica.
#[derive(Clone, Debug)]
pub(crate) struct InstanceSpec {
    pub(crate) name: String,
    pub(crate) image: String,
    pub(crate) env: Vec<String>,
    pub(crate) labels: HashMap<String, String>,
    pub(crate) ports: PortTable,
}

#[async_trait]
pub(crate) trait RuntimeInterface {
    async fn list_instances(&self) -> Result<Vec<Instance>, RuntimeError>;
    async fn stop_instance(&self, instance_id: &str, timeout: i32) -> Result<(), RuntimeError>;
    async fn remove_instance(&self, instance_id: &str) -> Result<(), RuntimeError>;
    async fn pull_image(&self, image: &str, policy: PullPolicy) -> Result<(), RuntimeError>;
    async fn create_instance(&self, spec: &InstanceSpec) -> Result<String, RuntimeError>;
    async fn start_instance(&self, instance_id: &str) -> Result<(), RuntimeError>;
}

pub(crate) struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    pub(crate) async fn connect() -> Result<Self, RuntimeError> {
        let docker = docker::connect().await?;
        Ok(DockerRuntime { docker })
    }
}

#[async_trait]
impl RuntimeInterface for DockerRuntime {
    async fn list_instances(&self) -> Result<Vec<Instance>, RuntimeError> {
        docker::list_instances(&self.docker).await
    }

    async fn stop_instance(&self, instance_id: &str, timeout: i32) -> Result<(), RuntimeError> {
        docker::stop_container(&self.docker, instance_id, timeout).await
    }

    async fn remove_instance(&self, instance_id: &str) -> Result<(), RuntimeError> {
        docker::remove_container(&self.docker, instance_id).await
    }

    async fn pull_image(&self, image: &str, policy: PullPolicy) -> Result<(), RuntimeError> {
        docker::pull_image(&self.docker, image, policy).await
    }

    async fn create_instance(&self, spec: &InstanceSpec) -> Result<String, RuntimeError> {
        docker::create_container(&self.docker, spec).await
    }

    async fn start_instance(&self, instance_id: &str) -> Result<(), RuntimeError> {
        docker::start_container(&self.docker, instance_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_text() {
        assert_eq!(InstanceStatus::from_status_text("Up 3 minutes"), InstanceStatus::Running);
        assert_eq!(InstanceStatus::from_status_text("Exited (0) 2 hours ago"), InstanceStatus::Exited);
        assert_eq!(
            InstanceStatus::from_status_text("Created"),
            InstanceStatus::Other("Created".to_string())
        );
        assert!(!InstanceStatus::from_status_text("Restarting (1) 5 seconds ago").is_exited());
    }

    #[test]
    fn test_pull_policy_from_str() {
        assert_eq!("Always".parse::<PullPolicy>().unwrap(), PullPolicy::Always);
        assert_eq!("missing".parse::<PullPolicy>().unwrap(), PullPolicy::IfNotPresent);
        assert_eq!("IfNotPresent".parse::<PullPolicy>().unwrap(), PullPolicy::IfNotPresent);
        assert_eq!("never".parse::<PullPolicy>().unwrap(), PullPolicy::Never);
        assert!("sometimes".parse::<PullPolicy>().is_err());
    }

    #[test]
    fn test_instance_names() {
        let instance = Instance {
            id: "0123456789abcdef".to_string(),
            image: "aler9/rtsp-simple-server".to_string(),
            names: vec!["/rtsp_0_deadbeef".to_string()],
            status: InstanceStatus::Running,
            status_text: "Up 1 second".to_string(),
        };
        assert_eq!(instance.short_id(), "0123456789");
        assert_eq!(instance.display_name(), "rtsp_0_deadbeef");

        let unnamed = Instance { names: vec![], ..instance };
        assert_eq!(unnamed.display_name(), "0123456789");
    }
}
