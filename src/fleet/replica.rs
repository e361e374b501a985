use std::collections::HashMap;
use serde::Serialize;
use crate::config::config::Config;
use crate::config::transport::Transport;
use crate::ports::bindings::{ContainerPort, PortTable};
use crate::runtime::docker::{tiny_id, LABEL_IMAGE, LABEL_REPLICA};
use crate::runtime::error::RuntimeError;
use crate::runtime::runtime::{InstanceSpec, PullPolicy};

/// What a redeploy should produce.
#[derive(Clone, Debug)]
pub(crate) struct FleetPlan {
    pub(crate) image: String,
    pub(crate) replicas: usize,
    pub(crate) host_ip: String,
    pub(crate) ports: Vec<ContainerPort>,
    pub(crate) transport: Transport,
    pub(crate) pull_policy: PullPolicy,
    pub(crate) stop_timeout: i32,
    pub(crate) name_prefix: String,
}

impl FleetPlan {
    pub(crate) fn instance_spec(&self, index: usize, ports: PortTable) -> InstanceSpec {
        let mut labels = HashMap::new();
        labels.insert(LABEL_IMAGE.to_string(), self.image.clone());
        labels.insert(LABEL_REPLICA.to_string(), index.to_string());

        InstanceSpec {
            name: format!("{}_{}_{}", self.name_prefix, index, tiny_id()),
            image: self.image.clone(),
            env: vec![self.transport.env()],
            labels,
            ports,
        }
    }
}

impl From<&Config> for FleetPlan {
    fn from(config: &Config) -> Self {
        FleetPlan {
            image: config.image.clone(),
            replicas: config.replicas,
            host_ip: config.host_ip.clone(),
            ports: config.ports.clone(),
            transport: config.transport.clone(),
            pull_policy: config.pull_policy,
            stop_timeout: config.stop_timeout,
            name_prefix: config.name_prefix.clone(),
        }
    }
}

/// A started container and the host ports it listens on.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct Replica {
    pub(crate) index: usize,
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) ports: PortTable,
}

#[derive(Debug, Default)]
pub(crate) struct FleetReport {
    pub(crate) removed: Vec<String>,
    pub(crate) replicas: Vec<Replica>,
    pub(crate) failures: Vec<(usize, RuntimeError)>,
}

impl FleetReport {
    pub(crate) fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
