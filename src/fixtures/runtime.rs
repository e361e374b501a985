use std::collections::HashSet;
use std::sync::Mutex;
use async_trait::async_trait;
use crate::runtime::error::RuntimeError;
use crate::runtime::runtime::{Instance, InstanceSpec, InstanceStatus, PullPolicy, RuntimeInterface};

#[derive(Default)]
pub(crate) struct FakeState {
    pub(crate) instances: Vec<Instance>,
    pub(crate) calls: Vec<String>,
    pub(crate) created: Vec<InstanceSpec>,
    next_id: usize,
}

/// In-memory runtime recording every call it receives.
#[derive(Default)]
pub(crate) struct FakeRuntime {
    pub(crate) state: Mutex<FakeState>,
    pub(crate) fail_stop: HashSet<String>,
    pub(crate) fail_create_replica: HashSet<usize>,
    pub(crate) fail_start: bool,
    pub(crate) ignore_remove: bool,
}

pub(crate) fn instance(id: &str, image: &str, status: &str) -> Instance {
    Instance {
        id: id.to_string(),
        image: image.to_string(),
        names: vec![format!("/{}", id)],
        status: InstanceStatus::from_status_text(status),
        status_text: status.to_string(),
    }
}

impl FakeRuntime {
    pub(crate) fn with_instances(instances: Vec<Instance>) -> Self {
        let runtime = FakeRuntime::default();
        runtime.state.lock().unwrap().instances = instances;
        runtime
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn instance_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().instances.iter().map(|i| i.id.clone()).collect()
    }

    pub(crate) fn created(&self) -> Vec<InstanceSpec> {
        self.state.lock().unwrap().created.clone()
    }
}

#[async_trait]
impl RuntimeInterface for FakeRuntime {
    async fn list_instances(&self) -> Result<Vec<Instance>, RuntimeError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list".to_string());
        Ok(state.instances.clone())
    }

    async fn stop_instance(&self, instance_id: &str, _timeout: i32) -> Result<(), RuntimeError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("stop {}", instance_id));

        if self.fail_stop.contains(instance_id) {
            return Err(RuntimeError::InstanceStopFailed(instance_id.to_string()));
        }

        for instance in state.instances.iter_mut().filter(|i| i.id == instance_id) {
            instance.status = InstanceStatus::Exited;
            instance.status_text = "Exited (0) Less than a second ago".to_string();
        }
        Ok(())
    }

    async fn remove_instance(&self, instance_id: &str) -> Result<(), RuntimeError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("remove {}", instance_id));

        if !self.ignore_remove {
            state.instances.retain(|i| i.id != instance_id);
        }
        Ok(())
    }

    async fn pull_image(&self, image: &str, _policy: PullPolicy) -> Result<(), RuntimeError> {
        self.state.lock().unwrap().calls.push(format!("pull {}", image));
        Ok(())
    }

    async fn create_instance(&self, spec: &InstanceSpec) -> Result<String, RuntimeError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create {}", spec.name));

        let replica: usize = spec.labels
            .get(crate::runtime::docker::LABEL_REPLICA)
            .and_then(|index| index.parse().ok())
            .unwrap_or_default();

        if self.fail_create_replica.contains(&replica) {
            return Err(RuntimeError::InstanceCreationFailed(spec.name.clone()));
        }

        state.next_id += 1;
        let id = format!("new{}", state.next_id);
        let mut created = instance(&id, &spec.image, "Created");
        created.names = vec![format!("/{}", spec.name)];
        state.instances.push(created);
        state.created.push(spec.clone());

        Ok(id)
    }

    async fn start_instance(&self, instance_id: &str) -> Result<(), RuntimeError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("start {}", instance_id));

        if self.fail_start {
            return Err(RuntimeError::InstanceStartFailed(instance_id.to_string()));
        }

        for instance in state.instances.iter_mut().filter(|i| i.id == instance_id) {
            instance.status = InstanceStatus::Running;
            instance.status_text = "Up Less than a second".to_string();
        }
        Ok(())
    }
}
