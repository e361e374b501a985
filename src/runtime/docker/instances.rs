use bollard::Docker;
use bollard::models::ContainerSummary;
use bollard::query_parameters::ListContainersOptionsBuilder;
use crate::runtime::error::RuntimeError;
use crate::runtime::runtime::{Instance, InstanceStatus};

fn to_instance(container: ContainerSummary) -> Option<Instance> {
    let id = container.id?;
    let status_text = container.status.unwrap_or_default();

    Some(Instance {
        id,
        image: container.image.unwrap_or_default(),
        names: container.names.unwrap_or_default(),
        status: InstanceStatus::from_status_text(&status_text),
        status_text,
    })
}

/// Every container known to the daemon, exited ones included.
pub(crate) async fn list_instances(docker: &Docker) -> Result<Vec<Instance>, RuntimeError> {
    let options = ListContainersOptionsBuilder::new().all(true).build();

    let containers = docker
        .list_containers(Some(options))
        .await
        .map_err(|e| RuntimeError::Other(format!("Docker list instances error: {}", e)))?;

    debug!("Docker listed {} containers", containers.len());

    Ok(containers.into_iter().filter_map(to_instance).collect())
}
