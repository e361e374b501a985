use bollard::{
    Docker,
    models::{ContainerCreateBody, HostConfig},
    query_parameters::{
        CreateContainerOptionsBuilder,
        RemoveContainerOptionsBuilder,
        StartContainerOptionsBuilder,
        StopContainerOptionsBuilder,
    },
};
use crate::runtime::error::RuntimeError;
use crate::runtime::runtime::InstanceSpec;

fn build_container_body(spec: &InstanceSpec) -> ContainerCreateBody {
    let host_config = HostConfig {
        port_bindings: Some(spec.ports.to_docker()),
        ..Default::default()
    };

    ContainerCreateBody {
        image: Some(spec.image.clone()),
        env: Some(spec.env.clone()),
        labels: Some(spec.labels.clone()),
        host_config: Some(host_config),
        ..Default::default()
    }
}

pub(crate) async fn create_container(docker: &Docker, spec: &InstanceSpec) -> Result<String, RuntimeError> {
    debug!("Create container {} from image {}", spec.name, spec.image);

    let options = CreateContainerOptionsBuilder::new()
        .name(&spec.name)
        .build();

    match docker.create_container(Some(options), build_container_body(spec)).await {
        Ok(container) => {
            for warning in container.warnings.iter() {
                warn!("Docker create container {}: {}", spec.name, warning);
            }
            debug!("Docker create container {:?}", container.id);
            Ok(container.id)
        }
        Err(e) => {
            error!("Docker failed to create container: {}", e);
            match RuntimeError::from(e) {
                RuntimeError::Other(msg) => Err(RuntimeError::InstanceCreationFailed(msg)),
                err => Err(err),
            }
        }
    }
}

pub(crate) async fn start_container(docker: &Docker, container_id: &str) -> Result<(), RuntimeError> {
    let start_options = StartContainerOptionsBuilder::new().build();

    docker
        .start_container(container_id, Some(start_options))
        .await
        .map_err(|e| RuntimeError::InstanceStartFailed(format!("Docker failed to start container {}: {}", container_id, e)))?;

    info!("Docker container {} started", container_id);
    Ok(())
}

pub(crate) async fn stop_container(docker: &Docker, container_id: &str, timeout: i32) -> Result<(), RuntimeError> {
    let stop_options = StopContainerOptionsBuilder::new().t(timeout).build();

    docker
        .stop_container(container_id, Some(stop_options))
        .await
        .map_err(|e| RuntimeError::InstanceStopFailed(format!("Error stopping container {}: {}", container_id, e)))?;

    debug!("Container {} stopped successfully", container_id);
    Ok(())
}

pub(crate) async fn remove_container(docker: &Docker, container_id: &str) -> Result<(), RuntimeError> {
    let remove_options = RemoveContainerOptionsBuilder::new().build();

    docker
        .remove_container(container_id, Some(remove_options))
        .await
        .map_err(|e| RuntimeError::InstanceRemovalFailed(format!("Error removing container {}: {}", container_id, e)))?;

    info!("Container {} removed successfully", container_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::ports::bindings::{ContainerPort, PortMapping, PortTable};

    fn spec() -> InstanceSpec {
        InstanceSpec {
            name: "rtsp_0_deadbeef".to_string(),
            image: "aler9/rtsp-simple-server".to_string(),
            env: vec!["RTSP_PROTOCOLS=tcp".to_string()],
            labels: HashMap::from([("rtsp_fleet.replica".to_string(), "0".to_string())]),
            ports: PortTable {
                mappings: vec![
                    PortMapping { container: ContainerPort::tcp(8000), host_ip: "10.0.0.2".to_string(), host_port: 40001 },
                    PortMapping { container: ContainerPort::tcp(8554), host_ip: "10.0.0.2".to_string(), host_port: 40002 },
                ],
            },
        }
    }

    #[test]
    fn test_build_container_body() {
        let body = build_container_body(&spec());

        assert_eq!(body.image, Some("aler9/rtsp-simple-server".to_string()));
        assert_eq!(body.env, Some(vec!["RTSP_PROTOCOLS=tcp".to_string()]));
        assert_eq!(body.labels.unwrap().get("rtsp_fleet.replica"), Some(&"0".to_string()));

        let bindings = body.host_config.unwrap().port_bindings.unwrap();
        assert_eq!(bindings.len(), 2);
        let rtsp = bindings.get("8554/tcp").unwrap().as_ref().unwrap();
        assert_eq!(rtsp[0].host_port, Some("40002".to_string()));
        assert_eq!(rtsp[0].host_ip, Some("10.0.0.2".to_string()));
    }
}
