mod container;
mod image;
mod instances;

use bollard::Docker;
use crate::runtime::error::RuntimeError;

pub(crate) use container::{create_container, remove_container, start_container, stop_container};
pub(crate) use image::pull_image;
pub(crate) use instances::list_instances;

pub(crate) const LABEL_IMAGE: &str = "rtsp_fleet.image";
pub(crate) const LABEL_REPLICA: &str = "rtsp_fleet.replica";

impl From<bollard::errors::Error> for RuntimeError {
    fn from(err: bollard::errors::Error) -> Self {
        let err_msg = err.to_string();
        if err_msg.contains("404") || err_msg.contains("not found") || err_msg.contains("manifest unknown") {
            RuntimeError::ImageNotFound(err_msg)
        } else {
            RuntimeError::Other(err_msg)
        }
    }
}

pub(crate) async fn connect() -> Result<Docker, RuntimeError> {
    let docker = Docker::connect_with_local_defaults()
        .map_err(|e| RuntimeError::ConnectionFailed(format!("Failed to connect to Docker: {}", e)))?;

    docker
        .negotiate_version()
        .await
        .map_err(|e| RuntimeError::ConnectionFailed(format!("Docker API version negotiation failed: {}", e)))
}

pub(crate) fn tiny_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    format!("{:08x}", rng.random::<u32>())
}
