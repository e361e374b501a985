use bollard::Docker;
use bollard::query_parameters::CreateImageOptionsBuilder;
use futures::StreamExt;
use crate::runtime::error::RuntimeError;
use crate::runtime::runtime::PullPolicy;
use crate::utils::image::split_reference;

pub(crate) async fn pull_image(docker: &Docker, reference: &str, policy: PullPolicy) -> Result<(), RuntimeError> {
    if policy == PullPolicy::Never {
        debug!("Pull policy is Never, skipping pull of {}", reference);
        return Ok(());
    }

    if policy == PullPolicy::IfNotPresent && docker.inspect_image(reference).await.is_ok() {
        debug!("Docker image {} already exists locally", reference);
        return Ok(());
    }

    let (image, tag) = split_reference(reference);
    info!("Pull docker image: {}", reference);

    let mut builder = CreateImageOptionsBuilder::new().from_image(&image);
    if !tag.is_empty() {
        builder = builder.tag(&tag);
    }

    let mut stream = docker.create_image(Some(builder.build()), None, None);

    while let Some(pull_result) = stream.next().await {
        match pull_result {
            Ok(info) => {
                if let Some(status) = info.status {
                    debug!(
                        "{} {} {}",
                        info.id.unwrap_or_default(),
                        status,
                        info.progress.unwrap_or_default()
                    );
                }
            }
            Err(e) => {
                let error_msg = e.to_string();
                error!("Docker image pull error: {}", error_msg);

                if error_msg.contains("404") || error_msg.contains("not found") || error_msg.contains("manifest unknown") {
                    return Err(RuntimeError::ImageNotFound(error_msg));
                }

                return Err(RuntimeError::ImagePullFailed(error_msg));
            }
        }
    }

    info!("Docker successfully pulled image {}", reference);
    Ok(())
}
