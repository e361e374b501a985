use crate::runtime::error::RuntimeError;
use crate::runtime::runtime::{Instance, RuntimeInterface};
use crate::utils::image::image_matches;

pub(crate) async fn find_instances(runtime: &(dyn RuntimeInterface + Send + Sync), image: &str) -> Result<Vec<Instance>, RuntimeError> {
    let instances = runtime.list_instances().await?;

    Ok(instances
        .into_iter()
        .filter(|instance| image_matches(image, &instance.image))
        .collect())
}

/// Stop and remove every container created from `image`.
///
/// Runs one container at a time and stops at the first failure. Once done the
/// runtime is listed again, any survivor is reported as
/// [`RuntimeError::TeardownIncomplete`].
pub(crate) async fn teardown(runtime: &(dyn RuntimeInterface + Send + Sync), image: &str, stop_timeout: i32) -> Result<Vec<String>, RuntimeError> {
    let stale = find_instances(runtime, image).await?;
    let mut removed = Vec::with_capacity(stale.len());

    for instance in stale {
        info!("Found container {} with id {} ({})", instance.image, instance.id, instance.status_text);

        if !instance.status.is_exited() {
            info!("Stopping container {}", instance.short_id());
            runtime.stop_instance(&instance.id, stop_timeout).await?;
        }

        runtime.remove_instance(&instance.id).await?;
        info!("Deleted {}", instance.id);

        removed.push(instance.id);
    }

    let survivors: Vec<String> = find_instances(runtime, image)
        .await?
        .into_iter()
        .map(|instance| instance.id)
        .collect();

    if !survivors.is_empty() {
        error!("{} container(s) of {} survived teardown", survivors.len(), image);
        return Err(RuntimeError::TeardownIncomplete(survivors));
    }

    Ok(removed)
}
