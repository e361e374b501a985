use futures::future::join_all;
use crate::fleet::replica::{FleetPlan, FleetReport, Replica};
use crate::fleet::teardown::teardown;
use crate::ports::allocator::PortAllocator;
use crate::ports::bindings::PortTable;
use crate::runtime::error::RuntimeError;
use crate::runtime::runtime::{InstanceSpec, PullPolicy, RuntimeInterface};

async fn deploy_replica(runtime: &(dyn RuntimeInterface + Send + Sync), pull_policy: PullPolicy, index: usize, spec: InstanceSpec) -> Result<Replica, RuntimeError> {
    debug!("Deploy replica {} as {} on {}", index, spec.name, spec.ports);

    runtime.pull_image(&spec.image, pull_policy).await?;

    let id = runtime.create_instance(&spec).await?;

    if let Err(err) = runtime.start_instance(&id).await {
        if let Err(remove_err) = runtime.remove_instance(&id).await {
            warn!("Unable to clean up container {}: {}", id, remove_err);
        }
        return Err(err);
    }

    Ok(Replica {
        index,
        id,
        name: spec.name,
        ports: spec.ports,
    })
}

/// Replace every container of the plan's image by `plan.replicas` fresh ones.
///
/// Teardown completes before anything is created; when it fails nothing is
/// deployed. Port tables are all allocated before the first container is
/// created, then replicas are deployed concurrently. One failing replica
/// does not stop the others.
pub(crate) async fn redeploy(runtime: &(dyn RuntimeInterface + Send + Sync), plan: &FleetPlan) -> Result<FleetReport, RuntimeError> {
    let removed = teardown(runtime, &plan.image, plan.stop_timeout).await?;
    info!("Removed {} stale container(s) of {}", removed.len(), plan.image);

    let mut allocator = PortAllocator::new();
    let mut specs = Vec::with_capacity(plan.replicas);
    for index in 0..plan.replicas {
        let ports = PortTable::allocate(&plan.host_ip, &plan.ports, &mut allocator)?;
        specs.push((index, plan.instance_spec(index, ports)));
    }

    info!("Starting {} replica(s) of {}", plan.replicas, plan.image);

    let results = join_all(
        specs
            .into_iter()
            .map(|(index, spec)| async move { (index, deploy_replica(runtime, plan.pull_policy, index, spec).await) }),
    )
    .await;

    let mut report = FleetReport { removed, ..Default::default() };

    for (index, result) in results {
        match result {
            Ok(replica) => {
                info!("Replica {} started as {} ({})", index, replica.name, replica.ports);
                report.replicas.push(replica);
            }
            Err(err) => {
                error!("Replica {} failed: {}", index, err);
                report.failures.push((index, err));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use crate::config::config::Config;
    use crate::fixtures::runtime::{instance, FakeRuntime};

    const IMAGE: &str = "aler9/rtsp-simple-server";

    fn plan(replicas: usize) -> FleetPlan {
        FleetPlan::from(&Config { replicas, host_ip: "127.0.0.1".to_string(), ..Config::default() })
    }

    #[tokio::test]
    async fn test_redeploy_replaces_stale_containers() {
        let runtime = FakeRuntime::with_instances(vec![
            instance("stale1", IMAGE, "Up 1 hour"),
            instance("stale2", IMAGE, "Exited (1) 1 hour ago"),
        ]);

        let report = redeploy(&runtime, &plan(5)).await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.removed, vec!["stale1".to_string(), "stale2".to_string()]);
        assert_eq!(report.replicas.len(), 5);

        let ids = runtime.instance_ids();
        assert!(!ids.contains(&"stale1".to_string()));
        assert!(!ids.contains(&"stale2".to_string()));
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn test_teardown_finishes_before_first_create() {
        let runtime = FakeRuntime::with_instances(vec![instance("stale", IMAGE, "Up 1 hour")]);

        redeploy(&runtime, &plan(3)).await.unwrap();

        let calls = runtime.calls();
        let last_teardown = calls.iter().rposition(|c| c.starts_with("remove stale")).unwrap();
        let first_create = calls.iter().position(|c| c.starts_with("create")).unwrap();
        assert!(last_teardown < first_create);
    }

    #[tokio::test]
    async fn test_every_replica_gets_distinct_host_ports() {
        let runtime = FakeRuntime::default();

        let report = redeploy(&runtime, &plan(5)).await.unwrap();

        let mut seen = HashSet::new();
        for replica in &report.replicas {
            assert_eq!(replica.ports.mappings.len(), 3);
            for mapping in &replica.ports.mappings {
                assert_eq!(mapping.host_ip, "127.0.0.1");
                assert!(seen.insert(mapping.host_port));
            }
        }
        assert_eq!(seen.len(), 15);

        for spec in runtime.created() {
            assert_eq!(spec.env, vec!["RTSP_PROTOCOLS=tcp".to_string()]);
        }
    }

    #[tokio::test]
    async fn test_failed_teardown_deploys_nothing() {
        let mut runtime = FakeRuntime::with_instances(vec![instance("stale", IMAGE, "Up 1 hour")]);
        runtime.fail_stop.insert("stale".to_string());

        let result = redeploy(&runtime, &plan(2)).await;

        assert!(matches!(result, Err(RuntimeError::InstanceStopFailed(_))));
        assert!(runtime.created().is_empty());
    }

    #[tokio::test]
    async fn test_failing_replica_does_not_stop_siblings() {
        let mut runtime = FakeRuntime::default();
        runtime.fail_create_replica.insert(1);

        let report = redeploy(&runtime, &plan(3)).await.unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, 1);
        let indexes: Vec<usize> = report.replicas.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![0, 2]);
    }

    #[tokio::test]
    async fn test_start_failure_removes_created_container() {
        let mut runtime = FakeRuntime::default();
        runtime.fail_start = true;

        let report = redeploy(&runtime, &plan(1)).await.unwrap();

        assert!(matches!(report.failures[0].1, RuntimeError::InstanceStartFailed(_)));
        assert!(runtime.instance_ids().is_empty());
    }

    #[tokio::test]
    async fn test_zero_replicas_is_teardown_only() {
        let runtime = FakeRuntime::with_instances(vec![instance("stale", IMAGE, "Up 1 hour")]);

        let report = redeploy(&runtime, &plan(0)).await.unwrap();

        assert!(report.is_success());
        assert!(report.replicas.is_empty());
        assert_eq!(report.removed, vec!["stale".to_string()]);
        assert!(!runtime.calls().iter().any(|c| c.starts_with("pull")));
    }
}
