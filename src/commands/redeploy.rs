use std::sync::Arc;
use clap::{Arg, ArgAction, ArgMatches, Command};
use cli_table::{print_stdout, Table, WithTitle};
use tokio::sync::oneshot;
use crate::api::server;
use crate::config::config::Config;
use crate::fleet::deploy::redeploy;
use crate::fleet::hold::Hold;
use crate::fleet::replica::{FleetPlan, FleetReport};
use crate::runtime::error::RuntimeError;
use crate::runtime::runtime::DockerRuntime;

/// Flags shared by `redeploy` and the bare command.
pub(crate) fn args() -> Vec<Arg> {
    vec![
        Arg::new("image")
            .long("image")
            .help("Image to redeploy"),
        Arg::new("replicas")
            .long("replicas")
            .short('r')
            .value_parser(clap::value_parser!(usize))
            .help("Number of replicas to start"),
        Arg::new("host-ip")
            .long("host-ip")
            .help("Host address the ports are published on"),
        Arg::new("transport")
            .long("transport")
            .help("Transport protocols of the streaming server (tcp, udp, multicast)"),
        Arg::new("pull")
            .long("pull")
            .value_parser(["always", "missing", "never"])
            .help("When to pull the image"),
        Arg::new("hold")
            .long("hold")
            .value_parser(clap::value_parser!(u64))
            .conflicts_with("forever")
            .help("Seconds to stay up after the replicas are started"),
        Arg::new("forever")
            .long("forever")
            .action(ArgAction::SetTrue)
            .help("Stay up until interrupted"),
        Arg::new("serve")
            .long("serve")
            .action(ArgAction::SetTrue)
            .help("Serve the status endpoint while holding"),
        Arg::new("status-port")
            .long("status-port")
            .value_parser(clap::value_parser!(u16))
            .help("Port of the status endpoint"),
    ]
}

pub(crate) fn command_config() -> Command {
    Command::new("redeploy")
        .about("Remove every container of the image and start fresh replicas")
        .args(args())
}

pub(crate) fn apply_overrides(args: &ArgMatches, mut configuration: Config) -> Result<Config, RuntimeError> {
    if let Some(image) = args.get_one::<String>("image") {
        configuration.image = image.clone();
    }

    if let Some(replicas) = args.get_one::<usize>("replicas") {
        configuration.replicas = *replicas;
    }

    if let Some(host_ip) = args.get_one::<String>("host-ip") {
        configuration.host_ip = host_ip.clone();
    }

    if let Some(transport) = args.get_one::<String>("transport") {
        configuration.transport = transport.parse()?;
    }

    if let Some(pull) = args.get_one::<String>("pull") {
        configuration.pull_policy = pull.parse()?;
    }

    if let Some(hold) = args.get_one::<u64>("hold") {
        configuration.hold = *hold;
        configuration.forever = false;
    }

    if args.get_flag("forever") {
        configuration.forever = true;
    }

    if args.get_flag("serve") {
        configuration.status.enabled = true;
    }

    if let Some(port) = args.get_one::<u16>("status-port") {
        configuration.status.port = *port;
    }

    Ok(configuration)
}

#[derive(Table)]
struct ReplicaTableItem {
    #[table(title = "Replica")]
    index: usize,
    #[table(title = "Name")]
    name: String,
    #[table(title = "ID")]
    id: String,
    #[table(title = "Ports")]
    ports: String,
}

fn print_report(report: &FleetReport) {
    let rows: Vec<ReplicaTableItem> = report.replicas
        .iter()
        .map(|replica| ReplicaTableItem {
            index: replica.index,
            name: replica.name.clone(),
            id: replica.id.chars().take(12).collect(),
            ports: replica.ports.to_string(),
        })
        .collect();

    if !rows.is_empty() {
        if let Err(e) = print_stdout(rows.with_title()) {
            error!("Unable to print replicas: {}", e);
        }
    }

    for (index, err) in report.failures.iter() {
        eprintln!("Replica {} failed: {}", index, err);
    }
}

async fn hold(configuration: &Config, report: &FleetReport) {
    let hold = Hold::from(configuration);

    if !configuration.status.enabled {
        hold.wait().await;
        return;
    }

    let listener = match server::bind(configuration.status.port).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("{}", e);
            hold.wait().await;
            return;
        }
    };

    let (shutdown, receiver) = oneshot::channel();
    let replicas = Arc::new(report.replicas.clone());
    let status_server = tokio::spawn(server::serve(listener, replicas, receiver));

    hold.wait().await;
    shutdown.send(()).ok();

    match status_server.await {
        Ok(Ok(())) => debug!("Status server stopped"),
        Ok(Err(e)) => error!("{}", e),
        Err(e) => error!("Status server task failed: {}", e),
    }
}

async fn run(configuration: Config) {
    if let Err(err) = configuration.validate() {
        eprintln!("{}", err);
        std::process::exit(1);
    }

    debug!("Redeploy with context {}", configuration.name);

    let runtime = match DockerRuntime::connect().await {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    let plan = FleetPlan::from(&configuration);

    let report = match redeploy(&runtime, &plan).await {
        Ok(report) => report,
        Err(err) => {
            eprintln!("Redeploy aborted: {}", err);
            std::process::exit(1);
        }
    };

    println!("Removed {} container(s), started {} of {} replica(s)", report.removed.len(), report.replicas.len(), plan.replicas);
    print_report(&report);

    hold(&configuration, &report).await;

    if !report.is_success() {
        std::process::exit(1);
    }
}

pub(crate) async fn execute(args: &ArgMatches, configuration: Config) {
    match apply_overrides(args, configuration) {
        Ok(configuration) => run(configuration).await,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}
