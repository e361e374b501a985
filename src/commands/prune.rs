use clap::{Arg, ArgMatches, Command};
use crate::config::config::Config;
use crate::fleet::teardown::teardown;
use crate::runtime::runtime::DockerRuntime;

pub(crate) fn command_config() -> Command {
    Command::new("prune")
        .about("Stop and remove every container of the image")
        .arg(
            Arg::new("image")
                .long("image")
                .help("Image whose containers are removed")
        )
}

pub(crate) async fn execute(args: &ArgMatches, configuration: Config) {
    let image = args.get_one::<String>("image").cloned().unwrap_or(configuration.image);

    let runtime = match DockerRuntime::connect().await {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    match teardown(&runtime, &image, configuration.stop_timeout).await {
        Ok(removed) => {
            for id in removed.iter() {
                println!("Deleted {}", id);
            }
            println!("{} container(s) of {} removed", removed.len(), image);
        }
        Err(err) => {
            eprintln!("Unable to prune {}: {}", image, err);
            std::process::exit(1);
        }
    }
}
