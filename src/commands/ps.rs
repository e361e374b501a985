use clap::{Arg, ArgMatches, Command};
use cli_table::{format::Justify, print_stdout, Table, WithTitle};
use crate::config::config::Config;
use crate::fleet::teardown::find_instances;
use crate::runtime::runtime::{DockerRuntime, Instance};

pub(crate) fn command_config() -> Command {
    Command::new("ps")
        .about("List containers of the image")
        .arg(
            Arg::new("image")
                .long("image")
                .help("Image whose containers are listed")
        )
}

#[derive(Table)]
struct InstanceTableItem {
    #[table(title = "ID", justify = "Justify::Right")]
    id: String,
    #[table(title = "Name")]
    name: String,
    #[table(title = "Image")]
    image: String,
    #[table(title = "Status")]
    status: String,
}

impl From<&Instance> for InstanceTableItem {
    fn from(instance: &Instance) -> Self {
        InstanceTableItem {
            id: instance.short_id().to_string(),
            name: instance.display_name(),
            image: instance.image.clone(),
            status: instance.status_text.clone(),
        }
    }
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

    match find_instances(&runtime, &image).await {
        Ok(instances) => {
            let rows: Vec<InstanceTableItem> = instances.iter().map(InstanceTableItem::from).collect();
            print_stdout(rows.with_title()).unwrap_or_else(|e| error!("Unable to print instances: {}", e));
        }
        Err(err) => {
            eprintln!("Unable to list containers: {}", err);
            std::process::exit(1);
        }
    }
}
