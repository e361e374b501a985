use clap::{Arg, ArgMatches, Command};
use cli_table::{format::Justify, print_stdout, Table, WithTitle};
use crate::config::config::{get_config_dir, load_contexts, Config};

pub(crate) fn command_config() -> Command {
    Command::new("context")
        .name("context")
        .about("Print contexts configuration")
        .arg(
            Arg::new("parameter")
                .required(false)
                .help("show specific parameter")
        )
}

#[derive(Table)]
struct ConfigTableItem {
    #[table(title = "Name", justify = "Justify::Right")]
    name: String,
    #[table(title = "Image")]
    image: String,
    #[table(title = "Replicas")]
    replicas: usize,
    #[table(title = "Host IP")]
    host_ip: String,
    #[table(title = "Current")]
    current: bool,
}

pub(crate) fn execute(args: &ArgMatches, configuration: Config) {
    let binding = "configs".to_string();
    let parameter = args.get_one::<String>("parameter").unwrap_or(&binding);

    if parameter == "current-context" {
        println!("{:#?}", configuration);
    }

    if parameter == "configs" {
        let mut configs = vec![];

        if let Some(contexts) = load_contexts(&get_config_dir()) {
            for (key, value) in contexts.contexts {
                configs.push(ConfigTableItem {
                    name: key,
                    image: value.image,
                    replicas: value.replicas,
                    host_ip: value.host_ip,
                    current: value.current,
                })
            }
        }

        configs.sort_by(|a, b| a.name.cmp(&b.name));

        print_stdout(configs.with_title()).unwrap_or_else(|e| error!("Unable to print contexts: {}", e));
    }
}
