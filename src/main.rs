use clap::{Command, Arg};

#[macro_use]
extern crate log;
extern crate env_logger;

mod commands {
    pub(crate) mod context;
    pub(crate) mod prune;
    pub(crate) mod ps;
    pub(crate) mod redeploy;
}

mod config {
    pub(crate) mod config;
    pub(crate) mod status;
    pub(crate) mod transport;
}

mod fleet {
    pub(crate) mod deploy;
    pub(crate) mod hold;
    pub(crate) mod replica;
    pub(crate) mod teardown;
}

mod ports {
    pub(crate) mod allocator;
    pub(crate) mod bindings;
}

mod runtime {
    pub(crate) mod docker;
    pub(crate) mod error;
    pub(crate) mod runtime;
}

mod api {
    pub(crate) mod server;
    pub(crate) mod action {
        pub(crate) mod hello;
        pub(crate) mod replicas;
    }
}

mod utils {
    pub(crate) mod image;
}


fn app() -> Command {
    Command::new("rtsp-fleet")
        .version("0.1.0")
        .author("Mlanawo Mbechezi <mlanawo.mbechezi@kemeter.io>")
        .about("Reclaim and redeploy a fleet of RTSP streaming servers")
        .arg(
            Arg::new("context")
                .required(false)
                .global(true)
                .help("Sets the context to use (e.g., lab, edge)")
                .long("context")
                .short('c')
        )
        .args(commands::redeploy::args())
        .args_conflicts_with_subcommands(true)
        .subcommand(
            commands::redeploy::command_config(),
        )
        .subcommand(
            commands::prune::command_config(),
        )
        .subcommand(
            commands::ps::command_config(),
        )
        .subcommand(
            commands::context::command_config(),
        )
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let matches = app().get_matches();
    let context = matches.get_one::<String>("context")
        .map(|s| s.as_str())
        .unwrap_or("");

    let config = config::config::load_config(context);

    match matches.subcommand() {
        Some(("redeploy", sub_matches)) => {
            commands::redeploy::execute(
                sub_matches,
                config,
            ).await
        }
        Some(("prune", sub_matches)) => {
            commands::prune::execute(
                sub_matches,
                config,
            ).await
        }
        Some(("ps", sub_matches)) => {
            commands::ps::execute(
                sub_matches,
                config,
            ).await
        }
        Some(("context", sub_matches)) => {
            commands::context::execute(
                sub_matches,
                config,
            );
        }
        _ => {
            commands::redeploy::execute(
                &matches,
                config,
            ).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_is_well_formed() {
        app().debug_assert();
    }

    #[test]
    fn test_context_is_global() {
        let matches = app().get_matches_from(vec!["rtsp-fleet", "prune", "--context", "lab"]);
        let (_, sub_matches) = matches.subcommand().unwrap();
        assert_eq!(sub_matches.get_one::<String>("context"), Some(&"lab".to_string()));
    }

    #[test]
    fn test_redeploy_flags_without_subcommand() {
        let matches = app().get_matches_from(vec!["rtsp-fleet", "--replicas", "2", "--context", "lab"]);
        assert!(matches.subcommand().is_none());

        let configuration = commands::redeploy::apply_overrides(&matches, config::config::Config::default()).unwrap();
        assert_eq!(configuration.replicas, 2);
        assert_eq!(matches.get_one::<String>("context"), Some(&"lab".to_string()));
    }

    #[test]
    fn test_redeploy_flags_conflict_with_other_subcommands() {
        let result = app().try_get_matches_from(vec!["rtsp-fleet", "--replicas", "2", "prune"]);
        assert!(result.is_err());
    }
}
