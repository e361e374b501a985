use std::collections::HashMap;
use std::fs;
use std::env;
use std::path::Path;
use serde::Deserialize;
use local_ip_address::local_ip;
use crate::config;
use crate::config::transport::Transport;
use crate::ports::bindings::{default_container_ports, ensure_unique, ContainerPort};
use crate::runtime::error::RuntimeError;
use crate::runtime::runtime::PullPolicy;
use toml::de::Error as TomlError;

pub(crate) const DEFAULT_IMAGE: &str = "aler9/rtsp-simple-server";

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct Contexts {
    pub(crate) contexts: HashMap<String, Config>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) current: bool,
    #[serde(skip_deserializing)]
    pub(crate) name: String,
    pub(crate) image: String,
    pub(crate) replicas: usize,
    pub(crate) host_ip: String,
    pub(crate) ports: Vec<ContainerPort>,
    pub(crate) transport: Transport,
    pub(crate) pull_policy: PullPolicy,
    pub(crate) stop_timeout: i32,
    pub(crate) hold: u64,
    pub(crate) forever: bool,
    pub(crate) name_prefix: String,
    pub(crate) status: config::status::Status,
}

impl Config {
    pub(crate) fn validate(&self) -> Result<(), RuntimeError> {
        if self.image.trim().is_empty() {
            return Err(RuntimeError::InvalidConfig("image cannot be empty".to_string()));
        }

        if self.ports.is_empty() {
            return Err(RuntimeError::InvalidConfig("at least one container port is required".to_string()));
        }

        if self.stop_timeout < 0 {
            return Err(RuntimeError::InvalidConfig(format!("invalid stop timeout {}", self.stop_timeout)));
        }

        if self.host_ip.parse::<std::net::IpAddr>().is_err() {
            return Err(RuntimeError::InvalidConfig(format!("invalid host ip '{}'", self.host_ip)));
        }

        ensure_unique(&self.ports)
    }
}

fn default_host_ip() -> String {
    match local_ip() {
        Ok(ip) => ip.to_string(),
        Err(e) => {
            debug!("Unable to detect local ip, binding on all interfaces: {}", e);
            "0.0.0.0".to_string()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            current: true,
            name: "default".to_string(),
            image: DEFAULT_IMAGE.to_string(),
            replicas: 5,
            host_ip: default_host_ip(),
            ports: default_container_ports(),
            transport: Transport::default(),
            pull_policy: PullPolicy::default(),
            stop_timeout: 10,
            hold: 2,
            forever: false,
            name_prefix: "rtsp".to_string(),
            status: config::status::Status::default(),
        }
    }
}

pub(crate) fn get_config_dir() -> String {
    return match env::var_os("RTSP_FLEET_CONFIG_DIR") {
        Some(variable) => variable.to_string_lossy().into_owned(),
        None => format!("{}/.config/rtsp-fleet", env::var("HOME").unwrap_or_default())
    };
}

pub(crate) fn load_contexts(config_dir: &str) -> Option<Contexts> {
    let file = format!("{}/config.toml", config_dir);

    debug!("load config file {}", file);

    if !Path::new(&file).exists() {
        return None;
    }

    let contents = match fs::read_to_string(&file) {
        Ok(contents) => contents,
        Err(err) => {
            error!("Unable to read {}: {}", file, err);
            return None;
        }
    };

    let contexts: Result<Contexts, TomlError> = toml::from_str(&contents);

    match contexts {
        Ok(contexts) => Some(contexts),
        Err(err) => {
            error!("Error while deserializing the TOML file : {}", err);
            None
        }
    }
}

pub(crate) fn load_config_from(config_dir: &str, context_current: &str) -> Config {
    if let Some(contexts) = load_contexts(config_dir) {
        if let Some(config) = contexts.contexts.get(context_current) {
            debug!("Switch to context from {}", context_current);
            let mut config = config.clone();
            config.name = context_current.to_string();
            return config;
        }

        for (context_name, mut config) in contexts.contexts {
            if config.current {
                debug!("Switch to context {}", context_name);
                config.name = context_name;
                return config;
            }
        }
    }

    debug!("Switch to default configuration");

    Config::default()
}

pub(crate) fn load_config(context_current: &str) -> Config {
    load_config_from(&get_config_dir(), context_current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> String {
        let path = dir.path().to_string_lossy().into_owned();
        fs::write(format!("{}/config.toml", path), contents).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.image, "aler9/rtsp-simple-server");
        assert_eq!(config.replicas, 5);
        assert_eq!(config.ports, default_container_ports());
        assert_eq!(config.transport.env(), "RTSP_PROTOCOLS=tcp");
        assert_eq!(config.pull_policy, PullPolicy::IfNotPresent);
        assert_eq!(config.hold, 2);
        assert!(!config.status.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let dir = TempDir::new("rtsp-fleet").unwrap();
        let config = load_config_from(&dir.path().to_string_lossy(), "staging");
        assert_eq!(config.name, "default");
        assert_eq!(config.replicas, 5);
    }

    #[test]
    fn test_load_named_context() {
        let dir = TempDir::new("rtsp-fleet").unwrap();
        let path = write_config(&dir, r#"
[contexts.default]
current = true
replicas = 1

[contexts.lab]
current = false
image = "bluenviron/mediamtx:1.0"
replicas = 3
host_ip = "192.168.221.4"
ports = ["8000/udp", "8001/udp", "8554/tcp"]
transport = "udp,tcp"
pull_policy = "Always"

[contexts.lab.status]
enabled = true
port = 8080
"#);

        let config = load_config_from(&path, "lab");
        assert_eq!(config.name, "lab");
        assert_eq!(config.image, "bluenviron/mediamtx:1.0");
        assert_eq!(config.replicas, 3);
        assert_eq!(config.host_ip, "192.168.221.4");
        assert_eq!(config.ports[0].to_string(), "8000/udp");
        assert_eq!(config.transport.env(), "RTSP_PROTOCOLS=udp,tcp");
        assert_eq!(config.pull_policy, PullPolicy::Always);
        assert_eq!(config.status.port, 8080);
        assert!(config.status.enabled);
        assert_eq!(config.name_prefix, "rtsp");
    }

    #[test]
    fn test_unknown_context_uses_current() {
        let dir = TempDir::new("rtsp-fleet").unwrap();
        let path = write_config(&dir, r#"
[contexts.edge]
current = true
replicas = 2
"#);

        let config = load_config_from(&path, "missing");
        assert_eq!(config.name, "edge");
        assert_eq!(config.replicas, 2);
    }

    #[test]
    fn test_unmarked_contexts_are_not_current() {
        let dir = TempDir::new("rtsp-fleet").unwrap();
        let path = write_config(&dir, r#"
[contexts.lab]
replicas = 3

[contexts.edge]
replicas = 2
"#);

        let config = load_config_from(&path, "");
        assert_eq!(config.name, "default");
        assert_eq!(config.replicas, 5);

        let contexts = load_contexts(&path).unwrap();
        assert!(contexts.contexts.values().all(|config| !config.current));
    }

    #[test]
    fn test_malformed_file_falls_back_to_default() {
        let dir = TempDir::new("rtsp-fleet").unwrap();
        let path = write_config(&dir, r#"
[contexts.edge]
current = true
transport = "carrier-pigeon"
"#);

        let config = load_config_from(&path, "edge");
        assert_eq!(config.name, "default");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config { host_ip: "not-an-ip".to_string(), ..Config::default() };
        assert!(matches!(config.validate(), Err(RuntimeError::InvalidConfig(_))));

        let config = Config { ports: vec![], ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config { stop_timeout: -1, ..Config::default() };
        assert!(config.validate().is_err());
    }
}
