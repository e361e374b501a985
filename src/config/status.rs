use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct Status {
    #[serde(default)]
    pub(crate) enabled: bool,
    #[serde(default = "default_port")]
    pub(crate) port: u16,
}

fn default_port() -> u16 {
    3030
}

impl Default for Status {
    fn default() -> Self {
        Status {
            enabled: false,
            port: default_port(),
        }
    }
}
