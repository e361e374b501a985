use std::time::Duration;
use tokio::time::sleep;
use crate::config::config::Config;

/// How long the process stays up once the replicas have been started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Hold {
    For(Duration),
    Forever,
}

impl From<&Config> for Hold {
    fn from(config: &Config) -> Self {
        if config.forever {
            Hold::Forever
        } else {
            Hold::For(Duration::from_secs(config.hold))
        }
    }
}

impl Hold {
    pub(crate) async fn wait(&self) {
        match self {
            Hold::For(duration) => {
                debug!("Holding for {:?}", duration);
                sleep(*duration).await;
            }
            Hold::Forever => {
                info!("Holding until interrupted (Ctrl-C)");
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Unable to listen for shutdown signal: {}", e);
                }
            }
        }
    }
}
