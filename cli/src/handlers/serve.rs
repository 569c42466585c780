use clap::Args;
use svara::config::ServiceConfig;
use tokio::runtime::Runtime;

use crate::{handlers::SynthesizeArgs, server::run_server};

/// Command-line overrides for the environment configuration of the server.
#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long)]
    pub host: Option<String>,
    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,
    #[command(flatten)]
    pub pipeline: SynthesizeArgs,
}

impl ServeArgs {
    pub fn apply(
        self,
        config: ServiceConfig,
    ) -> ServiceConfig {
        let mut config = self.pipeline.apply(config);
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }
}

pub fn handle_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = args.apply(ServiceConfig::from_env()?);
    let runtime = Runtime::new()?;
    runtime.block_on(run_server(config))
}
