use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    config::Config,
    deploy::{Deploy, DeploymentRequest},
};

#[derive(Debug, Parser)]
pub struct CommandLine {
    /// Network configuration file.
    #[clap(short, long, default_value = "deploy.toml")]
    config: PathBuf,

    /// Network to deploy to, defaults to `default_network` from the config.
    #[clap(short, long)]
    network: Option<String>,

    /// Contract name or fully qualified `contracts/File.sol:Name`.
    #[clap(long)]
    contract: Option<String>,

    /// Constructor argument, repeat once per parameter.
    #[clap(long = "arg")]
    args: Vec<String>,

    /// Print the full transaction receipt.
    #[clap(long)]
    receipt: bool,
}

impl CommandLine {
    pub async fn execute(self) -> Result<()> {
        let config = Config::load(&self.config)?;
        let request = self.request(&config);
        let show_receipt = self.receipt || config.deploy.receipt;

        let deploy = Deploy::new(&config, self.network.as_deref()).await?;
        deploy.run(&request, show_receipt).await
    }

    fn request(&self, config: &Config) -> DeploymentRequest {
        let args = if self.args.is_empty() {
            config.deploy.args.clone()
        } else {
            self.args.clone()
        };
        DeploymentRequest {
            contract: self
                .contract
                .clone()
                .unwrap_or_else(|| config.deploy.contract.clone()),
            args,
        }
    }
}
