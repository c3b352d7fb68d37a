//! Definitions of CLI arguments and commands for the deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{configure, deploy, predict},
    errors::ScriptError,
    utils::Client,
};

/// The deploy scripts CLI
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer
    // TODO: Better key management
    #[arg(short, long, env = "DEPLOYER_PRIV_KEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long)]
    pub rpc_url: String,

    /// Path to the file in which deployed addresses are recorded
    #[arg(short, long, default_value = "deployments.json")]
    pub deployments_path: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The subcommands of the deploy scripts CLI
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the vault & strategy contract pair
    Deploy(DeployArgs),
    /// Predict the deployment addresses of the deployer's next two contracts
    Predict(PredictArgs),
    /// Re-run the post-deployment configuration calls on a strategy
    Configure(ConfigureArgs),
}

impl Command {
    /// Run the command
    pub async fn run(self, client: Client, deployments_path: &str) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, client, deployments_path).await,
            Command::Predict(_) => predict(client).await,
            Command::Configure(args) => configure(args, client).await,
        }
    }
}

/// Deploy the vault & strategy contract pair.
///
/// The strategy's address is predicted from the deployer nonce before
/// anything is sent; the vault is deployed first with the prediction embedded
/// in its constructor, then the strategy is deployed referencing the real
/// vault address. Both real addresses are checked against the predictions.
#[derive(Args)]
pub struct DeployArgs {
    /// Path to the deployment configuration file
    #[arg(short, long)]
    pub config: PathBuf,
}

/// Predict the deployment addresses of the deployer's next two contracts
/// without sending any transaction
#[derive(Args)]
pub struct PredictArgs {}

/// Re-run the post-deployment configuration calls against an already
/// deployed strategy; both calls are idempotent
#[derive(Args)]
pub struct ConfigureArgs {
    /// Address of the deployed strategy contract in hex
    #[arg(short, long)]
    pub strategy: String,

    /// The chef view function the strategy polls for claimable rewards
    #[arg(short, long)]
    pub pending_rewards_function_name: String,

    /// The network the strategy is deployed to
    #[arg(short, long)]
    pub network: String,
}
