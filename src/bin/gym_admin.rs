//! Operator CLI for a running Gym API instance.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gym_admin", about = "Gym API operations helper")]
struct Cli {
    /// Base URL of the running server
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check server and database health
    Health,
    /// Trigger the membership status sweep for the token's gym
    Sweep {
        /// Admin bearer token
        #[arg(long, env = "GYM_API_TOKEN")]
        token: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Command::Health => {
            let res = client
                .get(format!("{}/health", cli.base_url))
                .send()
                .await
                .context("health request failed")?;
            let status = res.status();
            let body: Value = res.json().await.context("health response was not JSON")?;
            println!("{}", serde_json::to_string_pretty(&body)?);
            anyhow::ensure!(status.is_success(), "server reported {status}");
        }
        Command::Sweep { token } => {
            let res = client
                .post(format!("{}/api/members/status-check", cli.base_url))
                .bearer_auth(token)
                .send()
                .await
                .context("status-check request failed")?;
            let status = res.status();
            let body: Value = res.json().await.context("sweep response was not JSON")?;
            println!("{}", serde_json::to_string_pretty(&body)?);
            anyhow::ensure!(status.is_success(), "sweep failed with {status}");
        }
    }

    Ok(())
}
