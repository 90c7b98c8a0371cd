// Copyright 2026 Boundless Foundation, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use alloy::{providers::Provider, providers::ProviderBuilder, rpc::client::RpcClient};
use anyhow::{Context, Result};
use clap::Parser;
use task_explorer::{
    browse::browse,
    config::Config,
    deployments::HOLESKY_RPC_URL,
    export::export_images,
    render::{notice_reports, render, task_reports},
    rpc_log::RpcLogLayer,
    AlloyChainClient, Args, ChainClient, Command, Explorer,
};
use tokio::io::BufReader;
use tracing_subscriber::{filter::LevelFilter, fmt::format::FmtSpan, EnvFilter};
use url::Url;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter =
        EnvFilter::builder().with_default_directive(LevelFilter::WARN.into()).from_env_lossy();
    if args.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .with_ansi(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match &args.config_file {
        Some(path) => Config::load(path).await.context("Failed to load explorer config")?,
        None => Config::default(),
    };

    let rpc_url = match args.rpc_url.clone().or_else(|| config.rpc_url.clone()) {
        Some(url) => url,
        None => Url::parse(HOLESKY_RPC_URL).context("Invalid default RPC URL")?,
    };
    tracing::info!("Using RPC URL {rpc_url}");

    let rpc_log = RpcLogLayer::new();
    let rpc_stats = rpc_log.stats();
    let client = RpcClient::builder().layer(rpc_log).http(rpc_url.clone());
    let provider = ProviderBuilder::new().connect_client(client);

    let chain_id = provider
        .get_chain_id()
        .await
        .with_context(|| format!("failed to connect provider to {rpc_url}"))?;
    let deployment = config.resolve_deployment(chain_id)?;
    tracing::debug!("Using deployment {deployment:?} on chain {chain_id}");

    let mut explorer = Explorer::new(AlloyChainClient::new(provider), deployment);
    let res = run(args.command, &mut explorer).await;
    rpc_stats.summary();
    res
}

async fn run<C: ChainClient>(command: Command, explorer: &mut Explorer<C>) -> Result<()> {
    match command {
        Command::Tasks { account, json, image_dir } => {
            explorer.search(&account).await?;
            let tasks = explorer.tasks().unwrap_or_default();
            if json {
                println!("{}", serde_json::to_string_pretty(&task_reports(tasks))?);
            } else {
                println!("{}", render(explorer));
            }
            if let Some(dir) = image_dir {
                let written = export_images(tasks, &dir).await?;
                eprintln!("Wrote {} images to {}", written.len(), dir.display());
            }
        }
        Command::Notices { payload_hash, json } => {
            explorer.open_payload(payload_hash).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&notice_reports(explorer.notices()))?);
            } else {
                println!("{}", render(explorer));
            }
        }
        Command::Browse { account } => {
            if let Err(err) = explorer.search(&account).await {
                tracing::debug!("Initial search failed: {err:?}");
            }
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            browse(explorer, stdin, &mut stdout).await?;
        }
    }

    Ok(())
}
