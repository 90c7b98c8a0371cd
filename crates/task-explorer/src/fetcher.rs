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

//! Paginated fetchers for tasks and notices.

use alloy::primitives::{Address, B256};
use anyhow::{Context, Result};

use crate::{
    client::ChainClient, deployments::Deployment, errors::ExplorerErr, paginate::paginate,
    pipeline::enrich_and_filter, Notice, Task,
};

/// Rejects an empty account before any network call is made.
///
/// Only emptiness is checked. Text that is not a valid address simply never matches a sender.
pub fn validate_account(account: &str) -> Result<&str, ExplorerErr> {
    let account = account.trim();
    if account.is_empty() {
        return Err(ExplorerErr::EmptyAccount);
    }
    Ok(account)
}

/// Case-insensitive comparison of a transaction sender with the account entered by the user.
pub fn sender_matches(sender: &Address, account: &str) -> bool {
    let account =
        account.strip_prefix("0x").or_else(|| account.strip_prefix("0X")).unwrap_or(account);
    hex::encode(sender).eq_ignore_ascii_case(account)
}

/// Every `TaskIssued` event of the deployment whose callback is the deployment's callback
/// contract, from the genesis block up to the current tip.
pub async fn fetch_tasks<C>(client: &C, deployment: &Deployment) -> Result<Vec<Task>>
where
    C: ChainClient + ?Sized,
{
    let tip = client.block_number().await?;
    tracing::info!(
        "Fetching TaskIssued events from blocks {} - {tip}",
        deployment.genesis_block
    );

    let tasks = paginate(deployment.genesis_block, tip, deployment.max_block_span, |range| {
        client.task_issued_logs(deployment.coprocessor_address, range)
    })
    .await
    .context("Failed to fetch TaskIssued events")?;

    let total = tasks.len();
    let tasks: Vec<Task> =
        tasks.into_iter().filter(|task| task.callback == deployment.callback_address).collect();
    tracing::debug!(
        "{} of {total} tasks target callback {}",
        tasks.len(),
        deployment.callback_address
    );

    Ok(tasks)
}

/// Tasks of the deployment whose originating transaction was sent by `account`.
///
/// Ownership is attributed by transaction sender, so a relayed transaction is credited to the
/// relayer.
pub async fn fetch_tasks_by_sender<C>(
    client: &C,
    deployment: &Deployment,
    account: &str,
) -> Result<Vec<Task>, ExplorerErr>
where
    C: ChainClient + ?Sized,
{
    let account = validate_account(account)?;
    let tasks = fetch_tasks(client, deployment).await?;
    let candidates = tasks.len();

    let tasks = enrich_and_filter(
        tasks,
        |task| client.transaction_sender(task.transaction_hash),
        |_, sender| sender_matches(sender, account),
    )
    .await
    .context("Failed to look up task senders")?;

    tracing::info!("Found {} tasks sent by {account} out of {candidates}", tasks.len());
    Ok(tasks)
}

/// Every `NoticeReceived` event for `payload_hash`, from the genesis block up to the current tip.
pub async fn fetch_notices<C>(
    client: &C,
    deployment: &Deployment,
    payload_hash: B256,
) -> Result<Vec<Notice>>
where
    C: ChainClient + ?Sized,
{
    let tip = client.block_number().await?;
    tracing::info!(
        "Fetching notices for payload {payload_hash} from blocks {} - {tip}",
        deployment.genesis_block
    );

    let notices = paginate(deployment.genesis_block, tip, deployment.max_block_span, |range| {
        client.notice_logs(deployment.callback_address, payload_hash, range)
    })
    .await
    .context("Failed to fetch NoticeReceived events")?;

    tracing::info!("Found {} notices for payload {payload_hash}", notices.len());
    Ok(notices)
}
