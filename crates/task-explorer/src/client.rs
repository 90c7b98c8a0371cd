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

use alloy::{
    network::TransactionResponse,
    primitives::{Address, B256},
    providers::Provider,
    rpc::types::{Filter, Log},
    sol_types::SolEvent,
};
use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::{
    contracts::{ICoprocessor, ICoprocessorCallback},
    paginate::BlockRange,
    Notice, Task,
};

/// Chain access needed by the explorer.
///
/// Passed explicitly into every fetch so tests can substitute a fake chain.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current tip of the chain.
    async fn block_number(&self) -> Result<u64>;

    /// `TaskIssued` events emitted by `coprocessor` within `range`.
    async fn task_issued_logs(&self, coprocessor: Address, range: BlockRange) -> Result<Vec<Task>>;

    /// `NoticeReceived` events emitted by `callback` for `payload_hash` within `range`.
    async fn notice_logs(
        &self,
        callback: Address,
        payload_hash: B256,
        range: BlockRange,
    ) -> Result<Vec<Notice>>;

    /// Sender of the transaction with the given hash.
    async fn transaction_sender(&self, tx_hash: B256) -> Result<Address>;
}

/// [ChainClient] backed by an alloy [Provider].
#[derive(Clone, Debug)]
pub struct AlloyChainClient<P> {
    provider: P,
}

impl<P: Provider> AlloyChainClient<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P: Provider> ChainClient for AlloyChainClient<P> {
    async fn block_number(&self) -> Result<u64> {
        self.provider.get_block_number().await.context("Failed to get block number")
    }

    async fn task_issued_logs(&self, coprocessor: Address, range: BlockRange) -> Result<Vec<Task>> {
        let filter = Filter::new()
            .address(coprocessor)
            .event_signature(ICoprocessor::TaskIssued::SIGNATURE_HASH)
            .from_block(range.from)
            .to_block(range.to);

        let logs = self.provider.get_logs(&filter).await.with_context(|| {
            format!("Failed to get TaskIssued logs for blocks {} - {}", range.from, range.to)
        })?;

        Ok(logs
            .iter()
            .filter_map(|log| match decode_task_log(log) {
                Ok(task) => Some(task),
                Err(err) => {
                    tracing::error!("Failed to decode TaskIssued log: {err:?}");
                    None
                }
            })
            .collect())
    }

    async fn notice_logs(
        &self,
        callback: Address,
        payload_hash: B256,
        range: BlockRange,
    ) -> Result<Vec<Notice>> {
        let filter = Filter::new()
            .address(callback)
            .event_signature(ICoprocessorCallback::NoticeReceived::SIGNATURE_HASH)
            .topic1(payload_hash)
            .from_block(range.from)
            .to_block(range.to);

        let logs = self.provider.get_logs(&filter).await.with_context(|| {
            format!("Failed to get NoticeReceived logs for blocks {} - {}", range.from, range.to)
        })?;

        Ok(logs
            .iter()
            .filter_map(|log| match decode_notice_log(log) {
                Ok(notice) => Some(notice),
                Err(err) => {
                    tracing::error!("Failed to decode NoticeReceived log: {err:?}");
                    None
                }
            })
            .collect())
    }

    async fn transaction_sender(&self, tx_hash: B256) -> Result<Address> {
        let tx = self
            .provider
            .get_transaction_by_hash(tx_hash)
            .await
            .with_context(|| format!("Failed to get transaction {tx_hash}"))?
            .with_context(|| format!("Transaction not found for hash: {tx_hash}"))?;
        Ok(tx.from())
    }
}

fn decode_task_log(log: &Log) -> Result<Task> {
    let event = log.log_decode::<ICoprocessor::TaskIssued>()?.inner.data;
    Ok(Task {
        transaction_hash: log.transaction_hash.context("Transaction hash not found")?,
        block_number: log.block_number.context("Block number not found")?,
        machine_hash: event.machineHash,
        input: event.input,
        callback: event.callback,
    })
}

fn decode_notice_log(log: &Log) -> Result<Notice> {
    let event = log.log_decode::<ICoprocessorCallback::NoticeReceived>()?.inner.data;
    Ok(Notice {
        transaction_hash: log.transaction_hash.context("Transaction hash not found")?,
        block_number: log.block_number.context("Block number not found")?,
        payload_hash: event.payloadHash,
        user: event.user,
        notice: event.notice,
    })
}
