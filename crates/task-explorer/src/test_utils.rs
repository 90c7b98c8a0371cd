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

//! In-memory [ChainClient] for tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
};

use alloy::primitives::{keccak256, Address, Bytes, B256};
use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::{
    client::ChainClient, decode::TaskInput, deployments::Deployment, paginate::BlockRange, Notice,
    Task,
};

/// Deployment with fixed contract addresses and the given scan parameters.
pub fn sample_deployment(genesis_block: u64, max_block_span: u64) -> Deployment {
    Deployment::builder()
        .coprocessor_address(Address::repeat_byte(0xc0))
        .callback_address(Address::repeat_byte(0xca))
        .genesis_block(genesis_block)
        .max_block_span(max_block_span)
        .build()
        .unwrap()
}

/// A call made against the [MockChainClient].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRequest {
    BlockNumber,
    TaskLogs(BlockRange),
    NoticeLogs(B256, BlockRange),
    Sender(B256),
}

/// Chain stand-in holding tasks, notices and transaction senders in memory.
///
/// Every call is recorded so tests can assert on the requests that were made.
#[derive(Debug, Default)]
pub struct MockChainClient {
    tip: u64,
    tasks: Vec<(Address, Task)>,
    notices: Vec<(Address, Notice)>,
    senders: HashMap<B256, Address>,
    fail_at_block: Option<u64>,
    fail_notices_at_block: Option<u64>,
    nonce: AtomicU64,
    requests: Mutex<Vec<MockRequest>>,
}

impl MockChainClient {
    pub fn new(tip: u64) -> Self {
        Self { tip, ..Default::default() }
    }

    fn next_tx_hash(&self, block_number: u64) -> B256 {
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        keccak256([block_number.to_be_bytes(), nonce.to_be_bytes()].concat())
    }

    fn push_task(mut self, emitter: Address, task: Task, sender: Option<Address>) -> Self {
        if let Some(sender) = sender {
            self.senders.insert(task.transaction_hash, sender);
        }
        self.tasks.push((emitter, task));
        self
    }

    fn build_task(&self, callback: Address, block_number: u64, input: &TaskInput) -> Task {
        Task {
            transaction_hash: self.next_tx_hash(block_number),
            block_number,
            machine_hash: B256::repeat_byte(0x4d),
            input: input.encode().unwrap(),
            callback,
        }
    }

    /// Task addressed to the deployment's callback and sent by `sender`.
    pub fn with_task(
        self,
        deployment: &Deployment,
        block_number: u64,
        input: &TaskInput,
        sender: Address,
    ) -> Self {
        let task = self.build_task(deployment.callback_address, block_number, input);
        self.push_task(deployment.coprocessor_address, task, Some(sender))
    }

    /// Task emitted by the deployment's coprocessor but addressed to some other callback.
    pub fn with_foreign_callback_task(
        self,
        deployment: &Deployment,
        block_number: u64,
        input: &TaskInput,
        sender: Address,
    ) -> Self {
        let task = self.build_task(Address::repeat_byte(0xee), block_number, input);
        self.push_task(deployment.coprocessor_address, task, Some(sender))
    }

    /// Task whose transaction cannot be found.
    pub fn with_unknown_sender_task(
        self,
        deployment: &Deployment,
        block_number: u64,
        input: &TaskInput,
    ) -> Self {
        let task = self.build_task(deployment.callback_address, block_number, input);
        self.push_task(deployment.coprocessor_address, task, None)
    }

    /// Raw task, emitted by the deployment's coprocessor.
    pub fn with_raw_task(self, deployment: &Deployment, task: Task, sender: Address) -> Self {
        self.push_task(deployment.coprocessor_address, task, Some(sender))
    }

    pub fn with_notice(
        mut self,
        deployment: &Deployment,
        block_number: u64,
        payload_hash: B256,
        user: Address,
        notice: Vec<u8>,
    ) -> Self {
        let notice = Notice {
            transaction_hash: self.next_tx_hash(block_number),
            block_number,
            payload_hash,
            user,
            notice: Bytes::from(notice),
        };
        self.notices.push((deployment.callback_address, notice));
        self
    }

    /// Fail every log query whose range contains `block_number`.
    pub fn fail_logs_at(mut self, block_number: u64) -> Self {
        self.fail_at_block = Some(block_number);
        self
    }

    /// Fail only the notice log queries whose range contains `block_number`.
    pub fn fail_notice_logs_at(mut self, block_number: u64) -> Self {
        self.fail_notices_at_block = Some(block_number);
        self
    }

    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn task_ranges(&self) -> Vec<BlockRange> {
        self.requests()
            .into_iter()
            .filter_map(|req| match req {
                MockRequest::TaskLogs(range) => Some(range),
                _ => None,
            })
            .collect()
    }

    pub fn notice_ranges(&self) -> Vec<BlockRange> {
        self.requests()
            .into_iter()
            .filter_map(|req| match req {
                MockRequest::NoticeLogs(_, range) => Some(range),
                _ => None,
            })
            .collect()
    }

    pub fn sender_lookups(&self) -> usize {
        self.requests().iter().filter(|req| matches!(req, MockRequest::Sender(_))).count()
    }

    fn record(&self, request: MockRequest) {
        self.requests.lock().unwrap().push(request);
    }

    fn check_range(fail_at_block: Option<u64>, range: BlockRange) -> Result<()> {
        match fail_at_block {
            Some(block) if (range.from..=range.to).contains(&block) => {
                bail!("mock RPC failure for blocks {} - {}", range.from, range.to)
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn block_number(&self) -> Result<u64> {
        self.record(MockRequest::BlockNumber);
        Ok(self.tip)
    }

    async fn task_issued_logs(&self, coprocessor: Address, range: BlockRange) -> Result<Vec<Task>> {
        self.record(MockRequest::TaskLogs(range));
        Self::check_range(self.fail_at_block, range)?;
        Ok(self
            .tasks
            .iter()
            .filter(|(emitter, task)| {
                *emitter == coprocessor && (range.from..=range.to).contains(&task.block_number)
            })
            .map(|(_, task)| task.clone())
            .collect())
    }

    async fn notice_logs(
        &self,
        callback: Address,
        payload_hash: B256,
        range: BlockRange,
    ) -> Result<Vec<Notice>> {
        self.record(MockRequest::NoticeLogs(payload_hash, range));
        Self::check_range(self.fail_at_block.or(self.fail_notices_at_block), range)?;
        Ok(self
            .notices
            .iter()
            .filter(|(emitter, notice)| {
                *emitter == callback
                    && notice.payload_hash == payload_hash
                    && (range.from..=range.to).contains(&notice.block_number)
            })
            .map(|(_, notice)| notice.clone())
            .collect())
    }

    async fn transaction_sender(&self, tx_hash: B256) -> Result<Address> {
        self.record(MockRequest::Sender(tx_hash));
        match self.senders.get(&tx_hash) {
            Some(sender) => Ok(*sender),
            None => bail!("Transaction not found for hash: {tx_hash}"),
        }
    }
}
