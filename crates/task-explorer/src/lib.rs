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

//! Explorer for coprocessor tasks and the notices they produce.
//!
//! Tasks are discovered from `TaskIssued` logs addressed to a known callback contract and
//! filtered down to the ones sent by a given account. Each task's input hashes to a payload hash,
//! which keys the `NoticeReceived` logs carrying the task's result.

use std::path::PathBuf;

use alloy::primitives::{keccak256, Address, Bytes, B256};
use clap::{Parser, Subcommand};
use serde::Serialize;
use url::Url;

pub mod browse;
pub mod client;
pub mod config;
pub mod contracts;
pub mod decode;
pub mod deployments;
pub mod errors;
pub mod export;
pub mod fetcher;
pub mod paginate;
pub mod pipeline;
pub mod render;
pub mod rpc_log;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod view;

pub use client::{AlloyChainClient, ChainClient};
pub use deployments::Deployment;
pub use errors::ExplorerErr;
pub use view::{Explorer, InputDetails, Screen};

use decode::{Decoded, NoticeResult, TaskInput};

/// Command line arguments of the `task-explorer` binary.
#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// JSON-RPC endpoint, defaults to a public Holesky endpoint
    #[clap(long, env = "RPC_URL")]
    pub rpc_url: Option<Url>,

    /// TOML config file with the `[deployment]` to explore and an optional RPC URL
    #[clap(long, env = "EXPLORER_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Log in JSON format
    #[clap(long, env, default_value_t = false)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// List the tasks sent by an account
    Tasks {
        /// Address of the account that issued the tasks
        #[clap(long)]
        account: String,

        /// Print the tasks as JSON
        #[clap(long)]
        json: bool,

        /// Write every decodable task image into this directory
        #[clap(long)]
        image_dir: Option<PathBuf>,
    },

    /// Show the notices received for a payload hash
    Notices {
        /// keccak256 hash of a task input
        #[clap(long)]
        payload_hash: B256,

        /// Print the notices as JSON
        #[clap(long)]
        json: bool,
    },

    /// Interactively browse the tasks of an account and their notices
    Browse {
        /// Address of the account that issued the tasks
        #[clap(long)]
        account: String,
    },
}

/// A task observed from a `TaskIssued` log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub machine_hash: B256,
    pub input: Bytes,
    pub callback: Address,
}

impl Task {
    /// Key of the notices produced for this task.
    pub fn payload_hash(&self) -> B256 {
        keccak256(&self.input)
    }

    pub fn decode_input(&self) -> Decoded<TaskInput> {
        decode::decode_task_input(&self.input)
    }
}

/// A notice observed from a `NoticeReceived` log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub payload_hash: B256,
    pub user: Address,
    pub notice: Bytes,
}

impl Notice {
    pub fn decode(&self) -> Decoded<NoticeResult> {
        decode::decode_notice(&self.notice)
    }
}
