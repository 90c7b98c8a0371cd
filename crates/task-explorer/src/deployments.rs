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


use alloy::primitives::Address;
use derive_builder::Builder;

/// Default upper bound on the block span of a single `eth_getLogs` query.
///
/// Every query covers at most `max_block_span + 1` blocks.
pub const DEFAULT_MAX_BLOCK_SPAN: u64 = 9_999;

/// Public JSON-RPC endpoint used when no RPC URL is configured.
pub const HOLESKY_RPC_URL: &str = "https://ethereum-holesky-rpc.publicnode.com";

/// Configuration for a deployment of the coprocessor and its callback contract.
///
/// No deployment is built in; the contract addresses always come from the `[deployment]` table
/// of the config file, see [crate::config::Config::resolve_deployment].
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Builder)]
pub struct Deployment {
    /// Address of the coprocessor contract that emits `TaskIssued`.
    pub coprocessor_address: Address,

    /// Address of the callback contract. Tasks are kept only when their callback matches it, and
    /// it is the emitter of `NoticeReceived`.
    pub callback_address: Address,

    /// First block to scan; no task can predate the deployment of the contracts.
    #[builder(default)]
    pub genesis_block: u64,

    /// Maximum span of a single log query, see [DEFAULT_MAX_BLOCK_SPAN].
    #[builder(default = "DEFAULT_MAX_BLOCK_SPAN")]
    pub max_block_span: u64,
}

impl Deployment {
    /// Create a [DeploymentBuilder].
    pub fn builder() -> DeploymentBuilder {
        DeploymentBuilder::default()
    }
}
