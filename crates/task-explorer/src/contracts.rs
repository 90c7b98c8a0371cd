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

//! Solidity bindings for the coprocessor and callback contracts.

use alloy::sol;

sol! {
    /// Coprocessor entrypoint. Every issued task is announced with a [TaskIssued] log.
    ///
    /// [TaskIssued]: ICoprocessor::TaskIssued
    #[sol(all_derives)]
    interface ICoprocessor {
        event TaskIssued(bytes32 machineHash, bytes input, address callback);
    }

    /// Callback contract that receives the outputs of a task.
    #[sol(all_derives)]
    interface ICoprocessorCallback {
        event NoticeReceived(bytes32 indexed payloadHash, address indexed user, bytes notice);
    }

    /// ABI layout of the notice emitted for a classification task.
    #[sol(all_derives)]
    struct ClassificationNotice {
        uint256 result;
        string theme;
        string[] classes;
        uint256[] probabilities;
    }
}
