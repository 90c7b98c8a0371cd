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

use thiserror::Error;

pub trait CodedError: std::error::Error {
    fn code(&self) -> &str;
}

/// Implements [std::fmt::Debug] by delegating to [std::fmt::Display], so the error code leads
/// the message wherever the error is logged with `{:?}`.
macro_rules! impl_coded_debug {
    ($err:ident) => {
        impl std::fmt::Debug for $err {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{self}")
            }
        }
    };
}

pub(crate) use impl_coded_debug;

/// Errors surfaced by the explorer operations.
///
/// [ExplorerErr::EmptyAccount] is the only validation error and is raised before any network
/// call. Everything else that goes wrong while talking to the chain is an operation error and
/// lands in [ExplorerErr::Rpc].
#[derive(Error)]
pub enum ExplorerErr {
    #[error("{code} Please enter an account address", code = self.code())]
    EmptyAccount,

    #[error("{code} A fetch is already in progress", code = self.code())]
    Busy,

    #[error("{code} No task at index {0}", code = self.code())]
    TaskIndexOutOfRange(usize),

    #[error("{code} {0:#}", code = self.code())]
    Rpc(#[from] anyhow::Error),
}

impl CodedError for ExplorerErr {
    fn code(&self) -> &str {
        match self {
            ExplorerErr::EmptyAccount => "[TE-VAL-100]",
            ExplorerErr::Busy => "[TE-VIEW-200]",
            ExplorerErr::TaskIndexOutOfRange(_) => "[TE-VIEW-201]",
            ExplorerErr::Rpc(_) => "[TE-RPC-500]",
        }
    }
}

impl_coded_debug!(ExplorerErr);

impl ExplorerErr {
    /// True for errors raised locally before any I/O took place.
    pub fn is_validation(&self) -> bool {
        matches!(self, ExplorerErr::EmptyAccount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_lead_the_message() {
        let err = ExplorerErr::EmptyAccount;
        assert!(err.to_string().starts_with("[TE-VAL-100]"));
        assert!(err.is_validation());

        let err = ExplorerErr::from(anyhow::anyhow!("connection refused").context("get_logs"));
        assert_eq!(format!("{err:?}"), "[TE-RPC-500] get_logs: connection refused");
        assert!(!err.is_validation());
    }
}
