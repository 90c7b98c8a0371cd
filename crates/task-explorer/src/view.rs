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

//! Two-screen view controller.
//!
//! The explorer starts on [Screen::Listing]. Selecting a task moves to [Screen::Detail] and
//! fetches the notices for the task's payload hash; going back discards the selection but keeps
//! the task list, so it is not fetched again.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use alloy::primitives::B256;
use serde::Serialize;

use crate::{
    client::ChainClient,
    deployments::Deployment,
    errors::ExplorerErr,
    fetcher::{fetch_notices, fetch_tasks_by_sender, validate_account},
    Notice, Task,
};

/// The transaction that issued the selected task, shown on the detail screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDetails {
    pub hash: B256,
    pub block_number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Listing,
    Detail {
        payload_hash: B256,
        /// `None` when the payload hash was opened directly rather than from a listed task.
        input: Option<InputDetails>,
    },
}

/// Shared "fetch in flight" flag of a screen.
///
/// Clones observe the same flag, so a front-end can disable its controls while a fetch runs.
/// Only the [Explorer] can raise it. Its fetches take `&mut self`, so [ExplorerErr::Busy] is only
/// returned when the flag is already held inside the crate.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<LoadingGuard, ExplorerErr> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExplorerErr::Busy)?;
        Ok(LoadingGuard(self.0.clone()))
    }
}

/// Clears the loading flag when dropped, whatever the outcome of the fetch.
struct LoadingGuard(Arc<AtomicBool>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Loading flag and last error message of one screen.
#[derive(Debug, Clone, Default)]
pub struct ScreenStatus {
    loading: LoadingFlag,
    error: Option<String>,
}

impl ScreenStatus {
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub struct Explorer<C> {
    client: C,
    deployment: Deployment,
    screen: Screen,
    account: Option<String>,
    tasks: Option<Vec<Task>>,
    notices: Vec<Notice>,
    listing: ScreenStatus,
    detail: ScreenStatus,
}

impl<C: ChainClient> Explorer<C> {
    pub fn new(client: C, deployment: Deployment) -> Self {
        Self {
            client,
            deployment,
            screen: Screen::Listing,
            account: None,
            tasks: None,
            notices: Vec::new(),
            listing: ScreenStatus::default(),
            detail: ScreenStatus::default(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Account of the last successful search.
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Tasks of the last successful search, `None` before the first one.
    pub fn tasks(&self) -> Option<&[Task]> {
        self.tasks.as_deref()
    }

    /// True once a search completed without finding any task.
    pub fn no_tasks_found(&self) -> bool {
        matches!(self.tasks.as_deref(), Some([]))
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn listing_status(&self) -> &ScreenStatus {
        &self.listing
    }

    pub fn detail_status(&self) -> &ScreenStatus {
        &self.detail
    }

    /// Search the tasks sent by `account`, returning to the listing first.
    ///
    /// Errors are returned and also kept as the listing's error message. A failed search leaves
    /// the previous task list in place.
    pub async fn search(&mut self, account: &str) -> Result<&[Task], ExplorerErr> {
        if matches!(self.screen, Screen::Detail { .. }) {
            self.back();
        }
        self.listing.error = None;
        let account = match validate_account(account) {
            Ok(account) => account,
            Err(err) => {
                self.listing.error = Some(err.to_string());
                return Err(err);
            }
        };
        let _loading = self.listing.loading.begin()?;

        match fetch_tasks_by_sender(&self.client, &self.deployment, account).await {
            Ok(tasks) => {
                self.account = Some(account.to_string());
                Ok(self.tasks.insert(tasks).as_slice())
            }
            Err(err) => {
                tracing::error!("Task search for {account} failed: {err:?}");
                self.listing.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Move to the detail screen of the task at `index` and fetch its notices.
    pub async fn select(&mut self, index: usize) -> Result<(), ExplorerErr> {
        let task = self
            .tasks
            .as_deref()
            .and_then(|tasks| tasks.get(index))
            .ok_or(ExplorerErr::TaskIndexOutOfRange(index))?;

        let payload_hash = task.payload_hash();
        let input = InputDetails { hash: task.transaction_hash, block_number: task.block_number };
        self.show_detail(payload_hash, Some(input)).await
    }

    /// Move to the detail screen of a payload hash that did not come from the task list.
    pub async fn open_payload(&mut self, payload_hash: B256) -> Result<(), ExplorerErr> {
        self.show_detail(payload_hash, None).await
    }

    async fn show_detail(
        &mut self,
        payload_hash: B256,
        input: Option<InputDetails>,
    ) -> Result<(), ExplorerErr> {
        self.screen = Screen::Detail { payload_hash, input };
        self.notices.clear();
        self.refresh_notices().await
    }

    /// Fetch the notices of the current detail screen again. No-op on the listing.
    pub async fn refresh_notices(&mut self) -> Result<(), ExplorerErr> {
        let Screen::Detail { payload_hash, .. } = self.screen else {
            return Ok(());
        };
        self.detail.error = None;
        let _loading = self.detail.loading.begin()?;

        match fetch_notices(&self.client, &self.deployment, payload_hash).await {
            Ok(notices) => {
                self.notices = notices;
                Ok(())
            }
            Err(err) => {
                let err = ExplorerErr::from(err);
                tracing::error!("Notice fetch for {payload_hash} failed: {err:?}");
                self.detail.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Return to the listing, keeping the task list.
    pub fn back(&mut self) {
        self.screen = Screen::Listing;
        self.notices.clear();
        self.detail.error = None;
    }
}
