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

//! Terminal rendering of the explorer screens.

use alloy::primitives::B256;
use colored::Colorize;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::{
    client::ChainClient,
    decode::{Decoded, ImageFormat, NoticeResult, TaskInput, UNDECODABLE},
    view::{Explorer, InputDetails, Screen},
    Notice, Task,
};

const HEADER_WIDTH: usize = 60;

fn section_header(title: &str) -> String {
    let padding = HEADER_WIDTH.saturating_sub(title.len()) / 2;
    let rule = "=".repeat(HEADER_WIDTH);
    format!("{rule}\n{}{}\n{rule}", " ".repeat(padding), title.bold())
}

fn item(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {:<16} {}", format!("{label}:"), value)
}

fn error_line(message: &str) -> String {
    format!("{} {}", "✗".red().bold(), message.red())
}

/// Render whichever screen the explorer is on.
pub fn render<C: ChainClient>(explorer: &Explorer<C>) -> String {
    match explorer.screen() {
        Screen::Listing => render_listing(explorer),
        Screen::Detail { payload_hash, input } => {
            render_detail(explorer, *payload_hash, input.as_ref())
        }
    }
}

pub fn render_listing<C: ChainClient>(explorer: &Explorer<C>) -> String {
    let mut lines = vec![section_header("TASKS")];
    if let Some(account) = explorer.account() {
        lines.push(item("Account", account.dimmed()));
    }

    let status = explorer.listing_status();
    if status.is_loading() {
        lines.push("Loading tasks...".yellow().to_string());
    }
    if let Some(err) = status.error() {
        lines.push(error_line(err));
    }

    match explorer.tasks() {
        None => lines.push("Enter an account address to search for tasks".dimmed().to_string()),
        Some([]) => lines.push(format!("{} No tasks found", "ℹ".blue())),
        Some(tasks) => lines.push(task_table(tasks)),
    }

    lines.join("\n")
}

/// Short description of a task image, `None` when the image cannot be shown.
fn image_summary(input: &TaskInput) -> Option<String> {
    let bytes = input.image_bytes()?;
    Some(format!("{} ({} bytes)", ImageFormat::sniff(&bytes).mime(), bytes.len()))
}

pub fn task_table(tasks: &[Task]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["#", "Transaction", "Block", "Theme", "Image"]);
    for (index, task) in tasks.iter().enumerate() {
        let (theme, image) = match task.decode_input() {
            Decoded::Value(input) => {
                let image = image_summary(&input).unwrap_or_default();
                (input.theme, image)
            }
            Decoded::Undecodable => (UNDECODABLE.to_string(), String::new()),
        };
        builder.push_record([
            index.to_string(),
            format!("{:#x}", task.transaction_hash),
            task.block_number.to_string(),
            theme,
            image,
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

pub fn render_detail<C: ChainClient>(
    explorer: &Explorer<C>,
    payload_hash: B256,
    input: Option<&InputDetails>,
) -> String {
    let mut lines = vec![section_header("TASK RESULT")];
    if let Some(input) = input {
        lines.push(item("Input Hash", format!("{:#x}", input.hash).cyan()));
        lines.push(item("Block Number", input.block_number));
    }
    lines.push(item("Payload Hash", format!("{payload_hash:#x}").dimmed()));

    let status = explorer.detail_status();
    if status.is_loading() {
        lines.push("Loading notices...".yellow().to_string());
    }
    if let Some(err) = status.error() {
        lines.push(error_line(err));
    }

    let notices = explorer.notices();
    if notices.is_empty() && !status.is_loading() && status.error().is_none() {
        lines.push(format!("{} No notices received yet", "ℹ".blue()));
    }
    for (index, notice) in notices.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!(
            "Notice #{index} from {:#x} (block {})",
            notice.user, notice.block_number
        ));
        lines.push(notice_body(&notice.decode()));
    }

    lines.join("\n")
}

fn notice_body(decoded: &Decoded<NoticeResult>) -> String {
    let result = match decoded {
        Decoded::Value(result) => result,
        Decoded::Undecodable => return format!("  {}", UNDECODABLE.dimmed()),
    };

    let mut builder = Builder::default();
    builder.push_record(["Class", "Probability"]);
    for prediction in &result.predictions {
        builder.push_record([prediction.class.clone(), prediction.probability.to_string()]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());

    [
        item("Result", result.result.to_string().green().bold()),
        item("Theme", &result.theme),
        table.to_string(),
    ]
    .join("\n")
}

/// JSON view of a task with its decoded input.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    pub payload_hash: B256,
    pub decoded_input: Decoded<TaskInput>,
}

pub fn task_reports(tasks: &[Task]) -> Vec<TaskReport<'_>> {
    tasks
        .iter()
        .map(|task| TaskReport {
            task,
            payload_hash: task.payload_hash(),
            decoded_input: task.decode_input(),
        })
        .collect()
}

/// JSON view of a notice with its decoded result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeReport<'a> {
    #[serde(flatten)]
    pub notice: &'a Notice,
    pub decoded: Decoded<NoticeResult>,
}

pub fn notice_reports(notices: &[Notice]) -> Vec<NoticeReport<'_>> {
    notices.iter().map(|notice| NoticeReport { notice, decoded: notice.decode() }).collect()
}
