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

//! Line-oriented interactive front-end over [Explorer].

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{client::ChainClient, errors::ExplorerErr, render::render, view::Explorer};

const HELP: &str = "Commands: <index> open task, b back, r refresh, s <address> search, q quit";

/// A command typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Select(usize),
    Back,
    Refresh,
    Search(String),
    Help,
    Quit,
}

impl BrowseCommand {
    /// Parse one input line; `None` for blank or unrecognised input.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match word {
            "" => None,
            "b" | "back" => Some(BrowseCommand::Back),
            "r" | "refresh" => Some(BrowseCommand::Refresh),
            "q" | "quit" | "exit" => Some(BrowseCommand::Quit),
            "h" | "help" | "?" => Some(BrowseCommand::Help),
            "s" | "search" => Some(BrowseCommand::Search(rest.trim().to_string())),
            other => other.parse().ok().map(BrowseCommand::Select),
        }
    }
}

async fn write_screen<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes()).await.context("Failed to write output")?;
    out.write_all(b"\n").await.context("Failed to write output")?;
    out.flush().await.context("Failed to flush output")
}

/// Reads commands from `input` until it is exhausted or the user quits, writing the current
/// screen to `out` after every command.
///
/// Fetch errors do not end the session; they are part of the rendered screen.
pub async fn browse<C, R, W>(explorer: &mut Explorer<C>, input: R, out: &mut W) -> Result<()>
where
    C: ChainClient,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_screen(out, &render(explorer)).await?;
    write_screen(out, HELP).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let Some(command) = BrowseCommand::parse(&line) else {
            write_screen(out, HELP).await?;
            continue;
        };

        let res = match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => {
                write_screen(out, HELP).await?;
                continue;
            }
            BrowseCommand::Back => {
                explorer.back();
                Ok(())
            }
            BrowseCommand::Refresh => explorer.refresh_notices().await,
            BrowseCommand::Search(account) => explorer.search(&account).await.map(|_| ()),
            BrowseCommand::Select(index) => explorer.select(index).await,
        };
        if let Err(err) = res {
            tracing::debug!("Browse command failed: {err:?}");
            // Validation and fetch errors are part of the rendered screen.
            if matches!(err, ExplorerErr::TaskIndexOutOfRange(_)) {
                write_screen(out, &err.to_string()).await?;
            }
        }

        write_screen(out, &render(explorer)).await?;
    }

    Ok(())
}
