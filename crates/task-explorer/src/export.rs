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

//! Export of task images to disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{decode::ImageFormat, Task};

/// Writes the image of every task whose input decodes into `dir` as `<tx-hash>.<ext>`.
///
/// Tasks without a usable image are skipped. Returns the written paths in task order.
pub async fn export_images(tasks: &[Task], dir: &Path) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create image directory {}", dir.display()))?;

    let mut written = Vec::new();
    for task in tasks {
        let Some(bytes) = task.decode_input().value().and_then(|input| input.image_bytes()) else {
            tracing::debug!("Skipping image of task {:#x}", task.transaction_hash);
            continue;
        };

        let format = ImageFormat::sniff(&bytes);
        let path = dir.join(format!("{:#x}.{}", task.transaction_hash, format.extension()));
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write image {}", path.display()))?;
        written.push(path);
    }

    tracing::info!("Wrote {} images to {}", written.len(), dir.display());
    Ok(written)
}
