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

//! "Fetch candidates, enrich, filter" stage shared by event fetchers.

use std::future::Future;

use futures::future::try_join_all;

/// Runs `enrich` for every candidate concurrently, then keeps the candidates for which `keep`
/// accepts the candidate together with its enrichment.
///
/// Waits for every lookup before filtering and fails as soon as any lookup fails. The order of
/// the surviving candidates is preserved.
pub async fn enrich_and_filter<T, V, E, Enrich, Fut, Keep>(
    candidates: Vec<T>,
    enrich: Enrich,
    keep: Keep,
) -> Result<Vec<T>, E>
where
    Enrich: Fn(&T) -> Fut,
    Fut: Future<Output = Result<V, E>>,
    Keep: Fn(&T, &V) -> bool,
{
    let enrichments = try_join_all(candidates.iter().map(enrich)).await?;

    Ok(candidates
        .into_iter()
        .zip(enrichments)
        .filter_map(|(candidate, enrichment)| keep(&candidate, &enrichment).then_some(candidate))
        .collect())
}
