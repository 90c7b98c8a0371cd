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

//! Block range pagination for historical log queries.
//!
//! RPC providers cap the number of blocks a single `eth_getLogs` call may span, so a query over
//! the full history of a deployment is split into consecutive sub-ranges that are fetched one
//! after another.

use std::future::Future;

use serde::Serialize;

/// Inclusive range of block heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockRange {
    pub from: u64,
    pub to: u64,
}

impl BlockRange {
    /// Number of blocks covered by the range.
    pub fn block_count(&self) -> u64 {
        (self.to - self.from).saturating_add(1)
    }
}

/// Iterator over the sub-ranges produced by [block_ranges].
#[derive(Debug, Clone)]
pub struct BlockRanges {
    next_from: Option<u64>,
    tip: u64,
    max_span: u64,
}

impl Iterator for BlockRanges {
    type Item = BlockRange;

    fn next(&mut self) -> Option<Self::Item> {
        let from = self.next_from?;
        let to = from.saturating_add(self.max_span).min(self.tip);
        self.next_from = if to == self.tip { None } else { Some(to + 1) };
        Some(BlockRange { from, to })
    }
}

/// Splits `[start, tip]` into contiguous, non-overlapping ranges where each range ends at most
/// `max_span` blocks after it starts.
///
/// Yields nothing when `start > tip`.
pub fn block_ranges(start: u64, tip: u64, max_span: u64) -> BlockRanges {
    BlockRanges { next_from: (start <= tip).then_some(start), tip, max_span }
}

/// Calls `fetch` once per sub-range of `[start, tip]`, in ascending block order, and
/// concatenates the results.
///
/// The first failing sub-range aborts the whole operation and its error is returned; no partial
/// result is kept and nothing is retried.
pub async fn paginate<T, E, F, Fut>(
    start: u64,
    tip: u64,
    max_span: u64,
    mut fetch: F,
) -> Result<Vec<T>, E>
where
    F: FnMut(BlockRange) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let mut all = Vec::new();
    for range in block_ranges(start, tip, max_span) {
        tracing::debug!("Fetching blocks {} - {}", range.from, range.to);
        let items = fetch(range).await?;
        all.extend(items);
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn single_range_when_span_covers_everything() {
        let ranges: Vec<_> = block_ranges(10, 20, 100).collect();
        assert_eq!(ranges, vec![BlockRange { from: 10, to: 20 }]);
    }

    #[test]
    fn span_is_added_to_the_start_block() {
        let ranges: Vec<_> = block_ranges(0, 25, 10).collect();
        assert_eq!(
            ranges,
            vec![
                BlockRange { from: 0, to: 10 },
                BlockRange { from: 11, to: 21 },
                BlockRange { from: 22, to: 25 },
            ]
        );
    }

    #[test]
    fn block_count_saturates_on_full_range() {
        assert_eq!(BlockRange { from: 0, to: u64::MAX }.block_count(), u64::MAX);
        assert_eq!(BlockRange { from: 7, to: 7 }.block_count(), 1);
    }

    #[test]
    fn start_past_tip_is_empty() {
        assert_eq!(block_ranges(21, 20, 5).count(), 0);
    }

    #[test]
    fn zero_span_walks_block_by_block() {
        let ranges: Vec<_> = block_ranges(5, 7, 0).collect();
        assert_eq!(
            ranges,
            vec![
                BlockRange { from: 5, to: 5 },
                BlockRange { from: 6, to: 6 },
                BlockRange { from: 7, to: 7 },
            ]
        );
    }

    #[test]
    fn saturates_near_u64_max() {
        let ranges: Vec<_> = block_ranges(u64::MAX - 3, u64::MAX, u64::MAX).collect();
        assert_eq!(ranges, vec![BlockRange { from: u64::MAX - 3, to: u64::MAX }]);
    }

    #[tokio::test]
    async fn concatenates_in_fetch_order() {
        let res: Result<Vec<u64>, anyhow::Error> =
            paginate(0, 9, 3, |range| async move { Ok((range.from..=range.to).rev().collect()) })
                .await;

        assert_eq!(res.unwrap(), vec![3, 2, 1, 0, 7, 6, 5, 4, 9, 8]);
    }

    #[tokio::test]
    async fn empty_when_start_past_tip() {
        let calls = Arc::new(Mutex::new(0));
        let res: Result<Vec<u64>, anyhow::Error> = paginate(50, 49, 10, |_| {
            let calls = calls.clone();
            async move {
                *calls.lock().unwrap() += 1;
                Ok(vec![1])
            }
        })
        .await;

        assert!(res.unwrap().is_empty());
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn first_failure_stops_the_walk() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let res: Result<Vec<u64>, anyhow::Error> = paginate(0, 99, 9, |range| {
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push(range);
                if range.from == 20 {
                    anyhow::bail!("rate limited");
                }
                Ok(vec![range.from])
            }
        })
        .await;

        assert_eq!(res.unwrap_err().to_string(), "rate limited");
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    proptest! {
        #[test]
        fn ranges_cover_exactly(start in 0u64..100_000, len in 1u64..20_000, span in 0u64..2_000) {
            let tip = start + len - 1;
            let ranges: Vec<_> = block_ranges(start, tip, span).collect();

            prop_assert_eq!(ranges.first().map(|r| r.from), Some(start));
            prop_assert_eq!(ranges.last().map(|r| r.to), Some(tip));
            for pair in ranges.windows(2) {
                prop_assert_eq!(pair[0].to + 1, pair[1].from);
            }
            for range in &ranges {
                prop_assert!(range.from <= range.to);
                prop_assert!(range.block_count() <= span + 1);
            }
            let total: u64 = ranges.iter().map(BlockRange::block_count).sum();
            prop_assert_eq!(total, len);
            prop_assert_eq!(ranges.len() as u64, len.div_ceil(span + 1));
        }

        #[test]
        fn nothing_when_start_exceeds_tip(tip in 0u64..100_000, gap in 1u64..1_000, span in 0u64..2_000) {
            prop_assert_eq!(block_ranges(tip + gap, tip, span).count(), 0);
        }
    }
}
