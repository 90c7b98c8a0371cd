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


//! Transport layer that logs every JSON-RPC call and counts calls per method.
//!
//! A task search costs one `eth_getLogs` per block range plus one `eth_getTransactionByHash` per
//! candidate task, so the per-method totals are the quickest way to see why a search was slow.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
    task::{Context, Poll},
    time::Instant,
};

use alloy::{
    rpc::json_rpc::{RequestPacket, ResponsePacket},
    transports::{TransportError, TransportFut},
};
use tower::{Layer, Service};

/// Calls and failures of one JSON-RPC method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MethodStats {
    pub calls: u64,
    pub failures: u64,
}

/// Per-method totals across all calls made through an [RpcLogLayer].
#[derive(Debug, Default)]
pub struct RpcStats(Mutex<BTreeMap<String, MethodStats>>);

impl RpcStats {
    fn record_calls(&self, methods: &[String]) {
        let mut stats = self.0.lock().unwrap_or_else(|err| err.into_inner());
        for method in methods {
            stats.entry(method.clone()).or_default().calls += 1;
        }
    }

    fn record_failures(&self, methods: &[String]) {
        let mut stats = self.0.lock().unwrap_or_else(|err| err.into_inner());
        for method in methods {
            stats.entry(method.clone()).or_default().failures += 1;
        }
    }

    pub fn get(&self, method: &str) -> MethodStats {
        let stats = self.0.lock().unwrap_or_else(|err| err.into_inner());
        stats.get(method).copied().unwrap_or_default()
    }

    pub fn snapshot(&self) -> BTreeMap<String, MethodStats> {
        self.0.lock().unwrap_or_else(|err| err.into_inner()).clone()
    }

    /// Log one line per method that was called.
    pub fn summary(&self) {
        for (method, stats) in self.snapshot() {
            tracing::info!(
                method = %method,
                calls = stats.calls,
                failures = stats.failures,
                "RPC summary"
            );
        }
    }
}

#[derive(Clone, Default)]
pub struct RpcLogLayer {
    stats: Arc<RpcStats>,
}

impl RpcLogLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> Arc<RpcStats> {
        self.stats.clone()
    }
}

impl<S> Layer<S> for RpcLogLayer {
    type Service = RpcLog<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RpcLog { inner, stats: self.stats.clone() }
    }
}

#[derive(Clone)]
pub struct RpcLog<S> {
    inner: S,
    stats: Arc<RpcStats>,
}

fn methods(req: &RequestPacket) -> Vec<String> {
    match req {
        RequestPacket::Single(r) => vec![r.method().to_string()],
        RequestPacket::Batch(batch) => batch.iter().map(|r| r.method().to_string()).collect(),
    }
}

impl<S> Service<RequestPacket> for RpcLog<S>
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
        + Send
        + Clone
        + 'static,
    S::Future: Send,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = TransportFut<'static>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: RequestPacket) -> Self::Future {
        let methods = methods(&req);
        self.stats.record_calls(&methods);

        let stats = self.stats.clone();
        let start = Instant::now();
        let fut = self.inner.call(req);

        Box::pin(async move {
            let res = fut.await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &res {
                Ok(_) => tracing::trace!(methods = ?methods, elapsed_ms, "RPC call"),
                Err(err) => {
                    stats.record_failures(&methods);
                    tracing::debug!(methods = ?methods, elapsed_ms, "RPC call failed: {err}");
                }
            }
            res
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{
        rpc::json_rpc::{Id, Request},
        transports::TransportErrorKind,
    };
    use std::future::{ready, Ready};

    /// Transport that fails every request.
    #[derive(Clone)]
    struct Unreachable;

    impl Service<RequestPacket> for Unreachable {
        type Response = ResponsePacket;
        type Error = TransportError;
        type Future = Ready<Result<ResponsePacket, TransportError>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _req: RequestPacket) -> Self::Future {
            ready(Err(TransportErrorKind::custom_str("connection refused")))
        }
    }

    fn request(method: &'static str, id: u64) -> RequestPacket {
        RequestPacket::Single(Request::new(method, Id::Number(id), ()).serialize().unwrap())
    }

    #[tokio::test]
    async fn counts_calls_and_failures_per_method() {
        let layer = RpcLogLayer::new();
        let stats = layer.stats();
        let mut service = layer.layer(Unreachable);

        for id in 0..3 {
            assert!(service.call(request("eth_getLogs", id)).await.is_err());
        }
        assert!(service.call(request("eth_blockNumber", 3)).await.is_err());

        assert_eq!(stats.get("eth_getLogs"), MethodStats { calls: 3, failures: 3 });
        assert_eq!(stats.get("eth_blockNumber"), MethodStats { calls: 1, failures: 1 });
        assert_eq!(stats.get("eth_chainId"), MethodStats::default());
        assert_eq!(stats.snapshot().len(), 2);
    }
}
