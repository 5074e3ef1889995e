//! Fan-out stream handle
//!
//! Wraps an underlying stream handle so that every published item is also
//! dispatched to the stream's matched targets. With an empty match set the
//! wrapper is a pure passthrough and no dispatch machinery runs.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::broadcast;

use crate::error::{Error, Result};
use crate::provider::{StreamHandle, StreamIdentity, StreamItem};
use crate::routing::SubscriptionMatch;
use crate::stats::FanOutStats;
use crate::target::TargetId;

/// Stream handle decorating an underlying handle with target fan-out
pub struct FanOutHandle {
    inner: Arc<dyn StreamHandle>,
    matches: Vec<SubscriptionMatch>,
    stats: Arc<FanOutStats>,
}

impl FanOutHandle {
    pub(crate) fn new(
        inner: Arc<dyn StreamHandle>,
        matches: Vec<SubscriptionMatch>,
        stats: Arc<FanOutStats>,
    ) -> Self {
        Self {
            inner,
            matches,
            stats,
        }
    }

    /// Number of targets matched for this stream
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Matched target identities, in dispatch order
    pub fn targets(&self) -> impl Iterator<Item = &TargetId> {
        self.matches.iter().map(SubscriptionMatch::target)
    }
}

#[async_trait]
impl StreamHandle for FanOutHandle {
    fn identity(&self) -> &StreamIdentity {
        self.inner.identity()
    }

    /// Publish to the underlying stream and fan out to all matched targets.
    ///
    /// The underlying publish and the per-target dispatches run
    /// concurrently; dispatches are issued in registration order. Completion
    /// waits for every delivery, and per-target failures are aggregated into
    /// [`Error::Dispatch`] without affecting the underlying publish or any
    /// sibling delivery. Dropping the returned future cancels every
    /// in-flight dispatch.
    async fn publish(&self, item: StreamItem) -> Result<()> {
        if self.matches.is_empty() {
            return self.inner.publish(item).await;
        }

        self.stats.record_publish();

        // join_all first-polls its futures in order, so dispatch is issued
        // in registration order while still running concurrently.
        let fan = join_all(self.matches.iter().map(|m| m.dispatch(item.clone())));
        let (delivered, outcomes) = tokio::join!(self.inner.publish(item), fan);

        let mut failures = Vec::new();
        for (matched, outcome) in self.matches.iter().zip(outcomes) {
            match outcome {
                Ok(()) => self.stats.record_dispatch(),
                Err(e) => {
                    self.stats.record_dispatch_failure();
                    tracing::warn!(
                        stream = %self.inner.identity(),
                        target = %matched.target(),
                        error = %e,
                        "Fan-out dispatch failed"
                    );
                    failures.push((matched.target().clone(), e.to_string()));
                }
            }
        }

        delivered?;

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Dispatch {
                stream: self.inner.identity().clone(),
                failures,
            })
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<StreamItem> {
        self.inner.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MemoryProvider, ProviderConfig, StreamProvider};
    use crate::routing::matcher::match_specs;
    use crate::routing::SubscriptionSpec;
    use crate::target::{TargetRuntime, TargetSelector};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Runtime recording deliveries; targets with id "bad" fail.
    struct RecordingRuntime {
        delivered: Mutex<Vec<(TargetId, StreamItem)>>,
    }

    impl RecordingRuntime {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                delivered: Mutex::new(Vec::new()),
            })
        }

        fn delivered(&self) -> Vec<(TargetId, StreamItem)> {
            self.delivered.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TargetRuntime for RecordingRuntime {
        async fn deliver(&self, target: &TargetId, item: StreamItem) -> Result<()> {
            if target.id == "bad" {
                return Err(Error::NotInitialized(target.to_string()));
            }
            self.delivered.lock().unwrap().push((target.clone(), item));
            Ok(())
        }
    }

    async fn inner_handle() -> Arc<dyn StreamHandle> {
        let provider = MemoryProvider::new();
        provider
            .init("sms", &ProviderConfig::default())
            .await
            .unwrap();
        provider.start().await.unwrap();
        provider.get_stream("x").await.unwrap()
    }

    fn matches_for(
        runtime: &Arc<RecordingRuntime>,
        target_ids: &[&str],
    ) -> Vec<SubscriptionMatch> {
        let specs: Vec<SubscriptionSpec> = target_ids
            .iter()
            .map(|id| {
                SubscriptionSpec::new("sms", "x", TargetSelector::new("consumer", *id)).unwrap()
            })
            .collect();
        let runtime: Arc<dyn TargetRuntime> = Arc::clone(runtime) as Arc<dyn TargetRuntime>;
        match_specs(&specs, &runtime, "x")
    }

    #[tokio::test]
    async fn test_dispatch_order_is_registration_order() {
        let runtime = RecordingRuntime::new();
        let handle = FanOutHandle::new(
            inner_handle().await,
            matches_for(&runtime, &["a", "b", "c"]),
            Arc::new(FanOutStats::new()),
        );

        handle.publish(StreamItem::new("m")).await.unwrap();

        let order: Vec<String> = runtime
            .delivered()
            .iter()
            .map(|(t, _)| t.id.clone())
            .collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_zero_matches_is_pure_passthrough() {
        let stats = Arc::new(FanOutStats::new());
        let handle = FanOutHandle::new(inner_handle().await, Vec::new(), Arc::clone(&stats));
        let mut rx = handle.subscribe();

        handle.publish(StreamItem::new("m")).await.unwrap();

        assert!(rx.recv().await.is_ok());
        assert_eq!(stats.snapshot().items_published, 0);
        assert_eq!(handle.match_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_aggregated_and_isolated() {
        let runtime = RecordingRuntime::new();
        let stats = Arc::new(FanOutStats::new());
        let handle = FanOutHandle::new(
            inner_handle().await,
            matches_for(&runtime, &["a", "bad", "c"]),
            Arc::clone(&stats),
        );
        let mut rx = handle.subscribe();

        let err = handle.publish(StreamItem::new("m")).await.unwrap_err();

        match err {
            Error::Dispatch { stream, failures } => {
                assert_eq!(stream.to_string(), "sms:x");
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].0, TargetId::new("consumer", "bad"));
            }
            other => panic!("expected Dispatch error, got {other}"),
        }

        // Siblings and the underlying subscriber still got the item.
        let order: Vec<String> = runtime
            .delivered()
            .iter()
            .map(|(t, _)| t.id.clone())
            .collect();
        assert_eq!(order, ["a", "c"]);
        assert!(rx.recv().await.is_ok());

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.targets_dispatched, 2);
        assert_eq!(snapshot.dispatch_failures, 1);
    }

    #[tokio::test]
    async fn test_underlying_subscriber_unaffected_by_fanout() {
        let runtime = RecordingRuntime::new();
        let handle = FanOutHandle::new(
            inner_handle().await,
            matches_for(&runtime, &["a"]),
            Arc::new(FanOutStats::new()),
        );
        let mut rx = handle.subscribe();

        handle.publish(StreamItem::new("m1")).await.unwrap();
        handle.publish(StreamItem::new("m2")).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), StreamItem::new("m1"));
        assert_eq!(rx.recv().await.unwrap(), StreamItem::new("m2"));
        assert_eq!(runtime.delivered().len(), 2);
    }
}
