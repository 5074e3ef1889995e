//! Implicit stream subscription demo
//!
//! Run with: cargo run --example implicit_fanout
//!
//! Wires an in-memory provider behind the fan-out decorator with three
//! subscriptions:
//!
//!   sms:a  -> consumer/c1        (fixed stream, fixed target)
//!   sms:b  -> consumer/c1        (second fixed stream, same target)
//!   sms:#  -> audit/#            (every sms stream, target id = stream id)
//!
//! Items published on `sms:a` and `sms:b` land in c1's mailbox exactly once
//! each, and the audit target receives one item per stream.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use streamcast_rs::{
    start_fanout, ProviderConfig, ProviderFactory, StreamHandle, StreamItem, StreamProvider,
    SubscriptionRegistry, SubscriptionSpec, TargetId, TargetRuntime, TargetSelector,
};

/// Target runtime backed by per-target mailboxes.
///
/// Unknown targets get a mailbox on first delivery, so wildcard-resolved
/// ids need no pre-registration.
struct MailboxRuntime {
    mailboxes: Mutex<HashMap<TargetId, mpsc::UnboundedSender<StreamItem>>>,
    inbox_tx: mpsc::UnboundedSender<(TargetId, StreamItem)>,
}

impl MailboxRuntime {
    fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<(TargetId, StreamItem)>) {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                mailboxes: Mutex::new(HashMap::new()),
                inbox_tx,
            }),
            inbox_rx,
        )
    }
}

#[async_trait]
impl TargetRuntime for MailboxRuntime {
    async fn deliver(&self, target: &TargetId, item: StreamItem) -> streamcast_rs::Result<()> {
        let mut mailboxes = self.mailboxes.lock().expect("mailbox lock poisoned");
        let tx = mailboxes.entry(target.clone()).or_insert_with(|| {
            let (tx, mut rx) = mpsc::unbounded_channel::<StreamItem>();
            let target = target.clone();
            let inbox = self.inbox_tx.clone();
            tokio::spawn(async move {
                while let Some(item) = rx.recv().await {
                    let _ = inbox.send((target.clone(), item));
                }
            });
            tx
        });

        let _ = tx.send(item);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("streamcast_rs=debug".parse()?)
                .add_directive("implicit_fanout=info".parse()?),
        )
        .init();

    let registry = Arc::new(SubscriptionRegistry::new());
    registry.register(vec![
        SubscriptionSpec::new("sms", "a", TargetSelector::new("consumer", "c1"))?,
        SubscriptionSpec::new("sms", "b", TargetSelector::new("consumer", "c1"))?,
        SubscriptionSpec::new("sms", "#", TargetSelector::new("audit", "#"))?,
    ])?;

    let (runtime, mut inbox) = MailboxRuntime::new();
    let provider = start_fanout(
        "sms",
        &ProviderConfig::default(),
        &ProviderFactory::with_defaults(),
        registry,
        runtime,
    )
    .await?;

    let a = provider.get_stream("a").await?;
    let b = provider.get_stream("b").await?;

    a.publish(StreamItem::new("a-123")).await?;
    b.publish(StreamItem::new("b-456")).await?;

    println!("Published on sms:a and sms:b; waiting for deliveries...");
    println!();

    // 2 items for consumer/c1 + 1 audit delivery per stream.
    for _ in 0..4 {
        if let Some((target, item)) = inbox.recv().await {
            println!("{:<12} <- {:?}", target.to_string(), item.payload);
        }
    }

    let stats = provider.stats();
    println!();
    println!(
        "Stats: streams={} published={} dispatched={} failures={}",
        stats.streams_decorated,
        stats.items_published,
        stats.targets_dispatched,
        stats.dispatch_failures,
    );

    provider.close().await?;
    Ok(())
}
