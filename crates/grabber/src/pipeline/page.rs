//! Page capability seam and the single-shot attribute wait
//!
//! The pipeline never talks to a browser directly. Everything it needs
//! from the host page is behind [`PlayerPage`]: element counting, click
//! dispatch, attribute reads, and attribute-change subscriptions.
//! Adapters implement the trait against a live page; tests implement it
//! against an in-memory fake.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::pipeline::error::{GrabError, Result};

/// Access to the host page's player DOM
///
/// Elements are addressed as `(selector, index)`: the nth element matching
/// a CSS selector in document order.
#[async_trait]
pub trait PlayerPage: Send + Sync {
    /// Number of elements matching the selector
    async fn element_count(&self, selector: &str) -> Result<usize>;

    /// Dispatch a user activation (click) on the addressed element
    async fn click(&self, selector: &str, index: usize) -> Result<()>;

    /// Read an attribute from the addressed element
    async fn attribute(&self, selector: &str, index: usize, name: &str)
        -> Result<Option<String>>;

    /// Subscribe to attribute changes on the addressed element
    ///
    /// Only values observed after the subscription is created are
    /// delivered; a value already in place beforehand never arrives.
    async fn watch_attribute(&self, selector: &str, index: usize, name: &str)
        -> Result<AttributeWatch>;
}

/// Single-consumer stream of newly observed attribute values
///
/// Dropping the watch unsubscribes: adapters stop observing as soon as
/// their sender half reports a closed channel.
#[derive(Debug)]
pub struct AttributeWatch {
    rx: mpsc::Receiver<String>,
}

impl AttributeWatch {
    /// Create a watch plus the sender half an adapter feeds values into
    pub fn channel(capacity: usize) -> (mpsc::Sender<String>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self { rx })
    }

    /// Next observed value, or `None` once the adapter stops observing
    pub async fn next_value(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

/// Wait until the watched attribute first satisfies the predicate
///
/// Completes with the matching value; the subscription is dropped on
/// settle, so no further notifications are delivered. The deadline is
/// explicit: an attribute that never changes yields
/// [`GrabError::WatchTimeout`] rather than stalling the run forever, and
/// a subscription that ends early yields [`GrabError::WatchClosed`].
pub async fn await_attribute<F>(
    mut watch: AttributeWatch,
    selector: &str,
    attribute: &str,
    predicate: F,
    timeout: Duration,
) -> Result<String>
where
    F: Fn(&str) -> bool,
{
    let wait = async {
        while let Some(value) = watch.next_value().await {
            if predicate(&value) {
                return Ok(value);
            }
        }
        Err(GrabError::WatchClosed {
            selector: selector.to_string(),
        })
    };

    match tokio::time::timeout(timeout, wait).await {
        Ok(result) => result,
        Err(_) => Err(GrabError::WatchTimeout {
            selector: selector.to_string(),
            attribute: attribute.to_string(),
            timeout_secs: timeout.as_secs(),
        }),
    }
}
