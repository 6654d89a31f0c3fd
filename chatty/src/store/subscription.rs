//! Cancellable snapshot subscriptions.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use super::Snapshot;
use crate::error::Result;

type Release = Box<dyn FnOnce(u64) + Send>;

/// A live query on the remote store.
///
/// Every item carries the full current result of the query. The listener is
/// deregistered when the subscription is dropped or
/// [`unsubscribe`](Subscription::unsubscribe)d; after that no further
/// snapshots are produced.
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<Result<Snapshot>>,
    release: Option<Release>,
}

impl Subscription {
    /// Wrap a snapshot channel. `release` runs once when the subscription
    /// ends.
    pub fn new(
        id: u64,
        rx: mpsc::UnboundedReceiver<Result<Snapshot>>,
        release: impl FnOnce(u64) + Send + 'static,
    ) -> Self {
        Self {
            id,
            rx,
            release: Some(Box::new(release)),
        }
    }

    /// Listener ID assigned by the store.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next snapshot. `None` once the store stops notifying.
    pub async fn next(&mut self) -> Option<Result<Snapshot>> {
        self.rx.recv().await
    }

    /// Take a snapshot that has already arrived, without waiting.
    pub fn try_next(&mut self) -> Option<Result<Snapshot>> {
        self.rx.try_recv().ok()
    }

    /// Release the listener.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.rx.close();
        if let Some(release) = self.release.take() {
            release(self.id);
        }
    }
}

impl Stream for Subscription {
    type Item = Result<Snapshot>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("released", &self.release.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StorePath;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn snapshot() -> Snapshot {
        Snapshot::empty(StorePath::users())
    }

    #[tokio::test]
    async fn test_release_on_drop() {
        let released = Arc::new(AtomicU64::new(0));
        let (tx, rx) = mpsc::unbounded_channel();
        let flag = released.clone();
        let sub = Subscription::new(7, rx, move |id| flag.store(id, Ordering::SeqCst));

        sub.unsubscribe();

        assert_eq!(released.load(Ordering::SeqCst), 7);
        assert!(tx.send(Ok(snapshot())).is_err());
    }

    #[tokio::test]
    async fn test_stream_yields_in_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut sub = Subscription::new(1, rx, |_| {});

        tx.send(Ok(snapshot())).unwrap();
        tx.send(Err(crate::Error::Closed)).unwrap();
        drop(tx);

        assert!(matches!(StreamExt::next(&mut sub).await, Some(Ok(_))));
        assert!(matches!(sub.next().await, Some(Err(_))));
        assert!(sub.next().await.is_none());
    }

    #[tokio::test]
    async fn test_try_next() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut sub = Subscription::new(1, rx, |_| {});

        assert!(sub.try_next().is_none());
        tx.send(Ok(snapshot())).unwrap();
        assert!(sub.try_next().is_some());
    }
}
