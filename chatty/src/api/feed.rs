//! Typed views over store subscriptions.

use std::fmt;

use crate::error::Result;
use crate::store::{Snapshot, Subscription};

/// A subscription whose snapshots are mapped to a typed value.
///
/// The mapping decides what a failed notification turns into; the feeds in
/// this crate log the error and fall back to an empty value, so consumers
/// only ever see data.
pub struct Feed<T> {
    subscription: Subscription,
    map: fn(Result<Snapshot>) -> T,
}

impl<T> Feed<T> {
    pub(crate) fn new(subscription: Subscription, map: fn(Result<Snapshot>) -> T) -> Self {
        Self { subscription, map }
    }

    /// Wait for the next value. `None` once the subscription has ended.
    pub async fn next(&mut self) -> Option<T> {
        self.subscription.next().await.map(self.map)
    }

    /// The most recent value that has already arrived, without waiting.
    pub fn latest(&mut self) -> Option<T> {
        let mut last = None;
        while let Some(snapshot) = self.subscription.try_next() {
            last = Some(snapshot);
        }
        last.map(self.map)
    }

    /// Release the subscription.
    pub fn close(self) {}
}

impl<T> fmt::Debug for Feed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feed")
            .field("subscription", &self.subscription)
            .finish()
    }
}
