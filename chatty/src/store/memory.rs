//! In-memory realtime store.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::{
    cmp::Ordering,
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, Weak},
};
use tokio::sync::mpsc;

use super::{Document, Query, RemoteStore, Snapshot, StorePath, Subscription};
use crate::error::{Error, Result};
use crate::timeline::now_millis;

/// In-memory document tree with live queries.
///
/// Behaves like a hosted realtime database seen from a single client:
/// subscribers get the current result immediately and a full new result
/// after every write on their branch of the tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<StoreState>>,
}

/// Largest sequence number that fits the key's six hex digits.
const MAX_KEY_SEQ: u32 = 0xff_ffff;

#[derive(Debug, Default)]
struct StoreState {
    root: Map<String, Value>,
    listeners: BTreeMap<u64, Listener>,
    next_listener: u64,
    last_key_ms: i64,
    key_seq: u32,
    denied: Vec<StorePath>,
}

#[derive(Debug)]
struct Listener {
    query: Query,
    tx: mpsc::UnboundedSender<Result<Snapshot>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given tree.
    ///
    /// Anything other than a JSON object starts an empty tree.
    pub fn from_snapshot(tree: Value) -> Self {
        let root = match tree {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let store = Self::new();
        store.state().root = root;
        store
    }

    /// Copy of the whole tree.
    pub fn snapshot(&self) -> Value {
        Value::Object(self.state().root.clone())
    }

    /// Reject reads and writes at or below `prefix`.
    pub fn deny(&self, prefix: StorePath) {
        self.state().denied.push(prefix);
    }

    /// Lift all access rules.
    pub fn allow_all(&self) {
        self.state().denied.clear();
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.state().listeners.len()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self, path: &StorePath, apply: impl FnOnce(&mut StoreState)) -> Result<()> {
        let mut state = self.state();
        state.check_access(path)?;
        apply(&mut state);
        state.notify(path);
        Ok(())
    }
}

impl StoreState {
    fn check_access(&self, path: &StorePath) -> Result<()> {
        if self.denied.iter().any(|p| p.overlaps(path)) {
            return Err(Error::PermissionDenied(path.to_string()));
        }
        Ok(())
    }

    fn get(&self, path: &StorePath) -> Option<&Value> {
        let (first, rest) = path.segments().split_first()?;
        let mut node = self.root.get(first)?;
        for segment in rest {
            node = node.as_object()?.get(segment)?;
        }
        Some(node)
    }

    fn put(&mut self, path: &StorePath, value: Value) {
        let Some((last, parents)) = path.segments().split_last() else {
            self.root = match value {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            return;
        };

        let mut node = &mut self.root;
        for segment in parents {
            let entry = node
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(map) = entry else {
                return;
            };
            node = map;
        }

        if value.is_null() {
            node.remove(last);
        } else {
            node.insert(last.clone(), value);
        }
    }

    fn evaluate(&self, query: &Query) -> Snapshot {
        let value = if query.path.is_root() {
            Some(Value::Object(self.root.clone()))
        } else {
            self.get(&query.path).cloned()
        };

        let mut children: Vec<Document> = match &value {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(key, value)| Document {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };

        match &query.order_by {
            Some(field) => children.sort_by(|a, b| {
                compare_child(a.value.get(field), b.value.get(field))
                    .then_with(|| a.key.cmp(&b.key))
            }),
            None => children.sort_by(|a, b| a.key.cmp(&b.key)),
        }

        if let Some(n) = query.limit_to_last {
            let excess = children.len().saturating_sub(n);
            children.drain(..excess);
        }

        Snapshot {
            path: query.path.clone(),
            value,
            children,
        }
    }

    fn notify(&mut self, changed: &StorePath) {
        let mut closed = Vec::new();
        for (id, listener) in &self.listeners {
            if !listener.query.path.overlaps(changed) {
                continue;
            }
            if listener.tx.send(Ok(self.evaluate(&listener.query))).is_err() {
                closed.push(*id);
            }
        }
        for id in closed {
            self.listeners.remove(&id);
        }
    }

    fn next_key(&mut self) -> String {
        let now = now_millis();
        if now > self.last_key_ms {
            self.last_key_ms = now;
            self.key_seq = 0;
        } else if self.key_seq >= MAX_KEY_SEQ {
            // Borrow the next millisecond so keys keep their fixed width.
            self.last_key_ms += 1;
            self.key_seq = 0;
        } else {
            self.key_seq += 1;
        }
        format!("-{:012x}{:06x}", self.last_key_ms, self.key_seq)
    }
}

/// Ordering of child values: missing/null, booleans, numbers, strings, then
/// objects and arrays.
fn compare_child(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(false)) => 1,
            Some(Value::Bool(true)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(_) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn subscribe(&self, query: Query) -> Result<Subscription> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state();

        let id = state.next_listener;
        state.next_listener += 1;

        if let Err(e) = state.check_access(&query.path) {
            log::debug!("Listener {} on {} refused", id, query.path);
            let _ = tx.send(Err(e));
            return Ok(Subscription::new(id, rx, |_| {}));
        }

        let _ = tx.send(Ok(state.evaluate(&query)));
        state.listeners.insert(id, Listener { query, tx });

        let inner: Weak<Mutex<StoreState>> = Arc::downgrade(&self.inner);
        Ok(Subscription::new(id, rx, move |id| {
            if let Some(inner) = inner.upgrade() {
                let mut state = inner.lock().unwrap_or_else(|e| e.into_inner());
                state.listeners.remove(&id);
            }
        }))
    }

    fn generate_key(&self) -> String {
        self.state().next_key()
    }

    async fn set(&self, path: &StorePath, value: Value) -> Result<()> {
        self.write(path, |state| state.put(path, value))
    }

    async fn update(&self, path: &StorePath, fields: Map<String, Value>) -> Result<()> {
        self.write(path, |state| {
            for (field, value) in fields {
                state.put(&path.child(field), value);
            }
        })
    }
}
