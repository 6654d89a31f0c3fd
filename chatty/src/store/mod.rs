//! Remote store boundary.

mod memory;
mod path;
mod subscription;
mod traits;

pub use memory::MemoryStore;
pub use path::StorePath;
pub use subscription::Subscription;
pub use traits::{Document, Query, RemoteStore, RemoteStoreExt, Snapshot};
