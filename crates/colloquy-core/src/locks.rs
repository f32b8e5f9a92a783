use std::collections::HashMap;
use std::sync::Arc;

use bson::oid::ObjectId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-conversation serialization point.
///
/// Concurrent `send_message` calls for one conversation id would interleave
/// turn appends and corrupt the windowing/summarization cadence, so the
/// append-assemble-complete-append sequence runs under a lock keyed by
/// conversation id. Different conversations proceed fully in parallel.
#[derive(Clone, Default)]
pub struct ConversationLocks {
    inner: Arc<Mutex<HashMap<ObjectId, Arc<Mutex<()>>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `id`, creating it on first use
    pub async fn acquire(&self, id: ObjectId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Drop the entry for a deleted conversation
    pub async fn remove(&self, id: ObjectId) {
        self.inner.lock().await.remove(&id);
    }
}
