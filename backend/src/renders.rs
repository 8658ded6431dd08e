//! Page renders that already received the client script.
//!
//! The host asks for a setup once per filtered text area, so one page render
//! produces several requests carrying the same render id. Only the first one
//! gets the injection. Entries are bounded in number and expire, since the
//! host never tells when a render is over.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Renders remembered at most.
pub const DEFAULT_CAPACITY: usize = 4096;
/// How long a render id stays claimed.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

pub struct RenderRegistry {
    inner: Mutex<LruCache<String, Instant>>,
    ttl: Duration,
}

impl RenderRegistry {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Whether the script was already inserted for `render_id`.
    pub fn is_inserted(&self, render_id: &str) -> bool {
        let mut inner = self.inner.lock();
        let expired = match inner.peek(render_id) {
            Some(claimed_at) => claimed_at.elapsed() >= self.ttl,
            None => return false,
        };
        if expired {
            inner.pop(render_id);
        }
        !expired
    }

    /// Claims `render_id` for an insertion. Returns `false` when another
    /// request claimed it first and the claim has not expired.
    pub fn claim(&self, render_id: &str) -> bool {
        let mut inner = self.inner.lock();
        if let Some(claimed_at) = inner.peek(render_id) {
            if claimed_at.elapsed() < self.ttl {
                return false;
            }
        }
        inner.put(render_id.to_string(), Instant::now());
        true
    }
}

impl Default for RenderRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}
