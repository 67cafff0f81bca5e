//! Bounded FIFO queue with drop-oldest eviction
//!
//! Each bucket owns one `LogQueue`. Logging call sites push, the bucket worker
//! pops; both sides go through a single mutex. When a push finds the queue at
//! capacity the front (oldest) item is evicted first, so under sustained
//! overload the queue always holds the most recent entries.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI32, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use super::handler::Payload;

/// Smallest capacity a queue may be configured with
pub const MIN_BUCKET_CAPACITY: u32 = 8;

/// Largest capacity a queue may be configured with
pub const MAX_BUCKET_CAPACITY: u32 = 16 * 1024;

/// Requested capacity meaning "follow the process-wide default"
pub const USE_DEFAULT_CAPACITY: i32 = -1;

const INITIAL_DEFAULT_CAPACITY: u32 = 1024;

static DEFAULT_CAPACITY: AtomicU32 = AtomicU32::new(INITIAL_DEFAULT_CAPACITY);

/// Process-wide capacity used by queues created with [`USE_DEFAULT_CAPACITY`]
pub fn default_capacity() -> u32 {
    DEFAULT_CAPACITY.load(Ordering::Relaxed)
}

/// Change the process-wide default capacity, clamped into
/// `[MIN_BUCKET_CAPACITY, MAX_BUCKET_CAPACITY]`
///
/// Queues following the default pick the new value up on their next push.
pub fn set_default_capacity(capacity: u32) {
    DEFAULT_CAPACITY.store(
        capacity.clamp(MIN_BUCKET_CAPACITY, MAX_BUCKET_CAPACITY),
        Ordering::Relaxed,
    );
}

/// Items that may represent "no value" and are then ignored by [`LogQueue::push`]
pub trait QueueItem {
    fn has_value(&self) -> bool {
        true
    }
}

impl QueueItem for Payload {
    fn has_value(&self) -> bool {
        !self.is_empty()
    }
}

impl QueueItem for String {
    fn has_value(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> QueueItem for Vec<T> {
    fn has_value(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: ?Sized> QueueItem for Arc<T> {}

macro_rules! always_has_value {
    ($($ty:ty),*) => {
        $(impl QueueItem for $ty {})*
    };
}

always_has_value!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

#[derive(Debug)]
pub struct LogQueue<T> {
    items: Mutex<VecDeque<T>>,
    requested: AtomicI32,
    evicted: AtomicU64,
}

impl<T: QueueItem> LogQueue<T> {
    /// Create a queue; `capacity` follows [`LogQueue::set_capacity`] rules
    pub fn new(capacity: i32) -> Self {
        let queue = Self {
            items: Mutex::new(VecDeque::new()),
            requested: AtomicI32::new(USE_DEFAULT_CAPACITY),
            evicted: AtomicU64::new(0),
        };
        queue.set_capacity(capacity);
        queue
    }

    /// `-1` follows the process-wide default; anything else is clamped into
    /// `[MIN_BUCKET_CAPACITY, MAX_BUCKET_CAPACITY]`
    ///
    /// Existing excess items stay until the next push trims them.
    pub fn set_capacity(&self, capacity: i32) {
        let requested = if capacity == USE_DEFAULT_CAPACITY {
            USE_DEFAULT_CAPACITY
        } else {
            capacity.clamp(MIN_BUCKET_CAPACITY as i32, MAX_BUCKET_CAPACITY as i32)
        };
        self.requested.store(requested, Ordering::Relaxed);
    }

    /// Effective capacity right now
    pub fn capacity(&self) -> usize {
        match self.requested.load(Ordering::Relaxed) {
            USE_DEFAULT_CAPACITY => default_capacity() as usize,
            n => n as usize,
        }
    }

    pub fn count(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Items evicted so far to make room for newer ones
    pub fn evicted_count(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    /// Append `item`, evicting from the front while the queue is full
    ///
    /// Returns the number of evicted items. Items without a value are ignored.
    pub fn push(&self, item: T) -> usize {
        if !item.has_value() {
            return 0;
        }

        let capacity = self.capacity();
        let mut items = self.items.lock();

        let mut evicted = 0;
        while items.len() >= capacity {
            if items.pop_front().is_none() {
                break;
            }
            evicted += 1;
        }
        items.push_back(item);
        drop(items);

        if evicted > 0 {
            self.evicted.fetch_add(evicted as u64, Ordering::Relaxed);
        }
        evicted
    }

    /// Remove and return the oldest item
    pub fn pop(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    /// Discard every pending item, returning how many were dropped
    pub fn clear(&self) -> usize {
        let mut items = self.items.lock();
        let dropped = items.len();
        items.clear();
        dropped
    }
}
