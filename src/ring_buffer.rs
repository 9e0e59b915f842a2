//! Fixed-capacity byte ring between the ingestion path and the reader
//!
//! One slot is always left free so that `head == tail` unambiguously means
//! empty: a buffer of capacity `N` holds at most `N - 1` bytes.
//!
//! Neither side ever waits. A write that runs out of room stores the prefix
//! that fits and drops the rest; a read on an empty buffer returns nothing.
//! Both sides take the same lock, held only for the index update and copy.

use parking_lot::Mutex;
use tracing::warn;

use crate::error::DriverError;

struct Ring {
    data: Box<[u8]>,
    /// Next slot to write
    head: usize,
    /// Next slot to read
    tail: usize,
}

impl Ring {
    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn len(&self) -> usize {
        (self.head + self.capacity() - self.tail) % self.capacity()
    }

    fn push(&mut self, bytes: &[u8]) -> usize {
        let mut stored = 0;
        for &byte in bytes {
            let next = (self.head + 1) % self.capacity();
            if next == self.tail {
                break;
            }
            self.data[self.head] = byte;
            self.head = next;
            stored += 1;
        }
        stored
    }

    fn pop_into(&mut self, dest: &mut [u8]) -> usize {
        let mut copied = 0;
        while copied < dest.len() && self.tail != self.head {
            dest[copied] = self.data[self.tail];
            self.tail = (self.tail + 1) % self.capacity();
            copied += 1;
        }
        copied
    }
}

/// Lossy single-producer / single-consumer byte FIFO
pub struct RingBuffer {
    ring: Mutex<Ring>,
}

impl RingBuffer {
    /// Smallest usable capacity (one byte of storage plus the free slot)
    pub const MIN_CAPACITY: usize = 2;

    /// Create a buffer with `capacity` slots (`capacity - 1` usable bytes)
    pub fn new(capacity: usize) -> Result<Self, DriverError> {
        if capacity < Self::MIN_CAPACITY {
            return Err(DriverError::Config(format!(
                "buffer capacity must be at least {}, got {capacity}",
                Self::MIN_CAPACITY
            )));
        }
        Ok(Self {
            ring: Mutex::new(Ring {
                data: vec![0u8; capacity].into_boxed_slice(),
                head: 0,
                tail: 0,
            }),
        })
    }

    /// Store `bytes` in order, returning how many were stored
    ///
    /// Stops at the first byte that does not fit; the remainder of this
    /// call is dropped. Already-stored bytes are never rolled back.
    pub fn write(&self, bytes: &[u8]) -> usize {
        let stored = self.ring.lock().push(bytes);
        if stored < bytes.len() {
            let err = DriverError::BufferOverflow {
                dropped: bytes.len() - stored,
            };
            warn!("{}", err);
        }
        stored
    }

    /// Copy up to `dest.len()` of the oldest bytes into `dest`
    pub fn read_into(&self, dest: &mut [u8]) -> usize {
        self.ring.lock().pop_into(dest)
    }

    /// Take up to `max_count` of the oldest bytes
    pub fn read(&self, max_count: usize) -> Vec<u8> {
        let mut ring = self.ring.lock();
        let mut out = vec![0u8; max_count.min(ring.len())];
        let n = ring.pop_into(&mut out);
        out.truncate(n);
        out
    }

    /// Bytes currently stored
    pub fn len(&self) -> usize {
        self.ring.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot count; at most `capacity() - 1` bytes are stored at once
    pub fn capacity(&self) -> usize {
        self.ring.lock().capacity()
    }

    /// Bytes that can be written before the buffer starts dropping
    pub fn free_space(&self) -> usize {
        let ring = self.ring.lock();
        ring.capacity() - 1 - ring.len()
    }
}
