use std::sync::atomic::{AtomicI64, Ordering};

/// Monotonic high-water mark over notification row ids.
///
/// Row ids are positive, so 0 doubles as the uninitialized state: nothing
/// has been seen yet and the next poll must establish a baseline instead of
/// delivering rows.
#[derive(Debug, Default)]
pub struct Watermark(AtomicI64);

impl Watermark {
    pub fn new() -> Self {
        Self(AtomicI64::new(0))
    }

    pub fn get(&self) -> i64 {
        self.0.load(Ordering::Acquire)
    }

    pub fn is_initialized(&self) -> bool {
        self.get() != 0
    }

    /// Raise the mark to `id`. Lower or equal values are ignored; the mark
    /// never moves backwards.
    pub fn advance_to(&self, id: i64) {
        self.0.fetch_max(id, Ordering::AcqRel);
    }

    /// Whether `id` lies beyond everything seen so far.
    pub fn is_new(&self, id: i64) -> bool {
        id > self.get()
    }
}
