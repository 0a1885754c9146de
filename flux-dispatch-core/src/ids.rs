//! Sequential identifier generation
//!
//! Action creators that need fresh ids (e.g. for new list items) take an
//! [`IdGenerator`] explicitly instead of bumping a process-wide counter.

/// Hands out `0, 1, 2, ...` in order
///
/// ```
/// use flux_dispatch_core::IdGenerator;
///
/// let mut ids = IdGenerator::default();
/// assert_eq!(ids.next_id(), 0);
/// assert_eq!(ids.next_id(), 1);
/// assert_eq!(ids.peek(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue a sequence, e.g. after loading existing items.
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Take the next id
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to [`next_id`](Self::next_id) will return
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Iterator for IdGenerator {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_id())
    }
}
