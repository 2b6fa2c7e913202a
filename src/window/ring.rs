//! Fixed-capacity ring buffer
//!
//! Storage is a plain `[T; N]`; no allocation happens after construction.

use crate::traits::Sample;

/// Circular store for the last `N` samples
///
/// Writes start at slot 0 and wrap once the buffer is full, overwriting the
/// oldest sample. While the buffer is filling, resident samples occupy
/// `storage[..len]`; once full, every slot is resident. In both cases the
/// resident slice is in storage order, which is **not** chronological after
/// the first wrap.
///
/// # Example
///
/// ```
/// use flowsignal::window::RingBuffer;
///
/// let mut ring = RingBuffer::<i16, 3>::new();
/// assert_eq!(ring.push(1), None);
/// assert_eq!(ring.push(2), None);
/// assert_eq!(ring.push(3), None);
///
/// // Full: the next write evicts the oldest sample
/// assert_eq!(ring.push(4), Some(1));
/// assert_eq!(ring.as_slice(), &[4, 2, 3]);
/// ```
#[derive(Clone, Debug)]
pub struct RingBuffer<T: Sample, const N: usize> {
    /// Sample slots
    storage: [T; N],
    /// Number of resident samples (0..=N)
    len: usize,
    /// Next write position (0..N)
    head: usize,
}

impl<T: Sample, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Sample, const N: usize> RingBuffer<T, N> {
    const CAPACITY_IN_RANGE: () = assert!(
        N >= 2 && N <= 65535,
        "ring buffer capacity must be between 2 and 65535"
    );

    /// Create an empty ring buffer
    ///
    /// A capacity outside `2..=65535` fails to compile.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_IN_RANGE;

        Self {
            storage: [T::default(); N],
            len: 0,
            head: 0,
        }
    }

    /// Write a sample, returning the evicted one when the buffer was full
    #[inline]
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.len == N {
            Some(self.storage[self.head])
        } else {
            self.len += 1;
            None
        };

        self.storage[self.head] = value;
        self.head += 1;
        if self.head == N {
            self.head = 0;
        }

        evicted
    }

    /// Logically discard all samples
    ///
    /// Old values stay in storage but are no longer resident.
    pub fn clear(&mut self) {
        self.len = 0;
        self.head = 0;
    }

    /// Resident samples in raw storage order (not chronological)
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.storage[..self.len]
    }

    /// Number of resident samples
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Fixed capacity `N`
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Index of the next write
    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == N
    }
}
