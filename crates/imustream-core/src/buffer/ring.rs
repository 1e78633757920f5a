//! Overwrite-oldest circular buffer
//!
//! Array-backed with the capacity fixed at compile time, so pushing a sample
//! never allocates. Once full, each new value evicts the oldest one.

/// Fixed-capacity circular buffer holding the most recent `N` values
///
/// Reads on an empty buffer (or past the current length) return
/// `T::default()` and leave the buffer untouched. Check [`Self::is_empty`] or
/// [`Self::len`] first when the default value is a legal sample.
///
/// # Example
/// ```
/// use imustream_core::buffer::ring::RingBuffer;
///
/// let mut buf: RingBuffer<i16, 3> = RingBuffer::new();
/// for v in [1, 2, 3, 4] {
///     buf.put(v);
/// }
/// assert_eq!(buf.len(), 3);
/// assert_eq!(buf.peek(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuffer<T, const N: usize> {
    /// Backing storage
    buf: [T; N],
    /// Next write position
    head: usize,
    /// Oldest valid element
    tail: usize,
    /// Disambiguates full from empty when head == tail
    full: bool,
}

impl<T: Copy + Default, const N: usize> RingBuffer<T, N> {
    const NON_ZERO_CAPACITY: () = assert!(N > 0, "ring buffer capacity must be non-zero");

    /// Create an empty buffer
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_ZERO_CAPACITY;

        Self {
            buf: [T::default(); N],
            head: 0,
            tail: 0,
            full: false,
        }
    }

    /// Insert a value as the newest element, evicting the oldest if full
    pub fn put(&mut self, value: T) {
        self.buf[self.head] = value;
        if self.full {
            self.tail = (self.tail + 1) % N;
        }
        self.head = (self.head + 1) % N;
        self.full = self.head == self.tail;
    }

    /// Remove and return the oldest value
    ///
    /// Returns `T::default()` without changing state when empty.
    pub fn get(&mut self) -> T {
        if self.is_empty() {
            return T::default();
        }

        let value = self.buf[self.tail];
        self.tail = (self.tail + 1) % N;
        self.full = false;
        value
    }

    /// Oldest value without removing it (`T::default()` when empty)
    pub fn peek(&self) -> T {
        self.peek_nth(0)
    }

    /// The `n`-th oldest value (0 = oldest) without removing it
    ///
    /// Returns `T::default()` when `n >= len()`.
    pub fn peek_nth(&self, n: usize) -> T {
        if n >= self.len() {
            return T::default();
        }
        self.buf[(self.tail + n) % N]
    }

    /// Logically empty the buffer; storage is kept as is
    pub fn reset(&mut self) {
        self.head = self.tail;
        self.full = false;
    }

    /// Number of valid elements
    pub fn len(&self) -> usize {
        if self.full {
            N
        } else if self.head >= self.tail {
            self.head - self.tail
        } else {
            N + self.head - self.tail
        }
    }

    /// True when nothing has been inserted since construction or reset
    pub fn is_empty(&self) -> bool {
        !self.full && self.head == self.tail
    }

    /// True once `N` values are held
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Fixed capacity `N`
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Copy the valid elements, oldest first, into `out`
    ///
    /// Copies `min(len(), out.len())` elements and returns that count.
    pub fn to_array(&self, out: &mut [T]) -> usize {
        let count = self.len().min(out.len());
        for (i, slot) in out.iter_mut().take(count).enumerate() {
            *slot = self.buf[(self.tail + i) % N];
        }
        count
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len()).map(move |i| self.buf[(self.tail + i) % N])
    }
}

impl<T: Copy + Default, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
