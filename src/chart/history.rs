//! Fixed-capacity rolling history of chart values.

/// Keeps the last `K` values, oldest at index 0.
///
/// Slots that have never been written hold zero; [`filled_count`] says how
/// many trailing slots are real readings.
///
/// [`filled_count`]: HistoryBuffer::filled_count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryBuffer<const K: usize> {
    slots: [i16; K],
    filled: usize,
}

impl<const K: usize> Default for HistoryBuffer<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const K: usize> HistoryBuffer<K> {
    pub const CAPACITY: usize = K;

    pub const fn new() -> Self {
        Self {
            slots: [0; K],
            filled: 0,
        }
    }

    /// Shift every slot one toward index 0 and store `value` last.
    pub fn push(&mut self, value: i16) {
        if K == 0 {
            return;
        }
        self.slots.copy_within(1.., 0);
        self.slots[K - 1] = value;
        if self.filled < K {
            self.filled += 1;
        }
    }

    pub fn clear(&mut self) {
        self.slots = [0; K];
        self.filled = 0;
    }

    /// Number of trailing slots holding real readings, in `0..=K`.
    pub fn filled_count(&self) -> usize {
        self.filled
    }

    /// The valid readings, oldest first.
    pub fn recent(&self) -> &[i16] {
        &self.slots[K - self.filled..]
    }

    /// Most recent reading, if any.
    pub fn latest(&self) -> Option<i16> {
        self.recent().last().copied()
    }

    /// All `K` slots including unfilled zeros.
    pub fn as_slice(&self) -> &[i16] {
        &self.slots
    }
}
