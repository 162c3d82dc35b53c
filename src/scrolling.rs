/// Default number of samples kept per signal
pub const DEFAULT_CAPACITY: usize = 2000;

/// Fixed-capacity ring of `(x, y)` samples for one live signal.
///
/// Until the buffer is full, samples are appended. After that every new
/// sample overwrites the oldest one, found at `offset`, and the offset moves
/// forward. The stored samples read in chronological order starting from
/// `offset` and wrapping around.
#[derive(Debug, Clone)]
pub struct ScrollingBuffer {
    capacity: usize,
    offset: usize,
    data: Vec<(f32, f32)>,
}

impl ScrollingBuffer {
    /// Creates an empty buffer. Returns `None` for a zero capacity.
    pub fn new(capacity: usize) -> Option<Self> {
        if capacity == 0 {
            return None;
        }
        Some(ScrollingBuffer {
            capacity,
            offset: 0,
            data: Vec::with_capacity(capacity),
        })
    }

    /// Appends a sample, overwriting the oldest one once the buffer is full
    pub fn add_point(&mut self, x: f32, y: f32) {
        if self.data.len() < self.capacity {
            self.data.push((x, y));
        } else {
            self.data[self.offset] = (x, y);
            self.offset = (self.offset + 1) % self.capacity;
        }
    }

    /// Drops every sample and rewinds the offset
    pub fn erase(&mut self) {
        self.data.clear();
        self.offset = 0;
    }

    /// Samples in chronological order, oldest first
    pub fn points(&self) -> Points<'_> {
        let (older, newer) = self.as_slices();
        Points {
            older: older.iter(),
            newer: newer.iter(),
        }
    }

    /// Raw storage split at the offset: `(oldest run, newest run)`
    pub fn as_slices(&self) -> (&[(f32, f32)], &[(f32, f32)]) {
        let (head, tail) = self.data.split_at(self.offset);
        (tail, head)
    }

    /// Most recently inserted sample
    pub fn latest(&self) -> Option<(f32, f32)> {
        if self.data.is_empty() {
            return None;
        }
        let newest = (self.offset + self.data.len() - 1) % self.data.len();
        Some(self.data[newest])
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Index of the oldest sample once the buffer has wrapped
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Default for ScrollingBuffer {
    fn default() -> Self {
        ScrollingBuffer {
            capacity: DEFAULT_CAPACITY,
            offset: 0,
            data: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }
}

/// Chronological iterator over a [`ScrollingBuffer`]
#[derive(Debug, Clone)]
pub struct Points<'a> {
    older: std::slice::Iter<'a, (f32, f32)>,
    newer: std::slice::Iter<'a, (f32, f32)>,
}

impl Iterator for Points<'_> {
    type Item = (f32, f32);

    fn next(&mut self) -> Option<Self::Item> {
        self.older.next().or_else(|| self.newer.next()).copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.older.len() + self.newer.len();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Points<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(capacity: usize, count: usize) -> ScrollingBuffer {
        let mut buffer = ScrollingBuffer::new(capacity).unwrap();
        for i in 0..count {
            buffer.add_point(i as f32, i as f32);
        }
        buffer
    }

    #[test]
    fn wraps_to_most_recent_points() {
        let buffer = filled(3, 4);
        let points: Vec<_> = buffer.points().collect();
        assert_eq!(points, vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert_eq!(buffer.offset(), 1);
    }

    #[test]
    fn keeps_insertion_order_before_full() {
        let buffer = filled(5, 3);
        let xs: Vec<f32> = buffer.points().map(|(x, _)| x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
        assert_eq!(buffer.offset(), 0);
    }

    #[test]
    fn holds_last_n_after_many_wraps() {
        let capacity = 7;
        for count in capacity..4 * capacity {
            let buffer = filled(capacity, count);
            let xs: Vec<f32> = buffer.points().map(|(x, _)| x).collect();
            let expected: Vec<f32> = (count - capacity..count).map(|i| i as f32).collect();
            assert_eq!(xs, expected, "after {count} inserts");
        }
    }

    #[test]
    fn erase_is_idempotent() {
        let mut buffer = filled(3, 5);
        buffer.erase();
        assert_eq!(buffer.points().count(), 0);
        assert_eq!(buffer.offset(), 0);
        buffer.erase();
        assert!(buffer.is_empty());

        buffer.add_point(9.0, 9.0);
        assert_eq!(buffer.points().collect::<Vec<_>>(), vec![(9.0, 9.0)]);
    }

    #[test]
    fn points_is_restartable() {
        let buffer = filled(4, 6);
        let iter = buffer.points();
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
        assert_eq!(buffer.points().len(), 4);
    }

    #[test]
    fn latest_tracks_newest_sample() {
        assert_eq!(ScrollingBuffer::default().latest(), None);
        assert_eq!(filled(3, 2).latest(), Some((1.0, 1.0)));
        assert_eq!(filled(3, 3).latest(), Some((2.0, 2.0)));
        assert_eq!(filled(3, 7).latest(), Some((6.0, 6.0)));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(ScrollingBuffer::new(0).is_none());
        assert_eq!(ScrollingBuffer::default().capacity(), DEFAULT_CAPACITY);
    }
}
