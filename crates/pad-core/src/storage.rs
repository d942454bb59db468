//! Bucketed line storage.
//!
//! A [`LineStore`] keeps every line of a document in fixed-capacity buckets chained through owned
//! `next` links. Line `i` lives in bucket `i / capacity` at slot `i % capacity`; reaching it walks
//! the chain from the head.
//!
//! Invariant: every bucket except the last is full. Unused slots at the end of the last bucket
//! hold empty lines and are never addressed.

use std::fmt;

use crate::error::{BufferError, Result};
use crate::line::Line;
use crate::settings::DEFAULT_BUCKET_CAPACITY;

static EMPTY_LINE: Line = Line::new();

struct Bucket {
    lines: Box<[Line]>,
    len: usize,
    next: Option<Box<Bucket>>,
}

impl Bucket {
    fn new(capacity: usize) -> Box<Self> {
        Box::new(Self {
            lines: (0..capacity).map(|_| Line::new()).collect(),
            len: 0,
            next: None,
        })
    }

    fn push(&mut self, line: Line) {
        self.lines[self.len] = line;
        self.len += 1;
    }

    /// Insert `line` at `offset`, returning the line pushed out of a full bucket.
    fn insert(&mut self, offset: usize, line: Line) -> Option<Line> {
        let capacity = self.lines.len();
        if self.len < capacity {
            self.lines[offset..=self.len].rotate_right(1);
            self.lines[offset] = line;
            self.len += 1;
            None
        } else {
            let overflow = std::mem::take(&mut self.lines[capacity - 1]);
            self.lines[offset..].rotate_right(1);
            self.lines[offset] = line;
            Some(overflow)
        }
    }

    fn remove(&mut self, offset: usize) -> Line {
        let removed = std::mem::take(&mut self.lines[offset]);
        self.lines[offset..self.len].rotate_left(1);
        self.len -= 1;
        removed
    }

    /// Refill the last slot of this bucket with the first line of the next one.
    fn pull_front_of_next(&mut self) {
        if let Some(next) = self.next.as_deref_mut()
            && next.len > 0
        {
            let front = next.remove(0);
            self.push(front);
        }
    }
}

/// Line-granular document storage built from chained fixed-capacity buckets.
pub struct LineStore {
    head: Box<Bucket>,
    capacity: usize,
    line_count: usize,
}

impl LineStore {
    /// Create an empty store with the default bucket capacity.
    pub fn new() -> Self {
        Self {
            head: Bucket::new(DEFAULT_BUCKET_CAPACITY),
            capacity: DEFAULT_BUCKET_CAPACITY,
            line_count: 0,
        }
    }

    /// Create an empty store whose buckets hold `capacity` lines.
    pub fn with_bucket_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(BufferError::ZeroBucketCapacity);
        }
        Ok(Self {
            head: Bucket::new(capacity),
            capacity,
            line_count: 0,
        })
    }

    /// Build a store from a sequence of lines.
    ///
    /// Lines are written into the tail bucket directly; a new bucket is chained on only when the
    /// tail is full and another line arrives.
    pub fn from_lines(capacity: usize, lines: impl IntoIterator<Item = Line>) -> Result<Self> {
        let mut store = Self::with_bucket_capacity(capacity)?;
        let mut line_count = 0;
        let mut tail = &mut *store.head;
        for line in lines {
            if tail.len == capacity {
                tail = &mut **tail.next.insert(Bucket::new(capacity));
            }
            tail.push(line);
            line_count += 1;
        }
        store.line_count = line_count;
        Ok(store)
    }

    /// Total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Whether the store holds no lines.
    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }

    /// Lines per bucket.
    pub fn bucket_capacity(&self) -> usize {
        self.capacity
    }

    /// Number of buckets currently allocated in the chain (at least 1).
    pub fn bucket_count(&self) -> usize {
        let mut count = 1;
        let mut bucket = &*self.head;
        while let Some(next) = bucket.next.as_deref() {
            count += 1;
            bucket = next;
        }
        count
    }

    fn bucket(&self, number: usize) -> Option<&Bucket> {
        let mut bucket = &*self.head;
        for _ in 0..number {
            bucket = bucket.next.as_deref()?;
        }
        Some(bucket)
    }

    fn bucket_mut(&mut self, number: usize) -> Option<&mut Bucket> {
        let mut bucket = &mut *self.head;
        for _ in 0..number {
            bucket = bucket.next.as_deref_mut()?;
        }
        Some(bucket)
    }

    fn bucket_mut_or_grow(&mut self, number: usize) -> &mut Bucket {
        let capacity = self.capacity;
        let mut bucket = &mut *self.head;
        for _ in 0..number {
            bucket = &mut **bucket.next.get_or_insert_with(|| Bucket::new(capacity));
        }
        bucket
    }

    /// Get the line at `index`.
    ///
    /// Indices at or past [`Self::line_count`] yield a shared empty line.
    pub fn get_line(&self, index: usize) -> &Line {
        if index >= self.line_count {
            return &EMPTY_LINE;
        }
        self.bucket(index / self.capacity)
            .map_or(&EMPTY_LINE, |bucket| &bucket.lines[index % self.capacity])
    }

    /// Get mutable access to the line at `index`, if it exists.
    pub fn get_line_mut(&mut self, index: usize) -> Option<&mut Line> {
        if index >= self.line_count {
            return None;
        }
        let capacity = self.capacity;
        self.bucket_mut(index / capacity)
            .map(|bucket| &mut bucket.lines[index % capacity])
    }

    /// Number of characters in the line at `index`.
    pub fn line_char_count(&self, index: usize) -> Result<usize> {
        if index >= self.line_count {
            return Err(BufferError::LineOutOfRange {
                index,
                line_count: self.line_count,
            });
        }
        Ok(self.get_line(index).len())
    }

    /// Append a line after the last one.
    pub fn push_line(&mut self, line: Line) {
        let index = self.line_count;
        let capacity = self.capacity;
        self.bucket_mut_or_grow(index / capacity).push(line);
        self.line_count += 1;
    }

    /// Insert a line so that it ends up at `index`, shifting later lines down.
    ///
    /// A full bucket hands its last line to the front of the next bucket; the cascade stops at
    /// the first bucket with room, growing the chain when it runs out.
    pub fn insert_line(&mut self, index: usize, line: Line) -> Result<()> {
        if index > self.line_count {
            return Err(BufferError::LineOutOfRange {
                index,
                line_count: self.line_count,
            });
        }

        let capacity = self.capacity;
        let mut bucket = self.bucket_mut_or_grow(index / capacity);
        let mut offset = index % capacity;
        let mut carry = line;
        while let Some(overflow) = bucket.insert(offset, carry) {
            carry = overflow;
            offset = 0;
            bucket = &mut **bucket.next.get_or_insert_with(|| Bucket::new(capacity));
        }
        self.line_count += 1;
        Ok(())
    }

    /// Remove and return the line at `index`, shifting later lines up.
    pub fn remove_line(&mut self, index: usize) -> Result<Line> {
        let line_count = self.line_count;
        let capacity = self.capacity;
        let out_of_range = BufferError::LineOutOfRange { index, line_count };
        if index >= line_count {
            return Err(out_of_range);
        }

        let Some(mut bucket) = self.bucket_mut(index / capacity) else {
            return Err(out_of_range);
        };
        let removed = bucket.remove(index % capacity);
        loop {
            bucket.pull_front_of_next();
            match bucket.next.as_deref_mut() {
                Some(next) => bucket = next,
                None => break,
            }
        }

        self.line_count -= 1;
        self.drop_unused_buckets();
        Ok(removed)
    }

    /// Remove every line, keeping a single empty head bucket.
    pub fn clear(&mut self) {
        self.drop_chain_after_head();
        self.head = Bucket::new(self.capacity);
        self.line_count = 0;
    }

    fn drop_unused_buckets(&mut self) {
        let needed = self.line_count.div_ceil(self.capacity).max(1);
        if let Some(last) = self.bucket_mut(needed - 1) {
            last.next = None;
        }
    }

    fn drop_chain_after_head(&mut self) {
        let mut next = self.head.next.take();
        while let Some(mut bucket) = next {
            next = bucket.next.take();
        }
    }

    /// Iterate over all lines in order.
    pub fn lines(&self) -> Lines<'_> {
        self.lines_from(0)
    }

    /// Iterate over the lines starting at `start`.
    ///
    /// The bucket chain is walked once to reach `start`; later lines are reached by following
    /// the chain, not by re-indexing from the head.
    pub fn lines_from(&self, start: usize) -> Lines<'_> {
        let remaining = self.line_count.saturating_sub(start);
        Lines {
            bucket: if remaining > 0 {
                self.bucket(start / self.capacity)
            } else {
                None
            },
            offset: start % self.capacity,
            remaining,
        }
    }

    /// Serialize every line followed by `'\n'`, UTF-8 encoded.
    ///
    /// An empty store serializes to no bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for line in self.lines() {
            line.encode_utf8_into(&mut out);
            out.push(b'\n');
        }
        out
    }
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LineStore {
    fn drop(&mut self) {
        self.drop_chain_after_head();
    }
}

impl fmt::Debug for LineStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineStore")
            .field("line_count", &self.line_count)
            .field("bucket_capacity", &self.capacity)
            .field("bucket_count", &self.bucket_count())
            .finish()
    }
}

/// Iterator over the lines of a [`LineStore`], created by [`LineStore::lines`].
#[derive(Clone)]
pub struct Lines<'a> {
    bucket: Option<&'a Bucket>,
    offset: usize,
    remaining: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a Line;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let mut bucket = self.bucket?;
        while self.offset >= bucket.len {
            bucket = bucket.next.as_deref()?;
            self.offset = 0;
        }
        self.bucket = Some(bucket);

        let line = &bucket.lines[self.offset];
        self.offset += 1;
        self.remaining -= 1;
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Lines<'_> {}

impl fmt::Debug for Lines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lines")
            .field("offset", &self.offset)
            .field("remaining", &self.remaining)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(capacity: usize, count: usize) -> LineStore {
        LineStore::from_lines(capacity, (0..count).map(|i| Line::from_text(&i.to_string())))
            .unwrap()
    }

    fn texts(store: &LineStore) -> Vec<String> {
        store.lines().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = LineStore::new();
        assert_eq!(store.line_count(), 0);
        assert_eq!(store.bucket_count(), 1);
        assert_eq!(store.bucket_capacity(), 100);
        assert!(store.get_line(0).is_empty());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            LineStore::with_bucket_capacity(0),
            Err(BufferError::ZeroBucketCapacity)
        ));
    }

    #[test]
    fn test_get_line_walks_buckets() {
        let store = store_of(3, 10);
        assert_eq!(store.bucket_count(), 4);
        for i in 0..10 {
            assert_eq!(store.get_line(i).to_string(), i.to_string());
        }
    }

    #[test]
    fn test_out_of_range_reads() {
        let mut store = store_of(3, 3);
        assert!(store.get_line(3).is_empty());
        assert!(store.get_line(1000).is_empty());
        assert_eq!(store.line_count(), 3);
        assert_eq!(
            store.line_char_count(3),
            Err(BufferError::LineOutOfRange {
                index: 3,
                line_count: 3
            })
        );
        assert!(store.get_line_mut(3).is_none());
    }

    #[test]
    fn test_push_exactly_full_does_not_grow() {
        let store = store_of(4, 4);
        assert_eq!(store.bucket_count(), 1);
        let store = store_of(4, 5);
        assert_eq!(store.bucket_count(), 2);
    }

    #[test]
    fn test_insert_line_cascades_across_buckets() {
        let mut store = store_of(3, 6);
        store.insert_line(1, Line::from_text("x")).unwrap();
        assert_eq!(texts(&store), ["0", "x", "1", "2", "3", "4", "5"]);
        assert_eq!(store.bucket_count(), 3);

        store.insert_line(7, Line::from_text("end")).unwrap();
        assert_eq!(store.get_line(7).to_string(), "end");
        assert_eq!(store.line_count(), 8);

        assert!(store.insert_line(10, Line::new()).is_err());
    }

    #[test]
    fn test_remove_line_compacts_and_frees_buckets() {
        let mut store = store_of(3, 7);
        assert_eq!(store.bucket_count(), 3);

        let removed = store.remove_line(0).unwrap();
        assert_eq!(removed.to_string(), "0");
        assert_eq!(texts(&store), ["1", "2", "3", "4", "5", "6"]);
        assert_eq!(store.bucket_count(), 2);

        store.remove_line(5).unwrap();
        store.remove_line(2).unwrap();
        assert_eq!(texts(&store), ["1", "2", "4", "5"]);
        assert!(store.remove_line(4).is_err());
    }

    #[test]
    fn test_remove_all_lines_keeps_head() {
        let mut store = store_of(2, 5);
        while !store.is_empty() {
            store.remove_line(0).unwrap();
        }
        assert_eq!(store.bucket_count(), 1);
        store.push_line(Line::from_text("again"));
        assert_eq!(texts(&store), ["again"]);
    }

    #[test]
    fn test_lines_from_middle() {
        let store = store_of(4, 10);
        let tail: Vec<String> = store.lines_from(6).map(|l| l.to_string()).collect();
        assert_eq!(tail, ["6", "7", "8", "9"]);
        assert_eq!(store.lines_from(10).count(), 0);
        assert_eq!(store.lines_from(3).len(), 7);
    }

    #[test]
    fn test_to_bytes_terminates_every_line() {
        let store = LineStore::from_lines(2, ["ab", "", "cd"].map(Line::from_text)).unwrap();
        assert_eq!(store.to_bytes(), b"ab\n\ncd\n");
        assert!(LineStore::new().to_bytes().is_empty());

        let store = LineStore::from_lines(2, ["ab\r", "cd"].map(Line::from_text)).unwrap();
        assert_eq!(store.to_bytes(), b"ab\r\ncd\n");
    }

    #[test]
    fn test_clear_and_drop_long_chain() {
        let mut store = store_of(1, 50_000);
        assert_eq!(store.bucket_count(), 50_000);
        store.clear();
        assert_eq!(store.line_count(), 0);
        assert_eq!(store.bucket_count(), 1);

        drop(store_of(1, 50_000));
    }
}
