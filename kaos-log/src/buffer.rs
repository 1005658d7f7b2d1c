//! Fixed-capacity append-only byte buffer.
//!
//! One buffer holds one batch of concatenated records. Buffers are recycled
//! with [`FixedBuffer::reset`] instead of being reallocated.

/// Hot path buffer size (one batch handed to the writer thread).
pub const SMALL_BUFFER: usize = 4000;
/// Large batch size for bulk producers.
pub const LARGE_BUFFER: usize = 4000 * 1000;

pub struct FixedBuffer {
    data: Box<[u8]>,
    cur: usize,
}

impl Default for FixedBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedBuffer {
    pub fn new() -> Self {
        Self::with_capacity(SMALL_BUFFER)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            cur: 0,
        }
    }

    /// Copy `buf` to the tail. Does nothing if it does not fit; callers
    /// check [`available`](Self::available) first.
    #[inline]
    pub fn append(&mut self, buf: &[u8]) {
        if buf.len() <= self.available() {
            self.data[self.cur..self.cur + buf.len()].copy_from_slice(buf);
            self.cur += buf.len();
        }
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data[..self.cur]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cur
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cur == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn available(&self) -> usize {
        self.data.len() - self.cur
    }

    /// Rewind the cursor. Storage is kept.
    #[inline]
    pub fn reset(&mut self) {
        self.cur = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_append_and_reset() {
        let mut buf = FixedBuffer::with_capacity(16);
        buf.append(b"hello ");
        buf.append(b"kaos");
        assert_eq!(buf.data(), b"hello kaos");
        assert_eq!(buf.available(), 6);

        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(buf.available(), 16);
        assert_eq!(buf.capacity(), 16);
    }

    #[test]
    fn test_exact_fit() {
        let mut buf = FixedBuffer::with_capacity(4);
        buf.append(b"abcd");
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.available(), 0);
    }

    #[test]
    fn test_overflow_is_noop() {
        let mut buf = FixedBuffer::with_capacity(8);
        buf.append(b"12345");
        buf.append(b"6789");
        assert_eq!(buf.data(), b"12345");

        let mut tiny = FixedBuffer::with_capacity(2);
        tiny.append(b"too long");
        assert!(tiny.is_empty());
    }

    #[test]
    fn test_random_appends_never_overflow() {
        let mut rng = rand::thread_rng();
        let mut buf = FixedBuffer::with_capacity(SMALL_BUFFER);
        let payload = [b'x'; 700];

        for _ in 0..10_000 {
            let n = rng.gen_range(0..payload.len());
            let before = buf.len();
            buf.append(&payload[..n]);

            assert!(buf.len() <= buf.capacity());
            if n > SMALL_BUFFER - before {
                assert_eq!(buf.len(), before);
            } else {
                assert_eq!(buf.len(), before + n);
            }
            if rng.gen_ratio(1, 50) {
                buf.reset();
            }
        }
    }
}
