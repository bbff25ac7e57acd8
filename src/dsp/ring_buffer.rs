//! Fixed-capacity circular sample store.
//!
//! Every delay-based effect keeps its history here. The buffer is sized once
//! when the effect is instantiated and is never reallocated; all indices are
//! reduced modulo the capacity so reads cannot go out of bounds.

use super::sample::Sample;
use crate::error::{EngineError, Result};

/// Largest history any effect may request, in samples.
pub const MAX_CAPACITY: usize = 1 << 24;

/// Circular buffer of the most recent `capacity` samples.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    data: Vec<Sample>,
    write_pos: usize,
}

impl RingBuffer {
    /// Create a zero-filled ring buffer. Capacities outside `1..=MAX_CAPACITY`
    /// are rejected before anything is allocated.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(EngineError::InvalidCapacity);
        }
        Ok(Self {
            data: vec![0; capacity],
            write_pos: 0,
        })
    }

    /// Create a ring buffer sized for `duration_secs` at `sample_rate`.
    pub fn with_duration(duration_secs: f64, sample_rate: u32) -> Result<Self> {
        Self::new((duration_secs * sample_rate as f64) as usize)
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Index of the slot the next `write` will overwrite.
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Store a sample at the write cursor and advance it.
    #[inline]
    pub fn write(&mut self, sample: Sample) {
        self.data[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.data.len();
    }

    /// Sample written `offset` writes ago; `read_at(0)` is the newest sample.
    #[inline]
    pub fn read_at(&self, offset: usize) -> Sample {
        let n = self.data.len();
        let offset = offset % n;
        self.data[(self.write_pos + n - 1 - offset) % n]
    }

    /// The sample the next `write` will overwrite (one full buffer ago).
    #[inline]
    pub fn oldest(&self) -> Sample {
        self.data[self.write_pos]
    }

    /// Raw slot access by absolute index, reduced modulo capacity.
    #[cfg(test)]
    pub fn get(&self, index: usize) -> Sample {
        self.data[index % self.data.len()]
    }

    /// Overwrite an absolute slot without moving the write cursor.
    #[inline]
    pub fn set(&mut self, index: usize, sample: Sample) {
        let n = self.data.len();
        self.data[index % n] = sample;
    }

    /// Linear interpolation between the two slots bracketing an absolute
    /// fractional `position`, wrapping at the end of the buffer.
    #[inline]
    pub fn read_fractional(&self, position: f64) -> f64 {
        let n = self.data.len();
        let position = position.rem_euclid(n as f64);
        let base = position.floor();
        let frac = position - base;
        let i0 = (base as usize) % n;
        let i1 = (i0 + 1) % n;
        // (1 - frac)·a + frac·b, arranged to be exact when a == b.
        let a = self.data[i0] as f64;
        a + frac * (self.data[i1] as f64 - a)
    }

    /// Zero every slot and rewind the write cursor.
    pub fn clear(&mut self) {
        self.data.fill(0);
        self.write_pos = 0;
    }

    #[cfg(test)]
    pub fn is_silent(&self) -> bool {
        self.data.iter().all(|&s| s == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(RingBuffer::new(0), Err(EngineError::InvalidCapacity)));
        assert!(RingBuffer::with_duration(0.0, 8000).is_err());
    }

    #[test]
    fn oversized_capacity_rejected_without_allocating() {
        assert!(RingBuffer::new(MAX_CAPACITY).is_ok());
        assert!(matches!(
            RingBuffer::new(MAX_CAPACITY + 1),
            Err(EngineError::InvalidCapacity)
        ));
        assert!(matches!(RingBuffer::new(usize::MAX), Err(EngineError::InvalidCapacity)));
        assert!(RingBuffer::with_duration(1e12, 16000).is_err());
        assert!(RingBuffer::with_duration(f64::INFINITY, 16000).is_err());
    }

    #[test]
    fn reads_back_in_temporal_order() {
        let mut rb = RingBuffer::new(4).unwrap();
        for s in [10, 20, 30, 40] {
            rb.write(s);
        }
        let back: Vec<Sample> = (0..4).map(|o| rb.read_at(o)).collect();
        assert_eq!(back, vec![40, 30, 20, 10]);
    }

    #[test]
    fn partial_fill_leaves_zeros_behind() {
        let mut rb = RingBuffer::new(4).unwrap();
        rb.write(7);
        rb.write(8);
        assert_eq!(rb.read_at(0), 8);
        assert_eq!(rb.read_at(1), 7);
        assert_eq!(rb.read_at(2), 0);
        assert_eq!(rb.read_at(3), 0);
    }

    #[test]
    fn wraps_after_capacity() {
        let mut rb = RingBuffer::new(4).unwrap();
        for s in 1..=6 {
            rb.write(s);
        }
        assert_eq!(rb.write_pos(), 2);
        let back: Vec<Sample> = (0..4).map(|o| rb.read_at(o)).collect();
        assert_eq!(back, vec![6, 5, 4, 3]);
        assert_eq!(rb.oldest(), 3);
        assert_eq!(rb.get(0), 5);
        assert_eq!(rb.get(6), rb.get(2));
    }

    #[test]
    fn fractional_read_interpolates_and_wraps() {
        let mut rb = RingBuffer::new(4).unwrap();
        for s in [0, 100, 200, 300] {
            rb.write(s);
        }
        assert!((rb.read_fractional(1.0) - 100.0).abs() < 1e-9);
        assert!((rb.read_fractional(1.25) - 125.0).abs() < 1e-9);
        // Between the last slot and slot 0.
        assert!((rb.read_fractional(3.5) - 150.0).abs() < 1e-9);
        assert!((rb.read_fractional(5.5) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn clear_zeroes_everything() {
        let mut rb = RingBuffer::new(3).unwrap();
        rb.write(1);
        rb.write(2);
        rb.clear();
        assert!(rb.is_silent());
        assert_eq!(rb.write_pos(), 0);
    }
}
