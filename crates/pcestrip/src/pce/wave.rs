//! Deduplicating waveform pool.
//!
//! HuC6280 waveforms are 32 five-bit samples uploaded one byte at a time
//! through the wave RAM data port. Songs re-upload the same handful of
//! timbres constantly, so identical snapshots are stored once and tracks
//! reference them by pool index.

/// Byte length of one waveform snapshot.
pub const WAVE_SIZE: usize = 32;

/// First-seen-order store of distinct 32-byte waveform snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WavePool {
    samples: Vec<[u8; WAVE_SIZE]>,
}

impl WavePool {
    pub fn new() -> Self {
        WavePool {
            samples: Vec::new(),
        }
    }

    /// Return the pool index for `sample`, appending it if unseen.
    ///
    /// Matching is exact byte equality against every previously interned
    /// snapshot, so re-interning identical content never grows the pool and
    /// index assignment is stable for the lifetime of a run.
    pub fn intern(&mut self, sample: &[u8; WAVE_SIZE]) -> usize {
        if let Some(index) = self.samples.iter().position(|known| known == sample) {
            return index;
        }
        self.samples.push(*sample);
        self.samples.len() - 1
    }

    /// Number of distinct snapshots interned so far.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The snapshot stored at `index`, when in range.
    pub fn get(&self, index: usize) -> Option<&[u8; WAVE_SIZE]> {
        self.samples.get(index)
    }

    /// Iterate snapshots in interning order.
    pub fn iter(&self) -> std::slice::Iter<'_, [u8; WAVE_SIZE]> {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(fill: u8) -> [u8; WAVE_SIZE] {
        [fill; WAVE_SIZE]
    }

    #[test]
    fn test_intern_is_idempotent() {
        let mut pool = WavePool::new();

        let first = pool.intern(&sample(0x11));
        let again = pool.intern(&sample(0x11));

        assert_eq!(first, again);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_intern_distinct_samples() {
        let mut pool = WavePool::new();

        let a = pool.intern(&sample(0x01));
        let b = pool.intern(&sample(0x02));
        let c = pool.intern(&sample(0x03));

        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(pool.len(), 3);

        // Re-interning an early sample after later ones keeps its index.
        assert_eq!(pool.intern(&sample(0x01)), 0);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_single_byte_difference_is_distinct() {
        let mut pool = WavePool::new();

        let mut tweaked = sample(0x1F);
        tweaked[WAVE_SIZE - 1] = 0x1E;

        let a = pool.intern(&sample(0x1F));
        let b = pool.intern(&tweaked);

        assert_ne!(a, b);
        assert_eq!(pool.get(a), Some(&sample(0x1F)));
        assert_eq!(pool.get(b), Some(&tweaked));
    }
}
