/// One row of a band as 0/1 samples (1 = ink)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanline {
    /// Samples, one per column
    pub samples: Vec<u8>,
    /// Row index inside the band
    pub row: usize,
    /// Number of adjacent-sample value changes
    pub transitions: usize,
}

impl Scanline {
    /// Wrap a sample row, counting its transitions
    pub fn new(samples: Vec<u8>, row: usize) -> Self {
        let transitions = samples.windows(2).filter(|w| w[0] != w[1]).count();
        Self {
            samples,
            row,
            transitions,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the scanline holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
