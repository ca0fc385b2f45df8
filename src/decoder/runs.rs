/// Lengths of the maximal constant runs of a scanline
///
/// The leading run is always kept, so the polarity of run `i` is
/// `leading_ink` for even `i` and its opposite for odd `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLengths {
    /// Run lengths in samples, all positive
    pub runs: Vec<u32>,
    /// True when the first run is ink
    pub leading_ink: bool,
}

impl RunLengths {
    /// Split 0/1 samples (1 = ink) into runs
    pub fn from_samples(samples: &[u8]) -> Self {
        let mut runs = Vec::new();
        let Some(&first) = samples.first() else {
            return Self {
                runs,
                leading_ink: false,
            };
        };

        let mut current = first;
        let mut length = 0u32;
        for &s in samples {
            if s == current {
                length += 1;
            } else {
                runs.push(length);
                current = s;
                length = 1;
            }
        }
        runs.push(length);

        Self {
            runs,
            leading_ink: first != 0,
        }
    }

    /// Number of runs
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// True when there are no runs
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Polarity of run `index`
    pub fn is_ink(&self, index: usize) -> bool {
        self.leading_ink ^ (index % 2 == 1)
    }

    /// The same runs read right to left
    pub fn reversed(&self) -> Self {
        let leading_ink = if self.runs.is_empty() {
            self.leading_ink
        } else {
            self.is_ink(self.runs.len() - 1)
        };
        Self {
            runs: self.runs.iter().rev().copied().collect(),
            leading_ink,
        }
    }

    /// Samples per module from the distribution of short runs
    ///
    /// Median of the `max(3, n / 5)` smallest runs, clamped to
    /// [`ModuleWidth::MIN`, `ModuleWidth::MAX`].
    pub fn estimate_module(&self) -> Option<ModuleWidth> {
        if self.runs.is_empty() {
            return None;
        }
        let mut sorted: Vec<u32> = self.runs.iter().copied().filter(|&r| r > 0).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_unstable();

        let take = (sorted.len() / 5).max(3).min(sorted.len());
        let smallest = &sorted[..take];
        let mid = take / 2;
        let median = if take % 2 == 0 {
            (smallest[mid - 1] + smallest[mid]) as f64 / 2.0
        } else {
            smallest[mid] as f64
        };

        Some(ModuleWidth::new(median))
    }
}

/// Estimated samples per module
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleWidth(f64);

impl ModuleWidth {
    /// Smallest accepted estimate
    pub const MIN: f64 = 0.7;
    /// Largest accepted estimate
    pub const MAX: f64 = 5.0;

    const UNIT_LOW: f64 = 0.4;
    const UNIT_HIGH: f64 = 2.6;

    /// Clamp a raw estimate into the accepted range
    pub fn new(samples: f64) -> Self {
        Self(samples.clamp(Self::MIN, Self::MAX))
    }

    /// Samples per module
    pub fn samples(&self) -> f64 {
        self.0
    }

    /// Whether a run is plausibly one module wide
    pub fn is_unit(&self, run: u32) -> bool {
        let ratio = run as f64 / self.0;
        ratio > Self::UNIT_LOW && ratio < Self::UNIT_HIGH
    }

    /// Whether every run of a guard is plausibly one module wide
    pub fn is_guard(&self, runs: &[u32]) -> bool {
        runs.iter().all(|&r| self.is_unit(r))
    }
}
