//! Fixed-bin histograms and histogram distances

/// Histogram with a fixed number of floating point bins
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    bins: Vec<f64>,
}

impl Histogram {
    /// Histogram with `bins` empty bins
    pub fn zeros(bins: usize) -> Self {
        Self {
            bins: vec![0.0; bins],
        }
    }

    /// Histogram from raw bin values
    pub const fn from_bins(bins: Vec<f64>) -> Self {
        Self { bins }
    }

    /// Bin samples uniformly over `[min, max]`
    ///
    /// Samples outside the range are clamped into the end bins when
    /// `allow_outside` is set and dropped otherwise. A degenerate range puts
    /// every accepted sample into the first bin.
    pub fn from_samples(
        samples: &[f64],
        bins: usize,
        min: f64,
        max: f64,
        allow_outside: bool,
    ) -> Self {
        let mut histogram = Self::zeros(bins);
        if bins == 0 {
            return histogram;
        }
        let range = max - min;
        for &value in samples {
            if !value.is_finite() {
                continue;
            }
            let outside = value < min || value > max;
            if outside && !allow_outside {
                continue;
            }
            let bin = if range <= f64::EPSILON {
                0
            } else {
                let position = ((value - min) / range).clamp(0.0, 1.0);
                ((position * bins as f64) as usize).min(bins - 1)
            };
            histogram.increment(bin);
        }
        histogram
    }

    /// Bin values
    pub fn bins(&self) -> &[f64] {
        &self.bins
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// True when the histogram has no bins
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Sum over all bins
    pub fn total(&self) -> f64 {
        self.bins.iter().sum()
    }

    /// Add one count to a bin; out-of-range bins are ignored
    pub fn increment(&mut self, bin: usize) {
        if let Some(count) = self.bins.get_mut(bin) {
            *count += 1.0;
        }
    }

    /// Scale bins so they sum to one; an empty histogram stays all zero
    pub fn normalize(&mut self) {
        let total = self.total();
        if total > 0.0 {
            for count in &mut self.bins {
                *count /= total;
            }
        }
    }

    /// Normalized copy
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Concatenate another histogram's bins after this one's
    pub fn append(&mut self, other: &Self) {
        self.bins.extend_from_slice(&other.bins);
    }

    /// L1 distance; bins missing from the shorter histogram count as zero
    pub fn difference(&self, other: &Self) -> f64 {
        let len = self.len().max(other.len());
        (0..len)
            .map(|i| {
                let a = self.bins.get(i).copied().unwrap_or(0.0);
                let b = other.bins.get(i).copied().unwrap_or(0.0);
                (a - b).abs()
            })
            .sum()
    }
}
