/// fixed-bin histogram over a stream of reals.
///
/// the span is unknown up front, so the first HISTOGRAM_WARMUP
/// observations are buffered; once warmup completes the span is
/// frozen from the running min/max and the buffer is re-binned.
/// later observations outside the span clamp into the edge bins.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Histogram {
    bins: Vec<usize>,
    lo: f64,
    hi: f64,
    frozen: bool,
    warmup: Vec<f64>,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::with_bins(crate::HISTOGRAM_BINS)
    }
}

impl Histogram {
    pub fn with_bins(bins: usize) -> Self {
        Self {
            bins: vec![0; bins.max(1)],
            lo: 0.,
            hi: 0.,
            frozen: false,
            warmup: Vec::with_capacity(crate::HISTOGRAM_WARMUP),
        }
    }

    pub fn witness(&mut self, x: f64) {
        if !x.is_finite() {
            return;
        }
        if self.frozen {
            let bin = self.bin(x);
            self.bins[bin] += 1;
        } else {
            self.warmup.push(x);
            if self.warmup.len() >= crate::HISTOGRAM_WARMUP {
                self.freeze();
            }
        }
    }

    /// one-time re-bin after warmup
    fn freeze(&mut self) {
        let lo = self.warmup.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = self.warmup.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        self.lo = lo;
        self.hi = if hi > lo { hi } else { lo + 1. };
        self.frozen = true;
        for x in std::mem::take(&mut self.warmup) {
            let bin = self.bin(x);
            self.bins[bin] += 1;
        }
    }

    fn bin(&self, x: f64) -> usize {
        let fraction = (x - self.lo) / (self.hi - self.lo);
        let bin = (fraction * self.bins.len() as f64).floor() as isize;
        bin.clamp(0, self.bins.len() as isize - 1) as usize
    }

    pub fn counts(&self) -> Vec<usize> {
        match self.frozen {
            true => self.bins.clone(),
            false => {
                let mut this = self.clone();
                if !this.warmup.is_empty() {
                    this.freeze();
                }
                this.bins
            }
        }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().sum::<usize>() + self.warmup.len()
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lo, self.hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebins_after_warmup() {
        let mut histogram = Histogram::with_bins(10);
        for x in 0..crate::HISTOGRAM_WARMUP {
            histogram.witness(x as f64);
        }
        assert!(histogram.frozen);
        assert!(histogram.total() == crate::HISTOGRAM_WARMUP);
        assert!(histogram.counts().iter().sum::<usize>() == crate::HISTOGRAM_WARMUP);
    }

    #[test]
    fn clamps_outliers_into_edge_bins() {
        let mut histogram = Histogram::with_bins(4);
        for x in 0..crate::HISTOGRAM_WARMUP {
            histogram.witness((x % 10) as f64);
        }
        histogram.witness(-1e9);
        histogram.witness(1e9);
        let counts = histogram.counts();
        assert!(counts.iter().sum::<usize>() == crate::HISTOGRAM_WARMUP + 2);
    }

    #[test]
    fn ignores_non_finite() {
        let mut histogram = Histogram::default();
        histogram.witness(f64::NAN);
        histogram.witness(f64::INFINITY);
        assert!(histogram.total() == 0);
    }
}
