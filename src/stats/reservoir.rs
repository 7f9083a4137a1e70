use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// capped reservoir for approximate quantiles. the first `capacity`
/// observations are kept verbatim; later ones replace a uniformly
/// chosen slot with probability capacity/seen, so the reservoir stays
/// a uniform sample of the stream.
#[derive(Debug, Clone)]
pub struct Reservoir {
    capacity: usize,
    seen: usize,
    values: Vec<f64>,
    rng: SmallRng,
}

impl Reservoir {
    pub fn new(seed: crate::Seed) -> Self {
        Self::with_capacity(crate::RESERVOIR_CAPACITY, seed)
    }
    pub fn with_capacity(capacity: usize, seed: crate::Seed) -> Self {
        Self {
            capacity,
            seen: 0,
            values: Vec::with_capacity(capacity),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn witness(&mut self, x: f64) {
        self.seen += 1;
        if self.values.len() < self.capacity {
            self.values.push(x);
        } else {
            let slot = self.rng.random_range(0..self.seen);
            if slot < self.capacity {
                self.values[slot] = x;
            }
        }
    }

    pub fn seen(&self) -> usize {
        self.seen
    }

    /// exact quantile of the reservoir, an approximation of the stream's
    pub fn quantile(&self, q: f64) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let mut sorted = self.values.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let rank = (q * (sorted.len() - 1) as f64).round() as usize;
        Some(sorted[rank.min(sorted.len() - 1)])
    }

    pub fn quartiles(&self) -> Option<(f64, f64, f64)> {
        Some((
            self.quantile(0.25)?,
            self.quantile(0.50)?,
            self.quantile(0.75)?,
        ))
    }
}
