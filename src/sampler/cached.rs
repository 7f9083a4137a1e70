use super::Sampler;
use crate::arbitrary::Arb;
use crate::arbitrary::Pick;
use std::collections::HashMap;

/// memoizes sample sequences by arbitrary identity. the first request
/// for an arbitrary materializes its sequence; later requests return a
/// prefix, extending the tail from the layer below when a longer run
/// is asked for. the cache is owned by one exploration run and dies
/// with it, so identical quantifiers see identical inputs within a run
/// without leaking picks across runs.
pub struct CachedSampler {
    inner: Box<dyn Sampler>,
    plain: HashMap<usize, Vec<Pick>>,
    biased: HashMap<usize, Vec<Pick>>,
}

impl CachedSampler {
    pub fn new(inner: Box<dyn Sampler>) -> Self {
        Self {
            inner,
            plain: HashMap::new(),
            biased: HashMap::new(),
        }
    }

    fn fetch(
        cache: &mut HashMap<usize, Vec<Pick>>,
        inner: &mut Box<dyn Sampler>,
        arb: &Arb,
        n: usize,
        bias: bool,
    ) -> Vec<Pick> {
        let cached = cache.entry(arb.identity()).or_default();
        if cached.len() < n {
            let missing = n - cached.len();
            let tail = match bias {
                // the corner prefix is already cached; extend uniformly
                true if !cached.is_empty() => inner.sample(arb, missing),
                true => inner.sample_with_bias(arb, missing),
                false => inner.sample(arb, missing),
            };
            if tail.is_empty() {
                return cached.clone();
            }
            cached.extend(tail);
        }
        cached[..n.min(cached.len())].to_vec()
    }
}

impl Sampler for CachedSampler {
    fn sample(&mut self, arb: &Arb, n: usize) -> Vec<Pick> {
        Self::fetch(&mut self.plain, &mut self.inner, arb, n, false)
    }
    fn sample_with_bias(&mut self, arb: &Arb, n: usize) -> Vec<Pick> {
        Self::fetch(&mut self.biased, &mut self.inner, arb, n, true)
    }
}
