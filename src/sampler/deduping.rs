use super::Sampler;
use crate::arbitrary::Arb;
use crate::arbitrary::Pick;
use std::collections::HashSet;

/// guarantees all returned values are distinct within one call.
/// requests grow geometrically against the layer below until either
/// n distinct values are in hand or the retry budget runs out, at
/// which point fewer than n are returned.
pub struct DedupingSampler {
    inner: Box<dyn Sampler>,
}

impl DedupingSampler {
    pub fn new(inner: Box<dyn Sampler>) -> Self {
        Self { inner }
    }

    fn distinct(&mut self, arb: &Arb, n: usize, bias: bool) -> Vec<Pick> {
        let budget = n * crate::UNIQUE_RETRY_FACTOR;
        let mut seen = HashSet::new();
        let mut picks = Vec::with_capacity(n);
        let mut request = n;
        while picks.len() < n && request <= budget {
            let batch = match bias {
                true => self.inner.sample_with_bias(arb, request),
                false => self.inner.sample(arb, request),
            };
            if batch.is_empty() {
                break;
            }
            let short = batch.len() < request;
            for pick in batch {
                if picks.len() == n {
                    break;
                }
                if !pick.is_none() && seen.insert(pick.value.fingerprint()) {
                    picks.push(pick);
                }
            }
            if short && picks.len() < n {
                // the layer below is exhausted; no point asking for more
                break;
            }
            request *= 2;
        }
        picks
    }
}

impl Sampler for DedupingSampler {
    fn sample(&mut self, arb: &Arb, n: usize) -> Vec<Pick> {
        self.distinct(arb, n, false)
    }
    fn sample_with_bias(&mut self, arb: &Arb, n: usize) -> Vec<Pick> {
        self.distinct(arb, n, true)
    }
}
