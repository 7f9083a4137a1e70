use super::Generator;
use super::Sampler;
use crate::arbitrary::Arb;
use crate::arbitrary::Pick;

/// the base of every stack: draws picks straight from the arbitrary
/// with the run's generator. biased sampling is identical here; the
/// corner-case ordering is the BiasedSampler's concern.
pub struct RandomSampler {
    rng: Generator,
}

impl RandomSampler {
    pub fn new(rng: Generator) -> Self {
        Self { rng }
    }
}

impl Sampler for RandomSampler {
    fn sample(&mut self, arb: &Arb, n: usize) -> Vec<Pick> {
        arb.sample(n, &mut self.rng)
    }
    fn sample_with_bias(&mut self, arb: &Arb, n: usize) -> Vec<Pick> {
        self.sample(arb, n)
    }
}
