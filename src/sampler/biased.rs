use super::Sampler;
use crate::arbitrary::Arb;
use crate::arbitrary::Pick;
use crate::value::Value;

/// corner cases first, then uniform fill from the layer below.
/// an explicit constant pool rides along with the corners: literals
/// the caller knows are interesting for this property get the same
/// try-first treatment, provided the arbitrary could generate them.
pub struct BiasedSampler {
    inner: Box<dyn Sampler>,
    constants: Vec<Value>,
}

impl BiasedSampler {
    pub fn new(inner: Box<dyn Sampler>, constants: Vec<Value>) -> Self {
        Self { inner, constants }
    }
}

impl Sampler for BiasedSampler {
    fn sample(&mut self, arb: &Arb, n: usize) -> Vec<Pick> {
        self.inner.sample(arb, n)
    }

    fn sample_with_bias(&mut self, arb: &Arb, n: usize) -> Vec<Pick> {
        let mut picks = arb.corner_cases();
        for constant in self.constants.iter() {
            let candidate = Pick::primitive(constant.clone());
            if arb.can_generate(&candidate) && !picks.iter().any(|p| p.value == candidate.value) {
                picks.push(candidate);
            }
        }
        picks.truncate(n);
        if picks.len() < n {
            picks.extend(self.inner.sample(arb, n - picks.len()));
        }
        picks
    }
}
