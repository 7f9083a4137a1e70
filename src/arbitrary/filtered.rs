use super::Arb;
use super::Arbitrary;
use super::Pick;
use super::Size;
use crate::sampler::Generator;
use crate::stats::beta::Beta;
use crate::stats::betabinomial::BetaBinomial;
use crate::value::Value;
use std::rc::Rc;

/// values of a base arbitrary that satisfy a predicate. picking
/// retries up to max_tries before giving up; the size can only be
/// estimated, so a fixed-seed probe of the base feeds a Beta-Binomial
/// posterior whose credible interval is reported alongside the
/// point estimate.
#[derive(Clone)]
pub struct Filtered {
    base: Arb,
    p: Rc<dyn Fn(&Value) -> bool>,
    max_tries: usize,
}

impl Filtered {
    pub fn new(base: Arb, p: Rc<dyn Fn(&Value) -> bool>) -> Self {
        Self {
            base,
            p,
            max_tries: crate::MAX_FILTER_TRIES,
        }
    }

    /// observed pass rate over a deterministic probe of the base
    fn probe(&self) -> (usize, usize) {
        let ref mut rng = Generator::from_seed(crate::SIZE_PROBE_SEED);
        let mut passes = 0;
        let mut fails = 0;
        for pick in self.base.sample(crate::SIZE_PROBE_SAMPLES, rng) {
            if pick.is_none() {
                continue;
            }
            match (self.p)(&pick.value) {
                true => passes += 1,
                false => fails += 1,
            }
        }
        (passes, fails)
    }
}

impl Arbitrary for Filtered {
    fn label(&self) -> String {
        format!("filter({})", self.base.label())
    }

    fn size(&self) -> Size {
        let (passes, fails) = self.probe();
        let posterior = Beta::uniform().posterior(passes, fails);
        let base = self.base.size().value();
        let value = (base as f64 * posterior.mean()) as u128;
        let interval = match base <= 10_000 {
            true => {
                let bb = BetaBinomial::new(base as u64, posterior.alpha, posterior.beta);
                (bb.inv(0.025) as f64, bb.inv(0.975) as f64)
            }
            false => (
                posterior.inv(0.025) * base as f64,
                posterior.inv(0.975) * base as f64,
            ),
        };
        Size::Estimated { value, interval }
    }

    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        for _ in 0..self.max_tries {
            if let Some(pick) = self.base.pick(rng) {
                if (self.p)(&pick.value) {
                    return Some(pick);
                }
            }
        }
        None
    }

    fn corner_cases(&self) -> Vec<Pick> {
        self.base
            .corner_cases()
            .into_iter()
            .filter(|p| (self.p)(&p.value))
            .collect()
    }

    fn shrink(&self, around: &Pick) -> Arb {
        self.base.shrink(around).filter_rc(self.p.clone())
    }

    fn can_generate(&self, pick: &Pick) -> bool {
        self.base.can_generate(pick) && (self.p)(&pick.value)
    }

    /// the position within the base's domain; holes the filter
    /// punches out are not compacted
    fn index_of(&self, pick: &Pick, depth: usize) -> Option<u128> {
        self.base.index_at(pick, depth)
    }

    fn reset(&self) {
        self.base.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::factory;

    #[test]
    fn picks_satisfy_the_predicate() {
        let arb = factory::integer(0, 100).filter(|v| v.int() % 2 == 0);
        let ref mut rng = Generator::from_seed(23);
        for _ in 0..100 {
            let pick = arb.pick(rng).unwrap();
            assert!(pick.value.int() % 2 == 0);
        }
    }

    #[test]
    fn impossible_filter_exhausts_retries() {
        let arb = factory::integer(0, 100).filter(|_| false);
        let ref mut rng = Generator::from_seed(23);
        assert!(arb.pick(rng).is_none());
        // the sample loop degrades to none-picks rather than spinning
        let picks = arb.sample(5, rng);
        assert!(picks.len() == 5);
        assert!(picks.iter().all(|p| p.is_none()));
    }

    #[test]
    fn impossible_filter_interval_includes_zero() {
        let arb = factory::integer(0, 100).filter(|_| false);
        let size = arb.size();
        assert!(!size.is_exact());
        let (lo, _) = size.interval().unwrap();
        assert!(lo == 0.);
    }

    #[test]
    fn half_filter_estimates_half_the_base() {
        let arb = factory::integer(0, 999).filter(|v| v.int() < 500);
        let size = arb.size();
        let (lo, hi) = size.interval().unwrap();
        assert!(lo <= size.value() as f64 && size.value() as f64 <= hi);
        assert!(size.value() > 300 && size.value() < 700);
    }

    #[test]
    fn shrunk_filters_keep_filtering() {
        let arb = factory::integer(0, 100).filter(|v| v.int() % 10 == 0);
        let pick = Pick::primitive(Value::Int(50));
        let shrunk = arb.shrink(&pick);
        assert!(shrunk.can_generate(&Pick::primitive(Value::Int(20))));
        assert!(!shrunk.can_generate(&Pick::primitive(Value::Int(25))));
    }
}
