use crate::arbitrary::Pick;
use crate::explorer::harness::Harness;
use crate::explorer::harness::Quantifier;
use crate::explorer::outcome::CaseVerdict;
use crate::sampler::Sampler;
use crate::stats::context::Context;
use std::collections::BTreeMap;
use std::time::Instant;

/// budgeted per-quantifier minimization. given a record whose leaf
/// verdict matched `desired` (Fails for counterexamples, Holds for
/// witnesses), walk the quantifiers in declared order, ask each
/// arbitrary for a shrunk domain around its current value, and keep
/// any candidate that preserves the verdict. restart from the first
/// quantifier after every accepted candidate; stop when a full pass
/// makes no progress or a budget runs out.
///
/// a discarded candidate is not progress; a candidate that panics
/// with anything but a precondition failure is a perfectly good
/// shrunk counterexample, which the harness already encodes as Fails.
pub struct Shrinker<'a> {
    pub(crate) harness: &'a Harness,
    pub(crate) quantifiers: Vec<Quantifier>,
    pub(crate) desired: CaseVerdict,
    pub(crate) max_attempts: usize,
    pub(crate) max_rounds: usize,
    pub(crate) per_round: usize,
    pub(crate) deadline: Option<Instant>,
}

/// what minimization settled on, and what it cost
pub struct Shrunk {
    pub record: BTreeMap<String, Pick>,
    pub attempts: usize,
    pub rounds: usize,
}

impl Shrinker<'_> {
    pub fn minimize(
        &self,
        start: BTreeMap<String, Pick>,
        sampler: &mut dyn Sampler,
        context: &mut Context,
    ) -> Shrunk {
        let mut current = start;
        let mut attempts = 0;
        let mut rounds = 0;
        'search: while rounds < self.max_rounds && attempts < self.max_attempts {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    break;
                }
            }
            let mut progressed = false;
            for quantifier in self.quantifiers.iter() {
                let Some(around) = current.get(&quantifier.name) else {
                    continue;
                };
                let smaller = quantifier.arb.shrink(around);
                if smaller.is_never() {
                    continue;
                }
                let budget = self
                    .per_round
                    .min(self.max_attempts.saturating_sub(attempts));
                // corner-first candidates walk straight at the
                // boundary the failure sits on
                let candidates = sampler.sample_with_bias(&smaller, budget);
                for candidate in candidates {
                    if attempts >= self.max_attempts {
                        break 'search;
                    }
                    attempts += 1;
                    if candidate.is_none() {
                        continue;
                    }
                    let mut test = current.clone();
                    test.insert(quantifier.name.clone(), candidate);
                    if self.harness.evaluate(&test, context) == self.desired {
                        log::trace!(
                            "shrink accepted {} = {}",
                            quantifier.name,
                            test[&quantifier.name]
                        );
                        current = test;
                        progressed = true;
                        rounds += 1;
                        continue 'search;
                    }
                }
            }
            if !progressed {
                break;
            }
        }
        Shrunk {
            record: current,
            attempts,
            rounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary;
    use crate::explorer::harness::Setup;
    use crate::sampler::BiasedSampler;
    use crate::sampler::CachedSampler;
    use crate::sampler::Generator;
    use crate::sampler::RandomSampler;
    use crate::scenario::Bindings;
    use crate::scenario::Kind;
    use crate::value::Value;
    use std::rc::Rc;

    fn sampler(seed: crate::Seed) -> Box<dyn Sampler> {
        let random = RandomSampler::new(Generator::from_seed(seed));
        let biased = BiasedSampler::new(Box::new(random), vec![]);
        Box::new(CachedSampler::new(Box::new(biased)))
    }

    fn harness(predicate: impl Fn(&Bindings) -> bool + 'static) -> Harness {
        Harness {
            setup: Vec::new(),
            asserts: vec![Rc::new(predicate)],
        }
    }

    fn record(pairs: &[(&str, i64)]) -> BTreeMap<String, Pick> {
        pairs
            .iter()
            .map(|(name, v)| (name.to_string(), Pick::primitive(Value::Int(*v))))
            .collect()
    }

    fn shrinker<'a>(
        harness: &'a Harness,
        quantifiers: Vec<Quantifier>,
        desired: CaseVerdict,
    ) -> Shrinker<'a> {
        Shrinker {
            harness,
            quantifiers,
            desired,
            max_attempts: crate::DEFAULT_SHRINK_ATTEMPTS,
            max_rounds: crate::DEFAULT_SHRINK_ROUNDS,
            per_round: crate::SHRINK_CANDIDATES_PER_ROUND,
            deadline: None,
        }
    }

    fn forall(name: &str, lo: i64, hi: i64) -> Quantifier {
        Quantifier {
            name: name.to_string(),
            kind: Kind::Universal,
            arb: arbitrary::integer(lo, hi),
        }
    }

    #[test]
    fn counterexamples_land_on_the_failing_boundary() {
        let h = harness(|b| b.int("x") <= 50);
        let s = shrinker(&h, vec![forall("x", 1, 100)], CaseVerdict::Fails);
        let shrunk = s.minimize(record(&[("x", 100)]), sampler(1).as_mut(), &mut Context::default());
        assert!(shrunk.record["x"].value.int() == 51);
        assert!(shrunk.attempts > 0);
    }

    #[test]
    fn multiple_quantifiers_shrink_in_declared_order() {
        let h = harness(|b| b.int("a") + b.int("b") <= 10);
        let s = shrinker(
            &h,
            vec![forall("a", 0, 100), forall("b", 0, 100)],
            CaseVerdict::Fails,
        );
        let shrunk = s.minimize(
            record(&[("a", 80), ("b", 90)]),
            sampler(2).as_mut(),
            &mut Context::default(),
        );
        let a = shrunk.record["a"].value.int();
        let b = shrunk.record["b"].value.int();
        assert!(a + b > 10);
        assert!(a + b < 80 + 90);
    }

    #[test]
    fn already_minimal_records_cost_nothing() {
        let h = harness(|_| false);
        let s = shrinker(&h, vec![forall("x", 0, 100)], CaseVerdict::Fails);
        let shrunk = s.minimize(record(&[("x", 0)]), sampler(3).as_mut(), &mut Context::default());
        assert!(shrunk.record["x"].value.int() == 0);
        assert!(shrunk.rounds == 0);
    }

    #[test]
    fn budgets_cap_the_search() {
        let h = harness(|b| b.int("x") < 0);
        let mut s = shrinker(&h, vec![forall("x", 0, 1_000_000)], CaseVerdict::Fails);
        s.max_attempts = 10;
        let shrunk = s.minimize(
            record(&[("x", 1_000_000)]),
            sampler(4).as_mut(),
            &mut Context::default(),
        );
        assert!(shrunk.attempts <= 10);
        // still a counterexample, just not fully minimized
        assert!(shrunk.record["x"].value.int() >= 0);
    }

    #[test]
    fn discarded_candidates_are_not_progress() {
        let h = Harness {
            setup: vec![Setup::Effect(Rc::new(|b: &mut Bindings| {
                crate::explorer::outcome::pre(b.int("x") % 2 == 0);
            }))],
            asserts: vec![Rc::new(|b: &Bindings| b.int("x") <= 50)],
        };
        let s = shrinker(&h, vec![forall("x", 0, 100)], CaseVerdict::Fails);
        let shrunk = s.minimize(record(&[("x", 100)]), sampler(5).as_mut(), &mut Context::default());
        let x = shrunk.record["x"].value.int();
        assert!(x > 50);
        assert!(x % 2 == 0);
    }

    #[test]
    fn witnesses_shrink_while_still_passing() {
        let h = harness(|b| b.int("x") % 3 == 0);
        let s = shrinker(
            &h,
            vec![Quantifier {
                name: "x".to_string(),
                kind: Kind::Existential,
                arb: arbitrary::integer(0, 999),
            }],
            CaseVerdict::Holds,
        );
        let shrunk = s.minimize(record(&[("x", 900)]), sampler(6).as_mut(), &mut Context::default());
        assert!(shrunk.record["x"].value.int() == 0);
    }
}
