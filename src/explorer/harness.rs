use super::outcome::CaseVerdict;
use super::outcome::PreconditionFailure;
use crate::arbitrary::Arb;
use crate::arbitrary::Pick;
use crate::scenario::Bindings;
use crate::scenario::Kind;
use crate::stats::context;
use crate::stats::context::Context;
use crate::value::Value;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::rc::Rc;

/// one bound variable of the scenario
#[derive(Clone)]
pub struct Quantifier {
    pub name: String,
    pub kind: Kind,
    pub arb: Arb,
}

/// a setup step to materialize before the assertion, in declared order
#[derive(Clone)]
pub enum Setup {
    Constant(String, Value),
    Factory(String, Rc<dyn Fn() -> Value>),
    Effect(Rc<dyn Fn(&mut Bindings)>),
}

/// the leaf of the scenario: givens, whens, and the assertion
/// conjunction. both the explorer and the shrinker evaluate test
/// cases through this one function, so they cannot disagree on what
/// a case means.
pub struct Harness {
    pub setup: Vec<Setup>,
    pub asserts: Vec<Rc<dyn Fn(&Bindings) -> bool>>,
}

impl Harness {
    /// materialize one test case over the quantifier-bound picks and
    /// say whether it held, failed, or was discarded
    pub fn evaluate(&self, record: &BTreeMap<String, Pick>, context: &mut Context) -> CaseVerdict {
        context.begin_case();
        let mut bindings = record
            .iter()
            .map(|(name, pick)| (name.clone(), pick.value.clone()))
            .collect::<Bindings>();
        for step in self.setup.iter() {
            match step {
                Setup::Constant(name, value) => bindings.set(name, value.clone()),
                Setup::Factory(name, factory) => {
                    match catch_unwind(AssertUnwindSafe(|| factory())) {
                        Ok(value) => bindings.set(name, value),
                        Err(_) => {
                            log::debug!("given factory for {:?} panicked; discarding", name);
                            return CaseVerdict::Discarded;
                        }
                    }
                }
                Setup::Effect(effect) => {
                    let unwound = catch_unwind(AssertUnwindSafe(|| effect(&mut bindings)));
                    if let Err(payload) = unwound {
                        return match payload.downcast::<PreconditionFailure>() {
                            Ok(_) => CaseVerdict::Discarded,
                            Err(_) => CaseVerdict::Fails,
                        };
                    }
                }
            }
        }
        // the statistics context is ambient only while the predicate
        // runs; catch_unwind guarantees it is reclaimed on every exit
        context::install(std::mem::take(context));
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.asserts.iter().all(|predicate| predicate(&bindings))
        }));
        *context = context::take();
        match outcome {
            Ok(true) => CaseVerdict::Holds,
            Ok(false) => CaseVerdict::Fails,
            Err(payload) => match payload.downcast::<PreconditionFailure>() {
                Ok(failure) => {
                    log::trace!("discarded: {}", failure.message);
                    CaseVerdict::Discarded
                }
                Err(_) => CaseVerdict::Fails,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary;
    use crate::explorer::outcome::pre;

    fn record_of(name: &str, value: i64) -> BTreeMap<String, Pick> {
        let mut record = BTreeMap::new();
        record.insert(name.to_string(), Pick::primitive(Value::Int(value)));
        record
    }

    fn harness(setup: Vec<Setup>, predicate: impl Fn(&Bindings) -> bool + 'static) -> Harness {
        Harness {
            setup,
            asserts: vec![Rc::new(predicate)],
        }
    }

    #[test]
    fn verdicts_follow_the_predicate() {
        let h = harness(vec![], |b| b.int("x") > 0);
        let ref mut context = Context::default();
        assert!(h.evaluate(&record_of("x", 5), context) == CaseVerdict::Holds);
        assert!(h.evaluate(&record_of("x", -5), context) == CaseVerdict::Fails);
    }

    #[test]
    fn preconditions_discard_and_panics_fail() {
        let h = harness(vec![], |b| {
            pre(b.int("x") % 2 == 0);
            b.int("x") < 10
        });
        let ref mut context = Context::default();
        assert!(h.evaluate(&record_of("x", 3), context) == CaseVerdict::Discarded);
        assert!(h.evaluate(&record_of("x", 4), context) == CaseVerdict::Holds);
        let exploding = harness(vec![], |_| panic!("sut exploded"));
        assert!(exploding.evaluate(&record_of("x", 0), context) == CaseVerdict::Fails);
    }

    #[test]
    fn setup_materializes_in_declared_order() {
        let h = harness(
            vec![
                Setup::Constant("base".into(), Value::Int(100)),
                Setup::Effect(Rc::new(|b: &mut Bindings| {
                    let sum = b.int("base") + b.int("x");
                    b.set("sum", Value::Int(sum));
                })),
            ],
            |b| b.int("sum") == 105,
        );
        let ref mut context = Context::default();
        assert!(h.evaluate(&record_of("x", 5), context) == CaseVerdict::Holds);
    }

    #[test]
    fn panicking_factories_discard_the_case() {
        let h = harness(
            vec![Setup::Factory("r".into(), Rc::new(|| panic!("resource down")))],
            |_| true,
        );
        let ref mut context = Context::default();
        assert!(h.evaluate(&record_of("x", 1), context) == CaseVerdict::Discarded);
    }

    #[test]
    fn quantifier_smoke() {
        let q = Quantifier {
            name: "n".into(),
            kind: Kind::Universal,
            arb: arbitrary::integer(0, 1),
        };
        assert!(q.kind == Kind::Universal);
    }
}
