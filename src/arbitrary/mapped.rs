use super::Arb;
use super::Arbitrary;
use super::Pick;
use super::Size;
use crate::sampler::Generator;
use crate::value::Value;
use std::rc::Rc;

/// values of a base arbitrary transformed by a pure function. the
/// base's primitive passes through `original` unchanged, so round
/// trips re-check the base rather than trying to invert `f`. size is
/// the base's size, an upper bound when `f` is not injective.
#[derive(Clone)]
pub struct Mapped {
    base: Arb,
    f: Rc<dyn Fn(&Value) -> Value>,
}

impl Mapped {
    pub fn new(base: Arb, f: Rc<dyn Fn(&Value) -> Value>) -> Self {
        Self { base, f }
    }

    fn apply(&self, pick: Pick) -> Pick {
        Pick {
            value: (self.f)(&pick.value),
            original: pick.original,
            index: pick.index,
        }
    }
}

impl Arbitrary for Mapped {
    fn label(&self) -> String {
        format!("map({})", self.base.label())
    }

    fn size(&self) -> Size {
        self.base.size()
    }

    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        self.base.pick(rng).map(|p| self.apply(p))
    }

    fn corner_cases(&self) -> Vec<Pick> {
        self.base
            .corner_cases()
            .into_iter()
            .map(|p| self.apply(p))
            .collect()
    }

    /// shrink the base, re-apply the map
    fn shrink(&self, around: &Pick) -> Arb {
        self.base.shrink(&around.unmapped()).map_rc(self.f.clone())
    }

    /// conservative: the base is checked against the preserved
    /// primitive, not against an inverse of `f`
    fn can_generate(&self, pick: &Pick) -> bool {
        self.base.can_generate(&pick.unmapped())
    }

    fn index_of(&self, pick: &Pick, depth: usize) -> Option<u128> {
        self.base.index_at(&pick.unmapped(), depth)
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
    fn original_passes_through_unchanged() {
        let arb = factory::integer(0, 10).map(|v| Value::Int(v.int() * 2));
        let ref mut rng = Generator::from_seed(17);
        for _ in 0..50 {
            let pick = arb.pick(rng).unwrap();
            assert!(pick.value.int() == pick.original.int() * 2);
            assert!(arb.can_generate(&pick));
        }
    }

    #[test]
    fn shrink_happens_in_base_terms() {
        let arb = factory::integer(0, 100).map(|v| Value::Int(v.int() + 1000));
        let ref mut rng = Generator::from_seed(17);
        let pick = Pick {
            value: Value::Int(1050),
            original: Value::Int(50),
            index: Some(50),
        };
        let shrunk = arb.shrink(&pick);
        for smaller in shrunk.sample(20, rng) {
            let v = smaller.value.int();
            assert!((1000..1050).contains(&v));
        }
    }

    #[test]
    fn size_matches_base_even_for_non_injective_maps() {
        let arb = factory::integer(0, 99).map(|_| Value::Int(0));
        assert!(arb.size() == Size::Exact(100));
    }
}
