use super::Arb;
use super::Arbitrary;
use super::Pick;
use super::Size;
use super::factory;
use crate::sampler::Generator;
use crate::value::Value;
use std::rc::Rc;

/// dependent generation: draw x from the base, then draw the result
/// from k(x). the pick's original carries both layers' primitives so
/// round trips can rebuild the second arbitrary from the first draw.
#[derive(Clone)]
pub struct Chained {
    base: Arb,
    k: Rc<dyn Fn(&Value) -> Arb>,
}

impl Chained {
    pub fn new(base: Arb, k: Rc<dyn Fn(&Value) -> Arb>) -> Self {
        Self { base, k }
    }

    fn layers(&self, pick: &Pick) -> Option<(Pick, Pick)> {
        match &pick.original {
            Value::List(parts) if parts.len() == 2 => {
                let first = Pick::primitive(parts[0].clone());
                let second = Pick::new(pick.value.clone(), parts[1].clone());
                Some((first, second))
            }
            _ => None,
        }
    }
}

impl Arbitrary for Chained {
    fn label(&self) -> String {
        format!("chain({})", self.base.label())
    }

    /// the dependent layer's size varies with the draw; a fixed-seed
    /// probe averages it into a rough, explicitly estimated bound
    fn size(&self) -> Size {
        let ref mut rng = Generator::from_seed(crate::SIZE_PROBE_SEED);
        let probes = 10;
        let mut total = 0u128;
        for _ in 0..probes {
            if let Some(first) = self.base.pick(rng) {
                total = total.saturating_add((self.k)(&first.value).size().value());
            }
        }
        let value = self
            .base
            .size()
            .value()
            .saturating_mul(total / probes.max(1));
        Size::degenerate(value)
    }

    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        let first = self.base.pick(rng)?;
        let second = (self.k)(&first.value).pick(rng)?;
        Some(Pick::new(
            second.value,
            Value::List(vec![first.original, second.original]),
        ))
    }

    fn corner_cases(&self) -> Vec<Pick> {
        let mut corners = Vec::new();
        for first in self.base.corner_cases() {
            for second in (self.k)(&first.value).corner_cases() {
                corners.push(Pick::new(
                    second.value,
                    Value::List(vec![first.original.clone(), second.original]),
                ));
                if corners.len() >= crate::MAX_CORNER_PRODUCT {
                    return corners;
                }
            }
        }
        corners
    }

    /// pin the first draw, shrink within the arbitrary it selected
    fn shrink(&self, around: &Pick) -> Arb {
        let (first, second) = match self.layers(around) {
            Some(layers) => layers,
            None => return factory::empty(),
        };
        let smaller = (self.k)(&first.value).shrink(&second);
        if smaller.is_never() {
            return factory::empty();
        }
        factory::constant(first.value.clone()).chain_rc(Rc::new(move |_| smaller.clone()))
    }

    /// both layers must accept; the first is rebuilt from the
    /// preserved primitive, with the documented conservatism
    fn can_generate(&self, pick: &Pick) -> bool {
        match self.layers(pick) {
            Some((first, second)) => {
                self.base.can_generate(&first) && (self.k)(&first.value).can_generate(&second)
            }
            None => false,
        }
    }

    fn reset(&self) {
        self.base.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_layer_depends_on_the_first() {
        // a length, then a list of exactly that length
        let arb = factory::integer(1, 5).chain(|n| {
            factory::array(factory::integer(0, 9), n.int() as usize, n.int() as usize)
        });
        let ref mut rng = Generator::from_seed(31);
        for _ in 0..50 {
            let pick = arb.pick(rng).unwrap();
            let len = pick.value.list().len();
            assert!((1..=5).contains(&len));
            assert!(arb.can_generate(&pick));
        }
    }

    #[test]
    fn can_generate_requires_both_layers() {
        let arb = factory::integer(1, 3).chain(|n| factory::integer(0, n.int() * 10));
        let good = Pick::new(
            Value::Int(15),
            Value::List(vec![Value::Int(2), Value::Int(15)]),
        );
        assert!(arb.can_generate(&good));
        let bad_first = Pick::new(
            Value::Int(15),
            Value::List(vec![Value::Int(9), Value::Int(15)]),
        );
        assert!(!arb.can_generate(&bad_first));
        let bad_second = Pick::new(
            Value::Int(25),
            Value::List(vec![Value::Int(2), Value::Int(25)]),
        );
        assert!(!arb.can_generate(&bad_second));
    }

    #[test]
    fn shrink_pins_the_first_draw() {
        let arb = factory::integer(1, 3).chain(|n| factory::integer(0, n.int() * 10));
        let pick = Pick::new(
            Value::Int(15),
            Value::List(vec![Value::Int(2), Value::Int(15)]),
        );
        let ref mut rng = Generator::from_seed(2);
        for smaller in arb.shrink(&pick).sample(20, rng) {
            assert!(smaller.value.int() < 15);
            assert!(smaller.value.int() >= 0);
        }
    }
}
