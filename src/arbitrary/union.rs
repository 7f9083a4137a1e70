use super::Arb;
use super::Arbitrary;
use super::Pick;
use super::Size;
use super::factory;
use crate::sampler::Generator;

/// a disjoint union of alternatives. picking selects a child with
/// probability proportional to its size, so a union of a 10-value and
/// a 1000-value arbitrary stays roughly uniform over the combined
/// domain; indexing offsets each child by the sizes before it.
#[derive(Debug, Clone)]
pub struct Union {
    children: Vec<Arb>,
}

impl Union {
    pub fn new(children: Vec<Arb>) -> Self {
        assert!(!children.is_empty(), "union needs at least one alternative");
        Self { children }
    }

    fn owner(&self, pick: &Pick) -> Option<usize> {
        self.children.iter().position(|c| c.can_generate(pick))
    }
}

impl Arbitrary for Union {
    fn label(&self) -> String {
        let inner = self.children.iter().map(|a| a.label()).collect::<Vec<_>>();
        format!("union({})", inner.join(" | "))
    }

    fn size(&self) -> Size {
        Size::sum(self.children.iter().map(|c| c.size()))
    }

    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        let weights = self
            .children
            .iter()
            .map(|c| c.size().value() as f64)
            .collect::<Vec<_>>();
        let total = weights.iter().sum::<f64>();
        if total <= 0. {
            return None;
        }
        let mut roll = rng.unit() * total;
        for (child, weight) in self.children.iter().zip(weights) {
            roll -= weight;
            if roll < 0. {
                return child.pick(rng);
            }
        }
        self.children.last().expect("nonempty").pick(rng)
    }

    fn corner_cases(&self) -> Vec<Pick> {
        self.children
            .iter()
            .flat_map(|c| c.corner_cases())
            .collect()
    }

    /// delegate to whichever alternative owns the pick
    fn shrink(&self, around: &Pick) -> Arb {
        match self.owner(around) {
            Some(i) => self.children[i].shrink(around),
            None => factory::empty(),
        }
    }

    fn can_generate(&self, pick: &Pick) -> bool {
        self.children.iter().any(|c| c.can_generate(pick))
    }

    fn index_of(&self, pick: &Pick, depth: usize) -> Option<u128> {
        let owner = self.owner(pick)?;
        let offset = self.children[..owner]
            .iter()
            .fold(0u128, |acc, c| acc.saturating_add(c.size().value()));
        let inner = self.children[owner].index_at(pick, depth)?;
        Some(offset.saturating_add(inner))
    }

    fn reset(&self) {
        for child in self.children.iter() {
            child.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn size_sums_alternatives() {
        let arb = Union::new(vec![factory::integer(0, 9), factory::integer(100, 109)]);
        assert!(arb.size() == Size::Exact(20));
    }

    #[test]
    fn picks_come_from_some_alternative() {
        let arb = Union::new(vec![factory::integer(0, 9), factory::integer(100, 109)]);
        let ref mut rng = Generator::from_seed(21);
        for _ in 0..100 {
            let pick = arb.pick(rng).unwrap();
            assert!(arb.can_generate(&pick));
        }
    }

    #[test]
    fn index_offsets_by_preceding_children() {
        let arb = Union::new(vec![factory::integer(0, 9), factory::integer(100, 109)]);
        let second = Pick::primitive(Value::Int(105));
        assert!(arb.index_of(&second, 0) == Some(15));
        let first = Pick::primitive(Value::Int(5));
        assert!(arb.index_of(&first, 0) == Some(5));
    }

    #[test]
    fn shrink_stays_within_the_owning_alternative() {
        let arb = Union::new(vec![factory::integer(0, 9), factory::integer(100, 109)]);
        let shrunk = arb.shrink(&Pick::primitive(Value::Int(107)));
        assert!(shrunk.can_generate(&Pick::primitive(Value::Int(103))));
        assert!(!shrunk.can_generate(&Pick::primitive(Value::Int(5))));
    }
}
