use super::Arb;
use super::Arbitrary;
use super::Pick;
use super::Size;
use super::factory;
use crate::sampler::Generator;
use crate::value::Value;

/// lists of an inner arbitrary with lengths in [min, max]. the domain
/// is the disjoint union of the fixed-length slices, which is exactly
/// how indexing works: an offset for all shorter lengths plus a
/// mixed-radix rank within the slice.
#[derive(Debug, Clone)]
pub struct Array {
    inner: Arb,
    min: usize,
    max: usize,
}

impl Array {
    pub fn new(inner: Arb, min: usize, max: usize) -> Self {
        assert!(min <= max, "array length range is empty");
        Self { inner, min, max }
    }

    /// Σ_{k=min..len-1} inner^k, the rank of the first length-len list
    fn offset(&self, len: usize) -> u128 {
        let s = self.inner.size().value();
        (self.min..len).fold(0u128, |acc, k| {
            acc.saturating_add(s.saturating_pow(k as u32))
        })
    }

    fn elements(&self, pick: &Pick) -> Option<Vec<Pick>> {
        let values = match &pick.value {
            Value::List(items) => items,
            _ => return None,
        };
        let originals = match &pick.original {
            Value::List(items) if items.len() == values.len() => items.clone(),
            _ => values.clone(),
        };
        Some(
            values
                .iter()
                .zip(originals)
                .map(|(v, o)| Pick::new(v.clone(), o))
                .collect(),
        )
    }
}

impl Arbitrary for Array {
    fn label(&self) -> String {
        format!("array({}, {}..{})", self.inner.label(), self.min, self.max)
    }

    fn size(&self) -> Size {
        let inner = self.inner.size();
        let s = inner.value();
        let total = (self.min..=self.max).fold(0u128, |acc, k| {
            acc.saturating_add(s.saturating_pow(k as u32))
        });
        match inner.is_exact() {
            true => Size::Exact(total),
            false => Size::degenerate(total),
        }
    }

    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        let len = self.min + rng.index(self.max - self.min + 1);
        let mut values = Vec::with_capacity(len);
        let mut originals = Vec::with_capacity(len);
        let mut rank = Some(0u128);
        let s = self.inner.size().value();
        for _ in 0..len {
            let element = self.inner.pick(rng)?;
            rank = match (rank, element.index) {
                (Some(acc), Some(i)) => Some(acc.saturating_mul(s).saturating_add(i)),
                _ => None,
            };
            values.push(element.value);
            originals.push(element.original);
        }
        let index = rank.map(|r| self.offset(len).saturating_add(r));
        Some(Pick {
            value: Value::List(values),
            original: Value::List(originals),
            index,
        })
    }

    /// empties, singletons of inner corners, and maxed-out lists
    fn corner_cases(&self) -> Vec<Pick> {
        let mut corners = Vec::new();
        let inner = self.inner.corner_cases();
        if self.min == 0 {
            corners.push(Pick::new(Value::List(vec![]), Value::List(vec![])));
        } else {
            for c in inner.iter() {
                corners.push(Pick::new(
                    Value::List(vec![c.value.clone(); self.min]),
                    Value::List(vec![c.original.clone(); self.min]),
                ));
            }
        }
        if self.min <= 1 && 1 <= self.max {
            for c in inner.iter() {
                corners.push(Pick::new(
                    Value::List(vec![c.value.clone()]),
                    Value::List(vec![c.original.clone()]),
                ));
            }
        }
        if self.max > 1 {
            for c in inner.iter() {
                corners.push(Pick::new(
                    Value::List(vec![c.value.clone(); self.max]),
                    Value::List(vec![c.original.clone(); self.max]),
                ));
            }
        }
        corners
    }

    /// collections shrink toward empty, one length at a time
    fn shrink(&self, around: &Pick) -> Arb {
        let len = around.value.list().len();
        match len > self.min {
            true => factory::array(self.inner.clone(), self.min, len - 1),
            false => factory::empty(),
        }
    }

    fn can_generate(&self, pick: &Pick) -> bool {
        match self.elements(pick) {
            Some(elements) => {
                (self.min..=self.max).contains(&elements.len())
                    && elements.iter().all(|e| self.inner.can_generate(e))
            }
            None => false,
        }
    }

    fn index_of(&self, pick: &Pick, depth: usize) -> Option<u128> {
        let elements = self.elements(pick)?;
        if !(self.min..=self.max).contains(&elements.len()) {
            return None;
        }
        let s = self.inner.size().value();
        let mut rank = 0u128;
        for element in elements.iter() {
            let i = self.inner.index_at(element, depth)?;
            rank = rank.saturating_mul(s).saturating_add(i);
        }
        Some(self.offset(elements.len()).saturating_add(rank))
    }

    fn reset(&self) {
        self.inner.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_sums_powers_over_lengths() {
        let arb = Array::new(factory::integer(0, 1), 0, 3);
        // 1 + 2 + 4 + 8
        assert!(arb.size() == Size::Exact(15));
    }

    #[test]
    fn degenerate_length_only_samples_empty() {
        let arb = Array::new(factory::integer(0, 9), 0, 0);
        let ref mut rng = Generator::from_seed(1);
        for _ in 0..10 {
            let pick = arb.pick(rng).unwrap();
            assert!(pick.value == Value::List(vec![]));
            assert!(pick.index == Some(0));
        }
    }

    #[test]
    fn index_is_dense_and_reproducible() {
        let arb = Array::new(factory::integer(0, 1), 0, 2);
        let ref mut rng = Generator::from_seed(8);
        for _ in 0..50 {
            let pick = arb.pick(rng).unwrap();
            assert!(arb.index_of(&pick, 0) == pick.index);
            assert!(pick.index.unwrap() < 7);
        }
    }

    #[test]
    fn shrink_drops_the_length_ceiling() {
        let arb = Array::new(factory::integer(0, 9), 0, 5);
        let pick = Pick::primitive(Value::List(vec![Value::Int(1); 3]));
        let shrunk = arb.shrink(&pick);
        assert!(shrunk.can_generate(&Pick::primitive(Value::List(vec![Value::Int(1); 2]))));
        assert!(!shrunk.can_generate(&Pick::primitive(Value::List(vec![Value::Int(1); 3]))));
        let empty = Pick::primitive(Value::List(vec![]));
        assert!(arb.shrink(&empty).is_never());
    }
}
