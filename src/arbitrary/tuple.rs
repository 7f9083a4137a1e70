use super::Arb;
use super::Arbitrary;
use super::Pick;
use super::Size;
use super::factory;
use crate::sampler::Generator;
use crate::value::Value;

/// fixed-arity products. the pick is a List of one value per
/// component; the index is the mixed-radix rank with each component's
/// size as its radix.
#[derive(Debug, Clone)]
pub struct Tuple {
    items: Vec<Arb>,
}

impl Tuple {
    pub fn new(items: Vec<Arb>) -> Self {
        assert!(!items.is_empty(), "tuple needs at least one component");
        Self { items }
    }

    fn components(&self, pick: &Pick) -> Option<Vec<Pick>> {
        let values = match &pick.value {
            Value::List(items) if items.len() == self.items.len() => items,
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

impl Arbitrary for Tuple {
    fn label(&self) -> String {
        let inner = self.items.iter().map(|a| a.label()).collect::<Vec<_>>();
        format!("tuple({})", inner.join(", "))
    }

    fn size(&self) -> Size {
        Size::product(self.items.iter().map(|a| a.size()))
    }

    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        let mut values = Vec::with_capacity(self.items.len());
        let mut originals = Vec::with_capacity(self.items.len());
        let mut rank = Some(0u128);
        for item in self.items.iter() {
            let component = item.pick(rng)?;
            rank = match (rank, component.index) {
                (Some(acc), Some(i)) => {
                    Some(acc.saturating_mul(item.size().value()).saturating_add(i))
                }
                _ => None,
            };
            values.push(component.value);
            originals.push(component.original);
        }
        Some(Pick {
            value: Value::List(values),
            original: Value::List(originals),
            index: rank,
        })
    }

    /// cartesian product of component corners, capped so wide tuples
    /// don't explode the biased prefix
    fn corner_cases(&self) -> Vec<Pick> {
        let mut product: Vec<(Vec<Value>, Vec<Value>)> = vec![(vec![], vec![])];
        for item in self.items.iter() {
            let corners = item.corner_cases();
            if corners.is_empty() {
                return Vec::new();
            }
            let mut next = Vec::new();
            'outer: for (values, originals) in product.iter() {
                for corner in corners.iter() {
                    let mut values = values.clone();
                    let mut originals = originals.clone();
                    values.push(corner.value.clone());
                    originals.push(corner.original.clone());
                    next.push((values, originals));
                    if next.len() >= crate::MAX_CORNER_PRODUCT {
                        break 'outer;
                    }
                }
            }
            product = next;
        }
        product
            .into_iter()
            .map(|(values, originals)| Pick::new(Value::List(values), Value::List(originals)))
            .collect()
    }

    /// shrink one component at a time, holding the others at their
    /// observed values
    fn shrink(&self, around: &Pick) -> Arb {
        let components = match self.components(around) {
            Some(components) => components,
            None => return factory::empty(),
        };
        let mut alternatives = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            let smaller = item.shrink(&components[i]);
            if smaller.is_never() {
                continue;
            }
            let slots = components
                .iter()
                .enumerate()
                .map(|(j, c)| match j == i {
                    true => smaller.clone(),
                    false => factory::constant(c.value.clone()),
                })
                .collect::<Vec<_>>();
            alternatives.push(factory::tuple(slots));
        }
        match alternatives.is_empty() {
            true => factory::empty(),
            false => factory::union(alternatives),
        }
    }

    fn can_generate(&self, pick: &Pick) -> bool {
        match self.components(pick) {
            Some(components) => self
                .items
                .iter()
                .zip(components.iter())
                .all(|(item, c)| item.can_generate(c)),
            None => false,
        }
    }

    fn index_of(&self, pick: &Pick, depth: usize) -> Option<u128> {
        let components = self.components(pick)?;
        let mut rank = 0u128;
        for (item, component) in self.items.iter().zip(components.iter()) {
            let i = item.index_at(component, depth)?;
            rank = rank.saturating_mul(item.size().value()).saturating_add(i);
        }
        Some(rank)
    }

    fn reset(&self) {
        for item in self.items.iter() {
            item.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_the_product_of_components() {
        let arb = Tuple::new(vec![factory::integer(0, 4), factory::boolean()]);
        assert!(arb.size() == Size::Exact(10));
    }

    #[test]
    fn index_is_mixed_radix() {
        let arb = Tuple::new(vec![factory::integer(0, 4), factory::boolean()]);
        let pick = Pick::primitive(Value::List(vec![Value::Int(3), Value::Bool(true)]));
        assert!(arb.index_of(&pick, 0) == Some(7));
    }

    #[test]
    fn shrink_targets_one_component_at_a_time() {
        let arb = Tuple::new(vec![factory::integer(0, 10), factory::integer(0, 10)]);
        let pick = Pick::primitive(Value::List(vec![Value::Int(4), Value::Int(0)]));
        let shrunk = arb.shrink(&pick);
        // the zero component is pinned; only the first can move
        assert!(shrunk.can_generate(&Pick::primitive(Value::List(vec![
            Value::Int(2),
            Value::Int(0),
        ]))));
        assert!(!shrunk.can_generate(&Pick::primitive(Value::List(vec![
            Value::Int(4),
            Value::Int(0),
        ]))));
    }

    #[test]
    fn fully_zero_tuple_is_minimal() {
        let arb = Tuple::new(vec![factory::integer(0, 10), factory::integer(0, 10)]);
        let pick = Pick::primitive(Value::List(vec![Value::Int(0), Value::Int(0)]));
        assert!(arb.shrink(&pick).is_never());
    }
}
