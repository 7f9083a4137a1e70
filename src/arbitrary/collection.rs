use super::Arb;
use super::Arbitrary;
use super::Pick;
use super::Size;
use super::factory;
use crate::sampler::Generator;
use crate::value::Value;

/// an element drawn from an explicit, finite member list. members are
/// deduplicated at construction and keep their first-seen order; the
/// index of a pick is its position in that order.
#[derive(Debug, Clone)]
pub struct Collection {
    members: Vec<Value>,
}

impl Collection {
    pub fn new(members: Vec<Value>) -> Self {
        let mut deduped = Vec::with_capacity(members.len());
        for member in members {
            if !deduped.contains(&member) {
                deduped.push(member);
            }
        }
        Self { members: deduped }
    }

    fn position(&self, value: &Value) -> Option<usize> {
        self.members.iter().position(|m| m == value)
    }
}

impl Arbitrary for Collection {
    fn label(&self) -> String {
        format!("collection({} members)", self.members.len())
    }

    fn size(&self) -> Size {
        Size::Exact(self.members.len() as u128)
    }

    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        if self.members.is_empty() {
            return None;
        }
        let index = rng.index(self.members.len());
        let value = self.members[index].clone();
        Some(Pick::indexed(value.clone(), value, index as u128))
    }

    fn corner_cases(&self) -> Vec<Pick> {
        let mut corners = Vec::new();
        if let Some(first) = self.members.first() {
            corners.push(Pick::indexed(first.clone(), first.clone(), 0));
        }
        if self.members.len() > 1 {
            let last = self.members.last().cloned().expect("nonempty");
            corners.push(Pick::indexed(
                last.clone(),
                last,
                self.members.len() as u128 - 1,
            ));
        }
        corners
    }

    /// earlier members are simpler; shrinking keeps the prefix before
    /// the picked member
    fn shrink(&self, around: &Pick) -> Arb {
        match self.position(&around.value) {
            Some(0) | None => factory::empty(),
            Some(position) => factory::collection(self.members[..position].to_vec()),
        }
    }

    fn can_generate(&self, pick: &Pick) -> bool {
        self.position(&pick.value).is_some()
    }

    fn index_of(&self, pick: &Pick, _depth: usize) -> Option<u128> {
        self.position(&pick.value).map(|p| p as u128)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_are_deduplicated_in_order() {
        let arb = Collection::new(vec![
            Value::Int(3),
            Value::Int(1),
            Value::Int(3),
            Value::Int(2),
        ]);
        assert!(arb.size() == Size::Exact(3));
        assert!(arb.index_of(&Pick::primitive(Value::Int(2)), 0) == Some(2));
    }

    #[test]
    fn shrink_keeps_the_earlier_prefix() {
        let arb = Collection::new(vec![Value::Int(10), Value::Int(20), Value::Int(30)]);
        let shrunk = arb.shrink(&Pick::primitive(Value::Int(30)));
        assert!(shrunk.can_generate(&Pick::primitive(Value::Int(10))));
        assert!(!shrunk.can_generate(&Pick::primitive(Value::Int(30))));
        assert!(arb.shrink(&Pick::primitive(Value::Int(10))).is_never());
    }

    #[test]
    fn empty_member_list_never_picks() {
        let arb = Collection::new(vec![]);
        let ref mut rng = Generator::from_seed(0);
        assert!(arb.pick(rng).is_none());
        assert!(arb.size() == Size::Exact(0));
    }
}
