use super::Arb;
use super::Arbitrary;
use super::Pick;
use super::Size;
use super::factory;
use crate::sampler::Generator;
use crate::value::Value;

/// a fair coin. false plays the role of zero for shrinking.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

impl Arbitrary for Boolean {
    fn label(&self) -> String {
        "boolean".to_string()
    }

    fn size(&self) -> Size {
        Size::Exact(2)
    }

    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        let value = rng.bool();
        Some(Pick::indexed(
            Value::Bool(value),
            Value::Bool(value),
            value as u128,
        ))
    }

    fn corner_cases(&self) -> Vec<Pick> {
        vec![
            Pick::indexed(Value::Bool(false), Value::Bool(false), 0),
            Pick::indexed(Value::Bool(true), Value::Bool(true), 1),
        ]
    }

    fn shrink(&self, around: &Pick) -> Arb {
        match around.value.bool() {
            true => factory::constant(Value::Bool(false)),
            false => factory::empty(),
        }
    }

    fn can_generate(&self, pick: &Pick) -> bool {
        matches!(pick.value, Value::Bool(_))
    }

    fn index_of(&self, pick: &Pick, _depth: usize) -> Option<u128> {
        match pick.value {
            Value::Bool(b) => Some(b as u128),
            _ => None,
        }
    }
}
