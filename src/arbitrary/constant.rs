use super::Arbitrary;
use super::Pick;
use super::Size;
use crate::sampler::Generator;
use crate::value::Value;

/// a single value, always. the terminal case of most shrink chains.
#[derive(Debug, Clone)]
pub struct Constant {
    value: Value,
}

impl Constant {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl Arbitrary for Constant {
    fn label(&self) -> String {
        format!("constant({})", self.value)
    }

    fn size(&self) -> Size {
        Size::Exact(1)
    }

    fn pick(&self, _rng: &mut Generator) -> Option<Pick> {
        Some(Pick::indexed(self.value.clone(), self.value.clone(), 0))
    }

    fn corner_cases(&self) -> Vec<Pick> {
        vec![Pick::indexed(self.value.clone(), self.value.clone(), 0)]
    }

    fn can_generate(&self, pick: &Pick) -> bool {
        pick.value == self.value
    }

    fn index_of(&self, pick: &Pick, _depth: usize) -> Option<u128> {
        match self.can_generate(pick) {
            true => Some(0),
            false => None,
        }
    }
}
