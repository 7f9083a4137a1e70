use super::Arbitrary;
use super::Pick;
use super::Size;
use crate::sampler::Generator;

/// the absorbing zero of the algebra: no values, no corners, and
/// every combinator over it collapses back to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl Arbitrary for Empty {
    fn label(&self) -> String {
        "empty".to_string()
    }

    fn size(&self) -> Size {
        Size::Exact(0)
    }

    fn pick(&self, _rng: &mut Generator) -> Option<Pick> {
        None
    }

    fn can_generate(&self, _pick: &Pick) -> bool {
        false
    }

    fn is_never(&self) -> bool {
        true
    }
}
