use super::Arb;
use super::Arbitrary;
use super::Pick;
use super::Size;
use crate::sampler::Generator;
use std::cell::RefCell;
use std::collections::HashSet;

/// a base arbitrary that refuses to repeat itself within one sampling
/// session. the seen-set is the one piece of per-run state in the
/// algebra; the explorer resets it at run boundaries.
#[derive(Clone)]
pub struct Unique {
    base: Arb,
    seen: RefCell<HashSet<u64>>,
}

impl Unique {
    pub fn new(base: Arb) -> Self {
        Self {
            base,
            seen: RefCell::new(HashSet::new()),
        }
    }
}

impl Arbitrary for Unique {
    fn label(&self) -> String {
        format!("unique({})", self.base.label())
    }

    fn size(&self) -> Size {
        self.base.size()
    }

    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        for _ in 0..crate::MAX_FILTER_TRIES {
            let pick = self.base.pick(rng)?;
            if self.seen.borrow_mut().insert(pick.value.fingerprint()) {
                return Some(pick);
            }
        }
        None
    }

    fn corner_cases(&self) -> Vec<Pick> {
        self.base.corner_cases()
    }

    fn shrink(&self, around: &Pick) -> Arb {
        self.base.shrink(around)
    }

    fn can_generate(&self, pick: &Pick) -> bool {
        self.base.can_generate(pick)
    }

    fn index_of(&self, pick: &Pick, depth: usize) -> Option<u128> {
        self.base.index_at(pick, depth)
    }

    fn reset(&self) {
        self.seen.borrow_mut().clear();
        self.base.reset();
    }
}
