pub mod array;
pub mod boolean;
pub mod chained;
pub mod character;
pub mod collection;
pub mod constant;
pub mod empty;
pub mod factory;
pub mod filtered;
pub mod integer;
pub mod mapped;
pub mod pattern;
pub mod pick;
pub mod real;
pub mod size;
pub mod temporal;
pub mod text;
pub mod tuple;
pub mod union;
pub mod unique;

pub use factory::*;
pub use pick::Pick;
pub use size::Size;

use crate::sampler::Generator;
use crate::value::Value;
use std::rc::Rc;

/// a generator of values in some domain, augmented with corner-case
/// enumeration, shrinking, deterministic indexing, and size
/// estimation. one implementation per variant; shared behavior (the
/// sample-via-pick loop, biased and unique sampling) lives on the
/// `Arb` handle rather than in an inheritance tree.
pub trait Arbitrary {
    /// short human name used in statistics and reports
    fn label(&self) -> String;
    /// cardinality of the domain, exact or estimated
    fn size(&self) -> Size;
    /// draw one sample, or None when the domain is exhausted
    fn pick(&self, rng: &mut Generator) -> Option<Pick>;
    /// the finite, ordered, deduplicated set of values to try first
    fn corner_cases(&self) -> Vec<Pick> {
        Vec::new()
    }
    /// a smaller arbitrary whose domain sits between `around` and the
    /// zero/empty of the type; Empty once nothing simpler remains
    fn shrink(&self, _around: &Pick) -> Arb {
        factory::empty()
    }
    /// could this arbitrary have produced this pick?
    fn can_generate(&self, pick: &Pick) -> bool;
    /// deterministic position of the pick within the domain; reals are
    /// discretised at 10^depth
    fn index_of(&self, _pick: &Pick, _depth: usize) -> Option<u128> {
        None
    }
    /// true only for the absorbing Empty variant
    fn is_never(&self) -> bool {
        false
    }
    /// clear per-session state; only Unique carries any
    fn reset(&self) {}
}

/// shared immutable handle to an arbitrary. combinators return new
/// handles; cloning is pointer-cheap and two clones share identity,
/// which is what the caching sampler keys on.
#[derive(Clone)]
pub struct Arb(Rc<dyn Arbitrary>);

impl Arb {
    pub fn new(inner: impl Arbitrary + 'static) -> Self {
        Self(Rc::new(inner))
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn label(&self) -> String {
        self.0.label()
    }
    pub fn size(&self) -> Size {
        self.0.size()
    }
    pub fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        self.0.pick(rng)
    }
    pub fn corner_cases(&self) -> Vec<Pick> {
        let mut seen = Vec::new();
        let mut corners = Vec::new();
        for pick in self.0.corner_cases() {
            if !seen.contains(&pick.value) {
                seen.push(pick.value.clone());
                corners.push(pick);
            }
        }
        corners
    }
    pub fn shrink(&self, around: &Pick) -> Arb {
        self.0.shrink(around)
    }
    pub fn can_generate(&self, pick: &Pick) -> bool {
        self.0.can_generate(pick)
    }
    pub fn index_of(&self, pick: &Pick) -> Option<u128> {
        self.0.index_of(pick, crate::REAL_INDEX_DEPTH)
    }
    pub fn index_at(&self, pick: &Pick, depth: usize) -> Option<u128> {
        self.0.index_of(pick, depth)
    }
    pub fn is_never(&self) -> bool {
        self.0.is_never()
    }
    pub fn reset(&self) {
        self.0.reset()
    }

    /// up to n picks, uniform. persistent generation failures fall
    /// back to none-picks, which explorers count as skipped cases.
    pub fn sample(&self, n: usize, rng: &mut Generator) -> Vec<Pick> {
        if self.is_never() {
            return Vec::new();
        }
        let mut picks = Vec::with_capacity(n);
        for _ in 0..n {
            let pick = (0..crate::MAX_PICK_TRIES).find_map(|_| self.pick(rng));
            match pick {
                Some(pick) => picks.push(pick),
                None => {
                    log::debug!("generation failure in {}", self.label());
                    picks.push(Pick::none());
                }
            }
        }
        picks
    }

    /// corner cases first, then uniform fill; never exceeds n
    pub fn sample_with_bias(&self, n: usize, rng: &mut Generator) -> Vec<Pick> {
        let mut picks = self.corner_cases();
        picks.truncate(n);
        if picks.len() < n {
            picks.extend(self.sample(n - picks.len(), rng));
        }
        picks
    }

    /// up to n picks with pairwise-distinct values; gives up after a
    /// bounded retry budget and returns fewer
    pub fn sample_unique(&self, n: usize, rng: &mut Generator) -> Vec<Pick> {
        let mut seen = std::collections::HashSet::new();
        let mut picks = Vec::with_capacity(n);
        for _ in 0..n * crate::UNIQUE_RETRY_FACTOR {
            if picks.len() == n {
                break;
            }
            if let Some(pick) = self.pick(rng) {
                if seen.insert(pick.value.fingerprint()) {
                    picks.push(pick);
                }
            }
        }
        picks
    }

    /// transformed values; `original` passes through unchanged and
    /// shrinking happens in terms of the base
    pub fn map(&self, f: impl Fn(&Value) -> Value + 'static) -> Arb {
        self.map_rc(Rc::new(f))
    }
    pub(crate) fn map_rc(&self, f: Rc<dyn Fn(&Value) -> Value>) -> Arb {
        match self.is_never() {
            true => self.clone(),
            false => Arb::new(mapped::Mapped::new(self.clone(), f)),
        }
    }

    /// values satisfying the predicate, with a bounded retry budget
    pub fn filter(&self, p: impl Fn(&Value) -> bool + 'static) -> Arb {
        self.filter_rc(Rc::new(p))
    }
    pub(crate) fn filter_rc(&self, p: Rc<dyn Fn(&Value) -> bool>) -> Arb {
        match self.is_never() {
            true => self.clone(),
            false => Arb::new(filtered::Filtered::new(self.clone(), p)),
        }
    }

    /// dependent generation: draw x from self, then from k(x)
    pub fn chain(&self, k: impl Fn(&Value) -> Arb + 'static) -> Arb {
        self.chain_rc(Rc::new(k))
    }
    pub(crate) fn chain_rc(&self, k: Rc<dyn Fn(&Value) -> Arb>) -> Arb {
        match self.is_never() {
            true => self.clone(),
            false => Arb::new(chained::Chained::new(self.clone(), k)),
        }
    }

    /// no two picks share a value within one sampling session
    pub fn unique(&self) -> Arb {
        match self.is_never() {
            true => self.clone(),
            false => Arb::new(unique::Unique::new(self.clone())),
        }
    }
}

impl std::fmt::Debug for Arb {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Arb({})", self.label())
    }
}
