use super::Arb;
use super::Arbitrary;
use super::Pick;
use super::Size;
use super::factory;
use crate::sampler::Generator;
use crate::value::Value;

/// characters in a codepoint range. 'a' plays the role of zero for
/// corner cases; shrinking moves toward the low bound, which is what
/// "simpler characters" means for a range.
#[derive(Debug, Clone, Copy)]
pub struct Character {
    lo: char,
    hi: char,
}

impl Character {
    pub fn new(lo: char, hi: char) -> Self {
        assert!(lo <= hi, "character range is empty");
        Self { lo, hi }
    }
}

impl Arbitrary for Character {
    fn label(&self) -> String {
        format!("char({:?}, {:?})", self.lo, self.hi)
    }

    fn size(&self) -> Size {
        Size::Exact((self.hi as u32 - self.lo as u32) as u128 + 1)
    }

    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        // the surrogate gap makes some codepoints in range invalid;
        // rejection keeps the draw uniform over the valid ones
        for _ in 0..crate::MAX_FILTER_TRIES {
            let code = rng.int(self.lo as i64, self.hi as i64) as u32;
            if let Some(value) = char::from_u32(code) {
                return Some(Pick::indexed(
                    Value::Char(value),
                    Value::Char(value),
                    (code - self.lo as u32) as u128,
                ));
            }
        }
        None
    }

    fn corner_cases(&self) -> Vec<Pick> {
        [self.lo, self.hi, 'a']
            .into_iter()
            .filter(|c| (self.lo..=self.hi).contains(c))
            .map(|c| Pick::primitive(Value::Char(c)))
            .collect()
    }

    fn shrink(&self, around: &Pick) -> Arb {
        let value = around.value.char();
        if value <= self.lo {
            return factory::empty();
        }
        match (value as u32).checked_sub(1).and_then(char::from_u32) {
            Some(below) => factory::char_in(self.lo, below),
            None => factory::empty(),
        }
    }

    fn can_generate(&self, pick: &Pick) -> bool {
        match pick.value {
            Value::Char(c) => (self.lo..=self.hi).contains(&c),
            _ => false,
        }
    }

    fn index_of(&self, pick: &Pick, _depth: usize) -> Option<u128> {
        match self.can_generate(pick) {
            true => Some((pick.value.char() as u32 - self.lo as u32) as u128),
            false => None,
        }
    }
}
