use super::Arb;
use super::Arbitrary;
use super::Pick;
use super::Size;
use super::factory;
use crate::sampler::Generator;
use crate::value::Value;

/// strings with lengths in [min, max] over an alphabet arbitrary.
/// structurally an Array of characters flattened into Text, with the
/// same disjoint-union-by-length indexing.
#[derive(Debug, Clone)]
pub struct Text {
    min: usize,
    max: usize,
    alphabet: Arb,
}

impl Text {
    pub fn new(min: usize, max: usize, alphabet: Arb) -> Self {
        assert!(min <= max, "text length range is empty");
        Self { min, max, alphabet }
    }

    fn offset(&self, len: usize) -> u128 {
        let s = self.alphabet.size().value();
        (self.min..len).fold(0u128, |acc, k| {
            acc.saturating_add(s.saturating_pow(k as u32))
        })
    }
}

impl Arbitrary for Text {
    fn label(&self) -> String {
        format!("text({}..{})", self.min, self.max)
    }

    fn size(&self) -> Size {
        let alphabet = self.alphabet.size();
        let s = alphabet.value();
        let total = (self.min..=self.max).fold(0u128, |acc, k| {
            acc.saturating_add(s.saturating_pow(k as u32))
        });
        match alphabet.is_exact() {
            true => Size::Exact(total),
            false => Size::degenerate(total),
        }
    }

    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        let len = self.min + rng.index(self.max - self.min + 1);
        let mut string = String::with_capacity(len);
        let mut rank = Some(0u128);
        let s = self.alphabet.size().value();
        for _ in 0..len {
            let c = self.alphabet.pick(rng)?;
            rank = match (rank, c.index) {
                (Some(acc), Some(i)) => Some(acc.saturating_mul(s).saturating_add(i)),
                _ => None,
            };
            string.push(c.value.char());
        }
        let index = rank.map(|r| self.offset(len).saturating_add(r));
        Some(Pick {
            original: Value::Text(string.clone()),
            value: Value::Text(string),
            index,
        })
    }

    /// minimal repetitions of each alphabet corner, plus maxed-out runs
    fn corner_cases(&self) -> Vec<Pick> {
        let mut corners = Vec::new();
        let alphabet = self.alphabet.corner_cases();
        if self.min == 0 {
            corners.push(Pick::primitive(Value::Text(String::new())));
        }
        for len in [self.min.max(1), self.max] {
            if (self.min..=self.max).contains(&len) {
                for c in alphabet.iter() {
                    let run = c.value.char().to_string().repeat(len);
                    corners.push(Pick::primitive(Value::Text(run)));
                }
            }
        }
        corners
    }

    /// toward empty first, then toward simpler characters
    fn shrink(&self, around: &Pick) -> Arb {
        let text = around.value.text().to_string();
        let len = text.chars().count();
        if len > self.min {
            factory::text_of(self.min, len - 1, self.alphabet.clone())
        } else if len > 0 {
            let first = text.chars().next().expect("nonempty");
            let smaller = self.alphabet.shrink(&Pick::primitive(Value::Char(first)));
            match smaller.is_never() {
                true => factory::empty(),
                false => factory::text_of(self.min, self.min, smaller),
            }
        } else {
            factory::empty()
        }
    }

    fn can_generate(&self, pick: &Pick) -> bool {
        match &pick.value {
            Value::Text(s) => {
                let len = s.chars().count();
                (self.min..=self.max).contains(&len)
                    && s.chars()
                        .all(|c| self.alphabet.can_generate(&Pick::primitive(Value::Char(c))))
            }
            _ => false,
        }
    }

    fn index_of(&self, pick: &Pick, depth: usize) -> Option<u128> {
        let text = match &pick.value {
            Value::Text(s) => s,
            _ => return None,
        };
        let len = text.chars().count();
        if !(self.min..=self.max).contains(&len) {
            return None;
        }
        let s = self.alphabet.size().value();
        let mut rank = 0u128;
        for c in text.chars() {
            let i = self
                .alphabet
                .index_at(&Pick::primitive(Value::Char(c)), depth)?;
            rank = rank.saturating_mul(s).saturating_add(i);
        }
        Some(self.offset(len).saturating_add(rank))
    }

    fn reset(&self) {
        self.alphabet.reset();
    }
}
