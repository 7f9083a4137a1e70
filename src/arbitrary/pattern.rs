use super::Arbitrary;
use super::Pick;
use super::Size;
use crate::sampler::Generator;
use crate::value::Value;

/// strings matching a small regex subset: literals, `.`, classes,
/// grouping, alternation, and the usual quantifiers. enough to express
/// the string presets; anything fancier belongs to an external
/// collaborator behind the same Arbitrary boundary.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    root: Pat,
    max_len: usize,
}

/// unbounded repeats generate at most this many extra iterations
const UNBOUNDED_EXTRA: usize = 8;
/// the generable universe for `.` and negated classes
const PRINTABLE: (char, char) = (' ', '~');

#[derive(Debug, Clone)]
enum Pat {
    Literal(char),
    Any,
    Class { ranges: Vec<(char, char)>, negated: bool },
    Sequence(Vec<Pat>),
    Alternation(Vec<Pat>),
    Repeat { inner: Box<Pat>, min: usize, max: Option<usize> },
}

impl Pattern {
    pub fn new(source: &str, max_len: usize) -> Self {
        let mut parser = Parser::new(source);
        let root = parser
            .alternation()
            .filter(|_| parser.at == parser.chars.len())
            .expect("valid pattern");
        Self {
            source: source.to_string(),
            root,
            max_len,
        }
    }

    fn generate(&self, pat: &Pat, rng: &mut Generator, out: &mut String) {
        match pat {
            Pat::Literal(c) => out.push(*c),
            Pat::Any => out.push(char_in_ranges(&[PRINTABLE], rng)),
            Pat::Class { ranges, negated: false } => out.push(char_in_ranges(ranges, rng)),
            Pat::Class { ranges, negated: true } => {
                for _ in 0..crate::MAX_FILTER_TRIES {
                    let c = char_in_ranges(&[PRINTABLE], rng);
                    if !ranges.iter().any(|(lo, hi)| (*lo..=*hi).contains(&c)) {
                        out.push(c);
                        return;
                    }
                }
            }
            Pat::Sequence(parts) => {
                for part in parts {
                    self.generate(part, rng, out);
                }
            }
            Pat::Alternation(branches) => {
                let branch = &branches[rng.index(branches.len())];
                self.generate(branch, rng, out);
            }
            Pat::Repeat { inner, min, max } => {
                let max = max.unwrap_or(min + UNBOUNDED_EXTRA);
                let count = min + rng.index(max - min + 1);
                for _ in 0..count {
                    self.generate(inner, rng, out);
                }
            }
        }
    }

    /// the deterministic minimal expansion: min counts, first branch,
    /// low end of every class
    fn minimal(&self, pat: &Pat, out: &mut String) {
        match pat {
            Pat::Literal(c) => out.push(*c),
            Pat::Any => out.push(PRINTABLE.0),
            Pat::Class { ranges, negated: false } => {
                if let Some((lo, _)) = ranges.first() {
                    out.push(*lo);
                }
            }
            Pat::Class { ranges, negated: true } => {
                let mut c = PRINTABLE.0;
                while ranges.iter().any(|(lo, hi)| (*lo..=*hi).contains(&c)) && c < PRINTABLE.1 {
                    c = char::from_u32(c as u32 + 1).unwrap_or(PRINTABLE.1);
                }
                out.push(c);
            }
            Pat::Sequence(parts) => {
                for part in parts {
                    self.minimal(part, out);
                }
            }
            Pat::Alternation(branches) => {
                if let Some(first) = branches.first() {
                    self.minimal(first, out);
                }
            }
            Pat::Repeat { inner, min, .. } => {
                for _ in 0..*min {
                    self.minimal(inner, out);
                }
            }
        }
    }

    /// all positions the pattern can stop at when matching from
    /// `start`; backtracking by breadth over position sets
    fn ends(&self, pat: &Pat, s: &[char], start: usize) -> Vec<usize> {
        match pat {
            Pat::Literal(c) => match s.get(start) {
                Some(x) if x == c => vec![start + 1],
                _ => vec![],
            },
            Pat::Any => match s.get(start) {
                Some(_) => vec![start + 1],
                None => vec![],
            },
            Pat::Class { ranges, negated } => match s.get(start) {
                Some(x) => {
                    let member = ranges.iter().any(|(lo, hi)| (*lo..=*hi).contains(x));
                    match member != *negated {
                        true => vec![start + 1],
                        false => vec![],
                    }
                }
                None => vec![],
            },
            Pat::Sequence(parts) => {
                let mut positions = vec![start];
                for part in parts {
                    let mut next = Vec::new();
                    for p in positions {
                        for e in self.ends(part, s, p) {
                            if !next.contains(&e) {
                                next.push(e);
                            }
                        }
                    }
                    positions = next;
                    if positions.is_empty() {
                        break;
                    }
                }
                positions
            }
            Pat::Alternation(branches) => {
                let mut all = Vec::new();
                for branch in branches {
                    for e in self.ends(branch, s, start) {
                        if !all.contains(&e) {
                            all.push(e);
                        }
                    }
                }
                all
            }
            Pat::Repeat { inner, min, max } => {
                let cap = max.unwrap_or(s.len().saturating_sub(start).max(*min));
                let mut results = Vec::new();
                let mut frontier = vec![start];
                if *min == 0 {
                    results.push(start);
                }
                for iteration in 1..=cap {
                    let mut next = Vec::new();
                    for p in frontier {
                        for e in self.ends(inner, s, p) {
                            if !next.contains(&e) {
                                next.push(e);
                            }
                        }
                    }
                    if next.is_empty() {
                        break;
                    }
                    if iteration >= *min {
                        for e in next.iter() {
                            if !results.contains(e) {
                                results.push(*e);
                            }
                        }
                    }
                    frontier = next;
                }
                results
            }
        }
    }

    fn count(&self, pat: &Pat) -> u128 {
        match pat {
            Pat::Literal(_) => 1,
            Pat::Any => (PRINTABLE.1 as u32 - PRINTABLE.0 as u32) as u128 + 1,
            Pat::Class { ranges, negated } => {
                let members = ranges
                    .iter()
                    .map(|(lo, hi)| (*hi as u32 - *lo as u32) as u128 + 1)
                    .sum::<u128>();
                match negated {
                    false => members,
                    true => self.count(&Pat::Any).saturating_sub(members),
                }
            }
            Pat::Sequence(parts) => parts
                .iter()
                .fold(1u128, |acc, p| acc.saturating_mul(self.count(p))),
            Pat::Alternation(branches) => branches
                .iter()
                .fold(0u128, |acc, b| acc.saturating_add(self.count(b))),
            Pat::Repeat { inner, min, max } => {
                let s = self.count(inner);
                let max = max.unwrap_or(min + UNBOUNDED_EXTRA);
                (*min..=max).fold(0u128, |acc, k| {
                    acc.saturating_add(s.saturating_pow(k as u32))
                })
            }
        }
    }
}

impl Arbitrary for Pattern {
    fn label(&self) -> String {
        format!("pattern({:?})", self.source)
    }

    fn size(&self) -> Size {
        Size::degenerate(self.count(&self.root))
    }

    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        for _ in 0..crate::MAX_FILTER_TRIES {
            let mut out = String::new();
            self.generate(&self.root, rng, &mut out);
            if out.chars().count() <= self.max_len {
                return Some(Pick::primitive(Value::Text(out)));
            }
        }
        None
    }

    fn corner_cases(&self) -> Vec<Pick> {
        let mut out = String::new();
        self.minimal(&self.root, &mut out);
        match out.chars().count() <= self.max_len {
            true => vec![Pick::primitive(Value::Text(out))],
            false => vec![],
        }
    }

    fn can_generate(&self, pick: &Pick) -> bool {
        match &pick.value {
            Value::Text(s) => {
                let chars = s.chars().collect::<Vec<_>>();
                chars.len() <= self.max_len
                    && self.ends(&self.root, &chars, 0).contains(&chars.len())
            }
            _ => false,
        }
    }
}

/// recursive-descent parser for the subset grammar
struct Parser {
    chars: Vec<char>,
    at: usize,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            at: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.at).copied()
    }
    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        self.at += c.is_some() as usize;
        c
    }
    fn eat(&mut self, expected: char) -> Option<()> {
        match self.peek() == Some(expected) {
            true => {
                self.at += 1;
                Some(())
            }
            false => None,
        }
    }

    fn alternation(&mut self) -> Option<Pat> {
        let mut branches = vec![self.sequence()?];
        while self.peek() == Some('|') {
            self.bump();
            branches.push(self.sequence()?);
        }
        match branches.len() {
            1 => branches.pop(),
            _ => Some(Pat::Alternation(branches)),
        }
    }

    fn sequence(&mut self) -> Option<Pat> {
        let mut parts = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            parts.push(self.repeat()?);
        }
        Some(Pat::Sequence(parts))
    }

    fn repeat(&mut self) -> Option<Pat> {
        let atom = self.atom()?;
        let (min, max) = match self.peek() {
            Some('?') => (0, Some(1)),
            Some('*') => (0, None),
            Some('+') => (1, None),
            Some('{') => {
                self.bump();
                let min = self.number()?;
                let max = match self.peek() {
                    Some(',') => {
                        self.bump();
                        match self.peek() {
                            Some('}') => None,
                            _ => Some(self.number()?),
                        }
                    }
                    _ => Some(min),
                };
                self.eat('}')?;
                return Some(Pat::Repeat {
                    inner: Box::new(atom),
                    min,
                    max,
                });
            }
            _ => return Some(atom),
        };
        self.bump();
        Some(Pat::Repeat {
            inner: Box::new(atom),
            min,
            max,
        })
    }

    fn atom(&mut self) -> Option<Pat> {
        match self.bump()? {
            '(' => {
                let inner = self.alternation()?;
                self.eat(')')?;
                Some(inner)
            }
            '[' => self.class(),
            '.' => Some(Pat::Any),
            '\\' => self.escape(),
            c if !"|)?*+{}".contains(c) => Some(Pat::Literal(c)),
            _ => None,
        }
    }

    fn class(&mut self) -> Option<Pat> {
        let negated = self.peek() == Some('^');
        if negated {
            self.bump();
        }
        let mut ranges = Vec::new();
        loop {
            match self.bump()? {
                ']' => break,
                '\\' => match self.escape()? {
                    Pat::Literal(c) => ranges.push((c, c)),
                    Pat::Class { ranges: r, negated: false } => ranges.extend(r),
                    _ => return None,
                },
                lo => {
                    if self.peek() == Some('-') && self.chars.get(self.at + 1) != Some(&']') {
                        self.bump();
                        let hi = self.bump()?;
                        ranges.push((lo, hi));
                    } else {
                        ranges.push((lo, lo));
                    }
                }
            }
        }
        Some(Pat::Class { ranges, negated })
    }

    fn escape(&mut self) -> Option<Pat> {
        match self.bump()? {
            'd' => Some(Pat::Class {
                ranges: vec![('0', '9')],
                negated: false,
            }),
            'w' => Some(Pat::Class {
                ranges: vec![('a', 'z'), ('A', 'Z'), ('0', '9'), ('_', '_')],
                negated: false,
            }),
            's' => Some(Pat::Class {
                ranges: vec![(' ', ' '), ('\t', '\t')],
                negated: false,
            }),
            'n' => Some(Pat::Literal('\n')),
            't' => Some(Pat::Literal('\t')),
            c => Some(Pat::Literal(c)),
        }
    }

    fn number(&mut self) -> Option<usize> {
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            self.bump();
        }
        digits.parse().ok()
    }
}

fn char_in_ranges(ranges: &[(char, char)], rng: &mut Generator) -> char {
    let total = ranges
        .iter()
        .map(|(lo, hi)| (*hi as u32 - *lo as u32) as usize + 1)
        .sum::<usize>();
    let mut slot = rng.index(total.max(1));
    for (lo, hi) in ranges {
        let width = (*hi as u32 - *lo as u32) as usize + 1;
        if slot < width {
            return char::from_u32(*lo as u32 + slot as u32).unwrap_or(*lo);
        }
        slot -= width;
    }
    ranges.first().map(|(lo, _)| *lo).unwrap_or(PRINTABLE.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, input: &str) -> bool {
        let arb = Pattern::new(pattern, 64);
        arb.can_generate(&Pick::primitive(Value::Text(input.to_string())))
    }

    #[test]
    fn generated_strings_match_their_pattern() {
        let ref mut rng = Generator::from_seed(61);
        for pattern in ["[a-z]{3}", "a+b?", "(x|y){2,4}", "\\d{2}-\\d{2}"] {
            let arb = Pattern::new(pattern, 64);
            for _ in 0..50 {
                let pick = arb.pick(rng).unwrap();
                assert!(arb.can_generate(&pick), "{} !~ {}", pick, pattern);
            }
        }
    }

    #[test]
    fn matcher_accepts_and_rejects() {
        assert!(matches("[a-z]+@[a-z]+", "user@host"));
        assert!(!matches("[a-z]+@[a-z]+", "user@"));
        assert!(matches("(ab)*", ""));
        assert!(matches("(ab)*", "ababab"));
        assert!(!matches("(ab)*", "aba"));
        assert!(matches("a{2,3}", "aaa"));
        assert!(!matches("a{2,3}", "aaaa"));
        assert!(matches("[^0-9]", "x"));
        assert!(!matches("[^0-9]", "5"));
    }

    #[test]
    fn minimal_corner_uses_min_counts_and_first_branch() {
        let arb = Pattern::new("(ab|cd)[0-9]{2,5}x*", 64);
        let corners = arb.corner_cases();
        assert!(corners.len() == 1);
        assert!(corners[0].value.text() == "ab00");
        assert!(arb.can_generate(&corners[0]));
    }

    #[test]
    fn max_len_bounds_generation() {
        let arb = Pattern::new("a{5,}", 3);
        let ref mut rng = Generator::from_seed(0);
        assert!(arb.pick(rng).is_none());
        assert!(!arb.can_generate(&Pick::primitive(Value::Text("aaaaa".into()))));
    }
}
