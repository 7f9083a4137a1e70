use super::Arb;
use super::array::Array;
use super::boolean::Boolean;
use super::character::Character;
use super::collection::Collection;
use super::constant::Constant;
use super::empty::Empty;
use super::integer::Integer;
use super::pattern::Pattern;
use super::real::Real;
use super::temporal::Dates;
use super::temporal::Spans;
use super::temporal::Stamps;
use super::temporal::Times;
use super::text::Text;
use super::tuple::Tuple;
use super::union::Union;
use crate::value::Value;

// primitive factories

pub fn empty() -> Arb {
    Arb::new(Empty)
}
pub fn constant(value: Value) -> Arb {
    Arb::new(Constant::new(value))
}
pub fn boolean() -> Arb {
    Arb::new(Boolean)
}
pub fn integer(lo: i64, hi: i64) -> Arb {
    Arb::new(Integer::new(lo, hi))
}
pub fn int() -> Arb {
    integer(i64::MIN, i64::MAX)
}
pub fn real(lo: f64, hi: f64) -> Arb {
    Arb::new(Real::new(lo, hi))
}
pub fn character() -> Arb {
    char_in(' ', '~')
}
pub fn char_in(lo: char, hi: char) -> Arb {
    Arb::new(Character::new(lo, hi))
}
pub fn text(min: usize, max: usize) -> Arb {
    text_of(min, max, character())
}
pub fn text_of(min: usize, max: usize, alphabet: Arb) -> Arb {
    Arb::new(Text::new(min, max, alphabet))
}
pub fn string() -> Arb {
    text(0, crate::DEFAULT_TEXT_LENGTH)
}

// composite factories

pub fn array(inner: Arb, min: usize, max: usize) -> Arb {
    Arb::new(Array::new(inner, min, max))
}
pub fn collection(members: Vec<Value>) -> Arb {
    Arb::new(Collection::new(members))
}
pub fn tuple(items: Vec<Arb>) -> Arb {
    Arb::new(Tuple::new(items))
}
pub fn union(children: Vec<Arb>) -> Arb {
    Arb::new(Union::new(children))
}
pub fn pattern(source: &str, max_len: usize) -> Arb {
    Arb::new(Pattern::new(source, max_len))
}

// temporal factories

pub fn date(lo: chrono::NaiveDate, hi: chrono::NaiveDate) -> Arb {
    Arb::new(Dates::new(lo, hi))
}
pub fn time(lo: chrono::NaiveTime, hi: chrono::NaiveTime) -> Arb {
    Arb::new(Times::new(lo, hi))
}
pub fn datetime(lo: chrono::NaiveDateTime, hi: chrono::NaiveDateTime) -> Arb {
    Arb::new(Stamps::new(lo, hi))
}
pub fn duration(lo: chrono::Duration, hi: chrono::Duration) -> Arb {
    Arb::new(Spans::new(lo, hi))
}

// presets

pub fn positive_int() -> Arb {
    integer(1, i64::MAX)
}
pub fn negative_int() -> Arb {
    integer(i64::MIN, -1)
}
pub fn non_zero_int() -> Arb {
    union(vec![negative_int(), positive_int()])
}
pub fn byte() -> Arb {
    integer(0, 255)
}
pub fn non_empty_text() -> Arb {
    text(1, crate::DEFAULT_TEXT_LENGTH)
}
pub fn non_empty_array(inner: Arb) -> Arb {
    array(inner, 1, crate::DEFAULT_ARRAY_LENGTH)
}
pub fn pair(a: Arb, b: Arb) -> Arb {
    tuple(vec![a, b])
}
pub fn nullable(inner: Arb) -> Arb {
    union(vec![inner, constant(Value::None)])
}
pub fn optional(inner: Arb) -> Arb {
    nullable(inner)
}

/// ready-made string shapes for the formats that come up constantly
/// in properties over external data
pub mod patterns {
    use super::Arb;
    use crate::value::Value;

    pub fn email() -> Arb {
        super::pattern("[a-z][a-z0-9]{0,7}(\\.[a-z0-9]{1,8})?@[a-z]{1,10}\\.[a-z]{2,3}", 32)
    }

    pub fn uuid() -> Arb {
        super::pattern(
            "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
            36,
        )
    }

    /// built from the algebra rather than a pattern: four octets
    /// mapped into dotted-quad text, so shrinking works octet-wise
    pub fn ipv4() -> Arb {
        super::tuple(vec![super::byte(), super::byte(), super::byte(), super::byte()]).map(|v| {
            let octets = v
                .list()
                .iter()
                .map(|o| o.int().to_string())
                .collect::<Vec<_>>();
            Value::Text(octets.join("."))
        })
    }

    pub fn url() -> Arb {
        super::pattern("https?://[a-z]{1,10}\\.[a-z]{2,3}(/[a-z0-9]{0,8}){0,3}", 48)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::Generator;

    #[test]
    fn presets_generate_what_they_promise() {
        let ref mut rng = Generator::from_seed(70);
        for pick in positive_int().sample(50, rng) {
            assert!(pick.value.int() > 0);
        }
        for pick in negative_int().sample(50, rng) {
            assert!(pick.value.int() < 0);
        }
        for pick in non_zero_int().sample(50, rng) {
            assert!(pick.value.int() != 0);
        }
        for pick in byte().sample(50, rng) {
            assert!((0..=255).contains(&pick.value.int()));
        }
        for pick in non_empty_text().sample(20, rng) {
            assert!(!pick.value.text().is_empty());
        }
    }

    #[test]
    fn nullable_covers_both_arms() {
        let ref mut rng = Generator::from_seed(71);
        let arb = nullable(integer(0, 3));
        let picks = arb.sample(100, rng);
        assert!(picks.iter().any(|p| p.value.is_none()));
        assert!(picks.iter().any(|p| !p.value.is_none()));
    }

    #[test]
    fn ipv4_is_a_dotted_quad() {
        let ref mut rng = Generator::from_seed(72);
        for pick in patterns::ipv4().sample(20, rng) {
            let text = pick.value.text().to_string();
            let octets = text.split('.').collect::<Vec<_>>();
            assert!(octets.len() == 4);
            assert!(octets.iter().all(|o| o.parse::<u16>().unwrap() <= 255));
        }
    }

    #[test]
    fn uuid_has_the_canonical_shape() {
        let ref mut rng = Generator::from_seed(73);
        for pick in patterns::uuid().sample(10, rng) {
            let text = pick.value.text();
            assert!(text.len() == 36);
            let groups = text.split('-').map(|g| g.len()).collect::<Vec<_>>();
            assert!(groups == vec![8, 4, 4, 4, 12]);
        }
    }

    #[test]
    fn email_contains_at_and_domain() {
        let ref mut rng = Generator::from_seed(74);
        for pick in patterns::email().sample(10, rng) {
            let text = pick.value.text();
            assert!(text.contains('@'));
            assert!(text.rsplit('.').next().unwrap().len() >= 2);
        }
    }
}
