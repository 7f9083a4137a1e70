use super::Arb;
use super::Arbitrary;
use super::Pick;
use super::Size;
use super::factory;
use crate::sampler::Generator;
use crate::value::Value;
use chrono::Datelike;
use chrono::Timelike;

/// the calendar family. each type is isomorphic to an integer offset
/// (days from CE, seconds from midnight, unix seconds), so picking,
/// indexing, and shrinking all ride on the same range arithmetic with
/// an epoch-flavored anchor playing the role of zero.
///
/// shrink-toward-anchor over a clamped window, shared by all four
fn narrowed(lo: i64, hi: i64, anchor: i64, value: i64) -> Option<(i64, i64)> {
    if value > anchor && lo.max(anchor) <= value - 1 {
        Some((lo.max(anchor), value - 1))
    } else if value < anchor && value + 1 <= hi.min(anchor) {
        Some((value + 1, hi.min(anchor)))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Dates {
    lo: chrono::NaiveDate,
    hi: chrono::NaiveDate,
}

impl Dates {
    pub fn new(lo: chrono::NaiveDate, hi: chrono::NaiveDate) -> Self {
        assert!(lo <= hi, "date range is empty");
        Self { lo, hi }
    }
    fn epoch() -> i64 {
        chrono::NaiveDate::from_ymd_opt(1970, 1, 1)
            .expect("valid date")
            .num_days_from_ce() as i64
    }
    fn date(days: i64) -> chrono::NaiveDate {
        chrono::NaiveDate::from_num_days_from_ce_opt(days as i32).expect("days in range")
    }
}

impl Arbitrary for Dates {
    fn label(&self) -> String {
        format!("date({}, {})", self.lo, self.hi)
    }
    fn size(&self) -> Size {
        Size::Exact((self.hi.num_days_from_ce() - self.lo.num_days_from_ce()) as u128 + 1)
    }
    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        let lo = self.lo.num_days_from_ce() as i64;
        let hi = self.hi.num_days_from_ce() as i64;
        let days = rng.int(lo, hi);
        let value = Value::Date(Self::date(days));
        Some(Pick::indexed(value.clone(), value, (days - lo) as u128))
    }
    fn corner_cases(&self) -> Vec<Pick> {
        let epoch = Self::date(Self::epoch());
        [self.lo, self.hi, epoch]
            .into_iter()
            .filter(|d| (self.lo..=self.hi).contains(d))
            .map(|d| Pick::primitive(Value::Date(d)))
            .collect()
    }
    fn shrink(&self, around: &Pick) -> Arb {
        let lo = self.lo.num_days_from_ce() as i64;
        let hi = self.hi.num_days_from_ce() as i64;
        let value = around.value.date().num_days_from_ce() as i64;
        match narrowed(lo, hi, Self::epoch(), value) {
            Some((a, b)) => factory::date(Self::date(a), Self::date(b)),
            None => factory::empty(),
        }
    }
    fn can_generate(&self, pick: &Pick) -> bool {
        match pick.value {
            Value::Date(d) => (self.lo..=self.hi).contains(&d),
            _ => false,
        }
    }
    fn index_of(&self, pick: &Pick, _depth: usize) -> Option<u128> {
        match self.can_generate(pick) {
            true => Some(
                (pick.value.date().num_days_from_ce() - self.lo.num_days_from_ce()) as u128,
            ),
            false => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Times {
    lo: chrono::NaiveTime,
    hi: chrono::NaiveTime,
}

impl Times {
    pub fn new(lo: chrono::NaiveTime, hi: chrono::NaiveTime) -> Self {
        assert!(lo <= hi, "time range is empty");
        Self { lo, hi }
    }
    fn time(secs: i64) -> chrono::NaiveTime {
        chrono::NaiveTime::from_num_seconds_from_midnight_opt(secs as u32, 0)
            .expect("seconds in range")
    }
}

impl Arbitrary for Times {
    fn label(&self) -> String {
        format!("time({}, {})", self.lo, self.hi)
    }
    fn size(&self) -> Size {
        let lo = self.lo.num_seconds_from_midnight();
        let hi = self.hi.num_seconds_from_midnight();
        Size::Exact((hi - lo) as u128 + 1)
    }
    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        let lo = self.lo.num_seconds_from_midnight() as i64;
        let hi = self.hi.num_seconds_from_midnight() as i64;
        let secs = rng.int(lo, hi);
        let value = Value::Time(Self::time(secs));
        Some(Pick::indexed(value.clone(), value, (secs - lo) as u128))
    }
    fn corner_cases(&self) -> Vec<Pick> {
        [self.lo, self.hi, Self::time(0)]
            .into_iter()
            .filter(|t| (self.lo..=self.hi).contains(t))
            .map(|t| Pick::primitive(Value::Time(t)))
            .collect()
    }
    fn shrink(&self, around: &Pick) -> Arb {
        let lo = self.lo.num_seconds_from_midnight() as i64;
        let hi = self.hi.num_seconds_from_midnight() as i64;
        let value = around.value.time().num_seconds_from_midnight() as i64;
        match narrowed(lo, hi, 0, value) {
            Some((a, b)) => factory::time(Self::time(a), Self::time(b)),
            None => factory::empty(),
        }
    }
    fn can_generate(&self, pick: &Pick) -> bool {
        match pick.value {
            Value::Time(t) => (self.lo..=self.hi).contains(&t),
            _ => false,
        }
    }
    fn index_of(&self, pick: &Pick, _depth: usize) -> Option<u128> {
        match self.can_generate(pick) {
            true => Some(
                (pick.value.time().num_seconds_from_midnight()
                    - self.lo.num_seconds_from_midnight()) as u128,
            ),
            false => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Stamps {
    lo: chrono::NaiveDateTime,
    hi: chrono::NaiveDateTime,
}

impl Stamps {
    pub fn new(lo: chrono::NaiveDateTime, hi: chrono::NaiveDateTime) -> Self {
        assert!(lo <= hi, "datetime range is empty");
        Self { lo, hi }
    }
    fn stamp(secs: i64) -> chrono::NaiveDateTime {
        chrono::DateTime::from_timestamp(secs, 0)
            .expect("seconds in range")
            .naive_utc()
    }
}

impl Arbitrary for Stamps {
    fn label(&self) -> String {
        format!("datetime({}, {})", self.lo, self.hi)
    }
    fn size(&self) -> Size {
        let lo = self.lo.and_utc().timestamp();
        let hi = self.hi.and_utc().timestamp();
        Size::Exact((hi - lo) as u128 + 1)
    }
    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        let lo = self.lo.and_utc().timestamp();
        let hi = self.hi.and_utc().timestamp();
        let secs = rng.int(lo, hi);
        let value = Value::Stamp(Self::stamp(secs));
        Some(Pick::indexed(value.clone(), value, (secs - lo) as u128))
    }
    fn corner_cases(&self) -> Vec<Pick> {
        [self.lo, self.hi, Self::stamp(0)]
            .into_iter()
            .filter(|t| (self.lo..=self.hi).contains(t))
            .map(|t| Pick::primitive(Value::Stamp(t)))
            .collect()
    }
    fn shrink(&self, around: &Pick) -> Arb {
        let lo = self.lo.and_utc().timestamp();
        let hi = self.hi.and_utc().timestamp();
        let value = around.value.stamp().and_utc().timestamp();
        match narrowed(lo, hi, 0, value) {
            Some((a, b)) => factory::datetime(Self::stamp(a), Self::stamp(b)),
            None => factory::empty(),
        }
    }
    fn can_generate(&self, pick: &Pick) -> bool {
        match pick.value {
            Value::Stamp(t) => (self.lo..=self.hi).contains(&t),
            _ => false,
        }
    }
    fn index_of(&self, pick: &Pick, _depth: usize) -> Option<u128> {
        match self.can_generate(pick) {
            true => Some(
                (pick.value.stamp().and_utc().timestamp() - self.lo.and_utc().timestamp())
                    as u128,
            ),
            false => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Spans {
    lo: chrono::Duration,
    hi: chrono::Duration,
}

impl Spans {
    pub fn new(lo: chrono::Duration, hi: chrono::Duration) -> Self {
        assert!(lo <= hi, "duration range is empty");
        Self { lo, hi }
    }
}

impl Arbitrary for Spans {
    fn label(&self) -> String {
        format!(
            "duration({}s, {}s)",
            self.lo.num_seconds(),
            self.hi.num_seconds()
        )
    }
    fn size(&self) -> Size {
        Size::Exact((self.hi.num_seconds() - self.lo.num_seconds()) as u128 + 1)
    }
    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        let secs = rng.int(self.lo.num_seconds(), self.hi.num_seconds());
        let value = Value::Span(chrono::Duration::seconds(secs));
        Some(Pick::indexed(
            value.clone(),
            value,
            (secs - self.lo.num_seconds()) as u128,
        ))
    }
    fn corner_cases(&self) -> Vec<Pick> {
        [self.lo, self.hi, chrono::Duration::zero()]
            .into_iter()
            .filter(|d| (self.lo..=self.hi).contains(d))
            .map(|d| Pick::primitive(Value::Span(d)))
            .collect()
    }
    fn shrink(&self, around: &Pick) -> Arb {
        let value = around.value.span().num_seconds();
        match narrowed(self.lo.num_seconds(), self.hi.num_seconds(), 0, value) {
            Some((a, b)) => {
                factory::duration(chrono::Duration::seconds(a), chrono::Duration::seconds(b))
            }
            None => factory::empty(),
        }
    }
    fn can_generate(&self, pick: &Pick) -> bool {
        match pick.value {
            Value::Span(d) => (self.lo..=self.hi).contains(&d),
            _ => false,
        }
    }
    fn index_of(&self, pick: &Pick, _depth: usize) -> Option<u128> {
        match self.can_generate(pick) {
            true => Some((pick.value.span().num_seconds() - self.lo.num_seconds()) as u128),
            false => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_pick_and_index_within_range() {
        let lo = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let hi = chrono::NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        let arb = Dates::new(lo, hi);
        assert!(arb.size() == Size::Exact(366));
        let ref mut rng = Generator::from_seed(50);
        for _ in 0..50 {
            let pick = arb.pick(rng).unwrap();
            assert!(arb.can_generate(&pick));
            assert!(pick.index.unwrap() < 366);
        }
    }

    #[test]
    fn dates_shrink_toward_the_epoch() {
        let lo = chrono::NaiveDate::from_ymd_opt(1960, 1, 1).unwrap();
        let hi = chrono::NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        let arb = Dates::new(lo, hi);
        let late = chrono::NaiveDate::from_ymd_opt(1985, 6, 1).unwrap();
        let shrunk = arb.shrink(&Pick::primitive(Value::Date(late)));
        let epoch = chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert!(shrunk.can_generate(&Pick::primitive(Value::Date(epoch))));
        assert!(!shrunk.can_generate(&Pick::primitive(Value::Date(late))));
        assert!(arb.shrink(&Pick::primitive(Value::Date(epoch))).is_never());
    }

    #[test]
    fn durations_anchor_at_zero() {
        let arb = Spans::new(chrono::Duration::seconds(-100), chrono::Duration::seconds(100));
        let corners = Arb::new(arb).corner_cases();
        assert!(corners.len() == 3);
        let shrunk = arb.shrink(&Pick::primitive(Value::Span(chrono::Duration::seconds(-60))));
        assert!(shrunk.can_generate(&Pick::primitive(Value::Span(chrono::Duration::seconds(-10)))));
        assert!(!shrunk.can_generate(&Pick::primitive(Value::Span(chrono::Duration::seconds(60)))));
    }

    #[test]
    fn midnight_is_the_minimal_time() {
        let arb = Times::new(
            chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
            chrono::NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
        );
        let midnight = chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        assert!(arb.shrink(&Pick::primitive(Value::Time(midnight))).is_never());
    }
}
