use super::Arb;
use super::Arbitrary;
use super::Pick;
use super::Size;
use super::factory;
use crate::sampler::Generator;
use crate::value::Value;

/// uniform reals in [lo, hi]. the continuous domain is indexed (and
/// sized) at a discretisation depth of 10^depth slots per unit.
#[derive(Debug, Clone, Copy)]
pub struct Real {
    lo: f64,
    hi: f64,
}

impl Real {
    pub fn new(lo: f64, hi: f64) -> Self {
        assert!(lo.is_finite() && hi.is_finite() && lo <= hi, "real range is empty");
        Self { lo, hi }
    }

    fn slots(&self, depth: usize) -> u128 {
        ((self.hi - self.lo) * 10f64.powi(depth as i32)) as u128 + 1
    }
}

impl Arbitrary for Real {
    fn label(&self) -> String {
        format!("real({}, {})", self.lo, self.hi)
    }

    fn size(&self) -> Size {
        Size::Exact(self.slots(crate::REAL_INDEX_DEPTH))
    }

    fn pick(&self, rng: &mut Generator) -> Option<Pick> {
        let value = self.lo + rng.unit() * (self.hi - self.lo);
        Some(Pick::primitive(Value::Real(value)))
    }

    fn corner_cases(&self) -> Vec<Pick> {
        [0., self.lo, self.hi]
            .into_iter()
            .filter(|v| (self.lo..=self.hi).contains(v))
            .map(|v| Pick::primitive(Value::Real(v)))
            .collect()
    }

    /// halve the distance to zero each round; the geometric step is
    /// what makes real shrinking converge under a bounded budget
    fn shrink(&self, around: &Pick) -> Arb {
        let value = around.value.real();
        if value > f64::EPSILON && self.lo <= 0. {
            factory::real(self.lo.max(0.), value / 2.)
        } else if value > f64::EPSILON && self.lo > 0. && value / 2. >= self.lo {
            factory::real(self.lo, value / 2.)
        } else if value < -f64::EPSILON && self.hi >= 0. {
            factory::real(value / 2., self.hi.min(0.))
        } else if value < -f64::EPSILON && self.hi < 0. && value / 2. <= self.hi {
            factory::real(value / 2., self.hi)
        } else {
            factory::empty()
        }
    }

    fn can_generate(&self, pick: &Pick) -> bool {
        match pick.value {
            Value::Real(v) => (self.lo..=self.hi).contains(&v),
            _ => false,
        }
    }

    fn index_of(&self, pick: &Pick, depth: usize) -> Option<u128> {
        match self.can_generate(pick) {
            true => Some(((pick.value.real() - self.lo) * 10f64.powi(depth as i32)) as u128),
            false => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_stay_in_bounds() {
        let arb = Real::new(-2.5, 2.5);
        let ref mut rng = Generator::from_seed(3);
        for _ in 0..200 {
            let pick = arb.pick(rng).unwrap();
            assert!(arb.can_generate(&pick));
        }
    }

    #[test]
    fn corner_cases_include_zero_and_bounds() {
        let corners = Arb::new(Real::new(-1., 1.)).corner_cases();
        let values = corners.iter().map(|p| p.value.real()).collect::<Vec<_>>();
        assert!(values == vec![0., -1., 1.]);
    }

    #[test]
    fn index_discretises_at_requested_depth() {
        let arb = Real::new(0., 10.);
        let pick = Pick::primitive(Value::Real(2.5));
        assert!(arb.index_of(&pick, 0) == Some(2));
        assert!(arb.index_of(&pick, 2) == Some(250));
    }

    #[test]
    fn shrink_halves_toward_zero() {
        let arb = Real::new(-100., 100.);
        let shrunk = arb.shrink(&Pick::primitive(Value::Real(64.)));
        assert!(shrunk.can_generate(&Pick::primitive(Value::Real(16.))));
        assert!(!shrunk.can_generate(&Pick::primitive(Value::Real(64.))));
        assert!(arb.shrink(&Pick::primitive(Value::Real(0.))).is_never());
    }
}
