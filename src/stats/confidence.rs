use super::beta::Beta;
use crate::Confidence;
use crate::Probability;

/// the Bayesian early-termination rule. after s passes and f fails
/// the posterior over the true pass rate is Beta(α₀+s, β₀+f); the
/// run may stop once P(rate > threshold) reaches the target level.
///
/// the default prior stays uniform. at extreme thresholds the
/// uniform prior grows confidence slowly, so an informative prior
/// is available through Strategy for callers who want it.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub level: Confidence,
    pub threshold: Probability,
    pub interval: usize,
    pub prior: Beta,
}

/// the outcome of one boundary evaluation
#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub confidence: Confidence,
    pub met: bool,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            level: crate::DEFAULT_CONFIDENCE_LEVEL,
            threshold: crate::DEFAULT_PASS_RATE_THRESHOLD,
            interval: crate::CONFIDENCE_CHECK_INTERVAL,
            prior: Beta::uniform(),
        }
    }
}

impl Rule {
    /// P(pass rate > threshold | s passes, f fails)
    pub fn confidence(&self, passes: usize, fails: usize) -> Confidence {
        1. - self.prior.posterior(passes, fails).cdf(self.threshold)
    }

    /// checks happen only at interval boundaries, and only once
    /// enough tests have run for the posterior to mean anything
    fn boundary(&self, tests: usize) -> bool {
        tests >= crate::MIN_TESTS_FOR_CONFIDENCE
            && tests >= self.interval
            && tests % self.interval == 0
    }

    /// evaluate the rule at a boundary: the posterior confidence and
    /// whether it crossed the level. None off-boundary, so callers can
    /// record the confidence trace without re-deriving the schedule.
    pub fn check(&self, tests: usize, passes: usize, fails: usize) -> Option<Check> {
        if !self.boundary(tests) {
            return None;
        }
        let confidence = self.confidence(passes, fails);
        log::debug!(
            "confidence check @ {} tests: {:.6} (level {})",
            tests,
            confidence,
            self.level
        );
        Some(Check {
            confidence,
            met: confidence >= self.level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_monotone_in_passes() {
        let rule = Rule {
            threshold: 0.9,
            ..Rule::default()
        };
        let mut last = 0f64;
        for passes in (100..2000).step_by(100) {
            let confidence = rule.confidence(passes, 0);
            assert!(confidence >= last);
            last = confidence;
        }
        assert!(last > 0.95);
    }

    #[test]
    fn never_fires_before_minimum() {
        let rule = Rule::default();
        for tests in 0..crate::MIN_TESTS_FOR_CONFIDENCE {
            assert!(rule.check(tests, tests, 0).is_none());
        }
    }

    #[test]
    fn fires_only_on_interval_boundaries() {
        let rule = Rule {
            threshold: 0.5,
            ..Rule::default()
        };
        assert!(rule.check(150, 150, 0).is_none());
        let check = rule.check(100, 100, 0).expect("boundary");
        assert!(check.met);
        assert!(check.confidence >= rule.level);
    }

    #[test]
    fn failures_defeat_extreme_thresholds() {
        let rule = Rule::default();
        // one failure in 100 makes P(rate > 0.999) negligible
        let check = rule.check(100, 99, 1).expect("boundary");
        assert!(!check.met);
        assert!(check.confidence < rule.level);
    }

    #[test]
    fn informative_prior_converges_faster() {
        let uniform = Rule {
            threshold: 0.99,
            ..Rule::default()
        };
        let informed = Rule {
            threshold: 0.99,
            prior: Beta::new(50., 1.),
            ..Rule::default()
        };
        assert!(informed.confidence(100, 0) > uniform.confidence(100, 0));
    }
}
