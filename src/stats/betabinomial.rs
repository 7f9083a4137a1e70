use super::beta::Beta;
use super::beta::ln_beta;
use crate::Probability;
use crate::sampler::Generator;

/// number of successes in n trials whose success rate is itself
/// Beta(α, β) distributed. used to put credible intervals on the
/// size of filtered arbitraries: n candidate values, each passing
/// the filter with an uncertain rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetaBinomial {
    pub n: u64,
    pub alpha: f64,
    pub beta: f64,
}

/// past this support size an exact cdf scan is wasteful; the Beta
/// quantile scaled by n is indistinguishable at report precision.
const EXACT_SUPPORT_LIMIT: u64 = 10_000;

impl BetaBinomial {
    pub fn new(n: u64, alpha: f64, beta: f64) -> Self {
        assert!(alpha > 0. && beta > 0.);
        Self { n, alpha, beta }
    }

    fn ln_pmf(&self, k: u64) -> f64 {
        let n = self.n as f64;
        let k = k as f64;
        ln_choose(n, k) + ln_beta(k + self.alpha, n - k + self.beta)
            - ln_beta(self.alpha, self.beta)
    }

    pub fn pmf(&self, k: u64) -> Probability {
        self.ln_pmf(k).exp()
    }

    /// quantile over the discrete support [0, n]
    pub fn inv(&self, p: Probability) -> u64 {
        assert!((0. ..=1.).contains(&p));
        if self.n > EXACT_SUPPORT_LIMIT {
            let rate = Beta::new(self.alpha, self.beta).inv(p);
            return (rate * self.n as f64).round() as u64;
        }
        let mut cumulative = 0f64;
        for k in 0..=self.n {
            cumulative += self.pmf(k);
            if cumulative >= p {
                return k;
            }
        }
        self.n
    }

    pub fn sample(&self, rng: &mut Generator) -> u64 {
        self.inv(rng.unit())
    }
}

fn ln_choose(n: f64, k: f64) -> f64 {
    -((n + 1.).ln() + ln_beta(n - k + 1., k + 1.))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pmf_sums_to_one() {
        let distribution = BetaBinomial::new(20, 2., 3.);
        let total = (0..=20).map(|k| distribution.pmf(k)).sum::<f64>();
        assert!((total - 1.).abs() < 1e-9);
    }

    #[test]
    fn uniform_prior_is_flat() {
        // with Beta(1, 1) every count in [0, n] is equally likely
        let distribution = BetaBinomial::new(10, 1., 1.);
        for k in 0..=10 {
            assert!((distribution.pmf(k) - 1. / 11.).abs() < 1e-9);
        }
    }

    #[test]
    fn quantiles_are_monotone() {
        let distribution = BetaBinomial::new(50, 3., 2.);
        let q05 = distribution.inv(0.05);
        let q50 = distribution.inv(0.50);
        let q95 = distribution.inv(0.95);
        assert!(q05 <= q50 && q50 <= q95);
        assert!(q95 <= 50);
    }

    #[test]
    fn large_support_falls_back_to_beta_scaling() {
        let distribution = BetaBinomial::new(1_000_000, 100., 100.);
        let median = distribution.inv(0.5);
        assert!(median > 450_000 && median < 550_000);
    }
}
