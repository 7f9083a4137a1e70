use crate::Confidence;
use crate::Probability;
use crate::Seed;
use crate::value::Value;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

/// how chatty a run is. maps onto the log facade: Quiet only surfaces
/// errors, Debug narrates every shrink candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl std::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
            Self::Debug => write!(f, "debug"),
        }
    }
}

/// a snapshot handed to the progress callback
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub tests_run: usize,
    pub tests_passed: usize,
    pub tests_discarded: usize,
    pub elapsed: Duration,
}

/// everything a run can be tuned by. constructed with Default and
/// adjusted through the with_* builders; the scenario's Config nodes
/// lay later strategies over earlier ones.
#[derive(Clone)]
pub struct Strategy {
    pub sample_size: usize,
    pub shrink_size: usize,
    pub bias: bool,
    pub dedup: bool,
    pub confidence_level: Confidence,
    pub pass_rate_threshold: Probability,
    pub confidence_check_interval: usize,
    pub prior: (f64, f64),
    pub timeout: Option<Duration>,
    pub verbosity: Verbosity,
    pub log_statistics: bool,
    pub on_progress: Option<Rc<dyn Fn(&Progress)>>,
    pub progress_interval: usize,
    pub max_shrink_attempts: usize,
    pub max_shrink_rounds: usize,
    pub coverage_guidance: Option<PathBuf>,
    pub constant_extraction: bool,
    pub constants: Vec<Value>,
    pub seed: Option<Seed>,
}

impl Default for Strategy {
    fn default() -> Self {
        Self {
            sample_size: crate::DEFAULT_SAMPLE_SIZE,
            shrink_size: crate::DEFAULT_SHRINK_SIZE,
            bias: true,
            dedup: false,
            confidence_level: crate::DEFAULT_CONFIDENCE_LEVEL,
            pass_rate_threshold: crate::DEFAULT_PASS_RATE_THRESHOLD,
            confidence_check_interval: crate::CONFIDENCE_CHECK_INTERVAL,
            prior: (1., 1.),
            timeout: None,
            verbosity: Verbosity::Normal,
            log_statistics: false,
            on_progress: None,
            progress_interval: crate::PROGRESS_INTERVAL,
            max_shrink_attempts: crate::DEFAULT_SHRINK_ATTEMPTS,
            max_shrink_rounds: crate::DEFAULT_SHRINK_ROUNDS,
            coverage_guidance: None,
            constant_extraction: false,
            constants: Vec::new(),
            seed: None,
        }
    }
}

impl Strategy {
    pub fn with_sample_size(mut self, n: usize) -> Self {
        self.sample_size = n;
        self
    }
    pub fn with_shrink_size(mut self, n: usize) -> Self {
        self.shrink_size = n;
        self
    }
    pub fn with_bias(mut self, bias: bool) -> Self {
        self.bias = bias;
        self
    }
    pub fn with_dedup(mut self, dedup: bool) -> Self {
        self.dedup = dedup;
        self
    }
    pub fn with_confidence_level(mut self, level: Confidence) -> Self {
        self.confidence_level = level;
        self
    }
    pub fn with_pass_rate_threshold(mut self, threshold: Probability) -> Self {
        self.pass_rate_threshold = threshold;
        self
    }
    pub fn with_confidence_check_interval(mut self, interval: usize) -> Self {
        self.confidence_check_interval = interval.max(1);
        self
    }
    /// an informative Beta prior for callers who find Beta(1, 1) too
    /// slow at extreme thresholds
    pub fn with_prior(mut self, alpha: f64, beta: f64) -> Self {
        self.prior = (alpha, beta);
        self
    }
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
    pub fn with_log_statistics(mut self, log: bool) -> Self {
        self.log_statistics = log;
        self
    }
    pub fn with_progress(mut self, callback: impl Fn(&Progress) + 'static) -> Self {
        self.on_progress = Some(Rc::new(callback));
        self
    }
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }
    pub fn with_shrink_budget(mut self, attempts: usize, rounds: usize) -> Self {
        self.max_shrink_attempts = attempts;
        self.max_shrink_rounds = rounds;
        self
    }
    pub fn with_coverage_guidance(mut self, path: PathBuf) -> Self {
        self.coverage_guidance = Some(path);
        self
    }
    pub fn with_constant_extraction(mut self, enabled: bool) -> Self {
        self.constant_extraction = enabled;
        self
    }
    /// literals to fold into the biased sampling prefix
    pub fn with_constants(mut self, constants: Vec<Value>) -> Self {
        self.constants = constants;
        self
    }
    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let strategy = Strategy::default();
        assert!(strategy.sample_size == 1000);
        assert!(strategy.shrink_size == 500);
        assert!(strategy.confidence_level == 0.95);
        assert!(strategy.pass_rate_threshold == 0.999);
        assert!(strategy.confidence_check_interval == 100);
        assert!(strategy.progress_interval == 100);
        assert!(strategy.max_shrink_attempts == 500);
        assert!(strategy.max_shrink_rounds == 50);
        assert!(strategy.prior == (1., 1.));
    }

    #[test]
    fn verbosity_is_ordered() {
        assert!(Verbosity::Quiet < Verbosity::Normal);
        assert!(Verbosity::Verbose < Verbosity::Debug);
    }
}
