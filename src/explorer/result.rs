use crate::Seed;
use crate::scenario::Bindings;
use crate::stats::context::Metric;
use crate::stats::histogram::Histogram;
use std::collections::BTreeMap;

/// the reportable digest of one target label
#[derive(Debug, Clone, serde::Serialize)]
pub struct TargetSummary {
    pub count: usize,
    pub mean: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

impl From<&Metric> for TargetSummary {
    fn from(metric: &Metric) -> Self {
        let (p25, p50, p75) = metric.reservoir.quartiles().unwrap_or((0., 0., 0.));
        Self {
            count: metric.online.count(),
            mean: metric.online.mean(),
            stddev: metric.online.stddev(),
            min: metric.online.min(),
            max: metric.online.max(),
            p25,
            p50,
            p75,
        }
    }
}

/// everything observed while a run explored its input space, in a
/// shape the reporter can serialize directly.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct RunStatistics {
    pub tests_run: usize,
    pub tests_passed: usize,
    pub tests_discarded: usize,
    pub events: BTreeMap<String, usize>,
    pub targets: BTreeMap<String, TargetSummary>,
    /// per-quantifier distributions of sampled domain indices
    pub distributions: BTreeMap<String, Histogram>,
    pub confidence: Option<f64>,
    pub confidence_checks: usize,
    pub early_termination: bool,
    pub timed_out: bool,
    pub shrink_attempts: usize,
    pub shrink_rounds: usize,
}

/// the verdict of one run. satisfiable carries a witness (filtered to
/// the existential names), unsatisfiable a counterexample (filtered
/// to the universal names); the seed replays the run exactly.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub satisfiable: bool,
    pub example: Bindings,
    pub seed: Seed,
    pub tests_run: usize,
    pub tests_passed: usize,
    pub tests_discarded: usize,
    pub execution_time_ms: u128,
    pub statistics: RunStatistics,
}

impl RunResult {
    fn blame(&self, label: &str, expectation: &str) -> String {
        let label = match label.is_empty() {
            true => String::new(),
            false => format!("{}: ", label),
        };
        format!(
            "{}{}; example {} (seed {}, {} tests)",
            label, expectation, self.example, self.seed, self.tests_run
        )
    }

    pub fn assert_satisfiable(&self) {
        self.assert_satisfiable_msg("");
    }
    pub fn assert_satisfiable_msg(&self, label: &str) {
        if !self.satisfiable {
            panic!("{}", self.blame(label, "expected satisfiable, found counterexample"));
        }
    }

    pub fn assert_not_satisfiable(&self) {
        self.assert_not_satisfiable_msg("");
    }
    pub fn assert_not_satisfiable_msg(&self, label: &str) {
        if self.satisfiable {
            panic!("{}", self.blame(label, "expected not satisfiable, found witness"));
        }
    }

    /// every binding of `expected` must appear in the example
    pub fn assert_example(&self, expected: &Bindings) {
        self.assert_example_msg(expected, "");
    }
    pub fn assert_example_msg(&self, expected: &Bindings, label: &str) {
        if !self.example.covers(expected) {
            panic!(
                "{}",
                self.blame(label, &format!("expected example covering {}", expected))
            );
        }
    }
}

impl std::fmt::Display for RunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} after {} tests ({} passed, {} discarded, seed {})",
            match self.satisfiable {
                true => "satisfiable",
                false => "not satisfiable",
            },
            self.tests_run,
            self.tests_passed,
            self.tests_discarded,
            self.seed,
        )?;
        if !self.example.is_empty() {
            write!(f, " with {}", self.example)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn passing() -> RunResult {
        RunResult {
            satisfiable: true,
            example: [("b".to_string(), Value::Int(0))].into_iter().collect(),
            seed: 42,
            tests_run: 100,
            tests_passed: 100,
            tests_discarded: 0,
            execution_time_ms: 1,
            statistics: RunStatistics::default(),
        }
    }

    #[test]
    fn assertions_pass_on_matching_verdicts() {
        passing().assert_satisfiable();
        let expected = [("b".to_string(), Value::Int(0))].into_iter().collect();
        passing().assert_example(&expected);
    }

    #[test]
    #[should_panic(expected = "expected not satisfiable")]
    fn mismatched_assertion_panics_with_seed() {
        passing().assert_not_satisfiable();
    }

    #[test]
    #[should_panic(expected = "threshold check")]
    fn labels_lead_the_message() {
        passing().assert_not_satisfiable_msg("threshold check");
    }
}
