pub mod harness;
pub mod outcome;
pub mod result;

pub use result::RunResult;
pub use result::RunStatistics;
pub use result::TargetSummary;

use crate::Seed;
use crate::arbitrary::Pick;
use crate::sampler::BiasedSampler;
use crate::sampler::CachedSampler;
use crate::sampler::DedupingSampler;
use crate::sampler::Generator;
use crate::sampler::RandomSampler;
use crate::sampler::Sampler;
use crate::scenario::Bindings;
use crate::scenario::Kind;
use crate::scenario::Node;
use crate::scenario::Progress;
use crate::scenario::Scenario;
use crate::scenario::Strategy;
use crate::scenario::Verbosity;
use crate::shrinker::Shrinker;
use crate::stats::beta::Beta;
use crate::stats::confidence::Rule;
use crate::stats::context::Context;
use crate::stats::histogram::Histogram;
use harness::Harness;
use harness::Quantifier;
use harness::Setup;
use outcome::CaseVerdict;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::time::Duration;
use std::time::Instant;

/// why a run stopped before exhausting its sample budget
#[derive(Debug, Clone, Copy)]
enum Stop {
    Confidence(f64),
    Timeout,
    Exhausted,
}

/// walks the scenario root-to-leaf, builds the nested sampling loops
/// leaf-to-root, and decides satisfiability. failures hand off to the
/// shrinker before the result is reported.
///
/// run lifecycle: initial → exploring → {succeeded | failed →
/// shrinking | timed_out | confidence_met} → reported. only the
/// failing branch enters the shrinker; the rest finalize directly.
pub struct Explorer {
    strategy: Strategy,
    quantifiers: Vec<Quantifier>,
    harness: Harness,
}

struct RunState {
    sampler: Box<dyn Sampler>,
    context: Context,
    rule: Rule,
    universal_only: bool,
    vacant: Vec<bool>,
    tests_run: usize,
    tests_passed: usize,
    tests_discarded: usize,
    started: Instant,
    deadline: Option<Instant>,
    stop: Option<Stop>,
    witness: Option<BTreeMap<String, Pick>>,
    counterexample: Option<BTreeMap<String, Pick>>,
    distributions: BTreeMap<String, Histogram>,
    confidence: Option<f64>,
    confidence_checks: usize,
    last_progress_test: usize,
    last_progress_time: Instant,
}

impl RunState {
    fn observe(&mut self, name: &str, pick: &Pick) {
        if let Some(index) = pick.index {
            self.distributions
                .entry(name.to_string())
                .or_default()
                .witness(index as f64);
        }
    }
}

impl Explorer {
    /// flatten the scenario chain into quantifiers, setup steps, and
    /// the assertion conjunction. a chain without an assertion is the
    /// one misuse the public API refuses to run.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self, crate::Error> {
        let mut strategy = Strategy::default();
        let mut seed = None;
        let mut quantifiers = Vec::new();
        let mut setup = Vec::new();
        let mut asserts = Vec::new();
        for node in scenario.nodes() {
            match node {
                Node::Config { strategy: s } => strategy = s.clone(),
                Node::Seed(s) => seed = Some(*s),
                Node::Quantifier { name, kind, arb } => quantifiers.push(Quantifier {
                    name: name.clone(),
                    kind: *kind,
                    arb: arb.clone(),
                }),
                Node::GivenConstant { name, value } => {
                    setup.push(Setup::Constant(name.clone(), value.clone()))
                }
                Node::GivenFactory { name, factory } => {
                    setup.push(Setup::Factory(name.clone(), factory.clone()))
                }
                Node::When { effect } => setup.push(Setup::Effect(effect.clone())),
                Node::Assert { predicate } => asserts.push(predicate.clone()),
            }
        }
        if let Some(seed) = seed {
            strategy.seed = Some(seed);
        }
        if asserts.is_empty() {
            return Err(crate::Error::MissingAssertion);
        }
        Ok(Self {
            strategy,
            quantifiers,
            harness: Harness { setup, asserts },
        })
    }

    pub fn run(self) -> RunResult {
        let seed = self.strategy.seed.unwrap_or_else(rand::random);
        if self.strategy.coverage_guidance.is_some() {
            log::warn!("coverage guidance is not supported by the core engine; ignoring");
        }
        if self.strategy.constant_extraction {
            log::debug!("constant extraction is unavailable; seed literals via with_constants");
        }
        if self.strategy.verbosity >= Verbosity::Verbose {
            log::info!("exploring with seed {}", seed);
        }
        for quantifier in self.quantifiers.iter() {
            quantifier.arb.reset();
        }
        let started = Instant::now();
        let (alpha, beta) = self.strategy.prior;
        let mut state = RunState {
            sampler: Self::stack(&self.strategy, seed),
            context: Context::seeded(seed),
            rule: Rule {
                level: self.strategy.confidence_level,
                threshold: self.strategy.pass_rate_threshold,
                interval: self.strategy.confidence_check_interval,
                prior: Beta::new(alpha, beta),
            },
            universal_only: self.quantifiers.iter().all(|q| q.kind == Kind::Universal),
            vacant: self
                .quantifiers
                .iter()
                .map(|q| q.arb.size().value() == 0)
                .collect(),
            tests_run: 0,
            tests_passed: 0,
            tests_discarded: 0,
            started,
            deadline: self.strategy.timeout.map(|t| started + t),
            stop: None,
            witness: None,
            counterexample: None,
            distributions: BTreeMap::new(),
            confidence: None,
            confidence_checks: 0,
            last_progress_test: 0,
            last_progress_time: started,
        };

        let mut record = BTreeMap::new();
        let verdict = self.explore(0, &mut record, &mut state);
        let satisfiable = verdict != CaseVerdict::Fails;

        let has_universal = self.quantifiers.iter().any(|q| q.kind == Kind::Universal);
        let has_existential = !state.universal_only && !self.quantifiers.is_empty();
        let mut example = Bindings::default();
        let mut shrink_attempts = 0;
        let mut shrink_rounds = 0;
        if !satisfiable {
            if let Some(counterexample) = state.counterexample.clone() {
                if has_universal {
                    let shrinker = Shrinker {
                        harness: &self.harness,
                        quantifiers: self.quantifiers.clone(),
                        desired: CaseVerdict::Fails,
                        max_attempts: self.strategy.max_shrink_attempts,
                        max_rounds: self.strategy.max_shrink_rounds,
                        per_round: self.strategy.shrink_size.min(crate::SHRINK_CANDIDATES_PER_ROUND),
                        deadline: state.deadline,
                    };
                    let shrunk = shrinker.minimize(
                        counterexample,
                        state.sampler.as_mut(),
                        &mut state.context,
                    );
                    shrink_attempts = shrunk.attempts;
                    shrink_rounds = shrunk.rounds;
                    example = self.filtered(&shrunk.record, Kind::Universal);
                }
            }
        } else if has_existential {
            if let Some(witness) = state.witness.clone() {
                let shrinker = Shrinker {
                    harness: &self.harness,
                    quantifiers: self
                        .quantifiers
                        .iter()
                        .filter(|q| q.kind == Kind::Existential)
                        .cloned()
                        .collect(),
                    desired: CaseVerdict::Holds,
                    max_attempts: self.strategy.max_shrink_attempts,
                    max_rounds: self.strategy.max_shrink_rounds,
                    per_round: self.strategy.shrink_size.min(crate::SHRINK_CANDIDATES_PER_ROUND),
                    deadline: state.deadline,
                };
                let shrunk =
                    shrinker.minimize(witness, state.sampler.as_mut(), &mut state.context);
                shrink_attempts = shrunk.attempts;
                shrink_rounds = shrunk.rounds;
                example = self.filtered(&shrunk.record, Kind::Existential);
            }
        }

        let statistics = RunStatistics {
            tests_run: state.tests_run,
            tests_passed: state.tests_passed,
            tests_discarded: state.tests_discarded,
            events: state.context.events().clone(),
            targets: state
                .context
                .targets()
                .iter()
                .map(|(label, metric)| (label.clone(), TargetSummary::from(metric)))
                .collect(),
            distributions: state.distributions.clone(),
            confidence: state.confidence,
            confidence_checks: state.confidence_checks,
            early_termination: matches!(state.stop, Some(Stop::Confidence(_))),
            timed_out: matches!(state.stop, Some(Stop::Timeout)),
            shrink_attempts,
            shrink_rounds,
        };
        if self.strategy.log_statistics {
            let report = crate::report::Reporter::format(
                &statistics,
                crate::report::Format::Text,
                &crate::report::Options::default(),
            );
            log::info!("\n{}", report);
        }
        let result = RunResult {
            satisfiable,
            example,
            seed,
            tests_run: state.tests_run,
            tests_passed: state.tests_passed,
            tests_discarded: state.tests_discarded,
            execution_time_ms: started.elapsed().as_millis(),
            statistics,
        };
        if self.strategy.verbosity >= Verbosity::Verbose {
            log::info!("{}", result);
        }
        result
    }

    /// the nested sampling loops, leaf-to-root. a universal quantifier
    /// stops at its first failing pick, an existential at its first
    /// succeeding one; a quantifier over an empty domain is vacuously
    /// true under ∀ and unsatisfiable under ∃.
    fn explore(
        &self,
        depth: usize,
        record: &mut BTreeMap<String, Pick>,
        state: &mut RunState,
    ) -> CaseVerdict {
        if depth == self.quantifiers.len() {
            return self.case(record, state);
        }
        let quantifier = &self.quantifiers[depth];
        if state.vacant[depth] {
            return match quantifier.kind {
                Kind::Universal => CaseVerdict::Holds,
                Kind::Existential => CaseVerdict::Fails,
            };
        }
        let n = self.strategy.sample_size;
        let picks = match self.strategy.bias {
            true => state.sampler.sample_with_bias(&quantifier.arb, n),
            false => state.sampler.sample(&quantifier.arb, n),
        };
        match quantifier.kind {
            Kind::Universal => {
                for pick in picks {
                    if state.stop.is_some() {
                        break;
                    }
                    if pick.is_none() {
                        state.tests_discarded += 1;
                        continue;
                    }
                    state.observe(&quantifier.name, &pick);
                    record.insert(quantifier.name.clone(), pick);
                    if self.explore(depth + 1, record, state) == CaseVerdict::Fails {
                        return CaseVerdict::Fails;
                    }
                }
                CaseVerdict::Holds
            }
            Kind::Existential => {
                for pick in picks {
                    if state.stop.is_some() {
                        break;
                    }
                    if pick.is_none() {
                        state.tests_discarded += 1;
                        continue;
                    }
                    state.observe(&quantifier.name, &pick);
                    record.insert(quantifier.name.clone(), pick);
                    if self.explore(depth + 1, record, state) == CaseVerdict::Holds {
                        return CaseVerdict::Holds;
                    }
                }
                CaseVerdict::Fails
            }
        }
    }

    /// one materialized test case at the leaf, with the bookkeeping
    /// that surrounds it: budget, deadline, confidence, progress
    fn case(&self, record: &BTreeMap<String, Pick>, state: &mut RunState) -> CaseVerdict {
        if state.stop.is_some() {
            return CaseVerdict::Discarded;
        }
        if let Some(deadline) = state.deadline {
            if Instant::now() >= deadline {
                log::info!("deadline reached after {} tests", state.tests_run);
                state.stop = Some(Stop::Timeout);
                return CaseVerdict::Discarded;
            }
        }
        if state.tests_run >= self.strategy.sample_size {
            state.stop = Some(Stop::Exhausted);
            return CaseVerdict::Discarded;
        }
        let verdict = self.harness.evaluate(record, &mut state.context);
        match verdict {
            CaseVerdict::Holds => {
                state.tests_run += 1;
                state.tests_passed += 1;
                state.witness = Some(record.clone());
            }
            CaseVerdict::Fails => {
                state.tests_run += 1;
                state.counterexample = Some(record.clone());
                if self.strategy.verbosity >= Verbosity::Debug {
                    log::debug!("failing case at test {}", state.tests_run);
                }
            }
            CaseVerdict::Discarded => state.tests_discarded += 1,
        }
        let fails = state.tests_run - state.tests_passed;
        if let Some(check) = state.rule.check(state.tests_run, state.tests_passed, fails) {
            state.confidence = Some(check.confidence);
            state.confidence_checks += 1;
            if state.universal_only && check.met {
                if self.strategy.verbosity >= Verbosity::Verbose {
                    log::info!(
                        "confidence {:.4} reached after {} tests",
                        check.confidence,
                        state.tests_run
                    );
                }
                state.stop = Some(Stop::Confidence(check.confidence));
            }
        }
        self.progress(state);
        verdict
    }

    /// progress callbacks fire every progress_interval tests, further
    /// throttled by a wall-clock window; a panicking callback is the
    /// user's problem only to the extent of a warning
    fn progress(&self, state: &mut RunState) {
        let Some(callback) = self.strategy.on_progress.as_ref() else {
            return;
        };
        if state.tests_run - state.last_progress_test < self.strategy.progress_interval {
            return;
        }
        if state.last_progress_time.elapsed() < Duration::from_millis(crate::PROGRESS_WINDOW_MS) {
            return;
        }
        state.last_progress_test = state.tests_run;
        state.last_progress_time = Instant::now();
        let progress = Progress {
            tests_run: state.tests_run,
            tests_passed: state.tests_passed,
            tests_discarded: state.tests_discarded,
            elapsed: state.started.elapsed(),
        };
        if catch_unwind(AssertUnwindSafe(|| callback(&progress))).is_err() {
            log::warn!("progress callback panicked; continuing");
        }
    }

    fn filtered(&self, record: &BTreeMap<String, Pick>, kind: Kind) -> Bindings {
        self.quantifiers
            .iter()
            .filter(|q| q.kind == kind)
            .filter_map(|q| {
                record
                    .get(&q.name)
                    .map(|pick| (q.name.clone(), pick.value.clone()))
            })
            .collect()
    }

    /// the run's sampler composition: Deduping?(Cached(Biased(Random)))
    fn stack(strategy: &Strategy, seed: Seed) -> Box<dyn Sampler> {
        let random = RandomSampler::new(Generator::from_seed(seed));
        let biased = BiasedSampler::new(Box::new(random), strategy.constants.clone());
        let cached = CachedSampler::new(Box::new(biased));
        match strategy.dedup {
            true => Box::new(DedupingSampler::new(Box::new(cached))),
            false => Box::new(cached),
        }
    }
}
