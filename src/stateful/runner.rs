use super::command::Command;
use crate::Seed;
use crate::sampler::Generator;
use crate::scenario::Bindings;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::rc::Rc;

/// tuning for a stateful check
#[derive(Debug, Clone)]
pub struct StatefulConfig {
    pub num_runs: usize,
    pub max_commands: usize,
    pub seed: Option<Seed>,
    pub verbose: bool,
}

impl Default for StatefulConfig {
    fn default() -> Self {
        Self {
            num_runs: crate::DEFAULT_NUM_RUNS,
            max_commands: crate::DEFAULT_MAX_COMMANDS,
            seed: None,
            verbose: false,
        }
    }
}

impl StatefulConfig {
    pub fn with_num_runs(mut self, n: usize) -> Self {
        self.num_runs = n;
        self
    }
    pub fn with_max_commands(mut self, n: usize) -> Self {
        self.max_commands = n;
        self
    }
    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// one generated step: which command, with which drawn arguments
#[derive(Clone)]
pub struct Step {
    pub command: usize,
    pub args: Bindings,
}

/// a step as reported back to the caller
#[derive(Debug, Clone)]
pub struct StepReport {
    pub command: String,
    pub args: Bindings,
}

impl std::fmt::Display for StepReport {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.args.is_empty() {
            true => write!(f, "{}", self.command),
            false => write!(f, "{}{}", self.command, self.args),
        }
    }
}

/// what a failing replay looked like
#[derive(Debug, Clone)]
struct Failure {
    step: usize,
    command: String,
    message: String,
}

/// the verdict of a stateful check
#[derive(Debug, Clone)]
pub struct StatefulResult {
    pub success: bool,
    pub num_runs: usize,
    pub seed: Seed,
    pub failing_sequence: Option<Vec<StepReport>>,
    pub shrunk_sequence: Option<Vec<StepReport>>,
    pub error: Option<String>,
}

impl StatefulResult {
    pub fn assert_success(&self) {
        if !self.success {
            panic!(
                "stateful check failed after {} runs (seed {}): {}\nshrunk sequence: [{}]",
                self.num_runs,
                self.seed,
                self.error.as_deref().unwrap_or("unknown"),
                self.shrunk_sequence
                    .iter()
                    .flatten()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
    }
}

/// generates command sequences against the model, replays them
/// against model and SUT in lockstep, and minimizes whatever fails.
pub struct Runner<M, S> {
    pub(crate) model: Rc<dyn Fn() -> M>,
    pub(crate) sut: Rc<dyn Fn() -> S>,
    pub(crate) commands: Vec<Command<M, S>>,
    pub(crate) invariants: Vec<(String, Rc<dyn Fn(&M, &S) -> bool>)>,
}

impl<M, S> Runner<M, S> {
    pub fn check(&self, config: &StatefulConfig) -> StatefulResult {
        assert!(!self.commands.is_empty(), "no commands declared");
        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!(
            "stateful check: {} runs x {} commands (seed {})",
            config.num_runs,
            config.max_commands,
            seed
        );
        let root = Generator::from_seed(seed);
        for run in 0..config.num_runs {
            let ref mut rng = root.derived(run);
            let sequence = self.generate(rng, config);
            if let Some(failure) = self.replay(&sequence) {
                log::info!(
                    "run {} failed at step {} ({}); shrinking",
                    run,
                    failure.step,
                    failure.command
                );
                let shrunk = self.shrink(&sequence);
                let error = self
                    .replay(&shrunk)
                    .map(|f| format!("step {} ({}): {}", f.step, f.command, f.message))
                    .unwrap_or(failure.message.clone());
                return StatefulResult {
                    success: false,
                    num_runs: run + 1,
                    seed,
                    failing_sequence: Some(self.report(&sequence)),
                    shrunk_sequence: Some(self.report(&shrunk)),
                    error: Some(error),
                };
            }
        }
        StatefulResult {
            success: true,
            num_runs: config.num_runs,
            seed,
            failing_sequence: None,
            shrunk_sequence: None,
            error: None,
        }
    }

    /// draw a sequence by advancing the model alone. the SUT does not
    /// exist yet; commands whose precondition rejects the current
    /// model state are filtered out, the rest are chosen uniformly.
    fn generate(&self, rng: &mut Generator, config: &StatefulConfig) -> Vec<Step> {
        let mut model = (self.model)();
        let length = rng.index(config.max_commands + 1);
        let mut steps = Vec::with_capacity(length);
        while steps.len() < length {
            let enabled = self
                .commands
                .iter()
                .enumerate()
                .filter(|(_, c)| c.enabled(&model))
                .map(|(i, _)| i)
                .collect::<Vec<_>>();
            if enabled.is_empty() {
                break;
            }
            let choice = enabled[rng.index(enabled.len())];
            let command = &self.commands[choice];
            let mut args = Bindings::default();
            let mut complete = true;
            for (name, arb) in command.arbitraries.iter() {
                match arb.pick(rng) {
                    Some(pick) => args.set(name, pick.value),
                    None => complete = false,
                }
            }
            if !complete {
                continue;
            }
            let advanced = catch_unwind(AssertUnwindSafe(|| {
                (command.execute)(&args, &mut model, None)
            }));
            if advanced.is_err() {
                if config.verbose {
                    log::debug!(
                        "command {} panicked during generation; skipping",
                        command.name
                    );
                }
                continue;
            }
            steps.push(Step {
                command: choice,
                args,
            });
        }
        steps
    }

    /// replay on a fresh model and SUT: recheck preconditions, run,
    /// check the postcondition, then every invariant, per step
    fn replay(&self, steps: &[Step]) -> Option<Failure> {
        let mut model = (self.model)();
        let mut sut = (self.sut)();
        for (i, step) in steps.iter().enumerate() {
            let command = &self.commands[step.command];
            let blame = |message: String| Failure {
                step: i,
                command: command.name.clone(),
                message,
            };
            if !command.enabled(&model) {
                return Some(blame("precondition violated on replay".to_string()));
            }
            let result = catch_unwind(AssertUnwindSafe(|| {
                (command.execute)(&step.args, &mut model, Some(&mut sut))
            }));
            let result = match result {
                Ok(result) => result,
                Err(_) => return Some(blame("command panicked".to_string())),
            };
            if let Some(postcondition) = &command.postcondition {
                let held = catch_unwind(AssertUnwindSafe(|| {
                    postcondition(&step.args, &model, &sut, &result)
                }));
                if !matches!(held, Ok(true)) {
                    return Some(blame("postcondition failed".to_string()));
                }
            }
            for (label, invariant) in self.invariants.iter() {
                let held = catch_unwind(AssertUnwindSafe(|| invariant(&model, &sut)));
                if !matches!(held, Ok(true)) {
                    return Some(blame(format!("invariant {:?} violated", label)));
                }
            }
        }
        None
    }

    /// phase 1: binary-search the shortest failing prefix.
    /// phase 2: greedy single-command deletion until nothing removable
    /// preserves the failure.
    fn shrink(&self, failing: &[Step]) -> Vec<Step> {
        let mut lo = 1;
        let mut hi = failing.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.replay(&failing[..mid]).is_some() {
                true => hi = mid,
                false => lo = mid + 1,
            }
        }
        let mut current = match self.replay(&failing[..hi]).is_some() {
            true => failing[..hi].to_vec(),
            false => failing.to_vec(),
        };
        let mut i = 0;
        while i < current.len() {
            let mut candidate = current.clone();
            candidate.remove(i);
            match self.replay(&candidate).is_some() {
                true => current = candidate,
                false => i += 1,
            }
        }
        current
    }

    fn report(&self, steps: &[Step]) -> Vec<StepReport> {
        steps
            .iter()
            .map(|step| StepReport {
                command: self.commands[step.command].name.clone(),
                args: step.args.clone(),
            })
            .collect()
    }
}
