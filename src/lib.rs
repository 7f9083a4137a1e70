pub mod arbitrary;
pub mod explorer;
pub mod report;
pub mod sampler;
pub mod scenario;
pub mod shrinker;
pub mod stateful;
pub mod stats;
pub mod value;

pub use arbitrary::Arb;
pub use arbitrary::Arbitrary;
pub use arbitrary::Pick;
pub use arbitrary::Size;
pub use explorer::RunResult;
pub use explorer::outcome::pre;
pub use explorer::outcome::pre_msg;
pub use scenario::Scenario;
pub use scenario::Strategy;
pub use scenario::scenario;
pub use stateful::stateful;
pub use stats::context::event;
pub use stats::context::target;
pub use value::Value;

/// dimensional analysis types
pub type Probability = f64;
pub type Confidence = f64;
pub type Seed = u64;

// exploration parameters
const DEFAULT_SAMPLE_SIZE: usize = 1000;
const CONFIDENCE_CHECK_INTERVAL: usize = 100;
const MIN_TESTS_FOR_CONFIDENCE: usize = 10;
const DEFAULT_CONFIDENCE_LEVEL: Confidence = 0.95;
const DEFAULT_PASS_RATE_THRESHOLD: Probability = 0.999;
const PROGRESS_INTERVAL: usize = 100;
const PROGRESS_WINDOW_MS: u64 = 1000;

// shrinking parameters
const DEFAULT_SHRINK_SIZE: usize = 500;
const DEFAULT_SHRINK_ATTEMPTS: usize = 500;
const DEFAULT_SHRINK_ROUNDS: usize = 50;
const SHRINK_CANDIDATES_PER_ROUND: usize = 100;

// generation parameters
const MAX_FILTER_TRIES: usize = 50;
const MAX_PICK_TRIES: usize = 3;
const UNIQUE_RETRY_FACTOR: usize = 10;
const SIZE_PROBE_SAMPLES: usize = 100;
const SIZE_PROBE_SEED: Seed = 0xF117E12;
const REAL_INDEX_DEPTH: usize = 2;
const MAX_CORNER_PRODUCT: usize = 32;
const DEFAULT_TEXT_LENGTH: usize = 10;
const DEFAULT_ARRAY_LENGTH: usize = 10;

// statistics parameters
const RESERVOIR_CAPACITY: usize = 1024;
const HISTOGRAM_BINS: usize = 20;
const HISTOGRAM_WARMUP: usize = 100;
const BETA_EPSILON: f64 = 1e-12;
const BETA_MAX_ITERATIONS: usize = 200;

// stateful parameters
const DEFAULT_NUM_RUNS: usize = 100;
const DEFAULT_MAX_COMMANDS: usize = 50;

/// the only errors the public API propagates. everything else
/// is recovered inside a run and reported on the result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("scenario has no assertion; finish the chain with .then(..)")]
    MissingAssertion,
    #[error("{0}() called outside a property callback")]
    OutsideProperty(&'static str),
}

/// initialize terminal logging for binaries and examples
pub fn init() {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("initialize logger");
}
