use super::online::Online;
use super::reservoir::Reservoir;
use crate::Seed;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// the full streaming kit behind one target label: Welford moments
/// plus a reservoir for approximate quantiles.
#[derive(Debug, Clone)]
pub struct Metric {
    pub online: Online,
    pub reservoir: Reservoir,
}

impl Metric {
    fn new(seed: Seed) -> Self {
        Self {
            online: Online::default(),
            reservoir: Reservoir::new(seed),
        }
    }
    fn witness(&mut self, x: f64) {
        self.online.witness(x);
        self.reservoir.witness(x);
    }
}

/// the ambient statistics context. user callbacks have no handle to
/// the running explorer, so `event` and `target` locate the current
/// run through a thread-local cell. the explorer installs the context
/// on entry to the assertion and takes it back on every exit path,
/// including unwinds, which it owns via catch_unwind.
#[derive(Debug, Clone)]
pub struct Context {
    seed: Seed,
    events: BTreeMap<String, usize>,
    case: BTreeSet<String>,
    targets: BTreeMap<String, Metric>,
}

impl Default for Context {
    fn default() -> Self {
        Self::seeded(0)
    }
}

thread_local! {
    static CURRENT: RefCell<Option<Context>> = const { RefCell::new(None) };
}

impl Context {
    pub fn seeded(seed: Seed) -> Self {
        Self {
            seed,
            events: BTreeMap::new(),
            case: BTreeSet::new(),
            targets: BTreeMap::new(),
        }
    }

    /// called at the top of every test case; events are idempotent
    /// within one case, so the dedup set resets here
    pub fn begin_case(&mut self) {
        self.case.clear();
    }

    pub fn record_event(&mut self, name: &str) {
        if self.case.insert(name.to_string()) {
            *self.events.entry(name.to_string()).or_insert(0) += 1;
        }
    }

    pub fn record_target(&mut self, label: &str, value: f64) {
        if !value.is_finite() {
            log::warn!("ignoring non-finite target {:?} = {}", label, value);
            return;
        }
        let seed = self.seed;
        self.targets
            .entry(label.to_string())
            .or_insert_with(|| {
                let ref mut hasher = std::collections::hash_map::DefaultHasher::new();
                use std::hash::Hash;
                use std::hash::Hasher;
                seed.hash(hasher);
                label.hash(hasher);
                Metric::new(hasher.finish())
            })
            .witness(value);
    }

    pub fn events(&self) -> &BTreeMap<String, usize> {
        &self.events
    }
    pub fn targets(&self) -> &BTreeMap<String, Metric> {
        &self.targets
    }
}

/// install the run's context for the duration of a property callback
pub(crate) fn install(context: Context) {
    CURRENT.with(|cell| *cell.borrow_mut() = Some(context));
}

/// reclaim the context after the callback returned or unwound
pub(crate) fn take() -> Context {
    CURRENT.with(|cell| cell.borrow_mut().take()).expect("context installed by explorer")
}

fn with<R>(name: &'static str, f: impl FnOnce(&mut Context) -> R) -> R {
    CURRENT.with(|cell| match cell.borrow_mut().as_mut() {
        Some(context) => f(context),
        None => panic!("{}", crate::Error::OutsideProperty(name)),
    })
}

/// record a named event for the current test case. idempotent within
/// a case, tallied across the run with percentages.
pub fn event(name: &str) {
    with("event", |context| context.record_event(name));
}

/// observe a real-valued metric under the default label
pub fn target(value: f64) {
    with("target", |context| context.record_target("target", value));
}

/// observe a real-valued metric under an explicit label
pub fn target_as(label: &str, value: f64) {
    with("target", |context| context.record_target(label, value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_idempotent_per_case() {
        let mut context = Context::default();
        context.begin_case();
        context.record_event("small");
        context.record_event("small");
        context.begin_case();
        context.record_event("small");
        assert!(context.events()["small"] == 2);
    }

    #[test]
    fn targets_stream_moments_and_quantiles() {
        let mut context = Context::default();
        for x in 1..=100 {
            context.record_target("len", x as f64);
        }
        context.record_target("len", f64::NAN);
        let metric = &context.targets()["len"];
        assert!(metric.online.count() == 100);
        assert!(metric.online.mean() == 50.5);
        let (p25, p50, p75) = metric.reservoir.quartiles().unwrap();
        assert!(p25 < p50 && p50 < p75);
    }

    #[test]
    #[should_panic(expected = "outside a property")]
    fn event_outside_property_is_misuse() {
        event("nope");
    }

    #[test]
    fn install_take_round_trip() {
        install(Context::default());
        event("seen");
        target(1.0);
        let context = take();
        assert!(context.events()["seen"] == 1);
        assert!(context.targets()["target"].online.count() == 1);
    }
}
