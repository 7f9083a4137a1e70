pub mod command;
pub mod runner;

pub use command::Command;
pub use runner::StatefulConfig;
pub use runner::StatefulResult;
pub use runner::StepReport;

use crate::arbitrary::Arb;
use crate::scenario::Bindings;
use crate::value::Value;
use runner::Runner;
use std::rc::Rc;

/// start describing a stateful test over a model/SUT pair
pub fn stateful<M: 'static, S: 'static>() -> StatefulBuilder<M, S> {
    StatefulBuilder {
        model: None,
        sut: None,
        commands: Vec::new(),
        invariants: Vec::new(),
    }
}

/// the stateful surface: factories for the pure model and the impure
/// SUT, a command vocabulary, and invariants enforced after every
/// replayed step.
pub struct StatefulBuilder<M, S> {
    model: Option<Rc<dyn Fn() -> M>>,
    sut: Option<Rc<dyn Fn() -> S>>,
    commands: Vec<Command<M, S>>,
    invariants: Vec<(String, Rc<dyn Fn(&M, &S) -> bool>)>,
}

impl<M: 'static, S: 'static> StatefulBuilder<M, S> {
    pub fn model(mut self, factory: impl Fn() -> M + 'static) -> Self {
        self.model = Some(Rc::new(factory));
        self
    }

    pub fn sut(mut self, factory: impl Fn() -> S + 'static) -> Self {
        self.sut = Some(Rc::new(factory));
        self
    }

    pub fn command(self, name: &str) -> CommandBuilder<M, S> {
        CommandBuilder {
            parent: self,
            name: name.to_string(),
            arbitraries: Vec::new(),
            precondition: None,
            execute: None,
            postcondition: None,
        }
    }

    pub fn invariant(mut self, name: &str, check: impl Fn(&M, &S) -> bool + 'static) -> Self {
        self.invariants.push((name.to_string(), Rc::new(check)));
        self
    }

    pub fn check(self, config: StatefulConfig) -> StatefulResult {
        let runner = Runner {
            model: self.model.expect("model factory declared"),
            sut: self.sut.expect("sut factory declared"),
            commands: self.commands,
            invariants: self.invariants,
        };
        runner.check(&config)
    }
}

/// one command under construction; `done` folds it back into the
/// parent builder
pub struct CommandBuilder<M, S> {
    parent: StatefulBuilder<M, S>,
    name: String,
    arbitraries: Vec<(String, Arb)>,
    precondition: Option<Rc<dyn Fn(&M) -> bool>>,
    execute: Option<Rc<dyn Fn(&Bindings, &mut M, Option<&mut S>) -> Value>>,
    postcondition: Option<Rc<dyn Fn(&Bindings, &M, &S, &Value) -> bool>>,
}

impl<M: 'static, S: 'static> CommandBuilder<M, S> {
    /// draw an argument for every execution of this command
    pub fn forall(mut self, name: &str, arb: Arb) -> Self {
        self.arbitraries.push((name.to_string(), arb));
        self
    }

    pub fn pre(mut self, precondition: impl Fn(&M) -> bool + 'static) -> Self {
        self.precondition = Some(Rc::new(precondition));
        self
    }

    /// the command body. the SUT is None during generation; keep model
    /// updates separable and guard SUT calls on the Option.
    pub fn run(
        mut self,
        execute: impl Fn(&Bindings, &mut M, Option<&mut S>) -> Value + 'static,
    ) -> Self {
        self.execute = Some(Rc::new(execute));
        self
    }

    pub fn post(
        mut self,
        postcondition: impl Fn(&Bindings, &M, &S, &Value) -> bool + 'static,
    ) -> Self {
        self.postcondition = Some(Rc::new(postcondition));
        self
    }

    pub fn done(mut self) -> StatefulBuilder<M, S> {
        self.parent.commands.push(Command {
            name: self.name,
            arbitraries: self.arbitraries,
            precondition: self.precondition,
            execute: self.execute.expect("command body declared with run"),
            postcondition: self.postcondition,
        });
        self.parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary;

    /// a well-behaved stack SUT
    #[derive(Default)]
    struct Stack {
        items: Vec<i64>,
    }

    impl Stack {
        fn push(&mut self, x: i64) {
            self.items.push(x);
        }
        fn pop(&mut self) -> Option<i64> {
            self.items.pop()
        }
        fn size(&self) -> usize {
            self.items.len()
        }
    }

    fn stack_machine() -> StatefulBuilder<Vec<i64>, Stack> {
        stateful::<Vec<i64>, Stack>()
            .model(Vec::new)
            .sut(Stack::default)
            .command("push")
            .forall("x", arbitrary::integer(-100, 100))
            .run(|args, model, sut| {
                let x = args.int("x");
                model.push(x);
                if let Some(sut) = sut {
                    sut.push(x);
                }
                Value::None
            })
            .done()
            .command("pop")
            .pre(|model| !model.is_empty())
            .run(|_, model, sut| {
                let expected = model.pop().expect("precondition checked");
                match sut {
                    Some(sut) => sut.pop().map(Value::Int).unwrap_or(Value::None),
                    None => Value::Int(expected),
                }
            })
            .post(|_, model, sut, _| sut.size() == model.len())
            .done()
            .invariant("sizes agree", |model, sut| sut.size() == model.len())
    }

    #[test]
    fn correct_stacks_survive_many_runs() {
        let result = stack_machine().check(
            StatefulConfig::default()
                .with_num_runs(50)
                .with_max_commands(30)
                .with_seed(81),
        );
        result.assert_success();
        assert!(result.num_runs == 50);
        assert!(result.failing_sequence.is_none());
    }

    /// a counter that silently starts double-decrementing after its
    /// tenth decrement
    #[derive(Default)]
    struct BuggyCounter {
        value: i64,
        decrements: usize,
    }

    impl BuggyCounter {
        fn increment(&mut self) {
            self.value += 1;
        }
        fn decrement(&mut self) {
            self.decrements += 1;
            self.value -= match self.decrements > 10 {
                true => 2,
                false => 1,
            };
        }
    }

    fn counter_machine() -> StatefulBuilder<i64, BuggyCounter> {
        stateful::<i64, BuggyCounter>()
            .model(|| 0i64)
            .sut(BuggyCounter::default)
            .command("increment")
            .run(|_, model, sut| {
                *model += 1;
                if let Some(sut) = sut {
                    sut.increment();
                }
                Value::None
            })
            .done()
            .command("decrement")
            .run(|_, model, sut| {
                *model -= 1;
                if let Some(sut) = sut {
                    sut.decrement();
                }
                Value::None
            })
            .done()
            .invariant("counts agree", |model, sut| *model == sut.value)
    }

    #[test]
    fn buggy_counters_shrink_to_eleven_decrements() {
        let result = counter_machine().check(
            StatefulConfig::default()
                .with_num_runs(100)
                .with_max_commands(50)
                .with_seed(82),
        );
        assert!(!result.success);
        assert!(result.error.is_some());
        let shrunk = result.shrunk_sequence.expect("a minimized sequence");
        assert!(shrunk.len() == 11);
        assert!(shrunk.iter().all(|step| step.command == "decrement"));
    }

    #[test]
    fn same_seed_same_failure() {
        let run = || {
            counter_machine().check(
                StatefulConfig::default()
                    .with_num_runs(20)
                    .with_max_commands(40)
                    .with_seed(83),
            )
        };
        let (a, b) = (run(), run());
        assert!(a.success == b.success);
        assert!(a.num_runs == b.num_runs);
        let render = |r: &StatefulResult| {
            r.shrunk_sequence
                .iter()
                .flatten()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
        };
        assert!(render(&a) == render(&b));
    }

    #[test]
    fn panicking_commands_fail_with_the_step_index() {
        let result = stateful::<(), ()>()
            .model(|| ())
            .sut(|| ())
            .command("explode")
            .run(|_, _, sut| {
                if sut.is_some() {
                    panic!("kaboom");
                }
                Value::None
            })
            .done()
            .check(StatefulConfig::default().with_num_runs(5).with_seed(84));
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("panicked"));
        // a single exploding command is already minimal
        assert!(result.shrunk_sequence.unwrap().len() == 1);
    }

    #[test]
    fn preconditions_gate_generation() {
        // pop can never be generated first on an empty model, so a
        // sequence can only fail if generation let one slip through
        let result = stack_machine().check(
            StatefulConfig::default()
                .with_num_runs(30)
                .with_max_commands(10)
                .with_seed(85),
        );
        result.assert_success();
    }
}
