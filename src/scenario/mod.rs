pub mod bindings;
pub mod node;
pub mod strategy;

pub use bindings::Bindings;
pub use node::Kind;
pub use node::Node;
pub use strategy::Progress;
pub use strategy::Strategy;
pub use strategy::Verbosity;

use crate::Seed;
use crate::arbitrary::Arb;
use crate::explorer::Explorer;
use crate::explorer::RunResult;
use crate::value::Value;
use std::rc::Rc;

/// start a fresh scenario chain
pub fn scenario() -> Scenario {
    Scenario { nodes: Vec::new() }
}

/// the fluent builder. each call appends a node and returns the
/// scenario by value, so chains read top to bottom exactly in the
/// order the explorer will materialize them.
#[derive(Clone, Default)]
pub struct Scenario {
    nodes: Vec<Node>,
}

impl Scenario {
    fn with(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// the property must hold for every sampled value of `arb`
    pub fn forall(self, name: &str, arb: Arb) -> Self {
        self.with(Node::Quantifier {
            name: name.to_string(),
            kind: Kind::Universal,
            arb,
        })
    }

    /// the property must hold for at least one sampled value of `arb`
    pub fn exists(self, name: &str, arb: Arb) -> Self {
        self.with(Node::Quantifier {
            name: name.to_string(),
            kind: Kind::Existential,
            arb,
        })
    }

    /// bind a constant into every test case
    pub fn given(self, name: &str, value: impl Into<Value>) -> Self {
        self.with(Node::GivenConstant {
            name: name.to_string(),
            value: value.into(),
        })
    }

    /// bind a per-test-case value built by a factory
    pub fn given_with(self, name: &str, factory: impl Fn() -> Value + 'static) -> Self {
        self.with(Node::GivenFactory {
            name: name.to_string(),
            factory: Rc::new(factory),
        })
    }

    /// run a side effect over the bindings before the assertion
    pub fn when(self, effect: impl Fn(&mut Bindings) + 'static) -> Self {
        self.with(Node::When {
            effect: Rc::new(effect),
        })
    }

    /// the terminal assertion; multiple `then`/`and` form a conjunction
    pub fn then(self, predicate: impl Fn(&Bindings) -> bool + 'static) -> Self {
        self.with(Node::Assert {
            predicate: Rc::new(predicate),
        })
    }

    pub fn and(self, predicate: impl Fn(&Bindings) -> bool + 'static) -> Self {
        self.then(predicate)
    }

    /// lay a strategy over whatever was configured before this point
    pub fn config(self, strategy: Strategy) -> Self {
        self.with(Node::Config { strategy })
    }

    /// pin the PRNG seed without disturbing the rest of the strategy
    pub fn with_seed(self, seed: Seed) -> Self {
        self.with(Node::Seed(seed))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// run the scenario. misuse (no assertion) is the one error the
    /// public API refuses to swallow.
    pub fn check(self) -> RunResult {
        match self.try_check() {
            Ok(result) => result,
            Err(error) => panic!("{}", error),
        }
    }

    pub fn check_with(self, strategy: Strategy) -> RunResult {
        self.config(strategy).check()
    }

    pub fn try_check(self) -> Result<RunResult, crate::Error> {
        Ok(Explorer::from_scenario(&self)?.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary;

    #[test]
    fn builder_appends_in_declaration_order() {
        let chain = scenario()
            .given("k", 10i64)
            .forall("x", arbitrary::integer(0, 9))
            .when(|b| {
                let sum = b.int("k") + b.int("x");
                b.set("sum", Value::Int(sum));
            })
            .then(|b| b.int("sum") >= 10);
        assert!(chain.nodes().len() == 4);
        assert!(matches!(chain.nodes()[0], Node::GivenConstant { .. }));
        assert!(matches!(chain.nodes()[1], Node::Quantifier { .. }));
        assert!(matches!(chain.nodes()[3], Node::Assert { .. }));
    }

    #[test]
    fn assertless_scenarios_are_misuse() {
        let result = scenario().forall("x", arbitrary::boolean()).try_check();
        assert!(matches!(result, Err(crate::Error::MissingAssertion)));
    }
}
