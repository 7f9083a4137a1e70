use super::Strategy;
use super::bindings::Bindings;
use crate::arbitrary::Arb;
use crate::value::Value;
use std::rc::Rc;

/// which way a quantifier binds its variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Universal,
    Existential,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Universal => write!(f, "forall"),
            Self::Existential => write!(f, "exists"),
        }
    }
}

/// one link in a scenario chain. the builder appends nodes in
/// declaration order into a flat vector; the explorer reads them back
/// root-to-leaf. every runnable chain ends in at least one Assert.
#[derive(Clone)]
pub enum Node {
    Quantifier {
        name: String,
        kind: Kind,
        arb: Arb,
    },
    GivenConstant {
        name: String,
        value: Value,
    },
    GivenFactory {
        name: String,
        factory: Rc<dyn Fn() -> Value>,
    },
    When {
        effect: Rc<dyn Fn(&mut Bindings)>,
    },
    Assert {
        predicate: Rc<dyn Fn(&Bindings) -> bool>,
    },
    Config {
        strategy: Strategy,
    },
    Seed(crate::Seed),
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Quantifier { name, kind, arb } => {
                write!(f, "{} {} in {}", kind, name, arb.label())
            }
            Self::GivenConstant { name, value } => write!(f, "given {} = {}", name, value),
            Self::GivenFactory { name, .. } => write!(f, "given {} = <factory>", name),
            Self::When { .. } => write!(f, "when <effect>"),
            Self::Assert { .. } => write!(f, "then <predicate>"),
            Self::Config { .. } => write!(f, "config"),
            Self::Seed(seed) => write!(f, "seed {}", seed),
        }
    }
}
