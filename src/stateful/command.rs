use crate::arbitrary::Arb;
use crate::scenario::Bindings;
use crate::value::Value;
use std::rc::Rc;

/// one operation of the system under test, described once and replayed
/// many times. `execute` receives the SUT as an Option: during
/// sequence generation only the model advances and the SUT slot is
/// None, so authors must keep model updates separable from SUT calls
/// (guard the SUT portion on the Option and nothing else).
pub struct Command<M, S> {
    pub name: String,
    pub arbitraries: Vec<(String, Arb)>,
    pub precondition: Option<Rc<dyn Fn(&M) -> bool>>,
    pub execute: Rc<dyn Fn(&Bindings, &mut M, Option<&mut S>) -> Value>,
    pub postcondition: Option<Rc<dyn Fn(&Bindings, &M, &S, &Value) -> bool>>,
}

impl<M, S> Clone for Command<M, S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            arbitraries: self.arbitraries.clone(),
            precondition: self.precondition.clone(),
            execute: self.execute.clone(),
            postcondition: self.postcondition.clone(),
        }
    }
}

impl<M, S> Command<M, S> {
    /// is this command available in the current model state?
    pub fn enabled(&self, model: &M) -> bool {
        match &self.precondition {
            Some(precondition) => precondition(model),
            None => true,
        }
    }
}
