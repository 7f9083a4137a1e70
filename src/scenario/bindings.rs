use crate::value::Value;
use std::collections::BTreeMap;

/// the record a test case binds its names into: quantifier draws,
/// givens, and whatever the when-effects write. predicates read it
/// back by name through accessors that panic with the offending name
/// on a mismatch, which is the right failure mode inside test code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(BTreeMap<String, Value>);

impl Bindings {
    pub fn set(&mut self, name: &str, value: Value) {
        self.0.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn value(&self, name: &str) -> &Value {
        match self.0.get(name) {
            Some(value) => value,
            None => panic!("no binding named {:?}", name),
        }
    }

    pub fn int(&self, name: &str) -> i64 {
        self.value(name).int()
    }
    pub fn real(&self, name: &str) -> f64 {
        self.value(name).real()
    }
    pub fn bool(&self, name: &str) -> bool {
        self.value(name).bool()
    }
    pub fn char(&self, name: &str) -> char {
        self.value(name).char()
    }
    pub fn text(&self, name: &str) -> &str {
        self.value(name).text()
    }
    pub fn list(&self, name: &str) -> &[Value] {
        self.value(name).list()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// does every pair of `other` appear here with the same value?
    pub fn covers(&self, other: &Bindings) -> bool {
        other
            .iter()
            .all(|(name, value)| self.get(name) == Some(value))
    }
}

impl FromIterator<(String, Value)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for Bindings {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, "}}")
    }
}
