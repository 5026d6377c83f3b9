use std::collections::HashMap;

use super::fields::Fields;
use super::types::Operator;
use crate::value::Value;

/// One `path op value` predicate. `value` is already coerced to the field's type;
/// for [`Operator::In`] it is a [`Value::List`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub op: Operator,
    pub value: Value,
}

impl FieldFilter {
    #[must_use]
    pub fn new(field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self { field: field.into(), op, value: value.into() }
    }

    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Equal, value)
    }
}

/// Conjunction of field filters; a record passes iff every entry matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Vec<FieldFilter>);

impl Filter {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn with(mut self, f: FieldFilter) -> Self {
        self.0.push(f);
        self
    }

    pub fn push(&mut self, f: FieldFilter) {
        self.0.push(f);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldFilter> {
        self.0.iter()
    }

    #[must_use]
    pub fn fields(&self) -> Fields {
        self.0.iter().map(|f| f.field.clone()).collect()
    }

    /// Path to operator; a path filtered more than once keeps its last operator.
    #[must_use]
    pub fn operators(&self) -> HashMap<String, Operator> {
        self.0.iter().map(|f| (f.field.clone(), f.op)).collect()
    }
}

impl From<Vec<FieldFilter>> for Filter {
    fn from(v: Vec<FieldFilter>) -> Self {
        Self(v)
    }
}

impl FromIterator<FieldFilter> for Filter {
    fn from_iter<I: IntoIterator<Item = FieldFilter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Filter {
    type Item = &'a FieldFilter;
    type IntoIter = std::slice::Iter<'a, FieldFilter>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
