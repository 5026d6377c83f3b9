use serde::{Deserialize, Serialize};

use super::fields::Fields;
use super::types::Order;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    pub key: String,
    pub order: Order,
}

impl SortField {
    #[must_use]
    pub fn asc(key: impl Into<String>) -> Self {
        Self { key: key.into(), order: Order::Asc }
    }

    #[must_use]
    pub fn desc(key: impl Into<String>) -> Self {
        Self { key: key.into(), order: Order::Desc }
    }
}

/// Sort keys, primary first; later keys break ties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort(Vec<SortField>);

impl Sort {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn then(mut self, f: SortField) -> Self {
        self.0.push(f);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SortField> {
        self.0.iter()
    }

    #[must_use]
    pub fn fields(&self) -> Fields {
        self.0.iter().map(|f| f.key.clone()).collect::<Fields>().unique()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Order> {
        self.0.iter().find(|f| f.key == key).map(|f| f.order)
    }

    /// Updates the order of an existing key in place, or appends it.
    pub fn set(&mut self, key: &str, order: Order) {
        if let Some(f) = self.0.iter_mut().find(|f| f.key == key) {
            f.order = order;
            return;
        }
        self.0.push(SortField { key: key.to_string(), order });
    }
}

impl From<Vec<SortField>> for Sort {
    fn from(v: Vec<SortField>) -> Self {
        Self(v)
    }
}

impl FromIterator<SortField> for Sort {
    fn from_iter<I: IntoIterator<Item = SortField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Sort {
    type Item = &'a SortField;
    type IntoIter = std::slice::Iter<'a, SortField>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
