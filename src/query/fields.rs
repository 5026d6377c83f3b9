/// Ordered list of field paths touched by a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<String>);

impl Fields {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, field: impl Into<String>) {
        self.0.push(field.into());
    }

    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Order-preserving deduplication.
    #[must_use]
    pub fn unique(self) -> Self {
        let mut seen = std::collections::HashSet::with_capacity(self.0.len());
        Self(self.0.into_iter().filter(|f| seen.insert(f.clone())).collect())
    }

    /// Splits into `(fields under prefix with the prefix stripped, everything else)`.
    #[must_use]
    pub fn group(&self, prefix: &str) -> (Self, Self) {
        let mut grouped = Self::new();
        let mut rest = Self::new();
        for f in &self.0 {
            match f.strip_prefix(prefix).and_then(|s| s.strip_prefix('.')) {
                Some(stripped) => grouped.push(stripped),
                None => rest.push(f.clone()),
            }
        }
        (grouped, rest)
    }
}

impl From<Vec<String>> for Fields {
    fn from(v: Vec<String>) -> Self {
        Self(v)
    }
}

impl<S: Into<String>> FromIterator<S> for Fields {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for Fields {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
