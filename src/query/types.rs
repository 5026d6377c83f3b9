use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::QueryError;

/// Closed set of comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Operator {
    #[default]
    #[serde(rename = "eq")]
    Equal,
    #[serde(rename = "ne")]
    NotEqual,
    #[serde(rename = "gt")]
    Greater,
    #[serde(rename = "gte")]
    GreaterOrEqual,
    #[serde(rename = "lt")]
    Less,
    #[serde(rename = "lte")]
    LessOrEqual,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "substr")]
    SubString,
}

impl Operator {
    pub const ALL: [Self; 8] = [
        Self::Equal,
        Self::NotEqual,
        Self::Greater,
        Self::GreaterOrEqual,
        Self::Less,
        Self::LessOrEqual,
        Self::In,
        Self::SubString,
    ];

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Equal => "eq",
            Self::NotEqual => "ne",
            Self::Greater => "gt",
            Self::GreaterOrEqual => "gte",
            Self::Less => "lt",
            Self::LessOrEqual => "lte",
            Self::In => "in",
            Self::SubString => "substr",
        }
    }

    #[must_use]
    pub const fn is_range(self) -> bool {
        matches!(self, Self::Greater | Self::GreaterOrEqual | Self::Less | Self::LessOrEqual)
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.token() == s)
            .ok_or_else(|| QueryError::UnknownOperator(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    /// Backend sort direction: `1` or `-1`.
    #[must_use]
    pub const fn direction(self) -> i32 {
        match self {
            Self::Asc => 1,
            Self::Desc => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub offset: u64,
    /// Zero means unlimited.
    pub limit: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Clips `[offset, offset + limit)` to `len`.
    #[must_use]
    pub fn window(&self, len: usize) -> std::ops::Range<usize> {
        let start = crate::utils::num::u64_to_usize_saturating(self.offset);
        if start >= len {
            return len..len;
        }
        if self.limit == 0 {
            return start..len;
        }
        let limit = crate::utils::num::u64_to_usize_saturating(self.limit);
        start..start.saturating_add(limit).min(len)
    }
}
