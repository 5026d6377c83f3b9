use std::cmp::Ordering;

use crate::query::Operator;
use crate::value::Value;

/// Whether a record leaf `actual` satisfies `op` against the filter literal `expected`.
///
/// Mismatched kinds never match, and neither do operators a kind does not define
/// (ordering on bools, substring on timestamps, ...).
pub(crate) fn matches(op: Operator, actual: &Value, expected: &Value) -> bool {
    if op == Operator::In {
        return expected.members().iter().any(|m| matches(Operator::Equal, actual, m));
    }
    match (actual, expected) {
        (Value::Null, Value::Null) => op == Operator::Equal,
        (Value::Bool(a), Value::Bool(b)) => match op {
            Operator::Equal => a == b,
            Operator::NotEqual => a != b,
            _ => false,
        },
        (Value::Int(a), Value::Int(b)) => match op {
            Operator::SubString => a.to_string().contains(&b.to_string()),
            _ => ordered(op, a.cmp(b)),
        },
        (Value::Float(a), Value::Float(b)) => match op {
            Operator::SubString => a.to_string().contains(&b.to_string()),
            // NaN compares as nothing
            _ => a.partial_cmp(b).is_some_and(|ord| ordered(op, ord)),
        },
        (Value::String(a), Value::String(b)) => match op {
            Operator::SubString => a.contains(b.as_str()),
            _ => ordered(op, a.cmp(b)),
        },
        (Value::Timestamp(a), Value::Timestamp(b)) => match op {
            Operator::SubString => false,
            _ => ordered(op, a.timestamp().cmp(&b.timestamp())),
        },
        _ => false,
    }
}

fn ordered(op: Operator, ord: Ordering) -> bool {
    match op {
        Operator::Equal => ord == Ordering::Equal,
        Operator::NotEqual => ord != Ordering::Equal,
        Operator::Greater => ord == Ordering::Greater,
        Operator::GreaterOrEqual => ord != Ordering::Less,
        Operator::Less => ord == Ordering::Less,
        Operator::LessOrEqual => ord != Ordering::Greater,
        Operator::In | Operator::SubString => false,
    }
}

/// Total order used for sorting. Missing and null values come first, then values
/// grouped by kind; within a kind the `gt`/`lt` semantics above apply, floats use
/// IEEE total ordering and lists compare element-wise.
pub(crate) fn compare_sort_keys(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    static NULL: Value = Value::Null;
    let a = a.unwrap_or(&NULL);
    let b = b.unwrap_or(&NULL);
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.total_cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Timestamp(x), Value::Timestamp(y)) => x.timestamp().cmp(&y.timestamp()),
        (Value::List(x), Value::List(y)) => x
            .iter()
            .zip(y)
            .map(|(l, r)| compare_sort_keys(Some(l), Some(r)))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

const fn kind_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) => 2,
        Value::Float(_) => 3,
        Value::String(_) => 4,
        Value::Timestamp(_) => 5,
        Value::List(_) => 6,
    }
}
