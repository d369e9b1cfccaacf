// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field values exchanged between models, renderers, and editors.

use alloc::format;
use alloc::string::{String, ToString};
use core::cmp::Ordering;

use crate::CheckState;

/// A single field value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// No value.
    #[default]
    Empty,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value.
    UInt(u64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Tri-state check value.
    Check(CheckState),
}

impl Value {
    /// Returns `true` for [`Value::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Borrowed text, for [`Value::Text`] only.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean view of booleans and check states.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Check(CheckState::Checked) => Some(true),
            Self::Check(CheckState::Unchecked) => Some(false),
            _ => None,
        }
    }

    /// Numeric view used for mixed-type comparisons.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        reason = "Numeric comparisons across integer and float values are best-effort"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::UInt(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Text shown for this value and used by string search.
    #[must_use]
    pub fn display_string(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(v) => v.to_string(),
            Self::UInt(v) => v.to_string(),
            Self::Float(v) => format!("{v}"),
            Self::Text(s) => s.clone(),
            Self::Check(c) => match c {
                CheckState::Unchecked => String::from("unchecked"),
                CheckState::Checked => String::from("checked"),
                CheckState::Undetermined => String::from("undetermined"),
            },
        }
    }

    /// Total ordering over values.
    ///
    /// Empty sorts first. Numbers compare numerically with each other, text
    /// compares lexically, and values of unrelated kinds fall back to their
    /// display strings.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Empty, Self::Empty) => Ordering::Equal,
            (Self::Empty, _) => Ordering::Less,
            (_, Self::Empty) => Ordering::Greater,
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::UInt(a), Self::UInt(b)) => a.cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Check(a), Self::Check(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.display_string().cmp(&b.display_string()),
            },
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(String::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<CheckState> for Value {
    fn from(c: CheckState) -> Self {
        Self::Check(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_numeric_compare() {
        assert_eq!(Value::Int(2).compare(&Value::Float(2.5)), Ordering::Less);
        assert_eq!(Value::UInt(3).compare(&Value::Int(3)), Ordering::Equal);
    }

    #[test]
    fn empty_sorts_first() {
        assert_eq!(Value::Empty.compare(&Value::from("a")), Ordering::Less);
        assert_eq!(Value::from("a").compare(&Value::Empty), Ordering::Greater);
    }

    #[test]
    fn display_strings() {
        assert_eq!(Value::from(12_i64).display_string(), "12");
        assert_eq!(Value::from("abc").display_string(), "abc");
        assert_eq!(Value::Empty.display_string(), "");
    }
}
