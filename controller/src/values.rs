// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;
use std::fmt::{self, Display};

/// A loosely typed value, used to describe an algorithm run
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    Int64(i64),
    Double(f64),
}

impl Value {
    pub fn as_string(&self) -> Result<&str, ErrorKind> {
        match self {
            Self::String(s) => Ok(s),
            _ => Err(ErrorKind::CastingValue("String")),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ErrorKind> {
        match self {
            Self::Bool(v) => Ok(*v),
            _ => Err(ErrorKind::CastingValue("bool")),
        }
    }

    pub fn as_i64(&self) -> Result<i64, ErrorKind> {
        match self {
            Self::Int64(v) => Ok(*v),
            _ => Err(ErrorKind::CastingValue("i64")),
        }
    }

    pub fn as_f64(&self) -> Result<f64, ErrorKind> {
        match self {
            Self::Double(v) => Ok(*v),
            Self::Int64(v) => Ok(*v as f64),
            _ => Err(ErrorKind::CastingValue("f64")),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{:.4}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::Int64(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}
