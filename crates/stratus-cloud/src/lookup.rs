//! Typed result of a name-based lookup

use crate::error::{CloudError, Result};

/// Outcome of looking a resource up by name.
///
/// Gateways return `Result<Lookup<T>>`: `Ok(Found)`, `Ok(NotFound)` or
/// `Err(..)` for every other failure, so orchestration code never has to
/// inspect provider error codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    /// Build from an optional value; `None` means not found.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Lookup::Found(v),
            None => Lookup::NotFound,
        }
    }

    /// Fold a "not found" failure into `NotFound`, keep every other failure.
    pub fn from_result(result: Result<Lookup<T>>) -> Result<Lookup<T>> {
        match result {
            Err(e) if e.is_not_found() => Ok(Lookup::NotFound),
            other => other,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            Lookup::NotFound => None,
        }
    }

    /// Unwrap the value or fail with `CloudError::NotFound`.
    pub fn require(self, kind: &'static str, name: &str) -> Result<T> {
        match self {
            Lookup::Found(v) => Ok(v),
            Lookup::NotFound => Err(CloudError::not_found(kind, name)),
        }
    }
}

impl Lookup<String> {
    /// Empty identifiers count as not found.
    pub fn non_empty(value: Option<String>) -> Self {
        Lookup::from_option(value.filter(|v| !v.is_empty()))
    }
}
