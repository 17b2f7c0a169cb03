use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Outcome of a normative lookup or of classifying one.
///
/// `NotAvailable` is a first-class result, not an error: it means no
/// published norm covers the subject's age, stratifier, or score. It
/// serializes distinctly from every numeric value
/// (`{"status":"not_available"}` vs `{"status":"found","value":50.0}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum Lookup<T> {
    Found(T),
    NotAvailable,
}

impl<T> Lookup<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotAvailable => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotAvailable => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotAvailable => Lookup::NotAvailable,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Lookup::Found(value),
            None => Lookup::NotAvailable,
        }
    }
}
