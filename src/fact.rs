//! Atomic propositional facts.
//!
//! A fact is an opaque identifier with no internal structure: no arity, no
//! arguments. Equality is exact and case-sensitive.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An asserted or derived proposition.
///
/// Cloning is cheap: the identifier is shared between the fact store, the
/// rules that mention it and any firing events that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fact(Arc<str>);

impl Fact {
    /// Creates a fact from its identifier.
    ///
    /// The identifier is kept verbatim, whitespace included; only the empty
    /// string is rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::EmptyFact);
        }
        Ok(Self(Arc::from(id)))
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fact {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Fact {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Fact {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Fact {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for Fact {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Fact {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Fact::new(raw).map_err(serde::de::Error::custom)
    }
}
