//! Specification providers.
//!
//! A spec provider tells the compiler, per target class (in practice, per
//! object property of the query builder), which properties carry the begin,
//! end and exact date of a fact. Backends differ (ontology files, remote
//! configuration, tests); the compiler only depends on [`SpecProvider`].

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Resolves temporal properties for a class identifier.
///
/// Implementations must be cheap to query repeatedly: the compiler asks on
/// every compilation and never caches the answers.
pub trait SpecProvider: Send + Sync {
    /// Property holding the start of the fact's temporal extent.
    fn begin_date_property(&self, class_id: &str) -> Option<String>;

    /// Property holding the end of the fact's temporal extent.
    fn end_date_property(&self, class_id: &str) -> Option<String>;

    /// Property holding a single exact date for the fact.
    fn exact_date_property(&self, class_id: &str) -> Option<String>;
}

impl<P: SpecProvider + ?Sized> SpecProvider for Arc<P> {
    fn begin_date_property(&self, class_id: &str) -> Option<String> {
        (**self).begin_date_property(class_id)
    }

    fn end_date_property(&self, class_id: &str) -> Option<String> {
        (**self).end_date_property(class_id)
    }

    fn exact_date_property(&self, class_id: &str) -> Option<String> {
        (**self).exact_date_property(class_id)
    }
}

impl<P: SpecProvider + ?Sized> SpecProvider for &P {
    fn begin_date_property(&self, class_id: &str) -> Option<String> {
        (**self).begin_date_property(class_id)
    }

    fn end_date_property(&self, class_id: &str) -> Option<String> {
        (**self).end_date_property(class_id)
    }

    fn exact_date_property(&self, class_id: &str) -> Option<String> {
        (**self).exact_date_property(class_id)
    }
}

/// The temporal properties configured for one class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalPropertyConfig {
    /// Property holding the start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_date_property: Option<String>,
    /// Property holding the end date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date_property: Option<String>,
    /// Property holding a single exact date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_date_property: Option<String>,
}

impl TemporalPropertyConfig {
    /// No temporal properties: compiles to a direct filter.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            begin_date_property: None,
            end_date_property: None,
            exact_date_property: None,
        }
    }

    /// A begin/end pair without an exact-date shortcut.
    #[must_use]
    pub fn range(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            begin_date_property: Some(begin.into()),
            end_date_property: Some(end.into()),
            exact_date_property: None,
        }
    }

    /// Adds (or replaces) the exact-date property.
    #[must_use]
    pub fn with_exact(mut self, exact: impl Into<String>) -> Self {
        self.exact_date_property = Some(exact.into());
        self
    }

    /// Looks up the configuration of `class_id` from a provider.
    pub fn resolve<P: SpecProvider + ?Sized>(provider: &P, class_id: &str) -> Self {
        Self {
            begin_date_property: provider.begin_date_property(class_id),
            end_date_property: provider.end_date_property(class_id),
            exact_date_property: provider.exact_date_property(class_id),
        }
    }

    /// True if both a begin and an end property are configured.
    pub const fn has_range(&self) -> bool {
        self.begin_date_property.is_some() && self.end_date_property.is_some()
    }
}

/// Thread-safe in-memory provider keyed by class identifier.
#[derive(Debug, Default)]
pub struct InMemorySpecProvider {
    classes: RwLock<HashMap<String, TemporalPropertyConfig>>,
}

impl InMemorySpecProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a provider from a JSON object mapping class identifiers to
    /// `{ "beginDateProperty", "endDateProperty", "exactDateProperty" }`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let classes: HashMap<String, TemporalPropertyConfig> = serde_json::from_str(json)
            .map_err(|e| ConfigError::Parse {
                message: format!("spec provider: {e}"),
            })?;
        Ok(Self {
            classes: RwLock::new(classes),
        })
    }

    /// Sets the configuration of `class_id`, returning the previous one.
    pub fn insert(
        &self,
        class_id: impl Into<String>,
        config: TemporalPropertyConfig,
    ) -> Option<TemporalPropertyConfig> {
        self.classes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(class_id.into(), config)
    }

    /// Removes the configuration of `class_id`.
    pub fn remove(&self, class_id: &str) -> Option<TemporalPropertyConfig> {
        self.classes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(class_id)
    }

    /// Returns a copy of the configuration of `class_id`.
    pub fn get(&self, class_id: &str) -> Option<TemporalPropertyConfig> {
        self.classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(class_id)
            .cloned()
    }

    /// Number of configured classes.
    pub fn len(&self) -> usize {
        self.classes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True if no class is configured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn property(
        &self,
        class_id: &str,
        pick: impl FnOnce(&TemporalPropertyConfig) -> Option<&String>,
    ) -> Option<String> {
        let guard = self.classes.read().unwrap_or_else(PoisonError::into_inner);
        guard.get(class_id).and_then(pick).cloned()
    }
}

impl SpecProvider for InMemorySpecProvider {
    fn begin_date_property(&self, class_id: &str) -> Option<String> {
        self.property(class_id, |c| c.begin_date_property.as_ref())
    }

    fn end_date_property(&self, class_id: &str) -> Option<String> {
        self.property(class_id, |c| c.end_date_property.as_ref())
    }

    fn exact_date_property(&self, class_id: &str) -> Option<String> {
        self.property(class_id, |c| c.exact_date_property.as_ref())
    }
}
