//! Per-widget temporal session.
//!
//! A [`TemporalSession`] is what a UI layer holds for one date widget: the
//! fixed configuration, the spec provider used to look up temporal
//! properties, and the ordered list of accepted ranges. Values are only ever
//! appended, and a rejected input leaves the list untouched.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::compile::{compile, is_blocking_object_prop};
use crate::config::TemporalConfig;
use crate::error::{CompileError, ValidationError};
use crate::pattern::GraphPattern;
use crate::range::{Granularity, NormalizedRange, RawInstantInput};
use crate::spec_provider::{SpecProvider, TemporalPropertyConfig};

/// State and capabilities of one temporal widget.
pub struct TemporalSession {
    config: TemporalConfig,
    provider: Arc<dyn SpecProvider>,
    values: Vec<NormalizedRange>,
}

impl fmt::Debug for TemporalSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporalSession")
            .field("config", &self.config)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

impl TemporalSession {
    /// Creates a session with no accepted values.
    pub fn new(config: TemporalConfig, provider: Arc<dyn SpecProvider>) -> Self {
        Self {
            config,
            provider,
            values: Vec::new(),
        }
    }

    /// The widget configuration.
    pub const fn config(&self) -> &TemporalConfig {
        &self.config
    }

    /// Configured granularity.
    pub const fn granularity(&self) -> Granularity {
        self.config.granularity
    }

    /// Returns true if `text` denotes a date under this session's parser.
    pub fn is_valid_instant(&self, text: &str) -> bool {
        self.config.parser().is_valid(text)
    }

    /// Validates raw text and normalizes it without accepting it.
    ///
    /// # Errors
    ///
    /// See [`crate::RangeNormalizer::normalize`].
    pub fn normalize(&self, raw_start: &str, raw_stop: &str) -> Result<NormalizedRange, ValidationError> {
        self.config.normalizer().normalize(Some(raw_start), Some(raw_stop))
    }

    /// Validates, normalizes and appends a value. Empty text means an open
    /// side.
    ///
    /// # Errors
    ///
    /// Returns the validation error and leaves the accepted values unchanged.
    pub fn add_value(&mut self, raw_start: &str, raw_stop: &str) -> Result<&NormalizedRange, ValidationError> {
        let range = self.normalize(raw_start, raw_stop)?;
        Ok(self.push(range))
    }

    /// Same as [`TemporalSession::add_value`] over a [`RawInstantInput`].
    ///
    /// # Errors
    ///
    /// Returns the validation error and leaves the accepted values unchanged.
    pub fn add_input(&mut self, input: &RawInstantInput) -> Result<&NormalizedRange, ValidationError> {
        let range = self.config.normalizer().normalize_input(input)?;
        Ok(self.push(range))
    }

    fn push(&mut self, range: NormalizedRange) -> &NormalizedRange {
        debug!(key = %range.key(), count = self.values.len() + 1, "accepted temporal value");
        self.values.push(range);
        &self.values[self.values.len() - 1]
    }

    /// Accepted values, in acceptance order.
    pub fn values(&self) -> &[NormalizedRange] {
        &self.values
    }

    /// Display label of the value at `index`.
    pub fn label_of(&self, index: usize) -> Option<String> {
        self.values.get(index).map(|v| self.config.phrases.label(v))
    }

    /// Current temporal properties of `class_id`, freshly queried.
    pub fn property_config(&self, class_id: &str) -> TemporalPropertyConfig {
        TemporalPropertyConfig::resolve(&self.provider, class_id)
    }

    /// True if the assembler must suppress its own triple for `class_id`.
    pub fn is_blocking_object_prop(&self, class_id: &str) -> bool {
        is_blocking_object_prop(&self.property_config(class_id))
    }

    /// Compiles the value at `index` for the property `class_id`.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::IndexOutOfRange` for an unknown index, or any
    /// error from [`crate::compile()`].
    pub fn compile_value(
        &self,
        index: usize,
        class_id: &str,
        subject_var: &str,
        object_var: &str,
    ) -> Result<Vec<GraphPattern>, CompileError> {
        let range = self.values.get(index).ok_or(CompileError::IndexOutOfRange {
            index,
            len: self.values.len(),
        })?;
        compile(range, &self.property_config(class_id), subject_var, object_var)
    }

    /// Compiles every accepted value; one pattern list per value.
    ///
    /// Combining the lists (typically as alternatives) is up to the query
    /// assembler.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`crate::compile()`].
    pub fn compile_all(
        &self,
        class_id: &str,
        subject_var: &str,
        object_var: &str,
    ) -> Result<Vec<Vec<GraphPattern>>, CompileError> {
        let config = self.property_config(class_id);
        self.values
            .iter()
            .map(|range| compile(range, &config, subject_var, object_var))
            .collect()
    }
}
