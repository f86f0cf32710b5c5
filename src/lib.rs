//! # sparql-temporal - Date range constraints for SPARQL query builders
//!
//! sparql-temporal turns the date range a user types into a visual query
//! builder into SPARQL graph patterns. It covers day- and year-level ranges,
//! including years before the common era.
//!
//! ## Core Concepts
//!
//! - **Instant**: A UTC point in time with an explicit, possibly negative year
//! - **NormalizedRange**: An inclusive `[start, stop]` window, either side optional
//! - **Granularity**: Whether user dates widen to whole days or whole years
//! - **SpecProvider**: Tells the compiler which properties carry begin/end/exact dates
//! - **GraphPattern**: The compiled constraint, renderable as SPARQL text
//!
//! ## Usage
//!
//! ```rust
//! use sparql_temporal::{compile, normalize, Granularity, TemporalPropertyConfig};
//!
//! let range = normalize(Some("-600"), Some("-500"), Granularity::Year)?;
//! assert_eq!(range.start_literal().as_deref(), Some("-0600-01-01T00:00:01Z"));
//!
//! let config = TemporalPropertyConfig::range("ex:begin", "ex:end").with_exact("ex:date");
//! let patterns = compile(&range, &config, "reign", "date")?;
//! assert!(patterns[0].to_string().contains(" UNION "));
//! # Ok::<(), sparql_temporal::TemporalError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod compile;
pub mod config;
pub mod error;
pub mod format;
pub mod instant;
pub mod label;
pub mod parse;
pub mod pattern;
pub mod range;
pub mod session;
pub mod spec_provider;

// Re-export primary types at crate root for convenience
pub use compile::{compile, is_blocking_object_prop, Strategy};
pub use config::TemporalConfig;
pub use error::{CompileError, ConfigError, TemporalError, TemporalResult, ValidationError};
pub use format::{date_time_literal, format_instant, format_optional, XSD_DATE_TIME};
pub use instant::Instant;
pub use label::{label, DayLabelFormat, LabelPhrases};
pub use parse::{is_valid_instant, parse_instant, DateParser, SlashDateOrder};
pub use pattern::{CompareOp, Expression, GraphPattern, Iri, Literal, Term, Triple, Variable};
pub use range::{normalize, Granularity, NormalizedRange, RangeNormalizer, RawInstantInput};
pub use session::TemporalSession;
pub use spec_provider::{InMemorySpecProvider, SpecProvider, TemporalPropertyConfig};
