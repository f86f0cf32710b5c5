//! Compilation of normalized ranges into graph patterns.
//!
//! The shape of the output depends on how the target class models time:
//!
//! - **Range or exact date**: the class has both a begin and an end date
//!   property. A subject matches when its `[begin, end]` extent overlaps the
//!   range. If an exact-date property is also configured, subjects with a
//!   single date inside the range match too (`UNION` of both branches).
//! - **Direct filter**: anything else. The object variable itself is
//!   filtered against the range bounds.
//!
//! Open range sides contribute no condition.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CompileError;
use crate::format::date_time_literal;
use crate::instant::Instant;
use crate::pattern::{CompareOp, Expression, GraphPattern, Iri, Term, Triple, Variable};
use crate::range::NormalizedRange;
use crate::spec_provider::TemporalPropertyConfig;

/// Which pattern shape a property configuration compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Begin/end overlap, optionally widened with an exact-date branch.
    RangeOrExactDate,
    /// A single filter on the object variable.
    DirectFilter,
}

impl Strategy {
    /// Picks the strategy for `config`.
    pub const fn for_config(config: &TemporalPropertyConfig) -> Self {
        if config.has_range() {
            Self::RangeOrExactDate
        } else {
            Self::DirectFilter
        }
    }
}

/// True if the query assembler must not emit its own subject→object triple
/// for this property.
///
/// With both a begin and an end date property configured, [`compile`]
/// already produces every triple linking the subject to its dates.
pub const fn is_blocking_object_prop(config: &TemporalPropertyConfig) -> bool {
    config.has_range()
}

/// Compiles `range` into graph patterns.
///
/// `subject_var` names the entity carrying the dates; `object_var` names the
/// date value under the direct filter strategy and is used as the stem of
/// the fresh date variables (`?{object}_begin`, `?{object}_end`,
/// `?{object}_exact`) under the range strategy.
///
/// # Errors
///
/// - `CompileError::EmptyRange` if the range has no bound at all.
/// - `CompileError::InvalidVariable` / `CompileError::InvalidIri` if a
///   variable name or configured property is malformed.
pub fn compile(
    range: &NormalizedRange,
    config: &TemporalPropertyConfig,
    subject_var: &str,
    object_var: &str,
) -> Result<Vec<GraphPattern>, CompileError> {
    let bounds = Bounds::of(range)?;
    let subject = Variable::new(subject_var)?;
    let object = Variable::new(object_var)?;
    let strategy = Strategy::for_config(config);

    debug!(?strategy, key = %range.key(), "compiling temporal constraint");

    let pattern = match (
        strategy,
        config.begin_date_property.as_deref(),
        config.end_date_property.as_deref(),
    ) {
        (Strategy::RangeOrExactDate, Some(begin), Some(end)) => {
            let overlap = overlap_branch(&bounds, &subject, &object, Iri::new(begin)?, Iri::new(end)?);
            match config.exact_date_property.as_deref() {
                Some(exact) => GraphPattern::union(vec![
                    overlap,
                    exact_date_branch(&bounds, &subject, &object, Iri::new(exact)?),
                ]),
                None => overlap,
            }
        }
        _ => direct_filter(&bounds, &object),
    };

    Ok(vec![pattern])
}

struct Bounds {
    start: Option<Term>,
    stop: Option<Term>,
}

impl Bounds {
    fn of(range: &NormalizedRange) -> Result<Self, CompileError> {
        Self::new(range.start(), range.stop())
    }

    fn new(start: Option<&Instant>, stop: Option<&Instant>) -> Result<Self, CompileError> {
        if start.is_none() && stop.is_none() {
            return Err(CompileError::EmptyRange);
        }
        Ok(Self {
            start: start.map(|s| Term::from(date_time_literal(s))),
            stop: stop.map(|e| Term::from(date_time_literal(e))),
        })
    }

    /// `value >= start && value <= stop`, minus open sides.
    fn within(&self, value: &Variable) -> Option<Expression> {
        let mut conditions = Vec::with_capacity(2);
        if let Some(start) = &self.start {
            conditions.push(Expression::compare(value.clone(), CompareOp::Ge, start.clone()));
        }
        if let Some(stop) = &self.stop {
            conditions.push(Expression::compare(value.clone(), CompareOp::Le, stop.clone()));
        }
        Expression::all(conditions)
    }
}

fn overlap_branch(
    bounds: &Bounds,
    subject: &Variable,
    object: &Variable,
    begin_prop: Iri,
    end_prop: Iri,
) -> GraphPattern {
    let begin = object.suffixed("begin");
    let end = object.suffixed("end");

    // The extent overlaps the window when it begins before the window stops
    // and ends after the window starts.
    let mut conditions = Vec::with_capacity(2);
    if let Some(stop) = &bounds.stop {
        conditions.push(Expression::compare(begin.clone(), CompareOp::Le, stop.clone()));
    }
    if let Some(start) = &bounds.start {
        conditions.push(Expression::compare(end.clone(), CompareOp::Ge, start.clone()));
    }

    let mut patterns = vec![GraphPattern::bgp(vec![
        Triple::new(subject.clone(), begin_prop, begin),
        Triple::new(subject.clone(), end_prop, end),
    ])];
    patterns.extend(Expression::all(conditions).map(GraphPattern::filter));
    GraphPattern::group(patterns)
}

fn exact_date_branch(bounds: &Bounds, subject: &Variable, object: &Variable, exact_prop: Iri) -> GraphPattern {
    let exact = object.suffixed("exact");
    let mut patterns = vec![GraphPattern::bgp(vec![Triple::new(
        subject.clone(),
        exact_prop,
        exact.clone(),
    )])];
    patterns.extend(bounds.within(&exact).map(GraphPattern::filter));
    GraphPattern::group(patterns)
}

fn direct_filter(bounds: &Bounds, object: &Variable) -> GraphPattern {
    // Bounds::of guarantees at least one side, so `within` is never empty.
    bounds.within(object).map_or_else(
        || GraphPattern::group(Vec::new()),
        GraphPattern::filter,
    )
}
