//! Graph pattern types.
//!
//! A deliberately small slice of SPARQL algebra: basic graph patterns,
//! filters over comparisons, groups and unions. Every type renders to SPARQL
//! text through `Display` and serializes to JSON tagged by `type`, so query
//! assemblers can either splice text or walk the structure.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::format::XSD_DATE_TIME;

const VARIABLE_PATTERN: &str = r"^[A-Za-z0-9_]+$";
const PREFIXED_NAME_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_.-]*:[A-Za-z0-9_][A-Za-z0-9_.-]*$";

static VARIABLE_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static PREFIXED_NAME_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn matches(cell: &'static OnceLock<Result<Regex, regex::Error>>, pattern: &'static str, text: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .is_ok_and(|re| re.is_match(text))
}

/// A query variable, stored without its `?` sigil.
///
/// Names follow the ASCII subset of SPARQL's `VARNAME`: letters, digits and
/// underscores, a leading digit included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Variable(String);

impl TryFrom<String> for Variable {
    type Error = CompileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Variable {
    /// Creates a variable from a name, with or without a leading `?` / `$`.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::InvalidVariable` if the name is not a plain
    /// SPARQL variable name.
    pub fn new(name: impl Into<String>) -> Result<Self, CompileError> {
        let name = name.into();
        let bare = name.trim_start_matches(['?', '$']);
        if matches(&VARIABLE_REGEX, VARIABLE_PATTERN, bare) {
            Ok(Self(bare.to_string()))
        } else {
            Err(CompileError::InvalidVariable { name })
        }
    }

    /// Derives a fresh variable by appending `_suffix`.
    #[must_use]
    pub fn suffixed(&self, suffix: &str) -> Self {
        Self(format!("{}_{suffix}", self.0))
    }

    /// The name without its sigil.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// A named node: either a full IRI or a prefixed name such as `ex:begin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Iri(String);

impl TryFrom<String> for Iri {
    type Error = CompileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Iri {
    /// Creates a named node.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::InvalidIri` if the value is empty or contains
    /// characters that cannot appear in an IRI reference.
    pub fn new(iri: impl Into<String>) -> Result<Self, CompileError> {
        let iri = iri.into();
        let trimmed = iri.trim();
        let forbidden = |c: char| c.is_whitespace() || "<>\"{}|^`\\".contains(c);
        if trimmed.is_empty() || trimmed.chars().any(forbidden) {
            return Err(CompileError::InvalidIri { iri });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The `xsd:dateTime` datatype.
    pub fn xsd_date_time() -> Self {
        Self(XSD_DATE_TIME.to_string())
    }

    /// The IRI or prefixed name as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this is written as `prefix:local` rather than a full IRI.
    pub fn is_prefixed_name(&self) -> bool {
        !self.0.contains("//") && matches(&PREFIXED_NAME_REGEX, PREFIXED_NAME_PATTERN, &self.0)
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_prefixed_name() {
            f.write_str(&self.0)
        } else {
            write!(f, "<{}>", self.0)
        }
    }
}

/// A typed literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    lexical: String,
    datatype: Iri,
}

impl Literal {
    /// Creates a literal with `datatype`.
    #[must_use]
    pub fn typed(lexical: impl Into<String>, datatype: Iri) -> Self {
        Self {
            lexical: lexical.into(),
            datatype,
        }
    }

    /// Lexical form, unescaped.
    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    /// Datatype IRI.
    pub const fn datatype(&self) -> &Iri {
        &self.datatype
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.lexical.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                _ => write!(f, "{c}")?,
            }
        }
        write!(f, "\"^^{}", self.datatype)
    }
}

/// Any RDF term that can appear in a triple or comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Term {
    /// A query variable.
    Variable(Variable),
    /// A named node.
    Iri(Iri),
    /// A typed literal.
    Literal(Literal),
}

impl Term {
    /// The named node, if this is one.
    pub const fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The variable, if this is one.
    pub const fn as_variable(&self) -> Option<&Variable> {
        match self {
            Self::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// The literal, if this is one.
    pub const fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(l) => Some(l),
            _ => None,
        }
    }
}

impl From<Variable> for Term {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

impl From<Iri> for Term {
    fn from(value: Iri) -> Self {
        Self::Iri(value)
    }
}

impl From<Literal> for Term {
    fn from(value: Literal) -> Self {
        Self::Literal(value)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(v) => fmt::Display::fmt(v, f),
            Self::Iri(iri) => fmt::Display::fmt(iri, f),
            Self::Literal(l) => fmt::Display::fmt(l, f),
        }
    }
}

/// A subject-predicate-object triple pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject term.
    pub subject: Term,
    /// Predicate term.
    pub predicate: Term,
    /// Object term.
    pub object: Term,
}

impl Triple {
    /// Creates a triple pattern.
    #[must_use]
    pub fn new(subject: impl Into<Term>, predicate: impl Into<Term>, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// Comparison operators usable in a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `=`
    Eq,
    /// `>=`
    Ge,
    /// `>`
    Gt,
}

impl CompareOp {
    /// SPARQL operator text.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Ge => ">=",
            Self::Gt => ">",
        }
    }
}

/// A filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    /// `left op right`
    Compare {
        /// Operator.
        op: CompareOp,
        /// Left operand.
        left: Term,
        /// Right operand.
        right: Term,
    },
    /// All operands hold (`&&`).
    And {
        /// Conjoined expressions.
        operands: Vec<Expression>,
    },
    /// Any operand holds (`||`).
    Or {
        /// Disjoined expressions.
        operands: Vec<Expression>,
    },
}

impl Expression {
    /// Builds a comparison.
    #[must_use]
    pub fn compare(left: impl Into<Term>, op: CompareOp, right: impl Into<Term>) -> Self {
        Self::Compare {
            op,
            left: left.into(),
            right: right.into(),
        }
    }

    /// Conjunction of `operands`, collapsing a single operand to itself.
    ///
    /// Returns `None` when there is nothing to conjoin.
    pub fn all(mut operands: Vec<Expression>) -> Option<Self> {
        match operands.len() {
            0 => None,
            1 => operands.pop(),
            _ => Some(Self::And { operands }),
        }
    }

    fn write_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { .. } => fmt::Display::fmt(self, f),
            _ => write!(f, "({self})"),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (operands, joiner) = match self {
            Self::Compare { op, left, right } => {
                return write!(f, "{left} {} {right}", op.symbol());
            }
            Self::And { operands } => (operands, " && "),
            Self::Or { operands } => (operands, " || "),
        };
        for (i, operand) in operands.iter().enumerate() {
            if i > 0 {
                f.write_str(joiner)?;
            }
            operand.write_operand(f)?;
        }
        Ok(())
    }
}

/// A graph pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphPattern {
    /// A basic graph pattern: triples that must all match.
    Bgp {
        /// Triples in order.
        triples: Vec<Triple>,
    },
    /// A filter constraining the solutions of the enclosing group.
    Filter {
        /// The condition.
        expression: Expression,
    },
    /// A `{ … }` group.
    Group {
        /// Members of the group.
        patterns: Vec<GraphPattern>,
    },
    /// Alternatives joined with `UNION`: a solution of any one matches.
    Union {
        /// The alternatives.
        patterns: Vec<GraphPattern>,
    },
}

impl GraphPattern {
    /// A basic graph pattern.
    #[must_use]
    pub fn bgp(triples: Vec<Triple>) -> Self {
        Self::Bgp { triples }
    }

    /// A `FILTER`.
    #[must_use]
    pub fn filter(expression: Expression) -> Self {
        Self::Filter { expression }
    }

    /// A `{ … }` group.
    #[must_use]
    pub fn group(patterns: Vec<GraphPattern>) -> Self {
        Self::Group { patterns }
    }

    /// Alternatives joined with `UNION`.
    #[must_use]
    pub fn union(patterns: Vec<GraphPattern>) -> Self {
        Self::Union { patterns }
    }

    /// True for a bare `FILTER`.
    pub const fn is_filter(&self) -> bool {
        matches!(self, Self::Filter { .. })
    }

    /// True for a `UNION`.
    pub const fn is_union(&self) -> bool {
        matches!(self, Self::Union { .. })
    }

    /// Every named node mentioned anywhere in this pattern, in order.
    pub fn iris(&self) -> Vec<&Iri> {
        let mut out = Vec::new();
        self.collect_terms(&mut |term| {
            if let Term::Iri(iri) = term {
                out.push(iri);
            }
        });
        out
    }

    /// Every literal mentioned anywhere in this pattern, in order.
    pub fn literals(&self) -> Vec<&Literal> {
        let mut out = Vec::new();
        self.collect_terms(&mut |term| {
            if let Term::Literal(l) = term {
                out.push(l);
            }
        });
        out
    }

    /// True if `iri` appears anywhere in this pattern.
    pub fn mentions(&self, iri: &str) -> bool {
        self.iris().iter().any(|i| i.as_str() == iri)
    }

    fn collect_terms<'a>(&'a self, visit: &mut dyn FnMut(&'a Term)) {
        match self {
            Self::Bgp { triples } => {
                for t in triples {
                    visit(&t.subject);
                    visit(&t.predicate);
                    visit(&t.object);
                }
            }
            Self::Filter { expression } => collect_expression_terms(expression, visit),
            Self::Group { patterns } | Self::Union { patterns } => {
                for p in patterns {
                    p.collect_terms(visit);
                }
            }
        }
    }
}

fn collect_expression_terms<'a>(expression: &'a Expression, visit: &mut dyn FnMut(&'a Term)) {
    match expression {
        Expression::Compare { left, right, .. } => {
            visit(left);
            visit(right);
        }
        Expression::And { operands } | Expression::Or { operands } => {
            for e in operands {
                collect_expression_terms(e, visit);
            }
        }
    }
}

impl fmt::Display for GraphPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bgp { triples } => {
                for (i, t) in triples.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    fmt::Display::fmt(t, f)?;
                }
                Ok(())
            }
            Self::Filter { expression } => write!(f, "FILTER({expression})"),
            Self::Group { patterns } => {
                f.write_str("{")?;
                for p in patterns {
                    write!(f, " {p}")?;
                }
                f.write_str(" }")
            }
            Self::Union { patterns } => {
                for (i, p) in patterns.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" UNION ")?;
                    }
                    match p {
                        Self::Group { .. } => fmt::Display::fmt(p, f)?,
                        _ => write!(f, "{{ {p} }}")?,
                    }
                }
                Ok(())
            }
        }
    }
}
