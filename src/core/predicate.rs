//! Backend-agnostic predicates and sort clauses
//!
//! These types are what a filter produces and what a store consumes. They
//! carry resolved [`Path`]s, so a store never has to validate field names.

use crate::core::field::{FieldValue, ScalarType};
use crate::core::path::Path;
use std::fmt;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl ComparisonOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "<>",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessThanOrEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterThanOrEqual => ">=",
        }
    }

    /// Whether the operator needs an ordered type
    pub fn is_ordering(&self) -> bool {
        !matches!(self, ComparisonOp::Equal | ComparisonOp::NotEqual)
    }
}

/// A value expression over a field of the query root
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// The value of a (possibly nested) field
    Path(Path),

    /// Upper-cased text of an expression
    Upper(Box<Expression>),
}

impl Expression {
    /// The field path underneath any function wrappers
    pub fn path(&self) -> &Path {
        match self {
            Expression::Path(path) => path,
            Expression::Upper(inner) => inner.path(),
        }
    }

    pub fn upper(self) -> Self {
        Expression::Upper(Box::new(self))
    }

    /// The scalar type of the underlying field
    pub fn scalar_type(&self) -> Option<ScalarType> {
        self.path().scalar_type()
    }
}

impl From<Path> for Expression {
    fn from(path: Path) -> Self {
        Expression::Path(path)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Path(path) => write!(f, "{}", path),
            Expression::Upper(inner) => write!(f, "UPPER({})", inner),
        }
    }
}

/// A composable boolean condition over entity fields.
///
/// "No constraint" is expressed as `Option::<Predicate>::None` by the
/// builder, never as a variant here.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Comparison {
        left: Expression,
        op: ComparisonOp,
        right: FieldValue,
    },

    /// SQL `LIKE` with `%` (any run) and `_` (any single char) wildcards
    Like { expr: Expression, pattern: String },

    In {
        expr: Expression,
        values: Vec<FieldValue>,
    },

    IsNull(Expression),

    IsNotNull(Expression),

    And(Vec<Predicate>),

    Or(Vec<Predicate>),

    Not(Box<Predicate>),
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Comparison { left, op, right } => {
                write!(f, "{} {} {}", left, op.symbol(), literal(right))
            }
            Predicate::Like { expr, pattern } => write!(f, "{} LIKE '{}'", expr, pattern),
            Predicate::In { expr, values } => {
                let values: Vec<String> = values.iter().map(literal).collect();
                write!(f, "{} IN ({})", expr, values.join(", "))
            }
            Predicate::IsNull(expr) => write!(f, "{} IS NULL", expr),
            Predicate::IsNotNull(expr) => write!(f, "{} IS NOT NULL", expr),
            Predicate::And(parts) => write_joined(f, parts, " AND "),
            Predicate::Or(parts) => write_joined(f, parts, " OR "),
            Predicate::Not(inner) => write!(f, "NOT ({})", inner),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, parts: &[Predicate], sep: &str) -> fmt::Result {
    let parts: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
    write!(f, "({})", parts.join(sep))
}

fn literal(value: &FieldValue) -> String {
    match value {
        FieldValue::String(s) => format!("'{}'", s),
        FieldValue::Integer(i) => i.to_string(),
        FieldValue::Float(x) => x.to_string(),
        FieldValue::Boolean(b) => b.to_string(),
        FieldValue::Uuid(u) => format!("'{}'", u),
        FieldValue::DateTime(dt) => format!("'{}'", dt.to_rfc3339()),
        FieldValue::Null => "NULL".to_string(),
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A sort clause over a resolved field
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub expression: Expression,
    pub direction: SortDirection,
}

impl Order {
    pub fn asc(path: Path) -> Self {
        Self {
            expression: Expression::Path(path),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(path: Path) -> Self {
        Self {
            expression: Expression::Path(path),
            direction: SortDirection::Descending,
        }
    }

    pub fn is_ascending(&self) -> bool {
        self.direction == SortDirection::Ascending
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => write!(f, "{} ASC", self.expression),
            SortDirection::Descending => write!(f, "{} DESC", self.expression),
        }
    }
}
