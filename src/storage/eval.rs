//! Predicate evaluation and sorting over JSON documents
//!
//! Records are evaluated in their serde JSON form, with relations already
//! resolved to the related records. Paths are followed through nested
//! objects; a missing or null hop reads as SQL `NULL`. Text compares in
//! byte order and LIKE has no escape character.
//! Conditions use three-valued logic: a comparison involving `NULL` is
//! unknown, and only rows whose predicate is definitely true are selected.

use crate::core::error::StoreError;
use crate::core::field::FieldValue;
use crate::core::path::Path;
use crate::core::predicate::{ComparisonOp, Expression, Order, Predicate};
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;

/// A predicate prepared for repeated evaluation (LIKE patterns compiled once)
pub struct Matcher<'p> {
    root: Option<Node<'p>>,
}

enum Node<'p> {
    Compare {
        expr: &'p Expression,
        op: ComparisonOp,
        value: &'p FieldValue,
    },
    Like {
        expr: &'p Expression,
        regex: Regex,
    },
    In {
        expr: &'p Expression,
        values: &'p [FieldValue],
    },
    IsNull(&'p Expression),
    IsNotNull(&'p Expression),
    And(Vec<Node<'p>>),
    Or(Vec<Node<'p>>),
    Not(Box<Node<'p>>),
}

impl<'p> Matcher<'p> {
    /// Prepare a predicate; `None` matches every document
    pub fn new(predicate: Option<&'p Predicate>) -> Result<Self, StoreError> {
        let root = predicate.map(Node::compile).transpose()?;
        Ok(Self { root })
    }

    pub fn matches(&self, doc: &Value) -> bool {
        match &self.root {
            Some(node) => node.eval(doc) == Some(true),
            None => true,
        }
    }
}

impl<'p> Node<'p> {
    fn compile(predicate: &'p Predicate) -> Result<Self, StoreError> {
        Ok(match predicate {
            Predicate::Comparison { left, op, right } => Node::Compare {
                expr: left,
                op: *op,
                value: right,
            },
            Predicate::Like { expr, pattern } => Node::Like {
                expr,
                regex: like_regex(pattern)?,
            },
            Predicate::In { expr, values } => Node::In { expr, values },
            Predicate::IsNull(expr) => Node::IsNull(expr),
            Predicate::IsNotNull(expr) => Node::IsNotNull(expr),
            Predicate::And(parts) => Node::And(compile_all(parts)?),
            Predicate::Or(parts) => Node::Or(compile_all(parts)?),
            Predicate::Not(inner) => Node::Not(Box::new(Node::compile(inner)?)),
        })
    }

    /// `Some(true)`, `Some(false)`, or `None` for unknown
    fn eval(&self, doc: &Value) -> Option<bool> {
        match self {
            Node::Compare { expr, op, value } => {
                let ordering = evaluate(doc, expr).compare(value)?;
                Some(match op {
                    ComparisonOp::Equal => ordering == Ordering::Equal,
                    ComparisonOp::NotEqual => ordering != Ordering::Equal,
                    ComparisonOp::LessThan => ordering == Ordering::Less,
                    ComparisonOp::LessThanOrEqual => ordering != Ordering::Greater,
                    ComparisonOp::GreaterThan => ordering == Ordering::Greater,
                    ComparisonOp::GreaterThanOrEqual => ordering != Ordering::Less,
                })
            }
            Node::Like { expr, regex } => match evaluate(doc, expr) {
                FieldValue::String(s) => Some(regex.is_match(&s)),
                _ => None,
            },
            Node::In { expr, values } => {
                let left = evaluate(doc, expr);
                if left.is_null() {
                    return None;
                }
                Some(values.iter().any(|v| left.compare(v) == Some(Ordering::Equal)))
            }
            Node::IsNull(expr) => Some(evaluate(doc, expr).is_null()),
            Node::IsNotNull(expr) => Some(!evaluate(doc, expr).is_null()),
            Node::And(parts) => {
                let mut unknown = false;
                for part in parts {
                    match part.eval(doc) {
                        Some(false) => return Some(false),
                        None => unknown = true,
                        Some(true) => {}
                    }
                }
                if unknown { None } else { Some(true) }
            }
            Node::Or(parts) => {
                let mut unknown = false;
                for part in parts {
                    match part.eval(doc) {
                        Some(true) => return Some(true),
                        None => unknown = true,
                        Some(false) => {}
                    }
                }
                if unknown { None } else { Some(false) }
            }
            Node::Not(inner) => inner.eval(doc).map(|b| !b),
        }
    }
}

fn compile_all(parts: &[Predicate]) -> Result<Vec<Node<'_>>, StoreError> {
    parts.iter().map(Node::compile).collect()
}

/// Translate a SQL LIKE pattern into an anchored regex
fn like_regex(pattern: &str) -> Result<Regex, StoreError> {
    let mut re = String::from("(?s)^");
    for c in pattern.chars() {
        match c {
            '%' => re.push_str(".*"),
            '_' => re.push('.'),
            other => re.push_str(&regex::escape(other.encode_utf8(&mut [0u8; 4]))),
        }
    }
    re.push('$');
    Regex::new(&re).map_err(|e| StoreError::Query {
        backend: "in-memory".to_string(),
        message: format!("invalid LIKE pattern '{}': {}", pattern, e),
    })
}

/// Follow a path through nested objects
fn lookup<'d>(doc: &'d Value, path: &Path) -> Option<&'d Value> {
    path.segments()
        .iter()
        .try_fold(doc, |current, segment| current.get(*segment))
}

/// Read the value a path points at, typed by the schema
pub fn value_at(doc: &Value, path: &Path) -> FieldValue {
    match (lookup(doc, path), path.scalar_type()) {
        (Some(value), Some(ty)) => FieldValue::from_json(value, ty),
        _ => FieldValue::Null,
    }
}

fn evaluate(doc: &Value, expr: &Expression) -> FieldValue {
    match expr {
        Expression::Path(path) => value_at(doc, path),
        Expression::Upper(inner) => evaluate(doc, inner).to_uppercase(),
    }
}

/// Compare two documents by a list of sort clauses.
///
/// Nulls sort last ascending and first descending.
pub fn compare_documents(a: &Value, b: &Value, orders: &[Order]) -> Ordering {
    for order in orders {
        let left = evaluate(a, &order.expression);
        let right = evaluate(b, &order.expression);
        let ordering = match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => left.compare(&right).unwrap_or(Ordering::Equal),
        };
        let ordering = if order.is_ascending() {
            ordering
        } else {
            ordering.reverse()
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
