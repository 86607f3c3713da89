//! Rendering of predicates and sort clauses to PostgreSQL
//!
//! Records live in a JSONB `data` column of the `entities` table, queried
//! as `e`. A field becomes a `e.data #>> '{"name"}'` text extraction cast to
//! the field's scalar type. Relations are stored as `{"id": ..}`
//! references, so every relation hop of a dotted path reads the related
//! row through a scalar subquery on its id.
//!
//! LIKE runs without an escape character and text compares and sorts in
//! byte order (`COLLATE "C"`), the semantics of the in-memory store.
//! Values are never inlined: each one becomes a `$n` placeholder and is
//! returned alongside the SQL text for binding.

use crate::core::field::{FieldValue, ScalarType};
use crate::core::path::Path;
use crate::core::predicate::{Expression, Order, Predicate, SortDirection};

/// SQL text plus the values its placeholders refer to, in order
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub binds: Vec<FieldValue>,
}

/// Incremental renderer; placeholders continue from `first_placeholder`
#[derive(Debug)]
pub struct SqlRenderer {
    first_placeholder: usize,
    binds: Vec<FieldValue>,
}

impl SqlRenderer {
    /// Start numbering placeholders after `reserved` leading parameters
    pub fn new(reserved: usize) -> Self {
        Self {
            first_placeholder: reserved + 1,
            binds: Vec::new(),
        }
    }

    pub fn predicate(&mut self, predicate: &Predicate) -> String {
        match predicate {
            Predicate::Comparison { left, op, right } => {
                let right = coerce(right, left.scalar_type());
                let left = collated(left);
                format!("{} {} {}", left, op.symbol(), self.placeholder(&right))
            }
            Predicate::Like { expr, pattern } => {
                let expr = expression(expr);
                let pattern = FieldValue::String(pattern.clone());
                format!("{} LIKE {} ESCAPE ''", expr, self.placeholder(&pattern))
            }
            Predicate::In { expr, values } => {
                let ty = expr.scalar_type();
                let expr = expression(expr);
                let list = values
                    .iter()
                    .map(|v| self.placeholder(&coerce(v, ty)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} IN ({})", expr, list)
            }
            Predicate::IsNull(expr) => format!("{} IS NULL", expression(expr)),
            Predicate::IsNotNull(expr) => format!("{} IS NOT NULL", expression(expr)),
            Predicate::And(parts) => self.junction(parts, " AND "),
            Predicate::Or(parts) => self.junction(parts, " OR "),
            Predicate::Not(inner) => format!("NOT ({})", self.predicate(inner)),
        }
    }

    /// Consume the renderer, pairing the SQL with the collected binds
    pub fn finish(self, sql: String) -> SqlFragment {
        SqlFragment {
            sql,
            binds: self.binds,
        }
    }

    fn junction(&mut self, parts: &[Predicate], separator: &str) -> String {
        let rendered: Vec<String> = parts.iter().map(|p| self.predicate(p)).collect();
        format!("({})", rendered.join(separator))
    }

    fn placeholder(&mut self, value: &FieldValue) -> String {
        self.binds.push(value.clone());
        format!("${}", self.first_placeholder + self.binds.len() - 1)
    }
}

/// Render a whole predicate with placeholders starting after `reserved`
pub fn render_predicate(predicate: &Predicate, reserved: usize) -> SqlFragment {
    let mut renderer = SqlRenderer::new(reserved);
    let sql = renderer.predicate(predicate);
    renderer.finish(sql)
}

/// Render sort clauses as the body of an ORDER BY
///
/// PostgreSQL sorts nulls last ascending and first descending, which is
/// the order the in-memory store reproduces.
pub fn render_orders(orders: &[Order]) -> String {
    orders
        .iter()
        .map(|order| {
            let direction = match order.direction {
                SortDirection::Ascending => "ASC",
                SortDirection::Descending => "DESC",
            };
            format!("{} {}", collated(&order.expression), direction)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Integer values compared with a float column are bound as floats
fn coerce(value: &FieldValue, column: Option<ScalarType>) -> FieldValue {
    match (value, column) {
        (FieldValue::Integer(i), Some(ScalarType::Float)) => FieldValue::Float(*i as f64),
        _ => value.clone(),
    }
}

fn expression(expr: &Expression) -> String {
    match expr {
        Expression::Path(path) => column(path),
        Expression::Upper(inner) => format!("UPPER({})", expression(inner)),
    }
}

/// Text expressions compare in byte order
fn collated(expr: &Expression) -> String {
    match expr.scalar_type() {
        Some(ScalarType::String) => format!("{} COLLATE \"C\"", expression(expr)),
        _ => expression(expr),
    }
}

/// `'{"a","b"}'` text array literal for the `#>>` operator
fn text_path(segments: &[&str]) -> String {
    // Segments are schema field names, escaped anyway
    let quoted = segments
        .iter()
        .map(|s| format!("\"{}\"", s.replace('\'', "''").replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(",");
    format!("'{{{}}}'", quoted)
}

/// The document the last segment of a path is read from
fn document(path: &Path) -> String {
    let segments = path.segments();
    let owners = path.owners();
    let mut doc = "e.data".to_string();
    for depth in 0..segments.len().saturating_sub(1) {
        let target = owners[depth + 1].name.replace('\'', "''");
        doc = format!(
            "(SELECT r{d}.data FROM entities r{d} WHERE r{d}.entity_type = '{target}' \
             AND r{d}.id = ({doc} #>> {id})::uuid)",
            d = depth,
            target = target,
            doc = doc,
            id = text_path(&[segments[depth], "id"]),
        );
    }
    doc
}

fn column(path: &Path) -> String {
    let last = path.segments().last().copied().unwrap_or_default();
    let text = format!("({} #>> {})", document(path), text_path(&[last]));
    match path.scalar_type() {
        Some(ScalarType::Integer) => format!("{}::bigint", text),
        Some(ScalarType::Float) => format!("{}::double precision", text),
        Some(ScalarType::Boolean) => format!("{}::boolean", text),
        Some(ScalarType::Uuid) => format!("{}::uuid", text),
        Some(ScalarType::DateTime) => format!("{}::timestamptz", text),
        Some(ScalarType::String) | None => text,
    }
}
