//! Typed predicate construction
//!
//! [`CriteriaBuilder`] turns comparison intents into [`Predicate`]s. Every
//! comparison takes the query [`Root`], a dotted field path and an optional
//! value. A `None` value means the criterion is unset: the builder returns
//! `Ok(None)`, which [`CriteriaBuilder::and`] and [`CriteriaBuilder::or`]
//! drop. An unset criterion therefore never narrows a result, it never
//! matches nothing either.
//!
//! # Example
//!
//! ```rust,ignore
//! fn predicate(&self, cb: &CriteriaBuilder, root: &Root) -> DaoResult<Option<Predicate>> {
//!     Ok(cb.and([
//!         cb.equals(root, "email", self.email.as_deref())?,
//!         cb.greater_than(root, "address.number", self.min_number)?,
//!     ]))
//! }
//! ```

use crate::core::error::{DaoError, DaoResult};
use crate::core::field::{FieldValue, ScalarType};
use crate::core::path::{Path, Root};
use crate::core::predicate::{ComparisonOp, Expression, Order, Predicate};

/// Builder for predicates and sort clauses
#[derive(Debug, Default, Clone, Copy)]
pub struct CriteriaBuilder;

impl CriteriaBuilder {
    pub fn new() -> Self {
        Self
    }

    /// `field = value`
    pub fn equals<V: Into<FieldValue>>(
        &self,
        root: &Root,
        field: &str,
        value: Option<V>,
    ) -> DaoResult<Option<Predicate>> {
        self.compare(root, field, ComparisonOp::Equal, value)
    }

    /// `field <> value`
    pub fn not_equals<V: Into<FieldValue>>(
        &self,
        root: &Root,
        field: &str,
        value: Option<V>,
    ) -> DaoResult<Option<Predicate>> {
        self.compare(root, field, ComparisonOp::NotEqual, value)
    }

    /// `field < value`
    pub fn less_than<V: Into<FieldValue>>(
        &self,
        root: &Root,
        field: &str,
        value: Option<V>,
    ) -> DaoResult<Option<Predicate>> {
        self.compare(root, field, ComparisonOp::LessThan, value)
    }

    /// `field <= value`
    pub fn less_than_or_equal<V: Into<FieldValue>>(
        &self,
        root: &Root,
        field: &str,
        value: Option<V>,
    ) -> DaoResult<Option<Predicate>> {
        self.compare(root, field, ComparisonOp::LessThanOrEqual, value)
    }

    /// `field > value`
    pub fn greater_than<V: Into<FieldValue>>(
        &self,
        root: &Root,
        field: &str,
        value: Option<V>,
    ) -> DaoResult<Option<Predicate>> {
        self.compare(root, field, ComparisonOp::GreaterThan, value)
    }

    /// `field >= value`
    pub fn greater_than_or_equal<V: Into<FieldValue>>(
        &self,
        root: &Root,
        field: &str,
        value: Option<V>,
    ) -> DaoResult<Option<Predicate>> {
        self.compare(root, field, ComparisonOp::GreaterThanOrEqual, value)
    }

    /// `UPPER(field) = UPPER(value)`
    pub fn equals_ignore_case(
        &self,
        root: &Root,
        field: &str,
        value: Option<&str>,
    ) -> DaoResult<Option<Predicate>> {
        let path = self.text_path(root, field, "equals_ignore_case")?;
        Ok(value.map(|value| Predicate::Comparison {
            left: Expression::from(path).upper(),
            op: ComparisonOp::Equal,
            right: FieldValue::String(value.to_uppercase()),
        }))
    }

    /// `field LIKE '%value%'`
    ///
    /// Wildcards inside `value` are kept, so `"a_c"` also matches `"abc"`.
    pub fn like(
        &self,
        root: &Root,
        field: &str,
        value: Option<&str>,
    ) -> DaoResult<Option<Predicate>> {
        let path = self.text_path(root, field, "like")?;
        Ok(value.map(|value| Predicate::Like {
            expr: Expression::from(path),
            pattern: format!("%{}%", value),
        }))
    }

    /// `UPPER(field) LIKE UPPER('%value%')`
    pub fn like_ignore_case(
        &self,
        root: &Root,
        field: &str,
        value: Option<&str>,
    ) -> DaoResult<Option<Predicate>> {
        let path = self.text_path(root, field, "like_ignore_case")?;
        Ok(value.map(|value| Predicate::Like {
            expr: Expression::from(path).upper(),
            pattern: format!("%{}%", value.to_uppercase()),
        }))
    }

    /// `field IN (values...)`; no values means no constraint
    pub fn in_<I, V>(&self, root: &Root, field: &str, values: I) -> DaoResult<Option<Predicate>>
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let (path, ty) = self.value_path(root, field)?;
        let values = self.checked_values(&path, ty, "in", values)?;
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(Predicate::In {
            expr: Expression::from(path),
            values,
        }))
    }

    /// `field = v0 OR field = v1 OR ...`; no values means no constraint
    pub fn any_equals<I, V>(
        &self,
        root: &Root,
        field: &str,
        values: I,
    ) -> DaoResult<Option<Predicate>>
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let (path, ty) = self.value_path(root, field)?;
        let values = self.checked_values(&path, ty, "any_equals", values)?;
        let alternatives = values.into_iter().map(|value| {
            Some(Predicate::Comparison {
                left: Expression::from(path.clone()),
                op: ComparisonOp::Equal,
                right: value,
            })
        });
        Ok(self.or(alternatives))
    }

    /// `field IS NULL`
    pub fn is_null(&self, root: &Root, field: &str) -> DaoResult<Option<Predicate>> {
        let (path, _) = self.value_path(root, field)?;
        Ok(Some(Predicate::IsNull(Expression::from(path))))
    }

    /// `field IS NOT NULL`
    pub fn is_not_null(&self, root: &Root, field: &str) -> DaoResult<Option<Predicate>> {
        let (path, _) = self.value_path(root, field)?;
        Ok(Some(Predicate::IsNotNull(Expression::from(path))))
    }

    /// Conjunction of the given predicates, skipping unset ones
    pub fn and<I>(&self, predicates: I) -> Option<Predicate>
    where
        I: IntoIterator<Item = Option<Predicate>>,
    {
        combine(predicates, Predicate::And)
    }

    /// Disjunction of the given predicates, skipping unset ones
    pub fn or<I>(&self, predicates: I) -> Option<Predicate>
    where
        I: IntoIterator<Item = Option<Predicate>>,
    {
        combine(predicates, Predicate::Or)
    }

    /// Negation; an unset predicate stays unset
    pub fn not(&self, predicate: Option<Predicate>) -> Option<Predicate> {
        predicate.map(|p| Predicate::Not(Box::new(p)))
    }

    /// Ascending sort on a field
    pub fn asc(&self, root: &Root, field: &str) -> DaoResult<Order> {
        let (path, _) = self.value_path(root, field)?;
        Ok(Order::asc(path))
    }

    /// Descending sort on a field
    pub fn desc(&self, root: &Root, field: &str) -> DaoResult<Order> {
        let (path, _) = self.value_path(root, field)?;
        Ok(Order::desc(path))
    }

    fn compare<V: Into<FieldValue>>(
        &self,
        root: &Root,
        field: &str,
        op: ComparisonOp,
        value: Option<V>,
    ) -> DaoResult<Option<Predicate>> {
        let (path, ty) = self.value_path(root, field)?;
        if op.is_ordering() && !ty.is_ordered() {
            return Err(unsupported(
                op.symbol(),
                &path,
                format!("{:?} fields have no ordering", ty),
            ));
        }

        let value = match value.map(Into::<FieldValue>::into) {
            None | Some(FieldValue::Null) => return Ok(None),
            Some(value) => value,
        };
        check_type(&path, ty, op.symbol(), &value)?;

        Ok(Some(Predicate::Comparison {
            left: Expression::from(path),
            op,
            right: value,
        }))
    }

    fn value_path(&self, root: &Root, field: &str) -> DaoResult<(Path, ScalarType)> {
        let path = root.get(field)?;
        let ty = path.expect_scalar()?;
        Ok((path, ty))
    }

    fn text_path(&self, root: &Root, field: &str, operation: &str) -> DaoResult<Path> {
        let (path, ty) = self.value_path(root, field)?;
        if !ty.is_textual() {
            return Err(unsupported(
                operation,
                &path,
                format!("expected a String field, found {:?}", ty),
            ));
        }
        Ok(path)
    }

    fn checked_values<I, V>(
        &self,
        path: &Path,
        ty: ScalarType,
        operation: &str,
        values: I,
    ) -> DaoResult<Vec<FieldValue>>
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let mut checked = Vec::new();
        for value in values.into_iter().map(Into::<FieldValue>::into) {
            if value.is_null() {
                continue;
            }
            check_type(path, ty, operation, &value)?;
            checked.push(value);
        }
        Ok(checked)
    }
}

fn combine<I, F>(predicates: I, wrap: F) -> Option<Predicate>
where
    I: IntoIterator<Item = Option<Predicate>>,
    F: FnOnce(Vec<Predicate>) -> Predicate,
{
    let mut present: Vec<Predicate> = predicates.into_iter().flatten().collect();
    match present.len() {
        0 => None,
        1 => present.pop(),
        _ => Some(wrap(present)),
    }
}

fn check_type(path: &Path, ty: ScalarType, operation: &str, value: &FieldValue) -> DaoResult<()> {
    let numeric = |t: ScalarType| matches!(t, ScalarType::Integer | ScalarType::Float);
    match value.scalar_type() {
        Some(found) if found == ty || (numeric(found) && numeric(ty)) => Ok(()),
        Some(found) => Err(unsupported(
            operation,
            path,
            format!("expected a {:?} value, found {:?}", ty, found),
        )),
        None => Ok(()),
    }
}

fn unsupported(operation: &str, path: &Path, message: String) -> DaoError {
    DaoError::UnsupportedOperation {
        operation: operation.to_string(),
        path: path.to_string(),
        message,
    }
}
