//! Student predicate expression tree.
//!
//! # Invariants
//! - A predicate is a pure value: building or combining one never touches
//!   the store.
//! - SQL rendering emits only constant column names and `?` placeholders;
//!   every operand is bound, never formatted into the statement.
//! - In-memory evaluation ([`Predicate::matches`]) agrees with the SQL
//!   rendering for same-typed operands. Comparisons between different value
//!   types are false in memory.

use crate::model::student::Student;
use rusqlite::types::{ToSql, ToSqlOutput};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::{BitAnd, BitOr, Not};

/// Queryable student field. `FirstName`/`LastName` address the embedded
/// attendee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentField {
    Id,
    FirstName,
    LastName,
    FullTime,
    Age,
}

impl StudentField {
    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Id => "student.id",
            Self::FirstName => "student.first_name",
            Self::LastName => "student.last_name",
            Self::FullTime => "student.full_time",
            Self::Age => "student.age",
        }
    }

    fn read(self, student: &Student) -> Value {
        match self {
            Self::Id => Value::Int(student.id().map_or(0, |id| id.get())),
            Self::FirstName => Value::Text(student.attendee().first_name().to_string()),
            Self::LastName => Value::Text(student.attendee().last_name().to_string()),
            Self::FullTime => Value::Bool(student.is_full_time()),
            Self::Age => Value::Int(i64::from(student.age())),
        }
    }
}

/// Operand of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Value {
    fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self.as_int(), other.as_int()) {
            (Some(left), Some(right)) => Some(left.cmp(&right)),
            _ => match (self, other) {
                (Self::Text(left), Self::Text(right)) => Some(left.as_bytes().cmp(right.as_bytes())),
                _ => None,
            },
        }
    }

    // Booleans are stored as 0/1 integers.
    fn as_int(&self) -> Option<i64> {
        match self {
            Self::Bool(value) => Some(i64::from(*value)),
            Self::Int(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Self::Bool(value) => Ok(ToSqlOutput::from(i64::from(*value))),
            Self::Int(value) => Ok(ToSqlOutput::from(*value)),
            Self::Text(value) => Ok(ToSqlOutput::from(value.as_str())),
        }
    }
}

/// Boolean condition over student fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Equals { field: StudentField, value: Value },
    /// ASCII case-insensitive text equality.
    EqualsIgnoreCase { field: StudentField, value: String },
    GreaterThan { field: StudentField, value: Value },
    LessThan { field: StudentField, value: Value },
    /// True when every child is true; an empty list is true.
    And(Vec<Predicate>),
    /// True when any child is true; an empty list is false.
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn eq(field: StudentField, value: impl Into<Value>) -> Self {
        Self::Equals {
            field,
            value: value.into(),
        }
    }

    pub fn eq_ignore_case(field: StudentField, value: impl Into<String>) -> Self {
        Self::EqualsIgnoreCase {
            field,
            value: value.into(),
        }
    }

    pub fn gt(field: StudentField, value: impl Into<Value>) -> Self {
        Self::GreaterThan {
            field,
            value: value.into(),
        }
    }

    pub fn lt(field: StudentField, value: impl Into<Value>) -> Self {
        Self::LessThan {
            field,
            value: value.into(),
        }
    }

    /// Conjunction; flattens when `self` is already an `And`.
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::And(mut children) => {
                children.push(other);
                Self::And(children)
            }
            first => Self::And(vec![first, other]),
        }
    }

    /// Disjunction; flattens when `self` is already an `Or`.
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Or(mut children) => {
                children.push(other);
                Self::Or(children)
            }
            first => Self::Or(vec![first, other]),
        }
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Evaluates the condition against an in-memory student.
    pub fn matches(&self, student: &Student) -> bool {
        match self {
            Self::Equals { field, value } => {
                field.read(student).compare(value) == Some(Ordering::Equal)
            }
            Self::EqualsIgnoreCase { field, value } => match field.read(student) {
                Value::Text(current) => current.eq_ignore_ascii_case(value),
                _ => false,
            },
            Self::GreaterThan { field, value } => {
                field.read(student).compare(value) == Some(Ordering::Greater)
            }
            Self::LessThan { field, value } => {
                field.read(student).compare(value) == Some(Ordering::Less)
            }
            Self::And(children) => children.iter().all(|child| child.matches(student)),
            Self::Or(children) => children.iter().any(|child| child.matches(student)),
            Self::Not(inner) => !inner.matches(student),
        }
    }

    /// Renders the condition as a SQL boolean expression, appending operands
    /// to `binds` in placeholder order.
    pub(crate) fn write_sql(&self, sql: &mut String, binds: &mut Vec<Value>) {
        match self {
            Self::Equals { field, value } => {
                sql.push_str(&format!("{} = ?", field.column()));
                binds.push(value.clone());
            }
            Self::EqualsIgnoreCase { field, value } => {
                sql.push_str(&format!("lower({}) = lower(?)", field.column()));
                binds.push(Value::Text(value.clone()));
            }
            Self::GreaterThan { field, value } => {
                sql.push_str(&format!("{} > ?", field.column()));
                binds.push(value.clone());
            }
            Self::LessThan { field, value } => {
                sql.push_str(&format!("{} < ?", field.column()));
                binds.push(value.clone());
            }
            Self::And(children) => write_joined(sql, binds, children, " AND ", "1 = 1"),
            Self::Or(children) => write_joined(sql, binds, children, " OR ", "1 = 0"),
            Self::Not(inner) => {
                sql.push_str("NOT (");
                inner.write_sql(sql, binds);
                sql.push(')');
            }
        }
    }

    pub(crate) fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = String::new();
        let mut binds = Vec::new();
        self.write_sql(&mut sql, &mut binds);
        (sql, binds)
    }
}

fn write_joined(
    sql: &mut String,
    binds: &mut Vec<Value>,
    children: &[Predicate],
    separator: &str,
    empty: &str,
) {
    if children.is_empty() {
        sql.push_str(empty);
        return;
    }
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            sql.push_str(separator);
        }
        sql.push('(');
        child.write_sql(sql, binds);
        sql.push(')');
    }
}

impl BitAnd for Predicate {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for Predicate {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl Not for Predicate {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::{Predicate, StudentField, Value};
    use crate::model::person::Person;
    use crate::model::student::Student;
    use crate::query::expressions::{has_last_name, is_full_time, is_older_than};

    #[test]
    fn and_flattens_and_renders_parenthesized_placeholders() {
        let predicate = has_last_name("Smith").and(is_full_time()).and(is_older_than(15));
        let (sql, binds) = predicate.to_sql();

        assert_eq!(
            sql,
            "(student.last_name = ?) AND (student.full_time = ?) AND (student.age > ?)"
        );
        assert_eq!(
            binds,
            vec![
                Value::Text("Smith".to_string()),
                Value::Bool(true),
                Value::Int(15)
            ]
        );
    }

    #[test]
    fn empty_groups_render_constant_conditions() {
        assert_eq!(Predicate::And(Vec::new()).to_sql().0, "1 = 1");
        assert_eq!(Predicate::Or(Vec::new()).to_sql().0, "1 = 0");
    }

    #[test]
    fn operators_compose_like_methods() {
        let by_operator = is_full_time() | is_older_than(20);
        let by_method = is_full_time().or(is_older_than(20));
        assert_eq!(by_operator, by_method);

        let negated = !is_full_time();
        assert_eq!(negated.to_sql().0, "NOT (student.full_time = ?)");
    }

    #[test]
    fn matches_evaluates_in_memory() {
        let student = Student::new(Person::new("Jane", "Doe"), true, 20);

        assert!((is_full_time() & is_older_than(15)).matches(&student));
        assert!(!is_older_than(20).matches(&student));
        assert!(Predicate::lt(StudentField::Age, 21).matches(&student));
        assert!(Predicate::eq_ignore_case(StudentField::LastName, "DOE").matches(&student));
        assert!(!has_last_name("DOE").matches(&student));
    }

    #[test]
    fn mismatched_operand_types_do_not_match() {
        let student = Student::new(Person::new("Jane", "Doe"), false, 20);
        assert!(!Predicate::eq(StudentField::Age, "20").matches(&student));
    }
}
