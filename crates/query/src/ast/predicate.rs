//! Predicate definitions for query filtering.

use crate::ast::expr::{ColumnRef, CompareOp};
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use tarn_core::{Row, Value};

/// A filter over the rows of one table.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// Matches every row.
    All,
    /// Compares a column to a literal.
    Compare {
        column: ColumnRef,
        op: CompareOp,
        value: Value,
    },
    /// Matches rows whose column is null.
    IsNull(ColumnRef),
    /// Matches rows whose column is not null.
    IsNotNull(ColumnRef),
    /// Matches string cells containing `needle`.
    Contains { column: ColumnRef, needle: String },
    /// All children match. Empty matches everything.
    And(Vec<Predicate>),
    /// Any child matches. Empty matches nothing.
    Or(Vec<Predicate>),
    /// Negation.
    Not(Box<Predicate>),
}

/// Returns true if an ordering comparison between the two values is meaningful.
fn comparable(a: &Value, b: &Value) -> bool {
    let numeric = |v: &Value| matches!(v, Value::Int64(_) | Value::Float32(_) | Value::Float64(_));
    (numeric(a) && numeric(b)) || a.data_type() == b.data_type()
}

impl Predicate {
    /// Evaluates the predicate against a row.
    pub fn eval(&self, row: &Row) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Compare { column, op, value } => {
                let cell = match row.get(column.index) {
                    Some(v) => v,
                    None => return false,
                };
                match op {
                    CompareOp::Eq => cell == value,
                    CompareOp::Ne => cell != value,
                    _ => {
                        // Nulls and mismatched types never satisfy an ordering.
                        if cell.is_null() || value.is_null() || !comparable(cell, value) {
                            return false;
                        }
                        let ord = cell.cmp(value);
                        match op {
                            CompareOp::Lt => ord == Ordering::Less,
                            CompareOp::Le => ord != Ordering::Greater,
                            CompareOp::Gt => ord == Ordering::Greater,
                            CompareOp::Ge => ord != Ordering::Less,
                            CompareOp::Eq | CompareOp::Ne => false,
                        }
                    }
                }
            }
            Predicate::IsNull(column) => row.get(column.index).map_or(false, Value::is_null),
            Predicate::IsNotNull(column) => row.get(column.index).map_or(false, |v| !v.is_null()),
            Predicate::Contains { column, needle } => row
                .get(column.index)
                .and_then(Value::as_str)
                .map_or(false, |s| s.contains(needle.as_str())),
            Predicate::And(children) => children.iter().all(|p| p.eval(row)),
            Predicate::Or(children) => children.iter().any(|p| p.eval(row)),
            Predicate::Not(inner) => !inner.eval(row),
        }
    }

    /// Returns the columns referenced by this predicate.
    pub fn columns(&self) -> Vec<&ColumnRef> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a ColumnRef>) {
        match self {
            Predicate::All => {}
            Predicate::Compare { column, .. }
            | Predicate::IsNull(column)
            | Predicate::IsNotNull(column)
            | Predicate::Contains { column, .. } => out.push(column),
            Predicate::And(children) | Predicate::Or(children) => {
                for child in children {
                    child.collect_columns(out);
                }
            }
            Predicate::Not(inner) => inner.collect_columns(out),
        }
    }

    /// Combines two predicates with AND, flattening nested conjunctions.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::All, p) | (p, Predicate::All) => p,
            (Predicate::And(mut a), Predicate::And(b)) => {
                a.extend(b);
                Predicate::And(a)
            }
            (Predicate::And(mut a), p) => {
                a.push(p);
                Predicate::And(a)
            }
            (p, q) => Predicate::And(alloc::vec![p, q]),
        }
    }

    /// Combines two predicates with OR, flattening nested disjunctions.
    pub fn or(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::Or(mut a), Predicate::Or(b)) => {
                a.extend(b);
                Predicate::Or(a)
            }
            (Predicate::Or(mut a), p) => {
                a.push(p);
                Predicate::Or(a)
            }
            (p, q) => Predicate::Or(alloc::vec![p, q]),
        }
    }
}

impl core::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        match self {
            Predicate::Not(inner) => *inner,
            p => Predicate::Not(Box::new(p)),
        }
    }
}
