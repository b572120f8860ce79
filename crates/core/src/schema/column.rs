//! Column definition for Tarn table schemas.

use crate::error::{Error, Result};
use crate::types::DataType;
use crate::value::Value;
use alloc::string::String;

/// A column definition in a table schema.
#[derive(Clone, Debug)]
pub struct Column {
    /// Column name.
    name: String,
    /// Data type of the column.
    data_type: DataType,
    /// Whether this column allows null values.
    nullable: bool,
    /// Target table for link and link-list columns.
    link_target: Option<String>,
    /// Column index in the table (0-based).
    index: usize,
}

impl Column {
    /// Creates a new column definition.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: data_type.is_nullable_by_default(),
            link_target: None,
            index: 0,
        }
    }

    /// Creates a link column pointing at rows of `target`.
    pub fn link(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, DataType::Link).link_target(target)
    }

    /// Creates a link-list column pointing at rows of `target`.
    pub fn link_list(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, DataType::LinkList).link_target(target)
    }

    /// Sets whether this column is nullable.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    fn link_target(mut self, target: impl Into<String>) -> Self {
        self.link_target = Some(target.into());
        self
    }

    /// Sets the column index.
    pub(crate) fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Returns the column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the data type.
    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns whether this column is nullable.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the linked table for link columns.
    #[inline]
    pub fn target_table(&self) -> Option<&str> {
        self.link_target.as_deref()
    }

    /// Returns the value a freshly created row holds in this column.
    pub fn default_value(&self) -> Value {
        if self.nullable && self.data_type != DataType::LinkList {
            Value::Null
        } else {
            Value::default_for_type(self.data_type)
        }
    }

    /// Returns the column index.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Checks that `value` may be stored in this column.
    ///
    /// Link lists are never null; an empty list stands for "no links".
    pub fn check_value(&self, value: &Value) -> Result<()> {
        match value.data_type() {
            None if self.nullable && self.data_type != DataType::LinkList => Ok(()),
            None => Err(Error::null_constraint(&self.name)),
            Some(dt) if dt == self.data_type => Ok(()),
            Some(dt) => Err(Error::type_mismatch(self.data_type, Some(dt))),
        }
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.data_type == other.data_type
    }
}
