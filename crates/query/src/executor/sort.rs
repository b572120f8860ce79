//! Sort descriptors.

use crate::ast::{ColumnRef, SortOrder};
use alloc::vec::Vec;
use core::cmp::Ordering;
use tarn_core::schema::Table;
use tarn_core::{Result, Row, RowId};
use tarn_storage::RowStore;

/// Ordered list of sort keys over one table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortDescriptor {
    keys: Vec<(ColumnRef, SortOrder)>,
}

impl SortDescriptor {
    /// Resolves `(column, order)` pairs against the schema.
    pub fn new(schema: &Table, keys: &[(&str, SortOrder)]) -> Result<Self> {
        let keys = keys
            .iter()
            .map(|(name, order)| {
                let index = schema.require_column_index(name)?;
                Ok((ColumnRef::new(*name, index), *order))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { keys })
    }

    /// Sorts by a single column.
    pub fn by(schema: &Table, column: &str, order: SortOrder) -> Result<Self> {
        Self::new(schema, &[(column, order)])
    }

    /// Returns the sort keys.
    pub fn keys(&self) -> &[(ColumnRef, SortOrder)] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Compares two rows key by key.
    ///
    /// A missing cell sorts before any present value in either order.
    pub fn compare(&self, a: Option<&Row>, b: Option<&Row>) -> Ordering {
        for (column, order) in &self.keys {
            let a_val = a.and_then(|r| r.get(column.index));
            let b_val = b.and_then(|r| r.get(column.index));

            let cmp = match (a_val, b_val) {
                (Some(av), Some(bv)) => match order {
                    SortOrder::Asc => av.cmp(bv),
                    SortOrder::Desc => bv.cmp(av),
                },
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };

            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        Ordering::Equal
    }

    /// Sorts row ids in place using the rows in `store`. The sort is stable.
    pub fn sort(&self, store: &RowStore, ids: &mut [RowId]) {
        if self.keys.is_empty() {
            return;
        }
        ids.sort_by(|a, b| self.compare(store.get(*a), store.get(*b)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use tarn_core::schema::TableBuilder;
    use tarn_core::{DataType, Error, Value};

    fn store() -> RowStore {
        let schema = TableBuilder::new("people")
            .unwrap()
            .add_column("name", DataType::String)
            .unwrap()
            .add_column("age", DataType::Int64)
            .unwrap()
            .build()
            .unwrap();
        let mut store = RowStore::new(schema);
        for (name, age) in [("Carol", 42), ("Alice", 31), ("Bob", 25), ("Dave", 31)] {
            store
                .insert(vec![Value::from(name), Value::Int64(age)])
                .unwrap();
        }
        store
    }

    #[test]
    fn test_sort_asc() {
        let store = store();
        let sort = SortDescriptor::by(store.schema(), "age", SortOrder::Asc).unwrap();
        let mut ids = store.row_ids();
        sort.sort(&store, &mut ids);
        assert_eq!(ids, vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_sort_desc_is_stable() {
        let store = store();
        let sort = SortDescriptor::by(store.schema(), "age", SortOrder::Desc).unwrap();
        let mut ids = store.row_ids();
        sort.sort(&store, &mut ids);
        // Alice (1) and Dave (3) tie on age and keep their input order.
        assert_eq!(ids, vec![0, 1, 3, 2]);
    }

    #[test]
    fn test_sort_multiple_keys() {
        let store = store();
        let sort = SortDescriptor::new(
            store.schema(),
            &[("age", SortOrder::Asc), ("name", SortOrder::Desc)],
        )
        .unwrap();
        let mut ids = store.row_ids();
        sort.sort(&store, &mut ids);
        assert_eq!(ids, vec![2, 3, 1, 0]);
    }

    #[test]
    fn test_missing_rows_sort_first() {
        let store = store();
        let sort = SortDescriptor::by(store.schema(), "age", SortOrder::Desc).unwrap();
        let mut ids = vec![2, 99, 0];
        sort.sort(&store, &mut ids);
        assert_eq!(ids, vec![99, 0, 2]);
    }

    #[test]
    fn test_empty_descriptor_keeps_order() {
        let store = store();
        let sort = SortDescriptor::default();
        let mut ids = vec![3, 0, 2];
        sort.sort(&store, &mut ids);
        assert_eq!(ids, vec![3, 0, 2]);
    }

    #[test]
    fn test_unknown_column() {
        let store = store();
        assert!(matches!(
            SortDescriptor::by(store.schema(), "height", SortOrder::Asc),
            Err(Error::ColumnNotFound { .. })
        ));
    }
}
