//! Row accessor that validates every access.

use crate::access::RowAccess;
use crate::unchecked::UncheckedRow;
use alloc::string::String;
use tarn_core::schema::Column;
use tarn_core::{DataType, Error, Result, RowId, Value};
use tarn_storage::Dataset;
use tracing::debug;

/// Safe accessor for one row of a dataset table.
///
/// Before every access it checks, in order, that the dataset is open, that
/// the row still exists, that the column index is in range and that the
/// column's declared type matches the accessor. Setters additionally
/// enforce nullability and require link targets to exist.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckedRow {
    row: UncheckedRow,
}

impl CheckedRow {
    /// Wraps an unchecked accessor.
    pub fn from_row(row: UncheckedRow) -> Self {
        Self { row }
    }

    pub fn dataset(&self) -> &Dataset {
        self.row.dataset()
    }

    pub fn row_id(&self) -> RowId {
        self.row.row_id()
    }

    fn ensure_attached(&self) -> Result<()> {
        let dataset = self.row.dataset();
        if dataset.is_closed() {
            return Err(Error::dataset_closed(dataset.name()));
        }
        if !self.row.is_attached() {
            return Err(Error::row_detached(self.row.table(), Some(self.row.row_id())));
        }
        Ok(())
    }

    /// Validates an access to `column` and returns its schema.
    fn validate(&self, column: usize, expected: Option<DataType>) -> Result<Column> {
        self.ensure_attached()?;
        let schema = self.row.column(column)?;
        match expected {
            Some(dt) if dt != schema.data_type() => {
                Err(Error::type_mismatch(schema.data_type(), Some(dt)))
            }
            _ => Ok(schema),
        }
    }

    fn check_link_targets(&self, schema: &Column, value: &Value) -> Result<()> {
        let target = match schema.target_table() {
            Some(target) => target,
            None => return Ok(()),
        };
        let dataset = self.row.dataset();
        let missing = match value {
            Value::Link(id) => (!dataset.contains_row(target, *id)).then_some(*id),
            Value::LinkList(ids) => ids
                .iter()
                .copied()
                .find(|id| !dataset.contains_row(target, *id)),
            _ => None,
        };
        match missing {
            Some(id) => Err(Error::row_not_found(target, id)),
            None => Ok(()),
        }
    }
}

impl RowAccess for CheckedRow {
    fn table_name(&self) -> Result<String> {
        self.ensure_attached()?;
        self.row.table_name()
    }

    fn index(&self) -> Result<RowId> {
        self.ensure_attached()?;
        self.row.index()
    }

    fn is_attached(&self) -> bool {
        self.row.is_attached()
    }

    fn column_count(&self) -> Result<usize> {
        self.ensure_attached()?;
        self.row.column_count()
    }

    fn column(&self, column: usize) -> Result<Column> {
        self.validate(column, None)
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.ensure_attached()?;
        self.row.column_index(name)
    }

    fn read_cell(&self, column: usize, expected: Option<DataType>) -> Result<Value> {
        self.validate(column, expected)?;
        self.row.read_cell(column, expected)
    }

    fn write_cell(&self, column: usize, expected: Option<DataType>, value: Value) -> Result<()> {
        let checked = self.validate(column, expected).and_then(|schema| {
            schema.check_value(&value)?;
            self.check_link_targets(&schema, &value)
        });
        if let Err(err) = checked {
            debug!(
                table = self.row.table(),
                row = self.row.row_id(),
                column,
                %err,
                "rejected checked write"
            );
            return Err(err);
        }
        self.row.write_cell(column, expected, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use tarn_core::schema::TableBuilder;

    fn dataset() -> (Dataset, RowId, RowId) {
        let dataset = Dataset::in_memory("checked");
        let people = TableBuilder::new("people")
            .unwrap()
            .add_column("name", DataType::String)
            .unwrap()
            .add_column("age", DataType::Int64)
            .unwrap()
            .add_link("dog", "dogs")
            .unwrap()
            .add_link_list("friends", "people")
            .unwrap()
            .build()
            .unwrap();
        let dogs = TableBuilder::new("dogs")
            .unwrap()
            .add_column("name", DataType::String)
            .unwrap()
            .build()
            .unwrap();
        dataset.create_table(people).unwrap();
        dataset.create_table(dogs).unwrap();
        let (alice, rex) = dataset
            .write(|ds| {
                let rex = ds.insert("dogs", vec![Value::from("Rex")])?;
                let alice = ds.insert(
                    "people",
                    vec![
                        Value::from("Alice"),
                        Value::Int64(31),
                        Value::Null,
                        Value::LinkList(vec![]),
                    ],
                )?;
                Ok((alice, rex))
            })
            .unwrap();
        (dataset, alice, rex)
    }

    fn checked(dataset: &Dataset, id: RowId) -> CheckedRow {
        CheckedRow::from_row(UncheckedRow::new(dataset.clone(), "people", id))
    }

    #[test]
    fn test_reads_validate_type() {
        let (dataset, alice, _) = dataset();
        let row = checked(&dataset, alice);
        assert_eq!(row.get_long(1), Ok(31));
        assert_eq!(
            row.get_long(0),
            Err(Error::type_mismatch(DataType::String, Some(DataType::Int64)))
        );
        assert!(matches!(
            row.get_long(9),
            Err(Error::ColumnIndexOutOfRange { index: 9, .. })
        ));
    }

    #[test]
    fn test_setter_type_mismatch() {
        let (dataset, alice, _) = dataset();
        let row = checked(&dataset, alice);
        let result = dataset.write(|_| row.set_long(0, 5));
        assert_eq!(
            result,
            Err(Error::type_mismatch(DataType::String, Some(DataType::Int64)))
        );
        assert_eq!(row.get_string(0).unwrap().as_deref(), Some("Alice"));
    }

    #[test]
    fn test_setter_null_constraint() {
        let (dataset, alice, _) = dataset();
        let row = checked(&dataset, alice);
        assert!(matches!(
            dataset.write(|_| row.set_null(1)),
            Err(Error::NullConstraint { .. })
        ));
        assert!(matches!(
            dataset.write(|_| row.set_null(3)),
            Err(Error::NullConstraint { .. })
        ));
    }

    #[test]
    fn test_links_require_existing_target() {
        let (dataset, alice, rex) = dataset();
        let row = checked(&dataset, alice);

        dataset.write(|_| row.set_link(2, rex)).unwrap();
        assert_eq!(row.get_link(2), Ok(Some(rex)));

        assert_eq!(
            dataset.write(|_| row.set_link(2, 99)),
            Err(Error::row_not_found("dogs", 99))
        );
        assert_eq!(
            dataset.write(|_| row.set_link_list(3, vec![alice, 42])),
            Err(Error::row_not_found("people", 42))
        );

        dataset.write(|_| row.nullify_link(2)).unwrap();
        assert_eq!(row.is_null_link(2), Ok(true));
    }

    #[test]
    fn test_link_list_view() {
        let (dataset, alice, _) = dataset();
        let row = checked(&dataset, alice);
        dataset
            .write(|_| row.set_link_list(3, vec![alice, alice]))
            .unwrap();
        let friends = row.get_link_list(3).unwrap();
        assert_eq!(friends.target_table(), "people");
        assert_eq!(friends.row_ids(), &[alice, alice]);
    }

    #[test]
    fn test_detached_row() {
        let (dataset, alice, _) = dataset();
        let row = checked(&dataset, alice);
        dataset.write(|ds| ds.delete("people", alice)).unwrap();

        assert!(!row.is_attached());
        assert_eq!(
            row.get_long(1),
            Err(Error::row_detached("people", Some(alice)))
        );
        assert_eq!(
            row.table_name(),
            Err(Error::row_detached("people", Some(alice)))
        );
    }

    #[test]
    fn test_closed_dataset() {
        let (dataset, alice, _) = dataset();
        let row = checked(&dataset, alice);
        dataset.close();
        assert!(matches!(row.get_long(1), Err(Error::DatasetClosed { .. })));
    }
}
