use chrono::NaiveDate;
use tabula_engine::persistence::{
    Cell, DataType, OrderSpec, Row, Table, TableError, Value,
};

fn _create_table(columns: Vec<(&str, Value)>) -> Table {
    let mut table = Table::new();
    for (name, default) in columns {
        table.create_column(name, default).unwrap();
    }
    table
}

fn _people() -> Table {
    let mut table = _create_table(vec![("name", Value::from("")), ("age", Value::from(0))]);
    table.insert(vec![Value::from("Ann"), Value::from(30)]).unwrap();
    table.insert(vec![Value::from("Bob"), Value::from(25)]).unwrap();
    table
}

#[test]
fn table_insert_then_read_back() {
    let mut table = _create_table(vec![("age", Value::from(0))]);

    assert_eq!(table.insert(vec![Value::from(25)]).unwrap(), 0);

    let mut cursor = table.select(&["age"]).unwrap();
    assert!(cursor.read());
    assert_eq!(cursor.get("age").unwrap().to_int().unwrap(), 25);
}

#[test]
fn table_select_all_ordered() {
    let table = _people();
    let cursor = table.select_all_ordered(&OrderSpec::asc("age")).unwrap();

    assert_eq!(cursor.rows()[0][0], Cell::new("Bob"));
    assert_eq!(cursor.rows()[1][0], Cell::new("Ann"));

    // the stored order is untouched by a query
    assert_eq!(table.cell(0, 0).unwrap(), &Cell::new("Ann"));
}

#[test]
fn table_delete_where() {
    let mut table = _people();
    let over_26 = |row: &Row| row["age"].to_int().unwrap_or(0) > 26;

    assert_eq!(table.delete_where(Some(&over_26)).unwrap(), 1);
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.cell_by_name(0, "name").unwrap(), &Cell::new("Bob"));

    assert!(matches!(
        table.delete_where(None),
        Err(TableError::MissingPredicate)
    ));
}

#[test]
fn table_select_missing_column() {
    let table = _people();

    assert!(matches!(
        table.select(&["missing_column"]),
        Err(TableError::ColumnNotFound(_))
    ));
    assert!(matches!(
        table.select(&[]),
        Err(TableError::InvalidArgument(_))
    ));
    assert!(matches!(
        table.select(&["age", "age"]),
        Err(TableError::DuplicateColumn(_))
    ));
}

#[test]
fn table_enforces_column_types() {
    let mut table = _people();

    let result = table.insert(vec![Value::from(12), Value::from("twelve")]);
    assert!(matches!(result, Err(TableError::TypeMismatch { .. })));
    assert_eq!(table.row_count(), 2);

    assert!(table.set_cell(0, "age", 31i64).is_err());
    assert!(table.set_cell(0, "age", Value::Null).is_ok());
    assert!(table.cell(0, 1).unwrap().is_null());

    assert!(matches!(
        table.insert(vec![Value::from("x"), Value::from(1), Value::from(2)]),
        Err(TableError::InconsistentArguments(_))
    ));
}

#[test]
fn table_insert_fills_defaults() {
    let mut table = _create_table(vec![
        ("name", Value::from("nobody")),
        ("age", Value::from(18)),
    ]);

    table.insert(vec![Value::from("Lorem")]).unwrap();
    table.insert_named(&["age"], vec![Value::from(44)]).unwrap();

    assert_eq!(table.cell(0, 1).unwrap(), &Cell::new(18));
    assert_eq!(table.cell(1, 0).unwrap(), &Cell::new("nobody"));
    assert!(matches!(
        table.insert_named(&["age", "age"], vec![Value::from(1), Value::from(2)]),
        Err(TableError::DuplicateColumn(_))
    ));
}

#[test]
fn table_column_ddl() {
    let mut table = _people();

    table
        .create_column("joined", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
        .unwrap();
    assert_eq!(table.column_type("joined").unwrap(), DataType::Date);
    assert_eq!(table.row(1).unwrap().len(), 3);

    assert!(matches!(
        table.create_column("age", 1),
        Err(TableError::DuplicateColumn(_))
    ));
    assert!(matches!(
        table.create_column("", 1),
        Err(TableError::InvalidColumnName(_))
    ));
    assert!(matches!(
        table.create_column("note", Value::Null),
        Err(TableError::InvalidValue(_))
    ));

    table
        .create_typed_column("note", DataType::Text, Value::Null)
        .unwrap();
    assert!(table.cell_by_name(0, "note").unwrap().is_null());
    assert!(matches!(
        table.create_typed_column("score", DataType::Double, 1),
        Err(TableError::TypeMismatch { .. })
    ));

    table.drop_column("age").unwrap();
    assert_eq!(table.column_names(), vec!["name", "joined", "note"]);
    assert!(!table.row(0).unwrap().contains_field("age"));
    assert!(table.drop_column("age").is_err());
}

#[test]
fn table_without_columns_refuses_dml() {
    let mut table = Table::new();

    assert!(matches!(
        table.insert(vec![Value::from(1)]),
        Err(TableError::EmptyTable)
    ));
    assert!(matches!(table.select_all(), Err(TableError::EmptyTable)));
    assert!(matches!(table.delete_all(), Err(TableError::EmptyTable)));
}

#[test]
fn table_update_is_all_or_nothing() {
    let mut table = _people();

    let result = table.update_all(&["name", "age"], vec![Value::from("X"), Value::from("old")]);
    assert!(result.is_err());
    assert_eq!(table.cell(0, 0).unwrap(), &Cell::new("Ann"));

    let is_bob = |row: &Row| row["name"] == Value::from("Bob");
    assert_eq!(
        table
            .update_where(Some(&is_bob), &["age"], vec![Value::from(26)])
            .unwrap(),
        1
    );
    assert_eq!(table.cell(1, 1).unwrap(), &Cell::new(26));

    assert_eq!(table.update_at(0, &["age"], vec![Value::from(31)]).unwrap(), 1);
    assert!(matches!(
        table.update_at(5, &["age"], vec![Value::from(1)]),
        Err(TableError::IndexOutOfRange { .. })
    ));
    assert_eq!(table.update_all(&["age"], vec![Value::Null]).unwrap(), 2);
}

#[test]
fn table_delete_by_index() {
    let mut table = _people();

    assert_eq!(table.delete_at(7).unwrap(), 0);
    assert_eq!(table.delete_at(0).unwrap(), 1);
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.delete_all().unwrap(), 1);
    assert!(table.first().is_none());
}

#[test]
fn table_order_by_places_nulls_first() {
    let mut table = _people();
    table.insert(vec![Value::from("Cid"), Value::Null]).unwrap();

    table.order_by(&OrderSpec::asc("age")).unwrap();
    let names: Vec<String> = table.iter().map(|row| row["name"].to_string()).collect();
    assert_eq!(names, vec!["Cid", "Bob", "Ann"]);

    table.order_by(&OrderSpec::desc("age")).unwrap();
    assert_eq!(table.first().unwrap()["name"], Cell::new("Ann"));
    assert_eq!(table.last().unwrap()["name"], Cell::new("Cid"));

    assert!(matches!(
        table.order_by(&OrderSpec::default()),
        Err(TableError::MissingOrderSpec)
    ));
    assert!(matches!(
        table.order_by(&OrderSpec::asc("height")),
        Err(TableError::ColumnNotFound(_))
    ));
}

#[test]
fn table_order_is_stable() {
    let mut table = _create_table(vec![("name", Value::from("")), ("group", Value::from(0))]);
    for (name, group) in [("a", 2), ("b", 1), ("c", 2), ("d", 1)] {
        table.insert(vec![Value::from(name), Value::from(group)]).unwrap();
    }

    let cursor = table
        .select_ordered(&OrderSpec::asc("group"), &["name"])
        .unwrap();
    let names: Vec<String> = cursor.rows().iter().map(|row| row[0].to_string()).collect();
    assert_eq!(names, vec!["b", "d", "a", "c"]);
}

#[test]
fn table_refuses_to_order_nan() {
    let mut table = _create_table(vec![("score", Value::from(0.0))]);
    table.insert(vec![Value::from(1.5)]).unwrap();
    table.insert(vec![Value::from(f64::NAN)]).unwrap();

    assert!(matches!(
        table.order_by(&OrderSpec::asc("score")),
        Err(TableError::NotComparable(_))
    ));
    assert_eq!(table.cell(0, 0).unwrap(), &Cell::new(1.5));
}

#[test]
fn table_filter_order_project() {
    let mut table = _people();
    table.insert(vec![Value::from("Cid"), Value::from(41)]).unwrap();
    let adults = |row: &Row| row["age"].to_int().unwrap_or(0) >= 26;

    let cursor = table
        .select_where_ordered(Some(&adults), &OrderSpec::desc("age"), &["age", "name"])
        .unwrap();

    assert_eq!(cursor.column_names(), ["age", "name"]);
    assert_eq!(cursor.row_count(), 2);
    assert_eq!(cursor.rows()[0][1], Cell::new("Cid"));

    let reader_count = table.reader().unwrap().filter(adults).count_rows();
    assert_eq!(reader_count, 2);

    assert!(matches!(
        table.select_where(None, &["name"]),
        Err(TableError::MissingPredicate)
    ));
}

#[test]
fn table_cursor_is_a_snapshot() {
    let mut table = _people();
    let cursor = table.select_all().unwrap();

    table.delete_all().unwrap();
    table.insert(vec![Value::from("Zed"), Value::from(99)]).unwrap();

    assert_eq!(cursor.row_count(), 2);
    assert_eq!(cursor.rows()[0][0], Cell::new("Ann"));
}

#[test]
fn table_select_single_row() {
    let table = _people();

    let cursor = table.select_row(1, &["age"]).unwrap();
    assert_eq!(cursor.rows(), &[vec![Cell::new(25)]]);

    let cursor = table.select_row_all(0).unwrap();
    assert_eq!(cursor.column_count(), 2);
    assert!(table.select_row(2, &["age"]).is_err());
}

#[test]
fn table_custom_ordering() {
    let mut table = _people();

    table
        .custom_ordering(|mut rows| {
            rows.reverse();
            rows
        })
        .unwrap();
    assert_eq!(table.cell(0, 0).unwrap(), &Cell::new("Bob"));

    assert!(matches!(
        table.custom_ordering(|mut rows| {
            rows.pop();
            rows
        }),
        Err(TableError::InvalidSortResult { expected: 2, found: 1 })
    ));

    let mut single = _create_table(vec![("id", Value::from(0))]);
    single.insert(vec![Value::from(1)]).unwrap();
    single.custom_ordering(|_| Vec::new()).unwrap();
    assert_eq!(single.row_count(), 1);
}

#[test]
fn table_custom_ordering_keeps_column_types() {
    let mut table = _people();

    let result = table.custom_ordering(|rows| {
        rows.iter()
            .map(|row| {
                let mut row = row.clone();
                row.remove("age");
                row.add("age", Cell::new("not a number")).unwrap();
                row
            })
            .collect()
    });

    assert!(matches!(result, Err(TableError::TypeMismatch { .. })));
    assert_eq!(table.cell(0, 1).unwrap(), &Cell::new(30));
    assert_eq!(table.cell(1, 1).unwrap(), &Cell::new(25));
    assert_eq!(table.column_type("age").unwrap(), DataType::Int);

    table
        .custom_ordering(|mut rows| {
            rows[0].remove("age");
            rows[0].add("age", Cell::null()).unwrap();
            rows
        })
        .unwrap();
    assert!(table.cell(0, 1).unwrap().is_null());
}

#[test]
fn table_lookup_helpers() {
    let mut table = _people();
    table.insert(vec![Value::from("Ann"), Value::from(50)]).unwrap();
    let is_ann = |row: &Row| row["name"] == Value::from("Ann");

    assert_eq!(table.index_of(is_ann), Some(0));
    assert_eq!(table.last_index_of(is_ann), Some(2));
    assert_eq!(table.index_of(|row| row["age"] == Value::from(1)), None);
    assert_eq!(table.last_index(), Some(2));
    assert_eq!(table.first_rows(2).len(), 2);
    assert_eq!(table.first_rows(10).len(), 3);

    let row = table.default_row().unwrap();
    assert_eq!(row.field_values(), vec![Cell::new(""), Cell::new(0)]);
    let row = table.default_row_with(vec![Value::from("Jimmy")]).unwrap();
    assert_eq!(row["age"], Cell::new(0));
    assert_eq!(table.row_count(), 3);
}
