use tabula_engine::persistence::{Cell, ResultCursor, Table, TableError, Value};

fn _create_cursor(rows: Vec<(i32, &str)>) -> ResultCursor {
    ResultCursor::new(
        vec!["id".to_string(), "name".to_string()],
        rows.into_iter()
            .map(|(id, name)| vec![Cell::new(id), Cell::new(name)])
            .collect(),
    )
    .unwrap()
}

#[test]
fn cursor_starts_before_the_first_row() {
    let mut cursor = _create_cursor(vec![(1, "Jansen"), (2, "Bonega")]);

    assert_eq!(cursor.position(), None);
    assert!(matches!(cursor.get("id"), Err(TableError::NoCurrentRow)));

    assert!(cursor.read());
    assert_eq!(cursor.position(), Some(0));
    assert_eq!(cursor.get("name").unwrap(), &Cell::new("Jansen"));
    assert_eq!(cursor.at(0).unwrap().to_int().unwrap(), 1);
}

#[test]
fn cursor_on_empty_result_never_reads() {
    let table = {
        let mut table = Table::new();
        table.create_column("id", 0).unwrap();
        table
    };
    let mut cursor = table.select_all().unwrap();

    assert_eq!(cursor.row_count(), 0);
    assert!(!cursor.read());
    assert!(!cursor.read());
    assert_eq!(cursor.column_names(), ["id"]);
}

#[test]
fn cursor_walks_every_row_once() {
    let mut cursor = _create_cursor(vec![(1, "a"), (2, "b"), (3, "c")]);
    let mut ids = Vec::new();

    while cursor.read() {
        ids.push(cursor.get("id").unwrap().to_int().unwrap());
    }

    assert_eq!(ids, vec![1, 2, 3]);
    assert!(matches!(cursor.get("id"), Err(TableError::NoCurrentRow)));
}

#[test]
fn cursor_lookup_errors() {
    let mut cursor = _create_cursor(vec![(1, "a")]);
    cursor.read();

    assert!(matches!(cursor.get("nope"), Err(TableError::ColumnNotFound(_))));
    assert!(matches!(
        cursor.at(2),
        Err(TableError::IndexOutOfRange { index: 2, len: 2 })
    ));
    assert_eq!(
        cursor.current_row_values().unwrap(),
        vec![Value::Int(1), Value::from("a")]
    );
}

#[test]
fn cursor_requires_columns() {
    assert!(matches!(
        ResultCursor::new(Vec::new(), Vec::new()),
        Err(TableError::InvalidArgument(_))
    ));
}

#[test]
fn cursor_exports() {
    let cursor = ResultCursor::new(
        vec!["id".to_string(), "name".to_string()],
        vec![vec![Cell::new(1), Cell::null()]],
    )
    .unwrap();

    assert_eq!(cursor.summary(), "Result: Columns = 2, Rows = 1");
    assert_eq!(
        cursor.to_json(),
        serde_json::json!({ "columns": ["id", "name"], "rows": [[1, null]] })
    );
    assert_eq!(cursor.to_string(), "id | name\n1 | NIL\n");
}
