use tabula_engine::persistence::{Cell, Row, TableError, Value};

fn _create_row(fields: Vec<(&str, Cell)>) -> Row {
    let (names, cells): (Vec<String>, Vec<Cell>) = fields
        .into_iter()
        .map(|(name, cell)| (name.to_string(), cell))
        .unzip();
    Row::new(names, cells).unwrap()
}

#[test]
fn row_keeps_field_order() {
    let row = _create_row(vec![
        ("name", Cell::new("Jansen")),
        ("age", Cell::new(30)),
        ("city", Cell::null()),
    ]);

    assert_eq!(row.field_names(), vec!["name", "age", "city"]);
    assert_eq!(row.at(1).unwrap(), &Cell::new(30));
    assert_eq!(row["name"], Cell::new("Jansen"));
    assert_eq!(row[2], Cell::null());
    assert_eq!(row.to_string(), "Jansen | 30 | NIL");
}

#[test]
fn row_rejects_mismatched_lengths() {
    let result = Row::new(vec!["a".to_string()], vec![Cell::new(1), Cell::new(2)]);
    assert!(matches!(result, Err(TableError::InconsistentArguments(_))));
}

#[test]
fn row_lookup_errors() {
    let row = _create_row(vec![("id", Cell::new(1))]);

    assert!(matches!(row.get("missing"), Err(TableError::FieldNotFound(_))));
    assert!(matches!(
        row.at(3),
        Err(TableError::IndexOutOfRange { index: 3, len: 1 })
    ));
}

#[test]
fn row_add_and_remove() {
    let mut row = _create_row(vec![("id", Cell::new(1))]);

    row.add("name", Cell::new("Bonega")).unwrap();
    assert!(matches!(
        row.add("id", Cell::new(2)),
        Err(TableError::DuplicateField(_))
    ));
    assert!(matches!(
        row.add("", Cell::new(2)),
        Err(TableError::InvalidArgument(_))
    ));

    assert!(row.remove("id"));
    assert!(!row.remove("id"));
    assert_eq!(row.field_names(), vec!["name"]);
}

#[test]
fn row_join_refuses_shared_names() {
    let left = _create_row(vec![("id", Cell::new(1)), ("name", Cell::new("Lorem"))]);
    let right = _create_row(vec![("age", Cell::new(40))]);

    let joined = left.join(&right).unwrap();
    assert_eq!(joined.field_names(), vec!["id", "name", "age"]);
    assert_eq!(left.len(), 2);

    assert!(matches!(left.join(&left), Err(TableError::FieldConflict(_))));
}

#[test]
fn row_projection() {
    let row = _create_row(vec![
        ("id", Cell::new(1)),
        ("name", Cell::new("Rango")),
        ("age", Cell::new(9)),
    ]);

    let cells = row.get_cells(&["age", "id"]).unwrap();
    assert_eq!(cells, vec![Cell::new(9), Cell::new(1)]);

    let filtered = row.get_filtered_row(&["name"]).unwrap();
    assert_eq!(filtered.field_names(), vec!["name"]);

    assert!(matches!(row.get_cells(&[]), Err(TableError::InvalidArgument(_))));
    assert!(row.get_cells(&["nope"]).is_err());
}

#[test]
fn row_contains_and_iterates() {
    let row = _create_row(vec![("id", Cell::new(1)), ("name", Cell::new("Danish"))]);

    assert!(row.contains_field("name"));
    assert!(row.contains_value(&Value::from("Danish")));
    assert!(!row.contains_value(&Value::Int(2)));

    let mut seen = Vec::new();
    row.for_each(|name, cell| seen.push(format!("{}={}", name, cell)));
    assert_eq!(seen, vec!["id=1", "name=Danish"]);
}

#[test]
fn row_equality_is_order_sensitive() {
    let a = _create_row(vec![("x", Cell::new(1)), ("y", Cell::new(2))]);
    let b = _create_row(vec![("y", Cell::new(2)), ("x", Cell::new(1))]);

    assert_ne!(a, b);
    assert_eq!(a, a.clone());
}
