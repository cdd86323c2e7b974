use std::sync::{Arc, RwLock};
use std::thread;

use tabula_engine::persistence::{
    Catalog, TableError, Value, read_table, write_table,
};

fn _prepare_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    let people = catalog.create_table("people", false).unwrap();
    write_table(&people).create_column("name", "").unwrap();
    catalog
}

#[test]
fn catalog_create_and_get() {
    let catalog = _prepare_catalog();

    assert!(catalog.contains_table("people"));
    let table = catalog.get_table("people").unwrap();
    assert_eq!(read_table(&table).column_count(), 1);

    assert!(matches!(
        catalog.get_table("ghosts"),
        Err(TableError::TableNotFound(_))
    ));
}

#[test]
fn catalog_refuses_duplicates_unless_asked() {
    let mut catalog = _prepare_catalog();

    assert!(matches!(
        catalog.create_table("people", false),
        Err(TableError::DuplicateTable(_))
    ));

    let existing = catalog.create_table("people", true).unwrap();
    assert_eq!(read_table(&existing).column_names(), vec!["name"]);

    assert!(matches!(
        catalog.create_table("", false),
        Err(TableError::InvalidArgument(_))
    ));
}

#[test]
fn catalog_keeps_creation_order() {
    let mut catalog = _prepare_catalog();
    catalog.create_table("orders", false).unwrap();
    catalog.create_table("accounts", false).unwrap();

    assert_eq!(catalog.table_names(), vec!["people", "orders", "accounts"]);

    assert!(catalog.drop_table("orders").is_some());
    assert!(catalog.drop_table("orders").is_none());
    assert_eq!(catalog.table_names(), vec!["people", "accounts"]);
}

#[test]
fn catalog_dropped_table_outlives_its_handles() {
    let mut catalog = _prepare_catalog();
    let handle = catalog.get_table("people").unwrap();

    catalog.drop_table("people");
    write_table(&handle)
        .insert(vec![Value::from("still here")])
        .unwrap();

    assert_eq!(read_table(&handle).row_count(), 1);
}

#[test]
fn catalog_tables_can_be_shared_between_threads() {
    let catalog = Arc::new(RwLock::new(_prepare_catalog()));

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                let table = catalog.read().unwrap().get_table("people").unwrap();
                for i in 0..25 {
                    write_table(&table)
                        .insert(vec![Value::from(format!("{}-{}", worker, i))])
                        .unwrap();
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    let table = catalog.read().unwrap().get_table("people").unwrap();
    let table = read_table(&table);
    assert_eq!(table.row_count(), 100);
    assert_eq!(table.select_all().unwrap().row_count(), 100);
}
