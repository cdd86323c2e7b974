//! Property-based tests for the query pipeline.
//!
//! Random tables of (group, score) rows, with some null scores, are queried
//! and the results checked against plain iterator code.

use proptest::prelude::*;
use tabula_engine::persistence::{Cell, OrderSpec, Row, Table, Value};

/// Strategy for an optional score, about one in five is null.
fn score_strategy() -> impl Strategy<Value = Option<i64>> {
    prop_oneof![
        1 => Just(None),
        4 => (-1000i64..1000i64).prop_map(Some),
    ]
}

/// Strategy for the rows of a two column table.
fn rows_strategy(max_rows: usize) -> impl Strategy<Value = Vec<(i32, Option<i64>)>> {
    prop::collection::vec((0i32..5, score_strategy()), 0..max_rows)
}

fn _create_table(rows: &[(i32, Option<i64>)]) -> Table {
    let mut table = Table::new();
    table.create_column("group", 0).unwrap();
    table.create_column("score", 0i64).unwrap();
    for (group, score) in rows {
        table
            .insert(vec![Value::from(*group), Value::from(*score)])
            .unwrap();
    }
    table
}

fn _scores(rows: &[Vec<Cell>], column: usize) -> Vec<Option<i64>> {
    rows.iter()
        .map(|row| match row[column].is_null() {
            true => None,
            false => Some(row[column].to_long().unwrap()),
        })
        .collect()
}

proptest! {
    /// Property: ordering ascending matches a stable sort with nulls first.
    #[test]
    fn ordered_select_matches_stable_sort(rows in rows_strategy(60)) {
        let table = _create_table(&rows);
        let cursor = table.select_all_ordered(&OrderSpec::asc("score")).unwrap();

        let mut expected = rows.clone();
        expected.sort_by_key(|(_, score)| *score);

        let groups: Vec<i32> = cursor.rows().iter().map(|row| row[0].to_int().unwrap()).collect();
        let expected_groups: Vec<i32> = expected.iter().map(|(group, _)| *group).collect();

        prop_assert_eq!(_scores(cursor.rows(), 1), expected.iter().map(|(_, score)| *score).collect::<Vec<_>>());
        prop_assert_eq!(groups, expected_groups);
    }

    /// Property: descending order is the exact reverse of ascending order on
    /// the keys.
    #[test]
    fn descending_reverses_keys(rows in rows_strategy(60)) {
        let table = _create_table(&rows);
        let ascending = table.select_ordered(&OrderSpec::asc("score"), &["score"]).unwrap();
        let descending = table.select_ordered(&OrderSpec::desc("score"), &["score"]).unwrap();

        let mut reversed = _scores(ascending.rows(), 0);
        reversed.reverse();
        prop_assert_eq!(_scores(descending.rows(), 0), reversed);
    }

    /// Property: a filtered select returns exactly the matching rows, in
    /// storage order, and deleting by the same filter leaves the rest.
    #[test]
    fn filter_and_delete_partition_rows(rows in rows_strategy(60), pivot in 0i32..5) {
        let mut table = _create_table(&rows);
        let in_group = move |row: &Row| row["group"] == Value::from(pivot);

        let selected = table.select_all_where(Some(&in_group)).unwrap();
        let expected: Vec<Option<i64>> = rows
            .iter()
            .filter(|(group, _)| *group == pivot)
            .map(|(_, score)| *score)
            .collect();
        prop_assert_eq!(_scores(selected.rows(), 1), expected.clone());

        let deleted = table.delete_where(Some(&in_group)).unwrap();
        prop_assert_eq!(deleted, expected.len());
        prop_assert_eq!(table.row_count(), rows.len() - expected.len());
        prop_assert!(table.index_of(in_group).is_none());
    }

    /// Property: every stored cell is null or of its column's type, whatever
    /// mix of valid and invalid inserts was attempted.
    #[test]
    fn stored_cells_keep_their_column_type(values in prop::collection::vec(any::<(bool, i32)>(), 0..40)) {
        let mut table = _create_table(&[]);
        let mut accepted = 0;

        for (as_text, number) in values {
            let score = match as_text {
                true => Value::from(number.to_string()),
                false => Value::from(i64::from(number)),
            };
            if table.insert(vec![Value::from(number), score]).is_ok() {
                accepted += 1;
            }
        }

        prop_assert_eq!(table.row_count(), accepted);
        for row in table.iter() {
            prop_assert!(row["score"].value().fits(table.column_type("score").unwrap()));
        }
    }
}
