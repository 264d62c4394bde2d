use std::collections::HashSet;

use eda_insight::{
    data::{Cell, ColumnType},
    dataset::{Column, Table},
    normalize::{disambiguate, normalize, normalize_column_name},
};
use proptest::prelude::*;

#[test]
fn snake_case_labels_become_title_case() {
    assert_eq!(normalize_column_name("first_name"), "First Name");
    assert_eq!(normalize_column_name("ID"), "Id");
    assert_eq!(normalize_column_name("total_2024_sales"), "Total 2024 Sales");
    assert_eq!(normalize_column_name("Unnamed: 3"), "Unnamed: 3");
}

#[test]
fn normalize_renames_and_resets_index() {
    let table = Table::try_new(
        vec![
            Column::new("first_name", ColumnType::Text, vec![Cell::Text("Ann".into())]),
            Column::new("First Name", ColumnType::Integer, vec![Cell::Integer(1)]),
        ],
        vec![7],
    )
    .unwrap();
    let normalized = normalize(table);
    assert_eq!(normalized.column_names(), vec!["First Name", "First Name (2)"]);
    assert_eq!(normalized.index(), &[0]);
    assert_eq!(
        normalized.column("First Name (2)").unwrap().column_type(),
        ColumnType::Integer
    );
}

fn label() -> impl Strategy<Value = String> {
    prop_oneof!["[A-Za-z0-9_ ]{0,12}", "\\PC{0,12}"]
}

fn colliding_label() -> impl Strategy<Value = String> {
    prop_oneof![
        label(),
        prop::sample::select(vec!["a_b", "A B", "a b", "A B (2)", "\u{390}a", "_"])
            .prop_map(String::from),
    ]
}

fn empty_table(names: &[String]) -> Table {
    let columns = names
        .iter()
        .map(|name| Column::new(name.as_str(), ColumnType::Missing, vec![]))
        .collect();
    Table::try_new(columns, vec![]).unwrap()
}

proptest! {
    #[test]
    fn title_casing_is_idempotent(name in label()) {
        let once = normalize_column_name(&name);
        prop_assert_eq!(normalize_column_name(&once), once.clone());
        prop_assert!(!once.contains('_'));
    }

    #[test]
    fn disambiguated_names_are_unique(names in prop::collection::vec(label(), 0..8)) {
        let normalized = names.iter().map(|n| normalize_column_name(n)).collect::<Vec<_>>();
        let unique = disambiguate(normalized.clone());
        prop_assert_eq!(unique.len(), normalized.len());
        let distinct: HashSet<&String> = unique.iter().collect();
        prop_assert_eq!(distinct.len(), unique.len());
        for (original, renamed) in normalized.iter().zip(&unique) {
            prop_assert!(renamed.starts_with(original.as_str()));
        }
    }

    #[test]
    fn normalizing_a_normalized_table_changes_nothing(
        names in prop::collection::vec(colliding_label(), 0..8)
    ) {
        let once = normalize(empty_table(&names));
        let twice = normalize(once.clone());
        prop_assert_eq!(twice.column_names(), once.column_names());
        prop_assert_eq!(twice.index(), once.index());
    }
}
