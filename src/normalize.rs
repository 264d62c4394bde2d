//! Column label normalization and row index reset.

use std::collections::HashSet;

use log::debug;
use unicode_width::UnicodeWidthChar;

use crate::dataset::Table;

/// Replaces underscores with spaces and title-cases every word: a letter
/// that starts the name or follows a non-letter is upper-cased, any other
/// letter is lower-cased. Word state follows the characters written out, so
/// combining marks produced by case mapping keep the word open and a second
/// pass leaves the name unchanged.
pub fn normalize_column_name(name: &str) -> String {
    let mut output = String::with_capacity(name.len());
    let mut in_word = false;
    for ch in name.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        let start = output.len();
        if ch.is_alphabetic() {
            if in_word {
                output.extend(ch.to_lowercase());
            } else {
                // Multi-letter capitals such as "SS" keep only the first upper.
                let mut upper = ch.to_uppercase();
                output.extend(upper.next());
                output.extend(upper.flat_map(char::to_lowercase));
            }
        } else {
            output.push(ch);
        }
        in_word = output[start..]
            .chars()
            .fold(in_word, |state, emitted| continues_word(emitted, state));
    }
    output
}

/// Letters open or extend a word. Zero-width characters such as combining
/// marks leave the state untouched; anything else closes the word.
fn continues_word(ch: char, in_word: bool) -> bool {
    if ch.is_alphabetic() {
        true
    } else if ch.width() == Some(0) {
        in_word
    } else {
        false
    }
}

/// Makes names unique in order. Later duplicates take the smallest ` (n)`
/// suffix, starting at 2, that no other name uses.
pub fn disambiguate(names: Vec<String>) -> Vec<String> {
    let bases: HashSet<String> = names.iter().cloned().collect();
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut output = Vec::with_capacity(names.len());
    for name in names {
        if taken.insert(name.clone()) {
            output.push(name);
            continue;
        }
        let mut suffix = 2usize;
        let unique = loop {
            let candidate = format!("{name} ({suffix})");
            if !taken.contains(&candidate) && !bases.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        debug!("Renamed duplicate column '{name}' to '{unique}'");
        taken.insert(unique.clone());
        output.push(unique);
    }
    output
}

pub fn normalize(mut table: Table) -> Table {
    let names = table
        .columns()
        .iter()
        .map(|column| normalize_column_name(column.name()))
        .collect::<Vec<_>>();
    table.rename_columns(disambiguate(names));
    table.reset_index();
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{Cell, ColumnType},
        dataset::Column,
    };

    #[test]
    fn underscores_become_spaces_and_words_title_case() {
        assert_eq!(normalize_column_name("first_name"), "First Name");
        assert_eq!(normalize_column_name("Revenue_USD"), "Revenue Usd");
        assert_eq!(normalize_column_name("order id"), "Order Id");
        assert_eq!(normalize_column_name("o'neil_score2x"), "O'Neil Score2X");
        assert_eq!(normalize_column_name("straße_ßig"), "Straße Ssig");
        assert_eq!(normalize_column_name(""), "");
    }

    #[test]
    fn normalize_column_name_is_idempotent() {
        for raw in ["first_name", "ALL_CAPS", "mixed CaSe", "a1b2", "__x__"] {
            let once = normalize_column_name(raw);
            assert_eq!(normalize_column_name(&once), once);
        }
    }

    #[test]
    fn combining_marks_from_case_mapping_stay_in_the_word() {
        let once = normalize_column_name("\u{390}a");
        assert_eq!(once, "\u{399}\u{308}\u{301}a");
        assert_eq!(normalize_column_name(&once), once);
        assert_eq!(normalize_column_name("cafe\u{301}_bar"), "Cafe\u{301} Bar");
    }

    #[test]
    fn colliding_names_receive_numbered_suffixes() {
        let names = vec![
            "Revenue Usd".to_string(),
            "Revenue Usd".to_string(),
            "Revenue Usd (2)".to_string(),
        ];
        assert_eq!(
            disambiguate(names),
            vec!["Revenue Usd", "Revenue Usd (3)", "Revenue Usd (2)"]
        );
    }

    #[test]
    fn normalize_resets_index_to_dense_sequence() {
        let columns = vec![Column::new(
            "row_id",
            ColumnType::Integer,
            vec![Cell::Integer(1), Cell::Integer(2)],
        )];
        let table = Table::try_new(columns, vec![7, 12]).unwrap();
        let normalized = normalize(table);
        assert_eq!(normalized.index(), &[0, 1]);
        assert_eq!(normalized.column_names(), vec!["Row Id"]);
    }

    #[test]
    fn normalize_merges_snake_and_spaced_duplicates() {
        let columns = vec![
            Column::new("Revenue_USD", ColumnType::Missing, vec![]),
            Column::new("Revenue USD", ColumnType::Missing, vec![]),
        ];
        let normalized = normalize(Table::try_new(columns, vec![]).unwrap());
        assert_eq!(
            normalized.column_names(),
            vec!["Revenue Usd", "Revenue Usd (2)"]
        );
    }
}
