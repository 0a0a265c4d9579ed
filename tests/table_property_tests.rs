//! Property-based tests for the row store, search, sort and dump format.

use proptest::prelude::*;
use std::io::Cursor;
use tabledb::{Column, Condition, FindSpec, Row, SortDirection, SortSpec, Table, Value, dump};

// ============================================================================
// GENERATORS
// ============================================================================

fn arb_text(max_len: usize, with_space: bool) -> impl Strategy<Value = String> {
    let pattern = if with_space {
        format!("[a-zA-Z0-9 ]{{0,{max_len}}}")
    } else {
        format!("[a-zA-Z0-9]{{0,{max_len}}}")
    };
    proptest::string::string_regex(&pattern).unwrap()
}

fn arb_row() -> impl Strategy<Value = Row> {
    (
        any::<i64>(),
        -1.0e12f64..1.0e12,
        arb_text(16, false),
        any::<bool>(),
        arb_text(32, true),
    )
        .prop_map(|(c1, c2, c3, c4, c5)| Row::new(0, c1, c2, c3, c4, c5))
}

fn arb_column() -> impl Strategy<Value = Column> {
    (0u64..6).prop_map(|i| Column::from_index(i).unwrap())
}

fn arb_direction() -> impl Strategy<Value = SortDirection> {
    prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)]
}

fn table_of(rows: &[Row]) -> Table {
    let mut table = Table::new();
    for row in rows {
        table.insert(row.clone()).unwrap();
    }
    table
}

/// Reference lookup used to check the binary-search fast path.
fn linear_find(table: &Table, id: u64, start: usize) -> Option<usize> {
    table
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, row)| row.id == id)
        .map(|(i, _)| i)
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_append_keeps_every_row(rows in prop::collection::vec(arb_row(), 0..80)) {
        let table = table_of(&rows);
        prop_assert_eq!(table.len(), rows.len());
        for (i, (stored, original)) in table.iter().zip(&rows).enumerate() {
            prop_assert_eq!(stored.id, i as u64 + 1);
            prop_assert_eq!(&stored.c3, &original.c3);
            prop_assert_eq!(stored.c1, original.c1);
        }
        prop_assert!(table.ids_ascending());
    }

    #[test]
    fn prop_with_capacity_is_power_of_two(cap in 1usize..100_000) {
        let table = Table::with_capacity(cap).unwrap();
        prop_assert!(table.capacity().is_power_of_two());
        prop_assert!(table.capacity() >= cap);
        prop_assert!(table.capacity() / 2 < cap);
    }

    #[test]
    fn prop_capacity_doubles_when_full(cap in 1usize..64, extra in 1usize..64) {
        let mut table = Table::with_capacity(cap).unwrap();
        let mut expected = table.capacity();
        for i in 0..expected + extra {
            if table.len() == expected {
                expected *= 2;
            }
            table.insert(Row::new(0, i as i64, 0.0, "", false, "")).unwrap();
            prop_assert_eq!(table.capacity(), expected);
        }
        for (i, row) in table.iter().enumerate() {
            prop_assert_eq!(row.c1, i as i64);
        }
    }

    #[test]
    fn prop_remove_at_shifts_left(rows in prop::collection::vec(arb_row(), 1..40), pick in any::<prop::sample::Index>()) {
        let mut table = table_of(&rows);
        let before: Vec<Row> = table.rows().to_vec();
        let i = pick.index(before.len());
        let removed = table.remove_at(i).unwrap();
        prop_assert_eq!(&removed, &before[i]);

        let mut expected = before.clone();
        expected.remove(i);
        prop_assert_eq!(table.rows(), expected.as_slice());
        prop_assert!(table.ids_ascending());
    }

    #[test]
    fn prop_binary_search_matches_linear(
        len in 0usize..60,
        removals in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
        probe in 0u64..80,
        start in 0usize..70,
    ) {
        let mut table = table_of(&vec![Row::default(); len]);
        for r in removals {
            if table.is_empty() {
                break;
            }
            let i = r.index(table.len());
            table.remove_at(i).unwrap();
        }
        let spec = FindSpec::by_id(probe).starting_at(start);
        let found = table.find_first(&spec).unwrap();
        prop_assert_eq!(found, linear_find(&table, probe, start));
        if let Some(i) = found {
            prop_assert!(i >= start);
        }
    }

    #[test]
    fn prop_unordered_ids_still_found(ids in prop::collection::vec(0u64..30, 1..40), probe in 0u64..30) {
        let mut table = Table::new();
        for id in &ids {
            table.append(Row::new(*id, 0, 0.0, "", false, "")).unwrap();
        }
        let found = table.find_first(&FindSpec::by_id(probe)).unwrap();
        prop_assert_eq!(found, linear_find(&table, probe, 0));
    }

    #[test]
    fn prop_find_never_before_start(
        rows in prop::collection::vec(arb_row(), 0..40),
        threshold in any::<i64>(),
        start in 0usize..50,
    ) {
        let table = table_of(&rows);
        let spec = FindSpec::new(Column::C1, Condition::Ge, Value::Int(threshold)).starting_at(start);
        let found = table.find_first(&spec).unwrap();
        let expected = rows.iter().enumerate().skip(start).find(|(_, r)| r.c1 >= threshold).map(|(i, _)| i);
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn prop_sort_is_ordered_permutation(
        rows in prop::collection::vec(arb_row(), 1..50),
        column in arb_column(),
        direction in arb_direction(),
    ) {
        let table = table_of(&rows);
        let before = table.clone();
        let sorted = table.sort(SortSpec::new(column, direction)).unwrap();

        prop_assert_eq!(&table, &before);
        prop_assert_eq!(sorted.len(), table.len());

        let mut sorted_ids: Vec<u64> = sorted.iter().map(|r| r.id).collect();
        sorted_ids.sort_unstable();
        let ids: Vec<u64> = table.iter().map(|r| r.id).collect();
        prop_assert_eq!(sorted_ids, ids);

        for pair in sorted.windows(2) {
            let ord = column.compare(&pair[0], &pair[1]);
            match direction {
                SortDirection::Asc => {
                    prop_assert!(ord.is_le());
                }
                SortDirection::Desc => {
                    prop_assert!(ord.is_ge());
                }
            }
        }
    }

    #[test]
    fn prop_dump_load_round_trip(rows in prop::collection::vec(arb_row(), 0..30)) {
        let table = table_of(&rows);
        let mut buffer = Vec::new();
        dump::dump(&table, &mut buffer).unwrap();
        let loaded = dump::load(Cursor::new(buffer)).unwrap();

        prop_assert_eq!(loaded.len(), table.len());
        prop_assert_eq!(loaded.next_id(), table.next_id());
        prop_assert_eq!(loaded.rows(), table.rows());
    }
}

// ============================================================================
// FIXED SCENARIOS
// ============================================================================

#[test]
fn test_small_capacity_growth_and_lookup() {
    let mut table = Table::with_capacity(1).unwrap();
    let mut caps = vec![table.capacity()];
    for c1 in 0..3 {
        table.insert(Row::new(0, c1, 0.0, "", false, "")).unwrap();
        caps.push(table.capacity());
    }
    assert_eq!(caps, vec![1, 1, 2, 4]);
    assert!(table.ids_ascending());
    assert_eq!(table.find_first(&FindSpec::by_id(2)).unwrap(), Some(1));
}

#[test]
fn test_dump_round_trip_edge_sizes() {
    for n in [0usize, 1, 17] {
        let rows: Vec<Row> = (0..n)
            .map(|i| Row::new(0, -(i as i64), i as f64 / 3.0, "k", i % 2 == 1, " padded "))
            .collect();
        let table = table_of(&rows);
        let mut buffer = Vec::new();
        dump::dump(&table, &mut buffer).unwrap();
        let loaded = dump::load(Cursor::new(buffer)).unwrap();
        assert_eq!(loaded.rows(), table.rows(), "n = {n}");
        assert_eq!(loaded.next_id(), table.next_id());
    }
}
