//! End-to-end sessions driven over in-memory streams.

use std::io::Cursor;
use tabledb::{Row, Session, SessionConfig, Table, dump};
use tempfile::TempDir;

struct Transcript {
    out: String,
    err: String,
    table: Option<Table>,
}

fn run_script(script: &str, config: SessionConfig) -> Transcript {
    let input = Cursor::new(script.as_bytes().to_vec());
    let mut session = Session::new(input, Vec::new(), Vec::new(), config);
    session.run().unwrap();
    Transcript {
        out: String::from_utf8(session.out().clone()).unwrap(),
        err: String::from_utf8(session.err().clone()).unwrap(),
        table: session.table().cloned(),
    }
}

fn quiet() -> SessionConfig {
    SessionConfig::new().with_banner(false).with_prompt("")
}

#[test]
fn test_banner_and_prompt() {
    let t = run_script("help\nquit\n", SessionConfig::new());
    assert!(t.out.starts_with("tabledb: single-table database operator\n"));
    assert!(t.out.contains("\tquit\tq exit\tExit\n"));
    assert_eq!(t.out.matches("========").count(), 2);
    assert!(t.out.ends_with("> Quitting\n"));
}

#[test]
fn test_interactive_fill_with_retries() {
    // c1 is rejected once, then accepted
    let script = "fill\n2\nabc\n10\n1.5\nfirst\ntrue\n'hello there'\n-3\n.25\nsecond\n\n\nquit\n";
    let t = run_script(script, quiet());

    assert_eq!(t.err, "c1: Int expected\n");
    assert!(t.out.contains("Row count: 2 rows\n[0]:\nc1[int]: c1[int]: c2[float]: "));
    let table = t.table.unwrap();
    assert_eq!(
        table.rows(),
        &[
            Row::new(1, 10, 1.5, "first", true, "hello there"),
            Row::new(2, -3, 0.25, "second", false, ""),
        ]
    );
    assert_eq!(table.next_id(), 3);
    assert_eq!(table.capacity(), 2);
}

#[test]
fn test_add_grows_past_initial_capacity() {
    let config = quiet().with_initial_capacity(2);
    let script = "add 1 1 a 1 a\nadd 2 2 b 1 b\nadd 3 3 c 1 c\ninfo\nq\n";
    let t = run_script(script, config);
    let table = t.table.unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.capacity(), 4);
    assert!(t.out.contains("Rows: 3\nCapacity: 4\nNext id: 4\n"));
}

#[test]
fn test_where_on_text_and_bool_columns() {
    let script = "\
        add 1 1 apple 1 'red fruit'\n\
        add 2 2 pear 0 green\n\
        add 3 3 apple 0 'red fruit'\n\
        where 3 = apple\n\
        where 4 ! 1\n\
        where 5 = 'red fruit'\n\
        q\n";
    let t = run_script(script, quiet());
    let blocks: Vec<&str> = t.out.split("id\tc1\tc2\tc3\tc4\tc5\n").skip(1).collect();
    assert_eq!(blocks.len(), 3);
    assert!(blocks[0].starts_with("1\t1\t1.000000\t'apple'\t1\t'red fruit'\n3\t3\t3.000000\t'apple'"));
    assert!(blocks[1].starts_with("2\t2\t2.000000\t'pear'\t0\t'green'\n3\t"));
    assert_eq!(blocks[2].lines().filter(|l| l.contains("red fruit")).count(), 2);
}

#[test]
fn test_delete_then_find_after_gap() {
    let script = "add 1 1 a 1 a\nadd 2 2 b 1 b\nadd 3 3 c 1 c\ndelete 2\nwhere 0 = 3\ndelete 2\nq\n";
    let t = run_script(script, quiet());
    assert!(t.out.contains("Row with id 2 is at position 1\n"));
    assert!(t.out.contains("3\t3\t3.000000\t'c'\t1\t'c'\n"));
    assert!(t.err.contains("Row with id 2 not found\n"));
    assert_eq!(t.table.unwrap().len(), 2);
}

#[test]
fn test_cancelled_add_leaves_table_unchanged() {
    let script = "add 1 1 a 1 a\nadd\n1\nx\ny\nz\nw\nprint\nq\n";
    let t = run_script(script, quiet());
    assert!(t.err.contains("c2: Float expected\n".repeat(4).as_str()));
    assert!(t.err.contains("Max retries exceeded\n"));
    assert!(t.out.contains("Cancelled\n"));
    assert_eq!(t.table.unwrap().len(), 1);
}

#[test]
fn test_save_load_round_trip_through_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.txt");
    let script = format!(
        "add -5 2.75 abc 1 'two words'\nadd 7 0 def 0 one\nsave '{}'\nq\n",
        path.display()
    );
    let saved = run_script(&script, quiet()).table.unwrap();

    let on_disk = dump::load_from_path(&path).unwrap();
    assert_eq!(on_disk.rows(), saved.rows());

    let script = format!("load '{}'\nprint\nq\n", path.display());
    let t = run_script(&script, quiet());
    assert!(t.out.contains("1\t-5\t2.750000\t'abc'\t1\t'two words'\n2\t7\t0.000000\t'def'\t0\t'one'\n"));
    assert_eq!(t.table.unwrap().next_id(), 3);
}

#[test]
fn test_preloaded_table() {
    let mut table = Table::new();
    table.insert(Row::new(0, 1, 1.0, "x", false, "y")).unwrap();
    let input = Cursor::new(b"sort 2 -\nq\n".to_vec());
    let mut session = Session::new(input, Vec::new(), Vec::new(), quiet()).with_table(table);
    session.run().unwrap();
    let out = String::from_utf8(session.out().clone()).unwrap();
    assert!(out.contains("1\t1\t1.000000\t'x'\t0\t'y'\n"));
}
