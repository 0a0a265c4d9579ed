//! Plain-text persistence.
//!
//! The format is line oriented: the row count, the next id, then six lines
//! per row (`id`, `c1`, `c2`, `c3`, `c4` as `0`/`1`, `c5`). Loading goes
//! through the regular token reader and row builder with retries disabled, so
//! a dump is accepted exactly when it is valid non-interactive input.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{LoadError, ParseError, TableError};
use crate::input::Acquirer;
use crate::row::Row;
use crate::table::Table;

/// Writes `table` in dump format.
///
/// # Errors
/// Fails with [io::ErrorKind::InvalidData] if a row holds a non-finite `c2`,
/// which the format cannot represent.
pub fn dump<W: Write>(table: &Table, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", table.len())?;
    writeln!(out, "{}", table.next_id())?;
    for row in table {
        write_row(row, out)?;
    }
    out.flush()
}

fn write_row<W: Write>(row: &Row, out: &mut W) -> io::Result<()> {
    if !row.c2.is_finite() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("row {} has a non-finite c2 ({})", row.id, row.c2),
        ));
    }
    writeln!(out, "{}", row.id)?;
    writeln!(out, "{}", row.c1)?;
    writeln!(out, "{}", row.c2)?;
    writeln!(out, "{}", row.c3)?;
    writeln!(out, "{}", u8::from(row.c4))?;
    if row.c5.contains(' ') {
        writeln!(out, "'{}'", row.c5)
    } else {
        writeln!(out, "{}", row.c5)
    }
}

/// Rebuilds a table from dump format.
///
/// If the stored next id is not above every stored id it is raised to
/// `max id + 1` so that later inserts cannot collide.
///
/// # Errors
/// - [LoadError::Header] if the count or next id is missing or malformed.
/// - [LoadError::Row] on the first missing or malformed row field.
/// - [LoadError::Table] if the table cannot be allocated, or if a stale
///   next id cannot be raised above a stored id of `u64::MAX`.
pub fn load<R: BufRead>(input: R) -> Result<Table, LoadError> {
    let mut acquirer = Acquirer::with_retries(input, io::sink(), io::sink(), 0);

    let len = acquirer.get_uint(None, None).map_err(LoadError::Header)?;
    let next_id = acquirer.get_uint(None, None).map_err(LoadError::Header)?;
    let len = usize::try_from(len).map_err(|_| {
        LoadError::Header(ParseError::OutOfRange(len.to_string()).into())
    })?;
    debug!(len, next_id, "loading table");

    let mut table = if len == 0 {
        Table::new()
    } else {
        Table::with_capacity(len)?
    };
    for index in 0..len {
        let row = acquirer
            .read_row(None)
            .map_err(|source| LoadError::Row { index, source })?;
        table.append(row)?;
    }

    let max_id = table.iter().map(|row| row.id).max();
    match max_id {
        Some(max_id) if next_id <= max_id => {
            let raised = max_id.checked_add(1).ok_or(TableError::IdExhausted)?;
            warn!(next_id, raised, "stored next id is not above existing ids");
            table.set_next_id(raised);
        }
        _ => table.set_next_id(next_id),
    }
    if acquirer.reader_mut().has_pending() {
        warn!("trailing tokens after the last row ignored");
    }
    Ok(table)
}

/// Dumps `table` to the file at `path`, replacing it.
pub fn save_to_path(table: &Table, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    dump(table, &mut out)?;
    info!(path = %path.display(), rows = table.len(), "table saved");
    Ok(())
}

/// Loads a table from the file at `path`.
pub fn load_from_path(path: &Path) -> Result<Table, LoadError> {
    let file = File::open(path)?;
    let table = load(BufReader::new(file))?;
    info!(path = %path.display(), rows = table.len(), "table loaded");
    Ok(table)
}
