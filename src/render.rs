//! Human-readable, tab-separated table output.

use std::io::{self, Write};

use crate::row::Row;

/// Header line written before the rows.
pub const HEADER: &str = "id\tc1\tc2\tc3\tc4\tc5";

pub fn render_header<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{HEADER}")
}

/// Writes the header followed by one line per row, in the given order.
pub fn render_rows<'a, W, I>(out: &mut W, rows: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Row>,
{
    render_header(out)?;
    for row in rows {
        writeln!(out, "{row}")?;
    }
    Ok(())
}
