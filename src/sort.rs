use tracing::debug;

use crate::column::Column;
use crate::error::{ParseError, TableError};
use crate::row::Row;
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `""`, `asc` and `+` are ascending; `desc` and `-` are descending.
    pub fn parse(token: &str) -> Result<Self, ParseError> {
        match token {
            "" | "asc" | "+" => Ok(Self::Asc),
            "desc" | "-" => Ok(Self::Desc),
            _ => Err(ParseError::Unrecognized(token.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: Column, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    pub fn asc(column: Column) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    pub fn desc(column: Column) -> Self {
        Self::new(column, SortDirection::Desc)
    }
}

impl Table {
    /// Returns a detached copy of all rows ordered by `spec`. The table itself
    /// is not modified. Equal keys keep their storage order in both directions.
    ///
    /// # Errors
    /// - [TableError::Empty] if the table has no rows.
    /// - [TableError::Alloc] if the copy cannot be allocated.
    pub fn sort(&self, spec: SortSpec) -> Result<Vec<Row>, TableError> {
        if self.is_empty() {
            return Err(TableError::Empty);
        }
        let mut sorted = Vec::new();
        sorted.try_reserve_exact(self.len())?;
        sorted.extend(self.iter().cloned());

        let SortSpec { column, direction } = spec;
        match direction {
            SortDirection::Asc => sorted.sort_by(|a, b| column.compare(a, b)),
            SortDirection::Desc => sorted.sort_by(|a, b| column.compare(b, a)),
        }
        debug!(%column, ?direction, rows = sorted.len(), "sorted copy");
        Ok(sorted)
    }
}
