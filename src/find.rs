//! Single-predicate search over a [Table].

use std::cmp::Ordering;

use tracing::trace;

use crate::column::Column;
use crate::data_type::DataType;
use crate::error::{ParseError, TableError};
use crate::row::Row;
use crate::table::Table;
use crate::value::Value;

/// Comparison applied between a column and the search operand(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    /// Inclusive range `lower <= value <= upper`.
    Between,
}

impl Condition {
    /// Parses a condition token. The empty token means [Condition::Eq].
    pub fn parse(token: &str) -> Result<Self, ParseError> {
        match token {
            "" | "=" | "eq" => Ok(Self::Eq),
            "!" | "neq" => Ok(Self::Ne),
            ">" | "gt" => Ok(Self::Gt),
            ">=" | "ge" => Ok(Self::Ge),
            "<" | "lt" => Ok(Self::Lt),
            "<=" | "le" => Ok(Self::Le),
            "<>" | "btw" => Ok(Self::Between),
            _ => Err(ParseError::Unrecognized(token.to_string())),
        }
    }

    /// Whether `column` can be searched with this condition. Only the numeric
    /// columns are ordered; the others support equality alone.
    pub fn applies_to(self, column: Column) -> bool {
        matches!(self, Self::Eq | Self::Ne) || column.data_type().is_ordered()
    }

    /// Evaluates the condition from the ordering of the row value against the
    /// lower operand and, for [Condition::Between], the upper operand.
    fn holds(self, lower: Ordering, upper: Option<Ordering>) -> bool {
        match self {
            Self::Eq => lower == Ordering::Equal,
            Self::Ne => lower != Ordering::Equal,
            Self::Lt => lower == Ordering::Less,
            Self::Gt => lower == Ordering::Greater,
            Self::Le => lower != Ordering::Greater,
            Self::Ge => lower != Ordering::Less,
            Self::Between => lower != Ordering::Less && upper.is_some_and(|u| u != Ordering::Greater),
        }
    }
}

/// A search predicate plus the position to resume scanning from.
#[derive(Debug, Clone, PartialEq)]
pub struct FindSpec {
    pub column: Column,
    pub condition: Condition,
    /// The operand, or the lower bound for [Condition::Between].
    pub operand: Value,
    /// Upper bound, required by [Condition::Between] and ignored otherwise.
    pub upper: Option<Value>,
    /// First row index eligible to match.
    pub start_pos: usize,
}

impl FindSpec {
    pub fn new(column: Column, condition: Condition, operand: Value) -> Self {
        Self {
            column,
            condition,
            operand,
            upper: None,
            start_pos: 0,
        }
    }

    /// Inclusive range search on `column`.
    pub fn between(column: Column, lower: Value, upper: Value) -> Self {
        Self {
            column,
            condition: Condition::Between,
            operand: lower,
            upper: Some(upper),
            start_pos: 0,
        }
    }

    /// Equality search on the id column.
    pub fn by_id(id: u64) -> Self {
        Self::new(Column::Id, Condition::Eq, Value::Uint(id))
    }

    pub fn starting_at(mut self, start_pos: usize) -> Self {
        self.start_pos = start_pos;
        self
    }

    /// Checks the column/condition/operand combination.
    ///
    /// # Errors
    /// Returns [TableError::InvalidSpec] when the condition does not apply to the
    /// column, an operand has the wrong type, or a range lacks its upper bound.
    pub fn validate(&self) -> Result<(), TableError> {
        if !self.condition.applies_to(self.column) {
            return Err(TableError::invalid_spec(format!(
                "condition {:?} is not supported on column {}",
                self.condition, self.column
            )));
        }
        check_operand(self.column, &self.operand)?;
        if self.condition == Condition::Between {
            let upper = self.upper.as_ref().ok_or_else(|| {
                TableError::invalid_spec("range search needs an upper bound")
            })?;
            check_operand(self.column, upper)?;
        }
        Ok(())
    }

    /// Evaluates the predicate against one row.
    pub fn matches(&self, row: &Row) -> bool {
        let Some(lower) = self.column.compare_to(row, &self.operand) else {
            return false;
        };
        let upper = match (&self.condition, &self.upper) {
            (Condition::Between, Some(upper)) => self.column.compare_to(row, upper),
            _ => None,
        };
        self.condition.holds(lower, upper)
    }
}

fn check_operand(column: Column, operand: &Value) -> Result<(), TableError> {
    let expected: DataType = column.data_type();
    if operand.data_type() != expected {
        return Err(TableError::invalid_spec(format!(
            "operand {operand} has type {:?} while column {column} has type {expected:?}",
            operand.data_type()
        )));
    }
    Ok(())
}

impl Table {
    /// Returns the index of the first row at or after `spec.start_pos` that
    /// satisfies the predicate, or `None` if there is none.
    ///
    /// Equality on `id` uses a binary search while [Table::ids_ascending] holds
    /// and a linear scan otherwise; both give the same answer.
    ///
    /// # Errors
    /// Returns [TableError::InvalidSpec] before scanning if the spec is invalid.
    pub fn find_first(&self, spec: &FindSpec) -> Result<Option<usize>, TableError> {
        spec.validate()?;
        let rows = self.rows();
        if spec.start_pos >= rows.len() {
            return Ok(None);
        }
        let tail = &rows[spec.start_pos..];

        if let (Column::Id, Condition::Eq, Value::Uint(id)) =
            (spec.column, spec.condition, &spec.operand)
        {
            if self.ids_ascending() {
                trace!(id, start = spec.start_pos, "binary search on id");
                return Ok(tail
                    .binary_search_by(|row| row.id.cmp(id))
                    .ok()
                    .map(|i| spec.start_pos + i));
            }
            trace!(id, "ids out of order, falling back to linear scan");
        }

        Ok(tail
            .iter()
            .position(|row| spec.matches(row))
            .map(|i| spec.start_pos + i))
    }

    /// Iterates over the indices of every matching row in storage order.
    ///
    /// # Errors
    /// Returns [TableError::InvalidSpec] if the spec is invalid.
    pub fn find_all(&self, spec: FindSpec) -> Result<Matches<'_>, TableError> {
        spec.validate()?;
        Ok(Matches {
            table: self,
            spec,
            done: false,
        })
    }
}

/// Iterator over matching row indices, see [Table::find_all].
pub struct Matches<'a> {
    table: &'a Table,
    spec: FindSpec,
    done: bool,
}

impl Iterator for Matches<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.done {
            return None;
        }
        match self.table.find_first(&self.spec) {
            Ok(Some(index)) => {
                self.spec.start_pos = index + 1;
                Some(index)
            }
            _ => {
                self.done = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let mut table = Table::new();
        let data = [
            (10, 1.5, "alpha", true, "first row"),
            (-4, 2.0, "beta", false, "second"),
            (10, -0.5, "gamma", true, ""),
            (7, 2.0, "beta", false, "fourth row"),
        ];
        for (c1, c2, c3, c4, c5) in data {
            table.insert(Row::new(0, c1, c2, c3, c4, c5)).unwrap();
        }
        table
    }

    #[test]
    fn test_condition_parse() {
        assert_eq!(Condition::parse(""), Ok(Condition::Eq));
        assert_eq!(Condition::parse("="), Ok(Condition::Eq));
        assert_eq!(Condition::parse("!"), Ok(Condition::Ne));
        assert_eq!(Condition::parse(">="), Ok(Condition::Ge));
        assert_eq!(Condition::parse("<="), Ok(Condition::Le));
        assert_eq!(Condition::parse("<>"), Ok(Condition::Between));
        assert_eq!(Condition::parse("btw"), Ok(Condition::Between));
        assert!(Condition::parse("=>").is_err());
    }

    #[test]
    fn test_condition_applies_to() {
        assert!(Condition::Between.applies_to(Column::C2));
        assert!(Condition::Lt.applies_to(Column::Id));
        assert!(Condition::Ne.applies_to(Column::C3));
        assert!(!Condition::Gt.applies_to(Column::C3));
        assert!(!Condition::Between.applies_to(Column::C5));
        assert!(!Condition::Lt.applies_to(Column::C4));
    }

    #[test]
    fn test_find_id_binary_search() {
        let table = table();
        assert!(table.ids_ascending());
        for id in 1..=4u64 {
            assert_eq!(table.find_first(&FindSpec::by_id(id)).unwrap(), Some(id as usize - 1));
        }
        assert_eq!(table.find_first(&FindSpec::by_id(0)).unwrap(), None);
        assert_eq!(table.find_first(&FindSpec::by_id(5)).unwrap(), None);
        // start_pos past the match
        assert_eq!(
            table.find_first(&FindSpec::by_id(2).starting_at(2)).unwrap(),
            None
        );
    }

    #[test]
    fn test_find_id_unsorted_falls_back() {
        let mut table = Table::new();
        for id in [5, 2, 9, 1] {
            table.append(Row::new(id, 0, 0.0, "", false, "")).unwrap();
        }
        assert!(!table.ids_ascending());
        assert_eq!(table.find_first(&FindSpec::by_id(1)).unwrap(), Some(3));
        assert_eq!(table.find_first(&FindSpec::by_id(5)).unwrap(), Some(0));
        assert_eq!(table.find_first(&FindSpec::by_id(3)).unwrap(), None);
    }

    #[test]
    fn test_find_numeric_conditions() {
        let table = table();
        let find = |cond, v: i64| {
            table
                .find_first(&FindSpec::new(Column::C1, cond, Value::Int(v)))
                .unwrap()
        };
        assert_eq!(find(Condition::Eq, 7), Some(3));
        assert_eq!(find(Condition::Ne, 10), Some(1));
        assert_eq!(find(Condition::Lt, 0), Some(1));
        assert_eq!(find(Condition::Gt, 7), Some(0));
        assert_eq!(find(Condition::Le, -4), Some(1));
        assert_eq!(find(Condition::Ge, 11), None);
    }

    #[test]
    fn test_find_between_inclusive() {
        let table = table();
        let spec = FindSpec::between(Column::C2, Value::Float(-0.5), Value::Float(1.5));
        let found: Vec<usize> = table.find_all(spec).unwrap().collect();
        assert_eq!(found, vec![0, 2]);

        let ids = FindSpec::between(Column::Id, Value::Uint(2), Value::Uint(3));
        assert_eq!(table.find_all(ids).unwrap().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_find_strings_and_bools() {
        let table = table();
        let beta = FindSpec::new(Column::C3, Condition::Eq, "beta".into());
        assert_eq!(table.find_all(beta).unwrap().collect::<Vec<_>>(), vec![1, 3]);

        let prefix = FindSpec::new(Column::C3, Condition::Eq, "bet".into());
        assert_eq!(table.find_first(&prefix).unwrap(), None);

        let not_empty = FindSpec::new(Column::C5, Condition::Ne, "".into());
        assert_eq!(table.find_all(not_empty).unwrap().collect::<Vec<_>>(), vec![0, 1, 3]);

        let truthy = FindSpec::new(Column::C4, Condition::Eq, Value::Bool(true));
        assert_eq!(table.find_all(truthy).unwrap().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_find_respects_start_pos() {
        let table = table();
        let spec = FindSpec::new(Column::C1, Condition::Eq, Value::Int(10)).starting_at(1);
        assert_eq!(table.find_first(&spec).unwrap(), Some(2));
        let spec = spec.starting_at(3);
        assert_eq!(table.find_first(&spec).unwrap(), None);
        let spec = spec.starting_at(100);
        assert_eq!(table.find_first(&spec).unwrap(), None);
    }

    #[test]
    fn test_invalid_specs() {
        let table = table();
        let invalid = [
            FindSpec::new(Column::C3, Condition::Gt, "a".into()),
            FindSpec::new(Column::C4, Condition::Lt, Value::Bool(true)),
            FindSpec::new(Column::C1, Condition::Eq, Value::Uint(1)),
            FindSpec::new(Column::Id, Condition::Between, Value::Uint(1)),
            FindSpec::between(Column::C2, Value::Float(0.0), Value::Int(1)),
        ];
        for spec in invalid {
            assert!(
                matches!(table.find_first(&spec), Err(TableError::InvalidSpec(_))),
                "{spec:?}"
            );
        }
        // validation happens even on an empty table
        let empty = Table::new();
        assert!(empty
            .find_first(&FindSpec::new(Column::C5, Condition::Le, "x".into()))
            .is_err());
    }

    #[test]
    fn test_find_on_empty_table() {
        let table = Table::new();
        assert_eq!(table.find_first(&FindSpec::by_id(1)).unwrap(), None);
        assert_eq!(table.find_all(FindSpec::by_id(1)).unwrap().count(), 0);
    }

    #[test]
    fn test_nan_never_matches() {
        let mut table = Table::new();
        table.insert(Row::new(0, 0, f64::NAN, "", false, "")).unwrap();
        let spec = FindSpec::new(Column::C2, Condition::Ne, Value::Float(1.0));
        assert_eq!(table.find_first(&spec).unwrap(), None);
    }
}
