use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::data_type::DataType;
use crate::row::{C3_MAX_LEN, C5_MAX_LEN, Row};
use crate::value::Value;
use crate::whitelist::Whitelist;

/// Selects one of the six fields of a [Row].
///
/// Columns are addressed by index `0..=5` in the selector protocol, in the
/// order `id, c1, c2, c3, c4, c5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    C1,
    C2,
    C3,
    C4,
    C5,
}

impl Column {
    /// All columns in schema order.
    pub const ALL: [Column; 6] = [
        Column::Id,
        Column::C1,
        Column::C2,
        Column::C3,
        Column::C4,
        Column::C5,
    ];

    /// Maps a selector index to its column.
    pub fn from_index(index: u64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The column name as shown in rendered headers.
    pub fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::C1 => "c1",
            Self::C2 => "c2",
            Self::C3 => "c3",
            Self::C4 => "c4",
            Self::C5 => "c5",
        }
    }

    pub fn data_type(self) -> DataType {
        match self {
            Self::Id => DataType::Uint,
            Self::C1 => DataType::Int,
            Self::C2 => DataType::Float,
            Self::C3 | Self::C5 => DataType::Text,
            Self::C4 => DataType::Bool,
        }
    }

    /// Maximum length for string columns.
    pub fn max_len(self) -> Option<usize> {
        match self {
            Self::C3 => Some(C3_MAX_LEN),
            Self::C5 => Some(C5_MAX_LEN),
            _ => None,
        }
    }

    /// Accepted characters for string columns.
    pub fn whitelist(self) -> Option<Whitelist> {
        match self {
            Self::C3 => Some(Whitelist::alnum()),
            Self::C5 => Some(Whitelist::alnum_space()),
            _ => None,
        }
    }

    /// Prompt shown when this field is read interactively.
    pub fn default_prompt(self) -> &'static str {
        match self {
            Self::Id => "id[uint]: ",
            Self::C1 => "c1[int]: ",
            Self::C2 => "c2[float]: ",
            Self::C3 => "c3[char 16]: ",
            Self::C4 => "c4[bool]: ",
            Self::C5 => "c5[char 32]: ",
        }
    }

    /// Message shown when a value for this field is rejected.
    pub fn default_error(self) -> &'static str {
        match self {
            Self::Id => "id: Uint expected\n",
            Self::C1 => "c1: Int expected\n",
            Self::C2 => "c2: Float expected\n",
            Self::C3 => "c3: Max length: 16; Valid chars are 0-9 a-z A-Z\n",
            Self::C4 => "c4: Valid options are: <blank = 0> 0 1 true TRUE false FALSE\n",
            Self::C5 => "c5: Max length: 32; Valid chars are 0-9 a-z A-Z and space\n",
        }
    }

    /// Extracts this column of `row` as a [Value].
    pub fn value(self, row: &Row) -> Value {
        match self {
            Self::Id => Value::Uint(row.id),
            Self::C1 => Value::Int(row.c1),
            Self::C2 => Value::Float(row.c2),
            Self::C3 => Value::Text(Arc::from(row.c3.as_str())),
            Self::C4 => Value::Bool(row.c4),
            Self::C5 => Value::Text(Arc::from(row.c5.as_str())),
        }
    }

    /// Total order of two rows by this column.
    ///
    /// Floats use IEEE total ordering, booleans order as 0/1 and strings
    /// compare byte-wise.
    pub fn compare(self, a: &Row, b: &Row) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::C1 => a.c1.cmp(&b.c1),
            Self::C2 => a.c2.total_cmp(&b.c2),
            Self::C3 => a.c3.as_bytes().cmp(b.c3.as_bytes()),
            Self::C4 => a.c4.cmp(&b.c4),
            Self::C5 => a.c5.as_bytes().cmp(b.c5.as_bytes()),
        }
    }

    /// Compares this column of `row` with an operand without materializing a [Value].
    ///
    /// Returns `None` if the operand has the wrong type or a float comparison
    /// involves NaN.
    pub fn compare_to(self, row: &Row, operand: &Value) -> Option<Ordering> {
        match (self, operand) {
            (Self::Id, Value::Uint(v)) => Some(row.id.cmp(v)),
            (Self::C1, Value::Int(v)) => Some(row.c1.cmp(v)),
            (Self::C2, Value::Float(v)) => row.c2.partial_cmp(v),
            (Self::C3, Value::Text(v)) => Some(row.c3.as_bytes().cmp(v.as_bytes())),
            (Self::C4, Value::Bool(v)) => Some(row.c4.cmp(v)),
            (Self::C5, Value::Text(v)) => Some(row.c5.as_bytes().cmp(v.as_bytes())),
            _ => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
