use std::fmt;

use allocative::Allocative;

/// Maximum length of the `c3` field, in characters.
pub const C3_MAX_LEN: usize = 16;
/// Maximum length of the `c5` field, in characters.
pub const C5_MAX_LEN: usize = 32;

/// One record of the fixed six-column schema.
///
/// String bounds and character sets are enforced where rows are read from
/// input (see [crate::input]); a `Row` built in code is trusted as-is.
#[derive(Debug, Clone, PartialEq, Default, Allocative)]
pub struct Row {
    /// Unique row id, assigned from the table's `next_id` on insertion.
    pub id: u64,
    pub c1: i64,
    pub c2: f64,
    /// Alphanumeric, at most [C3_MAX_LEN] characters.
    pub c3: String,
    pub c4: bool,
    /// Alphanumeric plus space, at most [C5_MAX_LEN] characters.
    pub c5: String,
}

impl Row {
    pub fn new(
        id: u64,
        c1: i64,
        c2: f64,
        c3: impl Into<String>,
        c4: bool,
        c5: impl Into<String>,
    ) -> Self {
        Self {
            id,
            c1,
            c2,
            c3: c3.into(),
            c4,
            c5: c5.into(),
        }
    }
}

/// Human-readable, tab-separated form with quoted strings.
impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{:.6}\t'{}'\t{}\t'{}'",
            self.id,
            self.c1,
            self.c2,
            self.c3,
            u8::from(self.c4),
            self.c5
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let row = Row::new(3, -4, 2.5, "abc", true, "x y");
        assert_eq!(row.to_string(), "3\t-4\t2.500000\t'abc'\t1\t'x y'");
    }

    #[test]
    fn test_default_row() {
        let row = Row::default();
        assert_eq!(row.id, 0);
        assert!(row.c3.is_empty());
        assert_eq!(row.to_string(), "0\t0\t0.000000\t''\t0\t''");
    }
}
