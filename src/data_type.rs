/// Represents the scalar types of the fixed row schema.
/// These types define which parser feeds a column and which operand a search expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// A 64-bit unsigned integer (row ids).
    Uint,
    /// A 64-bit signed integer.
    Int,
    /// A 64-bit floating-point number.
    Float,
    /// A bounded ASCII string.
    Text,
    /// A boolean value (true or false).
    Bool,
}

impl DataType {
    /// Returns `true` for types with a meaningful order beyond equality.
    pub fn is_ordered(self) -> bool {
        matches!(self, Self::Uint | Self::Int | Self::Float)
    }
}
