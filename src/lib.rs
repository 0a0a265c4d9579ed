//! An in-memory table engine with a fixed six-column row schema.
//!
//! Values enter through a strict, line-oriented token reader with typed
//! parsers and a bounded retry policy; rows live in a capacity-doubling
//! [Table] that supports single-predicate search, detached sorting and a
//! plain-text dump format.

pub mod column;
pub mod config;
pub mod data_type;
pub mod dump;
pub mod error;
pub mod find;
pub mod input;
pub mod parser;
pub mod reader;
pub mod render;
pub mod row;
pub mod session;
pub mod sort;
pub mod table;
pub mod tokenizer;
pub mod value;
pub mod whitelist;

pub use column::Column;
pub use config::SessionConfig;
pub use data_type::DataType;
pub use error::{ConfigError, InputError, LoadError, ParseError, SessionError, TableError, TokenizeError};
pub use find::{Condition, FindSpec};
pub use input::Acquirer;
pub use reader::LineReader;
pub use row::Row;
pub use session::Session;
pub use sort::{SortDirection, SortSpec};
pub use table::Table;
pub use value::Value;
pub use whitelist::Whitelist;
