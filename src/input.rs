use std::io::{BufRead, Write};

use tracing::warn;

use crate::column::Column;
use crate::error::{InputError, ParseError};
use crate::parser;
use crate::reader::LineReader;
use crate::row::Row;
use crate::value::Value;
use crate::whitelist::Whitelist;

/// Default retry budget for interactive sessions.
pub const DEFAULT_RETRIES: u32 = 3;

/// Reads validated values from a token stream, prompting on `out` and
/// reporting rejected input on `err`.
///
/// A retry budget of zero makes the acquirer non-interactive: the first
/// malformed token is returned as an error and nothing is written to `err`.
pub struct Acquirer<R, W, E> {
    reader: LineReader<R>,
    out: W,
    err: E,
    retries: u32,
}

impl<R: BufRead, W: Write, E: Write> Acquirer<R, W, E> {
    /// Creates an interactive acquirer with [DEFAULT_RETRIES].
    pub fn new(input: R, out: W, err: E) -> Self {
        Self::with_retries(input, out, err, DEFAULT_RETRIES)
    }

    pub fn with_retries(input: R, out: W, err: E, retries: u32) -> Self {
        Self {
            reader: LineReader::new(input),
            out,
            err,
            retries,
        }
    }

    pub fn reader_mut(&mut self) -> &mut LineReader<R> {
        &mut self.reader
    }

    pub fn out(&self) -> &W {
        &self.out
    }

    pub fn out_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn err(&self) -> &E {
        &self.err
    }

    pub fn err_mut(&mut self) -> &mut E {
        &mut self.err
    }

    /// Prompts for a token and parses it, retrying on malformed input.
    ///
    /// # Errors
    /// - [InputError::Eof] / [InputError::Io] as soon as the stream fails.
    /// - [InputError::Malformed] / [InputError::Tokenize] on the first bad
    ///   token when the retry budget is zero.
    /// - [InputError::Cancelled] once `retries` retries have also failed.
    pub fn acquire<T, F>(
        &mut self,
        prompt: Option<&str>,
        on_error: Option<&str>,
        mut parse: F,
    ) -> Result<T, InputError>
    where
        F: FnMut(&str) -> Result<T, ParseError>,
    {
        let mut failures: u32 = 0;
        loop {
            if let Some(prompt) = prompt {
                self.out.write_all(prompt.as_bytes())?;
                self.out.flush()?;
            }

            let outcome = self
                .reader
                .next_token()
                .and_then(|token| parse(&token).map_err(InputError::from));

            let error = match outcome {
                Ok(value) => return Ok(value),
                Err(e @ (InputError::Malformed(_) | InputError::Tokenize(_))) => e,
                Err(e) => return Err(e),
            };
            if self.retries == 0 {
                return Err(error);
            }

            if let Some(message) = on_error {
                self.err.write_all(message.as_bytes())?;
                self.err.flush()?;
            }
            self.reader.discard_pending();

            if failures == self.retries {
                writeln!(self.err, "Max retries exceeded")?;
                writeln!(self.out, "Cancelled")?;
                let attempts = failures + 1;
                warn!(attempts, last_error = %error, "input cancelled");
                return Err(InputError::Cancelled { attempts });
            }
            failures += 1;
        }
    }

    pub fn get_uint(&mut self, prompt: Option<&str>, on_error: Option<&str>) -> Result<u64, InputError> {
        self.acquire(prompt, on_error, parser::parse_uint)
    }

    pub fn get_int(&mut self, prompt: Option<&str>, on_error: Option<&str>) -> Result<i64, InputError> {
        self.acquire(prompt, on_error, parser::parse_int)
    }

    pub fn get_float(&mut self, prompt: Option<&str>, on_error: Option<&str>) -> Result<f64, InputError> {
        self.acquire(prompt, on_error, parser::parse_float)
    }

    pub fn get_bool(&mut self, prompt: Option<&str>, on_error: Option<&str>) -> Result<bool, InputError> {
        self.acquire(prompt, on_error, parser::parse_bool)
    }

    /// Reads a bounded string made only of `whitelist` characters.
    pub fn get_str(
        &mut self,
        prompt: Option<&str>,
        on_error: Option<&str>,
        whitelist: &Whitelist,
        max_len: usize,
    ) -> Result<String, InputError> {
        self.acquire(prompt, on_error, |token| {
            parser::parse_str(token, whitelist, max_len)
        })
    }

    // Per-column readers. `None` selects the column's default prompt.

    pub fn get_id(&mut self, prompt: Option<&str>) -> Result<u64, InputError> {
        let column = Column::Id;
        self.get_uint(
            Some(prompt.unwrap_or(column.default_prompt())),
            Some(column.default_error()),
        )
    }

    pub fn get_c1(&mut self, prompt: Option<&str>) -> Result<i64, InputError> {
        let column = Column::C1;
        self.get_int(
            Some(prompt.unwrap_or(column.default_prompt())),
            Some(column.default_error()),
        )
    }

    pub fn get_c2(&mut self, prompt: Option<&str>) -> Result<f64, InputError> {
        let column = Column::C2;
        self.get_float(
            Some(prompt.unwrap_or(column.default_prompt())),
            Some(column.default_error()),
        )
    }

    pub fn get_c3(&mut self, prompt: Option<&str>) -> Result<String, InputError> {
        self.get_text_column(Column::C3, prompt)
    }

    pub fn get_c4(&mut self, prompt: Option<&str>) -> Result<bool, InputError> {
        let column = Column::C4;
        self.get_bool(
            Some(prompt.unwrap_or(column.default_prompt())),
            Some(column.default_error()),
        )
    }

    pub fn get_c5(&mut self, prompt: Option<&str>) -> Result<String, InputError> {
        self.get_text_column(Column::C5, prompt)
    }

    fn get_text_column(&mut self, column: Column, prompt: Option<&str>) -> Result<String, InputError> {
        let whitelist = column.whitelist().unwrap_or_default();
        let max_len = column.max_len().unwrap_or_default();
        self.get_str(
            Some(prompt.unwrap_or(column.default_prompt())),
            Some(column.default_error()),
            &whitelist,
            max_len,
        )
    }

    /// Reads one value of `column`'s type.
    pub fn get_field(&mut self, column: Column, prompt: Option<&str>) -> Result<Value, InputError> {
        Ok(match column {
            Column::Id => Value::Uint(self.get_id(prompt)?),
            Column::C1 => Value::Int(self.get_c1(prompt)?),
            Column::C2 => Value::Float(self.get_c2(prompt)?),
            Column::C3 => Value::Text(self.get_c3(prompt)?.into()),
            Column::C4 => Value::Bool(self.get_c4(prompt)?),
            Column::C5 => Value::Text(self.get_c5(prompt)?.into()),
        })
    }

    /// Builds a row field by field. A given `id` is used as-is instead of
    /// being read. No table is touched, so a failure leaves nothing behind.
    pub fn read_row(&mut self, id: Option<u64>) -> Result<Row, InputError> {
        let id = match id {
            Some(id) => id,
            None => self.get_id(None)?,
        };
        Ok(Row {
            id,
            c1: self.get_c1(None)?,
            c2: self.get_c2(None)?,
            c3: self.get_c3(None)?,
            c4: self.get_c4(None)?,
            c5: self.get_c5(None)?,
        })
    }
}
