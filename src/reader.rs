use std::collections::VecDeque;
use std::io::BufRead;

use tracing::trace;

use crate::error::{InputError, TokenizeError};
use crate::tokenizer::Tokenizer;

/// Hands out tokens one at a time from a line-oriented input stream.
///
/// Tokens of the current physical line are served first; once the line is
/// exhausted the next call reads a fresh line. A blank line produces a single
/// empty token, which the scalar parsers read as "absent".
pub struct LineReader<R> {
    source: R,
    pending: VecDeque<String>,
    line_number: usize,
    buffer: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            pending: VecDeque::new(),
            line_number: 0,
            buffer: Vec::new(),
        }
    }

    /// Returns the next token, reading a new line if the current one is exhausted.
    ///
    /// # Errors
    /// - [InputError::Eof] when the stream has no more lines.
    /// - [InputError::Io] when reading fails.
    /// - [InputError::Tokenize] when the new line is malformed or not UTF-8;
    ///   the line is dropped.
    pub fn next_token(&mut self) -> Result<String, InputError> {
        if let Some(token) = self.pending.pop_front() {
            return Ok(token);
        }

        self.buffer.clear();
        if self.source.read_until(b'\n', &mut self.buffer)? == 0 {
            return Err(InputError::Eof);
        }
        self.line_number += 1;

        let line = std::str::from_utf8(&self.buffer).map_err(|e| TokenizeError::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        })?;
        let tokens = Tokenizer::new(line.trim_end_matches(['\n', '\r'])).tokenize()?;
        trace!(line = self.line_number, count = tokens.len(), "tokenized line");

        let mut tokens = VecDeque::from(tokens);
        let first = tokens.pop_front().unwrap_or_default();
        self.pending = tokens;
        Ok(first)
    }

    /// Drops the tokens left on the current line.
    pub fn discard_pending(&mut self) {
        self.pending.clear();
    }

    /// Returns true if the current line still has unread tokens.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of physical lines read so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}
