use crate::error::TokenizeError;

/// Splits one input line into shell-like tokens.
///
/// Tokens are separated by unquoted spaces or tabs. Single or double quotes group
/// characters (including whitespace) into the current token and may appear
/// anywhere inside it; a backslash makes the following character literal.
pub struct Tokenizer {
    /// The input line stored as a vector of characters for easy iteration.
    input: Vec<char>,
    /// The current position in the character vector.
    position: usize,
}

impl Tokenizer {
    /// Creates a new Tokenizer for the given line.
    pub fn new(line: &str) -> Self {
        Self {
            input: line.chars().collect(),
            position: 0,
        }
    }

    /// Processes the entire line and returns its tokens.
    ///
    /// # Errors
    /// Returns an error if a quote is left open or the line ends with a lone backslash.
    ///
    /// # Example
    /// ```
    /// # use tabledb::tokenizer::Tokenizer;
    /// let tokens = Tokenizer::new(r#"add 'two words' a\ b"#).tokenize().unwrap();
    /// assert_eq!(tokens, vec!["add", "two words", "a b"]);
    /// ```
    pub fn tokenize(&mut self) -> Result<Vec<String>, TokenizeError> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            tokens.push(self.read_token()?);
        }

        Ok(tokens)
    }

    /// Reads one token starting at the current (non-blank) position.
    fn read_token(&mut self) -> Result<String, TokenizeError> {
        let mut token = String::new();
        let mut quote: Option<(char, usize)> = None;

        while !self.is_at_end() {
            let ch = self.current_char();
            match (ch, quote) {
                ('\\', _) => {
                    self.advance();
                    if self.is_at_end() {
                        return Err(TokenizeError::DanglingEscape);
                    }
                    token.push(self.current_char());
                }
                (c, Some((open, _))) if c == open => quote = None,
                (c, Some(_)) => token.push(c),
                ('\'' | '"', None) => quote = Some((ch, self.position)),
                (' ' | '\t', None) => break,
                (c, None) => token.push(c),
            }
            self.advance();
        }

        if let Some((quote, column)) = quote {
            return Err(TokenizeError::UnterminatedQuote { quote, column });
        }

        Ok(token)
    }

    // --- Navigation Helpers ---

    /// Returns the character at the current position.
    fn current_char(&self) -> char {
        self.input[self.position]
    }

    /// Moves the cursor forward by one character.
    fn advance(&mut self) {
        self.position += 1;
    }

    /// Checks if the cursor has reached the end of the input.
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Consumes separator characters (spaces and tabs).
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && matches!(self.current_char(), ' ' | '\t') {
            self.advance();
        }
    }
}
