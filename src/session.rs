//! Interactive command loop over a single table.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::column::Column;
use crate::config::SessionConfig;
use crate::dump;
use crate::error::{InputError, ParseError, SessionError, TableError};
use crate::find::{Condition, FindSpec};
use crate::input::Acquirer;
use crate::render;
use crate::sort::{SortDirection, SortSpec};
use crate::table::Table;

const MENU: &str = "tabledb: single-table database operator\n\
    \tCommand\tAlias\tDescription\n\
    \thelp\th\tPrint this message\n\
    \tquit\tq exit\tExit\n\
    \tfill\tf\tFill a new table with data\n\
    \tadd\ta\tAppend row to table\n\
    \tdelete\td\tDelete row by id\n\
    \tprint\tp\tPrint table\n\
    \twhere\tw\tPrint rows matching a condition\n\
    \tsort\to\tPrint rows ordered by a column\n\
    \tsave\ts export\tSave table to file\n\
    \tload\tl import\tLoad table from file\n\
    \tinfo\ti\tShow table statistics\n\
    ========\n";

const COLUMN_PROMPT: &str = "Column num[uint 0-5, other for exit]: ";

/// A parsed command word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Fill,
    Add,
    Delete,
    Print,
    Where,
    Sort,
    Save,
    Load,
    Info,
    Unknown(String),
}

impl Command {
    pub fn parse(token: &str) -> Self {
        match token {
            "h" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            "f" | "fill" => Command::Fill,
            "a" | "add" => Command::Add,
            "d" | "delete" => Command::Delete,
            "p" | "print" => Command::Print,
            "w" | "where" => Command::Where,
            "o" | "sort" => Command::Sort,
            "s" | "save" | "export" => Command::Save,
            "l" | "load" | "import" => Command::Load,
            "i" | "info" => Command::Info,
            _ => Command::Unknown(token.to_string()),
        }
    }
}

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Reads commands from `input` and applies them to the current table.
///
/// Command arguments share the token stream with the command word, so
/// `add 5 2.5 abc 1 'x y'` on one line appends a full row.
pub struct Session<R, W, E> {
    acquirer: Acquirer<R, W, E>,
    table: Option<Table>,
    config: SessionConfig,
}

impl<R: BufRead, W: Write, E: Write> Session<R, W, E> {
    pub fn new(input: R, out: W, err: E, config: SessionConfig) -> Self {
        Self {
            acquirer: Acquirer::with_retries(input, out, err, config.retries),
            table: None,
            config,
        }
    }

    /// Starts the session with `table` already loaded.
    pub fn with_table(mut self, table: Table) -> Self {
        self.table = Some(table);
        self
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn out(&self) -> &W {
        self.acquirer.out()
    }

    pub fn err(&self) -> &E {
        self.acquirer.err()
    }

    /// Runs until `quit` or end of input.
    ///
    /// Command failures are reported on the error stream and the loop goes on;
    /// only I/O failures on the streams themselves end it with an error.
    pub fn run(&mut self) -> Result<(), SessionError> {
        if self.config.banner {
            self.print_out(MENU.trim_end())?;
        }
        loop {
            let prompt = self.config.prompt.clone();
            self.acquirer.out_mut().write_all(prompt.as_bytes())?;
            self.acquirer.out_mut().flush()?;

            let outcome = match self.acquirer.reader_mut().next_token() {
                Ok(token) if token.is_empty() => continue,
                Ok(token) => self.execute(Command::parse(&token)),
                Err(e) => Err(e.into()),
            };
            let flow = match outcome {
                Ok(flow) => flow,
                Err(e) => self.recover(e)?,
            };
            if flow == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Decides whether a failed command ends the session.
    fn recover(&mut self, error: SessionError) -> Result<Flow, SessionError> {
        match error {
            SessionError::Input(InputError::Eof) => {
                self.print_err("EOF")?;
                Ok(Flow::Quit)
            }
            SessionError::Input(InputError::Io(e)) | SessionError::Io(e) => Err(e.into()),
            // already reported to the user
            SessionError::Input(InputError::Cancelled { .. }) => Ok(Flow::Continue),
            other => {
                debug!(error = %other, "command failed");
                self.acquirer.reader_mut().discard_pending();
                self.print_err(format_args!("Error: {other}"))?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Executes one command, reading its arguments from the input.
    pub fn execute(&mut self, command: Command) -> Result<Flow, SessionError> {
        debug!(?command, "executing");
        match command {
            Command::Help => self.print_out(MENU.trim_end())?,
            Command::Quit => {
                self.print_out("Quitting")?;
                return Ok(Flow::Quit);
            }
            Command::Fill => self.fill()?,
            Command::Add => self.add()?,
            Command::Delete => self.delete()?,
            Command::Print => self.print()?,
            Command::Where => self.select_where()?,
            Command::Sort => self.sort()?,
            Command::Save => self.save()?,
            Command::Load => self.load()?,
            Command::Info => self.info()?,
            Command::Unknown(token) => self.print_out(format_args!("Unknown command: {token}"))?,
        }
        Ok(Flow::Continue)
    }

    /// Builds a whole new table; the current one is replaced only if every
    /// row was read.
    fn fill(&mut self) -> Result<(), SessionError> {
        let count = self
            .acquirer
            .get_uint(Some("Row count: "), Some("Row count: Uint > 0 expected\n"))?;
        if count == 0 {
            self.print_err("Row count should be > 0")?;
            self.print_out("Cancelled")?;
            return Ok(());
        }
        let capacity = usize::try_from(count).map_err(|_| TableError::CapacityOverflow(usize::MAX))?;
        let mut table = Table::with_capacity(capacity)?;
        self.print_out(format_args!("{count} rows"))?;

        for i in 0..count {
            self.print_out(format_args!("[{i}]:"))?;
            let row = self.acquirer.read_row(Some(table.next_id()))?;
            table.insert(row)?;
        }
        info!(rows = table.len(), "table filled");
        self.table = Some(table);
        Ok(())
    }

    fn add(&mut self) -> Result<(), SessionError> {
        let table = match self.table.take() {
            Some(table) => table,
            None => Table::with_capacity(self.config.initial_capacity)?,
        };
        let table = self.table.insert(table);
        let row = self.acquirer.read_row(Some(table.next_id()))?;
        let id = table.insert(row)?;
        debug!(id, "row added");
        Ok(())
    }

    fn delete(&mut self) -> Result<(), SessionError> {
        if !self.table.as_ref().is_some_and(Table::is_allocated) {
            return Ok(self.print_err("No table")?);
        }
        let id = self.acquirer.get_id(None)?;
        let Some(table) = self.table.as_mut() else {
            return Ok(());
        };
        match table.find_first(&FindSpec::by_id(id))? {
            Some(position) => {
                table.remove_at(position)?;
                self.print_out(format_args!("Row with id {id} is at position {position}"))?;
            }
            None => self.print_err(format_args!("Row with id {id} not found"))?,
        }
        Ok(())
    }

    fn print(&mut self) -> Result<(), SessionError> {
        if !self.has_rows() {
            return Ok(self.print_err("No table")?);
        }
        if let Some(table) = self.table.as_ref() {
            render::render_rows(self.acquirer.out_mut(), table)?;
        }
        Ok(())
    }

    /// Reads a column selector; anything outside `0..=5` cancels.
    fn read_column(&mut self) -> Result<Option<Column>, SessionError> {
        let index = self.acquirer.get_uint(Some(COLUMN_PROMPT), Some("Uint expected\n"))?;
        let column = Column::from_index(index);
        if column.is_none() {
            self.print_out("Cancelled")?;
        }
        Ok(column)
    }

    fn has_rows(&self) -> bool {
        self.table.as_ref().is_some_and(|t| !t.is_empty())
    }

    fn select_where(&mut self) -> Result<(), SessionError> {
        if !self.has_rows() {
            return Ok(self.print_err("No table")?);
        }
        let Some(column) = self.read_column()? else {
            return Ok(());
        };

        let (prompt, on_error) = if column.data_type().is_ordered() {
            (
                "Compare method[= ! > >= < <= <>] [default =]: ",
                "Compare: = ! > >= < <= <> expected\n",
            )
        } else {
            ("Compare method: [= !] [default =]: ", "Compare: = ! expected\n")
        };
        let condition = self.acquirer.acquire(Some(prompt), Some(on_error), |token| {
            Condition::parse(token)
                .ok()
                .filter(|c| c.applies_to(column))
                .ok_or_else(|| ParseError::Unrecognized(token.to_string()))
        })?;

        // "c1[int]: " becomes "c1: first operand[int]: "
        let kind = &column.default_prompt()[column.name().len()..];
        let first = format!("{column}: first operand{kind}");
        let operand = self.acquirer.get_field(column, Some(&first))?;
        let spec = if condition == Condition::Between {
            let second = format!("{column}: second operand{kind}");
            let upper = self.acquirer.get_field(column, Some(&second))?;
            FindSpec::between(column, operand, upper)
        } else {
            FindSpec::new(column, condition, operand)
        };

        let Some(table) = self.table.as_ref() else {
            return Ok(());
        };
        let matches = table.find_all(spec)?;
        render::render_rows(self.acquirer.out_mut(), matches.filter_map(|i| table.get(i)))?;
        Ok(())
    }

    fn sort(&mut self) -> Result<(), SessionError> {
        if !self.has_rows() {
            return Ok(self.print_err("No table")?);
        }
        let Some(column) = self.read_column()? else {
            return Ok(());
        };
        let direction = self.acquirer.acquire(
            Some("Direction[asc desc] [default asc]: "),
            Some("Direction: asc desc + - expected\n"),
            SortDirection::parse,
        )?;

        let Some(table) = self.table.as_ref() else {
            return Ok(());
        };
        let sorted = table.sort(SortSpec::new(column, direction))?;
        render::render_rows(self.acquirer.out_mut(), &sorted)?;
        Ok(())
    }

    /// Reads a file path; a blank answer cancels.
    fn read_path(&mut self) -> Result<Option<String>, SessionError> {
        let path: String = self
            .acquirer
            .acquire(Some("Path: "), None, |token| Ok(token.to_string()))?;
        if path.is_empty() {
            self.print_out("Cancelled")?;
            return Ok(None);
        }
        Ok(Some(path))
    }

    fn save(&mut self) -> Result<(), SessionError> {
        if self.table.is_none() {
            return Ok(self.print_err("No table")?);
        }
        let Some(path) = self.read_path()? else {
            return Ok(());
        };
        self.print_out(format_args!("Saving current table to '{path}'"))?;
        let Some(table) = self.table.as_ref() else {
            return Ok(());
        };
        match dump::save_to_path(table, Path::new(&path)) {
            Ok(()) => self.print_out("Saved current table")?,
            Err(e) => self.print_err(format_args!("Cannot save to '{path}': {e}"))?,
        }
        Ok(())
    }

    fn load(&mut self) -> Result<(), SessionError> {
        let Some(path) = self.read_path()? else {
            return Ok(());
        };
        self.print_out(format_args!("Loading table from '{path}'"))?;
        match dump::load_from_path(Path::new(&path)) {
            Ok(table) => {
                self.table = Some(table);
                self.print_out("Loaded current table")?;
            }
            Err(e) => self.print_err(format_args!("Cannot load '{path}': {e}"))?,
        }
        Ok(())
    }

    fn info(&mut self) -> Result<(), SessionError> {
        let Some(table) = self.table.as_ref() else {
            return Ok(self.print_err("No table")?);
        };
        let out = self.acquirer.out_mut();
        writeln!(out, "Rows: {}", table.len())?;
        writeln!(out, "Capacity: {}", table.capacity())?;
        writeln!(out, "Next id: {}", table.next_id())?;
        writeln!(out, "Memory: {} bytes", table.memory_usage())?;
        Ok(())
    }

    fn print_out(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.acquirer.out_mut(), "{message}")
    }

    fn print_err(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.acquirer.err_mut(), "{message}")
    }
}
