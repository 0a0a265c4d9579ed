use allocative::Allocative;
use tracing::debug;

use crate::error::TableError;
use crate::row::Row;

/// Capacity allocated by the first [Table::append] on an unallocated table.
pub const DEFAULT_CAPACITY: usize = 16;

/// An owned, growable sequence of [Row]s plus id-assignment state.
///
/// The logical capacity is always zero (unallocated) or a power of two, and it
/// doubles exactly when an append finds the table full.
#[derive(Debug, Clone, PartialEq, Allocative)]
pub struct Table {
    rows: Vec<Row>,
    capacity: usize,
    next_id: u64,
    /// `true` while row ids are strictly increasing in storage order.
    ids_ascending: bool,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// Creates an empty, unallocated table. The first append allocates
    /// [DEFAULT_CAPACITY] rows.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            capacity: 0,
            next_id: 1,
            ids_ascending: true,
        }
    }

    /// Creates an empty table with room for at least `capacity` rows, rounded
    /// up to the next power of two.
    ///
    /// # Errors
    /// - [TableError::ZeroCapacity] if `capacity` is zero.
    /// - [TableError::CapacityOverflow] if the rounded capacity does not fit in `usize`.
    /// - [TableError::Alloc] if the storage cannot be reserved.
    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        if capacity == 0 {
            return Err(TableError::ZeroCapacity);
        }
        let capacity = capacity
            .checked_next_power_of_two()
            .ok_or(TableError::CapacityOverflow(capacity))?;

        let mut table = Self::new();
        table.grow_to(capacity)?;
        Ok(table)
    }

    /// Reserves storage so that exactly `capacity` rows fit.
    /// On failure the table is left unchanged.
    fn grow_to(&mut self, capacity: usize) -> Result<(), TableError> {
        self.rows.try_reserve_exact(capacity - self.rows.len())?;
        debug!(from = self.capacity, to = capacity, "table capacity grown");
        self.capacity = capacity;
        Ok(())
    }

    /// Appends a row at the end of the table, keeping its id as-is.
    ///
    /// Allocates [DEFAULT_CAPACITY] rows on an unallocated table and doubles
    /// the capacity when the table is full.
    ///
    /// # Errors
    /// Returns [TableError::Alloc] if growing fails; the table is unchanged.
    pub fn append(&mut self, row: Row) -> Result<(), TableError> {
        if self.capacity == 0 {
            self.grow_to(DEFAULT_CAPACITY)?;
        } else if self.rows.len() == self.capacity {
            let doubled = self
                .capacity
                .checked_mul(2)
                .ok_or(TableError::CapacityOverflow(self.capacity))?;
            self.grow_to(doubled)?;
        }

        if self.rows.last().is_some_and(|last| last.id >= row.id) {
            self.ids_ascending = false;
        }
        self.rows.push(row);
        Ok(())
    }

    /// Appends a row under the next auto-assigned id and returns that id.
    ///
    /// `next_id` only advances if the append succeeds.
    ///
    /// # Errors
    /// - [TableError::IdExhausted] if `next_id` cannot advance past the
    ///   assigned id; nothing is appended.
    /// - [TableError::Alloc] if growing fails.
    pub fn insert(&mut self, mut row: Row) -> Result<u64, TableError> {
        let id = self.next_id;
        let next_id = id.checked_add(1).ok_or(TableError::IdExhausted)?;
        row.id = id;
        self.append(row)?;
        self.next_id = next_id;
        Ok(id)
    }

    /// Removes the row at `position`, shifting every later row left by one.
    ///
    /// # Errors
    /// - [TableError::Empty] if there are no rows.
    /// - [TableError::OutOfBounds] if `position >= len`.
    pub fn remove_at(&mut self, position: usize) -> Result<Row, TableError> {
        if self.rows.is_empty() {
            return Err(TableError::Empty);
        }
        if position >= self.rows.len() {
            return Err(TableError::OutOfBounds {
                position,
                len: self.rows.len(),
            });
        }
        let row = self.rows.remove(position);
        debug!(position, id = row.id, "row removed");

        // removal keeps an ascending sequence ascending, and may fix a broken one
        if !self.ids_ascending {
            self.ids_ascending = self.rows.windows(2).all(|w| w[0].id < w[1].id);
        }
        Ok(row)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Logical capacity: zero when unallocated, otherwise a power of two.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_allocated(&self) -> bool {
        self.capacity > 0
    }

    /// The id the next [Table::insert] will assign.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn set_next_id(&mut self, next_id: u64) {
        self.next_id = next_id;
    }

    /// Returns true while the stored ids are strictly increasing, the
    /// precondition of the binary-search id lookup.
    pub fn ids_ascending(&self) -> bool {
        self.ids_ascending
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get(&self, position: usize) -> Option<&Row> {
        self.rows.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Bytes owned by the table, including the row storage and row strings.
    pub fn memory_usage(&self) -> usize {
        allocative::size_of_unique(self)
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
