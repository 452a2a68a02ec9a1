// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Board and player types shared by the wire protocol and the client.
//!
//! The board is a fixed 6×7 grid. Cells and symbols travel as small integers
//! on the wire (`0` empty, `1`/`2` for the two players), so the enums here
//! convert through `u8` for serde.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of rows on the board.
pub const ROWS: usize = 6;

/// Number of columns on the board.
pub const COLS: usize = 7;

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerSymbol {
    One,
    Two,
}

impl PlayerSymbol {
    /// Returns the other player's symbol.
    pub fn other(self) -> Self {
        match self {
            PlayerSymbol::One => PlayerSymbol::Two,
            PlayerSymbol::Two => PlayerSymbol::One,
        }
    }
}

impl TryFrom<u8> for PlayerSymbol {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(PlayerSymbol::One),
            2 => Ok(PlayerSymbol::Two),
            other => Err(Error::InvalidSymbol(other)),
        }
    }
}

impl From<PlayerSymbol> for u8 {
    fn from(symbol: PlayerSymbol) -> u8 {
        match symbol {
            PlayerSymbol::One => 1,
            PlayerSymbol::Two => 2,
        }
    }
}

impl fmt::Display for PlayerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Cell {
    #[default]
    Empty,
    Taken(PlayerSymbol),
}

impl TryFrom<u8> for Cell {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Cell::Empty),
            1 | 2 => PlayerSymbol::try_from(value).map(Cell::Taken),
            other => Err(Error::InvalidCell(other)),
        }
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> u8 {
        match cell {
            Cell::Empty => 0,
            Cell::Taken(symbol) => symbol.into(),
        }
    }
}

/// The 6×7 board, row 0 at the top.
///
/// Serialized as a nested array of integers, matching the server's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid([[Cell; COLS]; ROWS]);

impl Grid {
    /// Creates an empty board.
    pub fn empty() -> Self {
        Grid::default()
    }

    /// Creates a board from raw rows.
    pub fn from_rows(rows: [[Cell; COLS]; ROWS]) -> Self {
        Grid(rows)
    }

    /// Returns the cell at `(row, column)`, or `None` if out of range.
    pub fn cell(&self, row: usize, column: usize) -> Option<Cell> {
        self.0.get(row).and_then(|r| r.get(column)).copied()
    }

    /// Returns the rows, top first.
    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.0
    }

    /// Number of occupied cells.
    pub fn filled(&self) -> usize {
        self.0.iter().flatten().filter(|c| **c != Cell::Empty).count()
    }

    /// Returns a copy with `(row, column)` set to `cell`.
    ///
    /// Out-of-range coordinates leave the board unchanged.
    pub fn with_cell(mut self, row: usize, column: usize, cell: Cell) -> Self {
        if let Some(slot) = self.0.get_mut(row).and_then(|r| r.get_mut(column)) {
            *slot = cell;
        }
        self
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.0 {
            let line: Vec<&str> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => ".",
                    Cell::Taken(PlayerSymbol::One) => "X",
                    Cell::Taken(PlayerSymbol::Two) => "O",
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        write!(f, "1 2 3 4 5 6 7")
    }
}

/// A board column a move can be dropped into (0 through 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Column(u8);

impl Column {
    /// Returns the zero-based column index.
    pub fn index(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Column {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        if usize::from(value) < COLS {
            Ok(Column(value))
        } else {
            Err(Error::InvalidColumn(value))
        }
    }
}

impl From<Column> for u8 {
    fn from(column: Column) -> u8 {
        column.0
    }
}

/// Who is seated in a player slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerType {
    Human,
    Bot,
}

/// A participant as reported by the server.
///
/// `player_id` is only sent for your own seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    pub username: String,
    pub symbol: PlayerSymbol,
    #[serde(rename = "type")]
    pub player_type: PlayerType,
    pub is_online: bool,
}

/// The most recent move, used for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    pub player: PlayerSymbol,
    pub column: u8,
    pub row: u8,
}

impl LastMove {
    /// Returns true if the move lies on the board.
    pub fn is_on_board(&self) -> bool {
        usize::from(self.column) < COLS && usize::from(self.row) < ROWS
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod tests;
