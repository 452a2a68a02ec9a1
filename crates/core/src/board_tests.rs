// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    one = { 1, PlayerSymbol::One },
    two = { 2, PlayerSymbol::Two },
)]
fn symbol_from_u8(raw: u8, expected: PlayerSymbol) {
    assert_eq!(PlayerSymbol::try_from(raw).unwrap(), expected);
    assert_eq!(u8::from(expected), raw);
}

#[parameterized(
    zero = { 0 },
    three = { 3 },
    max = { 255 },
)]
fn symbol_rejects_out_of_range(raw: u8) {
    assert!(matches!(PlayerSymbol::try_from(raw), Err(Error::InvalidSymbol(v)) if v == raw));
}

#[test]
fn symbol_other() {
    assert_eq!(PlayerSymbol::One.other(), PlayerSymbol::Two);
    assert_eq!(PlayerSymbol::Two.other(), PlayerSymbol::One);
}

#[test]
fn cell_rejects_unknown_value() {
    assert!(matches!(Cell::try_from(3), Err(Error::InvalidCell(3))));
    assert_eq!(Cell::try_from(0).unwrap(), Cell::Empty);
    assert_eq!(Cell::try_from(2).unwrap(), Cell::Taken(PlayerSymbol::Two));
}

#[parameterized(
    first = { 0, true },
    last = { 6, true },
    past_end = { 7, false },
)]
fn column_bounds(raw: u8, valid: bool) {
    assert_eq!(Column::try_from(raw).is_ok(), valid);
}

#[test]
fn grid_serializes_as_nested_integers() {
    let grid = Grid::empty().with_cell(5, 3, Cell::Taken(PlayerSymbol::One));
    let json = serde_json::to_value(grid).unwrap();

    assert_eq!(json.as_array().unwrap().len(), ROWS);
    assert_eq!(json[5][3], 1);
    assert_eq!(json[0][0], 0);
}

#[test]
fn grid_rejects_wrong_dimensions() {
    let short = serde_json::json!([[0, 0, 0, 0, 0, 0, 0]]);
    assert!(serde_json::from_value::<Grid>(short).is_err());

    let bad_cell = serde_json::json!([
        [0, 0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0],
        [0, 0, 0, 4, 0, 0, 0]
    ]);
    assert!(serde_json::from_value::<Grid>(bad_cell).is_err());
}

#[test]
fn grid_cell_access_and_filled() {
    let grid = Grid::empty()
        .with_cell(5, 0, Cell::Taken(PlayerSymbol::One))
        .with_cell(5, 1, Cell::Taken(PlayerSymbol::Two))
        .with_cell(9, 9, Cell::Taken(PlayerSymbol::Two));

    assert_eq!(grid.filled(), 2);
    assert_eq!(grid.cell(5, 1), Some(Cell::Taken(PlayerSymbol::Two)));
    assert_eq!(grid.cell(6, 0), None);
}

#[test]
fn grid_display() {
    let grid = Grid::empty()
        .with_cell(5, 0, Cell::Taken(PlayerSymbol::One))
        .with_cell(5, 6, Cell::Taken(PlayerSymbol::Two));
    let text = grid.to_string();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), ROWS + 1);
    assert_eq!(lines[5], "X . . . . . O");
    assert_eq!(lines[6], "1 2 3 4 5 6 7");
}

#[test]
fn player_info_wire_format() {
    let json = r#"{"username":"bob","symbol":2,"type":"bot","isOnline":true}"#;
    let info: PlayerInfo = serde_json::from_str(json).unwrap();

    assert_eq!(info.player_id, None);
    assert_eq!(info.symbol, PlayerSymbol::Two);
    assert_eq!(info.player_type, PlayerType::Bot);
    assert!(info.is_online);

    let back = serde_json::to_string(&info).unwrap();
    assert!(!back.contains("playerId"));
    assert!(back.contains(r#""type":"bot""#));
}

#[test]
fn last_move_bounds() {
    let on = LastMove { player: PlayerSymbol::One, column: 6, row: 5 };
    let off = LastMove { player: PlayerSymbol::One, column: 7, row: 0 };
    assert!(on.is_on_board());
    assert!(!off.is_on_board());
}
