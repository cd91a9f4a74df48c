// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The complete state of a game: the board plus everything needed to decide what may happen next, and the log of
//! everything that already has.
//!
//! A `GameState` is a value. The rules engine never mutates one that it has handed back to a caller; every move
//! produces a new state.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, BoardError};
use crate::core::{self, *};
use crate::event::GameEvent;

/// One played move and every event it produced, in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "move")]
    pub mov: Move,
    pub events: Vec<GameEvent>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOverReason {
    Checkmate,
}

/// Terminal marker. Once present, no further moves are accepted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    pub winner: Color,
    pub reason: GameOverReason,
}

/// The player identity seated on each side, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Players {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub black: Option<String>,
}

impl Players {
    pub fn seat(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white.as_deref(),
            Color::Black => self.black.as_deref(),
        }
    }

    pub fn assign(&mut self, color: Color, player: impl Into<String>) {
        let seat = match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };

        *seat = Some(player.into());
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Board,
    pub turn: Color,
    pub castling_rights: CastleStatus,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub players: Players,
    /// Optimistic concurrency token. Carried along by the rules engine, incremented by the game store.
    #[serde(default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_over: Option<GameOver>,
}

/// A fresh game: standard layout, White to move, all castling rights held.
pub fn initial_state() -> GameState {
    GameState {
        board: Board::standard(),
        turn: Color::White,
        castling_rights: CastleStatus::default(),
        history: Vec::new(),
        players: Players::default(),
        version: 0,
        game_over: None,
    }
}

impl GameState {
    pub fn is_over(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        self.castling_rights.contains(side.rights(color))
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }
}

//
// FEN parsing and generation.
//
// Only the first three FEN fields mean anything here: piece placement, side to move, and castling rights. There is
// no en-passant and no move clock in this game, so any trailing fields are accepted and ignored. Positions built
// this way start with empty history and version 0.
//

/// Possible errors that can arise when parsing a FEN string into a `GameState`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum FenParseError {
    #[error("unexpected char: {0}")]
    UnexpectedChar(char),
    #[error("unexpected EOF while reading")]
    UnexpectedEnd,
    #[error("invalid digit")]
    InvalidDigit,
    #[error("file does not sum to 8")]
    FileDoesNotSumToEight,
    #[error("unknown piece: {0}")]
    UnknownPiece(char),
    #[error("invalid side to move")]
    InvalidSideToMove,
    #[error("invalid castle")]
    InvalidCastle,
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl GameState {
    /// Constructs a new game state from a FEN representation of a board position.
    pub fn from_fen(fen: impl AsRef<str>) -> Result<GameState, FenParseError> {
        use std::{iter::Peekable, str::Chars};

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat(iter: &mut Stream<'_>, expected: char) -> Result<(), FenParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(FenParseError::UnexpectedChar(c)),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn peek(iter: &mut Stream<'_>) -> Result<char, FenParseError> {
            iter.peek().copied().ok_or(FenParseError::UnexpectedEnd)
        }

        fn eat_side_to_move(iter: &mut Stream<'_>) -> Result<Color, FenParseError> {
            let side = match peek(iter)? {
                'w' => Color::White,
                'b' => Color::Black,
                _ => return Err(FenParseError::InvalidSideToMove),
            };

            iter.next();
            Ok(side)
        }

        fn eat_castle_status(iter: &mut Stream<'_>) -> Result<CastleStatus, FenParseError> {
            if peek(iter)? == '-' {
                iter.next();
                return Ok(CastleStatus::NONE);
            }

            let mut status = CastleStatus::NONE;
            for _ in 0..4 {
                match iter.peek().copied() {
                    Some('K') => status |= CastleStatus::WHITE_KINGSIDE,
                    Some('k') => status |= CastleStatus::BLACK_KINGSIDE,
                    Some('Q') => status |= CastleStatus::WHITE_QUEENSIDE,
                    Some('q') => status |= CastleStatus::BLACK_QUEENSIDE,
                    Some(' ') | None => break,
                    Some(_) => return Err(FenParseError::InvalidCastle),
                }

                iter.next();
            }

            Ok(status)
        }

        let mut board = Board::new();
        let iter = &mut fen.as_ref().trim().chars().peekable();
        for rank in core::ranks().rev() {
            let mut file = 0;
            while file <= 7 {
                let c = peek(iter)?;
                // digits 1 through 8 indicate empty squares.
                if let Some(value) = c.to_digit(10) {
                    if !(1..=8).contains(&value) {
                        return Err(FenParseError::InvalidDigit);
                    }

                    file += value as i32;
                    if file > 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    iter.next();
                    continue;
                }

                // if it's not a digit, it represents a piece.
                let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece(c))?;
                let square = Square::from_coords(file, rank.as_u8() as i32)
                    .ok_or(FenParseError::FileDoesNotSumToEight)?;
                board.add_piece(square, piece)?;
                iter.next();
                file += 1;
            }

            if rank != core::RANK_1 {
                eat(iter, '/')?;
            }
        }

        eat(iter, ' ')?;
        let turn = eat_side_to_move(iter)?;
        eat(iter, ' ')?;
        let castling_rights = eat_castle_status(iter)?;
        match iter.next() {
            None | Some(' ') => {}
            Some(c) => return Err(FenParseError::UnexpectedChar(c)),
        }

        Ok(GameState {
            board,
            turn,
            castling_rights,
            history: Vec::new(),
            players: Players::default(),
            version: 0,
            game_over: None,
        })
    }

    /// Emits the placement, side-to-move and castling fields of FEN for this state.
    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for rank in core::ranks().rev() {
            let mut empty_squares = 0;
            for file in core::files() {
                let square = Square::of(rank, file);
                if let Some(piece) = self.board.piece_at(square) {
                    if empty_squares != 0 {
                        buf.push_str(&empty_squares.to_string());
                    }
                    buf.push_str(&piece.to_string());
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                buf.push_str(&empty_squares.to_string());
            }

            if rank != core::RANK_1 {
                buf.push('/');
            }
        }

        buf.push(' ');
        match self.turn {
            Color::White => buf.push('w'),
            Color::Black => buf.push('b'),
        }
        buf.push(' ');
        if self.castling_rights.is_empty() {
            buf.push('-');
        }
        if self.can_castle(Color::White, CastleSide::King) {
            buf.push('K');
        }
        if self.can_castle(Color::White, CastleSide::Queen) {
            buf.push('Q');
        }
        if self.can_castle(Color::Black, CastleSide::King) {
            buf.push('k');
        }
        if self.can_castle(Color::Black, CastleSide::Queen) {
            buf.push('q');
        }
        buf
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.board)?;
        writeln!(f)?;
        writeln!(f, "{} to move", self.turn)?;
        writeln!(f, "fen: {}", self.as_fen())?;
        if let Some(over) = self.game_over {
            writeln!(f, "game over, {} wins", over.winner)?;
        }

        Ok(())
    }
}
