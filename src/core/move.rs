// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::*;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("move must be two squares, got {0:?}")]
    Malformed(String),
    #[error(transparent)]
    Square(#[from] SquareParseError),
}

/// A move, as requested by a player: a source square and a destination square.
///
/// Unlike a conventional engine's move there are no flag bits here. Captures, castles, and slams are all derived from
/// the board the move is played on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Move {
        Move { from, to }
    }

    /// Returns the castling side if this move is the two-file hop of a king standing on its home square. Callers
    /// still need to check that it is actually a king on `from`.
    pub fn castle_side(self) -> Option<CastleSide> {
        let home = match self.from {
            E1 => RANK_1,
            E8 => RANK_8,
            _ => return None,
        };

        if self.to == Square::of(home, FILE_G) {
            Some(CastleSide::King)
        } else if self.to == Square::of(home, FILE_C) {
            Some(CastleSide::Queen)
        } else {
            None
        }
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    /// Parses `e2e4`, `E2E4`, or `e2-e4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.trim().chars().filter(|&c| c != '-').collect();
        if compact.len() != 4 || !compact.is_ascii() {
            return Err(MoveParseError::Malformed(s.to_owned()));
        }

        let from = compact[0..2].parse()?;
        let to = compact[2..4].parse()?;
        Ok(Move { from, to })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Which rook a castling king travels towards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    /// The square the rook starts on.
    pub fn rook_home(self, color: Color) -> Square {
        match self {
            CastleSide::King => Square::of(color.back_rank(), FILE_H),
            CastleSide::Queen => Square::of(color.back_rank(), FILE_A),
        }
    }

    /// Where the castling king lands, two files from home.
    pub fn king_destination(self, color: Color) -> Square {
        match self {
            CastleSide::King => Square::of(color.back_rank(), FILE_G),
            CastleSide::Queen => Square::of(color.back_rank(), FILE_C),
        }
    }

    /// The square the king crosses, which is also where the rook lands.
    pub fn king_passes(self, color: Color) -> Square {
        match self {
            CastleSide::King => Square::of(color.back_rank(), FILE_F),
            CastleSide::Queen => Square::of(color.back_rank(), FILE_D),
        }
    }

    /// Every square strictly between the king and the rook.
    pub fn between(self, color: Color) -> SquareSet {
        let rank = color.back_rank();
        match self {
            CastleSide::King => SquareSet::of(&[Square::of(rank, FILE_F), Square::of(rank, FILE_G)]),
            CastleSide::Queen => SquareSet::of(&[
                Square::of(rank, FILE_B),
                Square::of(rank, FILE_C),
                Square::of(rank, FILE_D),
            ]),
        }
    }

    pub fn rights(self, color: Color) -> CastleStatus {
        match self {
            CastleSide::King => CastleStatus::kingside(color),
            CastleSide::Queen => CastleStatus::queenside(color),
        }
    }
}
