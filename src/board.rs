// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::core::{self, *};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("square {0} is already occupied")]
    Occupied(Square),
}

/// The placement of pieces on the board: a partial map from squares to pieces, stored as one SquareSet per piece and
/// color combination. At most one piece stands on any square.
///
/// Boards are plain values. Cloning one is how the rules engine simulates a move without touching the caller's board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// SquareSets for each piece and color combination (6 pieces, 2 colors = 12 sets).
    sets_by_piece: [SquareSet; 12],
    /// Squaresets for each color.
    sets_by_color: [SquareSet; 2],
}

impl Board {
    /// Creates a board with nothing on it.
    pub fn new() -> Board {
        Board {
            sets_by_piece: [SquareSet::empty(); 12],
            sets_by_color: [SquareSet::empty(); 2],
        }
    }

    /// Creates a board with the standard starting layout.
    pub fn standard() -> Board {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::new();
        for (file, &kind) in core::files().zip(BACK_RANK.iter()) {
            for color in core::colors() {
                board.put(Square::of(color.back_rank(), file), Piece::new(color, kind));
                board.put(Square::of(color.pawn_rank(), file), Piece::new(color, PieceKind::Pawn));
            }
        }

        board
    }

    pub fn pieces(&self, color: Color) -> SquareSet {
        self.sets_by_color[color as usize]
    }

    pub fn pieces_of_kind(&self, color: Color, kind: PieceKind) -> SquareSet {
        let offset = match color {
            Color::White => 0,
            Color::Black => 6,
        };
        self.sets_by_piece[offset + kind as usize]
    }

    pub fn occupancy(&self) -> SquareSet {
        self.pieces(Color::White) | self.pieces(Color::Black)
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.occupancy().contains(square)
    }

    /// Finds the king of the given color. Boards built by hand may have no king at all, which is not an error. If
    /// there is more than one, the lowest square wins.
    pub fn king(&self, color: Color) -> Option<Square> {
        self.pieces_of_kind(color, PieceKind::King).into_iter().next()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let (board_offset, color) = if self.sets_by_color[Color::White as usize].contains(square) {
            (0, Color::White)
        } else if self.sets_by_color[Color::Black as usize].contains(square) {
            (6, Color::Black)
        } else {
            return None;
        };

        for kind in core::piece_kinds() {
            let board = self.sets_by_piece[kind as usize + board_offset];
            if board.contains(square) {
                return Some(Piece { kind, color });
            }
        }

        // If we get here, we failed to update a bitboard somewhere.
        unreachable!()
    }

    /// Places a piece on an empty square.
    pub fn add_piece(&mut self, square: Square, piece: Piece) -> Result<(), BoardError> {
        if self.is_occupied(square) {
            return Err(BoardError::Occupied(square));
        }

        self.put(square, piece);
        Ok(())
    }

    /// Takes the piece off the given square, returning it.
    pub fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        let existing_piece = self.piece_at(square)?;
        self.sets_by_color[existing_piece.color as usize].remove(square);
        let offset = if existing_piece.color == Color::White {
            0
        } else {
            6
        };
        self.sets_by_piece[existing_piece.kind as usize + offset].remove(square);
        Some(existing_piece)
    }

    /// Places a piece, replacing whatever stood on the square.
    fn put(&mut self, square: Square, piece: Piece) {
        self.remove_piece(square);
        self.sets_by_color[piece.color as usize].insert(square);
        let offset = if piece.color == Color::White { 0 } else { 6 };
        self.sets_by_piece[piece.kind as usize + offset].insert(square);
    }

    /// Iterates over every occupied square and its piece, from A1 to H8.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupancy()
            .into_iter()
            .filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }
}

//
// Attack detection.
//
// None of these care whose turn it is. A piece attacks a square if it could capture on it were an enemy standing
// there: pawns only on their forward diagonals, sliders only when every square strictly in between is empty.
//

impl Board {
    /// Whether `piece`, standing on `from`, attacks `target`.
    pub fn pseudo_attacks_square(&self, from: Square, piece: Piece, target: Square) -> bool {
        core::attacks(piece.kind, piece.color, from, self.occupancy()).contains(target)
    }

    /// All squares holding a piece of color `by` that attacks `target`.
    pub fn squares_attacking(&self, by: Color, target: Square) -> SquareSet {
        let occupancy = self.occupancy();
        let queens = self.pieces_of_kind(by, PieceKind::Queen);
        let diagonal = self.pieces_of_kind(by, PieceKind::Bishop) | queens;
        let orthogonal = self.pieces_of_kind(by, PieceKind::Rook) | queens;

        // Attacks are symmetric for everything except pawns, so look outward from the target as if it were the
        // attacking piece. A pawn of `by` attacks the target exactly when a pawn of the other color on the target
        // would attack the pawn.
        bishop_attacks(target, occupancy).and(diagonal)
            | rook_attacks(target, occupancy).and(orthogonal)
            | knight_attacks(target).and(self.pieces_of_kind(by, PieceKind::Knight))
            | king_attacks(target).and(self.pieces_of_kind(by, PieceKind::King))
            | pawn_attacks(target, by.toggle()).and(self.pieces_of_kind(by, PieceKind::Pawn))
    }

    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        !self.squares_attacking(by, square).is_empty()
    }

    /// Whether the king of `us` is attacked. A board without that king is never in check.
    pub fn is_check(&self, us: Color) -> bool {
        if let Some(king) = self.king(us) {
            self.is_square_attacked(king, us.toggle())
        } else {
            false
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in core::ranks().rev() {
            for file in core::files() {
                let sq = Square::of(rank, file);
                if let Some(piece) = self.piece_at(sq) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in core::files() {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in core::files() {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let placement = BTreeMap::<Square, Piece>::deserialize(deserializer)?;
        let mut board = Board::new();
        for (square, piece) in placement {
            board.put(square, piece);
        }

        Ok(board)
    }
}
