// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Precomputed attack tables. Leapers (kings, knights, pawns) get a fixed set per square; sliders cast rays that stop
//! at, and include, the first occupied square.

use crate::core::*;

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A table of squares reachable from every square by a fixed set of single jumps.
struct LeaperTable {
    table: [SquareSet; 64],
}

impl LeaperTable {
    fn new(offsets: &[(i32, i32)]) -> LeaperTable {
        let mut lt = LeaperTable {
            table: [SquareSet::empty(); 64],
        };

        for sq in squares() {
            let mut board = SquareSet::empty();
            for &(dx, dy) in offsets {
                if let Some(target) = sq.offset(dx, dy) {
                    board.insert(target);
                }
            }

            lt.table[sq.0 as usize] = board;
        }

        lt
    }

    fn attacks(&self, sq: Square) -> SquareSet {
        self.table[sq.0 as usize]
    }
}

struct PawnTable {
    table: [[SquareSet; 2]; 64],
}

impl PawnTable {
    fn new() -> PawnTable {
        let mut pt = PawnTable {
            table: [[SquareSet::empty(); 2]; 64],
        };

        for sq in squares() {
            for color in colors() {
                // Pawns only ever attack the two forward diagonals. A pawn on its last rank has none.
                let mut board = SquareSet::empty();
                for dx in [-1, 1] {
                    if let Some(target) = sq.offset(dx, color.forward()) {
                        board.insert(target);
                    }
                }

                pt.table[sq.0 as usize][color as usize] = board;
            }
        }

        pt
    }

    fn attacks(&self, sq: Square, color: Color) -> SquareSet {
        self.table[sq.0 as usize][color as usize]
    }
}

struct RayTable {
    table: [[SquareSet; 8]; 65],
}

impl RayTable {
    fn new() -> RayTable {
        let mut rt = RayTable {
            table: [[SquareSet::empty(); 8]; 65],
        };

        for sq in squares() {
            let mut populate_dir = |dir: Direction, edge: SquareSet| {
                let mut entry = SquareSet::empty();
                if edge.contains(sq) {
                    rt.table[sq.0 as usize][dir as usize] = entry;
                    return;
                }

                let mut cursor = sq;
                loop {
                    cursor = cursor.towards(dir);
                    entry.insert(cursor);
                    if edge.contains(cursor) {
                        break;
                    }
                }
                rt.table[sq.0 as usize][dir as usize] = entry;
            };

            populate_dir(Direction::North, SS_RANK_8);
            populate_dir(Direction::NorthEast, SS_RANK_8.or(SS_FILE_H));
            populate_dir(Direction::East, SS_FILE_H);
            populate_dir(Direction::SouthEast, SS_RANK_1.or(SS_FILE_H));
            populate_dir(Direction::South, SS_RANK_1);
            populate_dir(Direction::SouthWest, SS_RANK_1.or(SS_FILE_A));
            populate_dir(Direction::West, SS_FILE_A);
            populate_dir(Direction::NorthWest, SS_RANK_8.or(SS_FILE_A));
        }
        rt
    }

    // Index 64 is the empty ray, used when a ray has no blocker.
    fn attacks(&self, sq: usize, dir: Direction) -> SquareSet {
        self.table[sq][dir as usize]
    }
}

lazy_static::lazy_static! {
    static ref KING_TABLE: LeaperTable = LeaperTable::new(&KING_OFFSETS);
    static ref KNIGHT_TABLE: LeaperTable = LeaperTable::new(&KNIGHT_OFFSETS);
    static ref PAWN_TABLE: PawnTable = PawnTable::new();
    static ref RAY_TABLE: RayTable = RayTable::new();
}

fn positive_ray_attacks(sq: Square, occupancy: SquareSet, dir: Direction) -> SquareSet {
    debug_assert!(dir.as_vector() > 0);
    let attacks = RAY_TABLE.attacks(sq.0 as usize, dir);
    let blocker = attacks.and(occupancy).bits();
    let blocking_square = blocker.trailing_zeros() as usize;
    let blocking_ray = RAY_TABLE.attacks(blocking_square, dir);
    attacks.xor(blocking_ray)
}

fn negative_ray_attacks(sq: Square, occupancy: SquareSet, dir: Direction) -> SquareSet {
    debug_assert!(dir.as_vector() < 0);
    let attacks = RAY_TABLE.attacks(sq.0 as usize, dir);
    let blocker = attacks.and(occupancy).bits();
    let blocking_square = (64 - blocker.leading_zeros()).checked_sub(1).unwrap_or(64) as usize;
    let blocking_ray = RAY_TABLE.attacks(blocking_square, dir);
    attacks.xor(blocking_ray)
}

pub fn pawn_attacks(sq: Square, color: Color) -> SquareSet {
    PAWN_TABLE.attacks(sq, color)
}

pub fn knight_attacks(sq: Square) -> SquareSet {
    KNIGHT_TABLE.attacks(sq)
}

pub fn king_attacks(sq: Square) -> SquareSet {
    KING_TABLE.attacks(sq)
}

pub fn bishop_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    positive_ray_attacks(sq, occupancy, Direction::NorthWest)
        | negative_ray_attacks(sq, occupancy, Direction::SouthEast)
        | positive_ray_attacks(sq, occupancy, Direction::NorthEast)
        | negative_ray_attacks(sq, occupancy, Direction::SouthWest)
}

pub fn rook_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    positive_ray_attacks(sq, occupancy, Direction::North)
        | negative_ray_attacks(sq, occupancy, Direction::South)
        | positive_ray_attacks(sq, occupancy, Direction::East)
        | negative_ray_attacks(sq, occupancy, Direction::West)
}

pub fn queen_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    bishop_attacks(sq, occupancy) | rook_attacks(sq, occupancy)
}

/// The set of squares a piece of the given kind and color standing on `sq` attacks, given the board's occupancy.
pub fn attacks(kind: PieceKind, color: Color, sq: Square, occupancy: SquareSet) -> SquareSet {
    match kind {
        PieceKind::Pawn => pawn_attacks(sq, color),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupancy),
        PieceKind::Rook => rook_attacks(sq, occupancy),
        PieceKind::Queen => queen_attacks(sq, occupancy),
        PieceKind::King => king_attacks(sq),
    }
}
