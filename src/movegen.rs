// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pseudo-legal move generation. Nothing here looks at whether a move leaves the mover's king attacked; that is the
//! job of [`crate::rules`].

use crate::board::Board;
use crate::core::*;
use crate::state::GameState;

fn generate_pawn_moves(us: Color, from: Square, board: &Board, moves: &mut Vec<Move>) {
    let occupancy = board.occupancy();

    // Pushes. A pawn already on its last rank has nowhere to go.
    if let Some(single) = from.offset(0, us.forward()) {
        if !occupancy.contains(single) {
            moves.push(Move::new(from, single));
            if from.rank() == us.pawn_rank() {
                if let Some(double) = single.offset(0, us.forward()) {
                    if !occupancy.contains(double) {
                        moves.push(Move::new(from, double));
                    }
                }
            }
        }
    }

    // Diagonals are only ever captures.
    for target in pawn_attacks(from, us).and(board.pieces(us.toggle())) {
        moves.push(Move::new(from, target));
    }
}

fn generate_piece_moves(piece: Piece, from: Square, board: &Board, moves: &mut Vec<Move>) {
    debug_assert!(piece.kind != PieceKind::Pawn, "pawns have their own movegen routine");
    let targets = attacks(piece.kind, piece.color, from, board.occupancy()).and(!board.pieces(piece.color));
    for target in targets {
        moves.push(Move::new(from, target));
    }
}

/// Castling hops for a king on its home square. Offered when the side's right is held, a rook of the king's color
/// is on its home square, and nothing stands between them. Attacks are not considered here.
fn generate_castle_moves(us: Color, from: Square, state: &GameState, moves: &mut Vec<Move>) {
    if from != Square::of(us.back_rank(), FILE_E) {
        return;
    }

    let board = &state.board;
    let our_rook = Piece::new(us, PieceKind::Rook);
    for side in [CastleSide::King, CastleSide::Queen] {
        if !state.can_castle(us, side) {
            continue;
        }

        if board.piece_at(side.rook_home(us)) != Some(our_rook) {
            continue;
        }

        if !side.between(us).and(board.occupancy()).is_empty() {
            continue;
        }

        moves.push(Move::new(from, side.king_destination(us)));
    }
}

/// Pushes every pseudo-legal move of the piece standing on `from` onto `moves`. An empty square generates nothing.
pub fn generate_candidates(state: &GameState, from: Square, moves: &mut Vec<Move>) {
    let piece = match state.board.piece_at(from) {
        Some(piece) => piece,
        None => return,
    };

    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(piece.color, from, &state.board, moves),
        PieceKind::King => {
            generate_piece_moves(piece, from, &state.board, moves);
            generate_castle_moves(piece.color, from, state, moves);
        }
        _ => generate_piece_moves(piece, from, &state.board, moves),
    }
}

/// Pushes every pseudo-legal move available to `us` onto `moves`, regardless of whose turn it is.
pub fn generate_moves(us: Color, state: &GameState, moves: &mut Vec<Move>) {
    for from in state.board.pieces(us) {
        generate_candidates(state, from, moves);
    }
}

/// The pseudo-legal moves of the piece standing on `from`.
pub fn candidate_moves(state: &GameState, from: Square) -> Vec<Move> {
    let mut moves = Vec::new();
    generate_candidates(state, from, &mut moves);
    moves
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::candidate_moves;
    use crate::core::*;
    use crate::state::GameState;

    fn destinations(fen: &'static str, from: Square) -> HashSet<Square> {
        let state = GameState::from_fen(fen).unwrap();
        candidate_moves(&state, from)
            .into_iter()
            .map(|mov| {
                assert_eq!(from, mov.from);
                mov.to
            })
            .collect()
    }

    fn assert_destinations(fen: &'static str, from: Square, expected: &[Square]) {
        let actual = destinations(fen, from);
        let expected: HashSet<_> = expected.iter().copied().collect();
        if actual != expected {
            println!("{}", GameState::from_fen(fen).unwrap());
            panic!("from {}: expected {:?}, got {:?}", from, expected, actual);
        }
    }

    #[test]
    fn empty_square() {
        assert!(destinations("8/8/8/8/8/8/8/8 w -", E4).is_empty());
    }

    mod pawns {
        use super::*;

        #[test]
        fn double_step_from_start() {
            assert_destinations("8/8/8/8/8/8/4P3/8 w -", E2, &[E3, E4]);
            assert_destinations("8/4p3/8/8/8/8/8/8 b -", E7, &[E6, E5]);
        }

        #[test]
        fn single_step_elsewhere() {
            assert_destinations("8/8/8/8/4P3/8/8/8 w -", E4, &[E5]);
        }

        #[test]
        fn double_step_needs_both_squares() {
            assert_destinations("8/8/8/8/4p3/8/4P3/8 w -", E2, &[E3]);
            assert_destinations("8/8/8/8/8/4n3/4P3/8 w -", E2, &[]);
        }

        #[test]
        fn diagonals_only_capture_enemies() {
            assert_destinations("8/8/8/3p1P2/4P3/8/8/8 w -", E4, &[E5, D5]);
        }

        #[test]
        fn forward_capture_never_offered() {
            assert_destinations("8/8/8/4p3/4P3/8/8/8 w -", E4, &[]);
        }

        #[test]
        fn last_rank_is_stuck() {
            assert_destinations("4P3/8/8/8/8/8/8/8 w -", E8, &[]);
        }
    }

    mod pieces {
        use super::*;

        #[test]
        fn knight_in_corner() {
            assert_destinations("8/8/8/8/8/8/2P5/N7 w -", A1, &[B3]);
        }

        #[test]
        fn rook_stops_at_first_piece() {
            assert_destinations(
                "8/8/8/p7/8/8/P7/RN6 w -",
                A1,
                &[],
            );
            assert_destinations(
                "8/8/8/p7/8/8/8/R1N5 w -",
                A1,
                &[A2, A3, A4, A5, B1],
            );
        }

        #[test]
        fn bishop_diagonals() {
            assert_destinations(
                "8/8/8/8/8/2p5/1B6/8 w -",
                B2,
                &[A1, C1, A3, C3],
            );
        }

        #[test]
        fn queen_captures_enemy_king_square_is_still_a_candidate() {
            let dests = destinations("k7/8/8/8/8/8/8/Q7 w -", A1);
            assert!(dests.contains(&A8));
            assert!(dests.contains(&H8));
        }

        #[test]
        fn king_steps() {
            assert_destinations("8/8/8/8/8/8/3p4/4K3 w -", E1, &[D1, F1, D2, E2, F2]);
        }
    }

    mod castling {
        use super::*;

        #[test]
        fn both_sides_offered() {
            let dests = destinations("8/8/8/8/8/8/8/R3K2R w KQ", E1);
            assert!(dests.contains(&G1));
            assert!(dests.contains(&C1));
        }

        #[test]
        fn black_both_sides_offered() {
            let dests = destinations("r3k2r/8/8/8/8/8/8/8 b kq", E8);
            assert!(dests.contains(&G8));
            assert!(dests.contains(&C8));
        }

        #[test]
        fn needs_right() {
            let dests = destinations("8/8/8/8/8/8/8/R3K2R w Q", E1);
            assert!(!dests.contains(&G1));
            assert!(dests.contains(&C1));
        }

        #[test]
        fn needs_empty_path() {
            let dests = destinations("8/8/8/8/8/8/8/RN2K1NR w KQ", E1);
            assert!(!dests.contains(&G1));
            assert!(!dests.contains(&C1));
        }

        #[test]
        fn b_file_blocks_queenside() {
            let dests = destinations("8/8/8/8/8/8/8/RN2K3 w Q", E1);
            assert!(!dests.contains(&C1));
        }

        #[test]
        fn needs_our_rook() {
            let dests = destinations("8/8/8/8/8/8/8/r3K2B w KQ", E1);
            assert!(!dests.contains(&G1));
            assert!(!dests.contains(&C1));

            let dests = destinations("8/8/8/8/8/8/8/4K3 w KQ", E1);
            assert!(!dests.contains(&G1));
            assert!(!dests.contains(&C1));
        }

        #[test]
        fn only_from_home() {
            let dests = destinations("8/8/8/8/8/8/8/R2K3R w KQ", D1);
            assert!(!dests.contains(&B1));
            assert!(!dests.contains(&F1));
        }
    }
}
