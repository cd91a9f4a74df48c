// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move execution and slam resolution.
//!
//! A capture does not remove the captured piece. The attacker takes its square and the target is pushed onward along
//! the attack's line: as far as the attacker itself moved for sliders and pawns, one square for a king, three for a
//! knight. A target that runs into another piece or off the board is destroyed. A pawn that comes to rest on its
//! promotion rank becomes a queen.

use thiserror::Error;

use crate::board::{Board, BoardError};
use crate::core::{self, *};
use crate::event::{DestroyReason, DestroyedEvent, GameEvent, MovedEvent, PromotionEvent, SlammedEvent};
use crate::state::GameState;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExecuteError {
    #[error("no piece on {0}")]
    EmptySource(Square),
    #[error("the king on {0} cannot be slammed")]
    KingTarget(Square),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// The result of executing a move: the state after it, with the turn passed to the opponent, and what happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Execution {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

/// The direction and length of the push a capture by `attacker` along `mov` imparts on its target.
fn push_vector(attacker: PieceKind, mov: Move) -> ((i32, i32), u8) {
    let (from_x, from_y) = mov.from.coords();
    let (to_x, to_y) = mov.to.coords();
    let (dx, dy) = (to_x - from_x, to_y - from_y);
    match attacker {
        PieceKind::King => ((dx.signum(), dy.signum()), 1),
        // Knights push along the long leg of their jump.
        PieceKind::Knight => {
            let dir = if dx.abs() == 2 {
                (dx.signum(), 0)
            } else {
                (0, dy.signum())
            };
            (dir, 3)
        }
        _ => ((dx.signum(), dy.signum()), dx.abs().max(dy.abs()) as u8),
    }
}

/// Pushes `target` from `start` and settles it: destroyed, relocated, or promoted.
fn resolve_push(
    board: &mut Board,
    target: Piece,
    start: Square,
    (dx, dy): (i32, i32),
    distance: u8,
    events: &mut Vec<GameEvent>,
) -> Result<(), BoardError> {
    let mut cursor = start;
    for _ in 0..distance {
        match cursor.offset(dx, dy) {
            None => {
                tracing::trace!(piece = %target, at = %cursor, "slammed off the board");
                events.push(
                    DestroyedEvent {
                        piece: target,
                        at: cursor,
                        reason: DestroyReason::Offboard,
                    }
                    .into(),
                );
                return Ok(());
            }
            Some(next) if board.is_occupied(next) => {
                tracing::trace!(piece = %target, at = %next, "slammed into a piece");
                events.push(
                    DestroyedEvent {
                        piece: target,
                        at: next,
                        reason: DestroyReason::Collision,
                    }
                    .into(),
                );
                return Ok(());
            }
            Some(next) => cursor = next,
        }
    }

    if target.kind == PieceKind::Pawn && cursor.rank() == target.color.promotion_rank() {
        let queen = Piece::new(target.color, PieceKind::Queen);
        board.add_piece(cursor, queen)?;
        events.push(
            PromotionEvent {
                at: cursor,
                from: target.kind,
                to: queen.kind,
            }
            .into(),
        );
    } else {
        board.add_piece(cursor, target)?;
    }

    Ok(())
}

/// Clears castling rights after `piece` plays `mov`. A king moving loses both of its own rights; any move from or
/// onto a rook home square loses that side's right, whatever stood there.
pub fn update_castling_rights(rights: CastleStatus, piece: Piece, mov: Move) -> CastleStatus {
    let mut rights = rights;
    if piece.kind == PieceKind::King {
        rights.remove(CastleStatus::both(piece.color));
    }

    for color in core::colors() {
        for side in [CastleSide::King, CastleSide::Queen] {
            let home = side.rook_home(color);
            if mov.from == home || mov.to == home {
                rights.remove(side.rights(color));
            }
        }
    }

    rights
}

/// Plays `mov` on a copy of `state` without checking that it is legal. The input state is never modified.
///
/// The returned state has the turn passed to the opponent and the input's history, players and version copied
/// unchanged. Recording the move in history is up to the caller.
pub fn execute_unchecked(state: &GameState, mov: Move) -> Result<Execution, ExecuteError> {
    let mut board = state.board.clone();
    let mut events = Vec::new();
    let piece = board
        .remove_piece(mov.from)
        .ok_or(ExecuteError::EmptySource(mov.from))?;
    let captured = board.remove_piece(mov.to);
    if let Some(target) = captured {
        if target.kind == PieceKind::King {
            return Err(ExecuteError::KingTarget(mov.to));
        }
    }

    events.push(
        MovedEvent {
            piece,
            from: mov.from,
            to: mov.to,
        }
        .into(),
    );
    board.add_piece(mov.to, piece)?;

    // The rook comes along on a castling hop.
    if piece.kind == PieceKind::King && mov.from.rank() == piece.color.back_rank() {
        if let Some(side) = mov.castle_side() {
            if let Some(rook) = board.remove_piece(side.rook_home(piece.color)) {
                board.add_piece(side.king_passes(piece.color), rook)?;
            }
        }
    }

    if let Some(target) = captured {
        let (dir, distance) = push_vector(piece.kind, mov);
        events.push(
            SlammedEvent {
                attacker: piece,
                target,
                from: mov.to,
                to: mov.to,
                distance,
            }
            .into(),
        );
        resolve_push(&mut board, target, mov.to, dir, distance, &mut events)?;
    }

    let next = GameState {
        board,
        turn: state.turn.toggle(),
        castling_rights: update_castling_rights(state.castling_rights, piece, mov),
        history: state.history.clone(),
        players: state.players.clone(),
        version: state.version,
        game_over: state.game_over,
    };

    Ok(Execution {
        state: next,
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn execute(fen: &'static str, from: Square, to: Square) -> Execution {
        let state = GameState::from_fen(fen).unwrap();
        execute_unchecked(&state, Move::new(from, to)).unwrap()
    }

    fn piece(c: char) -> Piece {
        Piece::try_from(c).unwrap()
    }

    fn destroyed(events: &[GameEvent]) -> Option<DestroyedEvent> {
        events.iter().find_map(|event| match event {
            GameEvent::Destroyed(ev) => Some(*ev),
            _ => None,
        })
    }

    mod slams {
        use super::*;

        #[test]
        fn rook_pushes_off_board() {
            let exec = execute("4k3/8/8/p7/8/8/8/R3K3 w -", A1, A5);
            assert_eq!(Some(piece('R')), exec.state.board.piece_at(A5));
            assert_eq!(
                vec![
                    GameEvent::from(MovedEvent {
                        piece: piece('R'),
                        from: A1,
                        to: A5,
                    }),
                    GameEvent::from(SlammedEvent {
                        attacker: piece('R'),
                        target: piece('p'),
                        from: A5,
                        to: A5,
                        distance: 4,
                    }),
                    GameEvent::from(DestroyedEvent {
                        piece: piece('p'),
                        at: A8,
                        reason: DestroyReason::Offboard,
                    }),
                ],
                exec.events
            );
            assert!(exec
                .state
                .board
                .pieces_of_kind(Color::Black, PieceKind::Pawn)
                .is_empty());
        }

        #[test]
        fn off_board_on_first_step() {
            let exec = execute("4k3/8/8/8/8/8/8/p6R w -", H1, A1);
            assert_eq!(
                Some(DestroyedEvent {
                    piece: piece('p'),
                    at: A1,
                    reason: DestroyReason::Offboard,
                }),
                destroyed(&exec.events)
            );
        }

        #[test]
        fn short_push_survives() {
            let exec = execute("4k3/8/8/8/8/8/p7/R3K3 w -", A1, A2);
            assert_eq!(Some(piece('p')), exec.state.board.piece_at(A3));
            assert_eq!(Some(piece('R')), exec.state.board.piece_at(A2));
            assert!(destroyed(&exec.events).is_none());
        }

        #[test]
        fn collision_destroys_target_only() {
            let exec = execute("4k3/8/8/8/8/B7/p7/R3K3 w -", A1, A2);
            assert_eq!(Some(piece('B')), exec.state.board.piece_at(A3));
            assert_eq!(
                Some(DestroyedEvent {
                    piece: piece('p'),
                    at: A3,
                    reason: DestroyReason::Collision,
                }),
                destroyed(&exec.events)
            );
            assert!(exec
                .state
                .board
                .pieces_of_kind(Color::Black, PieceKind::Pawn)
                .is_empty());
        }

        #[test]
        fn distance_matches_slide() {
            let exec = execute("4k3/8/8/8/8/8/8/R1p1K3 w -", A1, C1);
            // Two squares east of C1 is E1, which is occupied.
            assert_eq!(
                Some(DestroyedEvent {
                    piece: piece('p'),
                    at: E1,
                    reason: DestroyReason::Collision,
                }),
                destroyed(&exec.events)
            );

            let exec = execute("4k3/8/8/8/8/8/R1p5/7K w -", A2, C2);
            assert_eq!(Some(piece('p')), exec.state.board.piece_at(E2));
            assert!(exec.state.board.piece_at(D2).is_none());
        }

        #[test]
        fn bishop_pushes_diagonally() {
            // The push from F7 runs through G8 and then off the board.
            let exec = execute("4k3/5p2/8/3B4/8/8/8/4K3 w -", D5, F7);
            assert_eq!(
                Some(DestroyedEvent {
                    piece: piece('p'),
                    at: G8,
                    reason: DestroyReason::Offboard,
                }),
                destroyed(&exec.events)
            );

            let exec = execute("4k3/8/8/8/3p4/8/1B6/4K3 w -", B2, D4);
            assert_eq!(Some(piece('p')), exec.state.board.piece_at(F6));
        }

        #[test]
        fn pawn_pushes_one_diagonal() {
            let exec = execute("4k3/8/8/3n4/4P3/8/8/4K3 w -", E4, D5);
            assert_eq!(Some(piece('n')), exec.state.board.piece_at(C6));
            assert_eq!(Some(piece('P')), exec.state.board.piece_at(D5));
        }

        #[test]
        fn king_pushes_one() {
            let exec = execute("4k3/8/8/8/8/8/3p4/4K3 w -", E1, D2);
            assert_eq!(Some(piece('p')), exec.state.board.piece_at(C3));
            assert!(exec.events.iter().any(|ev| matches!(
                ev,
                GameEvent::Slammed(SlammedEvent { distance: 1, .. })
            )));
        }

        #[test]
        fn knight_pushes_along_long_leg() {
            // B1 to C3 is (+1, +2): the push runs three squares north.
            let exec = execute("4k3/8/8/8/8/2p5/8/1N2K3 w -", B1, C3);
            assert_eq!(Some(piece('N')), exec.state.board.piece_at(C3));
            assert_eq!(Some(piece('p')), exec.state.board.piece_at(C6));
            assert!(exec.state.board.piece_at(F3).is_none());

            // B1 to D2 is (+2, +1): the push runs three squares east.
            let exec = execute("4k3/8/8/8/8/8/3p4/1N2K3 w -", B1, D2);
            assert_eq!(Some(piece('p')), exec.state.board.piece_at(G2));

            // G8 to F6 is (-1, -2): three squares south.
            let exec = execute("4k1n1/8/5P2/8/8/8/8/4K3 b -", G8, F6);
            assert_eq!(Some(piece('P')), exec.state.board.piece_at(F3));
        }

        #[test]
        fn king_cannot_be_slammed() {
            let state = GameState::from_fen("8/8/8/8/k7/8/8/R3K3 w -").unwrap();
            assert_eq!(
                Err(ExecuteError::KingTarget(A4)),
                execute_unchecked(&state, Move::new(A1, A4))
            );
        }

        #[test]
        fn empty_source() {
            let state = GameState::from_fen("4k3/8/8/8/8/8/8/4K3 w -").unwrap();
            assert_eq!(
                Err(ExecuteError::EmptySource(D4)),
                execute_unchecked(&state, Move::new(D4, D5))
            );
        }
    }

    mod promotion {
        use super::*;

        #[test]
        fn black_pawn_promotes_on_first_rank() {
            let exec = execute("4k3/8/8/3R4/8/3p4/8/4K3 w -", D5, D3);
            assert_eq!(Some(piece('q')), exec.state.board.piece_at(D1));
            assert!(exec.events.contains(&GameEvent::from(PromotionEvent {
                at: D1,
                from: PieceKind::Pawn,
                to: PieceKind::Queen,
            })));
        }

        #[test]
        fn white_pawn_promotes_on_eighth_rank() {
            let exec = execute("4k3/8/P7/8/r7/8/8/4K3 b -", A4, A6);
            assert_eq!(Some(piece('Q')), exec.state.board.piece_at(A8));
            assert!(exec.events.contains(&GameEvent::from(PromotionEvent {
                at: A8,
                from: PieceKind::Pawn,
                to: PieceKind::Queen,
            })));
        }

        #[test]
        fn other_ranks_do_not_promote() {
            let exec = execute("4k3/8/8/8/3R4/3p4/8/4K3 w -", D4, D3);
            assert_eq!(Some(piece('p')), exec.state.board.piece_at(D2));

            // White pawns only promote on the eighth rank.
            let exec = execute("4k3/8/8/8/8/3r4/3P4/4K3 b -", D3, D2);
            assert_eq!(Some(piece('P')), exec.state.board.piece_at(D1));
            assert!(!exec
                .events
                .iter()
                .any(|ev| matches!(ev, GameEvent::Promotion(_))));
        }

        #[test]
        fn own_move_to_last_rank_does_not_promote() {
            let exec = execute("4k3/P7/8/8/8/8/8/4K3 w -", A7, A8);
            assert_eq!(Some(piece('P')), exec.state.board.piece_at(A8));
            assert_eq!(1, exec.events.len());
        }
    }

    mod castling {
        use super::*;

        #[test]
        fn rook_comes_along() {
            let exec = execute("4k3/8/8/8/8/8/8/R3K2R w KQ", E1, G1);
            assert_eq!(Some(piece('K')), exec.state.board.piece_at(G1));
            assert_eq!(Some(piece('R')), exec.state.board.piece_at(F1));
            assert!(exec.state.board.piece_at(H1).is_none());
            assert!(!exec.state.castling_rights.intersects(CastleStatus::WHITE));

            let exec = execute("r3k3/8/8/8/8/8/8/4K3 b q", E8, C8);
            assert_eq!(Some(piece('k')), exec.state.board.piece_at(C8));
            assert_eq!(Some(piece('r')), exec.state.board.piece_at(D8));
            assert!(exec.state.board.piece_at(A8).is_none());
        }

        #[test]
        fn rook_move_clears_its_side() {
            let exec = execute("r3k2r/8/8/8/8/8/8/R3K2R w KQkq", H1, H5);
            assert_eq!(
                CastleStatus::WHITE_QUEENSIDE | CastleStatus::BLACK,
                exec.state.castling_rights
            );
        }

        #[test]
        fn capture_on_rook_home_clears_that_side_only() {
            let exec = execute("r3k2r/8/8/8/3b4/8/8/R3K2R b KQkq", D4, A1);
            assert_eq!(
                CastleStatus::WHITE_KINGSIDE | CastleStatus::BLACK,
                exec.state.castling_rights
            );

            let exec = execute("r3k2r/8/8/4B3/8/8/8/R3K2R w KQkq", E5, H8);
            assert_eq!(
                CastleStatus::WHITE | CastleStatus::BLACK_QUEENSIDE,
                exec.state.castling_rights
            );
        }

        #[test]
        fn touching_rook_home_clears_whatever_stands_there() {
            let exec = execute("4k3/8/8/8/3b4/8/8/N3K3 b KQkq", D4, A1);
            assert!(!exec.state.castling_rights.contains(CastleStatus::WHITE_QUEENSIDE));
            assert!(exec.state.castling_rights.contains(CastleStatus::WHITE_KINGSIDE));
        }
    }

    #[test]
    fn state_bookkeeping() {
        let mut state = GameState::from_fen("4k3/8/8/8/8/8/4P3/4K3 w -").unwrap();
        state.version = 7;
        state.players.assign(Color::White, "alice");
        let exec = execute_unchecked(&state, Move::new(E2, E4)).unwrap();
        assert_eq!(Color::Black, exec.state.turn);
        assert_eq!(7, exec.state.version);
        assert_eq!(Some("alice"), exec.state.players.seat(Color::White));
        assert!(exec.state.history.is_empty());
        assert_eq!(Some(piece('P')), state.board.piece_at(E2));
    }
}
