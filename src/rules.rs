// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Legality and turn application. This is the only entry point a caller needs to play a game: ask for the legal
//! moves, then apply one of them to get the next state.

use thiserror::Error;
use tracing::debug;

use crate::core::*;
use crate::event::{CheckEvent, CheckmateEvent};
use crate::movegen;
use crate::slam::{self, Execution};
use crate::state::{GameOver, GameOverReason, GameState, HistoryEntry};

/// Reasons a move can be refused. None of them touch the state the move was played against.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("game is over")]
    GameOver,
    #[error("no piece on {0}")]
    NoPiece(Square),
    #[error("not {0}'s turn")]
    WrongTurn(Color),
    #[error("illegal move: {0}")]
    IllegalMove(Move),
}

/// Whether a pseudo-legal move for `us` is legal: it does not leave our king attacked and, if it is a castling hop,
/// the king does not start on, pass through, or land on an attacked square.
fn is_legal_given_pseudolegal(state: &GameState, us: Color, mov: Move) -> bool {
    let board = &state.board;
    let is_castle = board
        .piece_at(mov.from)
        .map_or(false, |piece| piece.kind == PieceKind::King)
        && mov.from == Square::of(us.back_rank(), FILE_E);
    if is_castle {
        if let Some(side) = mov.castle_side() {
            let them = us.toggle();
            let crossed = [mov.from, side.king_passes(us), side.king_destination(us)];
            if crossed.iter().any(|&sq| board.is_square_attacked(sq, them)) {
                return false;
            }
        }
    }

    match slam::execute_unchecked(state, mov) {
        Ok(exec) => !exec.state.board.is_check(us),
        Err(_) => false,
    }
}

/// Every legal move available to `color` in this state, whether or not it is that side's turn.
pub fn list_legal_moves(state: &GameState, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();
    movegen::generate_moves(color, state, &mut moves);
    moves.retain(|&mov| is_legal_given_pseudolegal(state, color, mov));
    moves
}

/// Whether `mov` is among the legal moves of the piece standing on its source square.
pub fn is_legal(state: &GameState, mov: Move) -> bool {
    let piece = match state.piece_at(mov.from) {
        Some(piece) => piece,
        None => return false,
    };

    movegen::candidate_moves(state, mov.from).contains(&mov)
        && is_legal_given_pseudolegal(state, piece.color, mov)
}

/// Plays `mov` for the side to move. On success the returned state has the move and its events appended to its
/// history, the turn passed, and `game_over` set if the move delivered checkmate.
pub fn apply_move(state: &GameState, mov: Move) -> Result<Execution, MoveError> {
    if state.is_over() {
        return Err(MoveError::GameOver);
    }

    let piece = state
        .piece_at(mov.from)
        .ok_or(MoveError::NoPiece(mov.from))?;
    if piece.color != state.turn {
        return Err(MoveError::WrongTurn(piece.color));
    }

    if !is_legal(state, mov) {
        return Err(MoveError::IllegalMove(mov));
    }

    let Execution {
        state: mut next,
        mut events,
    } = slam::execute_unchecked(state, mov).map_err(|_| MoveError::IllegalMove(mov))?;
    let us = state.turn;
    let them = us.toggle();
    if next.board.is_check(them) {
        events.push(CheckEvent { against: them }.into());
        if list_legal_moves(&next, them).is_empty() {
            events.push(CheckmateEvent { winner: us }.into());
            next.game_over = Some(GameOver {
                winner: us,
                reason: GameOverReason::Checkmate,
            });
        }
    }

    debug!(
        mov = %mov,
        events = events.len(),
        check = next.board.is_check(them),
        mate = next.is_over(),
        "applied move"
    );
    next.history.push(HistoryEntry {
        mov,
        events: events.clone(),
    });
    Ok(Execution {
        state: next,
        events,
    })
}
