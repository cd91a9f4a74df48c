// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `slam`, a rules engine for slam chess.
//!
//! Slam chess plays like chess except that a capture does not remove the captured piece. The attacker "slams" it
//! further along the line of attack, where it either lands on an empty square, collides with another piece, or falls
//! off the board. As a library, `slam` lists legal moves and turns a game state and a move into the next state plus
//! an ordered log of what happened. Around that engine sit a versioned game store, a multiplayer game service and a
//! line-oriented command protocol, all driven by the `slam` executable.

pub mod board;
pub mod core;
pub mod event;
pub mod movegen;
pub mod protocol;
pub mod rules;
pub mod service;
pub mod slam;
pub mod state;
pub mod store;

pub use board::Board;
pub use rules::{apply_move, list_legal_moves, MoveError};
pub use state::{initial_state, GameState};
