// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Semantic events produced by playing a move. A single move can produce several: the move itself, the slam it
//! caused, the fate of the slammed piece, and any check or checkmate that follows.
//!
//! On the wire every event is an object with a `type` tag, e.g. `{"type": "Moved", "piece": ..., "from": "E2",
//! "to": "E4"}`.

use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::core::{Color, Piece, PieceKind, Square};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, From)]
#[serde(tag = "type")]
pub enum GameEvent {
    Moved(MovedEvent),
    Slammed(SlammedEvent),
    Destroyed(DestroyedEvent),
    Promotion(PromotionEvent),
    Check(CheckEvent),
    Checkmate(CheckmateEvent),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedEvent {
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
}

/// A capture. `from` and `to` are both the square the attacker landed on, which is where the push starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlammedEvent {
    pub attacker: Piece,
    pub target: Piece,
    pub from: Square,
    pub to: Square,
    pub distance: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestroyReason {
    Collision,
    Offboard,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyedEvent {
    pub piece: Piece,
    pub at: Square,
    pub reason: DestroyReason,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionEvent {
    pub at: Square,
    pub from: PieceKind,
    pub to: PieceKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckEvent {
    /// The side whose king is attacked.
    pub against: Color,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckmateEvent {
    pub winner: Color,
}
