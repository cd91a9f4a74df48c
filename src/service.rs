// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Multiplayer games on top of a [`GameStore`]: creating games, seating players, and accepting moves only from the
//! player whose turn it is.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::{Color, Move};
use crate::rules::{self, MoveError};
use crate::slam::Execution;
use crate::state::{initial_state, GameState, HistoryEntry};
use crate::store::{GameId, GameStore, StoreError};

/// Coarse classification of a [`ServiceError`], for callers that need to map failures onto their own responses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
        };

        write!(f, "{}", name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("seat {0} already taken")]
    SeatTaken(Color),
    #[error("no {0} player has joined yet")]
    NoPlayer(Color),
    #[error("only the {0} player may move")]
    NotYourTurn(Color),
    #[error("player id required")]
    MissingPlayer,
    #[error("{0}")]
    InvalidInput(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Store(StoreError::NotFound(_)) => ErrorKind::NotFound,
            ServiceError::Store(_) => ErrorKind::Conflict,
            ServiceError::Move(_) => ErrorKind::Conflict,
            ServiceError::SeatTaken(_) | ServiceError::NoPlayer(_) => ErrorKind::Conflict,
            ServiceError::NotYourTurn(_) => ErrorKind::Forbidden,
            ServiceError::MissingPlayer => ErrorKind::Unauthorized,
            ServiceError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}

/// A player seated in a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seat {
    pub player: String,
    pub color: Color,
    pub state: GameState,
}

fn generate_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}

pub struct GameService<S> {
    store: S,
}

impl<S: GameStore> GameService<S> {
    pub fn new(store: S) -> GameService<S> {
        GameService { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Starts a new game from the standard position under a fresh random id.
    pub fn create_game(&self) -> Result<(GameId, GameState), ServiceError> {
        let id = GameId::from(generate_id());
        let state = self.store.create(&id, initial_state())?;
        info!(game = %id, "created game");
        Ok((id, state))
    }

    /// Seats `player` on `color`. A blank or missing player id is replaced with a generated one. Joining a seat
    /// you already hold changes nothing.
    pub fn join_game(&self, id: &GameId, color: Color, player: Option<&str>) -> Result<Seat, ServiceError> {
        let state = self.store.get(id)?;
        let player = match player.map(str::trim) {
            Some(player) if !player.is_empty() => player.to_owned(),
            _ => generate_id(),
        };

        match state.players.seat(color).map(str::to_owned) {
            Some(existing) if existing != player => {
                warn!(game = %id, %color, "seat already taken");
                return Err(ServiceError::SeatTaken(color));
            }
            Some(_) => return Ok(Seat { player, color, state }),
            None => {}
        }

        let mut next = state.clone();
        next.players.assign(color, player.clone());
        let state = self.store.save(id, next, state.version).map_err(|err| {
            warn!(game = %id, %color, error = %err, "join lost a race");
            err
        })?;

        info!(game = %id, %color, %player, "player joined");
        Ok(Seat { player, color, state })
    }

    pub fn get_game(&self, id: &GameId) -> Result<GameState, ServiceError> {
        Ok(self.store.get(id)?)
    }

    /// Plays `mov` on behalf of `player`, who must hold the seat of the side to move, and commits the result.
    pub fn submit_move(&self, id: &GameId, player: &str, mov: Move) -> Result<Execution, ServiceError> {
        let current = self.store.get(id)?;
        let player = player.trim();
        if player.is_empty() {
            return Err(ServiceError::MissingPlayer);
        }

        let color = current.turn;
        let seated = current
            .players
            .seat(color)
            .ok_or(ServiceError::NoPlayer(color))?;
        if seated != player {
            warn!(game = %id, %color, %mov, "move from the wrong player");
            return Err(ServiceError::NotYourTurn(color));
        }

        let exec = rules::apply_move(&current, mov).map_err(|err| {
            warn!(game = %id, %color, %mov, error = %err, "rejected move");
            err
        })?;
        let state = self
            .store
            .save(id, exec.state, current.version)
            .map_err(|err| {
                warn!(game = %id, %color, %mov, error = %err, "move lost a race");
                err
            })?;

        info!(game = %id, %color, %mov, version = state.version, "accepted move");
        Ok(Execution {
            state,
            events: exec.events,
        })
    }

    pub fn history(&self, id: &GameId) -> Result<Vec<HistoryEntry>, ServiceError> {
        Ok(self.store.get(id)?.history)
    }

    /// Legal moves for the side to move.
    pub fn legal_moves(&self, id: &GameId) -> Result<Vec<Move>, ServiceError> {
        let state = self.store.get(id)?;
        Ok(rules::list_legal_moves(&state, state.turn))
    }
}
