// Copyright 2019-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Game persistence.
//!
//! Stores hold one `GameState` per game id and guard updates with the state's `version`: a save names the version it
//! was computed from, and only succeeds if nobody else has saved in the meantime. Two concurrent moves against the
//! same game can therefore never both commit; the loser gets a `VersionMismatch` and has to fetch and retry.
//!
//! The rules engine knows nothing about any of this. It copies `version` through untouched, and the store is the
//! only thing that ever increments it.

use chashmap::CHashMap;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::GameState;

/// Opaque identifier of a stored game.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        GameId(id.to_owned())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("game {0} not found")]
    NotFound(GameId),
    #[error("game {0} already exists")]
    AlreadyExists(GameId),
    #[error("game was updated concurrently (expected version {expected}, found {actual})")]
    VersionMismatch { expected: u64, actual: u64 },
}

pub trait GameStore: Send + Sync {
    /// Stores a new game. Fails if the id is taken.
    fn create(&self, id: &GameId, state: GameState) -> Result<GameState, StoreError>;

    fn get(&self, id: &GameId) -> Result<GameState, StoreError>;

    /// Replaces the stored state if its version is still `expected_version`. The committed state, returned on
    /// success, carries version `expected_version + 1` regardless of the version it was passed in with.
    fn save(&self, id: &GameId, state: GameState, expected_version: u64) -> Result<GameState, StoreError>;
}

/// A store that keeps every game in memory. Safe to share between threads.
pub struct MemoryStore {
    games: CHashMap<GameId, GameState>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore {
            games: CHashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl GameStore for MemoryStore {
    fn create(&self, id: &GameId, state: GameState) -> Result<GameState, StoreError> {
        let mut taken = false;
        self.games.alter(id.clone(), |existing| match existing {
            Some(existing) => {
                taken = true;
                Some(existing)
            }
            None => Some(state.clone()),
        });

        if taken {
            return Err(StoreError::AlreadyExists(id.clone()));
        }

        Ok(state)
    }

    fn get(&self, id: &GameId) -> Result<GameState, StoreError> {
        self.games
            .get(id)
            .map(|state| state.clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn save(&self, id: &GameId, mut state: GameState, expected_version: u64) -> Result<GameState, StoreError> {
        // The write guard is held across the compare and the swap.
        let mut stored = self
            .games
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if stored.version != expected_version {
            return Err(StoreError::VersionMismatch {
                expected: expected_version,
                actual: stored.version,
            });
        }

        state.version = expected_version + 1;
        *stored = state.clone();
        Ok(state)
    }
}
