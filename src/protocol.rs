// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A line-oriented command protocol for driving a [`GameService`].
//!
//! Each input line is one command; each command produces exactly one line of JSON. Successful responses carry
//! `"ok": true` and the requested data. Failures carry `"ok": false`, the error `kind` and a human-readable `error`.
//!
//! ```text
//! new
//! join <game> <white|black> [player]
//! get <game>
//! show <game>
//! moves <game>
//! history <game>
//! move <game> <player> <move>
//! quit
//! ```

use std::io::{self, BufRead, Write};

use serde_json::{json, Value};
use tracing::info_span;

use crate::core::{Color, Move};
use crate::service::{GameService, ServiceError};
use crate::store::{GameId, GameStore};

pub fn run<S, R, W>(service: &GameService<S>, input: R, mut output: W, pretty: bool) -> io::Result<()>
where
    S: GameStore,
    R: BufRead,
    W: Write,
{
    for maybe_line in input.lines() {
        let line = maybe_line?;
        let span = info_span!("command", line = line.trim());
        let _enter = span.enter();
        let components: Vec<_> = line.split_whitespace().collect();
        let (&command, arguments) = components.split_first().unwrap_or((&"", &[]));
        let response = match (command, arguments) {
            ("", []) => continue,
            ("quit", []) => break,
            ("new", []) => handle_new(service),
            ("join", &[game, color]) => handle_join(service, game, color, None),
            ("join", &[game, color, player]) => handle_join(service, game, color, Some(player)),
            ("get", &[game]) => handle_get(service, game),
            ("show", &[game]) => handle_show(service, game),
            ("moves", &[game]) => handle_moves(service, game),
            ("history", &[game]) => handle_history(service, game),
            ("move", &[game, player, mov]) => handle_move(service, game, player, mov),
            _ => Err(ServiceError::InvalidInput(format!(
                "unrecognized command: {} {:?}",
                command, arguments
            ))),
        };

        write_response(&mut output, response, pretty)?;
    }

    Ok(())
}

fn write_response<W: Write>(
    output: &mut W,
    response: Result<Value, ServiceError>,
    pretty: bool,
) -> io::Result<()> {
    let value = match response {
        Ok(mut value) => {
            value["ok"] = json!(true);
            value
        }
        Err(err) => {
            tracing::debug!(error = %err, "command failed");
            json!({
                "ok": false,
                "kind": err.kind(),
                "error": err.to_string(),
            })
        }
    };

    if pretty {
        serde_json::to_writer_pretty(&mut *output, &value)?;
    } else {
        serde_json::to_writer(&mut *output, &value)?;
    }

    writeln!(output)?;
    output.flush()
}

fn parse_color(token: &str) -> Result<Color, ServiceError> {
    token
        .parse()
        .map_err(|err: crate::core::ColorParseError| ServiceError::InvalidInput(err.to_string()))
}

fn parse_move(token: &str) -> Result<Move, ServiceError> {
    token
        .parse()
        .map_err(|err: crate::core::MoveParseError| ServiceError::InvalidInput(err.to_string()))
}

fn handle_new<S: GameStore>(service: &GameService<S>) -> Result<Value, ServiceError> {
    let (id, state) = service.create_game()?;
    Ok(json!({ "game": id, "state": state }))
}

fn handle_join<S: GameStore>(
    service: &GameService<S>,
    game: &str,
    color: &str,
    player: Option<&str>,
) -> Result<Value, ServiceError> {
    let id = GameId::from(game);
    let color = parse_color(color)?;
    let seat = service.join_game(&id, color, player)?;
    Ok(json!({
        "game": id,
        "player": seat.player,
        "color": seat.color,
        "state": seat.state,
    }))
}

fn handle_get<S: GameStore>(service: &GameService<S>, game: &str) -> Result<Value, ServiceError> {
    let id = GameId::from(game);
    let state = service.get_game(&id)?;
    Ok(json!({ "game": id, "state": state }))
}

fn handle_show<S: GameStore>(service: &GameService<S>, game: &str) -> Result<Value, ServiceError> {
    let id = GameId::from(game);
    let state = service.get_game(&id)?;
    Ok(json!({ "game": id, "board": state.to_string() }))
}

fn handle_moves<S: GameStore>(service: &GameService<S>, game: &str) -> Result<Value, ServiceError> {
    let id = GameId::from(game);
    let moves = service.legal_moves(&id)?;
    Ok(json!({ "game": id, "legalMoves": moves }))
}

fn handle_history<S: GameStore>(service: &GameService<S>, game: &str) -> Result<Value, ServiceError> {
    let id = GameId::from(game);
    let history = service.history(&id)?;
    Ok(json!({ "game": id, "history": history }))
}

fn handle_move<S: GameStore>(
    service: &GameService<S>,
    game: &str,
    player: &str,
    mov: &str,
) -> Result<Value, ServiceError> {
    let id = GameId::from(game);
    let mov = parse_move(mov)?;
    let exec = service.submit_move(&id, player, mov)?;
    Ok(json!({
        "game": id,
        "state": exec.state,
        "events": exec.events,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn session(service: &GameService<MemoryStore>, script: &str) -> Vec<Value> {
        let mut output = Vec::new();
        run(service, script.as_bytes(), &mut output, false).unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn new_game() {
        let service = GameService::new(MemoryStore::new());
        let responses = session(&service, "new\n");
        assert_eq!(1, responses.len());
        assert_eq!(json!(true), responses[0]["ok"]);
        assert_eq!(json!("white"), responses[0]["state"]["turn"]);
        assert_eq!(32, responses[0]["game"].as_str().unwrap().len());
    }

    #[test]
    fn full_exchange() {
        let service = GameService::new(MemoryStore::new());
        let (id, _) = service.create_game().unwrap();
        let script = format!(
            "join {id} white alice\n\
             join {id} black bob\n\
             \n\
             move {id} alice e2e4\n\
             move {id} bob E7-E5\n\
             history {id}\n\
             moves {id}\n\
             show {id}\n",
            id = id
        );

        let responses = session(&service, &script);
        assert_eq!(7, responses.len());
        assert!(responses.iter().all(|r| r["ok"] == json!(true)));
        assert_eq!(json!("alice"), responses[0]["player"]);
        assert_eq!(json!("Moved"), responses[2]["events"][0]["type"]);
        assert_eq!(json!("E4"), responses[2]["events"][0]["to"]);
        assert_eq!(2, responses[4]["history"].as_array().unwrap().len());
        assert_eq!(json!({"from": "E7", "to": "E5"}), responses[4]["history"][1]["move"]);
        assert!(!responses[5]["legalMoves"].as_array().unwrap().is_empty());
        assert!(responses[6]["board"].as_str().unwrap().contains("white to move"));
    }

    #[test]
    fn errors_are_classified() {
        let service = GameService::new(MemoryStore::new());
        let (id, _) = service.create_game().unwrap();
        let script = format!(
            "frobnicate\n\
             get nope\n\
             join {id} purple\n\
             join {id} white alice\n\
             move {id} alice e2\n\
             move {id} bob e2e4\n\
             move {id} alice e2e5\n",
            id = id
        );

        let responses = session(&service, &script);
        let kinds: Vec<_> = responses.iter().map(|r| r["kind"].clone()).collect();
        assert_eq!(
            vec![
                json!("invalid_input"),
                json!("not_found"),
                json!("invalid_input"),
                Value::Null,
                json!("invalid_input"),
                json!("forbidden"),
                json!("conflict"),
            ],
            kinds
        );
        assert_eq!(json!(false), responses[1]["ok"]);
        assert!(responses[6]["error"].as_str().unwrap().contains("E2-E5"));
    }

    #[test]
    fn quit_stops_reading() {
        let service = GameService::new(MemoryStore::new());
        let responses = session(&service, "new\nquit\nnew\n");
        assert_eq!(1, responses.len());
        assert_eq!(1, service.store().len());
    }
}
