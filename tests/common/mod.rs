//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use pairwise::cards::{CardId, CardSet, FaceId};
use pairwise::core::{GameConfig, LevelDef, LevelTable};
use pairwise::game::{Game, GameBuilder};
use tracing_subscriber::{fmt, EnvFilter};

/// Install a test subscriber. Safe to call from every test.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then `warn`.
pub fn init_logging() {
    let filter = std::env::var("TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .without_time()
        .try_init()
        .ok();
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

pub fn faces(names: &[&str]) -> CardSet {
    CardSet::from_names(names.iter().copied())
}

/// A seeded game over `levels` dealing from `names`.
pub fn game_with(levels: Vec<LevelDef>, names: &[&str], config: GameConfig) -> Game {
    init_logging();
    GameBuilder::new()
        .with_config(config)
        .with_levels(LevelTable::new(levels).expect("valid levels"))
        .with_identities(&faces(names))
        .with_seed(42)
        .build()
}

pub fn game(levels: Vec<LevelDef>, names: &[&str]) -> Game {
    game_with(levels, names, GameConfig::default())
}

/// Card IDs showing `face`, in board order.
pub fn ids_with(game: &Game, face: &str) -> Vec<CardId> {
    let face = FaceId::from(face);
    game.board()
        .cards()
        .filter(|c| *c.face() == face)
        .map(|c| c.id())
        .collect()
}

/// Every pair on the board as (first, second) card IDs.
pub fn pairs(game: &Game) -> Vec<(CardId, CardId)> {
    let mut open: Vec<(FaceId, CardId)> = Vec::new();
    let mut out = Vec::new();
    for card in game.board().cards() {
        match open.iter().position(|(face, _)| face == card.face()) {
            Some(pos) => {
                let (_, first) = open.remove(pos);
                out.push((first, card.id()));
            }
            None => open.push((card.face().clone(), card.id())),
        }
    }
    out
}

/// Two cards with different faces.
pub fn mismatched(game: &Game) -> (CardId, CardId) {
    let all = pairs(game);
    (all[0].0, all[1].0)
}

/// Select two cards and run the resolution to completion.
pub fn play(game: &mut Game, a: CardId, b: CardId) {
    game.select_card(a);
    game.select_card(b);
    game.flush();
}
