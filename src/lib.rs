//! seka-rs: authoritative Seka table engine
//!
//! Goals:
//! - Deterministic evaluation of three-card Seka hands from the 21-card deck
//! - A single-writer table state machine with betting, expose and Vara
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: evaluate a hand
//! ```
//! use seka_rs::evaluator::{evaluate, Priority};
//! use seka_rs::hand::Hand;
//!
//! let hand: Hand = "joker Ah Kh".parse().unwrap();
//! let combination = evaluate(&hand);
//! assert_eq!(combination.priority, Priority::Thirty);
//! assert_eq!(combination.points, 32);
//! ```
//!
//! ## Quick start: run a table
//! ```
//! use seka_rs::config::GameSettings;
//! use seka_rs::game::{Action, Game, GameState};
//!
//! let mut game = Game::new("demo", GameSettings { seed: Some(7), ..GameSettings::default() })?;
//! game.add_player("alice", "Alice")?;
//! game.add_player("bob", "Bob")?;
//! let snapshot = game.start_game()?;
//! assert_eq!(snapshot.pot, 20);
//!
//! let first = snapshot.current_player_id.clone().unwrap();
//! game.submit_action(&first, Action::Fold)?;
//! assert_eq!(game.state(), GameState::Showdown);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! For a shared table behind an async runtime, see [`table::TableActor`].

pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod evaluator;
pub mod game;
pub mod hand;
pub mod table;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
