//! Tabletoe - tic-tac-toe against a precomputed action-value table.
//!
//! # Architecture
//!
//! - **Core** ([`tabletoe_core`]): board, rules, state-key encoding, move selection
//! - **Catalog**: the shipped [`Model`]s and the human's [`Role`]
//! - **Loader**: fetches a [`DecisionTable`] over HTTP or from disk
//! - **Controller**: the synchronous game state machine
//! - **Session**: async driver owning the AI thinking delay and table loads
//! - **Server / TUI**: renderers feeding inputs back into a session
//!
//! # Example
//!
//! ```no_run
//! use tabletoe::{GameSession, Model, Role, TableLoader, TableSource};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let loader = TableLoader::new(TableSource::parse("tables"));
//! let session = GameSession::new(loader, Duration::from_millis(500), Model::Normal);
//! session.change_model(Model::Normal);
//! session.wait_for(|s| !s.loading).await;
//! session.start_game(Role::First);
//! session.click(4);
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod catalog;
mod config;
mod controller;
mod loader;
mod server;
mod session;
pub mod tui;

// Crate-level exports - Catalog
pub use catalog::{Model, Role};

// Crate-level exports - Configuration
pub use config::{ConfigError, TABLE_SOURCE_ENV, TabletoeConfig};

// Crate-level exports - Orchestration
pub use controller::{AiTurn, GameController, GameSnapshot, LoadTicket, Phase};
pub use session::GameSession;

// Crate-level exports - Table loading
pub use loader::{LoadError, LoadErrorKind, TableLoader, TableSource};

// Crate-level exports - REST boundary
pub use server::{ActionResponse, AppState, ClickRequest, ModelInfo, ModelRequest, StartRequest, router};

// Crate-level exports - Game types
pub use tabletoe_core::{
    Board, DecisionTable, Line, Mark, MarkMapping, MoveValues, Outcome, Position, Square, StateKey,
    encode, evaluate, select_move,
};
