//! Command-line interface and HTTP endpoints for Vitrine.
//!
//! # Key Abstractions
//!
//! - [`VitrineConfig`](config::VitrineConfig): file, env and default configuration
//! - [`AppState`](state::AppState): store, query router and indexer wired from config
//! - [`VitrineCli`](app::VitrineCli): dispatches `serve`, `index`, `search`, `config`
//! - [`server::router`]: the `axum` routes for search, reindex and health

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod search_handlers;
pub mod server;
pub mod state;

pub use app::VitrineCli;
pub use cli::CliArgs;
pub use config::VitrineConfig;
pub use state::AppState;
