//! # contentrec
//!
//! Content recommendation scoring service.
//!
//! A user identifier is reduced modulo the number of users to select a row of
//! a seeded random preference matrix. That row is scored by a freshly
//! initialized feed-forward network and the top-K items are returned as
//! `content<index>` labels. Nothing is trained or persisted; all state is
//! built once at startup and shared read-only across requests.
//!
//! ```no_run
//! use contentrec::{config::ServerConfig, server::{AppState, Runtime}};
//!
//! # async fn run() -> contentrec::RecResult<()> {
//! let state = AppState::from_config(ServerConfig::default())?;
//! Runtime::bind(state).await?.serve().await
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod model;
pub mod recommender;
pub mod server;

pub use config::ServerConfig;
pub use error::{RecError, RecResult};
pub use recommender::{content_label, Recommender};
pub use server::{create_router, AppState, Runtime};
