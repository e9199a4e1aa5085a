//! # Safenet - a simulated terminal for a narrative hacking game
//!
//! Safenet is the command-resolution and session-state engine behind a
//! hacking-themed fiction: the player types command lines into a terminal,
//! the kernel resolves them against a registry of "installed" commands and
//! runs them against a small in-memory world (a connected server, a logged
//! user, a user directory, a mailbox).
//!
//! ## Features
//!
//! - **Kernel dispatch**: one async contract for builtin commands and
//!   data-driven softwares, with explicit disabled/custom/absent resolution.
//! - **Session lifecycle**: connect/login/logout state machine over JSON
//!   server manifests, user directories and mailboxes.
//! - **Interactive prompts**: a command can suspend, ask the player for one
//!   line of input and resume with the answer.
//! - **Closed error taxonomy**: every player-visible failure is one
//!   localized message; the session never crashes on bad input.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use safenet::config::Config;
//! use safenet::kernel::Kernel;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("terminal.toml").await?;
//!     let mut kernel = Kernel::from_config(&config).await?;
//!     let banner = kernel.boot().await?;
//!     # let _ = banner;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`kernel`] - dispatcher, session state, builtins, interactive prompts
//! - [`net`] - server/user/mail records and the network data fetcher
//! - [`config`] - application configuration
//! - [`errors`] - the closed error taxonomy
//! - [`logutil`] - log sanitizing for player-typed input

pub mod config;
pub mod errors;
pub mod kernel;
pub mod logutil;
pub mod net;
