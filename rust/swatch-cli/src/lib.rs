#![cfg(not(target_arch = "wasm32"))]

//! # Swatch
//!
//! Command line front end for [`swatch_names`].
//!
//! ## Usage
//!
//! Train once against a directory of vendor catalogs:
//!
//! ```bash
//! cargo run --bin swatch -- train --data data --out artifacts
//! ```
//!
//! Then name colors, passed as arguments or one per line on stdin:
//!
//! ```bash
//! cargo run --bin swatch -- generate --artifacts artifacts 210,5,5 '#3a5f8c'
//! ```
//!
//! Logging goes through `tracing`; set `RUST_LOG=swatch_names=debug` to see
//! every candidate that was tried.

mod cli;
pub use cli::*;

mod command;
pub use command::*;
