//! swapsolve engine library.
//!
//! Exposes the board representation, cascade resolver, quality estimator,
//! move model, scoring chain, searches, configuration and protocol modules
//! for use by integration tests and the binary entry point.

pub mod board;
pub mod config;
pub mod engine;
pub mod eval;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod scoring;
pub mod search;
