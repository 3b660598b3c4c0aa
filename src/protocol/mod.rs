//! SPI protocol handling.
//!
//! Board and path notation, the command parser for the main loop, and the
//! `info` line writer used while a search runs.

pub mod info;
pub mod notation;
pub mod parser;

pub use info::InfoWriter;
pub use notation::{encode_board, format_path, parse_board, parse_path, NotationError};
pub use parser::{parse_command, Command, GoParams};
