//! Shared primitive types used by the lexer, logging and reporting layers

pub mod position;

pub use position::Position;
