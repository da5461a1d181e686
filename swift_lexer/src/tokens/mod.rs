//! Token data model
//!
//! - [`TokenCategory`]: closed set of categories, generated from one table that
//!   also provides the canonical spelling of every keyword, operator and
//!   punctuation mark
//! - [`Token`]: a recognized unit, pointing into the [`SymbolTable`]
//! - [`InvalidToken`]: a fragment the scanner recovered from

pub mod category;
pub mod symbol_table;
pub mod token;

pub use category::{CategoryClass, TokenCategory};
pub use symbol_table::SymbolTable;
pub use token::{InvalidToken, Token};
