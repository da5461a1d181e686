// Internal modules
pub mod automaton;
pub mod batch;
pub mod config;
pub mod file_processor;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod tokens;
pub mod utils;
pub mod vocabulary;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use lexical::{tokenize_str, LexOutput, Lexer, LexerError, LexerTables};
pub use pipeline::{PipelineError, PipelineResult};
pub use tokens::{InvalidToken, Token, TokenCategory};
pub use vocabulary::{Vocabulary, VocabularyError};
