// Aura Front End Library
//
// Scanner and runtime value representation for the Aura scripting
// language, plus the token-dump, REPL and benchmark drivers used by the
// `aura` binary.

// Public modules
pub mod bench;
pub mod demo;
pub mod error;
pub mod repl;
pub mod runner;
pub mod scanner;
pub mod value;

// Re-export commonly used items
pub use error::{AuraError, BenchError, Span, ValueError};
pub use scanner::{tokenize, Scanner, Token, TokenType};
pub use value::{Tensor, Value, Vec3};

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::run;
