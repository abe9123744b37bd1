pub mod ast;
pub mod token;
pub mod lexer;
pub mod parser;
pub mod object;
pub mod evaluator;
pub mod env;
pub mod error;
pub mod native;
pub mod session;
pub mod repl;

pub use env::Env;
pub use error::{Error, LexError, ParseError, RuntimeError};
pub use evaluator::evaluate;
pub use lexer::tokenize;
pub use object::Object;
pub use parser::parse;
pub use session::Session;
