pub mod cursor;
pub mod scanner;
pub mod source;
pub mod token;

pub use cursor::Cursor;
pub use scanner::{lex, next_token};
pub use source::{CharSource, StrSource};
pub use token::{Token, TokenKind};
