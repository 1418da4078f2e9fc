pub mod parser;

pub use parser::{parse_expr, parse_program, parse_stmt, Parser};
