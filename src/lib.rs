pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod lower;
pub mod parser;
pub mod span;

// 对外公开的核心类型/函数（给 CLI、测试使用）。
pub use ast::{AssignStmt, BinaryExpr, BinaryOp, Expr, IfStmt, Program, Stmt};
pub use error::{EvalError, SyntaxError};
pub use eval::evaluate;
pub use lexer::{lex, next_token, CharSource, Cursor, StrSource, Token, TokenKind};
pub use lower::{Instr, Label, LineSink, LiteralPolicy, LowerOptions, Lowering, Operand, Temp};
pub use parser::{parse_expr, parse_program, parse_stmt, Parser};
pub use span::Span;

/// 编译入口：源码 -> 三地址码文本（默认配置）。
///
/// 每次调用都使用全新的计数器，多次调用之间互不影响。
pub fn compile(src: &str) -> Result<String, SyntaxError> {
    compile_with(src, LowerOptions::default())
}

/// 同 `compile`，但可以指定降级配置。
///
/// 先完整解析再降级：有语法错误时不会输出任何指令。
pub fn compile_with(src: &str, options: LowerOptions) -> Result<String, SyntaxError> {
    let program = parse_program(src)?;
    let mut out = String::new();
    Lowering::new(options).lower_program(&program, &mut out);
    Ok(out)
}

/// 表达式模式：整个输入只是一个表达式，输出它的三地址码。
pub fn compile_expr(src: &str, options: LowerOptions) -> Result<String, SyntaxError> {
    let expr = parse_expr(src)?;
    let mut out = String::new();
    Lowering::new(options).lower_expr(&expr, &mut out);
    Ok(out)
}
