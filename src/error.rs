use crate::span::Span;
use thiserror::Error;

/// 语法错误：前端唯一会报告给调用方的错误类型。
///
/// 设计要点：
/// - `code`：机器可读的错误码（便于测试断言），例如 `MissingRParen`。
/// - `message`：给人看的描述，例如 `expected ')'`。
/// - `span`：出错 token 的 byte offset 区间。
///
/// 第一个语法错误就会终止整个编译单元，不做恢复，也不累积多个错误。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("syntax error: {message} (at byte {})", .span.start)]
pub struct SyntaxError {
    pub code: &'static str,
    pub message: String,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(code: &'static str, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
        }
    }
}

/// 求值后端的错误。TAC 生成只输出文本，不会触发这些错误。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
}
