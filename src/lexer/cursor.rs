use std::mem;

use crate::lexer::scanner::next_token;
use crate::lexer::source::CharSource;
use crate::lexer::token::Token;
use crate::span::Span;

/// 单槽 lookahead 光标。
///
/// - 始终持有恰好一个“还没被消费”的 token。
/// - `peek()` 只看不动；`advance()` 交出当前 token，再向 Scanner 要下一个。
/// - 被交出的 token 不再保留，光标没有回看能力。
pub struct Cursor<S> {
    source: S,
    lookahead: Token,
}

impl<S: CharSource> Cursor<S> {
    /// 创建光标并预读第一个 token。
    pub fn new(mut source: S) -> Self {
        let lookahead = next_token(&mut source);
        Self { source, lookahead }
    }

    pub fn peek(&self) -> &Token {
        &self.lookahead
    }

    /// 消费当前 token 并返回它。
    pub fn advance(&mut self) -> Token {
        let next = next_token(&mut self.source);
        mem::replace(&mut self.lookahead, next)
    }

    pub fn span(&self) -> Span {
        self.lookahead.span
    }
}
