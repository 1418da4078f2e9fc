use tracing::trace;

use crate::lexer::source::{CharSource, StrSource};
use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

/// 词法分析入口：把整段源代码切成一串 Token（不含末尾的 `Eof`）。
///
/// Parser 并不使用它（Parser 每次只向 Scanner 要一个 token），
/// 这里主要给测试和 `--emit` 调试使用。
pub fn lex(src: &str) -> Vec<Token> {
    let mut source = StrSource::new(src);
    let mut tokens = Vec::new();
    loop {
        let tok = next_token(&mut source);
        if tok.kind == TokenKind::Eof {
            break;
        }
        tokens.push(tok);
    }
    tokens
}

/// 从字符源中扫描出下一个 token。
///
/// 规则：
/// - 先跳过空格和 tab（换行不跳过，它对语句划分有意义）
/// - 数字开头：吃掉连续数字，按十进制累加（不处理符号，溢出时回绕）
/// - 字母或 `_` 开头：吃掉连续的字母/数字/`_`
/// - 输入结束：返回 `Eof`，不移动指针
/// - 其它：只吃一个字符，作为 `Punct`
///
/// 这一层不会失败，任何字符序列都能切出 token，非法组合交给 Parser 拒绝。
pub fn next_token<S: CharSource + ?Sized>(source: &mut S) -> Token {
    skip_blank(source);

    let start = source.offset();
    let kind = match source.peek() {
        None => TokenKind::Eof,
        Some(c) if c.is_ascii_digit() => scan_number(source),
        Some(c) if is_word_start(c) => scan_word(source),
        Some(_) => match source.bump() {
            Some(c) => TokenKind::Punct(c),
            None => TokenKind::Eof,
        },
    };
    let span = Span::new(start, source.offset());

    trace!(token = %kind, start = span.start, end = span.end, "scanned token");
    Token::new(kind, span)
}

/// 只跳过“水平”空白：空格与 tab。
fn skip_blank<S: CharSource + ?Sized>(source: &mut S) {
    while let Some(' ' | '\t') = source.peek() {
        source.bump();
    }
}

/// 读取连续数字：`value = value * 10 + digit`，按 u64 回绕，结果永远非负。
fn scan_number<S: CharSource + ?Sized>(source: &mut S) -> TokenKind {
    let mut value: u64 = 0;
    while let Some(digit) = source.peek().and_then(|c| c.to_digit(10)) {
        source.bump();
        value = value.wrapping_mul(10).wrapping_add(u64::from(digit));
    }
    TokenKind::Number(value)
}

fn scan_word<S: CharSource + ?Sized>(source: &mut S) -> TokenKind {
    let mut word = String::new();
    while let Some(c) = source.peek() {
        if !is_word_continue(c) {
            break;
        }
        word.push(c);
        source.bump();
    }
    TokenKind::Word(word)
}

/// 单词首字符规则：字母或 `_`。
fn is_word_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

/// 单词后续字符规则：字母/数字/`_`。
fn is_word_continue(ch: char) -> bool {
    is_word_start(ch) || ch.is_ascii_digit()
}
