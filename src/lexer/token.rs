use std::fmt;

use crate::span::Span;

/// 一个 Token = 词法分析后的最小“语法积木”。
///
/// 例子：`x = 12+y`
/// 会被切成：Word("x"), Punct('='), Number(12), Punct('+'), Word("y"), Eof
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Token 的类别
    pub kind: TokenKind,
    /// Token 在源代码中的位置
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// 当前 token 是否是某个单字符符号。
    pub fn is_punct(&self, c: char) -> bool {
        matches!(self.kind, TokenKind::Punct(p) if p == c)
    }

    /// 当前 token 是否是某个特定的单词（用于识别 `if` / `goto`）。
    pub fn is_word(&self, text: &str) -> bool {
        matches!(&self.kind, TokenKind::Word(w) if w == text)
    }
}

/// Token 的种类枚举。
///
/// 注意：词法层只有这几类，关键字不在这里区分，
/// `if`、`goto` 也是普通的 `Word`，由 Parser 按字面文本分派。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// 非负十进制整数字面量
    Number(u64),
    /// 单词：字母或 `_` 开头，后面跟字母/数字/`_`
    Word(String),
    /// 其它任意单个字符（包括换行 `\n`）
    Punct(char),
    /// 输入结束
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{n}"),
            TokenKind::Word(w) => write!(f, "{w}"),
            TokenKind::Punct('\n') => f.write_str("newline"),
            TokenKind::Punct(c) => write!(f, "'{}'", c.escape_default()),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}
