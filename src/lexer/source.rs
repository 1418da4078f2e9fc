use std::iter::Peekable;
use std::str::CharIndices;

/// 字符输入源。
///
/// Scanner 只通过这个接口读字符：偷看下一个、吃掉下一个。
/// 输入结束时 `peek` / `bump` 返回 `None`。
pub trait CharSource {
    /// 查看下一个字符（不消费）。
    fn peek(&mut self) -> Option<char>;

    /// 消费下一个字符。
    fn bump(&mut self) -> Option<char>;

    /// 当前扫描指针的 byte offset。
    fn offset(&mut self) -> usize;
}

/// 基于 `&str` 的字符源。
pub struct StrSource<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> StrSource<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
        }
    }
}

impl CharSource for StrSource<'_> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn offset(&mut self) -> usize {
        match self.chars.peek() {
            Some(&(i, _)) => i,
            None => self.src.len(),
        }
    }
}
