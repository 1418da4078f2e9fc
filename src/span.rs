/// 源码中的一个“区间位置”。
///
/// 只记录 byte offset（按 UTF-8 字节计数），不做行列号换算：
/// 报错只需要指出“在输入的哪一处”，不需要更细的定位。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    /// 起始 byte offset（包含）
    pub start: usize,
    /// 结束 byte offset（不包含）
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 长度为 0 的位置（用于 EOF 之类没有实际字符的地方）。
    pub fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }
}
