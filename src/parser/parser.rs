use tracing::debug;

use crate::ast::{AssignStmt, BinaryOp, Expr, IfStmt, Program, Stmt};
use crate::error::SyntaxError;
use crate::lexer::{CharSource, Cursor, StrSource, TokenKind};

/// 解析器入口：把一段源码解析为 Program AST（若干条语句）。
pub fn parse_program(src: &str) -> Result<Program, SyntaxError> {
    Parser::new(StrSource::new(src)).parse_program()
}

/// 只解析一条语句，之后只允许出现分隔符，然后必须是输入结束。
pub fn parse_stmt(src: &str) -> Result<Stmt, SyntaxError> {
    let mut parser = Parser::new(StrSource::new(src));
    let stmt = parser.parse_stmt()?;
    parser.finish()?;
    Ok(stmt)
}

/// 只解析一个表达式（`1+2*3` 这种），规则同 `parse_stmt`。
pub fn parse_expr(src: &str) -> Result<Expr, SyntaxError> {
    let mut parser = Parser::new(StrSource::new(src));
    let expr = parser.parse_expr()?;
    parser.finish()?;
    Ok(expr)
}

/// 括号 / if / 代码块最多允许嵌套的层数。
const MAX_NESTING: usize = 256;

/// 表达式树的最大高度（`1+1+...+1` 这种长链也会让树变高）。
const MAX_EXPR_HEIGHT: usize = 1024;

/// 递归下降解析器。
///
/// 小白理解版：
/// - Parser 手里只有一个 lookahead token（在 `Cursor` 里）。
/// - 每条文法规则是一个方法；需要某个 token 时，要么吃掉它，要么报错。
/// - 文法是 LL(1) 的，看一个 token 就能决定走哪条规则，从不回溯。
///
/// 文法：
/// ```text
/// program -> { sep } [ stmt { sep+ stmt } ] { sep } EOF
/// stmt    -> Word '=' expr
///          | 'if' '(' expr ')' stmt
///          | 'goto' Word
///          | '{' { sep } { stmt { sep } } '}'
/// expr    -> term   { ('+' | '-') term }
/// term    -> factor { ('*' | '/') factor }
/// factor  -> Number | '(' expr ')'
/// sep     -> '\n' | ';' | '\r'
/// ```
///
/// 嵌套层数和表达式高度都有上限，超出时报 `NestingTooDeep`，
/// 这样后面的降级、打印和释放 AST 都不会把栈递归爆。
pub struct Parser<S> {
    cursor: Cursor<S>,
    depth: usize,
}

impl<S: CharSource> Parser<S> {
    pub fn new(source: S) -> Self {
        Self {
            cursor: Cursor::new(source),
            depth: 0,
        }
    }

    /// 解析整个程序，直到输入结束。
    ///
    /// 同一行的两条语句之间必须有分隔符（换行或 `;`）。
    pub fn parse_program(&mut self) -> Result<Program, SyntaxError> {
        let mut stmts = Vec::new();
        self.skip_separators();
        while !self.at_eof() {
            stmts.push(self.parse_stmt()?);
            if self.at_eof() {
                break;
            }
            if !self.skip_separators() {
                return Err(
                    self.err_here("ExpectedSeparator", "expected newline or ';' after statement")
                );
            }
        }
        debug!(stmts = stmts.len(), "parsed program");
        Ok(Program { stmts })
    }

    /// 解析单条语句（Stmt），按 lookahead 单词的字面文本分派：
    /// - `if` -> parse_if_stmt
    /// - `goto` -> parse_goto_stmt
    /// - 其它单词 -> 赋值
    /// - `{` -> 代码块
    pub fn parse_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        let tok = self.cursor.peek();
        if tok.is_word("if") {
            self.parse_if_stmt()
        } else if tok.is_word("goto") {
            self.parse_goto_stmt()
        } else if matches!(tok.kind, TokenKind::Word(_)) {
            self.parse_assign_stmt()
        } else if tok.is_punct('{') {
            self.parse_block_stmt()
        } else {
            Err(self.err_here("UnknownStatement", "unknown statement"))
        }
    }

    /// 解析赋值：`Word '=' expr`
    fn parse_assign_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        let target = self.expect_word("ExpectedIdentifier", "expected identifier")?;
        self.expect_punct('=', "ExpectedEq", "expected '='")?;
        let value = self.parse_expr()?;
        Ok(Stmt::Assign(AssignStmt { target, value }))
    }

    /// 解析 if 语句：`if (cond) stmt`
    fn parse_if_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        self.enter()?;
        let _ = self.cursor.advance(); // 吃掉 'if'
        self.expect_punct('(', "ExpectedLParen", "expected '('")?;
        let cond = self.parse_expr()?;
        self.expect_punct(')', "MissingRParen", "expected ')'")?;
        let body = self.parse_stmt()?;
        self.leave();
        Ok(Stmt::If(IfStmt {
            cond,
            body: Box::new(body),
        }))
    }

    /// 解析 goto 语句：`goto label`，label 原样保留。
    fn parse_goto_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        let _ = self.cursor.advance(); // 吃掉 'goto'
        let label = self.expect_word("ExpectedLabel", "expected label after 'goto'")?;
        Ok(Stmt::Goto(label))
    }

    /// 解析代码块：`{ stmt* }`
    ///
    /// 进入本函数时，当前 token 必须是 `{`。
    fn parse_block_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        self.enter()?;
        let _ = self.cursor.advance(); // 吃掉 '{'
        let mut stmts = Vec::new();
        loop {
            self.skip_separators();
            if self.cursor.peek().is_punct('}') {
                break;
            }
            if self.at_eof() {
                return Err(self.err_here("MissingRBrace", "expected '}'"));
            }
            stmts.push(self.parse_stmt()?);
            let at_end = self.cursor.peek().is_punct('}') || self.at_eof();
            if !at_end && !self.skip_separators() {
                return Err(
                    self.err_here("ExpectedSeparator", "expected newline or ';' after statement")
                );
            }
        }
        let _ = self.cursor.advance(); // 吃掉 '}'
        self.leave();
        Ok(Stmt::Block(stmts))
    }

    /// `expr -> term { ('+' | '-') term }`
    ///
    /// 用循环做左折叠：已经得到的结果总是作为新节点的左孩子，
    /// 所以 `1-2-3` 得到 `(1-2)-3`，而不是 `1-(2-3)`。
    pub fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_sum().map(|(expr, _)| expr)
    }

    /// 以下几个方法额外返回子树高度，用来限制整棵表达式树的高度。
    fn parse_sum(&mut self) -> Result<(Expr, usize), SyntaxError> {
        let (mut lhs, mut height) = self.parse_term()?;
        while let Some(op) = self.peek_op(&[BinaryOp::Add, BinaryOp::Sub]) {
            let _ = self.cursor.advance();
            let (rhs, rhs_height) = self.parse_term()?;
            height = self.grow(height, rhs_height)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok((lhs, height))
    }

    /// `term -> factor { ('*' | '/') factor }`，同样是左折叠。
    fn parse_term(&mut self) -> Result<(Expr, usize), SyntaxError> {
        let (mut lhs, mut height) = self.parse_factor()?;
        while let Some(op) = self.peek_op(&[BinaryOp::Mul, BinaryOp::Div]) {
            let _ = self.cursor.advance();
            let (rhs, rhs_height) = self.parse_factor()?;
            height = self.grow(height, rhs_height)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok((lhs, height))
    }

    /// `factor -> Number | '(' expr ')'`
    fn parse_factor(&mut self) -> Result<(Expr, usize), SyntaxError> {
        match self.cursor.peek().kind {
            TokenKind::Number(n) => {
                let _ = self.cursor.advance();
                Ok((Expr::Number(n), 1))
            }
            TokenKind::Punct('(') => {
                self.enter()?;
                let _ = self.cursor.advance();
                let inner = self.parse_sum()?;
                self.expect_punct(')', "MissingRParen", "expected ')'")?;
                self.leave();
                Ok(inner)
            }
            _ => Err(self.err_here("ExpectedExpr", "expected a number or '('")),
        }
    }

    /// 新的二元节点的高度 = 左右子树中较高者 + 1。
    fn grow(&self, lhs: usize, rhs: usize) -> Result<usize, SyntaxError> {
        let height = lhs.max(rhs) + 1;
        if height > MAX_EXPR_HEIGHT {
            return Err(self.err_here("NestingTooDeep", "expression nested too deeply"));
        }
        Ok(height)
    }

    /// 进入一层嵌套（括号、if、代码块）。出错时不必配对 `leave`：第一个错误就终止解析。
    fn enter(&mut self) -> Result<(), SyntaxError> {
        if self.depth >= MAX_NESTING {
            return Err(self.err_here("NestingTooDeep", "nesting too deep"));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// 吃掉尾部的分隔符，然后要求输入已经结束。
    pub fn finish(&mut self) -> Result<(), SyntaxError> {
        self.skip_separators();
        if self.at_eof() {
            Ok(())
        } else {
            Err(self.err_here("TrailingInput", "unexpected token"))
        }
    }

    /// 如果 lookahead 是 `ops` 中的某个运算符，返回它（不前进）。
    fn peek_op(&self, ops: &[BinaryOp]) -> Option<BinaryOp> {
        match self.cursor.peek().kind {
            TokenKind::Punct(c) => BinaryOp::from_char(c).filter(|op| ops.contains(op)),
            _ => None,
        }
    }

    /// 连续吃掉分隔符；至少吃掉一个时返回 true。
    fn skip_separators(&mut self) -> bool {
        let mut progressed = false;
        while matches!(self.cursor.peek().kind, TokenKind::Punct('\n' | ';' | '\r')) {
            let _ = self.cursor.advance();
            progressed = true;
        }
        progressed
    }

    /// 期望下一个 token 是单字符符号 `c`，否则报 `code`。
    fn expect_punct(
        &mut self,
        c: char,
        code: &'static str,
        message: &str,
    ) -> Result<(), SyntaxError> {
        if self.cursor.peek().is_punct(c) {
            let _ = self.cursor.advance();
            Ok(())
        } else {
            Err(self.err_here(code, message))
        }
    }

    /// 期望下一个 token 是单词，并返回其文本。
    fn expect_word(&mut self, code: &'static str, message: &str) -> Result<String, SyntaxError> {
        match &self.cursor.peek().kind {
            TokenKind::Word(w) => {
                let w = w.clone();
                let _ = self.cursor.advance();
                Ok(w)
            }
            _ => Err(self.err_here(code, message)),
        }
    }

    fn at_eof(&self) -> bool {
        self.cursor.peek().kind == TokenKind::Eof
    }

    /// 构造一个错误：定位到“当前 token”，并在信息里带上实际看到的 token。
    fn err_here(&self, code: &'static str, message: &str) -> SyntaxError {
        let tok = self.cursor.peek();
        SyntaxError::new(code, format!("{message}, found {}", tok.kind), tok.span)
    }
}
