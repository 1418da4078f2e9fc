use std::fmt;

use tracing::{debug, trace};

use crate::ast::{BinaryOp, Expr, Program, Stmt};

/// 降级（lowering）：把 AST 变成线性的三地址码（TAC）文本。
///
/// 输出是“一行一条指令”，按后序遍历顺序发出：先算操作数，再算用到它们的运算。
/// 例：`x = 1+2`（默认策略）会得到
/// ```text
/// t0 = 1
/// t1 = 2
/// t2 = t0 + t1
/// x = t2
/// ```
///
/// 临时变量和标签的计数器属于一个 `Lowering` 值，
/// 同一编译单元内只增不减、从不复用；新的编译单元请新建一个 `Lowering`。
pub struct Lowering {
    options: LowerOptions,
    next_temp: u32,
    next_label: u32,
}

/// 降级配置。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LowerOptions {
    pub literals: LiteralPolicy,
}

/// 数字字面量作为二元运算操作数时的处理策略。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LiteralPolicy {
    /// 每个字面量都先放进自己的临时变量：`t0 = 1`
    #[default]
    Materialize,
    /// 直接写进运算指令里：`t0 = 1 + 2`。
    ///
    /// 只对“二元运算的直接操作数”生效；赋值右侧、if 条件这类位置上
    /// 单独出现的字面量仍然会分配临时变量，保证 `lower_expr` 总能返回一个临时变量。
    Inline,
}

/// 临时变量编号，打印为 `t0`、`t1`……
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Temp(pub u32);

/// 标签编号，打印为 `Label0`、`Label1`……
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub u32);

/// 运算指令的操作数：临时变量或内联的字面量。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Temp(Temp),
    Const(u64),
}

/// 一条三地址指令。`Display` 给出的就是最终输出的那一行文本。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instr {
    /// `t0 = 5`
    Copy { dst: Temp, value: u64 },
    /// `t2 = t0 + t1`
    Binary {
        dst: Temp,
        op: BinaryOp,
        lhs: Operand,
        rhs: Operand,
    },
    /// `x = t2`
    Assign { target: String, src: Temp },
    /// `if t0 goto Label0`
    BranchIf { cond: Temp, label: Label },
    /// `goto name`
    Goto(String),
    /// `Label0:`
    Label(Label),
}

/// 指令输出的去处：每次追加一行。
pub trait LineSink {
    fn emit_line(&mut self, line: &str);
}

impl LineSink for Vec<String> {
    fn emit_line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// 拼成一整段文本，每行以 `\n` 结尾。
impl LineSink for String {
    fn emit_line(&mut self, line: &str) {
        self.push_str(line);
        self.push('\n');
    }
}

impl<T: LineSink + ?Sized> LineSink for &mut T {
    fn emit_line(&mut self, line: &str) {
        (**self).emit_line(line);
    }
}

impl Lowering {
    pub fn new(options: LowerOptions) -> Self {
        Self {
            options,
            next_temp: 0,
            next_label: 0,
        }
    }

    pub fn options(&self) -> LowerOptions {
        self.options
    }

    /// 到目前为止分配过多少个临时变量。
    pub fn temps_allocated(&self) -> u32 {
        self.next_temp
    }

    /// 到目前为止分配过多少个标签。
    pub fn labels_allocated(&self) -> u32 {
        self.next_label
    }

    /// 依次降级程序中的所有语句，计数器在语句之间共享。
    pub fn lower_program<K: LineSink + ?Sized>(&mut self, program: &Program, sink: &mut K) {
        for stmt in &program.stmts {
            self.lower_stmt(stmt, sink);
        }
        debug!(
            stmts = program.stmts.len(),
            temps = self.next_temp,
            labels = self.next_label,
            "lowered program"
        );
    }

    /// 降级单条语句。
    ///
    /// `if` 的输出保持原样的分支方向：条件为真时跳到标签，
    /// 标签紧跟在被保护的语句之后。
    pub fn lower_stmt<K: LineSink + ?Sized>(&mut self, stmt: &Stmt, sink: &mut K) {
        match stmt {
            Stmt::Assign(a) => {
                let src = self.lower_expr(&a.value, sink);
                emit(
                    sink,
                    Instr::Assign {
                        target: a.target.clone(),
                        src,
                    },
                );
            }
            Stmt::If(s) => {
                let cond = self.lower_expr(&s.cond, sink);
                let label = self.fresh_label();
                emit(sink, Instr::BranchIf { cond, label });
                self.lower_stmt(&s.body, sink);
                emit(sink, Instr::Label(label));
            }
            Stmt::Goto(label) => emit(sink, Instr::Goto(label.clone())),
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    self.lower_stmt(stmt, sink);
                }
            }
        }
    }

    /// 降级表达式，返回保存结果的临时变量。
    pub fn lower_expr<K: LineSink + ?Sized>(&mut self, expr: &Expr, sink: &mut K) -> Temp {
        match expr {
            Expr::Number(value) => {
                let dst = self.fresh_temp();
                emit(sink, Instr::Copy { dst, value: *value });
                dst
            }
            Expr::Binary(b) => {
                let lhs = self.lower_operand(&b.left, sink);
                let rhs = self.lower_operand(&b.right, sink);
                let dst = self.fresh_temp();
                emit(
                    sink,
                    Instr::Binary {
                        dst,
                        op: b.op,
                        lhs,
                        rhs,
                    },
                );
                dst
            }
        }
    }

    /// 二元运算的操作数：按策略决定字面量是否内联。
    fn lower_operand<K: LineSink + ?Sized>(&mut self, expr: &Expr, sink: &mut K) -> Operand {
        match (self.options.literals, expr) {
            (LiteralPolicy::Inline, Expr::Number(value)) => Operand::Const(*value),
            _ => Operand::Temp(self.lower_expr(expr, sink)),
        }
    }

    fn fresh_temp(&mut self) -> Temp {
        let t = Temp(self.next_temp);
        self.next_temp += 1;
        t
    }

    fn fresh_label(&mut self) -> Label {
        let l = Label(self.next_label);
        self.next_label += 1;
        l
    }
}

impl Default for Lowering {
    fn default() -> Self {
        Self::new(LowerOptions::default())
    }
}

fn emit<K: LineSink + ?Sized>(sink: &mut K, instr: Instr) {
    let line = instr.to_string();
    trace!(%line, "emit");
    sink.emit_line(&line);
}

impl fmt::Display for Temp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label{}", self.0)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Temp(t) => write!(f, "{t}"),
            Operand::Const(n) => write!(f, "{n}"),
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Copy { dst, value } => write!(f, "{dst} = {value}"),
            Instr::Binary { dst, op, lhs, rhs } => write!(f, "{dst} = {lhs} {op} {rhs}"),
            Instr::Assign { target, src } => write!(f, "{target} = {src}"),
            Instr::BranchIf { cond, label } => write!(f, "if {cond} goto {label}"),
            Instr::Goto(label) => write!(f, "goto {label}"),
            Instr::Label(label) => write!(f, "{label}:"),
        }
    }
}
