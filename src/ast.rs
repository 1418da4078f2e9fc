use std::fmt;

/// 整个编译单元（Program）的 AST 节点：按出现顺序排列的语句。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

/// 语句（Statement）枚举。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    /// 赋值：`x = 1 + 2`
    Assign(AssignStmt),
    /// 条件：`if (cond) stmt`，只包一条语句，没有 else
    If(IfStmt),
    /// 无条件跳转：`goto label`，label 不做任何校验
    Goto(String),
    /// 代码块：`{ stmt; stmt }`
    Block(Vec<Stmt>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignStmt {
    /// 被赋值的名字（不查符号表，未声明也合法）
    pub target: String,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IfStmt {
    pub cond: Expr,
    pub body: Box<Stmt>,
}

/// 表达式（Expression）枚举。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// 整数字面量
    Number(u64),
    /// 二元运算，独占左右两个子树
    Binary(BinaryExpr),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

impl Expr {
    /// 构造二元表达式的便捷写法（Parser 与测试都会用到）。
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// 从单字符符号识别运算符；其它字符返回 None。
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Sub),
            '*' => Some(BinaryOp::Mul),
            '/' => Some(BinaryOp::Div),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// 全括号形式：`1+2*3` 打印为 `(1 + (2 * 3))`，便于肉眼检查结合性。
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Binary(b) => write!(f, "({} {} {})", b.left, b.op, b.right),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Assign(a) => write!(f, "{} = {}", a.target, a.value),
            // 二元表达式自带括号，不再重复包一层
            Stmt::If(s) => match s.cond {
                Expr::Binary(_) => write!(f, "if {} {}", s.cond, s.body),
                Expr::Number(_) => write!(f, "if ({}) {}", s.cond, s.body),
            },
            Stmt::Goto(label) => write!(f, "goto {label}"),
            Stmt::Block(stmts) => {
                f.write_str("{")?;
                for (i, stmt) in stmts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(";")?;
                    }
                    write!(f, " {stmt}")?;
                }
                f.write_str(" }")
            }
        }
    }
}
