use crate::ast::{BinaryOp, Expr};
use crate::error::EvalError;

/// 直接对表达式树求值（另一个“后端”，与 TAC 生成互不影响）。
///
/// 字面量按位转成 i64（超过 `i64::MAX` 的会变成负数）；
/// 加减乘按 i64 回绕计算；除法向零截断，除数为 0 时报错。
pub fn evaluate(expr: &Expr) -> Result<i64, EvalError> {
    match expr {
        Expr::Number(n) => Ok(*n as i64),
        Expr::Binary(b) => {
            let l = evaluate(&b.left)?;
            let r = evaluate(&b.right)?;
            match b.op {
                BinaryOp::Add => Ok(l.wrapping_add(r)),
                BinaryOp::Sub => Ok(l.wrapping_sub(r)),
                BinaryOp::Mul => Ok(l.wrapping_mul(r)),
                BinaryOp::Div => {
                    if r == 0 {
                        Err(EvalError::DivisionByZero)
                    } else {
                        Ok(l.wrapping_div(r))
                    }
                }
            }
        }
    }
}
