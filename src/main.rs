use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::{bail, Context, Result};
use tinytac::{evaluate, parse_expr, parse_program, LiteralPolicy, LowerOptions, Lowering};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: tinytac [--emit tac|ast|eval] [--expr] [--inline-literals] [<input>]";

/// 输出什么：三地址码、AST，还是直接求值的结果。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Emit {
    Tac,
    Ast,
    Eval,
}

#[derive(Debug)]
struct Options {
    emit: Emit,
    /// 整个输入只是一个表达式（而不是语句序列）
    expr_only: bool,
    lower: LowerOptions,
    input: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let options = match parse_args(env::args().skip(1)) {
        Ok(Some(o)) => o,
        Ok(None) => {
            println!("{USAGE}");
            return;
        }
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };
    debug!(?options, "starting");

    let src = match read_source(options.input.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e:#}");
            process::exit(2);
        }
    };

    match run(&options, &src) {
        Ok(out) => print!("{out}"),
        Err(e) => {
            eprintln!("Compile failed: {e}");
            process::exit(1);
        }
    }
}

/// 解析命令行参数；遇到 `--help` 时返回 `Ok(None)`。
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Options>> {
    let mut options = Options {
        emit: Emit::Tac,
        expr_only: false,
        lower: LowerOptions::default(),
        input: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--emit" | "-e" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("Missing value after {arg}"))?;
                options.emit = match value.as_str() {
                    "tac" => Emit::Tac,
                    "ast" => Emit::Ast,
                    "eval" => Emit::Eval,
                    other => bail!("Unknown emit mode '{other}'"),
                };
            }
            "--expr" => options.expr_only = true,
            "--inline-literals" => options.lower.literals = LiteralPolicy::Inline,
            _ if arg.starts_with('-') && arg != "-" => bail!("Unknown argument: {arg}"),
            _ => {
                if options.input.is_some() {
                    bail!("Only one input file is supported");
                }
                options.input = Some(arg);
            }
        }
    }

    // 求值只对单个表达式有意义
    if options.emit == Emit::Eval {
        options.expr_only = true;
    }
    Ok(Some(options))
}

fn read_source(path: Option<&str>) -> Result<String> {
    match path {
        Some(p) if p != "-" => fs::read_to_string(p).with_context(|| format!("Reading {p}")),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Reading stdin")?;
            Ok(buffer)
        }
    }
}

fn run(options: &Options, src: &str) -> Result<String> {
    let mut out = String::new();
    if options.expr_only {
        let expr = parse_expr(src)?;
        match options.emit {
            Emit::Tac => {
                Lowering::new(options.lower).lower_expr(&expr, &mut out);
            }
            Emit::Ast => out = format!("{expr}\n"),
            Emit::Eval => out = format!("{}\n", evaluate(&expr)?),
        }
        return Ok(out);
    }

    let program = parse_program(src)?;
    match options.emit {
        Emit::Tac => Lowering::new(options.lower).lower_program(&program, &mut out),
        Emit::Ast => {
            for stmt in &program.stmts {
                out.push_str(&format!("{stmt}\n"));
            }
        }
        Emit::Eval => bail!("--emit eval needs a single expression"),
    }
    Ok(out)
}
