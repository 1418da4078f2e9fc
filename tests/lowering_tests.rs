use tinytac::{
    parse_expr, parse_program, parse_stmt, BinaryOp, Instr, Label, LiteralPolicy, LowerOptions,
    Lowering, Operand, Temp,
};

const INLINE: LowerOptions = LowerOptions {
    literals: LiteralPolicy::Inline,
};

fn lower_src(src: &str, options: LowerOptions) -> Vec<String> {
    let program = parse_program(src).unwrap();
    let mut lines = Vec::new();
    Lowering::new(options).lower_program(&program, &mut lines);
    lines
}

#[test]
fn assignment_materializes_every_literal() {
    assert_eq!(
        lower_src("x = 1+2", LowerOptions::default()),
        vec!["t0 = 1", "t1 = 2", "t2 = t0 + t1", "x = t2"]
    );
}

#[test]
fn assignment_with_inline_literals() {
    assert_eq!(lower_src("x = 1+2", INLINE), vec!["t0 = 1 + 2", "x = t0"]);
}

#[test]
fn lowering_keeps_its_options() {
    assert_eq!(Lowering::new(INLINE).options(), INLINE);
    assert_eq!(Lowering::default().options().literals, LiteralPolicy::Materialize);
}

#[test]
fn inline_policy_still_materializes_root_literal() {
    assert_eq!(lower_src("x = 5", INLINE), vec!["t0 = 5", "x = t0"]);
    assert_eq!(
        lower_src("if (1) goto a", INLINE),
        vec!["t0 = 1", "if t0 goto Label0", "goto a", "Label0:"]
    );
}

#[test]
fn if_goto_lowering() {
    assert_eq!(
        lower_src("if (1) goto a", LowerOptions::default()),
        vec!["t0 = 1", "if t0 goto Label0", "goto a", "Label0:"]
    );
}

#[test]
fn labels_unique_per_if_and_temps_shared_across_statements() {
    assert_eq!(
        lower_src("if (1) goto a\nif (2) goto b", LowerOptions::default()),
        vec![
            "t0 = 1",
            "if t0 goto Label0",
            "goto a",
            "Label0:",
            "t1 = 2",
            "if t1 goto Label1",
            "goto b",
            "Label1:",
        ]
    );
}

#[test]
fn nested_if_closes_inner_label_first() {
    assert_eq!(
        lower_src("if (1) if (2) x = 3", LowerOptions::default()),
        vec![
            "t0 = 1",
            "if t0 goto Label0",
            "t1 = 2",
            "if t1 goto Label1",
            "t2 = 3",
            "x = t2",
            "Label1:",
            "Label0:",
        ]
    );
}

#[test]
fn post_order_for_nested_expression() {
    assert_eq!(
        lower_src("y = (1+2)*3", LowerOptions::default()),
        vec!["t0 = 1", "t1 = 2", "t2 = t0 + t1", "t3 = 3", "t4 = t2 * t3", "y = t4"]
    );
    assert_eq!(
        lower_src("y = (1+2)*3", INLINE),
        vec!["t0 = 1 + 2", "t1 = t0 * 3", "y = t1"]
    );
}

#[test]
fn left_fold_lowers_left_operand_first() {
    assert_eq!(
        lower_src("z = 1-2-3", INLINE),
        vec!["t0 = 1 - 2", "t1 = t0 - 3", "z = t1"]
    );
}

#[test]
fn goto_allocates_nothing() {
    let mut lowering = Lowering::default();
    let mut lines: Vec<String> = Vec::new();
    lowering.lower_stmt(&parse_stmt("goto nowhere").unwrap(), &mut lines);
    assert_eq!(lines, vec!["goto nowhere"]);
    assert_eq!(lowering.temps_allocated(), 0);
    assert_eq!(lowering.labels_allocated(), 0);
}

#[test]
fn block_lowers_in_order() {
    assert_eq!(
        lower_src("if (0) { a = 1; goto b }", LowerOptions::default()),
        vec!["t0 = 0", "if t0 goto Label0", "t1 = 1", "a = t1", "goto b", "Label0:"]
    );
}

#[test]
fn lower_expr_returns_result_temp() {
    let mut lowering = Lowering::default();
    let mut lines: Vec<String> = Vec::new();
    let t = lowering.lower_expr(&parse_expr("1+2").unwrap(), &mut lines);
    assert_eq!(t, Temp(2));
    assert_eq!(lowering.temps_allocated(), 3);

    let t = lowering.lower_expr(&parse_expr("4").unwrap(), &mut lines);
    assert_eq!(t, Temp(3));
}

#[test]
fn counters_never_repeat_within_unit() {
    let lines = lower_src(
        "a = 1*2\nb = 3\nif (5) goto x\nif (6) c = 7",
        LowerOptions::default(),
    );
    let defined: Vec<u32> = lines
        .iter()
        .filter_map(|l| l.strip_prefix('t'))
        .filter_map(|l| l.split(' ').next())
        .map(|n| n.parse().unwrap())
        .collect();
    assert_eq!(defined, (0..defined.len() as u32).collect::<Vec<_>>());

    let labels: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|l| l.ends_with(':'))
        .collect();
    assert_eq!(labels, vec!["Label0:", "Label1:"]);
}

#[test]
fn relowering_in_fresh_units_is_identical() {
    let program = parse_program("x = 1+2*3\nif (4) goto end").unwrap();

    let mut first = String::new();
    Lowering::default().lower_program(&program, &mut first);
    let mut second = String::new();
    Lowering::default().lower_program(&program, &mut second);
    assert_eq!(first, second);
    assert!(first.starts_with("t0 = 1\n"));
}

#[test]
fn string_and_vec_sinks_agree() {
    let program = parse_program("x = 7/2\ngoto x").unwrap();
    let mut lines: Vec<String> = Vec::new();
    Lowering::default().lower_program(&program, &mut lines);
    let mut text = String::new();
    Lowering::default().lower_program(&program, &mut text);
    assert_eq!(text, format!("{}\n", lines.join("\n")));
}

#[test]
fn instr_display() {
    assert_eq!(Instr::Copy { dst: Temp(0), value: 42 }.to_string(), "t0 = 42");
    assert_eq!(
        Instr::Binary {
            dst: Temp(3),
            op: BinaryOp::Div,
            lhs: Operand::Temp(Temp(1)),
            rhs: Operand::Const(9),
        }
        .to_string(),
        "t3 = t1 / 9"
    );
    assert_eq!(
        Instr::Assign {
            target: "v".into(),
            src: Temp(5)
        }
        .to_string(),
        "v = t5"
    );
    assert_eq!(
        Instr::BranchIf {
            cond: Temp(2),
            label: Label(7)
        }
        .to_string(),
        "if t2 goto Label7"
    );
    assert_eq!(Instr::Goto("top".into()).to_string(), "goto top");
    assert_eq!(Instr::Label(Label(1)).to_string(), "Label1:");
}
