//! End-to-end lowering tests
//!
//! Each test builds a small tree the way a parser would, runs the full
//! pipeline and compares the serialized module byte for byte.

#[cfg(test)]
mod tests {
    use crate::ast::{Ast, BinaryOp, DeclId, ExprId, StmtId, Storage, TypeSpec, UnaryOp};
    use pretty_assertions::assert_eq;
    use ucc_common::SourceSpan;

    fn sp() -> SourceSpan {
        SourceSpan::dummy()
    }

    fn compile_to_text(ast: &Ast) -> String {
        let _ = env_logger::builder().is_test(true).try_init();
        crate::compile(ast).expect("program should compile").to_string()
    }

    fn int_param(ast: &mut Ast, name: &str) -> DeclId {
        ast.new_var_decl(name, TypeSpec::Int, None, Storage::Param, sp())
    }

    fn char_param(ast: &mut Ast, name: &str) -> DeclId {
        ast.new_var_decl(name, TypeSpec::Char, None, Storage::Param, sp())
    }

    /// Add a function definition; an empty parameter list becomes the
    /// `void` marker.
    fn func(ast: &mut Ast, name: &str, params: Vec<DeclId>, result: TypeSpec, stmts: Vec<StmtId>) {
        let params = if params.is_empty() {
            vec![ast.new_void_param(sp())]
        } else {
            params
        };
        let body = ast.new_block_stmt(stmts, sp());
        let decl = ast.new_func_decl(name, params, result, Some(body), sp());
        ast.add_item(decl);
    }

    fn ret_value(ast: &mut Ast, value: ExprId) -> StmtId {
        ast.new_return_stmt(Some(value), sp())
    }

    #[test]
    fn test_return_constant() {
        let mut ast = Ast::new();
        let zero = ast.new_int_lit(0, sp());
        let ret = ret_value(&mut ast, zero);
        func(&mut ast, "main", vec![], TypeSpec::Int, vec![ret]);

        let expected = "\
define i32 @main() {
entry:
    ret i32 0
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_parameters_spill_interleaved() {
        let mut ast = Ast::new();
        let a = int_param(&mut ast, "a");
        let b = int_param(&mut ast, "b");
        let lhs = ast.new_ident("a", sp());
        let rhs = ast.new_ident("b", sp());
        let sum = ast.new_binary_expr(BinaryOp::Add, lhs, rhs, sp());
        let ret = ret_value(&mut ast, sum);
        func(&mut ast, "add", vec![a, b], TypeSpec::Int, vec![ret]);

        let expected = "\
define i32 @add(i32 %a, i32 %b) {
entry:
    %0 = alloca i32
    store i32 %a, i32* %0
    %1 = alloca i32
    store i32 %b, i32* %1
    %2 = load i32, i32* %0
    %3 = load i32, i32* %1
    %4 = add i32 %2, %3
    ret i32 %4
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_if_else_with_both_branches_returning_prunes_the_join() {
        let mut ast = Ast::new();
        let x = int_param(&mut ast, "x");
        let x_use = ast.new_ident("x", sp());
        let zero = ast.new_int_lit(0, sp());
        let cond = ast.new_binary_expr(BinaryOp::Lt, x_use, zero, sp());

        let one = ast.new_int_lit(1, sp());
        let neg_one = ast.new_unary_expr(UnaryOp::Neg, one, sp());
        let then_ret = ret_value(&mut ast, neg_one);
        let then_body = ast.new_block_stmt(vec![then_ret], sp());

        let one2 = ast.new_int_lit(1, sp());
        let else_ret = ret_value(&mut ast, one2);
        let else_body = ast.new_block_stmt(vec![else_ret], sp());

        let if_stmt = ast.new_if_stmt(cond, then_body, Some(else_body), sp());
        func(&mut ast, "sign", vec![x], TypeSpec::Int, vec![if_stmt]);

        let expected = "\
define i32 @sign(i32 %x) {
entry:
    %0 = alloca i32
    store i32 %x, i32* %0
    %1 = load i32, i32* %0
    %2 = icmp slt i32 %1, 0
    br i1 %2, label %if.then, label %if.else
if.then:
    ret i32 -1
if.else:
    ret i32 1
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_if_without_else_falls_through_to_implicit_return() {
        let mut ast = Ast::new();
        let x = int_param(&mut ast, "x");
        let cond = ast.new_ident("x", sp());
        let lhs = ast.new_ident("x", sp());
        let one = ast.new_int_lit(1, sp());
        let assign = ast.new_binary_expr(BinaryOp::Assign, lhs, one, sp());
        let assign_stmt = ast.new_expr_stmt(assign, sp());
        let then_body = ast.new_block_stmt(vec![assign_stmt], sp());
        let if_stmt = ast.new_if_stmt(cond, then_body, None, sp());
        func(&mut ast, "maybe", vec![x], TypeSpec::Void, vec![if_stmt]);

        let expected = "\
define void @maybe(i32 %x) {
entry:
    %0 = alloca i32
    store i32 %x, i32* %0
    %1 = load i32, i32* %0
    %2 = icmp ne i32 %1, 0
    br i1 %2, label %if.then, label %if.end
if.then:
    store i32 1, i32* %0
    br label %if.end
if.end:
    ret void
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_while_loop_shape() {
        let mut ast = Ast::new();
        let n = int_param(&mut ast, "n");
        let i = ast.new_var_decl("i", TypeSpec::Int, None, Storage::Local, sp());
        let i_decl = ast.new_decl_stmt(i, sp());
        let i_lhs = ast.new_ident("i", sp());
        let zero = ast.new_int_lit(0, sp());
        let init = ast.new_binary_expr(BinaryOp::Assign, i_lhs, zero, sp());
        let init_stmt = ast.new_expr_stmt(init, sp());

        let i_cond = ast.new_ident("i", sp());
        let n_cond = ast.new_ident("n", sp());
        let cond = ast.new_binary_expr(BinaryOp::Lt, i_cond, n_cond, sp());

        let i_dest = ast.new_ident("i", sp());
        let i_src = ast.new_ident("i", sp());
        let one = ast.new_int_lit(1, sp());
        let inc = ast.new_binary_expr(BinaryOp::Add, i_src, one, sp());
        let step = ast.new_binary_expr(BinaryOp::Assign, i_dest, inc, sp());
        let step_stmt = ast.new_expr_stmt(step, sp());
        let body = ast.new_block_stmt(vec![step_stmt], sp());
        let loop_stmt = ast.new_while_stmt(cond, body, sp());

        let i_ret = ast.new_ident("i", sp());
        let ret = ret_value(&mut ast, i_ret);
        func(
            &mut ast,
            "count",
            vec![n],
            TypeSpec::Int,
            vec![i_decl, init_stmt, loop_stmt, ret],
        );

        let expected = "\
define i32 @count(i32 %n) {
entry:
    %0 = alloca i32
    store i32 %n, i32* %0
    %1 = alloca i32
    store i32 0, i32* %1
    br label %while.cond
while.cond:
    %2 = load i32, i32* %1
    %3 = load i32, i32* %0
    %4 = icmp slt i32 %2, %3
    br i1 %4, label %while.body, label %while.end
while.body:
    %5 = load i32, i32* %1
    %6 = add i32 %5, 1
    store i32 %6, i32* %1
    br label %while.cond
while.end:
    %7 = load i32, i32* %1
    ret i32 %7
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_globals_merge_tentative_definitions() {
        let mut ast = Ast::new();
        let tentative = ast.new_var_decl("x", TypeSpec::Int, None, Storage::Global, sp());
        ast.add_item(tentative);
        let three = ast.new_int_lit(3, sp());
        let defined = ast.new_var_decl("x", TypeSpec::Int, Some(three), Storage::Global, sp());
        ast.add_item(defined);

        let two = ast.new_int_lit(2, sp());
        let paren = ast.new_paren_expr(two, sp());
        let neg = ast.new_unary_expr(UnaryOp::Neg, paren, sp());
        let y = ast.new_var_decl("y", TypeSpec::Int, Some(neg), Storage::Global, sp());
        ast.add_item(y);

        let a_lit = ast.new_char_lit(b'a', sp());
        let c = ast.new_var_decl("c", TypeSpec::Char, Some(a_lit), Storage::Global, sp());
        ast.add_item(c);

        let buf = ast.new_var_decl(
            "buf",
            TypeSpec::Array {
                elem: Box::new(TypeSpec::Char),
                len: Some(4),
            },
            None,
            Storage::Global,
            sp(),
        );
        ast.add_item(buf);

        let expected = "\
@x = global i32 3
@y = global i32 -2
@c = global i8 97
@buf = global [4 x i8] zeroinitializer
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_char_arithmetic_extends_and_truncates() {
        let mut ast = Ast::new();
        let c = char_param(&mut ast, "c");
        let c_use = ast.new_ident("c", sp());
        let one = ast.new_int_lit(1, sp());
        let sum = ast.new_binary_expr(BinaryOp::Add, c_use, one, sp());
        let ret = ret_value(&mut ast, sum);
        func(&mut ast, "next", vec![c], TypeSpec::Char, vec![ret]);

        let expected = "\
define i8 @next(i8 %c) {
entry:
    %0 = alloca i8
    store i8 %c, i8* %0
    %1 = load i8, i8* %0
    %2 = sext i8 %1 to i32
    %3 = add i32 %2, 1
    %4 = trunc i32 %3 to i8
    ret i8 %4
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_int_constant_wraps_when_it_becomes_a_char() {
        let mut ast = Ast::new();
        let big = ast.new_int_lit(300, sp());
        let ret = ret_value(&mut ast, big);
        func(&mut ast, "f", vec![], TypeSpec::Char, vec![ret]);

        let expected = "\
define i8 @f() {
entry:
    ret i8 44
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_logical_not_in_condition_and_value_position() {
        let mut ast = Ast::new();
        let x = int_param(&mut ast, "x");
        let x_cond = ast.new_ident("x", sp());
        let not_cond = ast.new_unary_expr(UnaryOp::Not, x_cond, sp());
        let one = ast.new_int_lit(1, sp());
        let ret1 = ret_value(&mut ast, one);
        let then_body = ast.new_block_stmt(vec![ret1], sp());
        let if_stmt = ast.new_if_stmt(not_cond, then_body, None, sp());

        let x_val = ast.new_ident("x", sp());
        let not_val = ast.new_unary_expr(UnaryOp::Not, x_val, sp());
        let ret2 = ret_value(&mut ast, not_val);
        func(&mut ast, "flip", vec![x], TypeSpec::Int, vec![if_stmt, ret2]);

        let expected = "\
define i32 @flip(i32 %x) {
entry:
    %0 = alloca i32
    store i32 %x, i32* %0
    %1 = load i32, i32* %0
    %2 = icmp eq i32 %1, 0
    br i1 %2, label %if.then, label %if.end
if.then:
    ret i32 1
if.end:
    %3 = load i32, i32* %0
    %4 = icmp eq i32 %3, 0
    %5 = zext i1 %4 to i32
    ret i32 %5
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_logical_and_as_branch_condition() {
        let mut ast = Ast::new();
        let a = int_param(&mut ast, "a");
        let b = int_param(&mut ast, "b");
        let a_use = ast.new_ident("a", sp());
        let b_use = ast.new_ident("b", sp());
        let both = ast.new_binary_expr(BinaryOp::LogicalAnd, a_use, b_use, sp());
        let one = ast.new_int_lit(1, sp());
        let then_ret = ret_value(&mut ast, one);
        let then_body = ast.new_block_stmt(vec![then_ret], sp());
        let if_stmt = ast.new_if_stmt(both, then_body, None, sp());
        let zero = ast.new_int_lit(0, sp());
        let ret = ret_value(&mut ast, zero);
        func(&mut ast, "both", vec![a, b], TypeSpec::Int, vec![if_stmt, ret]);

        let expected = "\
define i32 @both(i32 %a, i32 %b) {
entry:
    %0 = alloca i32
    store i32 %a, i32* %0
    %1 = alloca i32
    store i32 %b, i32* %1
    %2 = load i32, i32* %0
    %3 = icmp ne i32 %2, 0
    %4 = alloca i1
    br i1 %3, label %land.rhs, label %land.false
land.rhs:
    %5 = load i32, i32* %1
    %6 = icmp ne i32 %5, 0
    store i1 %6, i1* %4
    br label %land.end
land.false:
    store i1 0, i1* %4
    br label %land.end
land.end:
    %7 = load i1, i1* %4
    br i1 %7, label %if.then, label %if.end
if.then:
    ret i32 1
if.end:
    ret i32 0
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_logical_and_in_value_position_zero_extends() {
        let mut ast = Ast::new();
        let a = int_param(&mut ast, "a");
        let b = int_param(&mut ast, "b");
        let a_use = ast.new_ident("a", sp());
        let b_use = ast.new_ident("b", sp());
        let both = ast.new_binary_expr(BinaryOp::LogicalAnd, a_use, b_use, sp());
        let ret = ret_value(&mut ast, both);
        func(&mut ast, "val", vec![a, b], TypeSpec::Int, vec![ret]);

        let expected = "\
define i32 @val(i32 %a, i32 %b) {
entry:
    %0 = alloca i32
    store i32 %a, i32* %0
    %1 = alloca i32
    store i32 %b, i32* %1
    %2 = load i32, i32* %0
    %3 = icmp ne i32 %2, 0
    %4 = alloca i1
    br i1 %3, label %land.rhs, label %land.false
land.rhs:
    %5 = load i32, i32* %1
    %6 = icmp ne i32 %5, 0
    store i1 %6, i1* %4
    br label %land.end
land.false:
    store i1 0, i1* %4
    br label %land.end
land.end:
    %7 = load i1, i1* %4
    %8 = zext i1 %7 to i32
    ret i32 %8
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_global_array_indexing() {
        let mut ast = Ast::new();
        let a = ast.new_var_decl(
            "a",
            TypeSpec::Array {
                elem: Box::new(TypeSpec::Int),
                len: Some(10),
            },
            None,
            Storage::Global,
            sp(),
        );
        ast.add_item(a);

        let base1 = ast.new_ident("a", sp());
        let idx1 = ast.new_int_lit(0, sp());
        let elem1 = ast.new_index_expr(base1, idx1, sp());
        let seven = ast.new_int_lit(7, sp());
        let store = ast.new_binary_expr(BinaryOp::Assign, elem1, seven, sp());
        let store_stmt = ast.new_expr_stmt(store, sp());

        let base2 = ast.new_ident("a", sp());
        let idx2 = ast.new_int_lit(0, sp());
        let elem2 = ast.new_index_expr(base2, idx2, sp());
        let ret = ret_value(&mut ast, elem2);
        func(
            &mut ast,
            "first",
            vec![],
            TypeSpec::Int,
            vec![store_stmt, ret],
        );

        let expected = "\
@a = global [10 x i32] zeroinitializer

define i32 @first() {
entry:
    %0 = getelementptr [10 x i32], [10 x i32]* @a, i32 0, i32 0
    store i32 7, i32* %0
    %1 = getelementptr [10 x i32], [10 x i32]* @a, i32 0, i32 0
    %2 = load i32, i32* %1
    ret i32 %2
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_array_parameter_and_decay_at_call() {
        let mut ast = Ast::new();
        let arr = ast.new_var_decl(
            "arr",
            TypeSpec::Array {
                elem: Box::new(TypeSpec::Int),
                len: None,
            },
            None,
            Storage::Param,
            sp(),
        );
        let i = int_param(&mut ast, "i");
        let base = ast.new_ident("arr", sp());
        let idx = ast.new_ident("i", sp());
        let elem = ast.new_index_expr(base, idx, sp());
        let ret = ret_value(&mut ast, elem);
        func(&mut ast, "get", vec![arr, i], TypeSpec::Int, vec![ret]);

        let b = ast.new_var_decl(
            "b",
            TypeSpec::Array {
                elem: Box::new(TypeSpec::Int),
                len: Some(4),
            },
            None,
            Storage::Local,
            sp(),
        );
        let b_decl = ast.new_decl_stmt(b, sp());
        let callee = ast.new_ident("get", sp());
        let b_arg = ast.new_ident("b", sp());
        let zero = ast.new_int_lit(0, sp());
        let call = ast.new_call_expr(callee, vec![b_arg, zero], sp());
        let ret2 = ret_value(&mut ast, call);
        func(
            &mut ast,
            "caller",
            vec![],
            TypeSpec::Int,
            vec![b_decl, ret2],
        );

        let expected = "\
define i32 @get(i32* %arr, i32 %i) {
entry:
    %0 = alloca i32*
    store i32* %arr, i32** %0
    %1 = alloca i32
    store i32 %i, i32* %1
    %2 = load i32*, i32** %0
    %3 = load i32, i32* %1
    %4 = getelementptr i32, i32* %2, i32 %3
    %5 = load i32, i32* %4
    ret i32 %5
}

define i32 @caller() {
entry:
    %0 = alloca [4 x i32]
    %1 = getelementptr [4 x i32], [4 x i32]* %0, i32 0, i32 0
    %2 = call i32 @get(i32* %1, i32 0)
    ret i32 %2
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_pointer_condition_compares_against_null() {
        let mut ast = Ast::new();
        let a = ast.new_var_decl(
            "a",
            TypeSpec::Array {
                elem: Box::new(TypeSpec::Int),
                len: None,
            },
            None,
            Storage::Param,
            sp(),
        );
        let cond = ast.new_ident("a", sp());
        let one = ast.new_int_lit(1, sp());
        let ret1 = ret_value(&mut ast, one);
        let then_body = ast.new_block_stmt(vec![ret1], sp());
        let if_stmt = ast.new_if_stmt(cond, then_body, None, sp());
        let zero = ast.new_int_lit(0, sp());
        let ret0 = ret_value(&mut ast, zero);
        func(
            &mut ast,
            "present",
            vec![a],
            TypeSpec::Int,
            vec![if_stmt, ret0],
        );

        let expected = "\
define i32 @present(i32* %a) {
entry:
    %0 = alloca i32*
    store i32* %a, i32** %0
    %1 = load i32*, i32** %0
    %2 = icmp ne i32* %1, null
    br i1 %2, label %if.then, label %if.end
if.then:
    ret i32 1
if.end:
    ret i32 0
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_external_declaration_serializes_as_declare() {
        let mut ast = Ast::new();
        let c = int_param(&mut ast, "c");
        let putchar = ast.new_func_decl("putchar", vec![c], TypeSpec::Int, None, sp());
        ast.add_item(putchar);

        let callee = ast.new_ident("putchar", sp());
        let sixty_five = ast.new_int_lit(65, sp());
        let call = ast.new_call_expr(callee, vec![sixty_five], sp());
        let call_stmt = ast.new_expr_stmt(call, sp());
        func(&mut ast, "emit", vec![], TypeSpec::Void, vec![call_stmt]);

        let expected = "\
declare i32 @putchar(i32)

define void @emit() {
entry:
    %0 = call i32 @putchar(i32 65)
    ret void
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_definition_replaces_earlier_declaration_in_place() {
        let mut ast = Ast::new();
        let void1 = ast.new_void_param(sp());
        let f_decl = ast.new_func_decl("f", vec![void1], TypeSpec::Int, None, sp());
        ast.add_item(f_decl);

        let callee = ast.new_ident("f", sp());
        let call = ast.new_call_expr(callee, vec![], sp());
        let ret = ret_value(&mut ast, call);
        func(&mut ast, "main", vec![], TypeSpec::Int, vec![ret]);

        let four = ast.new_int_lit(4, sp());
        let f_ret = ret_value(&mut ast, four);
        func(&mut ast, "f", vec![], TypeSpec::Int, vec![f_ret]);

        let expected = "\
define i32 @f() {
entry:
    ret i32 4
}

define i32 @main() {
entry:
    %0 = call i32 @f()
    ret i32 %0
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_label_hints_get_numeric_suffixes() {
        let mut ast = Ast::new();
        let x = int_param(&mut ast, "x");

        let cond1 = ast.new_ident("x", sp());
        let one = ast.new_int_lit(1, sp());
        let ret1 = ret_value(&mut ast, one);
        let then1 = ast.new_block_stmt(vec![ret1], sp());
        let if1 = ast.new_if_stmt(cond1, then1, None, sp());

        let cond2 = ast.new_ident("x", sp());
        let two = ast.new_int_lit(2, sp());
        let ret2 = ret_value(&mut ast, two);
        let then2 = ast.new_block_stmt(vec![ret2], sp());
        let if2 = ast.new_if_stmt(cond2, then2, None, sp());

        let three = ast.new_int_lit(3, sp());
        let ret3 = ret_value(&mut ast, three);
        func(
            &mut ast,
            "pick",
            vec![x],
            TypeSpec::Int,
            vec![if1, if2, ret3],
        );

        let expected = "\
define i32 @pick(i32 %x) {
entry:
    %0 = alloca i32
    store i32 %x, i32* %0
    %1 = load i32, i32* %0
    %2 = icmp ne i32 %1, 0
    br i1 %2, label %if.then, label %if.end
if.then:
    ret i32 1
if.end:
    %3 = load i32, i32* %0
    %4 = icmp ne i32 %3, 0
    br i1 %4, label %if.then1, label %if.end1
if.then1:
    ret i32 2
if.end1:
    ret i32 3
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_statements_after_return_are_dropped() {
        let mut ast = Ast::new();
        let one = ast.new_int_lit(1, sp());
        let ret1 = ret_value(&mut ast, one);
        let two = ast.new_int_lit(2, sp());
        let ret2 = ret_value(&mut ast, two);
        func(&mut ast, "f", vec![], TypeSpec::Int, vec![ret1, ret2]);

        let expected = "\
define i32 @f() {
entry:
    ret i32 1
}
";
        assert_eq!(compile_to_text(&ast), expected);
    }

    #[test]
    fn test_missing_return_in_non_void_function_is_an_error() {
        let mut ast = Ast::new();
        func(&mut ast, "bad", vec![], TypeSpec::Int, vec![]);

        let errors = crate::compile(&ast).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("missing return"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let mut ast = Ast::new();
        let a = int_param(&mut ast, "a");
        let b = int_param(&mut ast, "b");
        let a_use = ast.new_ident("a", sp());
        let b_use = ast.new_ident("b", sp());
        let both = ast.new_binary_expr(BinaryOp::LogicalAnd, a_use, b_use, sp());
        let ret = ret_value(&mut ast, both);
        func(&mut ast, "val", vec![a, b], TypeSpec::Int, vec![ret]);

        let first = compile_to_text(&ast);
        let second = compile_to_text(&ast);
        assert_eq!(first, second);
    }
}
