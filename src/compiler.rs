//! Walks one class's AST and lowers it to VM directives, using the class's
//! global symbol table and each subroutine's local table to resolve every
//! identifier to a `(segment, index)` pair.

use std::io::Write;

use crate::ast::*;
use crate::error::CompileError;
use crate::symbol_table::{Kind, Scopes, Segment};
use crate::vm::{Arithmetic, VmWriter};

pub struct Compiler<'a, W: Write> {
    writer: &'a mut VmWriter<W>,
    class_name: String,
    label_counter: u32,
}

type CResult<T> = Result<T, CompileError>;

impl<'a, W: Write> Compiler<'a, W> {
    pub fn new(writer: &'a mut VmWriter<W>, class_name: impl Into<String>) -> Self {
        Self {
            writer,
            class_name: class_name.into(),
            label_counter: 0,
        }
    }

    /// Not a method on `self` on purpose: every call site looks like
    /// `Self::emit(self.writer.push(...))`, and `self.writer.push(...)`
    /// already needs to mutably borrow `self.writer` while being evaluated
    /// as an argument — taking `&mut self` here too would double-borrow
    /// `self` across the two-phase-borrow boundary. A plain associated
    /// function sidesteps that.
    fn emit<T>(result: std::io::Result<T>) -> CResult<T> {
        result.map_err(|err| CompileError::new(format!("io error writing VM output: {err}")))
    }

    pub fn compile_class(&mut self, class: &Class) -> CResult<()> {
        for function in &class.functions {
            self.compile_function(class, function)?;
        }
        Ok(())
    }

    fn compile_function(&mut self, class: &Class, function: &Function) -> CResult<()> {
        let n_locals = function.local_table.var_count(Kind::Var);
        Self::emit(
            self.writer
                .function(&self.class_name, &function.name, n_locals),
        )?;

        match function.kind {
            FunctionKind::Constructor => {
                let n_fields = class.global_table.var_count(Kind::Field);
                Self::emit(self.writer.push(Segment::Constant, n_fields))?;
                Self::emit(self.writer.call("Memory", "alloc", 1))?;
                Self::emit(self.writer.pop(Segment::Pointer, 0))?;
            }
            FunctionKind::Method => {
                Self::emit(self.writer.push(Segment::Argument, 0))?;
                Self::emit(self.writer.pop(Segment::Pointer, 0))?;
            }
            FunctionKind::Function => {}
        }

        let scopes = Scopes::new(&function.local_table, &class.global_table);
        for statement in &function.statements {
            self.compile_statement(statement, &scopes)?;
        }

        Ok(())
    }

    fn next_label_salt(&mut self) -> u32 {
        let n = self.label_counter;
        self.label_counter += 1;
        n
    }

    fn compile_statement(&mut self, statement: &Statement, scopes: &Scopes) -> CResult<()> {
        match statement {
            Statement::Let(LetStatement::Plain { name, rhs }) => {
                self.compile_expression(rhs, scopes)?;
                let resolved = self.resolve_or_err(name, scopes)?;
                Self::emit(self.writer.pop(resolved.segment, resolved.index))?;
            }
            Statement::Let(LetStatement::Array { name, index, rhs }) => {
                self.compile_expression(rhs, scopes)?;
                self.compile_expression(index, scopes)?;
                let base = self.resolve_or_err(name, scopes)?;
                Self::emit(self.writer.push(base.segment, base.index))?;
                Self::emit(self.writer.arithmetic(Arithmetic::Add))?;
                Self::emit(self.writer.pop(Segment::Pointer, 1))?;
                Self::emit(self.writer.pop(Segment::That, 0))?;
            }
            Statement::If(stmt) => self.compile_if(stmt, scopes)?,
            Statement::While(stmt) => self.compile_while(stmt, scopes)?,
            Statement::Do(call) => {
                self.compile_subroutine_call(call, scopes)?;
                Self::emit(self.writer.pop(Segment::Temp, 0))?;
            }
            Statement::Return(value) => {
                match value {
                    Some(expr) => self.compile_expression(expr, scopes)?,
                    None => Self::emit(self.writer.push(Segment::Constant, 0))?,
                }
                Self::emit(self.writer.vm_return())?;
            }
        }
        Ok(())
    }

    fn compile_if(&mut self, stmt: &IfStatement, scopes: &Scopes) -> CResult<()> {
        let n = self.next_label_salt();
        let false_label = format!("IF_FALSE{n}");
        let end_label = format!("IF_END{n}");

        self.compile_expression(&stmt.cond, scopes)?;
        Self::emit(self.writer.arithmetic(Arithmetic::Not))?;
        Self::emit(self.writer.if_goto(&false_label))?;

        for statement in &stmt.then_body {
            self.compile_statement(statement, scopes)?;
        }
        Self::emit(self.writer.goto(&end_label))?;

        Self::emit(self.writer.label(&false_label))?;
        if let Some(else_body) = &stmt.else_body {
            for statement in else_body {
                self.compile_statement(statement, scopes)?;
            }
        }
        Self::emit(self.writer.label(&end_label))?;
        Ok(())
    }

    fn compile_while(&mut self, stmt: &WhileStatement, scopes: &Scopes) -> CResult<()> {
        let n = self.next_label_salt();
        let start_label = format!("WHILE_START{n}");
        let false_label = format!("WHILE_FALSE{n}");

        Self::emit(self.writer.label(&start_label))?;
        self.compile_expression(&stmt.cond, scopes)?;
        Self::emit(self.writer.arithmetic(Arithmetic::Not))?;
        Self::emit(self.writer.if_goto(&false_label))?;

        for statement in &stmt.body {
            self.compile_statement(statement, scopes)?;
        }
        Self::emit(self.writer.goto(&start_label))?;
        Self::emit(self.writer.label(&false_label))?;
        Ok(())
    }

    fn compile_expression(&mut self, expr: &Expression, scopes: &Scopes) -> CResult<()> {
        self.compile_term(&expr.first, scopes)?;
        for (op, term) in &expr.rest {
            self.compile_term(term, scopes)?;
            self.compile_op(*op)?;
        }
        Ok(())
    }

    fn compile_op(&mut self, op: Op) -> CResult<()> {
        match op {
            Op::Add => Self::emit(self.writer.arithmetic(Arithmetic::Add)),
            Op::Sub => Self::emit(self.writer.arithmetic(Arithmetic::Sub)),
            Op::And => Self::emit(self.writer.arithmetic(Arithmetic::And)),
            Op::Or => Self::emit(self.writer.arithmetic(Arithmetic::Or)),
            Op::Lt => Self::emit(self.writer.arithmetic(Arithmetic::Lt)),
            Op::Gt => Self::emit(self.writer.arithmetic(Arithmetic::Gt)),
            Op::Eq => Self::emit(self.writer.arithmetic(Arithmetic::Eq)),
            Op::Mul => Self::emit(self.writer.call("Math", "multiply", 2)),
            Op::Div => Self::emit(self.writer.call("Math", "divide", 2)),
        }
    }

    fn compile_term(&mut self, term: &Term, scopes: &Scopes) -> CResult<()> {
        match term {
            Term::IntConst(text) => {
                // No range check, per the source language's own lexer: a
                // literal like `99999` lexes and parses successfully and is
                // pushed as-is (wrapping on overflow), not rejected.
                let value = text
                    .bytes()
                    .fold(0u16, |acc, b| acc.wrapping_mul(10).wrapping_add((b - b'0') as u16));
                Self::emit(self.writer.push(Segment::Constant, value))?;
            }
            Term::StrConst(text) => {
                Self::emit(self.writer.push(Segment::Constant, text.chars().count() as u16))?;
                Self::emit(self.writer.call("String", "new", 1))?;
                for c in text.chars() {
                    Self::emit(self.writer.push(Segment::Constant, c as u16))?;
                    Self::emit(self.writer.call("String", "appendChar", 2))?;
                }
            }
            Term::KeywordConst(KeywordConst::True) => {
                Self::emit(self.writer.push(Segment::Constant, 1))?;
                Self::emit(self.writer.arithmetic(Arithmetic::Neg))?;
            }
            Term::KeywordConst(KeywordConst::False) | Term::KeywordConst(KeywordConst::Null) => {
                Self::emit(self.writer.push(Segment::Constant, 0))?;
            }
            Term::KeywordConst(KeywordConst::This) => {
                Self::emit(self.writer.push(Segment::Pointer, 0))?;
            }
            Term::Var(name) => {
                let resolved = self.resolve_or_err(name, scopes)?;
                Self::emit(self.writer.push(resolved.segment, resolved.index))?;
            }
            Term::ArrayAccess { name, index } => {
                self.compile_expression(index, scopes)?;
                let base = self.resolve_or_err(name, scopes)?;
                Self::emit(self.writer.push(base.segment, base.index))?;
                Self::emit(self.writer.arithmetic(Arithmetic::Add))?;
                Self::emit(self.writer.pop(Segment::Pointer, 1))?;
                Self::emit(self.writer.push(Segment::That, 0))?;
            }
            Term::Paren(expr) => self.compile_expression(expr, scopes)?,
            Term::Unary { op, term } => {
                self.compile_term(term, scopes)?;
                match op {
                    UnaryOp::Neg => Self::emit(self.writer.arithmetic(Arithmetic::Neg))?,
                    UnaryOp::Not => Self::emit(self.writer.arithmetic(Arithmetic::Not))?,
                }
            }
            Term::SubCall(call) => self.compile_subroutine_call(call, scopes)?,
        }
        Ok(())
    }

    fn compile_subroutine_call(&mut self, call: &SubroutineCall, scopes: &Scopes) -> CResult<()> {
        match call {
            SubroutineCall::Plain { name, args } => {
                Self::emit(self.writer.push(Segment::Pointer, 0))?;
                for arg in args {
                    self.compile_expression(arg, scopes)?;
                }
                let class_name = self.class_name.clone();
                Self::emit(self.writer.call(&class_name, name, args.len() as u16 + 1))?;
            }
            SubroutineCall::Targeted { target, name, args } => {
                if let Some(resolved) = scopes.resolve(target) {
                    let class_name = resolved.ty.to_string();
                    Self::emit(self.writer.push(resolved.segment, resolved.index))?;
                    for arg in args {
                        self.compile_expression(arg, scopes)?;
                    }
                    Self::emit(self.writer.call(&class_name, name, args.len() as u16 + 1))?;
                } else {
                    for arg in args {
                        self.compile_expression(arg, scopes)?;
                    }
                    Self::emit(self.writer.call(target, name, args.len() as u16))?;
                }
            }
        }
        Ok(())
    }

    fn resolve_or_err<'s>(
        &self,
        name: &str,
        scopes: &Scopes<'s>,
    ) -> CResult<crate::symbol_table::Resolved<'s>> {
        scopes
            .resolve(name)
            .ok_or_else(|| CompileError::new(format!("undefined identifier '{name}'")))
    }
}

/// Compiles a single parsed class to VM text, writing through `out`.
pub fn compile(class: &Class, out: impl Write) -> CResult<()> {
    let mut writer = VmWriter::new(out);
    let mut compiler = Compiler::new(&mut writer, class.name.clone());
    compiler.compile_class(class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn compile_source(src: &str) -> String {
        let class = Parser::new(src).parse_class().expect("parses");
        let mut out = Vec::new();
        compile(&class, &mut out).expect("compiles");
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn s1_empty_function() {
        let vm = compile_source("class Foo { function void bar() { return; } }");
        assert_eq!(vm, "function Foo.bar 0\npush constant 0\nreturn\n");
    }

    #[test]
    fn s2_constructor_with_two_fields() {
        let vm = compile_source("class P { field int x, y; constructor P new() { return this; } }");
        assert_eq!(
            vm,
            "function P.new 0\n\
             push constant 2\n\
             call Memory.alloc 1\n\
             pop pointer 0\n\
             push pointer 0\n\
             return\n"
        );
    }

    #[test]
    fn s3_method_call_on_field() {
        let vm = compile_source(
            "class A { field B b; method void m() { do b.f(); return; } }",
        );
        assert_eq!(
            vm,
            "function A.m 0\n\
             push argument 0\n\
             pop pointer 0\n\
             push this 0\n\
             call B.f 1\n\
             pop temp 0\n\
             push constant 0\n\
             return\n"
        );
    }

    #[test]
    fn s4_static_call() {
        let vm = compile_source(
            "class M { method void m() { do Output.printInt(5); return; } }",
        );
        assert!(vm.contains("push constant 5\ncall Output.printInt 1\npop temp 0\n"));
    }

    #[test]
    fn s5_let_array_evaluates_rhs_before_index() {
        let vm = compile_source(
            "class S { function void f(int x, int i) { var Array a; let a[i] = x + 1; return; } }",
        );
        assert!(vm.contains(
            "push argument 0\n\
             push constant 1\n\
             add\n\
             push argument 1\n\
             push local 0\n\
             add\n\
             pop pointer 1\n\
             pop that 0\n"
        ));
    }

    #[test]
    fn s6_sequential_ifs_get_distinct_label_salts() {
        let vm = compile_source(
            "class C { function void f(boolean b) { if (b) { } if (b) { } return; } }",
        );
        assert!(vm.contains("IF_FALSE0"));
        assert!(vm.contains("IF_END0"));
        assert!(vm.contains("IF_FALSE1"));
        assert!(vm.contains("IF_END1"));
    }

    #[test]
    fn s7_string_literal() {
        let vm = compile_source("class S { function void f() { do g(\"ab\"); return; } }");
        assert!(vm.contains(
            "push constant 2\n\
             call String.new 1\n\
             push constant 97\n\
             call String.appendChar 2\n\
             push constant 98\n\
             call String.appendChar 2\n"
        ));
    }

    #[test]
    fn s8_true_lowers_to_push_one_neg() {
        let vm = compile_source("class B { function boolean f() { return true; } }");
        assert!(vm.contains("push constant 1\nneg\nreturn\n"));
    }

    #[test]
    fn s9_no_precedence_left_to_right() {
        let vm = compile_source("class E { function int f() { return 1+2*3; } }");
        assert!(vm.contains(
            "push constant 1\n\
             push constant 2\n\
             add\n\
             push constant 3\n\
             call Math.multiply 2\n"
        ));
    }

    #[test]
    fn integer_literals_are_not_range_checked() {
        let vm = compile_source("class N { function int f() { return 99999; } }");
        assert!(vm.contains("push constant 34463\nreturn\n"));
    }

    #[test]
    fn undefined_identifier_is_a_compile_error() {
        let class = Parser::new("class U { function void f() { let z = 1; return; } }")
            .parse_class()
            .expect("parses");
        let mut out = Vec::new();
        assert!(compile(&class, &mut out).is_err());
    }
}
