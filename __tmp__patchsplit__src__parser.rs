//! Recursive-descent parser. Every production starts with `current` already
//! loaded and returns with the first token after the production loaded.
//! Disambiguating `name` vs `name[e]` vs `name(...)` vs `name.name(...)`
//! needs one token of lookahead past `current`, which a hand-written
//! descent handles more directly than a declarative grammar would.

use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::symbol_table::{Kind, SymbolTable};
use crate::token::{Keyword, Token};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

type PResult<T> = Result<T, ParseError>;

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    fn line(&self) -> usize {
        self.lexer.current().map(Token::line).unwrap_or(0)
    }

    fn current(&self) -> Option<&Token> {
        self.lexer.current()
    }

    fn advance(&mut self) {
        self.lexer.advance();
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.line(), message.into())
    }

    fn expect_symbol(&mut self, expected: char) -> PResult<()> {
        match self.current() {
            Some(Token::Symbol(c, _)) if *c == expected => {
                self.advance();
                Ok(())
            }
            other => Err(self.error(format!(
                "expected symbol '{expected}', found {}",
                other.map(Token::describe).unwrap_or("end of input".into())
            ))),
        }
    }

    fn expect_keyword(&mut self, expected: Keyword) -> PResult<()> {
        match self.current() {
            Some(Token::Keyword(k, _)) if *k == expected => {
                self.advance();
                Ok(())
            }
            other => Err(self.error(format!(
                "expected keyword '{expected}', found {}",
                other.map(Token::describe).unwrap_or("end of input".into())
            ))),
        }
    }

    fn expect_identifier(&mut self) -> PResult<String> {
        match self.current() {
            Some(Token::Identifier(name, _)) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            other => Err(self.error(format!(
                "expected identifier, found {}",
                other.map(Token::describe).unwrap_or("end of input".into())
            ))),
        }
    }

    fn is_symbol(&self, c: char) -> bool {
        matches!(self.current(), Some(Token::Symbol(s, _)) if *s == c)
    }

    fn is_keyword(&self, k: Keyword) -> bool {
        matches!(self.current(), Some(Token::Keyword(kw, _)) if *kw == k)
    }

    /// `'int' | 'char' | 'boolean' | className`
    fn parse_type(&mut self) -> PResult<String> {
        match self.current() {
            Some(Token::Keyword(Keyword::Int, _)) => {
                self.advance();
                Ok("int".to_string())
            }
            Some(Token::Keyword(Keyword::Char, _)) => {
                self.advance();
                Ok("char".to_string())
            }
            Some(Token::Keyword(Keyword::Boolean, _)) => {
                self.advance();
                Ok("boolean".to_string())
            }
            Some(Token::Identifier(name, _)) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            other => Err(self.error(format!(
                "expected type, found {}",
                other.map(Token::describe).unwrap_or("end of input".into())
            ))),
        }
    }

    pub fn parse_class(&mut self) -> PResult<Class> {
        self.expect_keyword(Keyword::Class)?;
        let name = self.expect_identifier()?;
        self.expect_symbol('{')?;

        let mut global_table = SymbolTable::new();
        while self.is_keyword(Keyword::Static) || self.is_keyword(Keyword::Field) {
            self.parse_class_var_dec(&mut global_table)?;
        }

        let mut functions = Vec::new();
        while self.is_keyword(Keyword::Constructor)
            || self.is_keyword(Keyword::Function)
            || self.is_keyword(Keyword::Method)
        {
            functions.push(self.parse_subroutine_dec(&name)?);
        }

        self.expect_symbol('}')?;

        Ok(Class {
            name,
            global_table,
            functions,
        })
    }

    fn parse_class_var_dec(&mut self, table: &mut SymbolTable) -> PResult<()> {
        let kind = match self.current() {
            Some(Token::Keyword(Keyword::Static, _)) => Kind::Static,
            Some(Token::Keyword(Keyword::Field, _)) => Kind::Field,
            _ => return Err(self.error("expected 'static' or 'field'")),
        };
        self.advance();

        let ty = self.parse_type()?;
        let first = self.expect_identifier()?;
        table.define(&first, &ty, kind);

        while self.is_symbol(',') {
            self.advance();
            let name = self.expect_identifier()?;
            table.define(&name, &ty, kind);
        }

        self.expect_symbol(';')?;
        Ok(())
    }

    fn parse_subroutine_dec(&mut self, class_name: &str) -> PResult<Function> {
        let kind = match self.current() {
            Some(Token::Keyword(Keyword::Constructor, _)) => FunctionKind::Constructor,
            Some(Token::Keyword(Keyword::Function, _)) => FunctionKind::Function,
            Some(Token::Keyword(Keyword::Method, _)) => FunctionKind::Method,
            _ => return Err(self.error("expected 'constructor', 'function' or 'method'")),
        };
        self.advance();

        let return_type = match self.current() {
            Some(Token::Keyword(Keyword::Void, _)) => {
                self.advance();
                "void".to_string()
            }
            _ => self.parse_type()?,
        };

        let name = self.expect_identifier()?;

        let mut local_table = SymbolTable::new();
        if kind == FunctionKind::Method {
            local_table.define("this", class_name, Kind::Arg);
        }

        self.expect_symbol('(')?;
        self.parse_param_list(&mut local_table)?;
        self.expect_symbol(')')?;

        let statements = self.parse_subroutine_body(&mut local_table)?;

        Ok(Function {
            kind,
            name,
            return_type,
            local_table,
            statements,
        })
    }

    fn parse_param_list(&mut self, table: &mut SymbolTable) -> PResult<()> {
        if self.is_symbol(')') {
            return Ok(());
        }

        loop {
            let ty = self.parse_type()?;
            let name = self.expect_identifier()?;
            table.define(&name, &ty, Kind::Arg);

            if self.is_symbol(',') {
                self.advance();
                continue;
            }
            break;
        }
        Ok(())
    }

    fn parse_subroutine_body(&mut self, table: &mut SymbolTable) -> PResult<Vec<Statement>> {
        self.expect_symbol('{')?;

        while self.is_keyword(Keyword::Var) {
            self.parse_var_dec(table)?;
        }

        let statements = self.parse_statements()?;

        self.expect_symbol('}')?;
        Ok(statements)
    }

    fn parse_var_dec(&mut self, table: &mut SymbolTable) -> PResult<()> {
        self.expect_keyword(Keyword::Var)?;
        let ty = self.parse_type()?;

        let first = self.expect_identifier()?;
        table.define(&first, &ty, Kind::Var);

        while self.is_symbol(',') {
            self.advance();
            let name = self.expect_identifier()?;
            table.define(&name, &ty, Kind::Var);
        }

        self.expect_symbol(';')?;
        Ok(())
    }

    fn parse_statements(&mut self) -> PResult<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            let stmt = match self.current() {
                Some(Token::Keyword(Keyword::Let, _)) => Statement::Let(self.parse_let()?),
                Some(Token::Keyword(Keyword::If, _)) => Statement::If(self.parse_if()?),
                Some(Token::Keyword(Keyword::While, _)) => Statement::While(self.parse_while()?),
                Some(Token::Keyword(Keyword::Do, _)) => Statement::Do(self.parse_do()?),
                Some(Token::Keyword(Keyword::Return, _)) => Statement::Return(self.parse_return()?),
                _ => break,
            };
            statements.push(stmt);
        }
        Ok(statements)
    }

    fn parse_let(&mut self) -> PResult<LetStatement> {
        self.expect_keyword(Keyword::Let)?;
        let name = self.expect_identifier()?;

        if self.is_symbol('[') {
            self.advance();
            let index = self.parse_expression()?;
            self.expect_symbol(']')?;
            self.expect_symbol('=')?;
            let rhs = self.parse_expression()?;
            self.expect_symbol(';')?;
            return Ok(LetStatement::Array { name, index, rhs });
        }

        self.expect_symbol('=')?;
        let rhs = self.parse_expression()?;
        self.expect_symbol(';')?;
        Ok(LetStatement::Plain { name, rhs })
    }

    fn parse_if(&mut self) -> PResult<IfStatement> {
        self.expect_keyword(Keyword::If)?;
        self.expect_symbol('(')?;
        let cond = self.parse_expression()?;
        self.expect_symbol(')')?;

        self.expect_symbol('{')?;
        let then_body = self.parse_statements()?;
        self.expect_symbol('}')?;

        let else_body = if self.is_keyword(Keyword::Else) {
            self.advance();
            self.expect_symbol('{')?;
            let body = self.parse_statements()?;
            self.expect_symbol('}')?;
            Some(body)
        } else {
            None
        };

        Ok(IfStatement {
            cond,
            then_body,
            else_body,
        })
    }

    fn parse_while(&mut self) -> PResult<WhileStatement> {
        self.expect_keyword(Keyword::While)?;
        self.expect_symbol('(')?;
        let cond = self.parse_expression()?;
        self.expect_symbol(')')?;

        self.expect_symbol('{')?;
        let body = self.parse_statements()?;
        self.expect_symbol('}')?;

        Ok(WhileStatement { cond, body })
    }

    fn parse_do(&mut self) -> PResult<SubroutineCall> {
        self.expect_keyword(Keyword::Do)?;
        let call = self.parse_subroutine_call()?;
        self.expect_symbol(';')?;
        Ok(call)
    }

    fn parse_return(&mut self) -> PResult<Option<Expression>> {
        self.expect_keyword(Keyword::Return)?;
        if self.is_symbol(';') {
            self.advance();
            return Ok(None);
        }
        let value = self.parse_expression()?;
        self.expect_symbol(';')?;
        Ok(Some(value))
    }

    /// `name '(' exprList ')' | name '.' name '(' exprList ')'`
    fn parse_subroutine_call(&mut self) -> PResult<SubroutineCall> {
        let first = self.expect_identifier()?;

        if self.is_symbol('.') {
            self.advance();
            let name = self.expect_identifier()?;
            self.expect_symbol('(')?;
            let args = self.parse_expression_list()?;
            self.expect_symbol(')')?;
            return Ok(SubroutineCall::Targeted {
                target: first,
                name,
                args,
            });
        }

        self.expect_symbol('(')?;
        let args = self.parse_expression_list()?;
        self.expect_symbol(')')?;
        Ok(SubroutineCall::Plain { name: first, args })
    }

    fn parse_expression_list(&mut self) -> PResult<Vec<Expression>> {
        if self.is_symbol(')') {
            return Ok(Vec::new());
        }

        let mut args = vec![self.parse_expression()?];
        while self.is_symbol(',') {
            self.advance();
            args.push(self.parse_expression()?);
        }
        Ok(args)
    }

    fn parse_expression(&mut self) -> PResult<Expression> {
        let first = Box::new(self.parse_term()?);
        let mut rest = Vec::new();

        while let Some(op) = self.peek_op() {
            self.advance();
            let term = self.parse_term()?;
            rest.push((op, term));
        }

        Ok(Expression { first, rest })
    }

    fn peek_op(&self) -> Option<Op> {
        match self.current() {
            Some(Token::Symbol('+', _)) => Some(Op::Add),
            Some(Token::Symbol('-', _)) => Some(Op::Sub),
            Some(Token::Symbol('*', _)) => Some(Op::Mul),
            Some(Token::Symbol('/', _)) => Some(Op::Div),
            Some(Token::Symbol('&', _)) => Some(Op::And),
            Some(Token::Symbol('|', _)) => Some(Op::Or),
            Some(Token::Symbol('<', _)) => Some(Op::Lt),
            Some(Token::Symbol('>', _)) => Some(Op::Gt),
            Some(Token::Symbol('=', _)) => Some(Op::Eq),
            _ => None,
        }
    }

    fn parse_term(&mut self) -> PResult<Term> {
        match self.current() {
            Some(Token::IntConst(value, _)) => {
                let value = value.clone();
                self.advance();
                Ok(Term::IntConst(value))
            }
            Some(Token::StringConst(value, _)) => {
                let value = value.clone();
                self.advance();
                Ok(Term::StrConst(value))
            }
            Some(Token::Keyword(Keyword::True, _)) => {
                self.advance();
                Ok(Term::KeywordConst(KeywordConst::True))
            }
            Some(Token::Keyword(Keyword::False, _)) => {
                self.advance();
                Ok(Term::KeywordConst(KeywordConst::False))
            }
            Some(Token::Keyword(Keyword::Null, _)) => {
                self.advance();
                Ok(Term::KeywordConst(KeywordConst::Null))
            }
            Some(Token::Keyword(Keyword::This, _)) => {
                self.advance();
                Ok(Term::KeywordConst(KeywordConst::This))
            }
            Some(Token::Symbol('(', _)) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_symbol(')')?;
                Ok(Term::Paren(Box::new(expr)))
            }
            Some(Token::Symbol('-', _)) => {
                self.advance();
                Ok(Term::Unary {
                    op: UnaryOp::Neg,
                    term: Box::new(self.parse_term()?),
                })
            }
            Some(Token::Symbol('~', _)) => {
                self.advance();
                Ok(Term::Unary {
                    op: UnaryOp::Not,
                    term: Box::new(self.parse_term()?),
                })
            }
            Some(Token::Identifier(_, _)) => self.parse_identifier_term(),
            other => Err(self.error(format!(
                "expected term, found {}",
                other.map(Token::describe).unwrap_or("end of input".into())
            ))),
        }
    }

    /// Disambiguates `name`, `name[e]`, `name(...)`, `name.name(...)` by
    /// peeking one token past the identifier.
    fn parse_identifier_term(&mut self) -> PResult<Term> {
        let name = self.expect_identifier()?;

        match self.current() {
            Some(Token::Symbol('[', _)) => {
                self.advance();
                let index = self.parse_expression()?;
                self.expect_symbol(']')?;
                Ok(Term::ArrayAccess {
                    name,
                    index: Box::new(index),
                })
            }
            Some(Token::Symbol('(', _)) => {
                self.advance();
                let args = self.parse_expression_list()?;
                self.expect_symbol(')')?;
                Ok(Term::SubCall(SubroutineCall::Plain { name, args }))
            }
            Some(Token::Symbol('.', _)) => {
                self.advance();
                let sub_name = self.expect_identifier()?;
                self.expect_symbol('(')?;
                let args = self.parse_expression_list()?;
                self.expect_symbol(')')?;
                Ok(Term::SubCall(SubroutineCall::Targeted {
                    target: name,
                    name: sub_name,
                    args,
                }))
            }
            _ => Ok(Term::Var(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Class {
        Parser::new(src).parse_class().expect("should parse")
    }

    #[test]
    fn parses_empty_function() {
        let class = parse("class Foo { function void bar() { return; } }");
        assert_eq!(class.name, "Foo");
        assert_eq!(class.functions.len(), 1);
        assert!(matches!(class.functions[0].statements[0], Statement::Return(None)));
    }

    #[test]
    fn field_declarations_populate_the_global_table() {
        let class = parse("class P { field int x, y; constructor P new() { return this; } }");
        assert_eq!(class.global_table.var_count(Kind::Field), 2);
        assert_eq!(class.global_table.index_of("x"), 0);
        assert_eq!(class.global_table.index_of("y"), 1);
    }

    #[test]
    fn method_gets_synthetic_this_as_arg_zero() {
        let class = parse("class A { method void m() { return; } }");
        let f = &class.functions[0];
        assert_eq!(f.local_table.index_of("this"), 0);
        assert_eq!(f.local_table.type_of("this"), Some("A"));
    }

    #[test]
    fn disambiguates_identifier_term_forms() {
        let class = parse(
            "class T { function void f() { var int a; let a = a; let a = a[1]; let a = g(); let a = Other.h(); return; } }",
        );
        let stmts = &class.functions[0].statements;
        match &stmts[0] {
            Statement::Let(LetStatement::Plain { rhs, .. }) => {
                assert!(matches!(*rhs.first, Term::Var(_)));
            }
            _ => panic!("expected plain let"),
        }
        match &stmts[1] {
            Statement::Let(LetStatement::Plain { rhs, .. }) => {
                assert!(matches!(*rhs.first, Term::ArrayAccess { .. }));
            }
            _ => panic!("expected plain let"),
        }
        match &stmts[2] {
            Statement::Let(LetStatement::Plain { rhs, .. }) => {
                assert!(matches!(*rhs.first, Term::SubCall(SubroutineCall::Plain { .. })));
            }
            _ => panic!("expected plain let"),
        }
        match &stmts[3] {
            Statement::Let(LetStatement::Plain { rhs, .. }) => {
                assert!(matches!(
                    *rhs.first,
                    Term::SubCall(SubroutineCall::Targeted { .. })
                ));
            }
            _ => panic!("expected plain let"),
        }
    }

    #[test]
    fn expression_has_no_precedence() {
        let class = parse("class M { function void f() { do g(1+2*3); return; } }");
        let Statement::Do(SubroutineCall::Plain { args, .. }) = &class.functions[0].statements[0]
        else {
            panic!("expected do-call");
        };
        assert_eq!(args[0].rest.len(), 2);
        assert_eq!(args[0].rest[0].0, Op::Add);
        assert_eq!(args[0].rest[1].0, Op::Mul);
    }

    #[test]
    fn reports_line_number_on_mismatch() {
        let err = Parser::new("class Foo {\n  bogus\n}")
            .parse_class()
            .unwrap_err();
        assert_eq!(err.line, 2);
    }
}


