//! Token kinds produced by the lexer.

use std::fmt::Display;

use lazy_static::lazy_static;
use std::collections::HashMap;

/// The closed set of reserved words in the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Keyword::Class => "class",
            Keyword::Constructor => "constructor",
            Keyword::Function => "function",
            Keyword::Method => "method",
            Keyword::Field => "field",
            Keyword::Static => "static",
            Keyword::Var => "var",
            Keyword::Int => "int",
            Keyword::Char => "char",
            Keyword::Boolean => "boolean",
            Keyword::Void => "void",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::This => "this",
            Keyword::Let => "let",
            Keyword::Do => "do",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Return => "return",
        };
        f.write_str(text)
    }
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, Keyword> = {
        let mut m = HashMap::new();
        m.insert("class", Keyword::Class);
        m.insert("constructor", Keyword::Constructor);
        m.insert("function", Keyword::Function);
        m.insert("method", Keyword::Method);
        m.insert("field", Keyword::Field);
        m.insert("static", Keyword::Static);
        m.insert("var", Keyword::Var);
        m.insert("int", Keyword::Int);
        m.insert("char", Keyword::Char);
        m.insert("boolean", Keyword::Boolean);
        m.insert("void", Keyword::Void);
        m.insert("true", Keyword::True);
        m.insert("false", Keyword::False);
        m.insert("null", Keyword::Null);
        m.insert("this", Keyword::This);
        m.insert("let", Keyword::Let);
        m.insert("do", Keyword::Do);
        m.insert("if", Keyword::If);
        m.insert("else", Keyword::Else);
        m.insert("while", Keyword::While);
        m.insert("return", Keyword::Return);
        m
    };
}

/// Folds `word` into a [`Keyword`] if it names one of the reserved words.
pub fn lookup_keyword(word: &str) -> Option<Keyword> {
    KEYWORDS.get(word).copied()
}

/// The fixed set of single-character symbols recognised by the lexer.
pub const SYMBOLS: &str = "{}()[].,;+-*/&|<>=~";

/// A lexed token, tagged with the line it was found on.
///
/// Five shapes only: a token is either a keyword, a single-char symbol, an
/// identifier, a decimal integer literal (kept as text, never parsed here),
/// or the raw contents of a string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Keyword(Keyword, usize),
    Symbol(char, usize),
    Identifier(String, usize),
    IntConst(String, usize),
    StringConst(String, usize),
}

impl Token {
    pub fn line(&self) -> usize {
        match self {
            Token::Keyword(_, line)
            | Token::Symbol(_, line)
            | Token::Identifier(_, line)
            | Token::IntConst(_, line)
            | Token::StringConst(_, line) => *line,
        }
    }

    /// Short, human readable description of this token's shape, used in
    /// parse error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Keyword(k, _) => format!("keyword '{k}'"),
            Token::Symbol(c, _) => format!("symbol '{c}'"),
            Token::Identifier(s, _) => format!("identifier '{s}'"),
            Token::IntConst(s, _) => format!("integer constant '{s}'"),
            Token::StringConst(s, _) => format!("string constant \"{s}\""),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}
