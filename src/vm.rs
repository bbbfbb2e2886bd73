//! Formatted emission of VM assembly directives. Stateless aside from the
//! output handle and an indentation counter (always zero for this target,
//! kept because emitters for stack-machine targets like this one commonly
//! carry the same unused-for-now knob).

use std::fmt::Display;
use std::io::{self, Write};

use crate::symbol_table::Segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arithmetic {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl Display for Arithmetic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Arithmetic::Add => "add",
            Arithmetic::Sub => "sub",
            Arithmetic::Neg => "neg",
            Arithmetic::Eq => "eq",
            Arithmetic::Gt => "gt",
            Arithmetic::Lt => "lt",
            Arithmetic::And => "and",
            Arithmetic::Or => "or",
            Arithmetic::Not => "not",
        };
        f.write_str(text)
    }
}

/// One VM directive. `Display` renders it exactly as it appears on a line
/// of output — callers never hand-format a directive string themselves.
#[derive(Debug, Clone)]
pub enum Directive {
    Push(Segment, u16),
    Pop(Segment, u16),
    Arithmetic(Arithmetic),
    Label(String),
    Goto(String),
    IfGoto(String),
    Call(String, String, u16),
    Function(String, String, u16),
    Return,
}

impl Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Directive::Push(seg, i) => write!(f, "push {seg} {i}"),
            Directive::Pop(seg, i) => write!(f, "pop {seg} {i}"),
            Directive::Arithmetic(cmd) => write!(f, "{cmd}"),
            Directive::Label(l) => write!(f, "label {l}"),
            Directive::Goto(l) => write!(f, "goto {l}"),
            Directive::IfGoto(l) => write!(f, "if-goto {l}"),
            Directive::Call(class, name, n) => write!(f, "call {class}.{name} {n}"),
            Directive::Function(class, name, n) => write!(f, "function {class}.{name} {n}"),
            Directive::Return => write!(f, "return"),
        }
    }
}

/// Writes one directive per line to any `Write` sink, with a trailing
/// newline after every line and no leading indentation.
pub struct VmWriter<W: Write> {
    out: W,
    indent: usize,
}

impl<W: Write> VmWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, indent: 0 }
    }

    fn emit(&mut self, directive: Directive) -> io::Result<()> {
        for _ in 0..self.indent {
            write!(self.out, "\t")?;
        }
        writeln!(self.out, "{directive}")
    }

    pub fn push(&mut self, segment: Segment, index: u16) -> io::Result<()> {
        self.emit(Directive::Push(segment, index))
    }

    pub fn pop(&mut self, segment: Segment, index: u16) -> io::Result<()> {
        self.emit(Directive::Pop(segment, index))
    }

    pub fn arithmetic(&mut self, cmd: Arithmetic) -> io::Result<()> {
        self.emit(Directive::Arithmetic(cmd))
    }

    pub fn label(&mut self, name: &str) -> io::Result<()> {
        self.emit(Directive::Label(name.to_string()))
    }

    pub fn goto(&mut self, name: &str) -> io::Result<()> {
        self.emit(Directive::Goto(name.to_string()))
    }

    pub fn if_goto(&mut self, name: &str) -> io::Result<()> {
        self.emit(Directive::IfGoto(name.to_string()))
    }

    pub fn call(&mut self, class: &str, name: &str, n_args: u16) -> io::Result<()> {
        self.emit(Directive::Call(class.to_string(), name.to_string(), n_args))
    }

    pub fn function(&mut self, class: &str, name: &str, n_locals: u16) -> io::Result<()> {
        self.emit(Directive::Function(
            class.to_string(),
            name.to_string(),
            n_locals,
        ))
    }

    pub fn vm_return(&mut self) -> io::Result<()> {
        self.emit(Directive::Return)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_render_in_the_expected_textual_form() {
        assert_eq!(Directive::Push(Segment::Constant, 2).to_string(), "push constant 2");
        assert_eq!(Directive::Pop(Segment::Local, 0).to_string(), "pop local 0");
        assert_eq!(Directive::Arithmetic(Arithmetic::Add).to_string(), "add");
        assert_eq!(Directive::Label("IF_FALSE0".into()).to_string(), "label IF_FALSE0");
        assert_eq!(Directive::Goto("L".into()).to_string(), "goto L");
        assert_eq!(Directive::IfGoto("L".into()).to_string(), "if-goto L");
        assert_eq!(
            Directive::Call("Math".into(), "multiply".into(), 2).to_string(),
            "call Math.multiply 2"
        );
        assert_eq!(
            Directive::Function("Foo".into(), "bar".into(), 0).to_string(),
            "function Foo.bar 0"
        );
        assert_eq!(Directive::Return.to_string(), "return");
    }

    #[test]
    fn writer_emits_one_line_per_directive_with_trailing_newline() {
        let mut buf = Vec::new();
        {
            let mut writer = VmWriter::new(&mut buf);
            writer.push(Segment::Constant, 0).unwrap();
            writer.vm_return().unwrap();
        }
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "push constant 0\nreturn\n"
        );
    }
}
