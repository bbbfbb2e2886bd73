use std::collections::HashMap;

/// Storage classification of a defined name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Static,
    Field,
    Arg,
    Var,
}

impl Kind {
    /// The VM segment a value of this kind lives in.
    pub fn segment(&self) -> Segment {
        match self {
            Kind::Static => Segment::Static,
            Kind::Field => Segment::This,
            Kind::Arg => Segment::Argument,
            Kind::Var => Segment::Local,
        }
    }
}

/// Named VM memory region a `push`/`pop` instruction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Argument => "argument",
            Segment::Local => "local",
            Segment::Static => "static",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SymbolEntry {
    ty: String,
    kind: Kind,
    index: u16,
}

/// `NO_IDENTIFIER` sentinel for a missed `indexOf` lookup.
pub const NO_IDENTIFIER: i32 = -1;

/// Two independent symbol tables are used per class: one class-global (STATIC,
/// FIELD) and one per-subroutine local (ARG, VAR). Each owns four independent
/// monotonic counters, one per `Kind`, starting at -1 and incremented on every
/// `define`.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: HashMap<String, SymbolEntry>,
    static_count: u16,
    field_count: u16,
    arg_count: u16,
    var_count: u16,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next free index for `kind` and inserts `name`.
    pub fn define(&mut self, name: &str, ty: &str, kind: Kind) {
        let index = self.bump(kind);
        self.entries.insert(
            name.to_string(),
            SymbolEntry {
                ty: ty.to_string(),
                kind,
                index,
            },
        );
    }

    fn bump(&mut self, kind: Kind) -> u16 {
        let counter = match kind {
            Kind::Static => &mut self.static_count,
            Kind::Field => &mut self.field_count,
            Kind::Arg => &mut self.arg_count,
            Kind::Var => &mut self.var_count,
        };
        let index = *counter;
        *counter += 1;
        index
    }

    /// Number of entries defined so far for `kind`.
    pub fn var_count(&self, kind: Kind) -> u16 {
        match kind {
            Kind::Static => self.static_count,
            Kind::Field => self.field_count,
            Kind::Arg => self.arg_count,
            Kind::Var => self.var_count,
        }
    }

    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.entries.get(name).map(|e| e.kind)
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.ty.as_str())
    }

    pub fn index_of(&self, name: &str) -> i32 {
        self.entries
            .get(name)
            .map(|e| e.index as i32)
            .unwrap_or(NO_IDENTIFIER)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

/// A resolved variable: where it lives and what it was declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub kind: Kind,
    pub segment: Segment,
    pub index: u16,
    pub ty: &'a str,
}

/// Bundles a subroutine's local table with its enclosing class's global
/// table and implements the engine's fixed lookup order: local first, then
/// global. A name found in neither is not a variable at all — it is treated
/// as a class name (for `Term::Var`/call resolution), never as an error by
/// itself.
pub struct Scopes<'a> {
    pub local: &'a SymbolTable,
    pub global: &'a SymbolTable,
}

impl<'a> Scopes<'a> {
    pub fn new(local: &'a SymbolTable, global: &'a SymbolTable) -> Self {
        Self { local, global }
    }

    pub fn resolve(&self, name: &str) -> Option<Resolved<'a>> {
        if let Some(entry) = self.local.entries.get(name) {
            return Some(Resolved {
                kind: entry.kind,
                segment: entry.kind.segment(),
                index: entry.index,
                ty: entry.ty.as_str(),
            });
        }
        self.global.entries.get(name).map(|entry| Resolved {
            kind: entry.kind,
            segment: entry.kind.segment(),
            index: entry.index,
            ty: entry.ty.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero_and_increment_independently() {
        let mut table = SymbolTable::new();
        table.define("a", "int", Kind::Var);
        table.define("b", "int", Kind::Var);
        table.define("c", "int", Kind::Arg);

        assert_eq!(table.index_of("a"), 0);
        assert_eq!(table.index_of("b"), 1);
        assert_eq!(table.index_of("c"), 0);
        assert_eq!(table.var_count(Kind::Var), 2);
        assert_eq!(table.var_count(Kind::Arg), 1);
    }

    #[test]
    fn miss_returns_sentinels() {
        let table = SymbolTable::new();
        assert_eq!(table.index_of("nope"), NO_IDENTIFIER);
        assert_eq!(table.kind_of("nope"), None);
        assert_eq!(table.type_of("nope"), None);
    }

    #[test]
    fn kind_maps_to_expected_segment() {
        assert!(matches!(Kind::Var.segment(), Segment::Local));
        assert!(matches!(Kind::Arg.segment(), Segment::Argument));
        assert!(matches!(Kind::Field.segment(), Segment::This));
        assert!(matches!(Kind::Static.segment(), Segment::Static));
    }
}


