//! Records parsed from table lines.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A typed member of an instruction, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Type as written in the table (e.g. `TypeTag`, `std::vector<TypeTag>`)
    pub type_name: String,
    /// Member name
    pub field_name: String,
}

impl FieldSpec {
    pub fn new(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }
}

/// One interpreter instruction: a class name plus its ordered fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionDescriptor {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl InstructionDescriptor {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Returns true if the instruction carries no operands.
    pub fn is_nullary(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A binary operator entry: `TOKEN OP RESULT LHS RHS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinaryOperator {
    pub token: String,
    pub op_symbol: String,
    pub result_type: String,
    pub lhs_type: String,
    pub rhs_type: String,
}

/// A unary operator entry: `TOKEN OP OPERAND`.
///
/// Unary operations are closed over their operand type, so the result type
/// is the operand type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnaryOperator {
    pub token: String,
    pub op_symbol: String,
    pub operand_type: String,
}

impl UnaryOperator {
    pub fn result_type(&self) -> &str {
        &self.operand_type
    }
}

/// The (token, operand types) pair a dispatch table is indexed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DispatchKey {
    pub token: String,
    pub operands: Vec<String>,
}

impl fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.token, self.operands.join(", "))
    }
}

/// Records that occupy one slot of an operator dispatch table.
pub trait DispatchKeyed {
    fn dispatch_key(&self) -> DispatchKey;

    /// Type tag of the value the operation produces.
    fn result_type(&self) -> &str;
}

impl DispatchKeyed for BinaryOperator {
    fn dispatch_key(&self) -> DispatchKey {
        DispatchKey {
            token: self.token.clone(),
            operands: vec![self.lhs_type.clone(), self.rhs_type.clone()],
        }
    }

    fn result_type(&self) -> &str {
        &self.result_type
    }
}

impl DispatchKeyed for UnaryOperator {
    fn dispatch_key(&self) -> DispatchKey {
        DispatchKey {
            token: self.token.clone(),
            operands: vec![self.operand_type.clone()],
        }
    }

    fn result_type(&self) -> &str {
        UnaryOperator::result_type(self)
    }
}

/// An ordered sequence of records, each remembering its source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table<T> {
    entries: Vec<T>,
    #[serde(skip)]
    lines: Vec<usize>,
}

impl<T> Table<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, line: usize, entry: T) {
        self.lines.push(line);
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Iterate over `(line number, record)` pairs in table order.
    pub fn iter_with_lines(&self) -> impl Iterator<Item = (usize, &T)> {
        self.lines.iter().copied().zip(self.entries.iter())
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The three table formats opgen understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Instructions,
    Binary,
    Unary,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableKind::Instructions => "instructions",
            TableKind::Binary => "binary",
            TableKind::Unary => "unary",
        };
        f.write_str(name)
    }
}

impl FromStr for TableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instructions" | "inst" => Ok(TableKind::Instructions),
            "binary" | "bin" => Ok(TableKind::Binary),
            "unary" | "unr" => Ok(TableKind::Unary),
            other => Err(format!(
                "unknown table kind '{}' (expected instructions, binary or unary)",
                other
            )),
        }
    }
}
