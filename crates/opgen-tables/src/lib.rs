//! Descriptor and operator tables for opgen.
//!
//! A table is plain text with one entity per line. Three kinds exist:
//!
//! - Instruction descriptors: `Name[ : Type field[, Type field]*]`
//! - Binary operators: `TOKEN OP RESULT_TYPE LHS_TYPE RHS_TYPE`
//! - Unary operators: `TOKEN OP OPERAND_TYPE`
//!
//! Example:
//! ```text
//! InstConst  : int id
//! InstCast   : TypeTag from, TypeTag to
//! InstNot
//! ```
//!
//! Blank lines are skipped. Any other line that does not reduce to a record
//! fails the whole table.

mod parser;
mod record;

pub use parser::{
    parse_binary_line, parse_binary_table, parse_instruction_line, parse_instructions,
    parse_unary_line, parse_unary_table, TableError,
};
pub use record::{
    BinaryOperator, DispatchKey, DispatchKeyed, FieldSpec, InstructionDescriptor, Table,
    TableKind, UnaryOperator,
};

#[cfg(test)]
mod tests;
