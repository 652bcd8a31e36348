//! Instruction hierarchy generation.
//!
//! Each descriptor becomes a class deriving from the configured base class.
//! The base declares a pure virtual `accept`, every instruction overrides it
//! by forwarding `this` to the visitor, so the overload of `visit` picked at
//! the call site recovers the concrete instruction type.

use crate::config::InstructionConfig;
use opgen_tables::{InstructionDescriptor, Table};
use std::fmt::Write as FmtWrite;

fn write_include(output: &mut String, header: &str) -> std::fmt::Result {
    if header.starts_with('<') {
        writeln!(output, "#include {}", header)
    } else {
        writeln!(output, "#include \"{}\"", header)
    }
}

/// Write the class declaration for one instruction.
pub fn declare_instruction(
    output: &mut String,
    inst: &InstructionDescriptor,
    config: &InstructionConfig,
) -> std::fmt::Result {
    writeln!(output, "class {} : public {}", inst.name, config.base_class)?;
    writeln!(output, "{{")?;
    writeln!(output, "public:")?;

    for field in &inst.fields {
        writeln!(output, "\t{} {};", field.type_name, field.field_name)?;
    }
    if !inst.fields.is_empty() {
        writeln!(output)?;
    }

    // Constructor: parameters and initializers both follow field order
    write!(output, "\t{}(", inst.name)?;
    for (idx, field) in inst.fields.iter().enumerate() {
        if idx > 0 {
            write!(output, ", ")?;
        }
        write!(output, "{} {}", field.type_name, field.field_name)?;
    }

    if inst.fields.is_empty() {
        writeln!(output, ") {{ }}")?;
    } else {
        writeln!(output, ")")?;
        write!(output, "\t\t: ")?;
        for (idx, field) in inst.fields.iter().enumerate() {
            if idx > 0 {
                write!(output, ", ")?;
            }
            write!(output, "{0}({0})", field.field_name)?;
        }
        writeln!(output, " {{ }}")?;
    }

    writeln!(output)?;
    writeln!(
        output,
        "\tvoid accept({}* visitor) override;",
        config.visitor_class
    )?;
    writeln!(output, "}};")?;

    Ok(())
}

/// Write the `accept` definition for one instruction.
pub fn define_instruction(
    output: &mut String,
    inst: &InstructionDescriptor,
    config: &InstructionConfig,
) -> std::fmt::Result {
    writeln!(
        output,
        "void {}::accept({}* visitor)",
        inst.name, config.visitor_class
    )?;
    writeln!(output, "{{")?;
    writeln!(output, "\tvisitor->visit(this);")?;
    writeln!(output, "}}")?;
    Ok(())
}

/// Generate the declaration artifact: prelude, base class and one class per
/// instruction, in table order.
pub fn emit_declarations(
    table: &Table<InstructionDescriptor>,
    config: &InstructionConfig,
) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(&mut output, "#pragma once")?;
    writeln!(&mut output)?;

    if !config.includes.is_empty() {
        for header in &config.includes {
            write_include(&mut output, header)?;
        }
        writeln!(&mut output)?;
    }

    // Forward declarations let fields point at instructions declared later
    writeln!(&mut output, "class {};", config.visitor_class)?;
    for inst in table {
        writeln!(&mut output, "class {};", inst.name)?;
    }
    writeln!(&mut output)?;

    writeln!(&mut output, "class {}", config.base_class)?;
    writeln!(&mut output, "{{")?;
    writeln!(&mut output, "public:")?;
    writeln!(&mut output, "\tvirtual ~{}() = default;", config.base_class)?;
    writeln!(&mut output)?;
    writeln!(
        &mut output,
        "\tvirtual void accept({}* visitor) = 0;",
        config.visitor_class
    )?;
    writeln!(&mut output, "}};")?;

    for inst in table {
        writeln!(&mut output)?;
        declare_instruction(&mut output, inst, config)?;
    }

    Ok(output)
}

/// Generate the definition artifact: one `accept` body per instruction.
pub fn emit_definitions(
    table: &Table<InstructionDescriptor>,
    config: &InstructionConfig,
) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    write_include(&mut output, &config.header_file)?;
    write_include(&mut output, &config.visitor_file)?;

    for inst in table {
        writeln!(&mut output)?;
        define_instruction(&mut output, inst, config)?;
    }

    Ok(output)
}

/// Generate the visitor interface: one pure virtual `visit` overload per
/// instruction.
pub fn emit_visitor(
    table: &Table<InstructionDescriptor>,
    config: &InstructionConfig,
) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(&mut output, "#pragma once")?;
    writeln!(&mut output)?;
    write_include(&mut output, &config.header_file)?;
    writeln!(&mut output)?;

    writeln!(&mut output, "class {}", config.visitor_class)?;
    writeln!(&mut output, "{{")?;
    writeln!(&mut output, "public:")?;
    writeln!(&mut output, "\tvirtual ~{}() = default;", config.visitor_class)?;
    if !table.is_empty() {
        writeln!(&mut output)?;
    }
    for inst in table {
        writeln!(&mut output, "\tvirtual void visit({}* inst) = 0;", inst.name)?;
    }
    writeln!(&mut output, "}};")?;

    Ok(output)
}
