//! Line and table parsers.

use crate::record::{
    BinaryOperator, DispatchKey, DispatchKeyed, FieldSpec, InstructionDescriptor, Table,
    UnaryOperator,
};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur while reading a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("line {line}: {reason}: `{text}`")]
    MalformedLine {
        line: usize,
        reason: String,
        text: String,
    },

    #[error("line {line}: duplicate dispatch key {key} (first defined on line {first_line})")]
    DuplicateKey {
        key: DispatchKey,
        line: usize,
        first_line: usize,
    },

    #[error("line {line}: duplicate instruction {name} (first defined on line {first_line})")]
    DuplicateInstruction {
        name: String,
        line: usize,
        first_line: usize,
    },
}

fn malformed(line: usize, text: &str, reason: impl Into<String>) -> TableError {
    TableError::MalformedLine {
        line,
        reason: reason.into(),
        text: text.to_string(),
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Byte offsets of `:` characters that are not part of a `::` scope operator.
fn separator_positions(line: &str) -> Vec<usize> {
    let bytes = line.as_bytes();
    (0..bytes.len())
        .filter(|&i| {
            bytes[i] == b':'
                && (i == 0 || bytes[i - 1] != b':')
                && bytes.get(i + 1) != Some(&b':')
        })
        .collect()
}

/// Split `text` wherever `is_split` matches outside of `<...>` brackets.
fn split_top_level(text: &str, is_split: impl Fn(char) -> bool) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if depth == 0 && is_split(c) => {
                pieces.push(&text[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);
    pieces
}

fn parse_field(clause: &str, line: usize, text: &str) -> Result<FieldSpec, TableError> {
    let words: Vec<&str> = split_top_level(clause, char::is_whitespace)
        .into_iter()
        .filter(|word| !word.is_empty())
        .collect();

    match words.as_slice() {
        [type_name, field_name] => {
            if !is_identifier(field_name) {
                return Err(malformed(
                    line,
                    text,
                    format!("field name '{}' is not an identifier", field_name),
                ));
            }
            Ok(FieldSpec::new(*type_name, *field_name))
        }
        [] => Err(malformed(line, text, "empty field clause")),
        _ => Err(malformed(
            line,
            text,
            format!(
                "field clause '{}' must be exactly `type name`, found {} words",
                clause.trim(),
                words.len()
            ),
        )),
    }
}

/// Parse one instruction descriptor line.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_instruction_line(
    text: &str,
    line: usize,
) -> Result<Option<InstructionDescriptor>, TableError> {
    if is_blank(text) {
        return Ok(None);
    }

    let separators = separator_positions(text);
    let (name, operands) = match separators.as_slice() {
        [] => (text.trim(), None),
        [pos] => (text[..*pos].trim(), Some(&text[pos + 1..])),
        _ => return Err(malformed(line, text, "more than one ':' separator")),
    };

    if name.is_empty() {
        return Err(malformed(line, text, "missing instruction name"));
    }
    if !is_identifier(name) {
        return Err(malformed(
            line,
            text,
            format!("instruction name '{}' is not an identifier", name),
        ));
    }

    let mut fields = Vec::new();
    if let Some(operands) = operands {
        for clause in split_top_level(operands, |c| c == ',') {
            fields.push(parse_field(clause, line, text)?);
        }
    }

    Ok(Some(InstructionDescriptor::new(name, fields)))
}

/// Parse one binary operator line: `TOKEN OP RESULT LHS RHS`.
pub fn parse_binary_line(text: &str, line: usize) -> Result<Option<BinaryOperator>, TableError> {
    if is_blank(text) {
        return Ok(None);
    }

    match text.split_whitespace().collect::<Vec<_>>().as_slice() {
        [token, op_symbol, result_type, lhs_type, rhs_type] => Ok(Some(BinaryOperator {
            token: token.to_string(),
            op_symbol: op_symbol.to_string(),
            result_type: result_type.to_string(),
            lhs_type: lhs_type.to_string(),
            rhs_type: rhs_type.to_string(),
        })),
        words => Err(malformed(
            line,
            text,
            format!(
                "expected 5 fields (TOKEN OP RESULT LHS RHS), found {}",
                words.len()
            ),
        )),
    }
}

/// Parse one unary operator line: `TOKEN OP OPERAND`.
pub fn parse_unary_line(text: &str, line: usize) -> Result<Option<UnaryOperator>, TableError> {
    if is_blank(text) {
        return Ok(None);
    }

    match text.split_whitespace().collect::<Vec<_>>().as_slice() {
        [token, op_symbol, operand_type] => Ok(Some(UnaryOperator {
            token: token.to_string(),
            op_symbol: op_symbol.to_string(),
            operand_type: operand_type.to_string(),
        })),
        words => Err(malformed(
            line,
            text,
            format!("expected 3 fields (TOKEN OP OPERAND), found {}", words.len()),
        )),
    }
}

fn parse_table<T>(
    source: &str,
    parse_line: impl Fn(&str, usize) -> Result<Option<T>, TableError>,
) -> Result<Table<T>, TableError> {
    let mut table = Table::new();
    for (index, text) in source.lines().enumerate() {
        let line = index + 1;
        if let Some(record) = parse_line(text, line)? {
            table.push(line, record);
        }
    }
    Ok(table)
}

fn reject_duplicate_keys<T: DispatchKeyed>(table: &Table<T>) -> Result<(), TableError> {
    let mut seen: HashMap<DispatchKey, usize> = HashMap::new();
    for (line, entry) in table.iter_with_lines() {
        let key = entry.dispatch_key();
        if let Some(&first_line) = seen.get(&key) {
            return Err(TableError::DuplicateKey {
                key,
                line,
                first_line,
            });
        }
        seen.insert(key, line);
    }
    Ok(())
}

/// Parse a whole instruction descriptor table.
pub fn parse_instructions(source: &str) -> Result<Table<InstructionDescriptor>, TableError> {
    let table = parse_table(source, parse_instruction_line)?;

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (line, inst) in table.iter_with_lines() {
        if let Some(&first_line) = seen.get(inst.name.as_str()) {
            return Err(TableError::DuplicateInstruction {
                name: inst.name.clone(),
                line,
                first_line,
            });
        }
        seen.insert(&inst.name, line);
    }

    Ok(table)
}

/// Parse a whole binary operator table.
pub fn parse_binary_table(source: &str) -> Result<Table<BinaryOperator>, TableError> {
    let table = parse_table(source, parse_binary_line)?;
    reject_duplicate_keys(&table)?;
    Ok(table)
}

/// Parse a whole unary operator table.
pub fn parse_unary_table(source: &str) -> Result<Table<UnaryOperator>, TableError> {
    let table = parse_table(source, parse_unary_line)?;
    reject_duplicate_keys(&table)?;
    Ok(table)
}
