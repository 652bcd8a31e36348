//! Operator dispatch table generation.
//!
//! Every table entry is keyed by its token and operand type tags. The
//! declaration tables map that key to the result type tag for the type
//! checker; the definition tables map it to a lambda the interpreter calls.

use crate::config::OperatorConfig;
use opgen_tables::{BinaryOperator, DispatchKeyed, Table, UnaryOperator};

/// Type tag enumerator for a type name (`int` -> `PrimitiveTag::INT`).
pub fn type_tag(config: &OperatorConfig, type_name: &str) -> String {
    format!("{}::{}", config.type_tag_enum, type_name.to_uppercase())
}

/// Render the dispatch key of an entry as a C++ brace initializer.
fn dispatch_key<T: DispatchKeyed>(config: &OperatorConfig, entry: &T) -> String {
    let key = entry.dispatch_key();
    let mut parts = vec![format!("{}::{}", config.token_enum, key.token)];
    parts.extend(key.operands.iter().map(|ty| type_tag(config, ty)));
    format!("{{{}}}", parts.join(", "))
}

/// Declaration entry for any keyed operator: `{key, RESULT }`.
fn declare<T: DispatchKeyed>(config: &OperatorConfig, entry: &T) -> String {
    format!(
        "{{{}, {} }}",
        dispatch_key(config, entry),
        type_tag(config, entry.result_type())
    )
}

pub fn declare_binary(config: &OperatorConfig, op: &BinaryOperator) -> String {
    declare(config, op)
}

pub fn declare_unary(config: &OperatorConfig, op: &UnaryOperator) -> String {
    declare(config, op)
}

/// Definition entry for a binary operator.
///
/// The lambda unwraps both operands as their declared types, applies the
/// operator and casts to the result type so the produced value carries the
/// declared tag.
pub fn define_binary(config: &OperatorConfig, op: &BinaryOperator) -> String {
    let value = &config.value_type;
    format!(
        "{{{key}, []({value} lhs, {value} rhs){{return {value}(static_cast<{result}>(std::get<{lhs}>(lhs) {op} std::get<{rhs}>(rhs)));}}}}",
        key = dispatch_key(config, op),
        value = value,
        result = op.result_type,
        lhs = op.lhs_type,
        rhs = op.rhs_type,
        op = op.op_symbol,
    )
}

/// Definition entry for a unary operator.
pub fn define_unary(config: &OperatorConfig, op: &UnaryOperator) -> String {
    let value = &config.value_type;
    format!(
        "{{{key}, []({value} rhs){{return {value}(static_cast<{ty}>({op} std::get<{ty}>(rhs)));}}}}",
        key = dispatch_key(config, op),
        value = value,
        ty = op.operand_type,
        op = op.op_symbol,
    )
}

/// Wrap rendered entries in the initializer of the named table.
fn emit_table(name: &str, entries: Vec<String>) -> String {
    if entries.is_empty() {
        return format!("{} = {{}};\n", name);
    }
    format!("{} = {{\n\t{}\n}};\n", name, entries.join(",\n\t"))
}

pub fn emit_binary_declarations(config: &OperatorConfig, table: &Table<BinaryOperator>) -> String {
    let entries = table.iter().map(|op| declare_binary(config, op)).collect();
    emit_table(&config.binary_declarations, entries)
}

pub fn emit_binary_definitions(config: &OperatorConfig, table: &Table<BinaryOperator>) -> String {
    let entries = table.iter().map(|op| define_binary(config, op)).collect();
    emit_table(&config.binary_definitions, entries)
}

pub fn emit_unary_declarations(config: &OperatorConfig, table: &Table<UnaryOperator>) -> String {
    let entries = table.iter().map(|op| declare_unary(config, op)).collect();
    emit_table(&config.unary_declarations, entries)
}

pub fn emit_unary_definitions(config: &OperatorConfig, table: &Table<UnaryOperator>) -> String {
    let entries = table.iter().map(|op| define_unary(config, op)).collect();
    emit_table(&config.unary_definitions, entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opgen_tables::{parse_binary_line, parse_unary_line};

    fn binary(line: &str) -> BinaryOperator {
        parse_binary_line(line, 1).unwrap().unwrap()
    }

    fn unary(line: &str) -> UnaryOperator {
        parse_unary_line(line, 1).unwrap().unwrap()
    }

    #[test]
    fn test_type_tag() {
        let config = OperatorConfig::default();
        assert_eq!(type_tag(&config, "int"), "PrimitiveTag::INT");
        assert_eq!(type_tag(&config, "double"), "PrimitiveTag::DOUBLE");
    }

    #[test]
    fn test_declare_binary() {
        let config = OperatorConfig::default();
        assert_eq!(
            declare_binary(&config, &binary("PLUS + int int int")),
            "{{TokenType::PLUS, PrimitiveTag::INT, PrimitiveTag::INT}, PrimitiveTag::INT }"
        );
        assert_eq!(
            declare_binary(&config, &binary("LESS < bool int double")),
            "{{TokenType::LESS, PrimitiveTag::INT, PrimitiveTag::DOUBLE}, PrimitiveTag::BOOL }"
        );
    }

    #[test]
    fn test_define_binary() {
        let config = OperatorConfig::default();
        assert_eq!(
            define_binary(&config, &binary("PLUS + int int int")),
            "{{TokenType::PLUS, PrimitiveTag::INT, PrimitiveTag::INT}, \
             [](Value::Data lhs, Value::Data rhs){return Value::Data(static_cast<int>(std::get<int>(lhs) + std::get<int>(rhs)));}}"
        );
    }

    #[test]
    fn test_unary_result_is_operand_type() {
        let config = OperatorConfig::default();
        let op = unary("MINUS - char");
        assert_eq!(
            declare_unary(&config, &op),
            "{{TokenType::MINUS, PrimitiveTag::CHAR}, PrimitiveTag::CHAR }"
        );
        assert_eq!(
            define_unary(&config, &op),
            "{{TokenType::MINUS, PrimitiveTag::CHAR}, \
             [](Value::Data rhs){return Value::Data(static_cast<char>(- std::get<char>(rhs)));}}"
        );
    }

    #[test]
    fn test_emit_table_layout() {
        assert_eq!(emit_table("T::ops", vec![]), "T::ops = {};\n");
        assert_eq!(
            emit_table("T::ops", vec!["a".into(), "b".into()]),
            "T::ops = {\n\ta,\n\tb\n};\n"
        );
    }

    #[test]
    fn test_custom_names() {
        let config = OperatorConfig {
            token_enum: "Tok".into(),
            type_tag_enum: "Tag".into(),
            value_type: "Val".into(),
            ..OperatorConfig::default()
        };
        assert_eq!(
            define_unary(&config, &unary("BANG ! bool")),
            "{{Tok::BANG, Tag::BOOL}, [](Val rhs){return Val(static_cast<bool>(! std::get<bool>(rhs)));}}"
        );
    }
}
