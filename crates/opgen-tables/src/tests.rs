//! Tests for table parsing.

use crate::*;

fn field(type_name: &str, field_name: &str) -> FieldSpec {
    FieldSpec::new(type_name, field_name)
}

fn assert_malformed<T: std::fmt::Debug>(result: Result<T, TableError>, expected_line: usize) {
    match result {
        Err(TableError::MalformedLine { line, .. }) => assert_eq!(line, expected_line),
        other => panic!("expected MalformedLine on line {}, got {:?}", expected_line, other),
    }
}

// =============================================================================
// Instruction descriptors
// =============================================================================

#[test]
fn test_instruction_with_one_field() {
    let inst = parse_instruction_line("InstConst  : int id", 1)
        .unwrap()
        .unwrap();
    assert_eq!(inst.name, "InstConst");
    assert_eq!(inst.fields, vec![field("int", "id")]);
}

#[test]
fn test_instruction_field_order_is_preserved() {
    let inst = parse_instruction_line("InstCast   : TypeTag from, TypeTag to", 1)
        .unwrap()
        .unwrap();
    assert_eq!(
        inst.fields,
        vec![field("TypeTag", "from"), field("TypeTag", "to")]
    );
}

#[test]
fn test_instruction_without_fields() {
    let inst = parse_instruction_line("InstNot", 1).unwrap().unwrap();
    assert_eq!(inst.name, "InstNot");
    assert!(inst.is_nullary());

    let padded = parse_instruction_line("   InstMod   ", 1).unwrap().unwrap();
    assert_eq!(padded.name, "InstMod");
}

#[test]
fn test_instruction_scoped_and_template_types() {
    let inst = parse_instruction_line("InstGetGlobal : std::string name", 1)
        .unwrap()
        .unwrap();
    assert_eq!(inst.fields, vec![field("std::string", "name")]);

    let inst = parse_instruction_line(
        "InstLabel : int pos, size_t id, std::vector<InstJump*> patches",
        1,
    )
    .unwrap()
    .unwrap();
    assert_eq!(
        inst.fields,
        vec![
            field("int", "pos"),
            field("size_t", "id"),
            field("std::vector<InstJump*>", "patches"),
        ]
    );

    let inst = parse_instruction_line("InstTable : std::map<int, TypeTag> slots", 1)
        .unwrap()
        .unwrap();
    assert_eq!(inst.fields, vec![field("std::map<int, TypeTag>", "slots")]);
}

#[test]
fn test_blank_instruction_lines_are_skipped() {
    assert_eq!(parse_instruction_line("", 1).unwrap(), None);
    assert_eq!(parse_instruction_line("   \t ", 1).unwrap(), None);
}

#[test]
fn test_malformed_instruction_lines() {
    // Field clause with a single word
    assert_malformed(parse_instruction_line("InstAdd : TypeTag", 3), 3);
    // Field clause with three words
    assert_malformed(parse_instruction_line("InstAdd : unsigned int x", 4), 4);
    // Separator without any fields
    assert_malformed(parse_instruction_line("InstAdd :", 5), 5);
    // Trailing comma leaves an empty clause
    assert_malformed(parse_instruction_line("InstAdd : int a,", 6), 6);
    // Two separators
    assert_malformed(parse_instruction_line("InstAdd : int a : int b", 7), 7);
    // Missing name
    assert_malformed(parse_instruction_line(" : int a", 8), 8);
    // Name with whitespace
    assert_malformed(parse_instruction_line("Inst Add : int a", 9), 9);
    // Pointer glued to the field name
    assert_malformed(parse_instruction_line("InstJump : InstLabel *label", 10), 10);
}

#[test]
fn test_parse_instructions_counts_non_blank_lines() {
    let source = "InstConst  : int id\n\nInstCast   : TypeTag from, TypeTag to\n\nInstNot\n";
    let table = parse_instructions(source).unwrap();
    assert_eq!(table.len(), 3);

    let names: Vec<_> = table.iter().map(|inst| inst.name.as_str()).collect();
    assert_eq!(names, vec!["InstConst", "InstCast", "InstNot"]);

    let lines: Vec<_> = table.iter_with_lines().map(|(line, _)| line).collect();
    assert_eq!(lines, vec![1, 3, 5]);
}

#[test]
fn test_parse_instructions_handles_crlf() {
    let table = parse_instructions("InstConst : int id\r\nInstNot\r\n").unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.entries()[0].fields, vec![field("int", "id")]);
}

#[test]
fn test_parse_instructions_aborts_on_first_bad_line() {
    let source = "InstConst : int id\nInstAdd : TypeTag\nInstNot\n";
    assert_malformed(parse_instructions(source), 2);
}

#[test]
fn test_duplicate_instruction_names() {
    let source = "InstAdd : TypeTag type\nInstNot\nInstAdd : int x\n";
    let err = parse_instructions(source).unwrap_err();
    assert_eq!(
        err,
        TableError::DuplicateInstruction {
            name: "InstAdd".into(),
            line: 3,
            first_line: 1,
        }
    );
}

// =============================================================================
// Operator tables
// =============================================================================

#[test]
fn test_binary_line() {
    let op = parse_binary_line("PLUS + int int int", 1).unwrap().unwrap();
    assert_eq!(op.token, "PLUS");
    assert_eq!(op.op_symbol, "+");
    assert_eq!(op.result_type, "int");
    assert_eq!(op.lhs_type, "int");
    assert_eq!(op.rhs_type, "int");

    let key = op.dispatch_key();
    assert_eq!(key.token, "PLUS");
    assert_eq!(key.operands, vec!["int".to_string(), "int".to_string()]);
    assert_eq!(DispatchKeyed::result_type(&op), "int");
}

#[test]
fn test_binary_line_arity() {
    assert_malformed(parse_binary_line("PLUS + int int", 2), 2);
    assert_malformed(parse_binary_line("PLUS + int int int int", 2), 2);
    assert_eq!(parse_binary_line("  ", 2).unwrap(), None);
}

#[test]
fn test_unary_line() {
    let op = parse_unary_line("MINUS - double", 1).unwrap().unwrap();
    assert_eq!(op.token, "MINUS");
    assert_eq!(op.op_symbol, "-");
    assert_eq!(op.result_type(), "double");
    assert_eq!(op.dispatch_key().to_string(), "MINUS(double)");

    assert_malformed(parse_unary_line("MINUS -", 4), 4);
    assert_malformed(parse_unary_line("MINUS - int int", 4), 4);
}

#[test]
fn test_binary_table_preserves_order() {
    let source = "PLUS + int int int\nLESS < bool int int\n\nPLUS + double double double\n";
    let table = parse_binary_table(source).unwrap();
    let keys: Vec<_> = table
        .iter()
        .map(|op| op.dispatch_key().to_string())
        .collect();
    assert_eq!(
        keys,
        vec!["PLUS(int, int)", "LESS(int, int)", "PLUS(double, double)"]
    );
}

#[test]
fn test_binary_table_rejects_duplicate_keys() {
    let source = "PLUS + int int int\nMINUS - int int int\nPLUS + double int int\n";
    match parse_binary_table(source) {
        Err(TableError::DuplicateKey {
            key,
            line,
            first_line,
        }) => {
            assert_eq!(key.to_string(), "PLUS(int, int)");
            assert_eq!(line, 3);
            assert_eq!(first_line, 1);
        }
        other => panic!("expected DuplicateKey, got {:?}", other),
    }
}

#[test]
fn test_same_token_different_operands_is_not_duplicate() {
    let source = "PLUS + double int double\nPLUS + double double int\n";
    assert_eq!(parse_binary_table(source).unwrap().len(), 2);
}

#[test]
fn test_unary_table_rejects_duplicate_keys() {
    let source = "MINUS - int\nBANG ! bool\nMINUS - int\n";
    assert!(matches!(
        parse_unary_table(source),
        Err(TableError::DuplicateKey { line: 3, first_line: 1, .. })
    ));
}

#[test]
fn test_malformed_operator_line_fails_whole_table() {
    let source = "PLUS + int int int\nMINUS - int int\nSTAR * int int int\n";
    assert_malformed(parse_binary_table(source), 2);
}

#[test]
fn test_error_messages_name_the_line() {
    let err = parse_binary_table("PLUS + int int").unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("line 1:"), "message: {}", message);
    assert!(message.contains("PLUS + int int"), "message: {}", message);
}

#[test]
fn test_table_kind_from_str() {
    assert_eq!("instructions".parse::<TableKind>(), Ok(TableKind::Instructions));
    assert_eq!("binary".parse::<TableKind>(), Ok(TableKind::Binary));
    assert_eq!("unr".parse::<TableKind>(), Ok(TableKind::Unary));
    assert!("ternary".parse::<TableKind>().is_err());
    assert_eq!(TableKind::Binary.to_string(), "binary");
}

#[test]
fn test_records_serialize_to_json() {
    let table = parse_binary_table("PLUS + int int int\n").unwrap();
    let json = serde_json::to_value(&table).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "entries": [{
                "token": "PLUS",
                "op_symbol": "+",
                "result_type": "int",
                "lhs_type": "int",
                "rhs_type": "int"
            }]
        })
    );
}
