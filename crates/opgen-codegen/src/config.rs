//! Generator configuration.
//!
//! Names of the C++ types and symbols the generated code refers to. The
//! defaults match the interpreter the tables were written for, so a config
//! file only needs the keys it changes:
//!
//! ```toml
//! [instructions]
//! includes = ["Enviroment.hpp"]
//!
//! [operators]
//! value_type = "Value::Data"
//! ```

use crate::GenerateError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Names used by the instruction hierarchy generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstructionConfig {
    /// Abstract base class every instruction derives from
    pub base_class: String,
    /// Visitor class the `accept` hook forwards to
    pub visitor_class: String,
    /// File name of the declaration artifact
    pub header_file: String,
    /// File name of the definition artifact
    pub source_file: String,
    /// File name of the visitor interface artifact
    pub visitor_file: String,
    /// Extra headers included at the top of the declaration artifact
    pub includes: Vec<String>,
}

impl Default for InstructionConfig {
    fn default() -> Self {
        Self {
            base_class: "Instruction".into(),
            visitor_class: "InstVisitor".into(),
            header_file: "Instruction.h".into(),
            source_file: "Instruction.cpp".into(),
            visitor_file: "InstVisitor.hpp".into(),
            includes: Vec::new(),
        }
    }
}

/// Names used by the operator table generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    /// Enum holding operator tokens (e.g. `TokenType::PLUS`)
    pub token_enum: String,
    /// Enum holding primitive type tags (e.g. `PrimitiveTag::INT`)
    pub type_tag_enum: String,
    /// Generic runtime value the interpreter lambdas take and return
    pub value_type: String,
    pub binary_declarations: String,
    pub binary_definitions: String,
    pub unary_declarations: String,
    pub unary_definitions: String,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            token_enum: "TokenType".into(),
            type_tag_enum: "PrimitiveTag".into(),
            value_type: "Value::Data".into(),
            binary_declarations:
                "std::vector<std::tuple<TypeChecker::BinaryFuncDef, PrimitiveTag>> TypeChecker::binaryOperations"
                    .into(),
            binary_definitions:
                "std::vector<std::tuple<Interpreter::BinaryFuncDef, Interpreter::BinaryFuncDec>> Interpreter::binaryOps"
                    .into(),
            unary_declarations:
                "std::vector<std::tuple<TypeChecker::UnaryFuncDef, PrimitiveTag>> TypeChecker::unaryOps"
                    .into(),
            unary_definitions:
                "std::vector<std::tuple<Interpreter::UnaryFuncDef, Interpreter::UnaryFuncDec>> Interpreter::unaryOps"
                    .into(),
        }
    }
}

/// Complete generator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub instructions: InstructionConfig,
    pub operators: OperatorConfig,
}

impl GeneratorConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GenerateError> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|err| GenerateError::io(path, err))?;
        Self::from_toml_str(&contents).map_err(|source| GenerateError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
