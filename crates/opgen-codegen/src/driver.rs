//! One end-to-end generation pass.
//!
//! The pass reads a table, parses every line, and emits artifacts in memory.
//! A malformed line fails the whole pass before anything is emitted.

use crate::artifact::Artifact;
use crate::config::GeneratorConfig;
use crate::{instructions, operators, GenerateError};
use opgen_tables::{parse_binary_table, parse_instructions, parse_unary_table, TableKind};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// What a generation pass produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Instruction header and `accept` definitions (plus the visitor, if enabled)
    Instructions,
    BinaryDeclarations,
    BinaryDefinitions,
    UnaryDeclarations,
    UnaryDefinitions,
}

impl Mode {
    /// The table format this mode reads.
    pub fn table_kind(self) -> TableKind {
        match self {
            Mode::Instructions => TableKind::Instructions,
            Mode::BinaryDeclarations | Mode::BinaryDefinitions => TableKind::Binary,
            Mode::UnaryDeclarations | Mode::UnaryDefinitions => TableKind::Unary,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Instructions => "instructions",
            Mode::BinaryDeclarations => "binary-decls",
            Mode::BinaryDefinitions => "binary-defs",
            Mode::UnaryDeclarations => "unary-decls",
            Mode::UnaryDefinitions => "unary-defs",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read a table from disk.
pub fn read_table(path: &Path) -> Result<String, GenerateError> {
    debug!("reading {}", path.display());
    fs::read_to_string(path).map_err(|err| GenerateError::io(path, err))
}

/// Artifacts produced by one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// Instruction header and `accept` definitions, plus the visitor
    /// interface when it was requested
    Instructions {
        declarations: Artifact,
        definitions: Artifact,
        visitor: Option<Artifact>,
    },
    /// A single operator table
    Operators(Artifact),
}

impl Generation {
    pub fn artifact_count(&self) -> usize {
        match self {
            Generation::Instructions { visitor, .. } => 2 + usize::from(visitor.is_some()),
            Generation::Operators(_) => 1,
        }
    }

    /// The artifacts in write order: declarations, definitions, visitor.
    pub fn into_artifacts(self) -> Vec<Artifact> {
        match self {
            Generation::Instructions {
                declarations,
                definitions,
                visitor,
            } => {
                let mut artifacts = vec![declarations, definitions];
                artifacts.extend(visitor);
                artifacts
            }
            Generation::Operators(artifact) => vec![artifact],
        }
    }
}

/// Runs generation passes with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
    visitor: bool,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            visitor: false,
        }
    }

    /// Also emit the visitor interface in instruction mode.
    pub fn with_visitor(mut self, visitor: bool) -> Self {
        self.visitor = visitor;
        self
    }

    /// Run one pass over `source`.
    ///
    /// Instruction mode yields the declaration and definition artifacts (and
    /// the visitor interface when enabled). Operator modes yield one artifact
    /// holding the requested table.
    pub fn generate(&self, mode: Mode, source: &str) -> Result<Generation, GenerateError> {
        let generation = match mode {
            Mode::Instructions => self.generate_instructions(source)?,
            Mode::BinaryDeclarations | Mode::BinaryDefinitions => {
                Generation::Operators(self.generate_binary(mode, source)?)
            }
            Mode::UnaryDeclarations | Mode::UnaryDefinitions => {
                Generation::Operators(self.generate_unary(mode, source)?)
            }
        };
        debug!("{}: emitted {} artifact(s)", mode, generation.artifact_count());
        Ok(generation)
    }

    /// Read the table at `path` and run one pass over it.
    pub fn generate_file(&self, mode: Mode, path: &Path) -> Result<Generation, GenerateError> {
        let source = read_table(path)?;
        self.generate(mode, &source)
    }

    fn generate_instructions(&self, source: &str) -> Result<Generation, GenerateError> {
        let config = &self.config.instructions;
        let table = parse_instructions(source)?;
        debug!("parsed {} instruction(s)", table.len());

        let visitor = if self.visitor {
            Some(Artifact::new(
                config.visitor_file.as_str(),
                instructions::emit_visitor(&table, config)?,
            ))
        } else {
            None
        };

        Ok(Generation::Instructions {
            declarations: Artifact::new(
                config.header_file.as_str(),
                instructions::emit_declarations(&table, config)?,
            ),
            definitions: Artifact::new(
                config.source_file.as_str(),
                instructions::emit_definitions(&table, config)?,
            ),
            visitor,
        })
    }

    fn generate_binary(&self, mode: Mode, source: &str) -> Result<Artifact, GenerateError> {
        let config = &self.config.operators;
        let table = parse_binary_table(source)?;
        debug!("parsed {} binary operator(s)", table.len());

        let contents = if mode == Mode::BinaryDeclarations {
            operators::emit_binary_declarations(config, &table)
        } else {
            operators::emit_binary_definitions(config, &table)
        };
        Ok(Artifact::new(format!("{}.inc", mode), contents))
    }

    fn generate_unary(&self, mode: Mode, source: &str) -> Result<Artifact, GenerateError> {
        let config = &self.config.operators;
        let table = parse_unary_table(source)?;
        debug!("parsed {} unary operator(s)", table.len());

        let contents = if mode == Mode::UnaryDeclarations {
            operators::emit_unary_declarations(config, &table)
        } else {
            operators::emit_unary_definitions(config, &table)
        };
        Ok(Artifact::new(format!("{}.inc", mode), contents))
    }
}
