//! Source code loading with top-level structure extraction

use tree_sitter::{Node, Parser};

use crate::domain::document::{keys, Metadata};
use crate::domain::ingestion::SourceLanguage;
use crate::domain::DomainError;

/// Names of top-level definitions found in a source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceStructure {
    pub functions: Vec<String>,
    /// Classes, or struct/enum/trait definitions for Rust
    pub classes: Vec<String>,
}

impl SourceStructure {
    /// Record the names as `functions` and `classes` metadata arrays
    pub fn apply(self, metadata: &mut Metadata) {
        metadata.insert(keys::FUNCTIONS.to_string(), serde_json::json!(self.functions));
        metadata.insert(keys::CLASSES.to_string(), serde_json::json!(self.classes));
    }
}

/// Parse `code` and collect top-level function and type names
///
/// A tree that contains syntax errors counts as a failed parse.
pub fn extract_structure(
    code: &str,
    language: SourceLanguage,
) -> Result<SourceStructure, DomainError> {
    let mut parser = Parser::new();
    let grammar: tree_sitter::Language = match language {
        SourceLanguage::Python => tree_sitter_python::LANGUAGE.into(),
        SourceLanguage::Rust => tree_sitter_rust::LANGUAGE.into(),
    };

    parser
        .set_language(&grammar)
        .map_err(|e| DomainError::internal(format!("Failed to load grammar: {}", e)))?;

    let tree = parser
        .parse(code, None)
        .ok_or_else(|| DomainError::validation("source could not be parsed"))?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(DomainError::validation("source contains syntax errors"));
    }

    let mut structure = SourceStructure::default();
    let mut cursor = root.walk();

    for child in root.named_children(&mut cursor) {
        match language {
            SourceLanguage::Python => collect_python(child, code, &mut structure),
            SourceLanguage::Rust => collect_rust(child, code, &mut structure),
        }
    }

    Ok(structure)
}

fn node_name<'a>(node: Node, code: &'a str) -> Option<&'a str> {
    node.child_by_field_name("name")
        .map(|name| &code[name.byte_range()])
}

fn collect_python(node: Node, code: &str, structure: &mut SourceStructure) {
    match node.kind() {
        "function_definition" => {
            if let Some(name) = node_name(node, code) {
                structure.functions.push(name.to_string());
            }
        }
        "class_definition" => {
            if let Some(name) = node_name(node, code) {
                structure.classes.push(name.to_string());
            }
        }
        "decorated_definition" => {
            if let Some(definition) = node.child_by_field_name("definition") {
                collect_python(definition, code, structure);
            }
        }
        _ => {}
    }
}

fn collect_rust(node: Node, code: &str, structure: &mut SourceStructure) {
    match node.kind() {
        "function_item" => {
            if let Some(name) = node_name(node, code) {
                structure.functions.push(name.to_string());
            }
        }
        "struct_item" | "enum_item" | "trait_item" | "union_item" => {
            if let Some(name) = node_name(node, code) {
                structure.classes.push(name.to_string());
            }
        }
        _ => {}
    }
}
