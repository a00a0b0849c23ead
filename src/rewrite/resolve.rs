//! Collaborator interfaces for the rewriting engine
//!
//! The rewriter itself has no semantic knowledge: which attributes are
//! templated, what they translate to, and how method bodies are rewritten all
//! come from these capability traits. Production resolvers are table-driven;
//! tests substitute their own doubles.

use std::collections::HashMap;

use thiserror::Error;

use crate::ast::{Attribute, Block, ImportDecl, MethodDecl};
use crate::error::{Error, Result};

/// An expected, method-local failure to translate a body into final form.
///
/// This is deliberately not an [`Error`] variant: it is always caught at the
/// method boundary and converted into a synthesized failure block, never
/// surfaced as a rewrite-level error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TranslationFailure {
    message: String,
}

impl TranslationFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// The user-facing message carried by the failure
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Per-node semantic oracle consumed by the rewriter.
///
/// The `associated_*` queries are valid only after the corresponding gate
/// (`is_templated_attribute` / `has_templated_attribute`) returned true; a
/// resolver may report misuse as an error, which fails the whole rewrite.
pub trait DescriptionResolver {
    /// Is this attribute a marker that needs translation?
    fn is_templated_attribute(&self, attribute: &Attribute) -> bool;

    /// The concrete attribute type a templated attribute translates to
    fn associated_attribute_type(&self, attribute: &Attribute) -> Result<String>;

    /// The exception type thrown when a body under this attribute fails to
    /// translate
    fn associated_exception_type(&self, attribute: &Attribute) -> Result<String>;

    /// Does this method carry any templated attribute?
    fn has_templated_attribute(&self, method: &MethodDecl) -> bool {
        method.attributes.iter().any(|a| self.is_templated_attribute(a))
    }

    /// Resolved namespace text for an import directive, if any
    fn namespace_description(&self, import: &ImportDecl) -> Option<String>;
}

/// Attempts to produce the final form of a method body
pub trait StatementTransformer {
    fn transform(&self, block: &Block) -> std::result::Result<Block, TranslationFailure>;
}

/// Transformer that keeps every body as written. Used by the CLI when no
/// semantic transformer is plugged in.
#[derive(Debug, Default)]
pub struct IdentityTransformer;

impl StatementTransformer for IdentityTransformer {
    fn transform(&self, block: &Block) -> std::result::Result<Block, TranslationFailure> {
        Ok(block.clone())
    }
}

/// Description of one templated attribute
#[derive(Debug, Clone)]
pub struct AttributeDescription {
    /// Fully resolved attribute type name
    pub attribute_type: String,
    /// Exception type thrown on translation failure, for attributes that can
    /// sit on templated methods
    pub exception_type: Option<String>,
}

/// Table-driven [`DescriptionResolver`].
///
/// Attribute references match on the simple name, either bare (`Name`) or
/// behind a single qualifying segment (`Ns.Name`). Deeper qualification
/// chains are treated as not templated.
#[derive(Debug, Default)]
pub struct TableResolver {
    attributes: HashMap<String, AttributeDescription>,
    namespaces: HashMap<String, String>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver preconfigured for MSTest-style templates
    pub fn mstest() -> Self {
        let mut resolver = Self::new();
        resolver.add_attribute("TemplatedTestClass", "TestClass", None);
        resolver.add_attribute(
            "TemplatedTestMethod",
            "TestMethod",
            Some("AssertFailedException"),
        );
        resolver
    }

    /// Register a templated attribute and its translation
    pub fn add_attribute(
        &mut self,
        templated: impl Into<String>,
        attribute_type: impl Into<String>,
        exception_type: Option<&str>,
    ) -> &mut Self {
        self.attributes.insert(
            templated.into(),
            AttributeDescription {
                attribute_type: attribute_type.into(),
                exception_type: exception_type.map(str::to_string),
            },
        );
        self
    }

    /// Register a template namespace and its resolved replacement
    pub fn add_namespace(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.namespaces.insert(from.into(), to.into());
        self
    }

    /// Table entry for an attribute reference, honoring the qualification
    /// rule
    fn lookup(&self, name: &str) -> Option<&AttributeDescription> {
        let mut segments = name.rsplit('.');
        let simple = segments.next()?;
        match segments.count() {
            0 | 1 => self.attributes.get(simple),
            _ => None,
        }
    }
}

impl DescriptionResolver for TableResolver {
    fn is_templated_attribute(&self, attribute: &Attribute) -> bool {
        self.lookup(&attribute.name).is_some()
    }

    fn associated_attribute_type(&self, attribute: &Attribute) -> Result<String> {
        match self.lookup(&attribute.name) {
            Some(description) => Ok(description.attribute_type.clone()),
            None => Err(Error::semantic_error(format!(
                "attribute '{}' is not templated",
                attribute.name
            ))),
        }
    }

    fn associated_exception_type(&self, attribute: &Attribute) -> Result<String> {
        match self.lookup(&attribute.name).and_then(|d| d.exception_type.as_ref()) {
            Some(exception) => Ok(exception.clone()),
            None => Err(Error::semantic_error(format!(
                "attribute '{}' has no associated exception type",
                attribute.name
            ))),
        }
    }

    fn namespace_description(&self, import: &ImportDecl) -> Option<String> {
        self.namespaces.get(&import.name).cloned()
    }
}
