//! Template Rewriting Engine
//!
//! Single-pass, bottom-up transformation of a template tree into compilable
//! test source:
//!
//! - import directives get their namespace text replaced when the resolver
//!   supplies a resolution;
//! - type and constructor identifiers lose the marker suffix, renamed
//!   together within one type rewrite;
//! - templated attribute annotations are translated to their concrete types;
//! - method bodies under a templated attribute are delegated to the
//!   statement transformer, and a translation failure is converted into a
//!   synthesized commented-source + throw block, local to that method.
//!
//! Any node the rules do not apply to is reproduced byte-for-byte.

mod attrs;
mod inject;
pub mod resolve;

pub use resolve::{
    AttributeDescription, DescriptionResolver, IdentityTransformer, StatementTransformer,
    TableResolver, TranslationFailure,
};

use crate::ast::*;
use crate::consts;
use crate::error::{Error, Result};

/// The tree walker. Holds the injected collaborators and the marker suffix;
/// owns no tree state, so one rewriter can serve many trees.
pub struct TemplateRewriter<'a> {
    resolver: &'a dyn DescriptionResolver,
    transformer: &'a dyn StatementTransformer,
    marker_suffix: &'a str,
}

impl<'a> TemplateRewriter<'a> {
    pub fn new(
        resolver: &'a dyn DescriptionResolver,
        transformer: &'a dyn StatementTransformer,
    ) -> Self {
        Self {
            resolver,
            transformer,
            marker_suffix: consts::MARKER_SUFFIX,
        }
    }

    /// Use a different marker suffix than the default
    pub fn with_marker_suffix(mut self, suffix: &'a str) -> Self {
        self.marker_suffix = suffix;
        self
    }

    /// Rewrite a whole template source unit
    pub fn rewrite_unit(&self, unit: &CompilationUnit) -> Result<CompilationUnit> {
        let items = self.rewrite_items(&unit.items)?;
        Ok(CompilationUnit {
            items,
            trailing: unit.trailing.clone(),
            span: unit.span,
        })
    }

    fn rewrite_items(&self, items: &[Item]) -> Result<Vec<Item>> {
        items.iter().map(|item| self.rewrite_item(item)).collect()
    }

    fn rewrite_item(&self, item: &Item) -> Result<Item> {
        match item {
            Item::Import(import) => Ok(Item::Import(self.rewrite_import(import))),
            Item::Namespace(ns) => Ok(Item::Namespace(NamespaceDecl {
                head: ns.head.clone(),
                items: self.rewrite_items(&ns.items)?,
                close: ns.close.clone(),
                span: ns.span,
            })),
            Item::Type(ty) => Ok(Item::Type(self.rewrite_type(ty)?)),
        }
    }

    /// Replace only the namespace-name text when the resolver has a
    /// resolution; resolver silence is a pass-through
    fn rewrite_import(&self, import: &ImportDecl) -> ImportDecl {
        match self.resolver.namespace_description(import) {
            Some(name) => ImportDecl {
                head: import.head.clone(),
                name,
                tail: import.tail.clone(),
                span: import.span,
            },
            None => import.clone(),
        }
    }

    /// Rewrite one type declaration: attributes, the coupled
    /// type-and-constructor rename, then members bottom-up
    fn rewrite_type(&self, ty: &TypeDecl) -> Result<TypeDecl> {
        let attributes = attrs::rewrite_attributes(self.resolver, &ty.attributes)?;

        let stripped = strip_marker_suffix(&ty.name, self.marker_suffix);
        let name = stripped.unwrap_or(&ty.name).to_string();

        let members = ty
            .members
            .iter()
            .map(|member| self.rewrite_member(member, &ty.name, stripped))
            .collect::<Result<Vec<_>>>()?;

        Ok(TypeDecl {
            attributes,
            head: ty.head.clone(),
            name,
            body_head: ty.body_head.clone(),
            members,
            close: ty.close.clone(),
            span: ty.span,
        })
    }

    /// `original_name` is the enclosing type's pre-strip identifier;
    /// `stripped` is present only when that type carries the marker suffix.
    /// Constructors are renamed here and only here, as part of the enclosing
    /// type's rewrite.
    fn rewrite_member(
        &self,
        member: &Member,
        original_name: &str,
        stripped: Option<&str>,
    ) -> Result<Member> {
        match member {
            Member::Constructor(ctor) => {
                let attributes = attrs::rewrite_attributes(self.resolver, &ctor.attributes)?;
                let name = match stripped {
                    Some(new_name) if ctor.name == original_name => new_name.to_string(),
                    _ => ctor.name.clone(),
                };
                Ok(Member::Constructor(ConstructorDecl {
                    attributes,
                    head: ctor.head.clone(),
                    name,
                    tail: ctor.tail.clone(),
                    span: ctor.span,
                }))
            }
            Member::Method(method) => Ok(Member::Method(self.rewrite_method(method)?)),
            Member::Type(nested) => Ok(Member::Type(self.rewrite_type(nested)?)),
            Member::Raw(raw) => Ok(Member::Raw(raw.clone())),
        }
    }

    /// Rewrite a method declaration. The body is delegated to the statement
    /// transformer if and only if the resolver reports a templated
    /// attribute; a translation failure is converted into the synthesized
    /// failure block and never propagates past this method.
    fn rewrite_method(&self, method: &MethodDecl) -> Result<MethodDecl> {
        let attributes = attrs::rewrite_attributes(self.resolver, &method.attributes)?;

        if !self.resolver.has_templated_attribute(method) {
            return Ok(MethodDecl {
                attributes,
                head: method.head.clone(),
                body: method.body.clone(),
                span: method.span,
            });
        }

        let body = match self.transformer.transform(&method.body) {
            Ok(body) => body,
            Err(failure) => {
                let attribute = method
                    .attributes
                    .iter()
                    .find(|a| self.resolver.is_templated_attribute(a))
                    .ok_or_else(|| {
                        Error::semantic_error(
                            "resolver reported a templated method without a templated attribute",
                        )
                    })?;
                let exception = self.resolver.associated_exception_type(attribute)?;
                inject::synthesize_failure_block(
                    &method.body,
                    &exception,
                    failure.message(),
                    method.line_indent(),
                )
            }
        };

        Ok(MethodDecl {
            attributes,
            head: method.head.clone(),
            body,
            span: method.span,
        })
    }
}

/// Strip the marker suffix from an identifier, requiring a non-empty stem
fn strip_marker_suffix<'n>(name: &'n str, suffix: &str) -> Option<&'n str> {
    match name.strip_suffix(suffix) {
        Some(stem) if !stem.is_empty() => Some(stem),
        _ => None,
    }
}
