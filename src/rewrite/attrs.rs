//! Attribute annotation translation
//!
//! Rewrites an attribute's type reference to its resolved name when the
//! resolver classifies it as templated; everything else about the annotation
//! (arguments, bracket trivia) is reproduced exactly.

use crate::ast::Attribute;
use crate::error::Result;
use super::resolve::DescriptionResolver;

/// Translate one attribute annotation. Not templated means untouched.
pub(crate) fn rewrite_attribute(
    resolver: &dyn DescriptionResolver,
    attribute: &Attribute,
) -> Result<Attribute> {
    if !resolver.is_templated_attribute(attribute) {
        return Ok(attribute.clone());
    }

    let resolved = resolver.associated_attribute_type(attribute)?;
    // The replacement follows the qualification shape of the original
    // reference: a bare name stays bare, a qualified name takes the resolved
    // name in full
    let name = if attribute.name.contains('.') {
        resolved
    } else {
        resolved.rsplit('.').next().unwrap_or(&resolved).to_string()
    };

    Ok(Attribute {
        leading: attribute.leading.clone(),
        open: attribute.open.clone(),
        name,
        args: attribute.args.clone(),
        close: attribute.close.clone(),
        span: attribute.span,
    })
}

/// Translate a declaration's attribute list in document order
pub(crate) fn rewrite_attributes(
    resolver: &dyn DescriptionResolver,
    attributes: &[Attribute],
) -> Result<Vec<Attribute>> {
    attributes
        .iter()
        .map(|attribute| rewrite_attribute(resolver, attribute))
        .collect()
}
