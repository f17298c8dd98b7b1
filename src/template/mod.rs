//! Template expansion core
//!
//! One call to [`expand_template`] takes a template through the full
//! pipeline: tokenize → resolve slots → resolve back-references → generate.
//! The per-template [`TemplateContext`] is created and discarded inside the
//! call; no state is shared across templates.

pub mod combinator;
pub mod resolver;
pub mod slot;
pub mod tokenizer;

pub use slot::{Slot, SlotKind, TemplateContext};

use crate::error::ExpandError;

/// Expand one coverpoint template into its concrete strings, in iteration
/// order.
///
/// A placeholder-free template expands to exactly one string, identical to
/// the input.
///
/// ```
/// use cgf_translator::expand_template;
///
/// let out = expand_template("pmpcfg{0 ... 2}").unwrap();
/// assert_eq!(out, vec!["pmpcfg0", "pmpcfg1", "pmpcfg2"]);
/// ```
pub fn expand_template(template: &str) -> Result<Vec<String>, ExpandError> {
    let mut ctx = tokenizer::tokenize(template)?;
    resolver::resolve_slots(&mut ctx)?;
    let backrefs = resolver::resolve_back_references(&ctx)?;
    Ok(combinator::generate(&ctx, &backrefs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expansion_is_idempotent_on_expanded_output() {
        let first = expand_template("pmpcfg{0 ... 2}").unwrap();
        for expanded in &first {
            assert_eq!(expand_template(expanded).unwrap(), vec![expanded.clone()]);
        }
    }

    #[test]
    fn test_misnested_braces_rejected_not_expanded() {
        assert!(matches!(
            expand_template("x{4 + {0 ... 3}}"),
            Err(ExpandError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn test_invalid_range_surfaces() {
        assert!(matches!(
            expand_template("pmpcfg{5 ... 2}"),
            Err(ExpandError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_mixed_template_from_the_defs_format() {
        let out = expand_template(
            "(pmpcfg{{0 ... 3} * 4} & 0x80 == 0x80) and (pmpaddr{0 ... 3}) ^ (pmpaddr$2) == 0x00",
        )
        .unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(
            out[1],
            "(pmpcfg4 & 0x80 == 0x80) and (pmpaddr1) ^ (pmpaddr1) == 0x00"
        );
    }
}
