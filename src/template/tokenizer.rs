//! Placeholder tokenizer
//!
//! Scans a raw template and replaces every placeholder with an opaque slot
//! token, in a fixed priority order so outer constructs are captured before
//! their interiors could be mistaken for plain ranges:
//!
//! 1. `${...}` macro references
//! 2. nested "multi" expressions `{{...} OP d}`
//! 3. plain ranges `{a ... b}` and comma-lists `{v1, v2}`
//! 4. `$n` back-references (one token per unique literal)
//!
//! Any brace left in the literal text afterwards means the input could not
//! be tokenized unambiguously and is rejected as malformed.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::slot::{SlotKind, TemplateContext};
use crate::error::ExpandError;

static MACRO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{[^{}]*\}").unwrap());
static MULTI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\s*\{[^{}]*\}[^{}]*\}").unwrap());
static BRACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^{}]*\}").unwrap());
static BACKREF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\d+").unwrap());

// Tokens of already-consumed placeholder slots, macros excepted (a macro may
// sit inside a comma-list element and is restored after substitution). A
// brace span that swallowed one of these is nesting the multi pass did not
// capture (the operation written before the inner span, or a doubly-nested
// expression) and must be rejected, or the token would leak verbatim into
// the output.
static CONSUMED_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<<(?:RANGE|LIST|NESTED|REF)\d+>>").unwrap());

/// Marker separating a range's bounds. Also decides range vs comma-list.
pub(crate) const ELLIPSIS: &str = "...";

/// Tokenize one template into a fresh [`TemplateContext`].
///
/// The returned context carries the tokenized string, every minted slot, and
/// the appearance order of enumerable slots as a first-class output.
pub fn tokenize(template: &str) -> Result<TemplateContext, ExpandError> {
    let mut ctx = TemplateContext::default();
    let mut work = template.to_string();

    // Macros first: their contents may look range-like and must never be
    // matched by the later passes.
    while let Some(m) = MACRO_RE.find(&work) {
        let (start, end) = (m.start(), m.end());
        let raw = m.as_str().to_string();
        let token = ctx.add_slot(SlotKind::Macro, raw, None);
        work.replace_range(start..end, &token);
    }

    // Nested expressions next, capturing the inner brace span separately so
    // it can be resolved on its own before the operation is applied.
    while let Some(m) = MULTI_RE.find(&work) {
        let (start, end) = (m.start(), m.end());
        let raw = m.as_str().to_string();
        if CONSUMED_TOKEN_RE.is_match(&raw) {
            return Err(ExpandError::MalformedTemplate {
                template: template.to_string(),
            });
        }
        let inner = match BRACE_RE.find(&raw[1..]) {
            Some(im) => im.as_str().to_string(),
            None => {
                return Err(ExpandError::MalformedTemplate {
                    template: template.to_string(),
                })
            }
        };
        let kind = if inner.contains(ELLIPSIS) {
            SlotKind::NestedRange
        } else {
            SlotKind::NestedCommaList
        };
        let token = ctx.add_slot(kind, raw, Some(inner));
        work.replace_range(start..end, &token);
    }

    // Plain brace spans: the ellipsis marker splits ranges from comma-lists.
    while let Some(m) = BRACE_RE.find(&work) {
        let (start, end) = (m.start(), m.end());
        let raw = m.as_str().to_string();
        if CONSUMED_TOKEN_RE.is_match(&raw) {
            return Err(ExpandError::MalformedTemplate {
                template: template.to_string(),
            });
        }
        let kind = if raw.contains(ELLIPSIS) {
            SlotKind::Range
        } else {
            SlotKind::CommaList
        };
        let token = ctx.add_slot(kind, raw, None);
        work.replace_range(start..end, &token);
    }

    // Back-references last; repeated uses of the same literal share a token.
    let mut seen: HashMap<String, String> = HashMap::new();
    work = BACKREF_RE
        .replace_all(&work, |caps: &regex::Captures| {
            let literal = &caps[0];
            seen.entry(literal.to_string())
                .or_insert_with(|| ctx.add_slot(SlotKind::BackRef, literal.to_string(), None))
                .clone()
        })
        .into_owned();

    // The tokenizer invariant: no placeholder syntax survives in the literal
    // text. Leftover braces mean unbalanced or ambiguous input.
    if work.contains('{') || work.contains('}') {
        return Err(ExpandError::MalformedTemplate {
            template: template.to_string(),
        });
    }

    // Appearance order of enumerable slots, by position in the tokenized
    // string. Relative order is preserved by replacement, so this matches
    // the order of opening braces in the original template.
    let mut ordered: Vec<(usize, String)> = ctx
        .slots
        .iter()
        .filter(|s| s.kind.is_enumerable())
        .filter_map(|s| work.find(&s.token).map(|pos| (pos, s.token.clone())))
        .collect();
    ordered.sort_by_key(|(pos, _)| *pos);
    ctx.appearance = ordered.into_iter().map(|(_, token)| token).collect();

    ctx.tokenized = work;
    trace!(
        tokenized = %ctx.tokenized,
        slots = ctx.slots.len(),
        enumerable = ctx.appearance.len(),
        "tokenized template"
    );
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_range_token() {
        let ctx = tokenize("pmpcfg{0 ... 2}").unwrap();
        assert_eq!(ctx.slots.len(), 1);
        assert_eq!(ctx.slots[0].kind, SlotKind::Range);
        assert_eq!(ctx.slots[0].raw, "{0 ... 2}");
        assert_eq!(ctx.tokenized, format!("pmpcfg{}", ctx.slots[0].token));
    }

    #[test]
    fn test_comma_list_vs_range_split() {
        let ctx = tokenize("{lw, sw, csrrs} and {0 ... 3}").unwrap();
        let kinds: Vec<_> = ctx.slots.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SlotKind::Range, SlotKind::CommaList]);
    }

    #[test]
    fn test_macro_consumed_before_braces() {
        let ctx = tokenize("addr & ${XLEN}").unwrap();
        assert_eq!(ctx.slots.len(), 1);
        assert_eq!(ctx.slots[0].kind, SlotKind::Macro);
        assert_eq!(ctx.slots[0].raw, "${XLEN}");
        assert!(!ctx.tokenized.contains('{'));
    }

    #[test]
    fn test_nested_captures_inner_span() {
        let ctx = tokenize("pmpcfg{{0 ... 3} * 4}").unwrap();
        assert_eq!(ctx.slots.len(), 1);
        assert_eq!(ctx.slots[0].kind, SlotKind::NestedRange);
        assert_eq!(ctx.slots[0].inner.as_deref(), Some("{0 ... 3}"));
    }

    #[test]
    fn test_nested_comma_variant() {
        let ctx = tokenize("{{0, 8, 16, 24} >> 4}").unwrap();
        assert_eq!(ctx.slots[0].kind, SlotKind::NestedCommaList);
        assert_eq!(ctx.slots[0].inner.as_deref(), Some("{0, 8, 16, 24}"));
    }

    #[test]
    fn test_backref_literals_share_one_token() {
        let ctx = tokenize("pmpcfg{0 ... 2} $1 $1 $2").unwrap();
        let refs: Vec<_> = ctx
            .slots
            .iter()
            .filter(|s| s.kind == SlotKind::BackRef)
            .collect();
        assert_eq!(refs.len(), 2);
        // $1 appears twice but both occurrences use the same token.
        assert_eq!(ctx.tokenized.matches(&refs[0].token).count(), 2);
    }

    #[test]
    fn test_appearance_order_spans_passes() {
        // The plain range opens before the nested expression, even though
        // the nested pass runs first.
        let ctx = tokenize("a{0 ... 1} b{{2 ... 3} + 1} c{x, y}").unwrap();
        let kinds: Vec<_> = ctx
            .appearance
            .iter()
            .map(|t| ctx.slot(t).unwrap().kind)
            .collect();
        assert_eq!(
            kinds,
            vec![SlotKind::Range, SlotKind::NestedRange, SlotKind::CommaList]
        );
    }

    #[test]
    fn test_unbalanced_braces_are_malformed() {
        assert!(matches!(
            tokenize("pmpcfg{0 ... 2"),
            Err(ExpandError::MalformedTemplate { .. })
        ));
        assert!(matches!(
            tokenize("pmpcfg0 ... 2}"),
            Err(ExpandError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn test_operation_before_inner_span_is_malformed() {
        // `{4 + {0 ... 3}}` puts the operation before the inner span, so the
        // multi pass cannot capture it; the outer span must be rejected, not
        // tokenized around the inner slot's token.
        assert!(matches!(
            tokenize("x{4 + {0 ... 3}}"),
            Err(ExpandError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn test_doubly_nested_expression_is_malformed() {
        assert!(matches!(
            tokenize("{{{0 ... 1} + 1} * 2}"),
            Err(ExpandError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn test_literal_template_yields_no_slots() {
        let ctx = tokenize("(rs1_val >> 4) == 0").unwrap();
        assert!(ctx.slots.is_empty());
        assert_eq!(ctx.tokenized, "(rs1_val >> 4) == 0");
    }
}
