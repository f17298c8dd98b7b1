//! Synchronized expansion
//!
//! Produces the final concrete strings for one template. All enumerable
//! slots advance in lock-step: iteration `i` substitutes `list[i mod n]`
//! for a slot of length `n`, so shorter lists wrap instead of forming a
//! cartesian product. Back-references mirror their target slot's value for
//! the current iteration and macros restore their captured text verbatim.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::slot::{SlotKind, TemplateContext};

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<<(?:MACRO|RANGE|LIST|NESTED|REF)\d+>>").unwrap());

/// Generate all expansions for a resolved context.
///
/// `backrefs` maps each back-reference token to the enumerable slot token it
/// mirrors (see [`super::resolver::resolve_back_references`]).
pub fn generate(ctx: &TemplateContext, backrefs: &HashMap<String, String>) -> Vec<String> {
    // One iteration per entry of the longest list; a template without
    // enumerable slots still produces exactly one output.
    let total = ctx
        .slots
        .iter()
        .filter(|s| s.kind.is_enumerable())
        .map(|s| s.values.len())
        .max()
        .unwrap_or(1);

    let mut expansions = Vec::with_capacity(total);
    for i in 0..total {
        let mut expanded = TOKEN_RE
            .replace_all(&ctx.tokenized, |caps: &regex::Captures| {
                substitute(ctx, backrefs, &caps[0], i)
            })
            .into_owned();
        // A comma-list element may itself carry a macro token; restore those
        // after the main substitution pass.
        for slot in ctx.slots.iter().filter(|s| s.kind == SlotKind::Macro) {
            if expanded.contains(&slot.token) {
                expanded = expanded.replace(&slot.token, &slot.raw);
            }
        }
        expansions.push(expanded);
    }
    debug!(count = expansions.len(), "expanded template");
    expansions
}

fn substitute(
    ctx: &TemplateContext,
    backrefs: &HashMap<String, String>,
    token: &str,
    iteration: usize,
) -> String {
    let Some(slot) = ctx.slot(token) else {
        return token.to_string();
    };
    match slot.kind {
        SlotKind::Macro => slot.raw.clone(),
        SlotKind::BackRef => backrefs
            .get(token)
            .and_then(|target| ctx.slot(target))
            .map(|target| cursor_value(&target.values, iteration))
            .unwrap_or_else(|| slot.raw.clone()),
        _ => cursor_value(&slot.values, iteration),
    }
}

fn cursor_value(values: &[String], iteration: usize) -> String {
    if values.is_empty() {
        return String::new();
    }
    values[iteration % values.len()].clone()
}
