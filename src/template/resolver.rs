//! Slot resolution
//!
//! Turns each slot's captured text into its ordered substitution values:
//! ranges expand to inclusive integer sequences, nested expressions resolve
//! their inner list and apply a trailing operation element-wise, top-level
//! comma-lists split into literal substrings. Back-references are validated
//! against the appearance order and mapped to their target slot.

use std::collections::HashMap;

use tracing::debug;

use super::slot::{SlotKind, TemplateContext};
use super::tokenizer::ELLIPSIS;
use crate::error::ExpandError;

/// The closed set of operators a nested expression may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Shl,
    Shr,
}

/// Resolve every enumerable slot in the context, in place.
pub fn resolve_slots(ctx: &mut TemplateContext) -> Result<(), ExpandError> {
    for i in 0..ctx.slots.len() {
        let (kind, raw, inner) = {
            let s = &ctx.slots[i];
            (s.kind, s.raw.clone(), s.inner.clone())
        };
        let values = match kind {
            SlotKind::Range => resolve_range(&raw)?
                .into_iter()
                .map(|v| v.to_string())
                .collect(),
            SlotKind::CommaList => split_top_level(&raw),
            SlotKind::NestedRange | SlotKind::NestedCommaList => {
                // Inner span was tokenized separately; resolve it first,
                // then apply the trailing operation element-wise.
                let inner = inner.ok_or_else(|| ExpandError::MissingOperation {
                    text: raw.clone(),
                })?;
                let list = resolve_numeric_list(&inner)?;
                resolve_nested(&raw, &inner, list)?
                    .into_iter()
                    .map(|v| v.to_string())
                    .collect()
            }
            // Macros restore verbatim; back-references mirror their target.
            SlotKind::Macro | SlotKind::BackRef => continue,
        };
        debug!(token = %ctx.slots[i].token, raw = %raw, len = values.len(), "resolved slot");
        ctx.slots[i].values = values;
    }
    Ok(())
}

/// Map every back-reference token to the enumerable slot token it mirrors.
///
/// `$n` is 1-based into the appearance order; an index past the end of it is
/// a dangling reference.
pub fn resolve_back_references(
    ctx: &TemplateContext,
) -> Result<HashMap<String, String>, ExpandError> {
    let mut targets = HashMap::new();
    for slot in ctx.slots.iter().filter(|s| s.kind == SlotKind::BackRef) {
        let index: usize =
            slot.raw
                .trim_start_matches('$')
                .parse()
                .map_err(|_| ExpandError::DanglingBackReference {
                    index: 0,
                    available: ctx.appearance.len(),
                })?;
        let target = index
            .checked_sub(1)
            .and_then(|i| ctx.appearance.get(i))
            .ok_or(ExpandError::DanglingBackReference {
                index,
                available: ctx.appearance.len(),
            })?;
        targets.insert(slot.token.clone(), target.clone());
    }
    Ok(targets)
}

/// `{a ... b}` → `[a, a+1, ..., b]`, requiring integer bounds with a <= b.
fn resolve_range(text: &str) -> Result<Vec<i64>, ExpandError> {
    let body = strip_braces(text);
    let invalid = || ExpandError::InvalidRange {
        text: text.to_string(),
    };
    let mut parts = body.split(ELLIPSIS);
    let (start, end) = match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => (
            a.trim().parse::<i64>().map_err(|_| invalid())?,
            b.trim().parse::<i64>().map_err(|_| invalid())?,
        ),
        _ => return Err(invalid()),
    };
    if start > end {
        return Err(invalid());
    }
    Ok((start..=end).collect())
}

/// Numeric resolution of a nested-inner span: a range, or the legacy
/// comma-style list where every element must be an integer.
fn resolve_numeric_list(text: &str) -> Result<Vec<i64>, ExpandError> {
    if text.contains(ELLIPSIS) {
        return resolve_range(text);
    }
    let body = strip_braces(text);
    body.split(',')
        .map(|elem| {
            elem.trim().parse::<i64>().map_err(|_| ExpandError::InvalidList {
                text: text.to_string(),
                element: elem.trim().to_string(),
            })
        })
        .collect()
}

/// Parse the trailing `OP d` of a nested expression and apply it to the
/// already-resolved inner list, flooring each result.
fn resolve_nested(raw: &str, inner: &str, list: Vec<i64>) -> Result<Vec<i64>, ExpandError> {
    // Everything between the inner span's close and the outer close brace.
    let tail = raw
        .find(inner)
        .map(|pos| &raw[pos + inner.len()..raw.len() - 1])
        .unwrap_or("");
    let (op, operand) = parse_operation(raw, tail)?;
    list.into_iter()
        .map(|x| apply_op(raw, op, x, operand))
        .collect()
}

fn parse_operation(raw: &str, tail: &str) -> Result<(Op, i64), ExpandError> {
    let missing = || ExpandError::MissingOperation {
        text: raw.to_string(),
    };
    let tail = tail.trim();
    let (op, rest) = if let Some(rest) = tail.strip_prefix("<<") {
        (Op::Shl, rest)
    } else if let Some(rest) = tail.strip_prefix(">>") {
        (Op::Shr, rest)
    } else if let Some(rest) = tail.strip_prefix('+') {
        (Op::Add, rest)
    } else if let Some(rest) = tail.strip_prefix('-') {
        (Op::Sub, rest)
    } else if let Some(rest) = tail.strip_prefix('*') {
        (Op::Mul, rest)
    } else if let Some(rest) = tail.strip_prefix('/') {
        (Op::Div, rest)
    } else {
        return Err(missing());
    };
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(missing());
    }
    let operand = rest.parse::<i64>().map_err(|_| ExpandError::InvalidOperand {
        text: raw.to_string(),
        reason: format!("'{rest}' is not an integer"),
    })?;
    Ok((op, operand))
}

/// Apply one operator with floor semantics, e.g. `{{0,8,16,24} >> 4}` gives
/// `[0, 0, 1, 1]`.
fn apply_op(raw: &str, op: Op, x: i64, d: i64) -> Result<i64, ExpandError> {
    let invalid = |reason: String| ExpandError::InvalidOperand {
        text: raw.to_string(),
        reason,
    };
    match op {
        Op::Add => Ok(x + d),
        Op::Sub => Ok(x - d),
        Op::Mul => Ok(x * d),
        Op::Div => {
            if d == 0 {
                return Err(invalid("division by zero".to_string()));
            }
            Ok(floor_div(x, d))
        }
        Op::Shl | Op::Shr => {
            let shift =
                u32::try_from(d).ok().filter(|s| *s < 64).ok_or_else(|| {
                    invalid(format!("shift count {d} out of range"))
                })?;
            Ok(match op {
                Op::Shl => x << shift,
                _ => x >> shift,
            })
        }
    }
}

/// Integer division truncating toward negative infinity.
fn floor_div(x: i64, d: i64) -> i64 {
    let q = x / d;
    if x % d != 0 && (x < 0) != (d < 0) {
        q - 1
    } else {
        q
    }
}

/// Split a top-level comma-list into trimmed literal elements; commas inside
/// parentheses do not split.
fn split_top_level(text: &str) -> Vec<String> {
    let body = strip_braces(text);
    let mut elements = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in body.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                elements.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    elements.push(current.trim().to_string());
    elements
}

fn strip_braces(text: &str) -> &str {
    text.trim()
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .unwrap_or(text)
}
