//! Per-template expansion state
//!
//! A [`TemplateContext`] owns every slot minted while tokenizing one template
//! and is discarded once that template's expansions have been emitted. Slot
//! kinds are an explicit enum so resolution dispatch is exhaustive.

/// The placeholder family a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// `${...}` — opaque macro reference, restored verbatim.
    Macro,
    /// `{a ... b}` — inclusive integer range.
    Range,
    /// `{v1, v2, ...}` — literal comma-separated enumeration.
    CommaList,
    /// `{{a ... b} OP d}` — range transformed element-wise.
    NestedRange,
    /// `{{v1, v2} OP d}` — numeric comma-list transformed element-wise.
    NestedCommaList,
    /// `$n` — back-reference to the n-th enumerable slot.
    BackRef,
}

impl SlotKind {
    /// True for kinds that resolve to an ordered value list and participate
    /// in appearance order (everything except macros and back-references).
    pub fn is_enumerable(self) -> bool {
        matches!(
            self,
            SlotKind::Range
                | SlotKind::CommaList
                | SlotKind::NestedRange
                | SlotKind::NestedCommaList
        )
    }
}

/// One placeholder occurrence: the opaque token standing in for it, its
/// original text, and (after resolution) its ordered substitution values.
#[derive(Debug, Clone)]
pub struct Slot {
    /// Opaque token substituted into the working template, e.g. `<<RANGE0>>`.
    pub token: String,
    pub kind: SlotKind,
    /// Original captured text, e.g. `{0 ... 3}` or `${XLEN}` or `$1`.
    pub raw: String,
    /// For nested kinds: the inner brace span, e.g. `{0 ... 3}`.
    pub inner: Option<String>,
    /// Resolved substitution values. Empty until resolution; stays empty for
    /// Macro (restored verbatim) and BackRef (mirrors its target).
    pub values: Vec<String>,
}

/// Exclusive per-template resolution state: the tokenized string, all slots,
/// and the appearance order of enumerable slots.
#[derive(Debug, Default)]
pub struct TemplateContext {
    /// Template text with every placeholder replaced by its slot token.
    pub tokenized: String,
    pub slots: Vec<Slot>,
    /// Tokens of enumerable slots, ordered by where their opening brace
    /// first appeared in the original template. Back-references index into
    /// this list (1-based).
    pub appearance: Vec<String>,
}

impl TemplateContext {
    pub fn slot(&self, token: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.token == token)
    }

    /// Mint the next token for `kind` and record the slot.
    pub fn add_slot(&mut self, kind: SlotKind, raw: String, inner: Option<String>) -> String {
        let tag = match kind {
            SlotKind::Macro => "MACRO",
            SlotKind::Range => "RANGE",
            SlotKind::CommaList => "LIST",
            SlotKind::NestedRange | SlotKind::NestedCommaList => "NESTED",
            SlotKind::BackRef => "REF",
        };
        let token = format!("<<{}{}>>", tag, self.slots.len());
        self.slots.push(Slot {
            token: token.clone(),
            kind,
            raw,
            inner,
            values: Vec::new(),
        });
        token
    }
}
