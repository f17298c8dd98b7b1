//! CGF Translator - coverpoint template expansion
//!
//! Expands the compact defs notation for hardware coverage coverpoints into
//! fully enumerated CGF documents. A template may contain integer ranges
//! (`pmpcfg{0 ... 3}`), literal comma-lists (`{lw, sw, csrrs}`), nested
//! range-with-operation expressions (`{{0 ... 3} * 4}`), back-references
//! (`$1`) tracking an earlier placeholder's current value, and opaque
//! `${...}` macros that pass through for a downstream resolver.
//!
//! All placeholders in one template advance together: expansion produces one
//! output per entry of the longest resolved list, with shorter lists
//! wrapping. There is no cartesian product.
//!
//! ## Quick Start
//!
//! ```rust
//! use cgf_translator::expand_template;
//!
//! let out = expand_template("(pmpcfg{0 ... 2} >> 8) and (pmpcfg$1)").unwrap();
//! assert_eq!(out[1], "(pmpcfg1 >> 8) and (pmpcfg1)");
//! ```

// Core error handling
pub mod error;

// Template expansion core: tokenizer, resolvers, combinator
pub mod template;

// Defs document → CGF document translation
pub mod document;

pub use document::{translate_file, translate_str, translate_value};
pub use error::{ExpandError, TranslateError};
pub use template::expand_template;
