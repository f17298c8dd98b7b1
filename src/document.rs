//! Document translation
//!
//! Walks the two-level `coverpoint-name → label → value` mapping of a defs
//! document and folds every template's expansions into the output document.
//! Labels whose value is not a mapping are "not of interest" and are copied
//! through verbatim. Insertion order is preserved end to end.

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::error::TranslateError;
use crate::template::expand_template;

/// Translate a whole defs document into its expanded CGF form.
pub fn translate_value(input: &Value) -> Result<Value, TranslateError> {
    let coverpoints = input.as_mapping().ok_or(TranslateError::NotAMapping)?;

    let mut output = Mapping::new();
    for (cov_name, labels) in coverpoints {
        let Some(labels) = labels.as_mapping() else {
            // A coverpoint with a non-mapping body carries no templates.
            output.insert(cov_name.clone(), labels.clone());
            continue;
        };
        let mut out_labels = Mapping::new();
        for (label, value) in labels {
            out_labels.insert(label.clone(), translate_label(value)?);
        }
        debug!(coverpoint = ?cov_name, labels = out_labels.len(), "translated coverpoint");
        output.insert(cov_name.clone(), Value::Mapping(out_labels));
    }
    Ok(Value::Mapping(output))
}

/// Expand every template key under one label; non-mapping label values pass
/// through unchanged.
fn translate_label(value: &Value) -> Result<Value, TranslateError> {
    let Some(templates) = value.as_mapping() else {
        return Ok(value.clone());
    };

    let mut expanded = Mapping::new();
    for (template, weight) in templates {
        let Some(template) = template.as_str() else {
            // Keep non-string keys intact rather than dropping them.
            expanded.insert(template.clone(), weight.clone());
            continue;
        };
        // Duplicate expansions collapse here by map semantics.
        for coverpoint in expand_template(template)? {
            expanded.insert(Value::String(coverpoint), Value::Number(0u64.into()));
        }
    }
    Ok(Value::Mapping(expanded))
}

/// Translate a defs document given as a YAML string.
pub fn translate_str(input: &str) -> Result<String, TranslateError> {
    let doc: Value = serde_yaml::from_str(input)?;
    let translated = translate_value(&doc)?;
    Ok(serde_yaml::to_string(&translated)?)
}

/// Translate a defs file on disk into a CGF file.
pub fn translate_file(input: &Path, output: &Path) -> Result<(), TranslateError> {
    info!(input = %input.display(), output = %output.display(), "translating defs file");
    let text = fs::read_to_string(input)?;
    let translated = translate_str(&text)?;
    fs::write(output, translated)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(yaml: &str) -> Value {
        let doc: Value = serde_yaml::from_str(yaml).unwrap();
        translate_value(&doc).unwrap()
    }

    #[test]
    fn test_range_template_expands_under_label() {
        let out = translate(
            r#"
pmp_cfg_locked:
  config:
    "pmpcfg{0 ... 2}": 0
"#,
        );
        let label = &out["pmp_cfg_locked"]["config"];
        let keys: Vec<_> = label
            .as_mapping()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec!["pmpcfg0", "pmpcfg1", "pmpcfg2"]);
        assert_eq!(label["pmpcfg1"], Value::Number(0u64.into()));
    }

    #[test]
    fn test_scalar_label_copied_verbatim() {
        let out = translate(
            r#"
pmp_cfg_locked:
  condition: check_pmp
"#,
        );
        assert_eq!(out["pmp_cfg_locked"]["condition"], Value::String("check_pmp".into()));
    }

    #[test]
    fn test_multiple_templates_accumulate_in_one_label() {
        let out = translate(
            r#"
cov:
  vals:
    "{lw, sw}": 0
    "pmpcfg{0 ... 1}": 0
"#,
        );
        let keys: Vec<_> = out["cov"]["vals"]
            .as_mapping()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec!["lw", "sw", "pmpcfg0", "pmpcfg1"]);
    }

    #[test]
    fn test_invalid_template_aborts_translation() {
        let doc: Value = serde_yaml::from_str(
            r#"
cov:
  vals:
    "pmpcfg{5 ... 2}": 0
"#,
        )
        .unwrap();
        assert!(matches!(
            translate_value(&doc),
            Err(TranslateError::Expand(_))
        ));
    }

    #[test]
    fn test_non_mapping_document_rejected() {
        let doc: Value = serde_yaml::from_str("- a\n- b\n").unwrap();
        assert!(matches!(
            translate_value(&doc),
            Err(TranslateError::NotAMapping)
        ));
    }
}
