// File: src/template.rs
// Purpose: Placeholder substitution for route templates

use crate::props::FlatProps;

/// Replaces every `{key}` in `template` with the display form of its value
///
/// The template is scanned once from left to right, so substituted values
/// are never scanned again. Placeholders without a matching key are left
/// verbatim.
///
/// ```
/// use pathway_router::{fill, FlatProps, Value};
///
/// let mut props = FlatProps::new();
/// props.insert("id".to_string(), Value::from("42"));
/// assert_eq!(fill("id is {id} ({missing})", &props), "id is 42 ({missing})");
/// ```
pub fn fill(template: &str, props: &FlatProps) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        filled.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let value = after
            .find('}')
            .and_then(|close| props.get(&after[..close]).map(|value| (close, value)));

        match value {
            Some((close, value)) => {
                filled.push_str(&value.to_string());
                rest = &after[close + 1..];
            }
            None => {
                // Not a known placeholder; keep the brace and rescan after it
                filled.push('{');
                rest = after;
            }
        }
    }

    filled.push_str(rest);
    filled
}
