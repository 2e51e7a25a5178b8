//! `${dotted.path}` placeholder expansion.
//!
//! Placeholders are resolved against a `serde_json::Value` tree. A resolved
//! value is HTML-escaped (`<` and `>`) before substitution; a placeholder that
//! cannot be resolved, or resolves to `null`, expands to the empty string.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([$A-Za-z_][$A-Za-z_0-9.]*)\}").expect("placeholder pattern is valid")
});

/// Expand every `${path}` placeholder in `template` using `vars`.
///
/// # Examples
///
/// ```
/// use devserve_inject::template::expand;
/// use serde_json::json;
///
/// let html = expand("<p>${error.file}</p>", &json!({ "error": { "file": "<app>.js" } }));
/// assert_eq!(html, "<p>&lt;app&gt;.js</p>");
/// ```
pub fn expand(template: &str, vars: &Value) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            lookup(vars, &caps[1])
                .and_then(render)
                .map(|text| escape_angle_brackets(&text))
                .unwrap_or_default()
        })
        .into_owned()
}

/// Walk `vars` along a dotted path.
///
/// Stops at the first segment that is missing or whose parent is not an
/// object.
pub fn lookup<'a>(vars: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(vars, |current, key| current.as_object()?.get(key))
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

fn escape_angle_brackets(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}
