//! # Variable Expansion
//!
//! Substitutes `{{name}}` placeholders from the session variable table.
//! Unknown names stay in the output verbatim so an unset variable is
//! visible in the echoed command instead of silently disappearing.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Variable name to replacement text
pub type VariableTable = BTreeMap<String, String>;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern is valid"));

/// Expand every `{{name}}` placeholder found in `template`
pub fn expand_variables(template: &str, variables: &VariableTable) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names referenced by `template` that have no entry in `variables`
pub fn unresolved_variables(template: &str, variables: &VariableTable) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .filter(|name| !variables.contains_key(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> VariableTable {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn expand_should_replace_known_variable() {
        let vars = table(&[("user", "42")]);
        assert_eq!(expand_variables("id={{user}}", &vars), "id=42");
    }

    #[test]
    fn expand_should_leave_unknown_variable_verbatim() {
        let vars = VariableTable::new();
        assert_eq!(expand_variables("id={{user}}", &vars), "id={{user}}");
    }

    #[test]
    fn expand_should_handle_adjacent_placeholders() {
        let vars = table(&[("host", "api.local"), ("port", "8080")]);
        assert_eq!(
            expand_variables("{{host}}{{port}}{{missing}}", &vars),
            "api.local8080{{missing}}"
        );
    }

    #[test]
    fn expand_should_replace_inside_quoted_segments() {
        let vars = table(&[("token", "abc")]);
        assert_eq!(
            expand_variables(r#"-H 'X-Token: {{token}}' -d "{\"t\":\"{{token}}\"}""#, &vars),
            r#"-H 'X-Token: abc' -d "{\"t\":\"abc\"}""#
        );
    }

    #[test]
    fn expand_should_ignore_non_word_names() {
        let vars = table(&[("a-b", "x")]);
        assert_eq!(expand_variables("{{a-b}} {{ a }}", &vars), "{{a-b}} {{ a }}");
    }

    #[test]
    fn expand_should_not_reexpand_substituted_text() {
        let vars = table(&[("a", "{{b}}"), ("b", "nope")]);
        assert_eq!(expand_variables("{{a}}", &vars), "{{b}}");
    }

    #[test]
    fn unresolved_should_list_missing_names_in_order() {
        let vars = table(&[("known", "1")]);
        assert_eq!(
            unresolved_variables("{{x}} {{known}} {{y}}", &vars),
            vec!["x".to_string(), "y".to_string()]
        );
    }
}
