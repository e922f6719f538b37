use crate::{GmapsError, OutputKey, Result, SessionState};
use regex::Regex;
use std::sync::OnceLock;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| {
        Regex::new(r"\{+[^{}]*\}+").expect("Invalid regex pattern")
    })
}

/// Resolves a single `{name}` or `{name?}` match.
///
/// Names that are not session selections (JSON examples in prompt text, for
/// instance) are returned unchanged.
fn replace_match(state: &SessionState, match_str: &str) -> Result<String> {
    let inner = match_str.trim_matches(|c| c == '{' || c == '}').trim();
    let (name, optional) = match inner.strip_suffix('?') {
        Some(name) => (name, true),
        None => (inner, false),
    };

    let Some(key) = OutputKey::parse(name) else {
        return Ok(match_str.to_string());
    };

    match state.output(key) {
        Some(value) => Ok(value.to_string()),
        None if optional => Ok(String::new()),
        None => Err(GmapsError::State(format!("session value '{key}' has not been written"))),
    }
}

/// Substitutes session selections into an instruction template.
///
/// - `{fields}`, `{types}`, `{language}`: required, fails when unset
/// - `{fields?}` and friends: empty string when unset
/// - anything else between braces is left as written
pub fn inject_session_state(state: &SessionState, template: &str) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut last_end = 0;

    for m in placeholder_regex().find_iter(template) {
        result.push_str(&template[last_end..m.start()]);
        result.push_str(&replace_match(state, m.as_str())?);
        last_end = m.end();
    }
    result.push_str(&template[last_end..]);

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_language(code: &str) -> SessionState {
        let mut state = SessionState::new();
        state.set_output(OutputKey::Language, code).unwrap();
        state
    }

    #[test]
    fn test_required_placeholder() {
        let state = state_with_language("ja");
        let out = inject_session_state(&state, "Answer in {language}.").unwrap();
        assert_eq!(out, "Answer in ja.");
    }

    #[test]
    fn test_missing_required_placeholder_fails() {
        let err = inject_session_state(&SessionState::new(), "Mask: {fields}").unwrap_err();
        assert!(matches!(err, GmapsError::State(_)));
    }

    #[test]
    fn test_optional_placeholder() {
        let state = state_with_language("en");
        let out = inject_session_state(&state, "[{types?}] {language}").unwrap();
        assert_eq!(out, "[] en");
    }

    #[test]
    fn test_json_example_left_intact() {
        let template = r#"Output: {"fieldsMask": "places.id"}"#;
        let out = inject_session_state(&SessionState::new(), template).unwrap();
        assert_eq!(out, template);
    }

    #[test]
    fn test_unknown_name_left_intact() {
        let out = inject_session_state(&SessionState::new(), "hello {user_name}").unwrap();
        assert_eq!(out, "hello {user_name}");
    }
}
