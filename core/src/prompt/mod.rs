//! Prompt Builder
//!
//! Maps a test type and the learner's form fields to the system prompt and
//! the first user message of a review session. Pure data transformation.

mod persona;
mod test_type;

pub use persona::PERSONA;
pub use test_type::TestType;

use std::collections::HashMap;

/// Placeholder substituted for any required field that is absent or blank
pub const NOT_PROVIDED: &str = "Not provided";

/// Learner-supplied form fields keyed by field name
pub type FormFields = HashMap<String, String>;

/// Prompt errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    #[error("Unknown test type: {0}")]
    UnknownTestType(String),
}

/// System prompt and first user message for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub system_prompt: String,
    pub user_message: String,
}

/// Build both prompts for a test type
///
/// Missing fields never fail the call; they resolve to [`NOT_PROVIDED`].
pub fn build_prompt(test_type: TestType, fields: &FormFields) -> BuiltPrompt {
    BuiltPrompt {
        system_prompt: system_prompt(test_type),
        user_message: user_message(test_type, fields),
    }
}

/// Persona block followed by the test type's guidance block
pub fn system_prompt(test_type: TestType) -> String {
    format!("{}\n\n{}", PERSONA, test_type.guidance())
}

/// Fill the test type's template from the form fields
pub fn user_message(test_type: TestType, fields: &FormFields) -> String {
    let resolved: HashMap<&str, &str> = test_type
        .required_fields()
        .iter()
        .map(|name| (*name, resolve_field(fields, name)))
        .collect();

    substitute(test_type.template(), &resolved)
}

/// Value of a field, or [`NOT_PROVIDED`] when absent or blank
pub fn resolve_field<'a>(fields: &'a FormFields, name: &str) -> &'a str {
    match fields.get(name) {
        Some(value) if !value.trim().is_empty() => value.as_str(),
        _ => NOT_PROVIDED,
    }
}

/// Single left-to-right pass over `template`.
///
/// Inserted values are never rescanned, so braces inside learner text stay
/// literal. Unknown `{...}` sequences are copied through unchanged.
fn substitute(template: &str, values: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match values.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn complete_fields(test_type: TestType) -> FormFields {
        test_type
            .required_fields()
            .iter()
            .map(|name| (name.to_string(), format!("value for {}", name)))
            .collect()
    }

    #[test]
    fn test_sat_scenario() {
        let form = fields(&[
            ("problem", "2x=4, find x"),
            ("choices", "A) 1 B) 2"),
            ("selectedAnswer", "A) 1"),
            ("correctAnswer", "B) 2"),
            ("work", "divided wrong"),
            ("stuck", ""),
        ]);

        let prompt = build_prompt(TestType::Sat, &form);

        assert!(prompt.user_message.contains("PROBLEM: 2x=4, find x"));
        assert!(prompt.user_message.contains("STUDENT SELECTED: A) 1"));
        assert!(prompt.user_message.contains("CORRECT ANSWER: B) 2"));
        assert!(prompt.user_message.contains("STUDENT'S WORK: divided wrong"));
        assert!(prompt
            .user_message
            .contains("WHERE STUDENT GOT STUCK: Not provided"));
    }

    #[test]
    fn test_complete_fields_appear_verbatim() {
        for test_type in TestType::all() {
            let form = complete_fields(*test_type);
            let message = user_message(*test_type, &form);

            for value in form.values() {
                assert!(message.contains(value.as_str()), "{} missing {}", test_type, value);
            }
            assert!(!message.contains(NOT_PROVIDED));
            assert!(!message.contains('{'), "unfilled slot in {}", test_type);
        }
    }

    #[test]
    fn test_missing_fields_use_placeholder() {
        for test_type in TestType::all() {
            let message = user_message(*test_type, &FormFields::new());
            assert_eq!(
                message.matches(NOT_PROVIDED).count(),
                test_type.required_fields().len()
            );
        }
    }

    #[test]
    fn test_lsat_partial_fields() {
        let form = fields(&[("stimulus", "All cats are mammals."), ("whyWrong", "   ")]);
        let message = user_message(TestType::Lsat, &form);

        assert!(message.contains("STIMULUS: All cats are mammals."));
        assert!(message.contains("USER'S SELF-DIAGNOSIS: Not provided"));
        assert!(message.contains("QUESTION & ANSWERS: Not provided"));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let mut form = complete_fields(TestType::Mcat);
        form.insert("stimulus".to_string(), "belongs to lsat".to_string());

        let message = user_message(TestType::Mcat, &form);
        assert!(!message.contains("belongs to lsat"));
    }

    #[test]
    fn test_field_values_are_not_reexpanded() {
        let form = fields(&[
            ("problem", "solve {choices} and {x}"),
            ("choices", "A) 1"),
        ]);
        let message = user_message(TestType::Sat, &form);

        assert!(message.contains("PROBLEM: solve {choices} and {x}"));
        assert!(message.contains("ANSWER CHOICES: A) 1"));
    }

    #[test]
    fn test_values_keep_surrounding_whitespace() {
        let form = fields(&[("notes", "  indented\nsecond line ")]);
        let message = user_message(TestType::Mcat, &form);
        assert!(message.contains("PASSAGE COMPREHENSION NOTES:   indented\nsecond line "));
    }

    #[test]
    fn test_system_prompt_is_persona_then_guidance() {
        for test_type in TestType::all() {
            let prompt = system_prompt(*test_type);
            let persona_at = prompt.find(PERSONA).expect("persona present");
            let guidance_at = prompt.find(test_type.guidance()).expect("guidance present");
            assert_eq!(persona_at, 0);
            assert!(guidance_at > persona_at);
            assert!(prompt.ends_with(test_type.guidance()));
        }
    }

    #[test]
    fn test_system_prompt_only_carries_own_guidance() {
        let prompt = system_prompt(TestType::Sat);
        assert!(!prompt.contains(TestType::Lsat.guidance()));
        assert!(!prompt.contains(TestType::Mcat.guidance()));
    }

    #[test]
    fn test_persona_carries_debug_instruction() {
        assert!(PERSONA.contains("\"DEBUG\""));
        assert!(PERSONA.contains("\"DEBUGGING\""));
    }

    #[test]
    fn test_debug_text_is_substituted_like_any_other() {
        let form = fields(&[("work", "DEBUG")]);
        let prompt = build_prompt(TestType::Sat, &form);
        assert!(prompt.user_message.contains("STUDENT'S WORK: DEBUG"));
        assert_eq!(prompt.system_prompt, system_prompt(TestType::Sat));
    }

    #[test]
    fn test_substitute_leaves_unknown_and_unclosed_braces() {
        let values: HashMap<&str, &str> = [("a", "1")].into_iter().collect();
        assert_eq!(substitute("{a} {b} {c", &values), "1 {b} {c");
    }
}
