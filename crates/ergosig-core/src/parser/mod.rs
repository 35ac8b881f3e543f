//! Field spec parser - tokenizer, AST types, and recursive descent type parser
//!
//! Turns one `FieldSpec` into a `FieldDescriptor`. String specs are split on
//! their delimiters in priority order:
//!
//! ```text
//! "name: type; description"    ';' first, then ':' on its left side
//! "name; description"          no ':' before ';' → type str
//! "name: 'description'"        fully quoted remainder → description, type str
//! "name: type"
//! "name"
//! ```

pub mod ast;
pub mod tokenizer;
pub mod type_expr;

use crate::parser::ast::{FieldDescriptor, FieldSpec, FieldType};
use crate::parser::type_expr::parse_type_expr;
use crate::{Error, Result};

/// Parse one field spec into a descriptor
///
/// # Guarantees
/// - Pure: same spec always produces the same descriptor
/// - Lenient on types: unknown type names become `str`
///
/// # Errors
/// Returns `MalformedSpecError` for an empty name or a structurally broken
/// type expression.
///
/// # Example
/// ```
/// use ergosig::{parse_field, FieldType};
///
/// let field = parse_field(&"rating: float; Score 1-10".into()).unwrap();
/// assert_eq!(field.name, "rating");
/// assert_eq!(field.field_type, FieldType::Float);
/// assert_eq!(field.description.as_deref(), Some("Score 1-10"));
/// ```
pub fn parse_field(spec: &FieldSpec) -> Result<FieldDescriptor> {
    let descriptor = match spec {
        FieldSpec::Text(text) => parse_text(text)?,
        FieldSpec::NameAndType { name, field_type } => FieldDescriptor {
            name: field_name(name, spec)?,
            description: None,
            field_type: field_type.clone(),
        },
        FieldSpec::NameAndDescription { name, description } => FieldDescriptor {
            name: field_name(name, spec)?,
            description: non_empty(description),
            field_type: FieldType::String,
        },
        FieldSpec::Full {
            name,
            field_type,
            description,
        } => FieldDescriptor {
            name: field_name(name, spec)?,
            description: non_empty(description),
            field_type: field_type.clone(),
        },
    };

    tracing::debug!(
        name = %descriptor.name,
        field_type = %descriptor.field_type,
        described = descriptor.description.is_some(),
        "parsed field spec"
    );
    Ok(descriptor)
}

fn parse_text(text: &str) -> Result<FieldDescriptor> {
    let spec = || FieldSpec::Text(text.to_string());

    if let Some((head, description)) = text.split_once(';') {
        let (name, field_type) = match head.split_once(':') {
            Some((name, type_expr)) => {
                let field_type = parse_type_expr(type_expr).map_err(|e| e.within(text))?;
                (name, field_type)
            }
            None => (head, FieldType::String),
        };
        return Ok(FieldDescriptor {
            name: field_name(name, &spec())?,
            description: non_empty(description),
            field_type,
        });
    }

    if let Some((name, rest)) = text.split_once(':') {
        let name = field_name(name, &spec())?;
        let rest = rest.trim();
        if let Some(description) = unquote(rest) {
            return Ok(FieldDescriptor {
                name,
                description: Some(description.to_string()),
                field_type: FieldType::String,
            });
        }
        return Ok(FieldDescriptor {
            name,
            description: None,
            field_type: parse_type_expr(rest).map_err(|e| e.within(text))?,
        });
    }

    Ok(FieldDescriptor {
        name: field_name(text, &spec())?,
        description: None,
        field_type: FieldType::String,
    })
}

fn field_name(raw: &str, spec: &FieldSpec) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::malformed(spec.to_string(), "field name is empty"));
    }
    Ok(name.to_string())
}

fn non_empty(description: &str) -> Option<String> {
    let description = description.trim();
    (!description.is_empty()).then(|| description.to_string())
}

/// Inner text of a string fully wrapped in matching `'` or `"` quotes
fn unquote(s: &str) -> Option<&str> {
    ['\'', '"'].iter().find_map(|&q| {
        s.strip_prefix(q)
            .and_then(|inner| inner.strip_suffix(q))
            .filter(|inner| !inner.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(spec: impl Into<FieldSpec>) -> FieldDescriptor {
        parse_field(&spec.into()).unwrap()
    }

    fn parse_err(spec: impl Into<FieldSpec>) -> Error {
        parse_field(&spec.into()).unwrap_err()
    }

    // ── Bare names ─────────────────────────────────────

    #[test]
    fn test_bare_name() {
        assert_eq!(parse("question"), FieldDescriptor::new("question", FieldType::String));
    }

    #[test]
    fn test_bare_name_is_trimmed() {
        assert_eq!(parse("  question \t"), FieldDescriptor::new("question", FieldType::String));
    }

    #[test]
    fn test_bare_name_with_comma_is_one_field() {
        assert_eq!(parse("a, b").name, "a, b");
    }

    // ── name: type ─────────────────────────────────────

    #[test]
    fn test_name_and_type() {
        assert_eq!(parse("count: int"), FieldDescriptor::new("count", FieldType::Integer));
        assert_eq!(parse("count:int"), FieldDescriptor::new("count", FieldType::Integer));
    }

    #[test]
    fn test_name_and_generic_type() {
        assert_eq!(
            parse("tags: list[str]"),
            FieldDescriptor::new("tags", FieldType::list(FieldType::String))
        );
    }

    #[test]
    fn test_nested_generic_type() {
        assert_eq!(
            parse("x: list[dict[str,int]]").field_type,
            FieldType::list(FieldType::dict(FieldType::String, FieldType::Integer))
        );
    }

    #[test]
    fn test_unknown_type_defaults_to_string() {
        assert_eq!(parse("x: widget"), FieldDescriptor::new("x", FieldType::String));
    }

    #[test]
    fn test_empty_type_defaults_to_string() {
        assert_eq!(parse("x:"), FieldDescriptor::new("x", FieldType::String));
    }

    #[test]
    fn test_splits_at_first_colon() {
        // the remainder "str: extra" is one unknown word
        assert_eq!(parse("x: str: extra"), FieldDescriptor::new("x", FieldType::String));
    }

    // ── name: 'description' ────────────────────────────

    #[test]
    fn test_single_quoted_description() {
        assert_eq!(
            parse("query: 'User question'"),
            FieldDescriptor::new("query", FieldType::String).with_description("User question")
        );
    }

    #[test]
    fn test_double_quoted_description() {
        assert_eq!(
            parse(r#"answer: "The response""#),
            FieldDescriptor::new("answer", FieldType::String).with_description("The response")
        );
    }

    #[test]
    fn test_quoted_description_keeps_inner_quotes() {
        assert_eq!(
            parse("style: 'casual' or 'formal'").description.as_deref(),
            Some("casual' or 'formal")
        );
    }

    #[test]
    fn test_mismatched_quotes_are_a_type() {
        assert_eq!(parse(r#"x: 'desc""#), FieldDescriptor::new("x", FieldType::String));
    }

    #[test]
    fn test_empty_quotes_are_a_type() {
        assert_eq!(parse("x: ''").description, None);
    }

    // ── name: type; description ────────────────────────

    #[test]
    fn test_type_and_description() {
        assert_eq!(
            parse("limit: int; Maximum results"),
            FieldDescriptor::new("limit", FieldType::Integer).with_description("Maximum results")
        );
    }

    #[test]
    fn test_description_may_contain_delimiters() {
        assert_eq!(
            parse("query: str; The user's question: what; why").description.as_deref(),
            Some("The user's question: what; why")
        );
    }

    #[test]
    fn test_semicolon_without_colon() {
        assert_eq!(
            parse("notes; Free-form notes"),
            FieldDescriptor::new("notes", FieldType::String).with_description("Free-form notes")
        );
    }

    #[test]
    fn test_empty_description_is_absent() {
        assert_eq!(parse("x: int;  ").description, None);
    }

    #[test]
    fn test_generic_type_and_description() {
        assert_eq!(
            parse("results: list[str]; Matching items"),
            FieldDescriptor::new("results", FieldType::list(FieldType::String))
                .with_description("Matching items")
        );
    }

    #[test]
    fn test_quoted_text_after_semicolon_form_is_a_type() {
        assert_eq!(
            parse("x: 'a'; b"),
            FieldDescriptor::new("x", FieldType::String).with_description("b")
        );
    }

    // ── Free-text types ────────────────────────────────

    #[test]
    fn test_free_text_type_defaults_to_string() {
        assert_eq!(parse("x: hello, world"), FieldDescriptor::new("x", FieldType::String));
        assert_eq!(parse("x: list[str] | None"), FieldDescriptor::new("x", FieldType::String));
        assert_eq!(parse("x: int, optional"), FieldDescriptor::new("x", FieldType::String));
    }

    #[test]
    fn test_free_text_type_keeps_description() {
        assert_eq!(
            parse("x: int, optional; How many"),
            FieldDescriptor::new("x", FieldType::String).with_description("How many")
        );
    }

    // ── Tuples ─────────────────────────────────────────

    #[test]
    fn test_tuple_name_and_type() {
        assert_eq!(
            parse(("limit", FieldType::Integer)),
            FieldDescriptor::new("limit", FieldType::Integer)
        );
    }

    #[test]
    fn test_tuple_name_and_description() {
        assert_eq!(
            parse(("response", "The answer")),
            FieldDescriptor::new("response", FieldType::String).with_description("The answer")
        );
    }

    #[test]
    fn test_tuple_full() {
        assert_eq!(
            parse(("count", FieldType::Integer, "Number of results")),
            FieldDescriptor::new("count", FieldType::Integer).with_description("Number of results")
        );
    }

    #[test]
    fn test_tuple_matches_string_form() {
        assert_eq!(parse(("x", FieldType::Integer)), parse("x: int"));
        assert_eq!(parse(("x", "d")), parse("x: 'd'"));
        assert_eq!(
            parse(("x", FieldType::list(FieldType::Float), "d")),
            parse("x: list[float]; d")
        );
    }

    #[test]
    fn test_tuple_blank_description_is_absent() {
        assert_eq!(parse(("x", "")), FieldDescriptor::new("x", FieldType::String));
        assert_eq!(parse(("x", "")), parse("x;"));
        assert_eq!(parse(("x", "   ")), parse("x: ''"));
        assert_eq!(
            parse(("x", FieldType::Integer, "")),
            FieldDescriptor::new("x", FieldType::Integer)
        );
        assert_eq!(parse(("x", FieldType::Integer, " ")), parse("x: int;"));
    }

    #[test]
    fn test_typed_tuple() {
        assert_eq!(
            parse(FieldSpec::typed::<Vec<f64>>("data")),
            parse("data: list[float]")
        );
    }

    // ── Errors ─────────────────────────────────────────

    #[test]
    fn test_empty_string_rejected() {
        match parse_err("") {
            Error::MalformedSpecError { reason, .. } => assert_eq!(reason, "field name is empty"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_name_rejected() {
        assert!(matches!(parse_err(": int"), Error::MalformedSpecError { .. }));
        assert!(matches!(parse_err("  ; desc"), Error::MalformedSpecError { .. }));
        assert!(matches!(
            parse_err(("  ", FieldType::Integer)),
            Error::MalformedSpecError { .. }
        ));
    }

    #[test]
    fn test_broken_type_reports_whole_spec() {
        match parse_err("tags: list[str; Tags") {
            Error::MalformedSpecError { spec, reason } => {
                assert_eq!(spec, "\"tags: list[str; Tags\"");
                assert!(reason.contains("unclosed '['"), "{}", reason);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    // ── Determinism ────────────────────────────────────

    #[test]
    fn test_parse_determinism_100_iterations() {
        let spec = FieldSpec::from("scores: dict[str, list[float]]; Per-judge scores");
        let first = parse_field(&spec).unwrap();
        for i in 0..100 {
            let result = parse_field(&spec).unwrap();
            assert_eq!(first, result, "Determinism failure at iteration {}", i);
        }
    }

    // ── Properties ─────────────────────────────────────

    fn scalar_keyword() -> impl Strategy<Value = (&'static str, FieldType)> {
        prop_oneof![
            Just(("str", FieldType::String)),
            Just(("int", FieldType::Integer)),
            Just(("float", FieldType::Float)),
            Just(("bool", FieldType::Boolean)),
            Just(("bytes", FieldType::Bytes)),
        ]
    }

    proptest! {
        #[test]
        fn prop_bare_names_parse_to_strings(name in "[a-z_][a-z0-9_]{0,20}") {
            let field = parse_field(&FieldSpec::from(name.as_str())).unwrap();
            prop_assert_eq!(field, FieldDescriptor::new(name, FieldType::String));
        }

        #[test]
        fn prop_string_and_tuple_forms_agree(
            name in "[a-z_][a-z0-9_]{0,20}",
            (keyword, ty) in scalar_keyword(),
            description in "[A-Za-z][A-Za-z0-9 ]{0,30}[A-Za-z0-9]",
        ) {
            let text = format!("{}: {}; {}", name, keyword, description);
            let from_text = parse_field(&FieldSpec::from(text)).unwrap();
            let from_tuple = parse_field(&FieldSpec::Full {
                name: name.clone(),
                field_type: ty,
                description: description.clone(),
            }).unwrap();
            prop_assert_eq!(from_text, from_tuple);
        }

        #[test]
        fn prop_parsing_is_pure(text in "[ -~]{0,40}") {
            let spec = FieldSpec::from(text);
            prop_assert_eq!(parse_field(&spec), parse_field(&spec));
        }
    }
}
