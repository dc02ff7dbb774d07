//! Full pipeline integration tests — source text → tokens → syntax →
//! semantics, exercised through the public [`Frontend`] facade.

use servlang::{format_tokens, Frontend, TokenKind};

fn sample_service_src() -> &'static str {
    "service store {
        // product lookup
        route /products {
            GET {
                let limit = 10;
                let label = \"all\";
                if (limit > 0 && true) {
                    return label;
                } else {
                    return error;
                }
            }
            POST {
                let created = true;
                return created;
            }
        }
        route \"health\" {
            GET { return \"ok\"; }
        }
    }"
}

#[test]
fn valid_program_passes_every_phase() {
    let report = Frontend::run(sample_service_src());
    assert!(!report.has_lexical_anomalies());
    assert!(report.syntax.is_ok(), "syntax: {:?}", report.syntax);
    assert!(report.semantics.is_ok(), "semantics: {:?}", report.semantics);
    assert!(report.is_clean());
}

#[test]
fn token_stream_ends_in_exactly_one_eof() {
    let tokens = Frontend::tokenize(sample_service_src());
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
    assert_eq!(eofs, 1);
}

#[test]
fn comments_stay_in_raw_stream_but_not_in_formatted_view() {
    let tokens = Frontend::tokenize(sample_service_src());
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Comment));
    let formatted = format_tokens(&tokens);
    assert!(formatted.iter().all(|line| !line.contains("COMMENT")));
    assert!(formatted.iter().all(|line| !line.contains("EOF")));
}

#[test]
fn duplicate_route_fails_semantics_but_parses() {
    let src = "service s {
        route /a { GET { let x = 1; return x; } }
        route /a { GET { } }
    }";
    let report = Frontend::run(src);
    assert!(report.syntax.is_ok());
    let err = report.semantics.unwrap_err();
    assert_eq!(err.to_string(), "[Semantic] Line 3: Duplicate route '/a'");
}

#[test]
fn non_bool_condition_fails_semantics_but_parses() {
    let src = "service s { route /a { GET { if (1 + 2) { } } } }";
    let report = Frontend::run(src);
    assert!(report.syntax.is_ok());
    assert!(report.semantics.is_err());
}

#[test]
fn phases_run_independently_after_syntax_failure() {
    // Both phases traverse the same broken stream; each reports its own
    // diagnostic for the same structural problem.
    let src = "service { }";
    let report = Frontend::run(src);
    let syntax = report.syntax.unwrap_err();
    let semantics = report.semantics.unwrap_err();
    assert!(syntax.to_string().starts_with("Syntax error at line 1:"));
    assert!(semantics.to_string().starts_with("[Semantic] Line 1:"));
    assert!(syntax.to_string().contains("Expected service name"));
    assert!(semantics.to_string().contains("Expected service name"));
}

#[test]
fn lexical_anomaly_flows_into_later_phases() {
    let src = "service s { route /a { GET { let x = 1 $ 2; } } }";
    let report = Frontend::run(src);
    assert!(report.has_lexical_anomalies());
    assert!(report.syntax.is_err());
    assert!(report.semantics.is_err());
}

#[test]
fn formatted_view_categorization_is_idempotent() {
    // Re-tokenizing each displayed lexeme must reproduce its category.
    let tokens = Frontend::tokenize(sample_service_src());
    for token in tokens
        .iter()
        .filter(|t| !matches!(t.kind, TokenKind::Comment | TokenKind::Eof))
    {
        let relexed = Frontend::tokenize(&token.lexeme);
        assert_eq!(
            relexed[0].kind.display_category(),
            token.kind.display_category(),
            "category drifted for lexeme {:?}",
            token.lexeme
        );
    }
}

#[test]
fn formatted_view_shape() {
    let tokens = Frontend::tokenize("let x = \"a\";");
    let formatted = format_tokens(&tokens);
    assert_eq!(
        formatted,
        vec![
            "<LET, \"let\">",
            "<ID, \"x\">",
            "<ASIGNACION, \"=\">",
            "<LITERAL, \"\\\"a\\\"\">",
            "<DELIMITADOR, \";\">",
        ]
    );
}

#[test]
fn scopes_reset_across_method_bodies_and_services() {
    let src = "service a {
        route /r { GET { let x = 1; } PUT { let x = 2.5; } }
    }
    service b {
        route /r { GET { let x = \"s\"; return x; } }
    }";
    let report = Frontend::run(src);
    assert!(report.is_clean());
}

#[test]
fn multiple_services_parse_and_analyze() {
    let src = "service a { } service b { route /x { } }";
    let report = Frontend::run(src);
    assert!(report.is_clean());
}
