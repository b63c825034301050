//! Property-based tests for the tokenizer and parser
//!
//! - every token's byte span slices back to text that lexes to the same token
//! - token offsets strictly increase and lines never decrease
//! - generated programs parse with one item per top-level declaration/function
//! - fully parenthesized expressions parse back to the tree that produced them

use minic::parser::{parse_source, tokenize, Token};
use proptest::prelude::*;

/// Lexemes that can be separated by whitespace without merging
fn lexeme_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_][a-z0-9_]{0,8}",
        "[0-9]{1,5}",
        "[0-9]{1,3}\\.[0-9]{0,3}",
        "\"[a-z %.]{0,8}\"",
        prop::sample::select(vec![
            "+", "-", "*", "/", "%", "^", "(", ")", "=", ";", ",", "{", "}", "[", "]", "<", ">",
            "<=", ">=", "==", "!=", "&&", "||", "!", "&", "++", "--", "+=", "-=", "*=", "/=",
            "int", "double", "const", "char", "str", "strtod", "while", "break", "if", "else",
            "function", "return", "printf", "pow", "fmod", "fgets", "strncmp", "exit",
        ])
        .prop_map(str::to_string),
    ]
}

fn separator_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(" ".to_string()),
        Just("\n".to_string()),
        Just("\t ".to_string()),
        Just(" /* note\n */ ".to_string()),
        Just(" // trailing\n".to_string()),
    ]
}

fn source_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec((lexeme_strategy(), separator_strategy()), 1..40).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(lexeme, sep)| format!("{}{}", lexeme, sep))
            .collect()
    })
}

fn relex(source: &str, token: &Token) -> Vec<Token> {
    tokenize(&source[token.span()]).expect("span should lex on its own")
}

proptest! {
    #[test]
    fn spans_reconstruct_tokens(source in source_strategy()) {
        let tokens = tokenize(&source).unwrap();

        for token in &tokens {
            let again = relex(&source, token);
            prop_assert_eq!(again.len(), 1);
            prop_assert_eq!(again[0].kind, token.kind);
            prop_assert_eq!(&again[0].value, &token.value);
            prop_assert_eq!(again[0].len, token.len);
        }
    }

    #[test]
    fn positions_are_monotonic(source in source_strategy()) {
        let tokens = tokenize(&source).unwrap();

        for pair in tokens.windows(2) {
            prop_assert!(pair[0].span().end <= pair[1].offset());
            prop_assert!(pair[0].line() <= pair[1].line());
        }

        for token in &tokens {
            let newlines = source[..token.offset()].matches('\n').count();
            prop_assert_eq!(token.line(), newlines + 1);
        }
    }

    #[test]
    fn item_count_matches_generated_program(kinds in prop::collection::vec(any::<bool>(), 1..12)) {
        let source: String = kinds
            .iter()
            .enumerate()
            .map(|(i, is_function)| {
                if *is_function {
                    format!("double f{i}() {{ return v0 * {i}; }}\n")
                } else {
                    format!("const int v{i} = {i} + 1;\n")
                }
            })
            .collect();

        let program = parse_source(&source).unwrap();
        prop_assert_eq!(program.items.len(), kinds.len());
        prop_assert_eq!(program.functions().count(), kinds.iter().filter(|f| **f).count());
    }

    #[test]
    fn parenthesized_expressions_round_trip(tree in expr_tree()) {
        let (source, expected) = tree;
        let program = parse_source(&format!("double r = {};", source)).unwrap();
        prop_assert_eq!(program.to_string(), format!("(program (declare double r {}))", expected));
    }
}

fn is_identifier(text: &str) -> bool {
    match tokenize(text) {
        Ok(tokens) => tokens.len() == 1 && tokens[0].identifier().is_some(),
        Err(_) => false,
    }
}

/// (source text, expected s-expression) pairs
fn expr_tree() -> impl Strategy<Value = (String, String)> {
    let leaf = prop_oneof![
        (0u32..1000).prop_map(|n| (n.to_string(), n.to_string())),
        "[a-z][a-z0-9]{0,4}"
            .prop_filter("keywords are not identifiers", |s| is_identifier(s))
            .prop_map(|s| (s.clone(), s)),
    ];

    leaf.prop_recursive(4, 32, 2, |inner| {
        (
            inner.clone(),
            prop::sample::select(vec!["+", "-", "*", "/", "%", "^", "<", "<=", "==", "!=", "&&", "||"]),
            inner,
        )
            .prop_map(|((ls, le), op, (rs, re))| {
                (format!("({} {} {})", ls, op, rs), format!("({} {} {})", op, le, re))
            })
    })
}
