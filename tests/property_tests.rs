//! Property-based tests for the lexer and parser.

use ottl_lang::ast::Token;
use ottl_lang::error::LexErrorKind;
use ottl_lang::lexer::Lexer;
use ottl_lang::{Expr, parse};
use proptest::prelude::*;

/// Statement-shaped text built from real tokens, so most cases get deep into
/// the parser instead of failing on the first character.
fn statement_like() -> impl Strategy<Value = String> {
    let pieces = prop::sample::select(vec![
        "set", "(", ")", "[", "]", ",", ".", "where", "and", "or", "==", "!=", "<", ">=",
        "name", "attributes", "\"k\"", "1", "2.5", "0x0a", "nil", "true", "TEST_ENUM", "=",
    ]);
    prop::collection::vec(pieces, 0..24).prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn test_lexer_never_panics(input in "\\PC{0,64}") {
        let _ = Lexer::new(&input).tokenize();
    }

    #[test]
    fn test_parser_never_panics(input in "\\PC{0,64}") {
        let _ = parse(&input);
    }

    #[test]
    fn test_parser_never_panics_on_token_soup(input in statement_like()) {
        let _ = parse(&input);
    }

    #[test]
    fn test_even_hex_decodes(bytes in prop::collection::vec(any::<u8>(), 1..16)) {
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        let tokens = Lexer::new(&format!("0x{hex}")).tokenize().unwrap();
        prop_assert_eq!(tokens, vec![Token::Bytes(bytes)]);
    }

    #[test]
    fn test_odd_hex_is_rejected(digits in "[0-9a-f]{1,31}") {
        prop_assume!(digits.len() % 2 == 1);
        let err = Lexer::new(&format!("0x{digits}")).tokenize().unwrap_err();
        prop_assert_eq!(err.kind, LexErrorKind::OddHexLiteral(digits.len()));
    }

    #[test]
    fn test_string_literal_round_trip(s in "\\PC{0,32}") {
        let parsed = parse(&format!("set({})", Expr::String(s.clone()))).unwrap();
        prop_assert_eq!(&parsed.invocation.arguments[0], &Expr::String(s));
    }

    #[test]
    fn test_int_literal_round_trip(n in any::<i64>()) {
        let parsed = parse(&format!("set({n})")).unwrap();
        prop_assert_eq!(&parsed.invocation.arguments[0], &Expr::Int(n));
    }
}
