use super::*;

fn cursor(src: &str) -> Cursor<'_> {
    Cursor::new(src, None)
}

#[test]
fn character_classes() {
    assert!(is_keylike(b'a') && is_keylike(b'Z') && is_keylike(b'9'));
    assert!(is_keylike(b'-') && is_keylike(b'_'));
    assert!(!is_keylike(b'.') && !is_keylike(b' ') && !is_keylike(b'"'));

    assert!(is_oct_digit(b'7') && !is_oct_digit(b'8'));
    assert!(is_bin_digit(b'1') && !is_bin_digit(b'2'));
    assert!(is_hex_digit(b'f') && is_hex_digit(b'F') && !is_hex_digit(b'g'));

    assert!(is_basic_unescaped('a') && is_basic_unescaped('\t') && is_basic_unescaped('é'));
    assert!(!is_basic_unescaped('"') && !is_basic_unescaped('\\'));
    assert!(!is_basic_unescaped('\u{7f}') && !is_basic_unescaped('\u{1}'));
    assert!(!is_basic_unescaped('\n'));

    assert!(is_literal_char('\\') && is_literal_char('"'));
    assert!(!is_literal_char('\'') && !is_literal_char('\n'));

    assert!(is_comment_char('\t') && is_comment_char('#') && is_comment_char('ü'));
    assert!(!is_comment_char('\u{0}') && !is_comment_char('\u{7f}'));
}

#[test]
fn digits_with_separators() {
    let mut c = cursor("1_000_000 rest");
    assert_eq!(digits(is_digit)(&mut c), Some("1_000_000"));
    assert_eq!(c.rest(), " rest");

    // an underscore must be followed by a digit
    let mut c = cursor("12_ ");
    assert_eq!(digits(is_digit)(&mut c), Some("12"));
    assert_eq!(c.rest(), "_ ");

    let mut c = cursor("1__2");
    assert_eq!(digits(is_digit)(&mut c), Some("1"));

    let mut c = cursor("_1");
    assert_eq!(digits(is_digit)(&mut c), None);
    assert_eq!(c.pos(), 0);

    let mut c = cursor("dead_beefx");
    assert_eq!(digits(is_hex_digit)(&mut c), Some("dead_beef"));
}

#[test]
fn whitespace_newlines_and_comments() {
    let mut c = cursor(" \t x");
    whitespace(&mut c);
    assert_eq!(c.rest(), "x");

    let mut c = cursor("\r\nx");
    assert_eq!(newline(&mut c), Some(()));
    assert_eq!(c.rest(), "x");

    let mut c = cursor("\rx");
    assert_eq!(newline(&mut c), None);
    assert_eq!(c.pos(), 0);

    let mut c = cursor("# hi there\nx");
    assert_eq!(comment(&mut c), Some("# hi there"));
    assert_eq!(c.rest(), "\nx");

    let mut c = cursor("# bad \u{1} char");
    assert_eq!(comment(&mut c), Some("# bad "));

    let mut c = cursor("  # one\n\n\t# two\r\n  x");
    ws_comment_newline(&mut c);
    assert_eq!(c.rest(), "x");
}

#[test]
fn line_endings() {
    for src in ["", "\n", "   ", "  # trailing\n", "\t#x"] {
        let mut c = cursor(src);
        assert_eq!(line_end(&mut c), Some(()), "{src:?}");
    }
    for src in ["x", "  y\n", "\r", "# a\u{0}b\n"] {
        let mut c = cursor(src);
        assert_eq!(line_end(&mut c), None, "{src:?}");
        assert_eq!(c.pos(), 0);
    }
}

#[test]
fn escapes() {
    let cases = [
        ("\\\"", '"'),
        ("\\\\", '\\'),
        ("\\b", '\u{8}'),
        ("\\f", '\u{c}'),
        ("\\n", '\n'),
        ("\\r", '\r'),
        ("\\t", '\t'),
        ("\\u00E9", 'é'),
        ("\\U0001F600", '😀'),
    ];
    for (src, expected) in cases {
        let mut c = cursor(src);
        assert_eq!(escape(&mut c), Some(Ok(expected)), "{src:?}");
        assert!(c.is_eof());
    }

    let mut c = cursor("x");
    assert_eq!(escape(&mut c), None);

    for src in ["\\a", "\\ ", "\\uD800", "\\u12", "\\U00110000", "\\x41", "\\"] {
        let mut c = cursor(src);
        match escape(&mut c) {
            Some(Err(span)) => assert_eq!(span.start, 0, "{src:?}"),
            other => panic!("expected invalid escape for {src:?}, got {other:?}"),
        }
    }
}
