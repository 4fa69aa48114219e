use pretty_assertions::assert_eq;
use toml_tree::{Category, Item, Table, TimeOffset, Value};

/// Parses a document that must be valid.
#[track_caller]
fn valid(src: &str) -> Table {
    match toml_tree::parse(src) {
        Ok(table) => table,
        Err(err) => panic!("unexpected errors for {src:?}:\n{err}"),
    }
}

/// Asserts a document is rejected with errors of exactly these categories.
macro_rules! invalid {
    ($name:ident, $toml:literal, [$($category:ident),+]) => {
        #[test]
        fn $name() {
            let err = toml_tree::parse($toml).expect_err(concat!(
                "expected ",
                stringify!($name),
                " to be rejected"
            ));
            let found: Vec<Category> = err.iter().map(|e| e.category()).collect();
            assert_eq!(found, [$(Category::$category),+], "{err}");
        }
    };
}

invalid!(
    bad_element_in_multiline_array,
    "[x]\na = [\n  \"\\q\",\n  [1],\n]\nb = 1\n[1]\n",
    [Value]
);
invalid!(unclosed_multiline_array, "a = [\n  1,\n  2\nb = 1\n", [Structure]);

fn int(table: &Table, key: &str) -> Option<i64> {
    table.get(key).and_then(Item::as_integer)
}

#[test]
fn scenario_header_after_root_keys() {
    let root = valid("title = \"x\"\n[a]\nb = 1");
    let keys: Vec<&str> = root.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, ["title", "a"]);
    assert_eq!(root.get("title").and_then(Item::as_str), Some("x"));
    assert_eq!(root.get_table("a").and_then(|a| int(a, "b")), Some(1));
}

#[test]
fn scenario_dotted_key_nests_tables() {
    let root = valid("a.b.c = 1");
    let c = root
        .get_table("a")
        .and_then(|a| a.get_table("b"))
        .and_then(|b| int(b, "c"));
    assert_eq!(c, Some(1));
}

#[test]
fn scenario_offset_datetime() {
    let root = valid("f = 1979-05-27T07:32:00-08:00");
    let dt = root
        .get_value("f")
        .and_then(Value::as_offset_datetime)
        .unwrap();
    assert_eq!(dt.offset, TimeOffset::Custom { minutes: -480 });
    assert_eq!(dt.offset.minutes(), -480);
    assert_eq!(dt.to_string(), "1979-05-27T07:32:00-08:00");
}

#[test]
fn scenario_unterminated_array() {
    let err = toml_tree::parse("bad = [1, ").unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.errors[0].category(), Category::Structure);
}

#[test]
fn scenario_prefixed_integers() {
    assert_eq!(int(&valid("x = 0x1F"), "x"), Some(31));
    assert_eq!(int(&valid("x = 0b101"), "x"), Some(5));
    assert_eq!(int(&valid("x = 0o17"), "x"), Some(15));
}

#[test]
fn scenario_table_redefinition() {
    let err = toml_tree::parse("[a]\nb=1\n[a]\nc=2").unwrap_err();
    assert_eq!(err.len(), 1);
    match &err.errors[0].kind {
        toml_tree::ErrorKind::Conflict { path, existing, .. } => {
            assert_eq!(path, "a");
            assert_eq!(*existing, "table");
        }
        other => panic!("expected a conflict, got {other}"),
    }
    assert_eq!(err.errors[0].line_info, Some((3, 2)));
}

#[test]
fn integer_round_trips() {
    for n in [0, 1, -1, 42, i64::MAX, i64::MIN, i64::MAX - 1, i64::MIN + 1] {
        assert_eq!(int(&valid(&format!("n = {n}")), "n"), Some(n));
    }
    for n in [0i64, 1, 255, 0x7fff_ffff_ffff_ffff] {
        assert_eq!(int(&valid(&format!("n = 0x{n:x}")), "n"), Some(n));
        assert_eq!(int(&valid(&format!("n = 0o{n:o}")), "n"), Some(n));
        assert_eq!(int(&valid(&format!("n = 0b{n:b}")), "n"), Some(n));
    }
    assert_eq!(int(&valid("n = 1_000"), "n"), Some(1000));
    assert_eq!(int(&valid("n = 0xdead_BEEF"), "n"), Some(0xdead_beef));
}

#[test]
fn whitespace_and_comments_do_not_matter() {
    let plain = valid("a = 1\n[t]\nb = [1, 2]\nc = { d = 'e' }\n[[x]]\ny = 2");
    let noisy = valid(
        "# header comment\n\n\
         a=1 # one\n\
         \n\t\n\
         [ t ]   # table\n\
         # between\n\
         b = [ # open\n  1,\n\n  2, # trailing comma\n]\n\
         c = {d='e'}\r\n\
         [[ x ]]\n\n\
         y   =   2\n\n# end",
    );
    assert_eq!(plain, noisy);

    let mut rng = oorandom::Rand32::new(17);
    let lines = ["a = 1", "[t]", "b = [1, 2]", "c = { d = 'e' }", "[[x]]", "y = 2"];
    for _ in 0..100 {
        let mut src = String::new();
        for line in lines {
            for _ in 0..rng.rand_range(0..3) {
                match rng.rand_range(0..3) {
                    0 => src.push('\n'),
                    1 => src.push_str("# noise\n"),
                    _ => src.push_str(" \t\r\n"),
                }
            }
            src.push_str(line);
            if rng.rand_range(0..2) == 0 {
                src.push_str("  # after");
            }
            src.push('\n');
        }
        assert_eq!(valid(&src), plain, "for {src:?}");
    }
}

#[test]
fn leap_years() {
    assert!(toml_tree::parse("d = 2000-02-29").is_ok());
    for bad in ["d = 1900-02-29", "d = 2023-02-29"] {
        let err = toml_tree::parse(bad).unwrap_err();
        assert_eq!(err.errors[0].category(), Category::Value);
        assert_eq!(err.errors[0].kind.to_string(), "invalid-date");
    }
}

#[test]
fn leap_seconds_are_kept() {
    let root = valid("t = 23:59:60\ndt = 2001-02-14T23:59:60-00:01");
    let t = root.get_value("t").and_then(Value::as_local_time).unwrap();
    assert_eq!(t.second, 60);
    let dt = root
        .get_value("dt")
        .and_then(Value::as_offset_datetime)
        .unwrap();
    assert_eq!(dt.time.second, 60);
    assert_eq!(dt.offset.minutes(), -1);
}

#[test]
fn arrays_of_tables_accumulate() {
    let root = valid("[[items]]\nname = 'a'\n[[items]]\nqty = 2");
    let items = root.get_array_of_tables("items").unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].len(), 1);
    assert_eq!(items[0].get("name").and_then(Item::as_str), Some("a"));
    assert_eq!(items[1].len(), 1);
    assert_eq!(int(&items[1], "qty"), Some(2));
}

#[test]
fn nested_arrays_of_tables() {
    let root = valid(
        r#"
[[fruits]]
name = "apple"

[fruits.physical]
color = "red"

[[fruits.varieties]]
name = "red delicious"

[[fruits.varieties]]
name = "granny smith"

[[fruits]]
name = "banana"

[[fruits.varieties]]
name = "plantain"
"#,
    );
    let fruits = root.get_array_of_tables("fruits").unwrap();
    assert_eq!(fruits.len(), 2);
    assert_eq!(
        fruits[0]
            .get_table("physical")
            .and_then(|p| p.get("color"))
            .and_then(Item::as_str),
        Some("red")
    );
    assert_eq!(fruits[0].get_array_of_tables("varieties").map(<[Table]>::len), Some(2));
    assert_eq!(fruits[1].get_array_of_tables("varieties").map(<[Table]>::len), Some(1));
}

#[test]
fn strings_of_every_kind() {
    let root = valid(
        "basic = \"I'm a string. \\\"You can quote me\\\". Name\\tJos\\u00E9\\nLocation\\tSF.\"\n\
         literal = 'C:\\Users\\nodejs\\templates'\n\
         multi = \"\"\"\nRoses are red\nViolets are blue\"\"\"\n\
         raw = '''\nThe first newline is\ntrimmed in raw strings.'''\n",
    );
    assert_eq!(
        root.get("basic").and_then(Item::as_str),
        Some("I'm a string. \"You can quote me\". Name\tJos\u{e9}\nLocation\tSF.")
    );
    assert_eq!(
        root.get("literal").and_then(Item::as_str),
        Some("C:\\Users\\nodejs\\templates")
    );
    assert_eq!(
        root.get("multi").and_then(Item::as_str),
        Some("Roses are red\nViolets are blue")
    );
    assert_eq!(
        root.get("raw").and_then(Item::as_str),
        Some("The first newline is\ntrimmed in raw strings.")
    );
}

#[test]
fn floats_and_specials() {
    let root = valid("a = 3.1415\nb = -0.01\nc = 5e+22\nd = inf\ne = -inf\nf = nan");
    assert_eq!(root.get("a").and_then(Item::as_float), Some(3.1415));
    assert_eq!(root.get("b").and_then(Item::as_float), Some(-0.01));
    assert_eq!(root.get("c").and_then(Item::as_float), Some(5e22));
    assert_eq!(root.get("d").and_then(Item::as_float), Some(f64::INFINITY));
    assert_eq!(root.get("e").and_then(Item::as_float), Some(f64::NEG_INFINITY));
    assert!(root.get("f").and_then(Item::as_float).unwrap().is_nan());
}

#[test]
fn every_error_is_reported() {
    let err = toml_tree::parse("[a\n[b]\n[c\n[d]").unwrap_err();
    assert_eq!(err.len(), 2);
    assert!(err.iter().all(|e| e.category() == Category::Structure));

    let err = toml_tree::parse("a = 1.\nb = 0b_1\nc = 1\nc = 2\nd = \"\"\"t\\ t\"\"\"").unwrap_err();
    let kinds: Vec<String> = err.iter().map(|e| e.kind.to_string()).collect();
    assert_eq!(
        kinds,
        ["invalid-float", "invalid-integer", "conflict", "invalid-unicode-sequence"]
    );
}

#[test]
fn bytes_entry_point() {
    assert!(toml_tree::parse_bytes(b"a = 'ok'").is_ok());
    let err = toml_tree::parse_bytes(b"a = '\xc3\x28'").unwrap_err();
    assert_eq!(err.errors[0].category(), Category::General);
}

invalid!(bare_cr, "a = 1\rb = 2", [Structure]);
invalid!(key_newline, "a\n= 1", [Structure, Structure]);
invalid!(key_without_value, "key = ", [Structure]);
invalid!(value_without_key, "= \"no key\"", [Structure]);
invalid!(text_after_value, "first = \"Tom\" last = \"Preston\"", [Structure]);
invalid!(text_after_table, "[error] this shouldn't be here", [Structure]);
invalid!(table_missing_opening, "a]\nb = 1", [Structure]);
invalid!(empty_table_name, "[]", [Structure]);
invalid!(array_table_unclosed, "[[a]\nb = 1", [Structure]);
invalid!(inline_table_newline, "a = { b = 1\n}", [Value, Structure]);
invalid!(inline_table_trailing_comma, "a = { b = 1, }", [Value]);
invalid!(missing_fraction, "a = 1.", [Value]);
invalid!(exponent_fraction, "a = 1.e5", [Value]);
invalid!(leading_zero, "a = 012", [Structure]);
invalid!(double_underscore, "a = 1__2", [Structure]);
invalid!(binary_underscore_first, "a = 0b_1", [Value]);
invalid!(integer_overflow, "a = 9223372036854775808", [Value]);
invalid!(bad_escape, "a = \"\\q\"", [Value]);
invalid!(bad_continuation, "k = \"\"\"t\\ t\"\"\"", [Value]);
invalid!(control_in_string, "a = \"\u{7f}\"", [Value]);
invalid!(unterminated_literal, "a = 'x\nb = 1", [Value]);
invalid!(bad_month, "a = 2023-13-01", [Value]);
invalid!(bad_hour, "a = 24:00:00", [Value]);
invalid!(bad_offset, "a = 1979-05-27T00:00:00+24:00", [Value]);
invalid!(trailing_dot_key, "a. = 1", [Value]);
invalid!(duplicate_key, "a = 1\na = 2", [Conflict]);
invalid!(duplicate_table, "[a]\n[a]", [Conflict]);
invalid!(redefine_dotted_table, "[fruit]\napple.color = 'red'\n[fruit.apple]", [Conflict]);
invalid!(extend_inline_table, "a = {}\n[a.b]", [Conflict]);
invalid!(static_array_as_aot, "a = []\n[[a]]", [Conflict]);
invalid!(table_over_aot, "[[a]]\n[a]", [Conflict]);
invalid!(mixed_failures, "a = 1\n= 2\na = 3", [Structure, Conflict]);

#[test]
fn dotted_table_may_be_passed_through() {
    let root = valid("[fruit]\napple.color = 'red'\napple.taste.sweet = true\n[fruit.apple.texture]\nsmooth = true");
    let apple = root
        .get_table("fruit")
        .and_then(|f| f.get_table("apple"))
        .unwrap();
    assert_eq!(apple.len(), 3);
}
