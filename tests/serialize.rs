use pretty_assertions::assert_eq;
use serde_json::{Value as Json, json};
use toml_tree::{Item, Table, Value};

fn to_json(src: &str) -> Json {
    let table = toml_tree::parse(src).unwrap();
    serde_json::to_value(&table).unwrap()
}

#[test]
fn plain_json() {
    let json = to_json(
        r#"
title = "TOML"
ints = [1, 0x10]
flag = true
pi = 3.5

[owner]
dob = 1979-05-27T07:32:00-08:00
day = 1979-05-27
at = 07:32:00.250
local = 1979-05-27 07:32:00

[[points]]
xy = { x = 1, y = 2 }
[[points]]
xy = { x = 3, y = 4 }
"#,
    );
    assert_eq!(
        json,
        json!({
            "title": "TOML",
            "ints": [1, 16],
            "flag": true,
            "pi": 3.5,
            "owner": {
                "dob": "1979-05-27T07:32:00-08:00",
                "day": "1979-05-27",
                "at": "07:32:00.250",
                "local": "1979-05-27T07:32:00",
            },
            "points": [
                { "xy": { "x": 1, "y": 2 } },
                { "xy": { "x": 3, "y": 4 } },
            ],
        })
    );
}

#[test]
fn offsets_keep_their_spelling() {
    let json = to_json("z = 1979-05-27T00:00:00Z\nzero = 1979-05-27T00:00:00+00:00\nlower = 1979-05-27t00:00:00z");
    assert_eq!(json["z"], "1979-05-27T00:00:00Z");
    assert_eq!(json["zero"], "1979-05-27T00:00:00+00:00");
    assert_eq!(json["lower"], "1979-05-27T00:00:00Z");
}

#[test]
fn spanned_serializes_its_value() {
    let spanned = toml_tree::Spanned::with_span(5u8, toml_tree::Span::new(0, 1));
    assert_eq!(serde_json::to_value(&spanned).unwrap(), json!(5));
}

/// The type-tagged encoding used by the toml-test conformance suite.
fn tagged_value(value: &Value) -> Json {
    let (kind, text) = match value {
        Value::String(s) => ("string", s.clone()),
        Value::Integer(i) => ("integer", i.to_string()),
        Value::Float(f) if f.is_nan() => ("float", "nan".to_string()),
        Value::Float(f) if f.is_infinite() => {
            ("float", if *f > 0.0 { "inf" } else { "-inf" }.to_string())
        }
        Value::Float(f) => ("float", f.to_string()),
        Value::Boolean(b) => ("bool", b.to_string()),
        Value::OffsetDateTime(dt) => ("datetime", dt.to_string()),
        Value::LocalDateTime(dt) => ("datetime-local", dt.to_string()),
        Value::LocalDate(date) => ("date-local", date.to_string()),
        Value::LocalTime(time) => ("time-local", time.to_string()),
        Value::Array(values) => return Json::Array(values.iter().map(tagged_value).collect()),
        Value::Table(table) => return tagged_table(table),
    };
    json!({ "type": kind, "value": text })
}

fn tagged_table(table: &Table) -> Json {
    let mut map = serde_json::Map::new();
    for (key, item) in table {
        let value = match item {
            Item::Value(value) => tagged_value(value),
            Item::Table(table) => tagged_table(table),
            Item::ArrayOfTables(tables) => Json::Array(tables.iter().map(tagged_table).collect()),
        };
        map.insert(key.name.clone(), value);
    }
    Json::Object(map)
}

#[test]
fn tagged_encoding() {
    let table = toml_tree::parse(
        "s = 'x'\ni = -7\nf = 1.5\nn = -nan\nb = false\nd = 2000-02-29\nt = 23:59:60\n[[a]]\nv = [1, 'two']",
    )
    .unwrap();
    assert_eq!(
        tagged_table(&table),
        json!({
            "s": { "type": "string", "value": "x" },
            "i": { "type": "integer", "value": "-7" },
            "f": { "type": "float", "value": "1.5" },
            "n": { "type": "float", "value": "nan" },
            "b": { "type": "bool", "value": "false" },
            "d": { "type": "date-local", "value": "2000-02-29" },
            "t": { "type": "time-local", "value": "23:59:60" },
            "a": [
                { "v": [
                    { "type": "integer", "value": "1" },
                    { "type": "string", "value": "two" },
                ] },
            ],
        })
    );
}
