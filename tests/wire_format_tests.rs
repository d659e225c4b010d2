//! Byte-level conformance tests for the tnetstring grammar.

use serde_tnetstring::{
    parse, parse_with_options, pop, render, render_with_options, tnet, ParseErrorKind,
    RenderErrorKind, TnetMap, TnetOptions, Value,
};

fn parse_kind(input: &[u8]) -> ParseErrorKind {
    match parse(input) {
        Ok(value) => panic!("expected an error, parsed {:?}", value),
        Err(err) => err
            .parse_kind()
            .unwrap_or_else(|| panic!("not a parse error: {}", err)),
    }
}

#[test]
fn test_scalar_examples() {
    assert_eq!(parse(b"5:hello,").unwrap(), Value::from("hello"));
    assert_eq!(parse(b"0:~").unwrap(), Value::Null);
    assert_eq!(parse(b"4:true!").unwrap(), Value::Bool(true));
    assert_eq!(parse(b"5:false!").unwrap(), Value::Bool(false));
    assert_eq!(parse(b"1:5#").unwrap(), Value::Integer(5));
    assert_eq!(parse(b"3:1.5#").unwrap(), Value::Float(1.5));
    assert_eq!(parse(b"0:}").unwrap(), Value::Dict(TnetMap::new()));
    assert_eq!(parse(b"0:]").unwrap(), Value::List(Vec::new()));
}

#[test]
fn test_rendered_scalars() {
    assert_eq!(render(&Value::from("hello")).unwrap(), b"5:hello,");
    assert_eq!(render(&Value::Null).unwrap(), b"0:~");
    assert_eq!(render(&Value::Bool(true)).unwrap(), b"4:true!");
    assert_eq!(render(&Value::Integer(0)).unwrap(), b"1:0#");
    assert_eq!(render(&Value::Integer(i64::MIN)).unwrap(), b"20:-9223372036854775808#");
}

#[test]
fn test_dict_example_both_ways() {
    let value = tnet!({ "foo": [1, 2] });
    assert_eq!(render(&value).unwrap(), b"17:3:foo,8:1:1#1:2#]}");
    assert_eq!(parse(b"17:3:foo,8:1:1#1:2#]}").unwrap(), value);
}

#[test]
fn test_binary_payloads_are_opaque() {
    let raw: Vec<u8> = (0..=255).collect();
    let value = Value::Bytes(raw.clone());
    let bytes = render(&value).unwrap();
    assert!(bytes.starts_with(b"256:"));
    assert_eq!(bytes.last(), Some(&b','));
    assert_eq!(parse(&bytes).unwrap(), Value::Bytes(raw));
}

#[test]
fn test_dict_keys_may_be_any_value() {
    let mut map = TnetMap::new();
    map.insert(Value::Integer(1), "int key");
    map.insert(Value::Null, "null key");
    map.insert(Value::List(vec![Value::Bool(true)]), "list key");
    let value = Value::Dict(map);

    let bytes = render(&value).unwrap();
    assert_eq!(parse(&bytes).unwrap(), value);
}

#[test]
fn test_repeated_dict_key_keeps_last_value() {
    let value = parse(b"16:1:k,1:1#1:k,1:2#}").unwrap();
    let dict = value.as_dict().unwrap();
    assert_eq!(dict.len(), 1);
    assert_eq!(dict.get("k"), Some(&Value::Integer(2)));
}

#[test]
fn test_error_examples() {
    assert_eq!(parse_kind(b""), ParseErrorKind::Truncated);
    assert_eq!(parse_kind(b"5:abc,"), ParseErrorKind::Truncated);
    assert_eq!(parse_kind(b"3:abc&"), ParseErrorKind::UnknownTag);
    assert_eq!(parse_kind(b"-3:abc,"), ParseErrorKind::MalformedLength);
    assert_eq!(parse_kind(b"3;abc,"), ParseErrorKind::MissingSeparator);
    assert_eq!(parse_kind(b"3:yes!"), ParseErrorKind::InvalidBool);
    assert_eq!(parse_kind(b"2:no~"), ParseErrorKind::InvalidNull);
    assert_eq!(parse_kind(b"3:abc#"), ParseErrorKind::InvalidNumber);
    assert_eq!(parse_kind(b"6:4:abc,]"), ParseErrorKind::ContainerOverrun);
    assert_eq!(parse_kind(b"4:1:a,}"), ParseErrorKind::DanglingKey);
    assert_eq!(parse_kind(b"1:1#1:2#"), ParseErrorKind::TrailingBytes);
}

#[test]
fn test_error_offsets_point_at_the_fault() {
    let err = parse(b"3:abc&").unwrap_err();
    assert_eq!(err.offset(), Some(5));

    let err = parse(b"9:1:a,5:hel]").unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::ContainerOverrun));
    assert_eq!(err.offset(), Some(8));
}

#[test]
fn test_integer_overflow_is_not_a_float() {
    assert_eq!(
        parse(b"20:-9223372036854775808#").unwrap(),
        Value::Integer(i64::MIN)
    );
    assert_eq!(
        parse_kind(b"20:-9223372036854775809#"),
        ParseErrorKind::InvalidNumber
    );
    assert_eq!(parse(b"6:1.0e10#").unwrap(), Value::Float(1.0e10));
}

#[test]
fn test_pop_splits_frames() {
    let mut input: &[u8] = b"5:hello,0:~4:true!";
    let mut values = Vec::new();
    while !input.is_empty() {
        let (value, rest) = pop(input).unwrap();
        values.push(value);
        input = rest;
    }
    assert_eq!(
        values,
        vec![Value::from("hello"), Value::Null, Value::Bool(true)]
    );
}

#[test]
fn test_pathological_nesting_is_rejected() {
    let mut bytes = b"0:]".to_vec();
    for _ in 0..200 {
        let mut outer = format!("{}:", bytes.len()).into_bytes();
        outer.extend_from_slice(&bytes);
        outer.push(b']');
        bytes = outer;
    }
    assert_eq!(parse_kind(&bytes), ParseErrorKind::DepthLimitExceeded);

    let options = TnetOptions::new().with_max_depth(256);
    assert!(parse_with_options(&bytes, &options).is_ok());
}

#[test]
fn test_render_depth_limit() {
    let mut value = Value::List(Vec::new());
    for _ in 0..10 {
        value = Value::List(vec![value]);
    }
    let options = TnetOptions::new().with_max_depth(5);
    let err = render_with_options(&value, &options).unwrap_err();
    assert_eq!(err.render_kind(), Some(RenderErrorKind::DepthLimitExceeded));
    assert!(render(&value).is_ok());
}
