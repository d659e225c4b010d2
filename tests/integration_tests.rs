use serde::{Deserialize, Serialize};
use serde_tnetstring::{
    from_slice, from_value, parse, to_value, to_vec, Deserializer, ParseErrorKind,
    RenderErrorKind, Value,
};
use std::collections::{BTreeMap, HashMap};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
    note: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
enum Event {
    Started,
    Progress(u8),
    Moved { from: (i32, i32), to: (i32, i32) },
    Renamed(String, String),
}

fn sample_order() -> Order {
    Order {
        order_id: 12345,
        customer: User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["vip".to_string()],
        },
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.99,
                quantity: 1,
            },
        ],
        total: 109.97,
        note: None,
    }
}

#[test]
fn test_simple_struct() {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    };

    let bytes = to_vec(&user).unwrap();
    let user_back: User = from_slice(&bytes).unwrap();
    assert_eq!(user, user_back);
}

#[test]
fn test_nested_struct() {
    let order = sample_order();
    let bytes = to_vec(&order).unwrap();
    let order_back: Order = from_slice(&bytes).unwrap();
    assert_eq!(order, order_back);
}

#[test]
fn test_struct_fields_render_in_declaration_order() {
    let product = Product {
        sku: "A".to_string(),
        price: 1.5,
        quantity: 3,
    };
    assert_eq!(
        to_vec(&product).unwrap(),
        b"39:3:sku,1:A,5:price,3:1.5#8:quantity,1:3#}".to_vec()
    );
}

#[test]
fn test_enum_variants_roundtrip() {
    let events = vec![
        Event::Started,
        Event::Progress(50),
        Event::Moved {
            from: (0, 0),
            to: (3, -4),
        },
        Event::Renamed("old".to_string(), "new".to_string()),
    ];

    let bytes = to_vec(&events).unwrap();
    let events_back: Vec<Event> = from_slice(&bytes).unwrap();
    assert_eq!(events, events_back);
}

#[test]
fn test_unit_variant_is_a_byte_string() {
    assert_eq!(to_vec(&Event::Started).unwrap(), b"7:Started,".to_vec());
    assert_eq!(
        to_vec(&Event::Progress(7)).unwrap(),
        b"15:8:Progress,1:7#}".to_vec()
    );
}

#[test]
fn test_options_and_unit() {
    assert_eq!(to_vec(&Option::<u8>::None).unwrap(), b"0:~".to_vec());
    assert_eq!(to_vec(&()).unwrap(), b"0:~".to_vec());

    let some: Option<u8> = from_slice(b"1:9#").unwrap();
    assert_eq!(some, Some(9));
    let none: Option<u8> = from_slice(b"0:~").unwrap();
    assert_eq!(none, None);
}

#[test]
fn test_maps_with_string_and_integer_keys() {
    let mut by_name = HashMap::new();
    by_name.insert("a".to_string(), 1);
    by_name.insert("b".to_string(), 2);
    let bytes = to_vec(&by_name).unwrap();
    let back: HashMap<String, i32> = from_slice(&bytes).unwrap();
    assert_eq!(back, by_name);

    let mut by_id = BTreeMap::new();
    by_id.insert(10, "ten".to_string());
    by_id.insert(-3, "minus three".to_string());
    let bytes = to_vec(&by_id).unwrap();
    let back: BTreeMap<i64, String> = from_slice(&bytes).unwrap();
    assert_eq!(back, by_id);
}

#[test]
fn test_floats_survive_as_floats() {
    let values = vec![0.0, -0.0, 1.0, 0.1, 1e-7, 1e21, f64::MAX, f64::MIN_POSITIVE];
    let bytes = to_vec(&values).unwrap();
    let back: Vec<f64> = from_slice(&bytes).unwrap();
    assert_eq!(back.len(), values.len());
    for (a, b) in values.iter().zip(&back) {
        assert_eq!(a.to_bits(), b.to_bits());
    }

    let parsed = parse(&to_vec(&1.0f64).unwrap()).unwrap();
    assert_eq!(parsed, Value::Float(1.0));
}

#[test]
fn test_special_floats() {
    let bytes = to_vec(&vec![f64::INFINITY, f64::NEG_INFINITY, f64::NAN]).unwrap();
    assert_eq!(bytes, b"19:3:inf#4:-inf#3:NaN#]".to_vec());
    let back: Vec<f64> = from_slice(&bytes).unwrap();
    assert_eq!(back[0], f64::INFINITY);
    assert_eq!(back[1], f64::NEG_INFINITY);
    assert!(back[2].is_nan());
}

#[test]
fn test_u64_above_i64_max_is_rejected() {
    let err = to_vec(&u64::MAX).unwrap_err();
    assert_eq!(err.render_kind(), Some(RenderErrorKind::UnsupportedValueType));
}

#[test]
fn test_type_mismatch_is_reported() {
    let err = from_slice::<User>(b"1:5#").unwrap_err();
    assert!(err.parse_kind().is_none());
    assert!(err.to_string().contains("invalid type"));
}

#[test]
fn test_to_value_and_back() {
    let order = sample_order();
    let value = to_value(&order).unwrap();
    assert_eq!(value.get("order_id"), Some(&Value::Integer(12345)));
    assert_eq!(
        value.get("customer").and_then(|c| c.get("name")),
        Some(&Value::from("Alice"))
    );
    let back: Order = from_value(value).unwrap();
    assert_eq!(back, order);
}

#[test]
fn test_stream_of_frames() {
    let mut wire = Vec::new();
    for n in 0..5u32 {
        wire.extend(to_vec(&n).unwrap());
    }
    let numbers: Vec<u32> = Deserializer::from_slice(&wire)
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(numbers, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_malformed_input_through_serde() {
    let err = from_slice::<String>(b"5:abc,").unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::Truncated));
}

#[test]
fn test_json_interop() {
    let order = sample_order();
    let json: serde_json::Value = serde_json::to_value(&order).unwrap();

    let bytes = to_vec(&json).unwrap();
    let json_back: serde_json::Value = from_slice(&bytes).unwrap();
    assert_eq!(json, json_back);

    let order_back: Order = from_slice(&bytes).unwrap();
    assert_eq!(order, order_back);
}
