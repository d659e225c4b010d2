/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Dict keys are literals and become byte-string keys; any other expression
/// goes through [`to_value`](crate::to_value).
///
/// ```rust
/// use serde_tnetstring::{tnet, Value};
///
/// let value = tnet!({ "id": 7, "tags": ["a", "b"], "parent": null });
/// assert_eq!(value.get("id"), Some(&Value::Integer(7)));
/// ```
#[macro_export]
macro_rules! tnet {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::List(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::tnet!($elem)),*])
    };

    ({}) => {
        $crate::Value::Dict($crate::TnetMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut dict = $crate::TnetMap::new();
        $(
            dict.insert($key, $crate::tnet!($value));
        )*
        $crate::Value::Dict(dict)
    }};

    ($s:expr) => {{
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    }};
}
