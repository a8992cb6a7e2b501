/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// ```rust
/// use textgram::{value, Value};
///
/// let doc = value!({
///     "server": { "port": 8080, "debug": true },
///     "hosts": ["a", "b"]
/// });
/// assert_eq!(doc.pointer(&["server", "port"]), Some(&Value::from(8080)));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Atom($crate::Atom::Null)
    };

    (true) => {
        $crate::Value::Atom($crate::Atom::Bool(true))
    };

    (false) => {
        $crate::Value::Atom($crate::Atom::Bool(false))
    };

    ([]) => {
        $crate::Value::List(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Map($crate::ValueMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::ValueMap::new();
        $(
            map.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Map(map)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}
