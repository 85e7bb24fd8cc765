//! JSON canónico mínimo: claves de objeto ordenadas, sin espacios.
//! Dos payloads estructuralmente iguales producen el mismo texto y por lo
//! tanto el mismo hash.

use serde_json::Value;
use std::collections::BTreeMap;

pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => serde_json::to_string(s).unwrap_or_default(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let mut tree = BTreeMap::new();
            for (k, v) in map {
                tree.insert(k, to_canonical_json(v));
            }
            let items: Vec<String> = tree.into_iter()
                                         .map(|(k, v)| {
                                             format!("{}:{}", serde_json::to_string(&k).unwrap_or_default(), v)
                                         })
                                         .collect();
            format!("{{{}}}", items.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_keys_are_sorted() {
        let a = json!({"b": 1, "a": 2});
        assert_eq!(to_canonical_json(&a), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn nested_values_canonicalize_recursively() {
        let v = json!({"z": [1, {"y": "x"}], "a": null});
        assert_eq!(to_canonical_json(&v), r#"{"a":null,"z":[1,{"y":"x"}]}"#);
    }
}
