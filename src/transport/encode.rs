use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

/// Everything except the RFC 3986 unreserved characters is escaped.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Sorted, percent-encoded `key=value&...` string with spaces written as `+`.
///
/// The same string is signed and, when requested, placed on the URL.
pub fn canonical_query(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ESCAPE)
        .to_string()
        .replace("%20", "+")
}

/// Compact JSON with `null` members removed and object keys in byte order.
///
/// Non-ASCII text is written unescaped.
pub fn encode_body(body: &Value) -> String {
    let mut body = body.clone();
    strip_nulls(&mut body);
    body.to_string()
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let members = std::mem::take(map)
                .into_iter()
                .filter(|(_, member)| !member.is_null())
                .collect::<BTreeMap<_, _>>();
            for (key, mut member) in members {
                strip_nulls(&mut member);
                map.insert(key, member);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn canonical_query_is_sorted_regardless_of_input_order() {
        let a = canonical_query(&params(&[("b", "2"), ("a", "1")]));
        let b = canonical_query(&params(&[("a", "1"), ("b", "2")]));
        assert_eq!(a, "a=1&b=2");
        assert_eq!(a, b);
    }

    #[test]
    fn canonical_query_uses_ordinal_ordering() {
        let query = canonical_query(&params(&[("a", "1"), ("B", "2"), ("_", "3")]));
        assert_eq!(query, "B=2&_=3&a=1");
    }

    #[test]
    fn canonical_query_of_empty_map_is_empty() {
        assert_eq!(canonical_query(&BTreeMap::new()), "");
    }

    #[test]
    fn canonical_query_encodes_spaces_as_plus_and_reserved_characters() {
        let query = canonical_query(&params(&[
            ("start_date", "2026-10-19 08:00:00"),
            ("q", "a+b&c=d/é~"),
        ]));
        assert_eq!(
            query,
            "q=a%2Bb%26c%3Dd%2F%C3%A9~&start_date=2026-10-19+08%3A00%3A00"
        );
    }

    #[test]
    fn encode_body_is_compact_and_drops_nulls() {
        let body = json!({
            "msisdn": "50212345678",
            "message": "hola",
            "id": null,
            "nested": { "keep": [1, null], "drop": null }
        });
        assert_eq!(
            encode_body(&body),
            r#"{"message":"hola","msisdn":"50212345678","nested":{"keep":[1,null]}}"#
        );
    }

    #[test]
    fn encode_body_keeps_non_ascii_unescaped() {
        let text = "áéíóú ÁÉÍÓÚ ñÑ";
        let encoded = encode_body(&json!({ "message": text }));
        assert_eq!(encoded, format!(r#"{{"message":"{text}"}}"#));
        assert!(!encoded.contains("\\u"));

        let decoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded["message"], text);
    }

    #[test]
    fn encoded_body_deserializes_back_field_for_field() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Payload {
            msisdn: String,
            message: String,
            id: Option<String>,
        }

        let payload = Payload {
            msisdn: "50212345678".to_owned(),
            message: "ñandú".to_owned(),
            id: None,
        };
        let encoded = encode_body(&serde_json::to_value(&payload).unwrap());
        let decoded: Payload = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, payload);
    }
}
