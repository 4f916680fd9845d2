//! Shareable field links
//!
//! A layout travels as `?field=<base64(json)>`. The payload is
//! `{"players": [...], "title": "..."}`; the older bare-array form (players
//! only) is still accepted on decode.

use std::collections::HashSet;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::field::Fielder;

/// Query parameter carrying the encoded layout
pub const FIELD_PARAM: &str = "field";

/// Base64 characters that are reserved in a query value, plus the usual separators
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'/')
    .add(b'=');

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("shared field payload is empty")]
    Empty,
    #[error("shared field is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("shared field is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("shared field is not a valid layout: {0}")]
    Json(#[from] serde_json::Error),
    #[error("shared field lists fielder '{0}' more than once")]
    DuplicateId(String),
}

/// A field layout as carried in a share link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedField {
    pub players: Vec<Fielder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Payload shapes accepted on decode
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Field(SharedField),
    Legacy(Vec<Fielder>),
}

/// Encode a layout as base64 JSON (standard alphabet, padded)
pub fn encode_field(field: &SharedField) -> Result<String, ShareError> {
    let json = serde_json::to_string(field)?;
    Ok(STANDARD.encode(json))
}

/// Decode a layout from the value of the `field` parameter
pub fn decode_field(encoded: &str) -> Result<SharedField, ShareError> {
    if encoded.trim().is_empty() {
        return Err(ShareError::Empty);
    }
    // Form decoding turns '+' into ' '
    let cleaned = encoded.replace(' ', "+");
    let cleaned = cleaned.trim();

    let bytes = match STANDARD.decode(cleaned) {
        Ok(bytes) => bytes,
        Err(err) => URL_SAFE_NO_PAD
            .decode(cleaned.trim_end_matches('='))
            .map_err(|_| err)?,
    };
    let json = String::from_utf8(bytes)?;

    let field = match serde_json::from_str::<Payload>(&json)? {
        Payload::Field(field) => field,
        Payload::Legacy(players) => SharedField {
            players,
            title: None,
        },
    };

    let mut seen = HashSet::new();
    if let Some(dup) = field.players.iter().find(|p| !seen.insert(p.id.as_str())) {
        return Err(ShareError::DuplicateId(dup.id.clone()));
    }

    Ok(field)
}

/// Build a full share link: `{origin}{path}?field=...`
pub fn share_url(origin: &str, path: &str, field: &SharedField) -> Result<String, ShareError> {
    let encoded = encode_field(field)?;
    Ok(format!(
        "{origin}{path}?{FIELD_PARAM}={}",
        utf8_percent_encode(&encoded, QUERY_VALUE)
    ))
}

/// Extract the decoded `field` value from a query string like `?a=1&field=...`
pub fn field_param(search: &str) -> Option<String> {
    form_urlencoded::parse(search.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == FIELD_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Role, default_roster};
    use glam::Vec3;
    use proptest::prelude::*;

    fn sample_field() -> SharedField {
        SharedField {
            players: default_roster(),
            title: Some("Day one, new ball".to_string()),
        }
    }

    #[test]
    fn test_round_trip_preserves_roster_and_title() {
        let field = sample_field();
        let encoded = encode_field(&field).unwrap();
        let decoded = decode_field(&encoded).unwrap();
        assert_eq!(decoded, field);
    }

    #[test]
    fn test_round_trip_through_url() {
        let mut field = sample_field();
        field.players[3].name = "Slip ✓ / + = ?".to_string();
        field.players[3].position = Vec3::new(-4.25, 0.0, -21.5);

        let url = share_url("https://example.test", "/editor", &field).unwrap();
        assert!(url.starts_with("https://example.test/editor?field="));
        let query = &url[url.find('?').unwrap()..];
        assert!(!query[1..].contains('+'));
        assert!(!query[1..].contains('/'));

        let value = field_param(query).unwrap();
        assert_eq!(decode_field(&value).unwrap(), field);
    }

    #[test]
    fn test_decode_legacy_array() {
        let json = r#"[{"id":"wk","name":"Keeper","position":[0,0,-20],"type":"wicketkeeper"}]"#;
        let encoded = STANDARD.encode(json);
        let decoded = decode_field(&encoded).unwrap();
        assert_eq!(decoded.title, None);
        assert_eq!(decoded.players.len(), 1);
        assert_eq!(decoded.players[0].role, Role::Wicketkeeper);
    }

    #[test]
    fn test_decode_form_mangled_plus() {
        let field = sample_field();
        let encoded = encode_field(&field).unwrap();
        let mangled = encoded.replace('+', " ");
        assert_eq!(decode_field(&mangled).unwrap(), field);
    }

    #[test]
    fn test_decode_url_safe_alphabet() {
        let field = sample_field();
        let json = serde_json::to_string(&field).unwrap();
        let encoded = URL_SAFE_NO_PAD.encode(json);
        assert_eq!(decode_field(&encoded).unwrap(), field);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode_field(""), Err(ShareError::Empty)));
        assert!(matches!(decode_field("   "), Err(ShareError::Empty)));
        assert!(matches!(decode_field("!!!not base64!!!"), Err(ShareError::Base64(_))));
        let not_json = STANDARD.encode("hello");
        assert!(matches!(decode_field(&not_json), Err(ShareError::Json(_))));
        let bad_role = STANDARD.encode(r#"{"players":[{"id":"x","name":"X","position":[0,0,0],"type":"umpire"}]}"#);
        assert!(matches!(decode_field(&bad_role), Err(ShareError::Json(_))));
    }

    #[test]
    fn test_field_param() {
        assert_eq!(field_param("?a=1&field=abc%3D"), Some("abc=".to_string()));
        assert_eq!(field_param("field=x%2By%2fz"), Some("x+y/z".to_string()));
        assert_eq!(field_param("?a=1"), None);
        assert_eq!(field_param("?field="), None);
        assert_eq!(field_param(""), None);
        // Any escape decodes, not just the base64 ones
        assert_eq!(field_param("?field=a%25b%26c"), Some("a%b&c".to_string()));
        assert_eq!(field_param("?field=a+b"), Some("a b".to_string()));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{"players":[
            {"id":"a","name":"A","position":[0,0,10],"type":"fielder"},
            {"id":"a","name":"B","position":[5,0,10],"type":"fielder"}
        ]}"#;
        let encoded = STANDARD.encode(json);
        match decode_field(&encoded) {
            Err(ShareError::DuplicateId(id)) => assert_eq!(id, "a"),
            other => panic!("expected duplicate id error, got {other:?}"),
        }

        let legacy = STANDARD.encode(
            r#"[{"id":"wk","name":"K","position":[0,0,-20],"type":"wicketkeeper"},
                {"id":"wk","name":"K2","position":[0,0,-25],"type":"wicketkeeper"}]"#,
        );
        assert!(matches!(decode_field(&legacy), Err(ShareError::DuplicateId(_))));
    }

    #[test]
    fn test_untitled_field_omits_title() {
        let field = SharedField {
            players: default_roster(),
            title: None,
        };
        let json = serde_json::to_value(&field).unwrap();
        assert!(json.get("title").is_none());
    }

    proptest! {
        #[test]
        fn escape_round_trip(s in "[A-Za-z0-9+/=]{1,64}") {
            let escaped = utf8_percent_encode(&s, QUERY_VALUE).to_string();
            prop_assert!(!escaped.contains(['+', '/', '=']));
            let decoded = percent_encoding::percent_decode_str(&escaped).decode_utf8().unwrap();
            prop_assert_eq!(decoded.as_ref(), s.as_str());
            prop_assert_eq!(field_param(&format!("?{FIELD_PARAM}={escaped}")), Some(s));
        }

        #[test]
        fn names_and_positions_survive(name in ".{0,24}", x in -65.0f32..65.0, z in -65.0f32..65.0) {
            let mut field = sample_field();
            field.players[0].name = name;
            field.players[0].position = Vec3::new(x, 0.0, z);
            let decoded = decode_field(&encode_field(&field).unwrap()).unwrap();
            prop_assert_eq!(decoded, field);
        }
    }
}
