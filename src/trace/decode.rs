//! Decoding signature text into a trace
//!
//! Signature data usually arrives as the JSON string a browser capture widget
//! produced. Some transports add one layer of backslash escaping on the way,
//! so the text is unescaped once before it is handed to the JSON parser.

use std::str::FromStr;

use crate::error::{Result, SignatureError};

use super::SignatureTrace;

/// Remove one level of backslash escaping
///
/// `\x` becomes `x`, `\\` becomes `\`, `\0` becomes a NUL character and a
/// trailing lone backslash is dropped.
pub fn strip_slashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('\0'),
            Some(next) => out.push(next),
            None => {}
        }
    }
    out
}

/// Parse signature JSON, unescaping it once first
pub fn decode_trace(input: &str) -> Result<SignatureTrace> {
    let unescaped = strip_slashes(input.trim());
    if unescaped.is_empty() {
        return Err(SignatureError::invalid_input("signature text is empty"));
    }
    let trace: SignatureTrace = serde_json::from_str(&unescaped)?;
    log::debug!("decoded {} segments", trace.len());
    Ok(trace)
}

impl FromStr for SignatureTrace {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self> {
        decode_trace(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::LineSegment;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_plain_json() {
        let trace = decode_trace(r#"[{"lx":12.0,"ly":4.0,"mx":14.5,"my":6.2}]"#).unwrap();
        assert_eq!(trace.segments, vec![LineSegment::new(12.0, 4.0, 14.5, 6.2)]);
    }

    #[test]
    fn test_decode_integer_coordinates() {
        let trace = decode_trace(r#"[{"lx":1,"ly":2,"mx":3,"my":4}]"#).unwrap();
        assert_eq!(trace.segments, vec![LineSegment::new(1.0, 2.0, 3.0, 4.0)]);
    }

    #[test]
    fn test_decode_escaped_quotes() {
        let trace = decode_trace(r#"[{\"lx\":10,\"ly\":5,\"mx\":20,\"my\":8}]"#).unwrap();
        assert_eq!(trace.segments, vec![LineSegment::new(10.0, 5.0, 20.0, 8.0)]);
    }

    #[test]
    fn test_decode_keeps_draw_order() {
        let trace = decode_trace(
            r#"[{"lx":0,"ly":0,"mx":1,"my":1},{"lx":1,"ly":1,"mx":2,"my":0}]"#,
        )
        .unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.segments[1], LineSegment::new(1.0, 1.0, 2.0, 0.0));
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let trace = decode_trace(r#"[{"lx":1,"ly":2,"mx":3,"my":4,"t":1700}]"#).unwrap();
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn test_decode_empty_array() {
        let trace = decode_trace("[]").unwrap();
        assert!(trace.is_empty());
    }

    #[test]
    fn test_decode_malformed_json() {
        let err = decode_trace("{not valid json").unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_decode_non_array() {
        let err = decode_trace(r#"{"lx":1,"ly":2,"mx":3,"my":4}"#).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_decode_missing_field() {
        let err = decode_trace(r#"[{"lx":1,"ly":2,"mx":3}]"#).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_decode_non_numeric_field() {
        let err = decode_trace(r#"[{"lx":"1","ly":2,"mx":3,"my":4}]"#).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_decode_empty_text() {
        let err = decode_trace("   ").unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_from_str() {
        let trace: SignatureTrace = "[]".parse().unwrap();
        assert!(trace.is_empty());
    }

    #[test]
    fn test_strip_slashes() {
        assert_eq!(strip_slashes(r#"\"a\""#), r#""a""#);
        assert_eq!(strip_slashes(r"a\\b"), r"a\b");
        assert_eq!(strip_slashes(r"a\0b"), "a\0b");
        assert_eq!(strip_slashes(r"end\"), "end");
        assert_eq!(strip_slashes("plain"), "plain");
    }
}
