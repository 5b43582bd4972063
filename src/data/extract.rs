//! Embedded script-variable extraction.
//!
//! The CDS history page carries its data endpoint and session parameters in
//! an inline `var jsGlobalVars = {...}` assignment. The page is not versioned,
//! so everything that depends on its markup lives behind `VariableExtractor`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::data::outcome::FetchError;

/// Pulls a structured object out of an HTML page.
pub trait VariableExtractor {
    fn extract(&self, html: &str) -> Result<Map<String, Value>, FetchError>;
}

static JS_GLOBAL_VARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"var\s+jsGlobalVars\s*=\s*\{").expect("static pattern compiles")
});

/// Extracts the `jsGlobalVars` object literal.
///
/// The literal must be valid JSON. Parsing starts at the opening brace and
/// stops at the matching closing brace, so nested objects and trailing
/// script (`;`, further statements) are handled.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsGlobalVarsExtractor;

impl VariableExtractor for JsGlobalVarsExtractor {
    fn extract(&self, html: &str) -> Result<Map<String, Value>, FetchError> {
        let found = JS_GLOBAL_VARS
            .find(html)
            .ok_or_else(|| FetchError::Extraction("jsGlobalVars not found".into()))?;

        // The match ends just past the opening brace.
        let literal = &html[found.end() - 1..];
        let value = serde_json::Deserializer::from_str(literal)
            .into_iter::<Value>()
            .next()
            .ok_or_else(|| FetchError::Extraction("jsGlobalVars is empty".into()))?
            .map_err(|e| FetchError::Schema(format!("jsGlobalVars is not valid JSON: {e}")))?;

        match value {
            Value::Object(map) => Ok(map),
            other => Err(FetchError::Schema(format!("jsGlobalVars is not an object: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_nested_object_followed_by_script() {
        let html = r#"<html><head><script>
            var other = 1;
            var jsGlobalVars = {"ENDPOINT": "https://api.test/quotes", "SESSION": {"id": "abc", "n": 2}}; window.go();
        </script></head></html>"#;
        let vars = JsGlobalVarsExtractor.extract(html).unwrap();
        assert_eq!(vars["ENDPOINT"], "https://api.test/quotes");
        assert_eq!(vars["SESSION"]["n"], 2);
    }

    #[test]
    fn missing_block_is_an_extraction_error() {
        let html = "<html><script>var somethingElse = {};</script></html>";
        assert!(matches!(
            JsGlobalVarsExtractor.extract(html),
            Err(FetchError::Extraction(_))
        ));
    }

    #[test]
    fn malformed_literal_is_a_schema_error() {
        let html = "<script>var jsGlobalVars = {ENDPOINT: 'x'};</script>";
        assert!(matches!(
            JsGlobalVarsExtractor.extract(html),
            Err(FetchError::Schema(_))
        ));
    }
}
