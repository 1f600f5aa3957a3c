//! Output formatting for translated documents.

use csdl_core::MetadataDocument;
use serde::{Deserialize, Serialize};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    /// File extension for converted documents.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Renders a document as CSDL-JSON (or its YAML equivalent).
///
/// `pretty` only affects JSON; the text always ends with a newline.
pub fn format_document(
    document: &MetadataDocument,
    format: OutputFormat,
    pretty: bool,
) -> Result<String, String> {
    match format {
        OutputFormat::Json => {
            let rendered = if pretty {
                serde_json::to_string_pretty(document)
            } else {
                serde_json::to_string(document)
            };
            rendered
                .map(|json| json + "\n")
                .map_err(|e| format!("JSON serialization failed: {e}"))
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(document).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use csdl_core::CsdlVersion;
    use serde_json::{Map, json};

    use super::*;

    fn sample() -> MetadataDocument {
        let mut doc = MetadataDocument::new(CsdlVersion::V4_01);
        let mut ns = Map::new();
        ns.insert("Color".into(), json!({ "$Kind": "EnumType", "Red": 0 }));
        doc.namespaces.insert("Demo".into(), serde_json::Value::Object(ns));
        doc
    }

    #[test]
    fn test_compact_json_is_one_line() {
        let text = format_document(&sample(), OutputFormat::Json, false).unwrap();
        assert_eq!(
            text,
            "{\"$Version\":\"4.01\",\"$ApiRoot\":\"\",\"Demo\":{\"Color\":{\"$Kind\":\"EnumType\",\"Red\":0}}}\n"
        );
    }

    #[test]
    fn test_pretty_json_is_indented() {
        let text = format_document(&sample(), OutputFormat::Json, true).unwrap();
        assert!(text.starts_with("{\n  \"$Version\": \"4.01\""));
    }

    #[test]
    fn test_yaml_round_trips_to_the_same_value() {
        let text = format_document(&sample(), OutputFormat::Yaml, true).unwrap();
        let value: serde_json::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(value, sample().to_value());
    }

    #[test]
    fn test_extensions() {
        assert_eq!(OutputFormat::Json.extension(), "json");
        assert_eq!(OutputFormat::Yaml.extension(), "yaml");
    }
}
