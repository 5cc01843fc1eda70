//! Span-labelled schema diagnostics
//!
//! Maps a parser error path (e.g. `/professional/fields/role/type`) back to
//! a byte span in the original schema file so malformed schemas are reported
//! with a source snippet instead of a bare message.

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::collections::HashMap;
use std::path::Path;
use yaml_spanned::{Spanned, Value as YamlValue, from_str};

#[derive(Debug, Clone)]
struct SpanInfo {
    start: usize,
    end: usize,
}

#[derive(thiserror::Error, Debug, Diagnostic)]
#[error("{message}")]
pub struct SchemaFileError {
    #[source_code]
    pub source_code: NamedSource<String>,

    #[label("here")]
    pub span: SourceSpan,

    pub message: String,
}

/// Index of document paths to source byte spans for one schema file.
pub struct SchemaSpanIndex {
    spans: HashMap<String, SpanInfo>,
    source: String,
    file_path: String,
}

impl SchemaSpanIndex {
    pub fn new(file_path: &Path, source: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let spanned_yaml: Spanned<YamlValue> = from_str(source)?;

        let mut spans = HashMap::new();
        Self::index_spans(&spanned_yaml, String::new(), &mut spans);

        Ok(Self {
            spans,
            source: source.to_string(),
            file_path: file_path.display().to_string(),
        })
    }

    /// Build a labelled error pointing at `path`, falling back to the
    /// document root when the path has no recorded span.
    pub fn error_at(&self, path: &str, message: String) -> SchemaFileError {
        let span_info = self
            .spans
            .get(path)
            .or_else(|| self.spans.get(""))
            .cloned()
            .unwrap_or(SpanInfo { start: 0, end: 0 });

        SchemaFileError {
            source_code: NamedSource::new(&self.file_path, self.source.clone()),
            span: SourceSpan::new(
                span_info.start.into(),
                span_info.end.saturating_sub(span_info.start),
            ),
            message,
        }
    }

    fn index_spans(spanned: &Spanned<YamlValue>, path: String, spans: &mut HashMap<String, SpanInfo>) {
        let span = spanned.span();
        spans.insert(
            path.clone(),
            SpanInfo {
                start: span.start.unwrap_or_default().byte_index,
                end: span.end.unwrap_or_default().byte_index,
            },
        );

        match spanned.as_ref() {
            YamlValue::Sequence(seq) => {
                for (i, item) in seq.iter().enumerate() {
                    Self::index_spans(item, format!("{path}/{i}"), spans);
                }
            }
            YamlValue::Mapping(map) => {
                for (key_spanned, value_spanned) in map {
                    if let YamlValue::String(key) = key_spanned.as_ref() {
                        Self::index_spans(value_spanned, format!("{path}/{key}"), spans);
                    }
                }
            }
            YamlValue::Tagged(tagged_value) => {
                Self::index_spans(&tagged_value.value, path, spans);
            }
            _ => {}
        }
    }
}
