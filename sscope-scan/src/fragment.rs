//! JSON fragment decoder
//!
//! The third field of a record line is a JSON document describing the
//! sources that contain the block hash. In the hashdb expanded format the
//! document is a two-element array: element 0 mirrors provenance information
//! and element 1 is the source list container:
//!
//! ```text
//! [{"block_hashdigest": "..."}, {"sources": [{"source_id": 5, "file_offset": 100, "label": "W"}]}]
//! ```
//!
//! The container may also carry descriptive fields (`repository_name`,
//! `filename`, `filesize`, `file_hashdigest`) describing the sources.

use crate::error::FragmentError;
use crate::model::{IdOffsetPair, SourceDetail, SourceIds};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Where the source list container sits in the document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentLayout {
    /// Second element of a two-element top-level array
    #[default]
    PositionalPair,
    /// The top-level object itself
    Keyed,
}

impl FragmentLayout {
    /// Locate the object holding `"sources"`
    fn source_container<'a>(
        &self,
        document: &'a Value,
    ) -> Result<&'a Map<String, Value>, FragmentError> {
        match self {
            FragmentLayout::PositionalPair => {
                let pair = document.as_array().ok_or_else(|| {
                    schema(format!(
                        "expected a two-element array, found {}",
                        json_type(document)
                    ))
                })?;
                if pair.len() != 2 {
                    return Err(schema(format!(
                        "expected a two-element array, found {} elements",
                        pair.len()
                    )));
                }
                pair[1].as_object().ok_or_else(|| {
                    schema(format!(
                        "element 1 must be an object, found {}",
                        json_type(&pair[1])
                    ))
                })
            }
            FragmentLayout::Keyed => document.as_object().ok_or_else(|| {
                schema(format!("expected an object, found {}", json_type(document)))
            }),
        }
    }
}

impl FromStr for FragmentLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positional_pair" => Ok(FragmentLayout::PositionalPair),
            "keyed" => Ok(FragmentLayout::Keyed),
            other => Err(format!(
                "unknown fragment layout '{}' (expected positional_pair or keyed)",
                other
            )),
        }
    }
}

impl fmt::Display for FragmentLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentLayout::PositionalPair => write!(f, "positional_pair"),
            FragmentLayout::Keyed => write!(f, "keyed"),
        }
    }
}

/// Where descriptive source fields are read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceDetailPolicy {
    /// One set of fields on the source list container, applied to every
    /// source ID in the fragment
    #[default]
    Container,
    /// Fields on each source entry, applied to that entry's source ID only
    PerSource,
}

impl FromStr for SourceDetailPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "container" => Ok(SourceDetailPolicy::Container),
            "per_source" => Ok(SourceDetailPolicy::PerSource),
            other => Err(format!(
                "unknown source detail policy '{}' (expected container or per_source)",
                other
            )),
        }
    }
}

impl fmt::Display for SourceDetailPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceDetailPolicy::Container => write!(f, "container"),
            SourceDetailPolicy::PerSource => write!(f, "per_source"),
        }
    }
}

/// Descriptive source fields as they appear in a fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptiveFields {
    pub repository_name: String,
    pub filename: String,
    pub filesize: u64,
    pub content_hash: String,
}

impl DescriptiveFields {
    /// Source detail record for one source ID
    pub fn to_detail(&self, source_id: u64) -> SourceDetail {
        SourceDetail {
            source_id,
            repository_name: self.repository_name.clone(),
            filename: self.filename.clone(),
            filesize: self.filesize,
            content_hash: self.content_hash.clone(),
        }
    }
}

/// Result of decoding one fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFragment {
    pub source_ids: SourceIds,
    pub id_offset_pairs: Vec<IdOffsetPair>,
    pub has_label: bool,
    /// Fields found on the source list container
    pub descriptive_fields: Option<DescriptiveFields>,
    /// Fields found on individual source entries, in listing order
    pub entry_fields: Vec<(u64, DescriptiveFields)>,
}

impl DecodedFragment {
    /// Source detail records to upsert, in listing order
    ///
    /// Container fields apply to every source ID in the fragment. A source ID
    /// listed twice yields two identical records.
    pub fn source_details(&self) -> Vec<SourceDetail> {
        let mut details: Vec<SourceDetail> = match &self.descriptive_fields {
            Some(fields) => self
                .id_offset_pairs
                .iter()
                .map(|pair| fields.to_detail(pair.source_id))
                .collect(),
            None => Vec::new(),
        };
        details.extend(
            self.entry_fields
                .iter()
                .map(|(source_id, fields)| fields.to_detail(*source_id)),
        );
        details
    }
}

/// Decodes JSON fragments according to a layout and source detail policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FragmentDecoder {
    layout: FragmentLayout,
    policy: SourceDetailPolicy,
}

impl FragmentDecoder {
    pub fn new(layout: FragmentLayout, policy: SourceDetailPolicy) -> Self {
        Self { layout, policy }
    }

    /// Decode one fragment
    ///
    /// Fails with `FragmentError::Syntax` when the text is not JSON and with
    /// `FragmentError::Schema` when the layout, the `"sources"` list, or a
    /// required member is missing or has the wrong type.
    pub fn decode(&self, json: &str) -> Result<DecodedFragment, FragmentError> {
        let document: Value = serde_json::from_str(json)?;
        let container = self.layout.source_container(&document)?;

        let sources = container
            .get("sources")
            .ok_or_else(|| schema("missing \"sources\" member".to_string()))?
            .as_array()
            .ok_or_else(|| schema("\"sources\" is not an array".to_string()))?;

        let mut source_ids = SourceIds::new();
        let mut id_offset_pairs = Vec::with_capacity(sources.len());
        let mut entry_fields = Vec::new();

        for (index, source) in sources.iter().enumerate() {
            let entry = source.as_object().ok_or_else(|| {
                schema(format!(
                    "source {} is not an object, found {}",
                    index,
                    json_type(source)
                ))
            })?;

            let source_id = required_u64(entry, "source_id", index)?;
            let file_offset = required_u64(entry, "file_offset", index)?;

            source_ids.insert(source_id);
            id_offset_pairs.push(IdOffsetPair::new(source_id, file_offset));

            if self.policy == SourceDetailPolicy::PerSource {
                if let Some(fields) = descriptive_fields(entry)? {
                    entry_fields.push((source_id, fields));
                }
            }
        }

        // Label is only ever carried by the first source
        let has_label = sources
            .first()
            .and_then(Value::as_object)
            .is_some_and(|first| first.contains_key("label"));

        let descriptive_fields = match self.policy {
            SourceDetailPolicy::Container => descriptive_fields(container)?,
            SourceDetailPolicy::PerSource => None,
        };

        Ok(DecodedFragment {
            source_ids,
            id_offset_pairs,
            has_label,
            descriptive_fields,
            entry_fields,
        })
    }
}

/// Read descriptive fields when `filename` is present
fn descriptive_fields(
    object: &Map<String, Value>,
) -> Result<Option<DescriptiveFields>, FragmentError> {
    if !object.contains_key("filename") {
        return Ok(None);
    }

    Ok(Some(DescriptiveFields {
        repository_name: required_str(object, "repository_name")?,
        filename: required_str(object, "filename")?,
        filesize: object
            .get("filesize")
            .and_then(Value::as_u64)
            .ok_or_else(|| schema("\"filesize\" missing or not an unsigned integer".to_string()))?,
        content_hash: required_str(object, "file_hashdigest")?,
    }))
}

fn required_u64(
    entry: &Map<String, Value>,
    key: &str,
    index: usize,
) -> Result<u64, FragmentError> {
    entry.get(key).and_then(Value::as_u64).ok_or_else(|| {
        schema(format!(
            "source {}: \"{}\" missing or not an unsigned integer",
            index, key
        ))
    })
}

fn required_str(object: &Map<String, Value>, key: &str) -> Result<String, FragmentError> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| schema(format!("\"{}\" missing or not a string", key)))
}

fn schema(detail: String) -> FragmentError {
    FragmentError::Schema(detail)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
