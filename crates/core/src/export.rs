//! Portable JSON import/export
//!
//! The export format is a JSON array of annotation records with stable field
//! names, independent of any storage key scheme. Import validates the whole
//! payload before anything is accepted: a single malformed record rejects the
//! entire input, so the caller's current set is never partially replaced.

use crate::annotation::{Annotation, AnnotationId, BoxKind, Fill, Shape};
use crate::store::AnnotationSet;
use serde_json::Value;

/// Errors for import/export and set validation
///
/// All variants describe data-integrity problems that are recoverable at the
/// boundary; none of them corrupt in-memory state.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Payload is not syntactically valid JSON
    #[error("invalid JSON: {0}")]
    Json(String),

    /// Top-level structure is not an array
    #[error("import payload must be a JSON array of annotations")]
    NotAnArray,

    /// Array element is not an object
    #[error("annotation {index}: expected an object")]
    NotAnObject { index: usize },

    /// Unknown `type` tag
    #[error("annotation {index}: unknown type `{kind}`")]
    UnknownKind { index: usize, kind: String },

    /// Required field absent or of the wrong type
    #[error("annotation {index}: missing or invalid field `{field}`")]
    MissingField { index: usize, field: &'static str },

    /// Numeric field is NaN or infinite
    #[error("annotation {index}: non-finite value in field `{field}`")]
    NonFinite { index: usize, field: &'static str },

    /// Fill string is not a well-formed rgba() literal
    #[error("annotation {index}: malformed fill `{fill}`")]
    MalformedFill { index: usize, fill: String },

    /// Geometry of an already-constructed annotation is non-finite
    #[error("annotation {index}: non-finite geometry")]
    NonFiniteGeometry { index: usize },

    /// Two annotations share an id
    #[error("duplicate annotation id {0}")]
    DuplicateId(AnnotationId),

    /// Serialization of an export payload failed
    #[error("serialization failed: {0}")]
    Serialize(String),
}

/// One annotation in the portable export format
#[derive(Debug, serde::Serialize)]
struct AnnotationRecord {
    id: AnnotationId,
    #[serde(rename = "type")]
    kind: &'static str,
    x: f32,
    y: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "fontSize", skip_serializing_if = "Option::is_none")]
    font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fill: Option<String>,
}

impl AnnotationRecord {
    fn from_annotation(annotation: &Annotation) -> Self {
        let (kind, text, font_size, fill) = match annotation.shape() {
            Shape::Text {
                content, font_size, ..
            } => ("text", Some(content.clone()), Some(*font_size), None),
            Shape::Box { kind, fill, .. } => {
                let tag = match kind {
                    BoxKind::Rect => "rect",
                    BoxKind::Highlight => "highlight",
                    BoxKind::Opaque => "opaque",
                };
                (tag, None, None, Some(fill.to_css()))
            }
        };

        Self {
            id: annotation.id(),
            kind,
            x: annotation.x(),
            y: annotation.y(),
            width: annotation.width(),
            height: annotation.height(),
            text,
            font_size,
            fill,
        }
    }
}

/// Serialize an annotation set to the portable JSON form
pub fn export_json(set: &AnnotationSet) -> Result<Vec<u8>, ValidationError> {
    let records: Vec<AnnotationRecord> = set.iter().map(AnnotationRecord::from_annotation).collect();
    serde_json::to_vec_pretty(&records).map_err(|e| ValidationError::Serialize(e.to_string()))
}

/// Parse and validate a portable JSON payload into an annotation set
///
/// Validation is field-by-field so failures name the offending record and
/// field. The current in-memory set is never touched here; callers swap the
/// returned set in only on success.
pub fn import_json(bytes: &[u8]) -> Result<AnnotationSet, ValidationError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| ValidationError::Json(e.to_string()))?;

    let elements = value.as_array().ok_or(ValidationError::NotAnArray)?;

    let mut annotations = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        annotations.push(parse_record(index, element)?);
    }

    AnnotationSet::from_annotations(annotations)
}

fn parse_record(index: usize, element: &Value) -> Result<Annotation, ValidationError> {
    let object = element
        .as_object()
        .ok_or(ValidationError::NotAnObject { index })?;

    let id = object
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<AnnotationId>().ok())
        .ok_or(ValidationError::MissingField { index, field: "id" })?;

    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ValidationError::MissingField {
            index,
            field: "type",
        })?;

    let x = finite_number(object, index, "x")?;
    let y = finite_number(object, index, "y")?;

    let shape = match kind {
        "text" => {
            let content = object
                .get("text")
                .and_then(Value::as_str)
                .ok_or(ValidationError::MissingField {
                    index,
                    field: "text",
                })?
                .to_string();
            let font_size = optional_finite_number(object, index, "fontSize")?
                .unwrap_or(crate::annotation::DEFAULT_FONT_SIZE);
            Shape::Text {
                content,
                font_size,
                width: optional_finite_number(object, index, "width")?,
                height: optional_finite_number(object, index, "height")?,
            }
        }
        "rect" | "highlight" | "opaque" => {
            let box_kind = match kind {
                "rect" => BoxKind::Rect,
                "highlight" => BoxKind::Highlight,
                _ => BoxKind::Opaque,
            };
            let fill = match object.get("fill").and_then(Value::as_str) {
                Some(css) => {
                    Fill::parse_css(css).ok_or_else(|| ValidationError::MalformedFill {
                        index,
                        fill: css.to_string(),
                    })?
                }
                None => box_kind.default_fill(),
            };
            Shape::Box {
                kind: box_kind,
                width: finite_number(object, index, "width")?,
                height: finite_number(object, index, "height")?,
                fill,
            }
        }
        other => {
            return Err(ValidationError::UnknownKind {
                index,
                kind: other.to_string(),
            })
        }
    };

    Ok(Annotation::with_id(id, x, y, shape))
}

fn finite_number(
    object: &serde_json::Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<f32, ValidationError> {
    let number = object
        .get(field)
        .and_then(Value::as_f64)
        .ok_or(ValidationError::MissingField { index, field })?;
    let number = number as f32;
    if !number.is_finite() {
        return Err(ValidationError::NonFinite { index, field });
    }
    Ok(number)
}

fn optional_finite_number(
    object: &serde_json::Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<Option<f32>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => finite_number(object, index, field).map(Some),
    }
}
