//! Render binding
//!
//! Translates annotation state into draw descriptors for the external
//! rendering surface and folds surface events (clicks, completed drags and
//! resizes) back into editing commands. The binding is deliberately thin: it
//! never adds or removes annotations, and it reports geometry only on
//! manipulation completion, never per intermediate frame, so history is not
//! flooded with checkpoints.

use marginalia_core::{AnnotationId, AnnotationSet, BoxKind, Command, Fill, Selection, Shape};

/// Kind tag of a draw primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Text,
    Rect,
    Highlight,
    Opaque,
}

impl From<BoxKind> for PrimitiveKind {
    fn from(kind: BoxKind) -> Self {
        match kind {
            BoxKind::Rect => PrimitiveKind::Rect,
            BoxKind::Highlight => PrimitiveKind::Highlight,
            BoxKind::Opaque => PrimitiveKind::Opaque,
        }
    }
}

/// One visual element for the external surface to draw
///
/// Serializable so the descriptor list can cross a process boundary to
/// whatever canvas technology hosts the document preview.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DrawPrimitive {
    pub id: AnnotationId,
    pub kind: PrimitiveKind,
    pub x: f32,
    pub y: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "fontSize", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    /// Selected annotations are drawn with a distinguishing outline
    pub selected: bool,
}

/// Build the draw list for the current state
///
/// One primitive per annotation, in z-order (bottom first), with the
/// `selected` flag set for every id in the selection.
pub fn build_scene(set: &AnnotationSet, selection: &Selection) -> Vec<DrawPrimitive> {
    set.iter()
        .map(|annotation| {
            let (kind, text, font_size, fill) = match annotation.shape() {
                Shape::Text {
                    content, font_size, ..
                } => (
                    PrimitiveKind::Text,
                    Some(content.clone()),
                    Some(*font_size),
                    None,
                ),
                Shape::Box { kind, fill, .. } => ((*kind).into(), None, None, Some(*fill)),
            };

            DrawPrimitive {
                id: annotation.id(),
                kind,
                x: annotation.x(),
                y: annotation.y(),
                width: annotation.width(),
                height: annotation.height(),
                text,
                font_size,
                fill,
                selected: selection.contains(annotation.id()),
            }
        })
        .collect()
}

/// Event reported back by the rendering surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// The user clicked an annotation (extend = shift held)
    Clicked { id: AnnotationId, extend: bool },
    /// A drag or resize finished with this final geometry
    ManipulationFinished {
        id: AnnotationId,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Fold a surface event into the editing command it stands for
pub fn command_for_event(event: SurfaceEvent) -> Command {
    match event {
        SurfaceEvent::Clicked { id, extend } => Command::Select { id, extend },
        SurfaceEvent::ManipulationFinished {
            id,
            x,
            y,
            width,
            height,
        } => Command::UpdateGeometry {
            id,
            x,
            y,
            width,
            height,
        },
    }
}
