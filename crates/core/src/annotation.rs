//! Annotation data model
//!
//! Annotations are overlaid on a displayed document (image or PDF page) in
//! surface coordinates: origin at the top-left, x to the right, y downward,
//! units in surface pixels. The model carries no rendering logic; it only
//! describes what the external surface should draw.

/// Unique identifier for an annotation
///
/// Stable across the document lifetime, persists in saved and exported sets.
/// Generated using UUID v4 for guaranteed uniqueness, including under rapid
/// successive creation within the same event tick.
pub type AnnotationId = uuid::Uuid;

/// RGBA fill color
///
/// The alpha channel is a semantic signal, not cosmetic: a rectangle reads
/// through at 0.3, a highlight at 0.4, and an opaque mask fully covers the
/// content underneath at 1.0.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Fill {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0.0, 1.0]`
    pub alpha: f32,
}

impl Fill {
    /// Create a new fill color
    pub const fn new(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self { r, g, b, alpha }
    }

    /// Format as a CSS-style `rgba(r, g, b, a)` string
    ///
    /// This is the interchange form used by the export format.
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.alpha)
    }

    /// Parse a CSS-style `rgba(r, g, b, a)` string
    ///
    /// Returns `None` for anything that is not a well-formed rgba() literal
    /// with channel values in range and a finite alpha in `[0.0, 1.0]`.
    pub fn parse_css(s: &str) -> Option<Self> {
        let inner = s
            .trim()
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))?;

        let mut parts = inner.split(',').map(str::trim);
        let r = parts.next()?.parse::<u8>().ok()?;
        let g = parts.next()?.parse::<u8>().ok()?;
        let b = parts.next()?.parse::<u8>().ok()?;
        let alpha = parts.next()?.parse::<f32>().ok()?;

        if parts.next().is_some() {
            return None;
        }
        if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
            return None;
        }

        Some(Self { r, g, b, alpha })
    }
}

/// Kind of box-shaped annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxKind {
    /// Translucent outline rectangle
    Rect,
    /// Translucent highlight over content
    Highlight,
    /// Fully opaque mask hiding content
    Opaque,
}

impl BoxKind {
    /// Default fill for this kind
    pub const fn default_fill(self) -> Fill {
        match self {
            BoxKind::Rect => Fill::new(0, 0, 255, 0.3),
            BoxKind::Highlight => Fill::new(255, 255, 0, 0.4),
            BoxKind::Opaque => Fill::new(0, 0, 0, 1.0),
        }
    }

    /// Default position and size for a freshly created box: (x, y, width, height)
    pub const fn default_geometry(self) -> (f32, f32, f32, f32) {
        match self {
            BoxKind::Rect => (100.0, 100.0, 100.0, 50.0),
            BoxKind::Highlight => (50.0, 50.0, 150.0, 50.0),
            BoxKind::Opaque => (50.0, 50.0, 150.0, 50.0),
        }
    }
}

/// Default content for a freshly created text label
pub const DEFAULT_TEXT_CONTENT: &str = "New Text";

/// Default font size for text labels, in surface pixels
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Tagged annotation shape
///
/// A text label has no explicit extent until it is resized; boxes always
/// carry width, height and fill.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Text {
        content: String,
        font_size: f32,
        /// Adopted only once the label has been resized
        width: Option<f32>,
        height: Option<f32>,
    },
    Box {
        kind: BoxKind,
        width: f32,
        height: f32,
        fill: Fill,
    },
}

/// A single annotation: stable id, position and shape
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Stable unique identifier
    id: AnnotationId,

    /// Position in surface coordinates
    x: f32,
    y: f32,

    /// Shape variant
    shape: Shape,
}

impl Annotation {
    /// Create a text label with default content and font size
    pub fn text(x: f32, y: f32) -> Self {
        Self {
            id: AnnotationId::new_v4(),
            x,
            y,
            shape: Shape::Text {
                content: DEFAULT_TEXT_CONTENT.to_string(),
                font_size: DEFAULT_FONT_SIZE,
                width: None,
                height: None,
            },
        }
    }

    /// Create a box annotation with kind-specific default geometry and fill
    pub fn boxed(kind: BoxKind) -> Self {
        let (x, y, width, height) = kind.default_geometry();
        Self {
            id: AnnotationId::new_v4(),
            x,
            y,
            shape: Shape::Box {
                kind,
                width,
                height,
                fill: kind.default_fill(),
            },
        }
    }

    /// Create an annotation with a specific id (for deserialization)
    pub fn with_id(id: AnnotationId, x: f32, y: f32, shape: Shape) -> Self {
        Self { id, x, y, shape }
    }

    /// Get the annotation id
    pub fn id(&self) -> AnnotationId {
        self.id
    }

    /// Get the x position
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Get the y position
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Get the shape
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Width, if the annotation has one (boxes always, text once resized)
    pub fn width(&self) -> Option<f32> {
        match &self.shape {
            Shape::Text { width, .. } => *width,
            Shape::Box { width, .. } => Some(*width),
        }
    }

    /// Height, if the annotation has one
    pub fn height(&self) -> Option<f32> {
        match &self.shape {
            Shape::Text { height, .. } => *height,
            Shape::Box { height, .. } => Some(*height),
        }
    }

    /// Replace position and extent, preserving kind, fill and text content
    ///
    /// Text labels adopt an explicit width/height here; boxes overwrite
    /// theirs. Everything else about the annotation is untouched.
    pub(crate) fn set_geometry(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.x = x;
        self.y = y;
        match &mut self.shape {
            Shape::Text {
                width: w,
                height: h,
                ..
            } => {
                *w = Some(width);
                *h = Some(height);
            }
            Shape::Box {
                width: w,
                height: h,
                ..
            } => {
                *w = width;
                *h = height;
            }
        }
    }

    /// Check that every numeric field is finite
    pub fn is_finite(&self) -> bool {
        if !self.x.is_finite() || !self.y.is_finite() {
            return false;
        }
        match &self.shape {
            Shape::Text {
                font_size,
                width,
                height,
                ..
            } => {
                font_size.is_finite()
                    && width.map_or(true, f32::is_finite)
                    && height.map_or(true, f32::is_finite)
            }
            Shape::Box {
                width,
                height,
                fill,
                ..
            } => width.is_finite() && height.is_finite() && fill.alpha.is_finite(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_defaults() {
        let annotation = Annotation::text(50.0, 50.0);
        assert_eq!(annotation.x(), 50.0);
        assert_eq!(annotation.y(), 50.0);
        match annotation.shape() {
            Shape::Text {
                content,
                font_size,
                width,
                height,
            } => {
                assert_eq!(content, "New Text");
                assert_eq!(*font_size, 16.0);
                assert!(width.is_none());
                assert!(height.is_none());
            }
            other => panic!("expected text shape, got {other:?}"),
        }
    }

    #[test]
    fn box_kind_defaults() {
        let rect = Annotation::boxed(BoxKind::Rect);
        assert_eq!(rect.x(), 100.0);
        assert_eq!(rect.width(), Some(100.0));

        let highlight = Annotation::boxed(BoxKind::Highlight);
        assert_eq!(highlight.width(), Some(150.0));

        for (kind, alpha) in [
            (BoxKind::Rect, 0.3),
            (BoxKind::Highlight, 0.4),
            (BoxKind::Opaque, 1.0),
        ] {
            assert_eq!(kind.default_fill().alpha, alpha);
        }
    }

    #[test]
    fn fresh_annotations_get_distinct_ids() {
        let a = Annotation::text(0.0, 0.0);
        let b = Annotation::text(0.0, 0.0);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn text_adopts_extent_on_resize() {
        let mut annotation = Annotation::text(50.0, 50.0);
        annotation.set_geometry(10.0, 20.0, 120.0, 40.0);

        assert_eq!(annotation.x(), 10.0);
        assert_eq!(annotation.y(), 20.0);
        assert_eq!(annotation.width(), Some(120.0));
        assert_eq!(annotation.height(), Some(40.0));
        match annotation.shape() {
            Shape::Text { content, .. } => assert_eq!(content, "New Text"),
            other => panic!("expected text shape, got {other:?}"),
        }
    }

    #[test]
    fn set_geometry_preserves_fill() {
        let mut annotation = Annotation::boxed(BoxKind::Highlight);
        annotation.set_geometry(0.0, 0.0, 300.0, 80.0);
        match annotation.shape() {
            Shape::Box { kind, fill, .. } => {
                assert_eq!(*kind, BoxKind::Highlight);
                assert_eq!(*fill, Fill::new(255, 255, 0, 0.4));
            }
            other => panic!("expected box shape, got {other:?}"),
        }
    }

    #[test]
    fn fill_css_round_trip() {
        let fill = Fill::new(0, 0, 255, 0.3);
        let css = fill.to_css();
        assert_eq!(css, "rgba(0, 0, 255, 0.3)");
        assert_eq!(Fill::parse_css(&css), Some(fill));
    }

    #[test]
    fn fill_parse_rejects_malformed_input() {
        for input in [
            "",
            "rgb(0, 0, 0)",
            "rgba(0, 0, 0)",
            "rgba(0, 0, 0, 1, 2)",
            "rgba(300, 0, 0, 1)",
            "rgba(0, 0, 0, 1.5)",
            "rgba(0, 0, 0, NaN)",
        ] {
            assert!(Fill::parse_css(input).is_none(), "accepted {input:?}");
        }
    }

    #[test]
    fn non_finite_geometry_is_detected() {
        let mut annotation = Annotation::boxed(BoxKind::Rect);
        assert!(annotation.is_finite());
        annotation.set_geometry(f32::NAN, 0.0, 10.0, 10.0);
        assert!(!annotation.is_finite());
    }
}
