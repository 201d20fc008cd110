//! The view box a document declares
//!
//! usvg folds the root `viewBox` and `preserveAspectRatio` into a transform
//! on a wrapper group and keeps only the output size. Geometry queries
//! answer in the document's own user space, so the rectangle is read back
//! from the XML and the transform rebuilt from it.

use limner_core::Rect;
use tiny_skia::Transform;
use usvg::roxmltree;

/// `viewBox` plus `preserveAspectRatio` of the root element
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ViewBox {
    pub rect: Rect,
    /// Alignment as fractions of the free space; `None` stretches
    align: Option<(f32, f32)>,
    slice: bool,
}

impl ViewBox {
    /// Read the root element's view box, falling back to `(0, 0, size)`
    pub fn from_document(doc: &roxmltree::Document, size: usvg::Size) -> Self {
        let root = doc.root_element();
        let rect = root
            .attribute("viewBox")
            .and_then(parse_rect)
            .unwrap_or_else(|| Rect::new(0.0, 0.0, size.width(), size.height()));
        let (align, slice) = root
            .attribute("preserveAspectRatio")
            .map(parse_aspect)
            .unwrap_or((Some((0.5, 0.5)), false));

        Self { rect, align, slice }
    }

    /// Map from user space into a canvas of `size`
    pub fn to_transform(&self, size: usvg::Size) -> Transform {
        let sx = size.width() / self.rect.width();
        let sy = size.height() / self.rect.height();

        let (sx, sy, (fx, fy)) = match self.align {
            None => (sx, sy, (0.0, 0.0)),
            Some(align) => {
                let s = if self.slice { sx.max(sy) } else { sx.min(sy) };
                (s, s, align)
            }
        };

        let free_w = size.width() - self.rect.width() * sx;
        let free_h = size.height() - self.rect.height() * sy;

        Transform::from_row(
            sx,
            0.0,
            0.0,
            sy,
            -self.rect.x() * sx + fx * free_w,
            -self.rect.y() * sy + fy * free_h,
        )
    }
}

/// `min-x min-y width height`; a non-positive size disables the view box
fn parse_rect(value: &str) -> Option<Rect> {
    let numbers: Vec<f32> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;

    match numbers[..] {
        [x, y, w, h] if numbers.iter().all(|n| n.is_finite()) && w > 0.0 && h > 0.0 => {
            Some(Rect::new(x, y, w, h))
        }
        _ => None,
    }
}

fn parse_aspect(value: &str) -> (Option<(f32, f32)>, bool) {
    let mut parts = value.split_whitespace().filter(|part| *part != "defer");
    let align = match parts.next() {
        Some("none") => None,
        Some(align) => Some(parse_align(align).unwrap_or((0.5, 0.5))),
        None => Some((0.5, 0.5)),
    };
    let slice = parts.next() == Some("slice");
    (align, slice)
}

/// `xMinYMid` and friends
fn parse_align(value: &str) -> Option<(f32, f32)> {
    let fraction = |part: &str| match part {
        "Min" => Some(0.0),
        "Mid" => Some(0.5),
        "Max" => Some(1.0),
        _ => None,
    };

    let rest = value.strip_prefix('x')?;
    let (x, y) = rest.split_once('Y')?;
    Some((fraction(x)?, fraction(y)?))
}
