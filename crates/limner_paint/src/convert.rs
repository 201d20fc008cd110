//! Conversions between limner_core types and tiny-skia types

use limner_core::{Affine2D, Color, Rect};

/// Convert an Affine2D to a tiny-skia transform
pub fn to_skia_transform(transform: &Affine2D) -> tiny_skia::Transform {
    let [a, b, c, d, e, f] = transform.elements;
    tiny_skia::Transform::from_row(a, b, c, d, e, f)
}

/// Convert a tiny-skia transform to an Affine2D
pub fn from_skia_transform(transform: &tiny_skia::Transform) -> Affine2D {
    Affine2D::new(
        transform.sx,
        transform.ky,
        transform.kx,
        transform.sy,
        transform.tx,
        transform.ty,
    )
}

/// Convert a Rect to a tiny-skia rect
///
/// Returns `None` for empty or non-finite rects. tiny-skia itself accepts
/// a zero width or height.
pub fn to_skia_rect(rect: &Rect) -> Option<tiny_skia::Rect> {
    if !(rect.width() > 0.0 && rect.height() > 0.0) {
        return None;
    }
    tiny_skia::Rect::from_xywh(rect.x(), rect.y(), rect.width(), rect.height())
}

/// Convert a tiny-skia rect to a Rect
pub fn from_skia_rect(rect: &tiny_skia::Rect) -> Rect {
    Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

/// Convert a Color to a tiny-skia color
pub fn to_skia_color(color: &Color) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_rgba8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_component_order() {
        let t = Affine2D::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let skia = to_skia_transform(&t);
        assert_eq!((skia.sx, skia.ky, skia.kx, skia.sy), (1.0, 2.0, 3.0, 4.0));
        assert_eq!((skia.tx, skia.ty), (5.0, 6.0));
        assert_eq!(from_skia_transform(&skia), t);
    }

    #[test]
    fn test_empty_rect_has_no_skia_equivalent() {
        assert!(to_skia_rect(&Rect::ZERO).is_none());
        assert!(to_skia_rect(&Rect::new(1.0, 1.0, 0.0, 5.0)).is_none());
        assert!(to_skia_rect(&Rect::new(1.0, 1.0, 5.0, -2.0)).is_none());
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(from_skia_rect(&to_skia_rect(&r).unwrap()), r);
    }
}
