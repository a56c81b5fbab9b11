//! Placeholder vector art, described as data so any surface can draw it.
//!
//! Coordinates are in the node's local space, y pointing down, with the
//! seagull facing right (+x) at scale `(1, 1)`.

use serde::{Deserialize, Serialize};

use crate::transform::Vec2;

/// RGBA color, 8 bits per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const fn hex(rgb: u32) -> Self {
        Rgba([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 0xff])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Ellipse { center: Vec2, radii: Vec2, fill: Rgba },
    Circle { center: Vec2, radius: f32, fill: Rgba },
    Triangle { points: [Vec2; 3], fill: Rgba },
    /// Axis-aligned rectangle from its top-left corner.
    Rect { origin: Vec2, size: Vec2, fill: Rgba },
    /// Centered text label.
    Text { center: Vec2, text: String, font_size: f32 },
}

/// Elliptical hit region centered on the node origin:
/// a point is inside when `(dx/rx)^2 + (dy/ry)^2 <= 1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HitRegion {
    pub radii: Vec2,
}

impl HitRegion {
    pub const fn ellipse(rx: f32, ry: f32) -> Self {
        Self {
            radii: Vec2::new(rx, ry),
        }
    }

    pub fn contains(&self, origin: Vec2, point: Vec2) -> bool {
        if self.radii.x <= 0.0 || self.radii.y <= 0.0 {
            return false;
        }
        let nx = (point.x - origin.x) / self.radii.x;
        let ny = (point.y - origin.y) / self.radii.y;
        nx * nx + ny * ny <= 1.0
    }
}

/// A drawable asset: its shapes plus the region that counts as "on" it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Art {
    pub name: String,
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub hit_region: Option<HitRegion>,
}

impl Art {
    /// Empty grouping node.
    pub fn group(name: &str) -> Self {
        Self {
            name: name.to_string(),
            shapes: Vec::new(),
            hit_region: None,
        }
    }
}

const WHITE: Rgba = Rgba::hex(0xffffff);
const WING: Rgba = Rgba::hex(0xe8e8e8);
const BEAK: Rgba = Rgba::hex(0xf5a623);
const EYE: Rgba = Rgba::hex(0x222222);

/// Seagull body. Wings are drawn as triangles through the curve control points.
pub fn seagull() -> Art {
    let v = Vec2::new;
    Art {
        name: "seagull".into(),
        shapes: vec![
            Shape::Ellipse { center: v(0.0, 0.0), radii: v(28.0, 18.0), fill: WHITE },
            Shape::Triangle { points: [v(-28.0, -5.0), v(-50.0, -25.0), v(-20.0, -15.0)], fill: WING },
            Shape::Triangle { points: [v(28.0, -5.0), v(50.0, -25.0), v(20.0, -15.0)], fill: WING },
            Shape::Circle { center: v(30.0, -12.0), radius: 14.0, fill: WHITE },
            Shape::Triangle { points: [v(40.0, -12.0), v(52.0, -10.0), v(40.0, -8.0)], fill: BEAK },
            Shape::Circle { center: v(34.0, -15.0), radius: 3.0, fill: EYE },
            Shape::Circle { center: v(35.0, -16.0), radius: 1.0, fill: WHITE },
        ],
        hit_region: Some(HitRegion::ellipse(60.0, 45.0)),
    }
}

/// Bait: a fries box with five fries and an emoji label.
pub fn fries() -> Art {
    let v = Vec2::new;
    let mut shapes = vec![Shape::Rect {
        origin: v(-15.0, -5.0),
        size: v(30.0, 20.0),
        fill: Rgba::hex(0xff3b30),
    }];
    shapes.extend((-2..=2).map(|i| Shape::Rect {
        origin: v(i as f32 * 5.0 - 1.5, -25.0),
        size: v(3.0, 22.0),
        fill: Rgba::hex(0xffd60a),
    }));
    shapes.push(Shape::Text {
        center: v(0.0, -8.0),
        text: "\u{1f35f}".into(),
        font_size: 20.0,
    });
    Art {
        name: "fries".into(),
        shapes,
        hit_region: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_region_is_elliptical() {
        let r = HitRegion::ellipse(60.0, 45.0);
        let o = Vec2::new(100.0, 100.0);
        assert!(r.contains(o, Vec2::new(160.0, 100.0)));
        assert!(r.contains(o, Vec2::new(100.0, 145.0)));
        assert!(!r.contains(o, Vec2::new(100.0, 150.0)));
        // Inside the bounding box, outside the ellipse.
        assert!(!r.contains(o, Vec2::new(155.0, 140.0)));
    }

    #[test]
    fn degenerate_region_contains_nothing() {
        assert!(!HitRegion::ellipse(0.0, 10.0).contains(Vec2::ZERO, Vec2::ZERO));
    }

    #[test]
    fn beak_tip_matches_flight_reach() {
        let art = seagull();
        let tip = art.shapes.iter().find_map(|s| match s {
            Shape::Triangle { points, fill } if *fill == BEAK => Some(points[1]),
            _ => None,
        });
        assert_eq!(tip, Some(Vec2::new(52.0, -10.0)));
    }

    #[test]
    fn fries_have_five_sticks() {
        let rects = fries()
            .shapes
            .iter()
            .filter(|s| matches!(s, Shape::Rect { size, .. } if size.x == 3.0))
            .count();
        assert_eq!(rects, 5);
    }
}
