//! Pose presets and the part transform resolver.
//!
//! Every part's offset is rotated by the *body* angle only, never by its own
//! angle or by any other part's. A part's own angle only rotates how it is
//! drawn. This single level of parenting is intentional and must not grow
//! into a full kinematic chain.

use glam::{Mat2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::part::{Anchor, PartName};
use crate::rig::Rig;

/// Rotation for `degrees` in y-down screen space (positive turns clockwise on screen).
#[inline]
pub fn rotation(degrees: f32) -> Mat2 {
    Mat2::from_angle(degrees.to_radians())
}

/// World position of a part's anchor: rig centre + R(body) * local offset.
pub fn part_world_position(rig: &Rig, part: PartName) -> Vec2 {
    let body = rotation(rig.parts().angle(PartName::Body));
    rig.center() + body * rig.parts().get(part).offset
}

/// A part ready to draw.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPart {
    pub name: PartName,
    /// World position of the anchor (centre, or top-edge midpoint for top-pivot parts).
    pub anchor_point: Vec2,
    pub angle: f32,
    pub anchor: Anchor,
    pub size: Vec2,
}

impl ResolvedPart {
    /// Corners of the rotated rectangle, clockwise from the top-left.
    pub fn corners(&self) -> [Vec2; 4] {
        let rot = rotation(self.angle);
        let half_w = self.size.x / 2.0;
        let (top, bottom) = match self.anchor {
            Anchor::Center => (-self.size.y / 2.0, self.size.y / 2.0),
            Anchor::TopPivot => (0.0, self.size.y),
        };
        [
            Vec2::new(-half_w, top),
            Vec2::new(half_w, top),
            Vec2::new(half_w, bottom),
            Vec2::new(-half_w, bottom),
        ]
        .map(|local| self.anchor_point + rot * local)
    }

    /// Geometric centre of the drawn rectangle.
    pub fn center(&self) -> Vec2 {
        match self.anchor {
            Anchor::Center => self.anchor_point,
            Anchor::TopPivot => {
                self.anchor_point + rotation(self.angle) * Vec2::new(0.0, self.size.y / 2.0)
            }
        }
    }
}

/// Resolve every part of `rig`, in draw order.
pub fn resolve(rig: &Rig) -> [ResolvedPart; 7] {
    PartName::DRAW_ORDER.map(|name| {
        let part = rig.parts().get(name);
        ResolvedPart {
            name,
            anchor_point: part_world_position(rig, name),
            angle: part.angle,
            anchor: part.anchor,
            size: part.size,
        }
    })
}

/// Discrete, non-animated angle override. Parts not listed are left alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplicitPose {
    pub angles: Vec<(PartName, f32)>,
}

impl ExplicitPose {
    pub fn new(angles: impl IntoIterator<Item = (PartName, f32)>) -> Self {
        Self {
            angles: angles.into_iter().collect(),
        }
    }

    /// Build from string-keyed pairs; fails on the first unknown part name.
    pub fn from_named<'a>(
        angles: impl IntoIterator<Item = (&'a str, f32)>,
    ) -> Result<Self, RigError> {
        let angles = angles
            .into_iter()
            .map(|(name, deg)| Ok((name.parse::<PartName>()?, deg)))
            .collect::<Result<Vec<_>, RigError>>()?;
        Ok(Self { angles })
    }

    /// Relaxed lean: body back, head up, arms loose, weight on one leg.
    pub fn slouch() -> Self {
        Self::new([
            (PartName::Body, -3.0),
            (PartName::Head, 5.0),
            (PartName::LeftArm, -15.0),
            (PartName::RightArm, 25.0),
            (PartName::LeftLeg, -5.0),
            (PartName::RightLeg, 10.0),
        ])
    }
}

/// Pose buttons offered by the action menu.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosePreset {
    /// All angles and offsets back to neutral.
    Stand,
    /// Neutral, then the continuous breathing loop.
    Breathe,
    Slouch,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) {
        assert!((a - b).length() < 1e-3, "left={a} right={b}");
    }

    #[test]
    fn upright_center_part_corners() {
        let part = ResolvedPart {
            name: PartName::Body,
            anchor_point: Vec2::new(100.0, 100.0),
            angle: 0.0,
            anchor: Anchor::Center,
            size: Vec2::new(40.0, 60.0),
        };
        let c = part.corners();
        close(c[0], Vec2::new(80.0, 70.0));
        close(c[2], Vec2::new(120.0, 130.0));
        close(part.center(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn top_pivot_swings_from_the_top_edge() {
        let part = ResolvedPart {
            name: PartName::RightArm,
            anchor_point: Vec2::new(0.0, 0.0),
            angle: -90.0,
            anchor: Anchor::TopPivot,
            size: Vec2::new(8.0, 50.0),
        };
        // The hanging arm (pointing +y) swings out to +x.
        close(part.center(), Vec2::new(25.0, 0.0));
        let c = part.corners();
        // Top edge stays centred on the pivot.
        close((c[0] + c[1]) / 2.0, Vec2::ZERO);
        close((c[2] + c[3]) / 2.0, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn named_pose_rejects_unknown_parts() {
        let pose = ExplicitPose::from_named([("body", -3.0), ("head", 5.0)]).unwrap();
        assert_eq!(pose.angles.len(), 2);
        let err = ExplicitPose::from_named([("body", 1.0), ("tail", 2.0)]).unwrap_err();
        assert_eq!(err.category(), "part");
    }
}
