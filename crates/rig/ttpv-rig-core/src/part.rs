//! Named body parts and the fixed part set every rig carries.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::RigError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartName {
    Head,
    Neck,
    Body,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl PartName {
    /// Storage order inside `PartSet`.
    pub const ALL: [PartName; 7] = [
        PartName::Head,
        PartName::Neck,
        PartName::Body,
        PartName::LeftArm,
        PartName::RightArm,
        PartName::LeftLeg,
        PartName::RightLeg,
    ];

    /// Paint order: torso first, limbs, head last so it is never occluded.
    pub const DRAW_ORDER: [PartName; 7] = [
        PartName::Body,
        PartName::Neck,
        PartName::LeftLeg,
        PartName::RightLeg,
        PartName::LeftArm,
        PartName::RightArm,
        PartName::Head,
    ];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Neck => "neck",
            Self::Body => "body",
            Self::LeftArm => "left_arm",
            Self::RightArm => "right_arm",
            Self::LeftLeg => "left_leg",
            Self::RightLeg => "right_leg",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PartName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartName {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartName::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| RigError::UnknownPart { name: s.to_string() })
    }
}

/// Where a part's rotation pivot lies.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Rotates in place about its centre.
    Center,
    /// Rotates about the middle of its top edge (shoulder swing).
    TopPivot,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Part {
    pub name: PartName,
    /// Rig-local offset from the rig centre, before body rotation.
    pub offset: Vec2,
    /// Degrees.
    pub angle: f32,
    pub anchor: Anchor,
    /// Render size (width, height).
    pub size: Vec2,
}

impl Part {
    fn new(name: PartName, offset: (f32, f32), size: (f32, f32), anchor: Anchor) -> Self {
        Self {
            name,
            offset: Vec2::new(offset.0, offset.1),
            angle: 0.0,
            anchor,
            size: Vec2::new(size.0, size.1),
        }
    }
}

/// The seven parts of a rig. The set is fixed: parts are never added or removed.
#[derive(Clone, Debug, PartialEq)]
pub struct PartSet {
    parts: [Part; 7],
}

impl PartSet {
    /// Design defaults for a standing figure with a square head of `head_size`.
    pub fn standard(head_size: u32) -> Self {
        use Anchor::*;
        use PartName::*;
        let head = head_size as f32;
        Self {
            parts: [
                Part::new(Head, (0.0, -65.0), (head, head), Center),
                Part::new(Neck, (0.0, -40.0), (6.0, 20.0), Center),
                Part::new(Body, (0.0, 0.0), (40.0, 60.0), Center),
                Part::new(LeftArm, (-20.0, -30.0), (8.0, 50.0), TopPivot),
                Part::new(RightArm, (20.0, -30.0), (8.0, 50.0), TopPivot),
                Part::new(LeftLeg, (-15.0, 50.0), (10.0, 60.0), Center),
                Part::new(RightLeg, (15.0, 50.0), (10.0, 60.0), Center),
            ],
        }
    }

    #[inline]
    pub fn get(&self, name: PartName) -> &Part {
        &self.parts[name.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, name: PartName) -> &mut Part {
        &mut self.parts[name.index()]
    }

    /// Lookup by string name; fails with `UnknownPart`.
    pub fn by_name(&self, name: &str) -> Result<&Part, RigError> {
        Ok(self.get(name.parse()?))
    }

    pub fn by_name_mut(&mut self, name: &str) -> Result<&mut Part, RigError> {
        Ok(self.get_mut(name.parse()?))
    }

    #[inline]
    pub fn angle(&self, name: PartName) -> f32 {
        self.get(name).angle
    }

    #[inline]
    pub fn set_angle(&mut self, name: PartName, degrees: f32) {
        self.get_mut(name).angle = degrees;
    }

    pub fn zero_angles(&mut self) {
        for part in &mut self.parts {
            part.angle = 0.0;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_and_unknown_names() {
        assert_eq!("left_arm".parse::<PartName>().unwrap(), PartName::LeftArm);
        let err = "tail".parse::<PartName>().unwrap_err();
        assert_eq!(
            err,
            RigError::UnknownPart {
                name: "tail".into()
            }
        );
    }

    #[test]
    fn storage_order_matches_index() {
        let set = PartSet::standard(70);
        for name in PartName::ALL {
            assert_eq!(set.get(name).name, name);
        }
    }

    #[test]
    fn arms_pivot_at_the_shoulder() {
        let set = PartSet::standard(70);
        assert_eq!(set.get(PartName::LeftArm).anchor, Anchor::TopPivot);
        assert_eq!(set.get(PartName::RightArm).anchor, Anchor::TopPivot);
        assert_eq!(set.get(PartName::Body).anchor, Anchor::Center);
        assert_eq!(set.get(PartName::Head).size, Vec2::splat(70.0));
    }

    #[test]
    fn by_name_mut_edits_in_place() {
        let mut set = PartSet::standard(70);
        set.by_name_mut("head").unwrap().offset.x = 12.0;
        assert_eq!(set.get(PartName::Head).offset, Vec2::new(12.0, -65.0));
        assert!(set.by_name("wing").is_err());
    }

    #[test]
    fn zero_angles_resets_everything() {
        let mut set = PartSet::standard(70);
        set.set_angle(PartName::Body, 4.0);
        set.set_angle(PartName::RightArm, -90.0);
        set.zero_angles();
        assert!(set.iter().all(|p| p.angle == 0.0));
    }
}
