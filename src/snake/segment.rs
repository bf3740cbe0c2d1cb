use crate::snake::direction::Direction;
use bevy::math::{IVec2, Vec2};
use bevy::prelude::{Quat, Reflect, Transform};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

/// The atomic unit of the snake's anatomy: the transition through a single cell, entering through `from` and leaving
/// through `to`.
///
/// `progress` measures how far the transition has advanced and lives in `[0, 1]`, although it may briefly exceed `1`
/// until the simulation consumes the overflow. `length` caches the travelled distance in world units.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Segment {
  pub cell: IVec2,
  pub from: Direction,
  pub to: Direction,
  pub progress: f32,
  pub length: f32,
}

impl Segment {
  pub fn new(cell: IVec2, from: Direction, to: Direction, progress: f32, length: f32) -> Self {
    assert_ne!(from, to, "A segment must not enter and leave through the same edge");
    Self {
      cell,
      from,
      to,
      progress,
      length,
    }
  }

  /// Whether the segment crosses its cell without turning.
  pub fn is_straight(&self) -> bool {
    self.from.opposite() == self.to
  }

  /// Whether the segment turns counter-clockwise when seen from above, i.e. when leaving through the edge that follows
  /// the entry edge in clockwise order.
  pub fn is_counter_clockwise_turn(&self) -> bool {
    self.from.clockwise_next() == self.to
  }

  /// The winding used by the curve renderer. Note that straight segments also report `true` here.
  pub fn is_clockwise(&self) -> bool {
    !self.is_counter_clockwise_turn()
  }

  /// A copy of this segment with its transition completed.
  pub fn snapshot(&self) -> Self {
    Self { progress: 1., ..*self }
  }

  /// The distance travelled through the cell at the given progress. Turns use `cell_size * PI / 4` for a full
  /// transition which is what the pacing of the game is tuned against.
  pub fn length_at(&self, cell_size: f32, progress: f32) -> f32 {
    let whole = if self.is_straight() {
      cell_size
    } else {
      cell_size * FRAC_PI_4
    };
    whole * progress
  }
}

/// A position and rotation in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
  pub position: Vec2,
  pub angle_degrees: f32,
}

impl Placement {
  pub fn to_transform(self, z: f32) -> Transform {
    Transform::from_translation(self.position.extend(z))
      .with_rotation(Quat::from_rotation_z(self.angle_degrees.to_radians()))
  }
}

/// Computes where along its cell a segment is at `aux_progress`, and which way it faces there. The segment itself is
/// left untouched so callers can sample arbitrary points of the transition.
pub fn interpolate(segment: &Segment, cell_center: Vec2, cell_size: f32, aux_progress: f32) -> Placement {
  let half_extents = Vec2::splat(cell_size / 2.);

  if segment.is_straight() {
    let offset = segment.from.unit().lerp(segment.to.unit(), aux_progress) * half_extents;
    return Placement {
      position: cell_center + offset,
      angle_degrees: segment.to.angle_degrees(),
    };
  }

  // Turns rotate around the corner shared by the entry and exit edges
  let origin = segment.from.unit() + segment.to.unit();
  let diff = -segment.to.unit();
  let sign = if segment.is_counter_clockwise_turn() { 1. } else { -1. };
  let radians = FRAC_PI_2 * sign * aux_progress;
  let rotated_diff = Vec2::from_angle(radians).rotate(diff);
  let offset = (origin + rotated_diff) * half_extents;

  Placement {
    position: cell_center + offset,
    angle_degrees: segment.from.opposite().angle_degrees() + radians.to_degrees(),
  }
}
