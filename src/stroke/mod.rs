//! Stroke primitives turn a one-dimensional progress interval and a width interval into the left and right rails of a
//! ribbon. The [`RibbonBuffer`] then triangulates those rails into a mesh.

mod curve;
mod freeform;
mod ribbon;
mod straight;

pub use curve::CurveStroke;
pub use freeform::{FreeformStroke, Keyframe};
pub use ribbon::RibbonBuffer;
pub use straight::StraightStroke;

use bevy::math::Vec2;

/// The parameters shared by the cell-bound stroke primitives. Each range is interpolated from `x` (the first joint) to
/// `y` (the last joint).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeParams {
  /// Progress through the cell, where `0` is the edge the segment leaves through and `1` the edge it enters through.
  pub progress_range: Vec2,
  /// The full width of the ribbon.
  pub width_range: Vec2,
  /// The vertical texture coordinate, which scrolls along the snake.
  pub texture_v_range: Vec2,
}

impl Default for StrokeParams {
  fn default() -> Self {
    Self {
      progress_range: Vec2::new(0., 1.),
      width_range: Vec2::new(100., 100.),
      texture_v_range: Vec2::new(1., -1.),
    }
  }
}

/// A ribbon primitive. Every variant knows how many joints it produces and how to place them.
#[derive(Debug, Clone, PartialEq)]
pub enum Stroke {
  Straight(StraightStroke),
  Curve(CurveStroke),
  Freeform(FreeformStroke),
}

impl Stroke {
  pub fn joint_count(&self) -> usize {
    match self {
      Stroke::Straight(_) => StraightStroke::JOINTS,
      Stroke::Curve(_) => CurveStroke::JOINTS,
      Stroke::Freeform(_) => FreeformStroke::JOINTS,
    }
  }

  pub fn texture_v_range(&self) -> Vec2 {
    match self {
      Stroke::Straight(straight) => straight.params.texture_v_range,
      Stroke::Curve(curve) => curve.params.texture_v_range,
      Stroke::Freeform(_) => FreeformStroke::TEXTURE_V_RANGE,
    }
  }

  pub fn params_mut(&mut self) -> Option<&mut StrokeParams> {
    match self {
      Stroke::Straight(straight) => Some(&mut straight.params),
      Stroke::Curve(curve) => Some(&mut curve.params),
      Stroke::Freeform(_) => None,
    }
  }

  /// Writes the local joint positions into `left` and `right`. Both slices must hold at least
  /// [`Stroke::joint_count`] elements.
  pub fn fill_joints(&self, left: &mut [Vec2], right: &mut [Vec2]) {
    debug_assert!(left.len() >= self.joint_count() && right.len() >= self.joint_count());
    match self {
      Stroke::Straight(straight) => straight.fill_joints(left, right),
      Stroke::Curve(curve) => curve.fill_joints(left, right),
      Stroke::Freeform(freeform) => freeform.fill_joints(left, right),
    }
  }
}

/// Interpolation factor of the joint at `index` out of `joints`.
pub(crate) fn joint_factor(index: usize, joints: usize) -> f32 {
  if joints < 2 {
    return 0.;
  }
  index as f32 / (joints - 1) as f32
}

pub(crate) fn lerp(from: f32, to: f32, t: f32) -> f32 {
  from + (to - from) * t
}
