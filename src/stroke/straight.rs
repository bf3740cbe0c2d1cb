use crate::stroke::{StrokeParams, joint_factor, lerp};
use bevy::math::Vec2;

/// A stroke crossing a cell in a straight line from its top edge (progress `0`) to its bottom edge (progress `1`).
/// Rotate the ribbon to align it with the segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StraightStroke {
  pub params: StrokeParams,
  /// The height of the cell the stroke is drawn in.
  pub height: f32,
}

impl StraightStroke {
  pub const JOINTS: usize = 2;

  pub fn new(height: f32) -> Self {
    Self {
      params: StrokeParams::default(),
      height,
    }
  }

  pub fn fill_joints(&self, left: &mut [Vec2], right: &mut [Vec2]) {
    let StrokeParams {
      progress_range,
      width_range,
      ..
    } = self.params;
    let half_height = self.height * 0.5;

    for i in 0..Self::JOINTS {
      let t = joint_factor(i, Self::JOINTS);
      let half_width = lerp(width_range.x, width_range.y, t) * 0.5;
      let y = lerp(half_height, -half_height, lerp(progress_range.x, progress_range.y, t));
      left[i] = Vec2::new(-half_width, y);
      right[i] = Vec2::new(half_width, y);
    }
  }
}
