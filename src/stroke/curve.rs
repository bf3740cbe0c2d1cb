use crate::stroke::{StrokeParams, joint_factor, lerp};
use bevy::math::Vec2;
use std::f32::consts::FRAC_PI_2;

/// A stroke turning through a square cell along a quarter circle around one of the cell's top corners. Progress `0`
/// is the middle of the top edge, progress `1` the middle of the left or right edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveStroke {
  pub params: StrokeParams,
  /// The edge length of the (square) cell the stroke is drawn in.
  pub size: f32,
  /// Whether the stroke bends around the top right corner (`true`) or the top left corner (`false`).
  pub clockwise: bool,
}

impl CurveStroke {
  pub const JOINTS: usize = 30;

  pub fn new(size: f32) -> Self {
    Self {
      params: StrokeParams {
        progress_range: Vec2::new(0.5, 1.),
        texture_v_range: Vec2::new(1., 0.),
        ..StrokeParams::default()
      },
      size,
      clockwise: true,
    }
  }

  pub fn fill_joints(&self, left: &mut [Vec2], right: &mut [Vec2]) {
    let StrokeParams {
      progress_range,
      width_range,
      ..
    } = self.params;
    let half_size = self.size * 0.5;
    let side = if self.clockwise { 1. } else { -1. };
    let axis = Vec2::new(half_size * side, half_size);
    let start = Vec2::new(-side, 0.);
    let rotation = FRAC_PI_2 * side;
    let rotation_from = rotation * progress_range.x;
    let rotation_to = rotation * progress_range.y;

    for i in 0..Self::JOINTS {
      let t = joint_factor(i, Self::JOINTS);
      let half_width = lerp(width_range.x, width_range.y, t) * 0.5;
      let rotated_unit = Vec2::from_angle(lerp(rotation_from, rotation_to, t)).rotate(start);
      let near = rotated_unit * (half_size - half_width) + axis;
      let far = rotated_unit * (half_size + half_width) + axis;
      if self.clockwise {
        left[i] = far;
        right[i] = near;
      } else {
        left[i] = near;
        right[i] = far;
      }
    }
  }
}
