use crate::snake::Placement;
use crate::stroke::{joint_factor, lerp};
use bevy::math::Vec2;

/// A single key of a [`FreeformStroke`]: the rails at `time` and the tangent both rails share there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
  pub time: f32,
  pub left: Vec2,
  pub right: Vec2,
  pub tangent: Vec2,
}

/// A stroke following an arbitrary path described by keyframes. Rails between keyframes are cubic Hermite splines
/// using the keyframe tangents, sampled uniformly over the covered time span.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FreeformStroke {
  keyframes: Vec<Keyframe>,
}

impl FreeformStroke {
  pub const JOINTS: usize = 1000;
  pub const TEXTURE_V_RANGE: Vec2 = Vec2::new(1., 0.);

  /// Adds a keyframe whose rails are `width` apart, perpendicular to the placement's facing. Keyframes are kept sorted
  /// by time.
  pub fn add(&mut self, time: f32, placement: Placement, width: f32, tangent: Vec2) {
    let rotation = Vec2::from_angle(placement.angle_degrees.to_radians());
    let keyframe = Keyframe {
      time,
      left: rotation.rotate(Vec2::new(-width / 2., 0.)) + placement.position,
      right: rotation.rotate(Vec2::new(width / 2., 0.)) + placement.position,
      tangent,
    };
    let index = self.keyframes.partition_point(|k| k.time <= time);
    self.keyframes.insert(index, keyframe);
  }

  pub fn clear(&mut self) {
    self.keyframes.clear();
  }

  pub fn keyframes(&self) -> &[Keyframe] {
    &self.keyframes
  }

  pub fn time_from(&self) -> Option<f32> {
    self.keyframes.first().map(|k| k.time)
  }

  pub fn time_to(&self) -> Option<f32> {
    self.keyframes.last().map(|k| k.time)
  }

  /// Evaluates the left and right rails at `time`, clamped to the span of the keyframes. Returns `None` if there are no
  /// keyframes.
  pub fn evaluate(&self, time: f32) -> Option<(Vec2, Vec2)> {
    let first = self.keyframes.first()?;
    let last = self.keyframes.last()?;
    if time <= first.time {
      return Some((first.left, first.right));
    }
    if time >= last.time {
      return Some((last.left, last.right));
    }

    let next = self.keyframes.partition_point(|k| k.time <= time);
    let (k0, k1) = (&self.keyframes[next - 1], &self.keyframes[next]);
    let span = k1.time - k0.time;
    if span <= f32::EPSILON {
      return Some((k1.left, k1.right));
    }
    let t = (time - k0.time) / span;
    let m0 = k0.tangent * span;
    let m1 = k1.tangent * span;

    Some((hermite(k0.left, m0, k1.left, m1, t), hermite(k0.right, m0, k1.right, m1, t)))
  }

  pub fn fill_joints(&self, left: &mut [Vec2], right: &mut [Vec2]) {
    let (Some(time_from), Some(time_to)) = (self.time_from(), self.time_to()) else {
      left[..Self::JOINTS].fill(Vec2::ZERO);
      right[..Self::JOINTS].fill(Vec2::ZERO);
      return;
    };

    for i in 0..Self::JOINTS {
      let time = lerp(time_from, time_to, joint_factor(i, Self::JOINTS));
      if let Some((l, r)) = self.evaluate(time) {
        left[i] = l;
        right[i] = r;
      }
    }
  }
}

fn hermite(p0: Vec2, m0: Vec2, p1: Vec2, m1: Vec2, t: f32) -> Vec2 {
  let t2 = t * t;
  let t3 = t2 * t;
  let h00 = 2. * t3 - 3. * t2 + 1.;
  let h10 = t3 - 2. * t2 + t;
  let h01 = -2. * t3 + 3. * t2;
  let h11 = t3 - t2;
  p0 * h00 + m0 * h10 + p1 * h01 + m1 * h11
}
