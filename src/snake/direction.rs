use bevy::math::{IVec2, Vec2};
use bevy::prelude::{KeyCode, Reflect};
use std::fmt::Display;

/// One of the four directions a snake segment can enter or leave a cell through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Direction {
  Left,
  Top,
  Right,
  Bottom,
}

impl Direction {
  pub const ALL: [Direction; 4] = [Direction::Left, Direction::Top, Direction::Right, Direction::Bottom];

  /// The offset to the neighbouring cell in this direction. The Y axis points up.
  pub fn offset(self) -> IVec2 {
    match self {
      Direction::Left => IVec2::new(-1, 0),
      Direction::Top => IVec2::new(0, 1),
      Direction::Right => IVec2::new(1, 0),
      Direction::Bottom => IVec2::new(0, -1),
    }
  }

  pub fn unit(self) -> Vec2 {
    self.offset().as_vec2()
  }

  /// The rotation (counter-clockwise, in degrees) of a sprite facing this direction. A sprite facing [`Direction::Top`]
  /// is not rotated.
  pub fn angle_degrees(self) -> f32 {
    match self {
      Direction::Left => 90.,
      Direction::Top => 0.,
      Direction::Right => -90.,
      Direction::Bottom => 180.,
    }
  }

  pub fn opposite(self) -> Self {
    match self {
      Direction::Left => Direction::Right,
      Direction::Top => Direction::Bottom,
      Direction::Right => Direction::Left,
      Direction::Bottom => Direction::Top,
    }
  }

  /// The next direction when turning clockwise, i.e. Left -> Top -> Right -> Bottom -> Left.
  pub fn clockwise_next(self) -> Self {
    match self {
      Direction::Left => Direction::Top,
      Direction::Top => Direction::Right,
      Direction::Right => Direction::Bottom,
      Direction::Bottom => Direction::Left,
    }
  }

  /// Maps the arrow keys and WASD to a direction.
  pub fn from_key(key_code: KeyCode) -> Option<Self> {
    match key_code {
      KeyCode::ArrowLeft | KeyCode::KeyA => Some(Direction::Left),
      KeyCode::ArrowUp | KeyCode::KeyW => Some(Direction::Top),
      KeyCode::ArrowRight | KeyCode::KeyD => Some(Direction::Right),
      KeyCode::ArrowDown | KeyCode::KeyS => Some(Direction::Bottom),
      _ => None,
    }
  }
}

impl Display for Direction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}", self)
  }
}
