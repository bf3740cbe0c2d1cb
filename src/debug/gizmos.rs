use crate::game_world::{Board, StrokeSlot};
use crate::prelude::GeneralSettings;
use crate::snake::SnakeState;
use bevy::app::{App, Plugin, Update};
use bevy::color::Color;
use bevy::color::palettes::tailwind;
use bevy::math::{Isometry2d, Vec2};
use bevy::prelude::{Gizmos, Query, Res, ViewVisibility};

/// A plugin that renders gizmos for debugging purposes.
pub struct GizmosPlugin;

impl Plugin for GizmosPlugin {
  fn build(&self, app: &mut App) {
    app.add_systems(Update, render_gizmos_system);
  }
}

fn render_gizmos_system(
  mut gizmos: Gizmos,
  general_settings: Res<GeneralSettings>,
  snake: Option<Res<SnakeState>>,
  board: Option<Res<Board>>,
  strokes: Query<(&StrokeSlot, &ViewVisibility)>,
) {
  if !general_settings.display_ribbon_gizmos {
    return;
  }

  // Ribbon rails
  for (slot, visibility) in strokes.iter() {
    if !visibility.get() {
      continue;
    }
    let transform = slot.ribbon.transform();
    let rail = |joints: &[Vec2]| joints.iter().map(|joint| transform.transform_point2(*joint)).collect::<Vec<_>>();
    gizmos.linestrip_2d(rail(slot.ribbon.left_joints()), Color::from(tailwind::CYAN_300));
    gizmos.linestrip_2d(rail(slot.ribbon.right_joints()), Color::from(tailwind::AMBER_400));
  }

  // Food
  let (Some(snake), Some(board)) = (snake, board) else {
    return;
  };
  for cell in snake.food.iter() {
    gizmos.circle_2d(
      Isometry2d::from_translation(board.cell_center(*cell)),
      board.cell_size() * 0.5,
      Color::from(tailwind::RED_300),
    );
  }
}
