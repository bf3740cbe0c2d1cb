use crate::game_world::Board;
use crate::prelude::constants::*;
use bevy::app::{App, Plugin, Startup, Update};
use bevy::prelude::*;
use bevy::window::WindowResized;

/// A plugin that spawns the camera and keeps the whole board in view.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
  fn build(&self, app: &mut App) {
    app
      .insert_resource(ClearColor(CLEAR_COLOUR))
      .add_systems(Startup, setup_camera_system)
      .add_systems(Update, fit_board_system.run_if(resource_exists::<Board>));
  }
}

#[derive(Component)]
struct MainCamera;

fn setup_camera_system(mut commands: Commands) {
  commands.spawn((Name::new("Camera"), Camera2d, MainCamera));
}

// Scales the camera projection so that the board covers most of the window along its tighter axis
fn fit_board_system(
  mut resize_messages: MessageReader<WindowResized>,
  board: Res<Board>,
  mut projection: Single<&mut Projection, With<MainCamera>>,
) {
  let Projection::Orthographic(projection) = &mut **projection else {
    return;
  };
  for window_resized in resize_messages.read() {
    projection.scale = fit_scale(Vec2::new(window_resized.width, window_resized.height), board.extent());
  }
}

/// The orthographic scale that fits `extent` into `BOARD_SCREEN_COVERAGE` of `window_size`.
fn fit_scale(window_size: Vec2, extent: Vec2) -> f32 {
  let available = window_size * BOARD_SCREEN_COVERAGE;
  if available.x <= 0. || available.y <= 0. {
    return 1.;
  }
  let h_scale = available.x / extent.x;
  let v_scale = available.y / extent.y;
  1. / h_scale.min(v_scale)
}
