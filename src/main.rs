mod animation;
mod app_states;
mod camera;
mod controls;
mod debug;
mod food;
mod game_loop;
mod game_world;
mod grid;
mod shared;
mod snake;
mod stroke;
mod ui;

mod prelude {
  pub use crate::shared::*;
}

#[cfg(feature = "dev")]
use crate::debug::DebugPlugin;

use crate::animation::AnimationPlugin;
use crate::app_states::AppStatePlugin;
use crate::camera::CameraPlugin;
use crate::controls::ControlsPlugin;
use crate::food::FoodPlugin;
use crate::game_loop::GameLoopPlugin;
use crate::game_world::GameWorldPlugin;
use crate::prelude::constants::WINDOW_TITLE;
use crate::prelude::*;
use crate::snake::SnakePlugin;
use crate::ui::UiPlugin;
use bevy::prelude::*;

fn main() {
  let mut app = App::new();
  app
    .add_plugins(DefaultPlugins.set(WindowPlugin {
      primary_window: Some(Window {
        title: WINDOW_TITLE.to_string(),
        ..default()
      }),
      ..default()
    }))
    .add_plugins((
      CameraPlugin,
      AppStatePlugin,
      SharedResourcesPlugin,
      SharedMessagesPlugin,
      AnimationPlugin,
      GameWorldPlugin,
      SnakePlugin,
      FoodPlugin,
      GameLoopPlugin,
      UiPlugin,
      ControlsPlugin,
    ));

  #[cfg(feature = "dev")]
  app.add_plugins(DebugPlugin);

  app.run();
}
