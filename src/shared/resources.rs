use bevy::app::{App, Plugin};
use bevy::math::IVec2;
use bevy::prelude::{Reflect, ReflectResource, Resource};

#[cfg(feature = "dev")]
use bevy_inspector_egui::{InspectorOptions, prelude::ReflectInspectorOptions};

/// A plugin that registers and initialises shared resources used across the entire application such as
/// [`GameSettings`].
pub struct SharedResourcesPlugin;

impl Plugin for SharedResourcesPlugin {
  fn build(&self, app: &mut App) {
    app
      .init_resource::<Settings>()
      .register_type::<Settings>()
      .init_resource::<GeneralSettings>()
      .register_type::<GeneralSettings>()
      .init_resource::<GameSettings>()
      .register_type::<GameSettings>()
      .init_resource::<Score>();
  }
}

/// A resource that holds various settings that can be configured for the game. Intended for developer use only.
#[derive(Resource, Reflect, Clone, Copy, Default)]
pub struct Settings {
  pub general: GeneralSettings,
}

/// A resource that holds general settings, a child of the [`Settings`] resource. Intended for developer use only.
#[derive(Resource, Reflect, Clone, Copy)]
#[cfg_attr(feature = "dev", derive(InspectorOptions))]
#[cfg_attr(feature = "dev", reflect(Resource, InspectorOptions))]
#[cfg_attr(not(feature = "dev"), reflect(Resource))]
pub struct GeneralSettings {
  /// Whether to draw the ribbon rails and food cells as gizmos.
  pub display_ribbon_gizmos: bool,
  /// Whether to tint the background of every cell the snake occupies.
  pub tint_occupied_cells: bool,
}

impl Default for GeneralSettings {
  fn default() -> Self {
    Self {
      display_ribbon_gizmos: false,
      tint_occupied_cells: true,
    }
  }
}

/// A resource that holds the rules and looks of a round. Board dimensions are read once when the board is created,
/// everything else is read when a new game starts or every frame.
#[derive(Resource, Reflect, Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "dev", derive(InspectorOptions))]
#[cfg_attr(feature = "dev", reflect(Resource, InspectorOptions))]
#[cfg_attr(not(feature = "dev"), reflect(Resource))]
pub struct GameSettings {
  /// The number of cells along each axis.
  pub cell_counts: IVec2,
  /// The edge length of a cell in world units.
  pub cell_size: f32,
  /// The speed of the snake, in cells per second.
  #[cfg_attr(feature = "dev", inspector(min = 0.1, max = 20.0))]
  pub speed: f32,
  /// The width of the snake at its head.
  pub start_width: f32,
  /// The width of the snake at the tip of its tail.
  pub end_width: f32,
  /// The distance along the snake after which the stroke texture repeats.
  #[cfg_attr(feature = "dev", inspector(min = 1.0))]
  pub texture_distance: f32,
  /// The interval between two attempts to place food.
  pub food_interval_ms: u64,
  /// The maximum number of food items on the board at the same time.
  pub max_food: usize,
  /// The interval at which the average frame rate is logged.
  pub fps_report_interval_ms: u64,
}

impl Default for GameSettings {
  fn default() -> Self {
    Self {
      cell_counts: IVec2::new(7, 12),
      cell_size: 40.,
      speed: 3.,
      start_width: 32.,
      end_width: 8.,
      texture_distance: 40.,
      food_interval_ms: 1000,
      max_food: 2,
      fps_report_interval_ms: 5000,
    }
  }
}

/// A resource that counts the food eaten during the current round.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
  pub food_eaten: u32,
}

#[cfg(test)]
mod tests {
  use super::*;
  use bevy::MinimalPlugins;

  fn setup() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, SharedResourcesPlugin));
    app
  }

  #[test]
  fn shared_resources_plugin_does_not_panic_on_empty_app() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(SharedResourcesPlugin);
  }

  #[test]
  fn shared_resources_plugin_registers_resources() {
    let app = setup();
    let world = app.world();

    assert!(world.contains_resource::<Settings>());
    assert!(world.contains_resource::<GeneralSettings>());
    assert!(world.contains_resource::<Score>());
    let game_settings = world
      .get_resource::<GameSettings>()
      .expect("Failed to retrieve GameSettings");
    assert_eq!(game_settings.cell_counts, IVec2::new(7, 12));
    assert_eq!(game_settings.max_food, 2);
  }
}
