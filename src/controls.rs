use crate::app_states::AppState;
use crate::prelude::{DirectionInputMessage, GeneralSettings, RetryMessage, Settings};
use crate::snake::Direction;
use bevy::app::{App, Plugin, Update};
use bevy::input::ButtonInput;
use bevy::log::*;
use bevy::prelude::{IntoScheduleConfigs, KeyCode, MessageWriter, MonitorSelection, Res, ResMut, Single, Window, in_state};

/// A plugin that manages all player controls and input handling.
pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_systems(Update, (window_controls_system, settings_controls_system))
      .add_systems(Update, direction_input_system.run_if(in_state(AppState::Playing)))
      .add_systems(Update, retry_input_system.run_if(in_state(AppState::GameOver)));
  }
}

/// Sends a [`DirectionInputMessage`] for every direction key released this frame.
fn direction_input_system(
  keyboard_input: Res<ButtonInput<KeyCode>>,
  mut direction_input_message: MessageWriter<DirectionInputMessage>,
) {
  for direction in keyboard_input.get_just_released().filter_map(|key| Direction::from_key(*key)) {
    trace!("Direction input [{}]", direction);
    direction_input_message.write(DirectionInputMessage(direction));
  }
}

/// Sends a [`RetryMessage`] when the player confirms the game over popup with the keyboard.
fn retry_input_system(keyboard_input: Res<ButtonInput<KeyCode>>, mut retry_message: MessageWriter<RetryMessage>) {
  if keyboard_input.any_just_pressed([KeyCode::Space, KeyCode::Enter]) {
    retry_message.write(RetryMessage);
  }
}

fn window_controls_system(keyboard_input: Res<ButtonInput<KeyCode>>, mut window: Single<&mut Window>) {
  if keyboard_input.just_pressed(KeyCode::F11) {
    window.mode = match window.mode {
      bevy::window::WindowMode::Windowed => bevy::window::WindowMode::BorderlessFullscreen(MonitorSelection::Current),
      _ => bevy::window::WindowMode::Windowed,
    };
    info!("[F11] Set window mode to [{:?}]", window.mode);
  }
}

/// A system that handles settings related controls such as toggling the occupancy tint of the board.
fn settings_controls_system(
  keyboard_input: Res<ButtonInput<KeyCode>>,
  mut settings: ResMut<Settings>,
  mut general_settings: ResMut<GeneralSettings>,
) {
  if keyboard_input.just_pressed(KeyCode::F9) {
    settings.general.tint_occupied_cells = !general_settings.tint_occupied_cells;
    general_settings.tint_occupied_cells = settings.general.tint_occupied_cells;
    info!(
      "[F9] Set tint occupied cells to [{}]",
      general_settings.tint_occupied_cells
    );
  }
}
