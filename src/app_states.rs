use bevy::app::{App, Plugin, Update};
use bevy::log::*;
use bevy::prelude::{AppExtStates, MessageReader, State, StateTransitionEvent, States};
use bevy::reflect::Reflect;
use std::fmt::Display;

/// A plugin that introduces and manages the main application states.
pub struct AppStatePlugin;

impl Plugin for AppStatePlugin {
  fn build(&self, app: &mut App) {
    app
      .init_state::<AppState>()
      .register_type::<State<AppState>>()
      .add_systems(Update, log_app_state_transitions_system);
  }
}

fn state_label<T: ToString>(state: Option<T>) -> String {
  state.map_or_else(|| "None".to_string(), |state| state.to_string())
}

/// The main application states for this application. Drives the overall flow of the game.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States, Reflect)]
pub enum AppState {
  /// The state in which the board is created. Left as soon as the board exists.
  #[default]
  Initialising,
  /// The main gameplay state. Entering it starts a new round.
  Playing,
  /// The state after the snake left the board or bit itself. Shows the retry popup.
  GameOver,
}

impl AppState {
  pub fn name() -> &'static str {
    "AppState"
  }
}

impl Display for AppState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}", self)
  }
}

fn log_app_state_transitions_system(mut app_state_messages: MessageReader<StateTransitionEvent<AppState>>) {
  for message in app_state_messages.read() {
    info!(
      "[{}] [{}] -> [{}]",
      AppState::name(),
      state_label(message.exited),
      state_label(message.entered)
    );
  }
}
