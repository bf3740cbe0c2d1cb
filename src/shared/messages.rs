use crate::snake::Direction;
use bevy::app::{App, Plugin};
use bevy::math::IVec2;
use bevy::prelude::Message;

/// A plugin that registers all shared messages used across multiple plugins and systems.
pub struct SharedMessagesPlugin;

impl Plugin for SharedMessagesPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_message::<DebugStateMessage>()
      .add_message::<DirectionInputMessage>()
      .add_message::<FoodEatenMessage>()
      .add_message::<RetryMessage>();
  }
}

#[allow(dead_code)]
/// A message that communicates the current state of debug related settings.
#[derive(Message)]
pub struct DebugStateMessage {
  pub display_ribbon_gizmos: bool,
}

/// A message carrying a direction the player asked the snake to turn to.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionInputMessage(pub Direction);

/// A message sent whenever the snake's head enters a cell holding food.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodEatenMessage {
  pub cell: IVec2,
}

/// A message indicating that the player wants to start a new round after the game ended.
#[derive(Message, Debug, Clone, Copy)]
pub struct RetryMessage;
