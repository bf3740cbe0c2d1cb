mod direction;
mod rendering;
mod segment;
mod simulation;

pub use direction::Direction;
pub use segment::{Placement, Segment, interpolate};
pub use simulation::{AdvanceReport, SnakeError, SnakeState, Termination};

use crate::app_states::AppState;
use crate::prelude::{DirectionInputMessage, FoodEatenMessage, GameSettings, Score};
use crate::snake::rendering::SnakeRenderingPlugin;
use bevy::prelude::*;

/// A plugin that owns the snake simulation: it starts a new round whenever [`AppState::Playing`] is entered, feeds
/// player input into the [`SnakeState`] and advances it every frame.
pub struct SnakePlugin;

impl Plugin for SnakePlugin {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(SnakeRenderingPlugin)
      .configure_sets(
        Update,
        (SnakeSystems::Simulate, SnakeSystems::Render)
          .chain()
          .run_if(in_state(AppState::Playing))
          .run_if(resource_exists::<SnakeState>),
      )
      .add_systems(OnEnter(AppState::Playing), start_new_game_system)
      .add_systems(
        Update,
        (sync_speed_system, apply_direction_input_system, advance_snake_system)
          .chain()
          .in_set(SnakeSystems::Simulate),
      );
  }
}

/// The system sets of the snake. Rendering always reads the state the simulation produced in the same frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnakeSystems {
  Simulate,
  Render,
}

fn start_new_game_system(mut commands: Commands, settings: Res<GameSettings>, mut score: ResMut<Score>) {
  commands.insert_resource(SnakeState::new_game(&settings));
  *score = Score::default();
  info!(
    "Starting a new game on a [{}x{}] board",
    settings.cell_counts.x, settings.cell_counts.y
  );
}

fn sync_speed_system(settings: Res<GameSettings>, mut snake: ResMut<SnakeState>) {
  if settings.is_changed() && snake.speed() != settings.speed {
    snake.set_speed(settings.speed);
    debug!("Snake speed set to [{}] cells per second", settings.speed);
  }
}

/// Queues the most recent direction input. Earlier inputs of the same frame are overwritten.
fn apply_direction_input_system(
  mut direction_input_messages: MessageReader<DirectionInputMessage>,
  mut snake: ResMut<SnakeState>,
) {
  if let Some(DirectionInputMessage(direction)) = direction_input_messages.read().last() {
    snake.queue_input(*direction);
  }
}

fn advance_snake_system(
  time: Res<Time>,
  mut snake: ResMut<SnakeState>,
  mut score: ResMut<Score>,
  mut food_eaten_messages: MessageWriter<FoodEatenMessage>,
) {
  if snake.is_game_over {
    return;
  }

  match snake.advance(time.delta_secs()) {
    Ok(report) => {
      for cell in report.food_eaten {
        score.food_eaten += 1;
        debug!("Snake ate food at [{}], score is now [{}]", cell, score.food_eaten);
        food_eaten_messages.write(FoodEatenMessage { cell });
      }
      if let Some(termination) = report.termination {
        info!("Game over: {}", termination);
      }
    }
    Err(error) => {
      error!("Aborting the current game: {}", error);
      snake.is_game_over = true;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::app_states::AppStatePlugin;
  use crate::prelude::{SharedMessagesPlugin, SharedResourcesPlugin};
  use bevy::state::app::StatesPlugin;
  use bevy::time::TimeUpdateStrategy;
  use std::time::Duration;

  fn setup(speed: f32) -> App {
    let mut app = App::new();
    app
      .add_plugins((MinimalPlugins, StatesPlugin, AssetPlugin::default()))
      .init_asset::<Mesh>()
      .add_plugins((AppStatePlugin, SharedResourcesPlugin, SharedMessagesPlugin))
      .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    app.world_mut().resource_mut::<GameSettings>().speed = speed;
    app.add_plugins(SnakePlugin);
    app
      .world_mut()
      .resource_mut::<NextState<AppState>>()
      .set(AppState::Playing);
    app.update();
    app
  }

  #[test]
  fn entering_playing_starts_a_new_game() {
    let app = setup(3.);
    let snake = app.world().get_resource::<SnakeState>().expect("SnakeState missing");
    assert_eq!(snake.head.cell, IVec2::new(0, 5));
    assert!(!snake.is_game_over);
    assert_eq!(app.world().resource::<Score>().food_eaten, 0);
  }

  #[test]
  fn direction_input_message_is_queued() {
    let mut app = setup(0.);
    app.world_mut().write_message(DirectionInputMessage(Direction::Left));
    app.world_mut().write_message(DirectionInputMessage(Direction::Right));
    app.update();

    let snake = app.world().resource::<SnakeState>();
    assert_eq!(snake.pending_input, Some(Direction::Right));
  }

  #[test]
  fn eating_food_increments_score_and_writes_message() {
    let mut app = setup(3.);
    assert!(app.world_mut().resource_mut::<SnakeState>().spawn_food(IVec2::new(0, 7)));

    let mut eaten = Vec::new();
    for _ in 0..5 {
      app.update();
      let messages = app.world().resource::<Messages<FoodEatenMessage>>();
      eaten.extend(messages.iter_current_update_messages().map(|message| message.cell));
    }

    assert_eq!(eaten, vec![IVec2::new(0, 7)]);
    assert_eq!(app.world().resource::<Score>().food_eaten, 1);
    assert!(app.world().resource::<SnakeState>().food.is_empty());
  }

  #[test]
  fn invariant_violation_ends_the_game() {
    let mut app = setup(3.);
    {
      let mut snake = app.world_mut().resource_mut::<SnakeState>();
      snake.tail.to = snake.tail.from;
    }
    app.update();
    assert!(app.world().resource::<SnakeState>().is_game_over);
  }
}
