use crate::app_states::AppState;
use crate::game_world::Board;
use crate::prelude::{GameSettings, Score};
use crate::snake::SnakeState;
use bevy::app::{App, Plugin};
use bevy::prelude::*;
use std::time::Duration;

/// A plugin that manages the main game loop: it starts the first round once the board exists, ends a round when the
/// snake dies and reports the frame rate.
pub struct GameLoopPlugin;

impl Plugin for GameLoopPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_systems(Startup, init_fps_reporter_system)
      .add_systems(
        Update,
        start_playing_system
          .run_if(in_state(AppState::Initialising))
          .run_if(resource_exists::<Board>),
      )
      .add_systems(
        Update,
        transition_to_game_over_system
          .run_if(in_state(AppState::Playing))
          .run_if(resource_exists::<SnakeState>),
      )
      .add_systems(OnEnter(AppState::GameOver), log_final_score_system)
      .add_systems(Update, report_fps_system.run_if(resource_exists::<FpsReporter>));
  }
}

fn start_playing_system(mut next_app_state: ResMut<NextState<AppState>>) {
  next_app_state.set(AppState::Playing);
}

fn transition_to_game_over_system(snake: Res<SnakeState>, mut next_app_state: ResMut<NextState<AppState>>) {
  if snake.is_game_over {
    next_app_state.set(AppState::GameOver);
  }
}

fn log_final_score_system(score: Res<Score>) {
  info!("Game over with [{}] food eaten", score.food_eaten);
}

/// Counts frames and computes the average frame rate over a fixed interval of real time.
#[derive(Resource, Debug)]
pub struct FpsReporter {
  interval: Duration,
  elapsed: Duration,
  frames: u32,
}

impl FpsReporter {
  pub fn new(interval: Duration) -> Self {
    Self {
      interval,
      elapsed: Duration::ZERO,
      frames: 0,
    }
  }

  /// Records a frame and returns the average frame rate once per interval.
  pub fn record_frame(&mut self, delta: Duration) -> Option<f32> {
    self.frames += 1;
    self.elapsed += delta;
    if self.elapsed < self.interval {
      return None;
    }
    let fps = self.frames as f32 / self.elapsed.as_secs_f32();
    self.frames = 0;
    self.elapsed = Duration::ZERO;
    Some(fps)
  }
}

fn init_fps_reporter_system(mut commands: Commands, settings: Res<GameSettings>) {
  commands.insert_resource(FpsReporter::new(Duration::from_millis(settings.fps_report_interval_ms)));
}

fn report_fps_system(time: Res<Time<Real>>, mut reporter: ResMut<FpsReporter>) {
  if let Some(fps) = reporter.record_frame(time.delta()) {
    info!("Average frame rate: [{:.1}] fps", fps);
  }
}
