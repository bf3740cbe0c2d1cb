use crate::animation::{TweenFailed, TweenFinished, TweenId, TweenOptions, TweenQueue};
use crate::app_states::AppState;
use crate::prelude::constants::*;
use crate::prelude::{GameOverPopup, RetryButton, RetryMessage, Score};
use crate::snake::Direction;
use bevy::prelude::*;

/// The distance the popup travels when sliding in or out. Large enough to start and end off screen.
const POPUP_SLIDE_DISTANCE: f32 = 1200.;

/// A plugin that shows the game over popup: it slides in from the top, waits for the player to retry, slides back out
/// and then starts a new round.
pub struct GameOverPopupPlugin;

impl Plugin for GameOverPopupPlugin {
  fn build(&self, app: &mut App) {
    app
      .init_resource::<PopupSequence>()
      .add_systems(OnEnter(AppState::GameOver), spawn_popup_system)
      .add_systems(
        Update,
        (retry_button_system, popup_sequence_system)
          .chain()
          .run_if(in_state(AppState::GameOver)),
      )
      .add_systems(OnExit(AppState::GameOver), despawn_popup_system);
  }
}

/// A marker component for the sliding panel of the game over popup.
#[derive(Component)]
struct PopupPanel;

/// The steps of the popup. Each animated step remembers the tween it waits for.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PopupSequence {
  #[default]
  Hidden,
  Entering(TweenId),
  AwaitingRetry,
  Leaving(TweenId),
}

fn spawn_popup_system(
  mut commands: Commands,
  score: Res<Score>,
  mut tweens: ResMut<TweenQueue>,
  mut sequence: ResMut<PopupSequence>,
) {
  let mut popup = Entity::PLACEHOLDER;
  commands
    .spawn((
      Name::new("Game Over Popup Container"),
      GameOverPopup,
      Node {
        width: percent(100),
        height: percent(100),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        ..default()
      },
    ))
    .with_children(|parent| {
      popup = parent
        .spawn((
          Name::new("Game Over Popup"),
          PopupPanel,
          Node {
            width: px(POPUP_WIDTH),
            height: px(POPUP_HEIGHT),
            position_type: PositionType::Relative,
            bottom: px(POPUP_SLIDE_DISTANCE),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::SpaceEvenly,
            align_items: AlignItems::Center,
            ..default()
          },
          BackgroundColor(POPUP_BACKGROUND_COLOUR),
          BorderRadius::all(px(12)),
        ))
        .with_children(|parent| {
          parent.spawn((
            Text::new("Game Over"),
            TextFont::from_font_size(FONT_SIZE),
            TextColor(Color::WHITE),
          ));
          parent.spawn((
            Text::new(format!("Food eaten: {}", score.food_eaten)),
            TextFont::from_font_size(FONT_SIZE * 0.6),
            TextColor(Color::WHITE),
          ));
          parent
            .spawn((
              Name::new("Button: Retry"),
              RetryButton,
              Button,
              Node {
                width: px(160),
                height: px(50),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
              },
              BackgroundColor(BUTTON_COLOUR),
              BorderRadius::all(px(8)),
            ))
            .with_children(|parent| {
              parent.spawn((
                Text::new("Retry"),
                TextFont::from_font_size(FONT_SIZE * 0.75),
                TextColor(Color::WHITE),
              ));
            });
        })
        .id();
    });

  let id = tweens.slide_enter(
    popup,
    Direction::Top,
    Vec2::ZERO,
    POPUP_SLIDE_DISTANCE,
    TweenOptions::with_duration(POPUP_SLIDE_DURATION_MS),
  );
  *sequence = PopupSequence::Entering(id);
  debug!("Game over popup is sliding in");
}

fn retry_button_system(
  query: Query<&Interaction, (Changed<Interaction>, With<RetryButton>)>,
  mut retry_message: MessageWriter<RetryMessage>,
) {
  for interaction in &query {
    if *interaction == Interaction::Pressed {
      info!("[Button] Pressed retry button");
      retry_message.write(RetryMessage);
    }
  }
}

/// Advances the popup through its steps as tweens resolve and the player retries.
fn popup_sequence_system(
  mut sequence: ResMut<PopupSequence>,
  mut tweens: ResMut<TweenQueue>,
  mut finished_messages: MessageReader<TweenFinished>,
  mut failed_messages: MessageReader<TweenFailed>,
  mut retry_messages: MessageReader<RetryMessage>,
  panel_query: Query<Entity, With<PopupPanel>>,
  mut next_app_state: ResMut<NextState<AppState>>,
) {
  let finished = finished_messages.read().map(|message| message.id).collect::<Vec<_>>();
  let failed = failed_messages.read().map(|message| message.id).collect::<Vec<_>>();
  let has_retried = retry_messages.read().count() > 0;

  match *sequence {
    PopupSequence::Entering(id) | PopupSequence::Leaving(id) if failed.contains(&id) => {
      warn!("Game over popup disappeared during its animation, starting a new game");
      *sequence = PopupSequence::Hidden;
      next_app_state.set(AppState::Playing);
    }
    PopupSequence::Entering(id) if finished.contains(&id) => {
      debug!("Game over popup is waiting for the player to retry");
      *sequence = PopupSequence::AwaitingRetry;
    }
    PopupSequence::AwaitingRetry if has_retried => {
      let Ok(panel) = panel_query.single() else {
        warn!("Game over popup is missing, starting a new game");
        *sequence = PopupSequence::Hidden;
        next_app_state.set(AppState::Playing);
        return;
      };
      let id = tweens.slide_outer(
        panel,
        Direction::Top,
        Vec2::ZERO,
        POPUP_SLIDE_DISTANCE,
        TweenOptions::with_duration(POPUP_SLIDE_DURATION_MS),
      );
      *sequence = PopupSequence::Leaving(id);
    }
    PopupSequence::Leaving(id) if finished.contains(&id) => {
      *sequence = PopupSequence::Hidden;
      next_app_state.set(AppState::Playing);
    }
    _ => {}
  }
}

fn despawn_popup_system(
  mut commands: Commands,
  query: Query<Entity, With<GameOverPopup>>,
  panel_query: Query<Entity, With<PopupPanel>>,
  mut tweens: ResMut<TweenQueue>,
  mut sequence: ResMut<PopupSequence>,
) {
  for panel in &panel_query {
    tweens.cancel_all_for(panel);
  }
  for entity in &query {
    commands.entity(entity).despawn();
  }
  *sequence = PopupSequence::Hidden;
}
