use crate::prelude::constants::*;
use bevy::app::Update;
use bevy::prelude::{App, BackgroundColor, Button, Changed, Interaction, Plugin, Query, With};
use game_over_popup::GameOverPopupPlugin;

pub mod game_over_popup;

pub struct UiPlugin;

impl Plugin for UiPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(GameOverPopupPlugin)
      .add_systems(Update, button_design_system);
  }
}

fn button_design_system(
  mut interaction_query: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
  for (interaction, mut background_colour) in &mut interaction_query {
    *background_colour = BackgroundColor(match *interaction {
      Interaction::Pressed => BUTTON_PRESSED_COLOUR,
      Interaction::Hovered => BUTTON_HOVERED_COLOUR,
      Interaction::None => BUTTON_COLOUR,
    });
  }
}
