use bevy::color::Color;
use bevy::color::palettes::tailwind;

// General and rendering
// --------------------------------//

/// The title of the primary window.
pub(crate) const WINDOW_TITLE: &str = "Ribbon Snake";

/// The colour the camera clears the screen with.
pub(crate) const CLEAR_COLOUR: Color = Color::Srgba(tailwind::NEUTRAL_950);

/// The fraction of the window the board may cover along its tighter axis.
pub(crate) const BOARD_SCREEN_COVERAGE: f32 = 0.9;

/// The default font size used in the user interface.
pub(crate) const FONT_SIZE: f32 = 32.;

// Draw order
// --------------------------------//

pub(crate) const Z_CELL_BACKGROUND: f32 = 0.;
pub(crate) const Z_STROKE: f32 = 1.;
pub(crate) const Z_PIVOT: f32 = 2.;
pub(crate) const Z_APPLE_SHADOW: f32 = 3.;
pub(crate) const Z_APPLE: f32 = 4.;

// Board
// --------------------------------//

/// The gap between two neighbouring cell backgrounds.
pub(crate) const CELL_MARGIN: f32 = 2.;

pub(crate) const CELL_COLOUR: Color = Color::Srgba(tailwind::NEUTRAL_800);
pub(crate) const CELL_OCCUPIED_COLOUR: Color = Color::Srgba(tailwind::ROSE_900);

// Snake
// --------------------------------//

/// The colour the stroke texture is multiplied with.
pub(crate) const SNAKE_COLOUR: Color = Color::Srgba(tailwind::LIME_400);
pub(crate) const SNAKE_HEAD_COLOUR: Color = Color::Srgba(tailwind::LIME_200);
pub(crate) const SNAKE_TAIL_COLOUR: Color = Color::Srgba(tailwind::LIME_600);

/// The height (in texels) of the procedurally generated stroke texture. Stripes alternate every two texels.
pub(crate) const STROKE_TEXTURE_HEIGHT: u32 = 8;

// Food
// --------------------------------//

pub(crate) const APPLE_COLOUR: Color = Color::Srgba(tailwind::RED_500);
pub(crate) const APPLE_SHADOW_COLOUR: Color = Color::Srgba(tailwind::NEUTRAL_900);

/// The apple radius relative to the cell size.
pub(crate) const APPLE_RADIUS_FACTOR: f32 = 0.3;

// Animation
// --------------------------------//

/// The duration of a tween unless specified otherwise.
pub(crate) const DEFAULT_TWEEN_DURATION_MS: f64 = 250.;

/// The duration of the game over popup sliding in and out.
pub(crate) const POPUP_SLIDE_DURATION_MS: f64 = 400.;

// UI
// --------------------------------//

pub(crate) const POPUP_BACKGROUND_COLOUR: Color = Color::Srgba(tailwind::NEUTRAL_900);
pub(crate) const BUTTON_COLOUR: Color = Color::Srgba(tailwind::LIME_700);
pub(crate) const BUTTON_HOVERED_COLOUR: Color = Color::Srgba(tailwind::LIME_600);
pub(crate) const BUTTON_PRESSED_COLOUR: Color = Color::Srgba(tailwind::LIME_500);
pub(crate) const POPUP_WIDTH: f32 = 360.;
pub(crate) const POPUP_HEIGHT: f32 = 220.;
