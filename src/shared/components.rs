use bevy::math::IVec2;
use bevy::prelude::Component;

/// A marker component for the root entity of the board. All cells, strokes and pivots are its descendants.
#[derive(Component)]
pub struct BoardRoot;

/// The background tile of a cell.
#[derive(Component)]
pub struct CellBackground {
  pub cell: IVec2,
}

/// A marker component for the sprite following the snake's head.
#[derive(Component)]
pub struct HeadPivot;

/// A marker component for the sprite following the snake's tail.
#[derive(Component)]
pub struct TailPivot;

/// An apple placed on the board. Its children are the [`AppleBody`] and the [`AppleShadow`].
#[derive(Component)]
pub struct Apple {
  pub cell: IVec2,
}

#[derive(Component)]
pub struct AppleBody;

#[derive(Component)]
pub struct AppleShadow;

/// A marker component for the root node of the game over popup.
#[derive(Component)]
pub struct GameOverPopup;

/// A marker component for the button that starts a new game.
#[derive(Component)]
pub struct RetryButton;
