use crate::animation::{TweenOptions, TweenQueue};
use crate::app_states::AppState;
use crate::game_world::Board;
use crate::grid::Grid;
use crate::prelude::constants::*;
use crate::prelude::{Apple, AppleBody, AppleShadow, GameSettings};
use crate::snake::{SnakeState, SnakeSystems};
use bevy::prelude::*;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use std::time::Duration;

/// A plugin that places food on the board at a fixed interval and keeps an apple on every cell holding food.
pub struct FoodPlugin;

impl Plugin for FoodPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_systems(Startup, create_apple_assets_system)
      .add_systems(OnEnter(AppState::Playing), reset_food_system)
      .add_systems(
        Update,
        spawn_food_system
          .after(SnakeSystems::Simulate)
          .before(SnakeSystems::Render)
          .run_if(in_state(AppState::Playing))
          .run_if(resource_exists::<SnakeState>)
          .run_if(resource_exists::<FoodSpawner>),
      )
      .add_systems(
        Update,
        render_apples_system
          .in_set(SnakeSystems::Render)
          .run_if(resource_exists::<Board>)
          .run_if(resource_exists::<AppleSprites>)
          .run_if(resource_exists::<AppleAssets>),
      )
      .add_systems(OnExit(AppState::GameOver), despawn_apples_system);
  }
}

/// Decides where food appears. Candidates are shuffled once; whenever a candidate is used it moves to the back of
/// the pool, so cells are revisited in a fixed but random order.
#[derive(Resource, Debug)]
pub struct FoodSpawner {
  candidates: VecDeque<IVec2>,
  timer: Timer,
  max_food: usize,
}

impl FoodSpawner {
  pub fn new(grid_size: IVec2, interval_ms: u64, max_food: usize, rng: &mut impl Rng) -> Self {
    let mut candidates = (0..grid_size.y)
      .flat_map(|y| (0..grid_size.x).map(move |x| IVec2::new(x, y)))
      .collect::<Vec<_>>();
    candidates.shuffle(rng);
    Self::from_candidates(candidates, interval_ms, max_food)
  }

  pub(crate) fn from_candidates(candidates: Vec<IVec2>, interval_ms: u64, max_food: usize) -> Self {
    Self {
      candidates: candidates.into(),
      timer: Timer::new(Duration::from_millis(interval_ms), TimerMode::Repeating),
      max_food,
    }
  }

  pub fn candidates(&self) -> impl Iterator<Item = &IVec2> {
    self.candidates.iter()
  }

  /// Advances the interval timer and returns whether a spawn attempt is due.
  pub fn tick(&mut self, delta: Duration) -> bool {
    self.timer.tick(delta).just_finished()
  }

  /// Picks the first candidate that neither holds food nor is covered by the snake, unless the board already holds
  /// the maximum amount of food.
  pub fn try_spawn(&mut self, snake: &SnakeState) -> Option<IVec2> {
    if snake.food.len() >= self.max_food {
      return None;
    }
    let index = self
      .candidates
      .iter()
      .position(|cell| !snake.has_food_at(*cell) && !snake.occupies(*cell))?;
    let cell = self.candidates.remove(index)?;
    self.candidates.push_back(cell);
    Some(cell)
  }
}

/// The apple entities currently on the board, by cell.
#[derive(Resource, Debug)]
pub struct AppleSprites(pub Grid<Entity>);

/// Meshes and materials shared by all apples.
#[derive(Resource, Debug)]
struct AppleAssets {
  body_mesh: Handle<Mesh>,
  body_material: Handle<ColorMaterial>,
  shadow_mesh: Handle<Mesh>,
  shadow_material: Handle<ColorMaterial>,
}

fn create_apple_assets_system(
  mut commands: Commands,
  settings: Res<GameSettings>,
  mut meshes: ResMut<Assets<Mesh>>,
  mut materials: ResMut<Assets<ColorMaterial>>,
) {
  let radius = settings.cell_size * APPLE_RADIUS_FACTOR;
  commands.insert_resource(AppleAssets {
    body_mesh: meshes.add(Circle::new(radius)),
    body_material: materials.add(APPLE_COLOUR),
    shadow_mesh: meshes.add(Ellipse::new(radius, radius * 0.4)),
    shadow_material: materials.add(APPLE_SHADOW_COLOUR),
  });
}

fn reset_food_system(
  mut commands: Commands,
  settings: Res<GameSettings>,
  apple_sprites: Option<Res<AppleSprites>>,
) {
  let spawner = FoodSpawner::new(
    settings.cell_counts,
    settings.food_interval_ms,
    settings.max_food,
    &mut rand::rng(),
  );
  commands.insert_resource(spawner);
  if apple_sprites.is_none() {
    commands.insert_resource(AppleSprites(Grid::new(settings.cell_counts.x, settings.cell_counts.y)));
  }
}

fn spawn_food_system(time: Res<Time>, mut spawner: ResMut<FoodSpawner>, mut snake: ResMut<SnakeState>) {
  if snake.is_game_over || !spawner.tick(time.delta()) {
    return;
  }
  if let Some(cell) = spawner.try_spawn(&snake)
    && snake.spawn_food(cell)
  {
    debug!("Placed food at [{}]", cell);
  }
}

/// Spawns an apple for every new food item and despawns the apples of food that was eaten.
fn render_apples_system(
  mut commands: Commands,
  snake: Res<SnakeState>,
  board: Res<Board>,
  assets: Res<AppleAssets>,
  mut apple_sprites: ResMut<AppleSprites>,
  mut tweens: ResMut<TweenQueue>,
) {
  let eaten = apple_sprites
    .0
    .iter()
    .filter(|(cell, _)| !snake.has_food_at(*cell))
    .map(|(cell, entity)| (cell, *entity))
    .collect::<Vec<_>>();
  for (cell, entity) in eaten {
    apple_sprites.0.remove(cell);
    tweens.cancel_all_for(entity);
    commands.entity(entity).despawn();
    debug!("Removed apple at [{}]", cell);
  }

  let cell_size = board.cell_size();
  for cell in snake.food.iter().copied() {
    if apple_sprites.0.get(cell).is_some() {
      continue;
    }
    let apple = commands
      .spawn((
        Name::new(format!("Apple {}", cell)),
        Apple { cell },
        Transform::from_translation(board.cell_center(cell).extend(0.)),
        Visibility::default(),
        ChildOf(board.root),
      ))
      .id();
    let shadow = commands
      .spawn((
        Name::new("Apple Shadow"),
        AppleShadow,
        Mesh2d(assets.shadow_mesh.clone()),
        MeshMaterial2d(assets.shadow_material.clone()),
        Transform::from_xyz(0., -cell_size * 0.25, Z_APPLE_SHADOW).with_scale(Vec3::new(0., 0., 1.)),
        ChildOf(apple),
      ))
      .id();
    let body = commands
      .spawn((
        Name::new("Apple Body"),
        AppleBody,
        Mesh2d(assets.body_mesh.clone()),
        MeshMaterial2d(assets.body_material.clone()),
        Transform::from_xyz(0., 0., Z_APPLE).with_scale(Vec3::new(0., 0., 1.)),
        ChildOf(apple),
      ))
      .id();
    tweens.zoom_in(shadow, TweenOptions::default().suppressed());
    tweens.jump_in(body, 0., cell_size * 0.5, TweenOptions::default().suppressed());
    if let Some(previous) = apple_sprites.0.set(cell, apple) {
      warn!("Replaced apple [{}] at [{}] which was never removed", previous, cell);
    }
  }
}

fn despawn_apples_system(
  mut commands: Commands,
  apple_sprites: Option<ResMut<AppleSprites>>,
  mut tweens: ResMut<TweenQueue>,
) {
  let Some(mut apple_sprites) = apple_sprites else {
    return;
  };
  let count = apple_sprites.0.len();
  for entity in apple_sprites.0.drain() {
    tweens.cancel_all_for(entity);
    commands.entity(entity).despawn();
  }
  debug!("Despawned [{}] apple(s)", count);
}
