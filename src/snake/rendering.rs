use crate::game_world::{Board, StrokeSlot};
use crate::prelude::constants::*;
use crate::prelude::{CellBackground, GameSettings, GeneralSettings, HeadPivot, TailPivot};
use crate::snake::segment::{Segment, interpolate};
use crate::snake::simulation::SnakeState;
use crate::snake::SnakeSystems;
use crate::stroke::{Stroke, StrokeParams};
use bevy::math::Affine2;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

/// A plugin that draws the [`SnakeState`] onto the [`Board`]: it tints occupied cells, places the pivots and assigns
/// ribbon parameters to the stroke slot of every cell the snake spans.
pub struct SnakeRenderingPlugin;

impl Plugin for SnakeRenderingPlugin {
  fn build(&self, app: &mut App) {
    app.add_systems(
      Update,
      (
        tint_occupied_cells_system,
        place_pivots_system,
        assign_strokes_system,
        upload_stroke_meshes_system,
      )
        .chain()
        .in_set(SnakeSystems::Render)
        .run_if(resource_exists::<Board>),
    );
  }
}

/// Which part of the snake a segment belongs to. Determines which part of the cell its stroke covers.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Anatomy {
  Head,
  Body,
  Tail,
}

impl Anatomy {
  /// The progress range of the stroke, where `x` is the end nearer to the head.
  fn progress_range(&self, segment: &Segment) -> Vec2 {
    let progress = segment.progress.min(1.);
    match self {
      Anatomy::Head => Vec2::new(1. - progress, 1.),
      Anatomy::Body => Vec2::new(0., 1.),
      Anatomy::Tail => Vec2::new(0., 1. - progress),
    }
  }
}

/// The stroke a single segment should be drawn with.
#[derive(Debug, Clone, Copy)]
struct StrokeAssignment {
  params: StrokeParams,
  clockwise: bool,
  transform: Affine2,
}

fn tint_occupied_cells_system(
  snake: Res<SnakeState>,
  general_settings: Res<GeneralSettings>,
  mut backgrounds: Query<(&CellBackground, &mut Sprite)>,
) {
  for (background, mut sprite) in backgrounds.iter_mut() {
    let colour = if general_settings.tint_occupied_cells && snake.occupies(background.cell) {
      CELL_OCCUPIED_COLOUR
    } else {
      CELL_COLOUR
    };
    if sprite.color != colour {
      sprite.color = colour;
    }
  }
}

fn place_pivots_system(
  snake: Res<SnakeState>,
  board: Res<Board>,
  mut pivots: Query<&mut Transform, Or<(With<HeadPivot>, With<TailPivot>)>>,
) {
  let cell_size = board.cell_size();
  for (entity, segment) in [(board.head_pivot, &snake.head), (board.tail_pivot, &snake.tail)] {
    let Ok(mut transform) = pivots.get_mut(entity) else {
      warn!("Pivot entity [{}] is missing, skipping it", entity);
      continue;
    };
    let placement = interpolate(
      segment,
      board.cell_center(segment.cell),
      cell_size,
      segment.progress.min(1.),
    );
    *transform = placement.to_transform(Z_PIVOT);
  }
}

/// Walks the snake from head to tail and assigns stroke parameters to the slot of every segment. Slots not used this
/// frame are hidden.
fn assign_strokes_system(
  snake: Res<SnakeState>,
  board: Res<Board>,
  settings: Res<GameSettings>,
  mut strokes: Query<(Entity, &mut StrokeSlot, &mut Visibility)>,
) {
  let mut assignments = collect_stroke_assignments(&snake, &board, &settings);

  for (entity, mut slot, mut visibility) in strokes.iter_mut() {
    let Some(assignment) = assignments.remove(&entity) else {
      visibility.set_if_neq(Visibility::Hidden);
      continue;
    };

    let slot = slot.as_mut();
    let mut stroke = slot.stroke.clone();
    if let Stroke::Curve(curve) = &mut stroke {
      curve.clockwise = assignment.clockwise;
    }
    if let Some(params) = stroke.params_mut() {
      *params = assignment.params;
    }
    if stroke != slot.stroke {
      slot.stroke = stroke;
      slot.ribbon.render();
    }
    slot.ribbon.set_transform(assignment.transform);
    visibility.set_if_neq(Visibility::Visible);
  }

  for entity in assignments.keys() {
    warn!("Stroke slot [{}] is missing, the snake is drawn incompletely", entity);
  }
}

fn collect_stroke_assignments(
  snake: &SnakeState,
  board: &Board,
  settings: &GameSettings,
) -> HashMap<Entity, StrokeAssignment> {
  let total_length = snake.total_length();
  let body_count = snake.body.len();
  let mut assignments = HashMap::new();
  let mut distance = 0.;

  for (index, segment) in snake.segments().enumerate() {
    let anatomy = match index {
      0 => Anatomy::Head,
      i if i > body_count => Anatomy::Tail,
      _ => Anatomy::Body,
    };
    let distance_to = distance + segment.length;
    let Some(slots) = board.cells.get(segment.cell) else {
      // Only happens on the frame the head leaves the board
      distance = distance_to;
      continue;
    };

    let entity = if segment.is_straight() {
      slots.straight
    } else {
      slots.curve
    };
    let params = StrokeParams {
      progress_range: anatomy.progress_range(segment),
      width_range: Vec2::new(
        width_at(settings, distance, total_length),
        width_at(settings, distance_to, total_length),
      ),
      texture_v_range: Vec2::new(
        distance / settings.texture_distance,
        distance_to / settings.texture_distance,
      ),
    };
    let transform = Affine2::from_angle_translation(
      segment.to.angle_degrees().to_radians(),
      board.cell_center(segment.cell),
    );
    assignments.insert(
      entity,
      StrokeAssignment {
        params,
        clockwise: segment.is_clockwise(),
        transform,
      },
    );
    distance = distance_to;
  }

  assignments
}

/// The width of the snake at `distance` from the head, tapering linearly towards the tail.
fn width_at(settings: &GameSettings, distance: f32, total_length: f32) -> f32 {
  if total_length <= 0. {
    return settings.start_width;
  }
  let t = (distance / total_length).clamp(0., 1.);
  settings.start_width + (settings.end_width - settings.start_width) * t
}

fn upload_stroke_meshes_system(mut strokes: Query<(&mut StrokeSlot, &Mesh2d)>, mut meshes: ResMut<Assets<Mesh>>) {
  for (mut slot, mesh_2d) in strokes.iter_mut() {
    if !slot.ribbon.is_dirty() {
      continue;
    }
    let StrokeSlot { stroke, ribbon } = slot.as_mut();
    if !ribbon.refresh(stroke) {
      continue;
    }
    let Some(mesh) = meshes.get_mut(&mesh_2d.0) else {
      warn!("Mesh for stroke slot is missing, skipping upload");
      continue;
    };
    ribbon.write_mesh(mesh);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::app_states::{AppState, AppStatePlugin};
  use crate::game_world::GameWorldPlugin;
  use crate::prelude::{SharedMessagesPlugin, SharedResourcesPlugin};
  use crate::snake::{Direction, SnakePlugin};
  use bevy::mesh::VertexAttributeValues;
  use bevy::state::app::StatesPlugin;

  const EPSILON: f32 = 1e-3;

  fn setup() -> App {
    let mut app = App::new();
    app
      .add_plugins((MinimalPlugins, StatesPlugin, AssetPlugin::default()))
      .init_asset::<Mesh>()
      .init_asset::<Image>()
      .init_asset::<ColorMaterial>()
      .add_plugins((AppStatePlugin, SharedResourcesPlugin, SharedMessagesPlugin));
    app.world_mut().resource_mut::<GameSettings>().speed = 0.;
    app.add_plugins((GameWorldPlugin, SnakePlugin));
    app
      .world_mut()
      .resource_mut::<NextState<AppState>>()
      .set(AppState::Playing);
    app.update();
    app.update();
    app
  }

  fn slots_at(app: &App, cell: IVec2) -> crate::game_world::CellSlots {
    *app
      .world()
      .resource::<Board>()
      .cells
      .get(cell)
      .expect("Cell missing")
  }

  #[test]
  fn width_tapers_from_start_to_end() {
    let settings = GameSettings::default();
    assert_eq!(width_at(&settings, 0., 240.), 32.);
    assert_eq!(width_at(&settings, 120., 240.), 20.);
    assert_eq!(width_at(&settings, 240., 240.), 8.);
    assert_eq!(width_at(&settings, 0., 0.), 32.);
  }

  #[test]
  fn progress_range_depends_on_anatomy() {
    let segment = Segment::new(IVec2::ZERO, Direction::Bottom, Direction::Top, 0.25, 10.);
    assert_eq!(Anatomy::Head.progress_range(&segment), Vec2::new(0.75, 1.));
    assert_eq!(Anatomy::Body.progress_range(&segment), Vec2::new(0., 1.));
    assert_eq!(Anatomy::Tail.progress_range(&segment), Vec2::new(0., 0.75));
  }

  #[test]
  fn occupied_cells_are_tinted() {
    let app = setup();
    let world = app.world();
    let occupied = slots_at(&app, IVec2::new(0, 2)).background;
    let free = slots_at(&app, IVec2::new(4, 4)).background;
    assert_eq!(world.get::<Sprite>(occupied).map(|sprite| sprite.color), Some(CELL_OCCUPIED_COLOUR));
    assert_eq!(world.get::<Sprite>(free).map(|sprite| sprite.color), Some(CELL_COLOUR));
  }

  #[test]
  fn only_strokes_of_occupied_cells_are_visible() {
    let app = setup();
    let world = app.world();
    for y in 0..=5 {
      let slots = slots_at(&app, IVec2::new(0, y));
      assert_eq!(world.get::<Visibility>(slots.straight), Some(&Visibility::Visible));
      assert_eq!(world.get::<Visibility>(slots.curve), Some(&Visibility::Hidden));
    }
    let free = slots_at(&app, IVec2::new(3, 3));
    assert_eq!(world.get::<Visibility>(free.straight), Some(&Visibility::Hidden));
  }

  #[test]
  fn body_stroke_tapers_and_scrolls_with_distance_from_head() {
    let app = setup();
    let slots = slots_at(&app, IVec2::new(0, 3));
    let slot = app.world().get::<StrokeSlot>(slots.straight).expect("Stroke slot missing");
    let Stroke::Straight(straight) = &slot.stroke else {
      panic!("Expected a straight stroke");
    };

    // Head and one body segment (40 each) lie between the head and this segment, out of a total length of 240
    assert_eq!(straight.params.progress_range, Vec2::new(0., 1.));
    assert!((straight.params.width_range.x - 24.).abs() < EPSILON);
    assert!((straight.params.width_range.y - 20.).abs() < EPSILON);
    assert!((straight.params.texture_v_range.x - 2.).abs() < EPSILON);
    assert!((straight.params.texture_v_range.y - 3.).abs() < EPSILON);
  }

  #[test]
  fn stroke_meshes_are_uploaded_in_board_space() {
    let app = setup();
    let slots = slots_at(&app, IVec2::new(0, 3));
    let world = app.world();
    let mesh_2d = world.get::<Mesh2d>(slots.straight).expect("Mesh2d missing");
    let mesh = world.resource::<Assets<Mesh>>().get(&mesh_2d.0).expect("Mesh missing");
    let Some(VertexAttributeValues::Float32x3(positions)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION) else {
      panic!("Expected positions");
    };

    // Cell (0, 3) is centred at (-120, -100), the first joint lies on its top edge
    let left = positions[0];
    assert!((left[0] - -132.).abs() < EPSILON, "Got {:?}", left);
    assert!((left[1] - -80.).abs() < EPSILON, "Got {:?}", left);
    assert_eq!(positions.len(), 6);
  }

  #[test]
  fn head_pivot_follows_the_head() {
    let app = setup();
    let world = app.world();
    let board = world.resource::<Board>();
    let transform = world.get::<Transform>(board.head_pivot).expect("Transform missing");
    // The head completed its transition through (0, 5) so it sits on the cell's top edge
    assert!((transform.translation.x - -120.).abs() < EPSILON);
    assert!((transform.translation.y - 0.).abs() < EPSILON);
    assert_eq!(transform.translation.z, Z_PIVOT);
  }
}
