use crate::grid::Grid;
use crate::prelude::constants::*;
use crate::prelude::{BoardRoot, CellBackground, GameSettings, HeadPivot, TailPivot};
use crate::stroke::{CurveStroke, RibbonBuffer, StraightStroke, Stroke};
use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

/// Plugin that creates the board: a grid of cells, each owning a background tile and one reusable stroke slot per
/// stroke kind, plus the head and tail pivots.
pub struct GameWorldPlugin;

impl Plugin for GameWorldPlugin {
  fn build(&self, app: &mut App) {
    app.add_systems(Startup, create_board_system);
  }
}

/// The render slots owned by a single cell. They are recycled every frame rather than spawned and despawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSlots {
  pub background: Entity,
  pub straight: Entity,
  pub curve: Entity,
}

/// Handles to all entities of the board, resolved once when the board is created.
#[derive(Resource, Debug)]
pub struct Board {
  pub root: Entity,
  pub cells: Grid<CellSlots>,
  pub head_pivot: Entity,
  pub tail_pivot: Entity,
  cell_size: f32,
}

impl Board {
  pub fn size(&self) -> IVec2 {
    self.cells.size()
  }

  pub fn cell_size(&self) -> f32 {
    self.cell_size
  }

  /// The size of the board in world units.
  pub fn extent(&self) -> Vec2 {
    self.size().as_vec2() * self.cell_size
  }

  /// The centre of `cell` relative to the board root. The board is centred on the root, cell `(0, 0)` being the bottom
  /// left one.
  pub fn cell_center(&self, cell: IVec2) -> Vec2 {
    (cell.as_vec2() + Vec2::splat(0.5)) * self.cell_size - self.extent() * 0.5
  }
}

/// A stroke together with the ribbon buffer rasterising it into the entity's mesh.
#[derive(Component, Debug)]
pub struct StrokeSlot {
  pub stroke: Stroke,
  pub ribbon: RibbonBuffer,
}

impl StrokeSlot {
  pub fn new(stroke: Stroke) -> Self {
    let ribbon = RibbonBuffer::for_stroke(&stroke);
    Self { stroke, ribbon }
  }
}

fn create_board_system(
  mut commands: Commands,
  settings: Res<GameSettings>,
  mut meshes: ResMut<Assets<Mesh>>,
  mut materials: ResMut<Assets<ColorMaterial>>,
  mut images: ResMut<Assets<Image>>,
) {
  let cell_counts = settings.cell_counts;
  let cell_size = settings.cell_size;
  let texture = images.add(create_stroke_texture());
  let stroke_material = materials.add(ColorMaterial {
    color: SNAKE_COLOUR,
    texture: Some(texture),
    ..default()
  });
  let background_size = Vec2::splat(cell_size - CELL_MARGIN);

  let root = commands
    .spawn((Name::new("Board"), BoardRoot, Transform::default(), Visibility::default()))
    .id();
  let mut board = Board {
    root,
    cells: Grid::new(cell_counts.x, cell_counts.y),
    head_pivot: Entity::PLACEHOLDER,
    tail_pivot: Entity::PLACEHOLDER,
    cell_size,
  };

  for cell in board.cells.positions() {
    let center = board.cell_center(cell);
    let background = commands
      .spawn((
        Name::new(format!("Cell {}", cell)),
        CellBackground { cell },
        Sprite::from_color(CELL_COLOUR, background_size),
        Transform::from_translation(center.extend(Z_CELL_BACKGROUND)),
        ChildOf(root),
      ))
      .id();
    let straight = spawn_stroke_slot(
      &mut commands,
      &mut meshes,
      &stroke_material,
      root,
      format!("Straight Stroke {}", cell),
      Stroke::Straight(StraightStroke::new(cell_size)),
    );
    let curve = spawn_stroke_slot(
      &mut commands,
      &mut meshes,
      &stroke_material,
      root,
      format!("Curve Stroke {}", cell),
      Stroke::Curve(CurveStroke::new(cell_size)),
    );
    board.cells.set(
      cell,
      CellSlots {
        background,
        straight,
        curve,
      },
    );
  }

  let pivot_radius = settings.start_width.max(settings.end_width) * 0.5;
  board.head_pivot = commands
    .spawn((
      Name::new("Head Pivot"),
      HeadPivot,
      Mesh2d(meshes.add(Circle::new(pivot_radius))),
      MeshMaterial2d(materials.add(SNAKE_HEAD_COLOUR)),
      Transform::from_xyz(0., 0., Z_PIVOT),
      ChildOf(root),
    ))
    .id();
  board.tail_pivot = commands
    .spawn((
      Name::new("Tail Pivot"),
      TailPivot,
      Mesh2d(meshes.add(Circle::new(settings.end_width * 0.5))),
      MeshMaterial2d(materials.add(SNAKE_TAIL_COLOUR)),
      Transform::from_xyz(0., 0., Z_PIVOT),
      ChildOf(root),
    ))
    .id();

  debug!(
    "✅  Board with [{}] cells of size [{}] created",
    board.cells.len(),
    cell_size
  );
  commands.insert_resource(board);
}

fn spawn_stroke_slot(
  commands: &mut Commands,
  meshes: &mut Assets<Mesh>,
  material: &Handle<ColorMaterial>,
  root: Entity,
  name: String,
  stroke: Stroke,
) -> Entity {
  let slot = StrokeSlot::new(stroke);
  let mesh = meshes.add(slot.ribbon.to_mesh());
  commands
    .spawn((
      Name::new(name),
      slot,
      Mesh2d(mesh),
      MeshMaterial2d(material.clone()),
      Transform::from_xyz(0., 0., Z_STROKE),
      Visibility::Hidden,
      ChildOf(root),
    ))
    .id()
}

/// Creates a one texel wide texture with horizontal stripes which repeats vertically, so that the scrolling texture
/// coordinates of the ribbon are visible.
fn create_stroke_texture() -> Image {
  let data = (0..STROKE_TEXTURE_HEIGHT)
    .flat_map(|y| {
      if (y / 2) % 2 == 0 {
        [255, 255, 255, 255]
      } else {
        [190, 190, 190, 255]
      }
    })
    .collect::<Vec<u8>>();
  let mut image = Image::new(
    Extent3d {
      width: 1,
      height: STROKE_TEXTURE_HEIGHT,
      depth_or_array_layers: 1,
    },
    TextureDimension::D2,
    data,
    TextureFormat::Rgba8UnormSrgb,
    RenderAssetUsages::RENDER_WORLD,
  );
  image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
    address_mode_u: ImageAddressMode::Repeat,
    address_mode_v: ImageAddressMode::Repeat,
    ..ImageSamplerDescriptor::nearest()
  });
  image
}
