use crate::prelude::GameSettings;
use crate::snake::direction::Direction;
use crate::snake::segment::Segment;
use bevy::math::IVec2;
use bevy::prelude::Resource;
use std::collections::VecDeque;
use std::fmt::Display;

/// Violations of the simulation's invariants. These indicate a bug rather than a situation a player can recover from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnakeError {
  /// The tail completed its cell but there was no body segment left to take over.
  EmptyBody,
  /// A segment enters and leaves its cell through the same edge.
  DegenerateSegment { cell: IVec2, direction: Direction },
}

impl Display for SnakeError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SnakeError::EmptyBody => write!(f, "The tail tried to advance but the body is empty"),
      SnakeError::DegenerateSegment { cell, direction } => write!(
        f,
        "The segment at [{}] enters and leaves through [{}]",
        cell, direction
      ),
    }
  }
}

impl std::error::Error for SnakeError {}

/// Why a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
  OutOfBounds(IVec2),
  SelfCollision(IVec2),
}

impl Display for Termination {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Termination::OutOfBounds(cell) => write!(f, "Left the board at [{}]", cell),
      Termination::SelfCollision(cell) => write!(f, "Bit itself at [{}]", cell),
    }
  }
}

/// What happened during a single call to [`SnakeState::advance`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvanceReport {
  pub cells_entered: u32,
  pub cells_left: u32,
  pub food_eaten: Vec<IVec2>,
  pub termination: Option<Termination>,
}

/// The complete state of a round: the snake's anatomy, the food on the board and the pending player input.
///
/// The head and tail are mutated in place every tick. Body segments are immutable snapshots, the front of `body` being
/// the segment closest to the head.
#[derive(Resource, Debug, Clone)]
pub struct SnakeState {
  pub head: Segment,
  pub tail: Segment,
  pub body: VecDeque<Segment>,
  pub pending_input: Option<Direction>,
  pub is_game_over: bool,
  pub pending_growth: f32,
  pub food: Vec<IVec2>,
  grid_size: IVec2,
  cell_size: f32,
  speed: f32,
}

impl SnakeState {
  /// Starts a new round with a snake of six cells crawling up the left-most column.
  pub fn new(grid_size: IVec2, cell_size: f32, speed: f32) -> Self {
    let head = Segment::new(IVec2::new(0, 5), Direction::Bottom, Direction::Top, 1., cell_size);
    let body = (1..=4)
      .rev()
      .map(|y| Segment::new(IVec2::new(0, y), Direction::Bottom, Direction::Top, 1., cell_size))
      .collect();
    let tail = Segment::new(IVec2::ZERO, Direction::Bottom, Direction::Top, 0., cell_size);

    Self {
      head,
      tail,
      body,
      pending_input: None,
      is_game_over: false,
      pending_growth: 0.,
      food: Vec::new(),
      grid_size,
      cell_size,
      speed,
    }
  }

  /// Starts a new round on a board of the configured size.
  pub fn new_game(settings: &GameSettings) -> Self {
    Self::new(settings.cell_counts, settings.cell_size, settings.speed)
  }

  pub fn grid_size(&self) -> IVec2 {
    self.grid_size
  }

  pub fn cell_size(&self) -> f32 {
    self.cell_size
  }

  pub fn speed(&self) -> f32 {
    self.speed
  }

  pub fn set_speed(&mut self, speed: f32) {
    self.speed = speed;
  }

  /// Buffers a direction for the next cell the head enters. Only the most recent input is kept. An input reversing the
  /// snake is dropped when it is consumed.
  pub fn queue_input(&mut self, direction: Direction) {
    self.pending_input = Some(direction);
  }

  pub fn is_within_bounds(&self, cell: IVec2) -> bool {
    cell.x >= 0 && cell.y >= 0 && cell.x < self.grid_size.x && cell.y < self.grid_size.y
  }

  /// All segments from head to tail.
  pub fn segments(&self) -> impl Iterator<Item = &Segment> {
    std::iter::once(&self.head)
      .chain(self.body.iter())
      .chain(std::iter::once(&self.tail))
  }

  pub fn occupies(&self, cell: IVec2) -> bool {
    self.segments().any(|segment| segment.cell == cell)
  }

  pub fn occupied_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
    self.segments().map(|segment| segment.cell)
  }

  /// The length of the snake as drawn: the sum of the lengths of all of its segments.
  pub fn total_length(&self) -> f32 {
    self.segments().map(|segment| segment.length).sum()
  }

  pub fn has_food_at(&self, cell: IVec2) -> bool {
    self.food.contains(&cell)
  }

  /// Places food at `cell`. Returns `false` if the cell is unavailable.
  pub fn spawn_food(&mut self, cell: IVec2) -> bool {
    if !self.is_within_bounds(cell) || self.has_food_at(cell) || self.occupies(cell) {
      return false;
    }
    self.food.push(cell);
    true
  }

  /// Advances the head and the tail by `delta_seconds` worth of movement.
  ///
  /// The head moves into the next cell whenever its progress exceeds `1`. Entering a cell holding food removes the food
  /// and owes one cell of growth, which is paid by pausing the tail. Leaving the board or entering a body cell ends the
  /// round; no further cells are entered afterwards.
  pub fn advance(&mut self, delta_seconds: f32) -> Result<AdvanceReport, SnakeError> {
    self.check_segment(&self.head)?;
    self.check_segment(&self.tail)?;

    let mut report = AdvanceReport::default();
    let offset = self.speed * delta_seconds;

    self.advance_head(offset, &mut report);
    self.advance_tail(offset, &mut report)?;

    Ok(report)
  }

  fn advance_head(&mut self, offset: f32, report: &mut AdvanceReport) {
    let cell_size = self.cell_size;
    let head = &mut self.head;
    head.progress += offset;
    head.length = head.length_at(cell_size, head.progress.min(1.));

    while !self.is_game_over && self.head.progress > 1. {
      let overflow = self.head.progress - 1.;
      self.body.push_front(self.head.snapshot());

      let head = &mut self.head;
      head.cell += head.to.offset();
      head.from = head.to.opposite();
      if let Some(input) = self.pending_input.take()
        && input != head.from
      {
        head.to = input;
      }
      head.progress = overflow;
      head.length = head.length_at(cell_size, head.progress.min(1.));
      report.cells_entered += 1;

      let cell = self.head.cell;
      if let Some(index) = self.food.iter().position(|food| *food == cell) {
        self.food.remove(index);
        self.pending_growth += 1.;
        report.food_eaten.push(cell);
      }

      if !self.is_within_bounds(cell) {
        self.is_game_over = true;
        report.termination = Some(Termination::OutOfBounds(cell));
      } else if self.body.iter().any(|segment| segment.cell == cell) {
        self.is_game_over = true;
        report.termination = Some(Termination::SelfCollision(cell));
      }
    }
  }

  fn advance_tail(&mut self, offset: f32, report: &mut AdvanceReport) -> Result<(), SnakeError> {
    let mut offset = offset;
    if self.pending_growth > 0. {
      let paid = self.pending_growth.min(offset);
      self.pending_growth -= paid;
      offset -= paid;
    }

    let cell_size = self.cell_size;
    let tail = &mut self.tail;
    tail.progress += offset;
    tail.length = tail.length_at(cell_size, 1. - tail.progress.min(1.));

    while !self.is_game_over && self.tail.progress > 1. {
      let overflow = self.tail.progress - 1.;
      let next = self.body.pop_back().ok_or(SnakeError::EmptyBody)?;
      let tail = &mut self.tail;
      tail.cell = next.cell;
      tail.from = next.from;
      tail.to = next.to;
      tail.progress = overflow;
      tail.length = tail.length_at(cell_size, 1. - tail.progress.min(1.));
      report.cells_left += 1;
    }

    Ok(())
  }

  fn check_segment(&self, segment: &Segment) -> Result<(), SnakeError> {
    if segment.from == segment.to {
      return Err(SnakeError::DegenerateSegment {
        cell: segment.cell,
        direction: segment.from,
      });
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::f32::consts::FRAC_PI_4;

  const CELL_SIZE: f32 = 40.;
  const EPSILON: f32 = 1e-3;

  fn new_snake() -> SnakeState {
    SnakeState::new(IVec2::new(7, 12), CELL_SIZE, 1.)
  }

  fn assert_directions_valid(snake: &SnakeState) {
    for segment in snake.segments() {
      assert_ne!(segment.from, segment.to, "Segment at {:?} is degenerate", segment.cell);
    }
  }

  #[test]
  fn new_game_spans_six_cells_of_the_first_column() {
    let snake = new_snake();
    let cells: Vec<IVec2> = snake.occupied_cells().collect();
    assert_eq!(cells, (0..=5).rev().map(|y| IVec2::new(0, y)).collect::<Vec<_>>());
    assert_eq!(snake.body.len(), 4);
    assert!(!snake.is_game_over);
    assert_eq!(snake.pending_growth, 0.);
  }

  #[test]
  fn head_enters_next_cell_and_pushes_snapshot_to_body() {
    let mut snake = new_snake();
    let report = snake.advance(0.25).expect("Advance failed");

    assert_eq!(report.cells_entered, 1);
    assert_eq!(snake.head.cell, IVec2::new(0, 6));
    assert_eq!(snake.head.from, Direction::Bottom);
    assert_eq!(snake.head.to, Direction::Top);
    assert!((snake.head.progress - 0.25).abs() < EPSILON);
    assert!((snake.head.length - 10.).abs() < EPSILON);

    let newest = snake.body.front().expect("Body is empty");
    assert_eq!(newest.cell, IVec2::new(0, 5));
    assert_eq!(newest.progress, 1.);
    assert!((newest.length - CELL_SIZE).abs() < EPSILON);
  }

  #[test]
  fn tail_leaves_its_cell_and_takes_over_the_oldest_body_segment() {
    let mut snake = new_snake();
    snake.advance(0.5).expect("Advance failed");
    assert_eq!(snake.tail.cell, IVec2::ZERO);
    assert!((snake.tail.length - 20.).abs() < EPSILON);

    let report = snake.advance(0.75).expect("Advance failed");
    assert_eq!(report.cells_left, 1);
    assert_eq!(snake.tail.cell, IVec2::new(0, 1));
    assert!((snake.tail.progress - 0.25).abs() < EPSILON);
    assert!((snake.tail.length - 30.).abs() < EPSILON);
  }

  #[test]
  fn queued_input_turns_the_head_on_the_next_cell() {
    let mut snake = new_snake();
    snake.queue_input(Direction::Right);
    snake.advance(0.1).expect("Advance failed");

    assert_eq!(snake.head.cell, IVec2::new(0, 6));
    assert_eq!(snake.head.from, Direction::Bottom);
    assert_eq!(snake.head.to, Direction::Right);
    assert!(!snake.head.is_straight());
    assert!(snake.pending_input.is_none());
    assert!((snake.head.length - CELL_SIZE * FRAC_PI_4 * 0.1).abs() < EPSILON);

    snake.advance(1.).expect("Advance failed");
    assert_eq!(snake.head.cell, IVec2::new(1, 6));
    assert_eq!(snake.head.from, Direction::Left);
    assert_eq!(snake.head.to, Direction::Right);
  }

  #[test]
  fn reversing_input_is_ignored_and_cleared() {
    let mut snake = new_snake();
    snake.queue_input(Direction::Bottom);
    snake.advance(0.1).expect("Advance failed");

    assert_eq!(snake.head.to, Direction::Top);
    assert!(snake.pending_input.is_none());
    assert_directions_valid(&snake);
  }

  #[test]
  fn newer_input_overwrites_unconsumed_input() {
    let mut snake = new_snake();
    snake.queue_input(Direction::Left);
    snake.queue_input(Direction::Right);
    snake.advance(0.1).expect("Advance failed");
    assert_eq!(snake.head.to, Direction::Right);
  }

  #[test]
  fn eating_food_owes_one_cell_of_growth_and_pauses_the_tail() {
    let mut snake = new_snake();
    assert!(snake.spawn_food(IVec2::new(0, 6)));
    let tail_progress_before = snake.tail.progress;

    let report = snake.advance(0.5).expect("Advance failed");

    assert_eq!(report.food_eaten, vec![IVec2::new(0, 6)]);
    assert!(snake.food.is_empty());
    // Growth is paid with this tick's movement before the tail may move
    assert!((snake.pending_growth - 0.5).abs() < EPSILON);
    assert_eq!(snake.tail.progress, tail_progress_before);

    snake.advance(0.75).expect("Advance failed");
    assert_eq!(snake.pending_growth, 0.);
    assert!((snake.tail.progress - 0.25).abs() < EPSILON);
    assert_eq!(snake.tail.cell, IVec2::ZERO);
  }

  #[test]
  fn growth_delays_tail_retirement_by_exactly_one_cell() {
    let mut growing = SnakeState::new(IVec2::new(7, 40), CELL_SIZE, 1.);
    let mut control = SnakeState::new(IVec2::new(7, 40), CELL_SIZE, 1.);
    growing.spawn_food(IVec2::new(0, 6));

    let step = 0.125;
    let mut growing_ticks = None;
    let mut control_ticks = None;
    for tick in 1..=30 {
      let growing_report = growing.advance(step).expect("Advance failed");
      let control_report = control.advance(step).expect("Advance failed");
      if growing_ticks.is_none() && growing_report.cells_left > 0 {
        growing_ticks = Some(tick);
      }
      if control_ticks.is_none() && control_report.cells_left > 0 {
        control_ticks = Some(tick);
      }
    }

    let difference = growing_ticks.expect("Tail never moved") - control_ticks.expect("Tail never moved");
    assert_eq!(difference, 8);
    assert_eq!(growing.body.len(), control.body.len() + 1);
  }

  #[test]
  fn leaving_the_board_ends_the_game() {
    let mut snake = SnakeState::new(IVec2::new(7, 7), CELL_SIZE, 1.);
    snake.queue_input(Direction::Left);

    let report = snake.advance(0.5).expect("Advance failed");

    assert_eq!(snake.head.cell, IVec2::new(0, 6));
    assert!(!snake.is_game_over);
    assert!(report.termination.is_none());

    let report = snake.advance(1.).expect("Advance failed");
    assert!(snake.is_game_over);
    assert_eq!(report.termination, Some(Termination::OutOfBounds(IVec2::new(-1, 6))));
  }

  #[test]
  fn running_into_the_body_ends_the_game_and_stops_advancing() {
    let mut snake = new_snake();
    // Turn right, down and left to run into the segment at (0, 5)
    snake.queue_input(Direction::Right);
    snake.advance(0.01).expect("Advance failed");
    snake.queue_input(Direction::Bottom);
    snake.advance(1.).expect("Advance failed");
    snake.queue_input(Direction::Left);
    snake.advance(1.).expect("Advance failed");
    assert_eq!(snake.head.cell, IVec2::new(1, 5));
    assert!(!snake.is_game_over);

    // A huge step would cross many cells if the loop did not stop at the collision
    let report = snake.advance(5.).expect("Advance failed");
    assert!(snake.is_game_over);
    assert_eq!(report.cells_entered, 1);
    assert_eq!(report.termination, Some(Termination::SelfCollision(IVec2::new(0, 5))));
    assert_eq!(snake.head.cell, IVec2::new(0, 5));
  }

  #[test]
  fn segments_never_degenerate_while_moving() {
    let mut snake = SnakeState::new(IVec2::new(20, 20), CELL_SIZE, 1.);
    let inputs = [Direction::Right, Direction::Bottom, Direction::Top, Direction::Right, Direction::Top];
    for input in inputs.iter().cycle().take(12) {
      snake.queue_input(*input);
      snake.advance(0.7).expect("Advance failed");
      assert_directions_valid(&snake);
      if snake.is_game_over {
        break;
      }
    }
  }

  #[test]
  fn total_length_is_conserved_without_growth() {
    let mut snake = SnakeState::new(IVec2::new(7, 30), CELL_SIZE, 1.);
    let initial = snake.total_length();
    for _ in 0..50 {
      snake.advance(0.13).expect("Advance failed");
      let body_count = snake.body.len() as f32;
      let total = snake.total_length();
      assert!(total >= 0.);
      assert!(total <= CELL_SIZE * (body_count + 2.) + EPSILON);
      assert!((total - initial).abs() < EPSILON, "Expected {} but got {}", initial, total);
    }
  }

  #[test]
  fn empty_body_is_an_invariant_violation() {
    let mut snake = new_snake();
    snake.body.clear();
    snake.head.progress = -2.;
    let result = snake.advance(1.5);
    assert_eq!(result, Err(SnakeError::EmptyBody));
  }

  #[test]
  fn degenerate_segment_is_reported() {
    let mut snake = new_snake();
    snake.tail.to = snake.tail.from;
    let result = snake.advance(0.1);
    assert!(matches!(result, Err(SnakeError::DegenerateSegment { .. })));
  }

  #[test]
  fn food_cannot_be_placed_on_the_snake_or_twice() {
    let mut snake = new_snake();
    assert!(!snake.spawn_food(IVec2::new(0, 3)));
    assert!(!snake.spawn_food(IVec2::new(9, 0)));
    assert!(snake.spawn_food(IVec2::new(3, 3)));
    assert!(!snake.spawn_food(IVec2::new(3, 3)));
  }
}
