use crate::prelude::constants::DEFAULT_TWEEN_DURATION_MS;
use crate::snake::Direction;
use bevy::prelude::*;
use std::f32::consts::PI;
use std::fmt::Display;

/// Plugin that provides tweens: time based animations of fades, slides, zooms and jumps that report their outcome
/// exactly once through [`TweenFinished`] or [`TweenFailed`].
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
  fn build(&self, app: &mut App) {
    app
      .init_resource::<TweenQueue>()
      .add_message::<TweenFinished>()
      .add_message::<TweenFailed>()
      .add_systems(Update, advance_tweens_system);
  }
}

/// The end point of the jump curve. Past `PI / 2` the curve overshoots and settles back to `1` at this angle.
const JUMP_END_RADIANS: f32 = 0.75 * PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct TweenId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenError {
  /// The target entity was despawned before the tween finished.
  DestroyedDuringAnimation,
}

impl Display for TweenError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TweenError::DestroyedDuringAnimation => write!(f, "The target was destroyed during the animation"),
    }
  }
}

impl std::error::Error for TweenError {}

/// Sent once when a tween ran to completion.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct TweenFinished {
  pub id: TweenId,
  pub target: Option<Entity>,
}

/// Sent once when a tween could not complete, unless the tween was started with `suppress_warning`.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct TweenFailed {
  pub id: TweenId,
  pub target: Option<Entity>,
  pub error: TweenError,
}

/// What a tween animates.
///
/// Slides move UI nodes through their `left` and `bottom` offsets and everything else through its translation, so
/// both use a y-up space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenKind {
  Wait,
  Fade { from: f32, to: f32 },
  Slide { from: Vec2, to: Vec2 },
  Zoom { from: f32, to: f32 },
  Jump { base_y: f32, height: f32 },
}

/// The value of a tween at a given point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenValue {
  None,
  Alpha(f32),
  Position(Vec2),
  Scale(f32),
  Jump { y: f32, scale: f32 },
}

impl TweenKind {
  /// Samples the tween at linear progress `t`. Fades, slides and zooms ease in quadratically.
  pub fn sample(&self, t: f32) -> TweenValue {
    let t = t.clamp(0., 1.);
    let eased = t * t;
    match *self {
      TweenKind::Wait => TweenValue::None,
      TweenKind::Fade { from, to } => TweenValue::Alpha(from + (to - from) * eased),
      TweenKind::Slide { from, to } => TweenValue::Position(from.lerp(to, eased)),
      TweenKind::Zoom { from, to } => TweenValue::Scale(from + (to - from) * eased),
      TweenKind::Jump { base_y, height } => {
        let scale = (JUMP_END_RADIANS * t).sin() / JUMP_END_RADIANS.sin();
        TweenValue::Jump {
          y: base_y - (1. - scale) * height,
          scale,
        }
      }
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct TweenOptions {
  pub duration_ms: f64,
  pub delay_ms: f64,
  /// Whether to drop the tween silently if its target disappears.
  pub suppress_warning: bool,
}

impl Default for TweenOptions {
  fn default() -> Self {
    Self {
      duration_ms: DEFAULT_TWEEN_DURATION_MS,
      delay_ms: 0.,
      suppress_warning: false,
    }
  }
}

impl TweenOptions {
  pub fn with_duration(duration_ms: f64) -> Self {
    Self {
      duration_ms,
      ..default()
    }
  }

  pub fn suppressed(mut self) -> Self {
    self.suppress_warning = true;
    self
  }
}

/// The clock all tweens run on. Scaling `speed` speeds up or slows down every running tween.
#[derive(Debug, Clone, Copy)]
pub struct TweenClock {
  pub speed: f64,
  elapsed_ms: f64,
}

impl Default for TweenClock {
  fn default() -> Self {
    Self {
      speed: 1.,
      elapsed_ms: 0.,
    }
  }
}

impl TweenClock {
  /// Advances the clock by `real_delta_ms` and returns the scaled delta.
  pub fn advance(&mut self, real_delta_ms: f64) -> f64 {
    let delta = real_delta_ms * self.speed;
    self.elapsed_ms += delta;
    delta
  }

  pub fn elapsed_ms(&self) -> f64 {
    self.elapsed_ms
  }
}

#[derive(Debug, Clone, Copy)]
struct Tween {
  id: TweenId,
  target: Option<Entity>,
  kind: TweenKind,
  options: TweenOptions,
  elapsed_ms: f64,
}

/// A tween sampled during [`TweenQueue::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSample {
  pub id: TweenId,
  pub target: Option<Entity>,
  pub value: TweenValue,
  pub is_finished: bool,
  pub suppress_warning: bool,
}

/// The explicit animation context: owns the [`TweenClock`] and all running tweens.
#[derive(Resource, Debug, Default)]
pub struct TweenQueue {
  clock: TweenClock,
  next_id: u64,
  tweens: Vec<Tween>,
}

impl TweenQueue {
  pub fn add(&mut self, target: Option<Entity>, kind: TweenKind, options: TweenOptions) -> TweenId {
    let id = TweenId(self.next_id);
    self.next_id += 1;
    self.tweens.push(Tween {
      id,
      target,
      kind,
      options,
      elapsed_ms: 0.,
    });
    id
  }

  /// Resolves after `duration_ms` of tween clock time.
  pub fn wait_ms(&mut self, duration_ms: f64) -> TweenId {
    self.add(None, TweenKind::Wait, TweenOptions::with_duration(duration_ms))
  }

  pub fn fade_in(&mut self, target: Entity, options: TweenOptions) -> TweenId {
    self.add(Some(target), TweenKind::Fade { from: 0., to: 1. }, options)
  }

  pub fn fade_out(&mut self, target: Entity, options: TweenOptions) -> TweenId {
    self.add(Some(target), TweenKind::Fade { from: 1., to: 0. }, options)
  }

  /// Slides `target` into `rest` from `distance` away on the `from` side.
  pub fn slide_enter(
    &mut self,
    target: Entity,
    from: Direction,
    rest: Vec2,
    distance: f32,
    options: TweenOptions,
  ) -> TweenId {
    let pocket = rest + from.unit() * distance;
    self.add(Some(target), TweenKind::Slide { from: pocket, to: rest }, options)
  }

  /// Slides `target` from `rest` to `distance` away on the `to` side.
  pub fn slide_outer(
    &mut self,
    target: Entity,
    to: Direction,
    rest: Vec2,
    distance: f32,
    options: TweenOptions,
  ) -> TweenId {
    let pocket = rest + to.unit() * distance;
    self.add(Some(target), TweenKind::Slide { from: rest, to: pocket }, options)
  }

  pub fn zoom_in(&mut self, target: Entity, options: TweenOptions) -> TweenId {
    self.add(Some(target), TweenKind::Zoom { from: 0., to: 1. }, options)
  }

  pub fn zoom_out(&mut self, target: Entity, options: TweenOptions) -> TweenId {
    self.add(Some(target), TweenKind::Zoom { from: 1., to: 0. }, options)
  }

  /// Pops `target` up from `height` below `base_y`, overshooting slightly before settling.
  pub fn jump_in(&mut self, target: Entity, base_y: f32, height: f32, options: TweenOptions) -> TweenId {
    self.add(Some(target), TweenKind::Jump { base_y, height }, options)
  }

  /// Stops a tween without resolving it. Returns whether it was running.
  pub fn cancel(&mut self, id: TweenId) -> bool {
    let count = self.tweens.len();
    self.tweens.retain(|tween| tween.id != id);
    self.tweens.len() != count
  }

  /// Stops all tweens of `target` without resolving them.
  pub fn cancel_all_for(&mut self, target: Entity) {
    self.tweens.retain(|tween| tween.target != Some(target));
  }

  pub fn is_running(&self, id: TweenId) -> bool {
    self.tweens.iter().any(|tween| tween.id == id)
  }

  pub fn len(&self) -> usize {
    self.tweens.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tweens.is_empty()
  }

  pub fn clock(&self) -> &TweenClock {
    &self.clock
  }

  pub fn clock_mut(&mut self) -> &mut TweenClock {
    &mut self.clock
  }

  /// Advances all tweens by `real_delta_ms` and samples those past their delay. Finished tweens are removed and
  /// reported with `is_finished` set, so every tween shows up as finished exactly once.
  pub fn tick(&mut self, real_delta_ms: f64) -> Vec<TweenSample> {
    let delta = self.clock.advance(real_delta_ms);
    let mut samples = Vec::new();
    self.tweens.retain_mut(|tween| {
      tween.elapsed_ms += delta;
      let active_ms = tween.elapsed_ms - tween.options.delay_ms;
      if active_ms < 0. {
        return true;
      }
      let t = if tween.options.duration_ms <= 0. {
        1.
      } else {
        (active_ms / tween.options.duration_ms).min(1.)
      };
      let is_finished = t >= 1.;
      samples.push(TweenSample {
        id: tween.id,
        target: tween.target,
        value: tween.kind.sample(t as f32),
        is_finished,
        suppress_warning: tween.options.suppress_warning,
      });
      !is_finished
    });
    samples
  }

  fn remove(&mut self, id: TweenId) {
    self.tweens.retain(|tween| tween.id != id);
  }
}

fn advance_tweens_system(
  time: Res<Time<Real>>,
  mut queue: ResMut<TweenQueue>,
  entities: Query<Entity>,
  mut transforms: Query<&mut Transform>,
  mut nodes: Query<&mut Node>,
  mut sprites: Query<&mut Sprite>,
  mut backgrounds: Query<&mut BackgroundColor>,
  mut finished_messages: MessageWriter<TweenFinished>,
  mut failed_messages: MessageWriter<TweenFailed>,
) {
  if queue.is_empty() {
    return;
  }

  let delta_ms = time.delta().as_secs_f64() * 1000.;
  for sample in queue.tick(delta_ms) {
    if let Some(target) = sample.target {
      if !entities.contains(target) {
        queue.remove(sample.id);
        if sample.suppress_warning {
          trace!("Dropped tween [{:?}] of despawned entity [{}]", sample.id, target);
        } else {
          warn!("Tween [{:?}] failed: {}", sample.id, TweenError::DestroyedDuringAnimation);
          failed_messages.write(TweenFailed {
            id: sample.id,
            target: sample.target,
            error: TweenError::DestroyedDuringAnimation,
          });
        }
        continue;
      }
      apply(
        target,
        sample.value,
        &mut transforms,
        &mut nodes,
        &mut sprites,
        &mut backgrounds,
      );
    }
    if sample.is_finished {
      finished_messages.write(TweenFinished {
        id: sample.id,
        target: sample.target,
      });
    }
  }
}

fn apply(
  target: Entity,
  value: TweenValue,
  transforms: &mut Query<&mut Transform>,
  nodes: &mut Query<&mut Node>,
  sprites: &mut Query<&mut Sprite>,
  backgrounds: &mut Query<&mut BackgroundColor>,
) {
  match value {
    TweenValue::None => {}
    TweenValue::Alpha(alpha) => {
      if let Ok(mut sprite) = sprites.get_mut(target) {
        sprite.color.set_alpha(alpha);
      } else if let Ok(mut background) = backgrounds.get_mut(target) {
        background.0.set_alpha(alpha);
      }
    }
    TweenValue::Position(position) => {
      if let Ok(mut node) = nodes.get_mut(target) {
        node.left = Val::Px(position.x);
        node.bottom = Val::Px(position.y);
      } else if let Ok(mut transform) = transforms.get_mut(target) {
        transform.translation.x = position.x;
        transform.translation.y = position.y;
      }
    }
    TweenValue::Scale(scale) => {
      if let Ok(mut transform) = transforms.get_mut(target) {
        transform.scale = Vec3::new(scale, scale, 1.);
      }
    }
    TweenValue::Jump { y, scale } => {
      if let Ok(mut transform) = transforms.get_mut(target) {
        transform.translation.y = y;
        transform.scale = Vec3::new(scale, scale, 1.);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use bevy::time::TimeUpdateStrategy;
  use std::time::Duration;

  const EPSILON: f32 = 1e-4;

  fn setup() -> App {
    let mut app = App::new();
    app
      .add_plugins((MinimalPlugins, AnimationPlugin))
      .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    app.update();
    app
  }

  fn finished_ids(app: &App) -> Vec<TweenId> {
    app
      .world()
      .resource::<Messages<TweenFinished>>()
      .iter_current_update_messages()
      .map(|message| message.id)
      .collect()
  }

  #[test]
  fn fade_slide_and_zoom_ease_in_quadratically() {
    assert_eq!(TweenKind::Fade { from: 0., to: 1. }.sample(0.5), TweenValue::Alpha(0.25));
    assert_eq!(TweenKind::Zoom { from: 1., to: 0. }.sample(0.5), TweenValue::Scale(0.75));
    assert_eq!(
      TweenKind::Slide {
        from: Vec2::ZERO,
        to: Vec2::new(100., -40.)
      }
      .sample(0.5),
      TweenValue::Position(Vec2::new(25., -10.))
    );
    assert_eq!(TweenKind::Zoom { from: 0., to: 1. }.sample(2.), TweenValue::Scale(1.));
  }

  #[test]
  fn jump_starts_below_overshoots_and_settles() {
    let kind = TweenKind::Jump {
      base_y: 10.,
      height: 20.,
    };
    let TweenValue::Jump { y, scale } = kind.sample(0.) else {
      panic!("Expected a jump");
    };
    assert!(scale.abs() < EPSILON);
    assert!((y - -10.).abs() < EPSILON);

    let TweenValue::Jump { y, scale } = kind.sample(2. / 3.) else {
      panic!("Expected a jump");
    };
    assert!(scale > 1.);
    assert!(y > 10.);

    let TweenValue::Jump { y, scale } = kind.sample(1.) else {
      panic!("Expected a jump");
    };
    assert!((scale - 1.).abs() < EPSILON);
    assert!((y - 10.).abs() < EPSILON);
  }

  #[test]
  fn tween_finishes_exactly_once() {
    let mut queue = TweenQueue::default();
    let id = queue.wait_ms(250.);

    assert!(queue.tick(100.).is_empty());
    assert!(queue.tick(100.).is_empty());
    let samples = queue.tick(100.);
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].id, id);
    assert!(samples[0].is_finished);
    assert!(!queue.is_running(id));
    assert!(queue.tick(100.).is_empty());
  }

  #[test]
  fn tween_waits_for_its_delay() {
    let mut queue = TweenQueue::default();
    queue.add(
      Some(Entity::PLACEHOLDER),
      TweenKind::Zoom { from: 0., to: 1. },
      TweenOptions {
        duration_ms: 100.,
        delay_ms: 100.,
        suppress_warning: false,
      },
    );

    assert!(queue.tick(50.).is_empty());
    let samples = queue.tick(100.);
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].value, TweenValue::Scale(0.25));
    assert!(!samples[0].is_finished);
  }

  #[test]
  fn clock_speed_scales_every_tween() {
    let mut queue = TweenQueue::default();
    queue.clock_mut().speed = 2.;
    queue.wait_ms(200.);
    let samples = queue.tick(100.);
    assert_eq!(samples.len(), 1);
    assert!(samples[0].is_finished);
    assert_eq!(queue.clock().elapsed_ms(), 200.);
  }

  #[test]
  fn cancelled_tween_never_resolves() {
    let mut queue = TweenQueue::default();
    let id = queue.wait_ms(100.);
    assert!(queue.cancel(id));
    assert!(!queue.cancel(id));
    assert!(queue.tick(200.).is_empty());
  }

  #[test]
  fn slide_enter_starts_in_the_pocket_of_the_given_side() {
    let mut queue = TweenQueue::default();
    queue.slide_enter(
      Entity::PLACEHOLDER,
      Direction::Top,
      Vec2::new(10., 20.),
      100.,
      TweenOptions::with_duration(100.),
    );
    let samples = queue.tick(0.);
    assert_eq!(samples[0].value, TweenValue::Position(Vec2::new(10., 120.)));
  }

  #[test]
  fn advance_tweens_system_applies_zoom_and_reports_completion() {
    let mut app = setup();
    let entity = app.world_mut().spawn(Transform::default()).id();
    let id = app
      .world_mut()
      .resource_mut::<TweenQueue>()
      .zoom_in(entity, TweenOptions::with_duration(200.));

    app.update();
    let scale = app.world().get::<Transform>(entity).expect("Transform missing").scale;
    assert!((scale.x - 0.25).abs() < EPSILON);
    assert!(finished_ids(&app).is_empty());

    app.update();
    assert_eq!(finished_ids(&app), vec![id]);
    assert_eq!(
      app.world().get::<Transform>(entity).expect("Transform missing").scale,
      Vec3::ONE
    );
    assert!(app.world().resource::<TweenQueue>().is_empty());
  }

  #[test]
  fn advance_tweens_system_reports_destroyed_targets() {
    let mut app = setup();
    let entity = app.world_mut().spawn(Transform::default()).id();
    let id = app
      .world_mut()
      .resource_mut::<TweenQueue>()
      .fade_out(entity, TweenOptions::default());
    app.world_mut().despawn(entity);

    app.update();
    let failed: Vec<TweenFailed> = app
      .world()
      .resource::<Messages<TweenFailed>>()
      .iter_current_update_messages()
      .copied()
      .collect();
    assert_eq!(
      failed,
      vec![TweenFailed {
        id,
        target: Some(entity),
        error: TweenError::DestroyedDuringAnimation,
      }]
    );
    assert!(finished_ids(&app).is_empty());
  }

  #[test]
  fn suppressed_tweens_fail_silently() {
    let mut app = setup();
    let entity = app.world_mut().spawn(Transform::default()).id();
    app
      .world_mut()
      .resource_mut::<TweenQueue>()
      .zoom_out(entity, TweenOptions::default().suppressed());
    app.world_mut().despawn(entity);

    app.update();
    assert!(
      app
        .world()
        .resource::<Messages<TweenFailed>>()
        .iter_current_update_messages()
        .next()
        .is_none()
    );
    assert!(app.world().resource::<TweenQueue>().is_empty());
  }
}
