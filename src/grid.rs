use bevy::math::IVec2;
use bevy::platform::collections::HashMap;

/// A fixed-size, sparsely populated 2D store addressed by integer cell coordinates. Entries are keyed by the flat
/// index `width * y + x`, so callers must check [`Grid::contains`] before using coordinates that may be out of bounds.
#[derive(Debug, Clone)]
pub struct Grid<T> {
  width: i32,
  height: i32,
  buffer: HashMap<usize, T>,
}

impl<T> Grid<T> {
  pub fn new(width: i32, height: i32) -> Self {
    debug_assert!(width > 0 && height > 0, "Grid dimensions must be positive");
    Self {
      width,
      height,
      buffer: HashMap::new(),
    }
  }

  pub fn width(&self) -> i32 {
    self.width
  }

  pub fn height(&self) -> i32 {
    self.height
  }

  pub fn size(&self) -> IVec2 {
    IVec2::new(self.width, self.height)
  }

  pub fn index(&self, position: IVec2) -> usize {
    (self.width * position.y + position.x) as usize
  }

  pub fn contains(&self, position: IVec2) -> bool {
    position.x >= 0 && position.y >= 0 && position.x < self.width && position.y < self.height
  }

  pub fn get(&self, position: IVec2) -> Option<&T> {
    if !self.contains(position) {
      return None;
    }
    self.buffer.get(&self.index(position))
  }

  pub fn get_mut(&mut self, position: IVec2) -> Option<&mut T> {
    if !self.contains(position) {
      return None;
    }
    let index = self.index(position);
    self.buffer.get_mut(&index)
  }

  /// Stores `value` at `position` and returns the value previously stored there, if any. Out of bounds positions are
  /// ignored and hand the value back.
  pub fn set(&mut self, position: IVec2, value: T) -> Option<T> {
    if !self.contains(position) {
      return Some(value);
    }
    let index = self.index(position);
    self.buffer.insert(index, value)
  }

  pub fn remove(&mut self, position: IVec2) -> Option<T> {
    if !self.contains(position) {
      return None;
    }
    let index = self.index(position);
    self.buffer.remove(&index)
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Removes all entries and returns them in no particular order.
  pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
    self.buffer.drain().map(|(_, value)| value)
  }

  /// Iterates over all populated cells together with their coordinates.
  pub fn iter(&self) -> impl Iterator<Item = (IVec2, &T)> {
    let width = self.width;
    self
      .buffer
      .iter()
      .map(move |(index, value)| (IVec2::new(*index as i32 % width, *index as i32 / width), value))
  }

  /// All coordinates of the grid in row-major order, starting at the bottom left.
  pub fn positions(&self) -> impl Iterator<Item = IVec2> + use<T> {
    let (width, height) = (self.width, self.height);
    (0..height).flat_map(move |y| (0..width).map(move |x| IVec2::new(x, y)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn index_is_row_major() {
    let grid = Grid::<u8>::new(7, 12);
    assert_eq!(grid.index(IVec2::new(0, 0)), 0);
    assert_eq!(grid.index(IVec2::new(6, 0)), 6);
    assert_eq!(grid.index(IVec2::new(0, 1)), 7);
    assert_eq!(grid.index(IVec2::new(3, 5)), 38);
  }

  #[test]
  fn set_get_and_remove_values() {
    let mut grid = Grid::new(3, 3);
    assert!(grid.set(IVec2::new(1, 2), "apple").is_none());
    assert_eq!(grid.get(IVec2::new(1, 2)), Some(&"apple"));
    assert_eq!(grid.set(IVec2::new(1, 2), "pear"), Some("apple"));
    assert_eq!(grid.len(), 1);
    assert_eq!(grid.remove(IVec2::new(1, 2)), Some("pear"));
    assert!(grid.get(IVec2::new(1, 2)).is_none());
    assert!(grid.is_empty());
  }

  #[test]
  fn out_of_bounds_positions_are_never_stored() {
    let mut grid = Grid::new(2, 2);
    assert_eq!(grid.set(IVec2::new(2, 0), 1), Some(1));
    assert_eq!(grid.set(IVec2::new(-1, 0), 2), Some(2));
    assert!(grid.get(IVec2::new(2, 0)).is_none());
    assert!(grid.get_mut(IVec2::new(0, -1)).is_none());
    assert!(grid.is_empty());
  }

  #[test]
  fn iter_reports_coordinates() {
    let mut grid = Grid::new(4, 3);
    grid.set(IVec2::new(3, 2), 'x');
    let entries: Vec<(IVec2, &char)> = grid.iter().collect();
    assert_eq!(entries, vec![(IVec2::new(3, 2), &'x')]);
  }

  #[test]
  fn positions_cover_every_cell_once() {
    let grid = Grid::<()>::new(4, 3);
    let positions: Vec<IVec2> = grid.positions().collect();
    assert_eq!(positions.len(), 12);
    assert_eq!(positions[0], IVec2::new(0, 0));
    assert_eq!(positions[4], IVec2::new(0, 1));
    assert_eq!(positions[11], IVec2::new(3, 2));
  }

  #[test]
  fn drain_empties_the_grid() {
    let mut grid = Grid::new(2, 2);
    grid.set(IVec2::new(0, 0), 1);
    grid.set(IVec2::new(1, 1), 2);
    let mut drained: Vec<i32> = grid.drain().collect();
    drained.sort();
    assert_eq!(drained, vec![1, 2]);
    assert!(grid.is_empty());
  }
}
