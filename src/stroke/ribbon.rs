use crate::stroke::{Stroke, joint_factor, lerp};
use bevy::asset::RenderAssetUsages;
use bevy::math::{Affine2, Vec2};
use bevy::mesh::{Indices, Mesh, PrimitiveTopology};

/// Vertices emitted per joint: left, centre and right.
const VERTICES_PER_JOINT: usize = 3;

/// Indices emitted per pair of joints: two triangles on each side of the centre line.
const INDICES_PER_QUAD: usize = 12;

/// A reusable vertex and index buffer for a ribbon with a fixed number of joints.
///
/// The index pattern is built once. Local joints and texture coordinates are only recomputed after [`Self::render`]
/// and world positions only after that or when the transform changes.
#[derive(Debug, Clone)]
pub struct RibbonBuffer {
  joints: usize,
  left: Vec<Vec2>,
  right: Vec<Vec2>,
  positions: Vec<[f32; 3]>,
  uvs: Vec<[f32; 2]>,
  indices: Vec<u32>,
  transform: Affine2,
  is_vertex_data_dirty: bool,
  is_world_transform_dirty: bool,
}

impl RibbonBuffer {
  pub fn new(joints: usize) -> Self {
    assert!(joints >= 2, "A ribbon needs at least two joints");
    let vertex_count = joints * VERTICES_PER_JOINT;
    Self {
      joints,
      left: vec![Vec2::ZERO; joints],
      right: vec![Vec2::ZERO; joints],
      positions: vec![[0.; 3]; vertex_count],
      uvs: vec![[0.; 2]; vertex_count],
      indices: build_indices(joints),
      transform: Affine2::IDENTITY,
      is_vertex_data_dirty: true,
      is_world_transform_dirty: true,
    }
  }

  pub fn for_stroke(stroke: &Stroke) -> Self {
    Self::new(stroke.joint_count())
  }

  pub fn joints(&self) -> usize {
    self.joints
  }

  pub fn vertex_count(&self) -> usize {
    self.joints * VERTICES_PER_JOINT
  }

  pub fn index_count(&self) -> usize {
    (self.joints - 1) * INDICES_PER_QUAD
  }

  /// Requests a refresh of the local joints on the next [`Self::refresh`].
  pub fn render(&mut self) {
    self.is_vertex_data_dirty = true;
  }

  /// Sets the transform from local joint space to world space. World positions are only invalidated if the transform
  /// actually changed.
  pub fn set_transform(&mut self, transform: Affine2) {
    if self.transform != transform {
      self.transform = transform;
      self.is_world_transform_dirty = true;
    }
  }

  pub fn transform(&self) -> Affine2 {
    self.transform
  }

  pub fn is_dirty(&self) -> bool {
    self.is_vertex_data_dirty || self.is_world_transform_dirty
  }

  /// Brings the buffer up to date with `stroke` and returns whether any vertex data changed.
  pub fn refresh(&mut self, stroke: &Stroke) -> bool {
    debug_assert_eq!(stroke.joint_count(), self.joints, "Stroke does not match ribbon joint count");
    if self.is_vertex_data_dirty {
      self.update_uvs(stroke.texture_v_range());
      stroke.fill_joints(&mut self.left, &mut self.right);
      self.update_world_vertices();
      self.is_vertex_data_dirty = false;
      self.is_world_transform_dirty = false;
      return true;
    }
    if self.is_world_transform_dirty {
      self.update_world_vertices();
      self.is_world_transform_dirty = false;
      return true;
    }
    false
  }

  pub fn left_joints(&self) -> &[Vec2] {
    &self.left
  }

  pub fn right_joints(&self) -> &[Vec2] {
    &self.right
  }

  pub fn positions(&self) -> &[[f32; 3]] {
    &self.positions
  }

  pub fn uvs(&self) -> &[[f32; 2]] {
    &self.uvs
  }

  pub fn indices(&self) -> &[u32] {
    &self.indices
  }

  /// Creates a triangle list mesh holding the current buffer contents.
  pub fn to_mesh(&self) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    self.write_mesh(&mut mesh);
    mesh
  }

  /// Copies the current buffer contents into an existing mesh.
  pub fn write_mesh(&self, mesh: &mut Mesh) {
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs.clone());
    mesh.insert_indices(Indices::U32(self.indices.clone()));
  }

  fn update_uvs(&mut self, texture_v_range: Vec2) {
    for joint in 0..self.joints {
      let v = lerp(texture_v_range.x, texture_v_range.y, joint_factor(joint, self.joints));
      for i in 0..VERTICES_PER_JOINT {
        self.uvs[joint * VERTICES_PER_JOINT + i] = [i as f32 / 2., v];
      }
    }
  }

  fn update_world_vertices(&mut self) {
    for joint in 0..self.joints {
      let left = self.left[joint];
      let right = self.right[joint];
      let centre = (left + right) * 0.5;
      let base = joint * VERTICES_PER_JOINT;
      for (offset, point) in [left, centre, right].into_iter().enumerate() {
        let world = self.transform.transform_point2(point);
        self.positions[base + offset] = [world.x, world.y, 0.];
      }
    }
  }
}

/// Builds the static index pattern. Joint `n` owns vertices `3n` (left), `3n + 1` (centre) and `3n + 2` (right); each
/// pair of joints is split into a left and a right quad of two triangles each.
fn build_indices(joints: usize) -> Vec<u32> {
  let mut indices = Vec::with_capacity((joints - 1) * INDICES_PER_QUAD);
  for joint in 0..joints - 1 {
    let left = (joint * VERTICES_PER_JOINT) as u32;
    let centre = left + 1;
    indices.extend_from_slice(&[left, left + 1, left + 3, left + 1, left + 4, left + 3]);
    indices.extend_from_slice(&[centre, centre + 1, centre + 3, centre + 1, centre + 4, centre + 3]);
  }
  indices
}
