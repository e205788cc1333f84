//! The mesh context the shape-key tools operate on.
//!
//! [`ShapeKeyMesh`] bundles everything an editing session owns for one mesh
//! object: the vertex positions and polygon faces, the shape-key stack with its
//! active index, vertex groups, per-element selection flags and the current
//! interaction mode. Tools receive it as an explicit `&mut` argument; there is
//! no global "active object".
//!
//! # Example
//!
//! ```
//! use shapekey::mesh::ShapeKeyMesh;
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mut mesh = ShapeKeyMesh::new(positions.clone(), vec![vec![0, 1, 2]]).unwrap();
//!
//! // The first key added also creates the basis.
//! let mut raised = positions;
//! raised[2].z = 0.5;
//! let index = mesh.add_shape_key("Raise", raised).unwrap();
//!
//! assert_eq!(index, 1);
//! assert_eq!(mesh.shape_keys().len(), 2);
//! assert_eq!(mesh.active_shape_key_index(), 1);
//! ```

use nalgebra::Point3;

use super::index::{FaceId, VertexId};
use super::shape_key::{ShapeKey, VertexGroup};
use crate::error::{Result, ShapeKeyError};

/// Name given to the reference key created with the first shape key.
pub const BASIS_NAME: &str = "Basis";

/// Object interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectMode {
    /// Whole-object mode; mesh data may be written directly.
    #[default]
    Object,
    /// Edit mode; selection is visible and editable.
    Edit,
}

/// Element type that edit-mode selection operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    /// Vertex selection.
    #[default]
    Vertex,
    /// Face selection.
    Face,
}

/// A polygon mesh with a shape-key stack, vertex groups and selection state.
#[derive(Debug, Clone)]
pub struct ShapeKeyMesh {
    positions: Vec<Point3<f64>>,
    faces: Vec<Vec<usize>>,
    shape_keys: Vec<ShapeKey>,
    active_shape_key: usize,
    vertex_groups: Vec<VertexGroup>,
    vertex_selection: Vec<bool>,
    face_selection: Vec<bool>,
    mode: ObjectMode,
    select_mode: SelectMode,
}

impl ShapeKeyMesh {
    /// Create a mesh from vertex positions and polygon faces.
    ///
    /// Faces may have any number of vertices. A mesh without faces is allowed
    /// (a point cloud); every vertex operation still works on it.
    ///
    /// # Errors
    /// Returns [`ShapeKeyError::InvalidVertexIndex`] if a face references a
    /// vertex that does not exist.
    pub fn new(positions: Vec<Point3<f64>>, faces: Vec<Vec<usize>>) -> Result<Self> {
        for (fi, face) in faces.iter().enumerate() {
            if let Some(&vi) = face.iter().find(|&&vi| vi >= positions.len()) {
                return Err(ShapeKeyError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }

        let num_vertices = positions.len();
        let num_faces = faces.len();
        Ok(Self {
            positions,
            faces,
            shape_keys: Vec::new(),
            active_shape_key: 0,
            vertex_groups: Vec::new(),
            vertex_selection: vec![false; num_vertices],
            face_selection: vec![false; num_faces],
            mode: ObjectMode::Object,
            select_mode: SelectMode::Vertex,
        })
    }

    /// Create a mesh from triangles.
    pub fn from_triangles(positions: Vec<Point3<f64>>, triangles: &[[usize; 3]]) -> Result<Self> {
        Self::new(positions, triangles.iter().map(|t| t.to_vec()).collect())
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Mesh vertex positions (the undeformed coordinates).
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// All faces as vertex index lists.
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// Vertex indices of one face.
    ///
    /// # Panics
    /// Panics if `f` is out of range.
    pub fn face_vertices(&self, f: FaceId) -> &[usize] {
        &self.faces[f.index()]
    }

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.num_vertices()).map(VertexId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> {
        (0..self.num_faces()).map(FaceId::new)
    }

    // ---------------------------------------------------------------------
    // Shape keys
    // ---------------------------------------------------------------------

    /// Whether the mesh has a shape-key stack at all.
    pub fn has_shape_keys(&self) -> bool {
        !self.shape_keys.is_empty()
    }

    /// All shape keys, basis first.
    pub fn shape_keys(&self) -> &[ShapeKey] {
        &self.shape_keys
    }

    /// The reference key, if any shape keys exist.
    pub fn basis(&self) -> Option<&ShapeKey> {
        self.shape_keys.first()
    }

    /// Add a shape key and make it active, returning its index.
    ///
    /// When the mesh has no shape keys yet, a [`BASIS_NAME`] key copied from
    /// the mesh positions is created first, so the new key gets index 1.
    ///
    /// # Errors
    /// Returns [`ShapeKeyError::ShapeMismatch`] if `positions` does not have
    /// one entry per vertex.
    pub fn add_shape_key(
        &mut self,
        name: impl Into<String>,
        positions: Vec<Point3<f64>>,
    ) -> Result<usize> {
        ShapeKeyError::check_aligned(self.num_vertices(), positions.len())?;

        if self.shape_keys.is_empty() {
            self.shape_keys
                .push(ShapeKey::new(BASIS_NAME, self.positions.clone()));
        }
        self.shape_keys.push(ShapeKey::new(name, positions));
        self.active_shape_key = self.shape_keys.len() - 1;
        Ok(self.active_shape_key)
    }

    /// Index of the active shape key (0 is the basis).
    pub fn active_shape_key_index(&self) -> usize {
        self.active_shape_key
    }

    /// Change the active shape key.
    ///
    /// # Errors
    /// Returns [`ShapeKeyError::NoShapeKeys`] or
    /// [`ShapeKeyError::ShapeKeyIndexOutOfRange`].
    pub fn set_active_shape_key_index(&mut self, index: usize) -> Result<()> {
        if self.shape_keys.is_empty() {
            return Err(ShapeKeyError::NoShapeKeys);
        }
        if index >= self.shape_keys.len() {
            return Err(ShapeKeyError::ShapeKeyIndexOutOfRange {
                index,
                count: self.shape_keys.len(),
            });
        }
        self.active_shape_key = index;
        Ok(())
    }

    /// The active shape key, if any shape keys exist.
    pub fn active_shape_key(&self) -> Option<&ShapeKey> {
        self.shape_keys.get(self.active_shape_key)
    }

    /// Replace the coordinates of the active shape key.
    ///
    /// # Errors
    /// Fails without writing anything if there is no shape key, the active
    /// key is the basis, or the length does not match the vertex count.
    pub fn set_active_shape_key_positions(&mut self, positions: Vec<Point3<f64>>) -> Result<()> {
        if self.shape_keys.is_empty() {
            return Err(ShapeKeyError::NoShapeKeys);
        }
        if self.active_shape_key == 0 {
            return Err(ShapeKeyError::ActiveIsBasis);
        }
        ShapeKeyError::check_aligned(self.num_vertices(), positions.len())?;
        self.shape_keys[self.active_shape_key].positions = positions;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Vertex groups
    // ---------------------------------------------------------------------

    /// All vertex groups.
    pub fn vertex_groups(&self) -> &[VertexGroup] {
        &self.vertex_groups
    }

    /// Add a vertex group, replacing any existing group with the same name.
    pub fn add_vertex_group(&mut self, group: VertexGroup) {
        match self.vertex_groups.iter_mut().find(|g| g.name == group.name) {
            Some(existing) => *existing = group,
            None => self.vertex_groups.push(group),
        }
    }

    /// Look up a vertex group by name.
    pub fn vertex_group(&self, name: &str) -> Option<&VertexGroup> {
        self.vertex_groups.iter().find(|g| g.name == name)
    }

    // ---------------------------------------------------------------------
    // Selection and modes
    // ---------------------------------------------------------------------

    /// Whether a vertex is selected.
    ///
    /// # Panics
    /// Panics if `v` is out of range.
    pub fn is_vertex_selected(&self, v: VertexId) -> bool {
        self.vertex_selection[v.index()]
    }

    /// Whether a face is selected.
    ///
    /// # Panics
    /// Panics if `f` is out of range.
    pub fn is_face_selected(&self, f: FaceId) -> bool {
        self.face_selection[f.index()]
    }

    /// Selected vertices in ascending order.
    pub fn selected_vertices(&self) -> Vec<VertexId> {
        self.vertex_ids().filter(|&v| self.is_vertex_selected(v)).collect()
    }

    /// Selected faces in ascending order.
    pub fn selected_faces(&self) -> Vec<FaceId> {
        self.face_ids().filter(|&f| self.is_face_selected(f)).collect()
    }

    /// Clear the vertex selection and select exactly `vertices`.
    pub fn select_vertices(&mut self, vertices: &[VertexId]) {
        self.vertex_selection.fill(false);
        for v in vertices {
            self.vertex_selection[v.index()] = true;
        }
    }

    /// Clear the face selection and select exactly `faces`.
    pub fn select_faces(&mut self, faces: &[FaceId]) {
        self.face_selection.fill(false);
        for f in faces {
            self.face_selection[f.index()] = true;
        }
    }

    /// Current object mode.
    pub fn mode(&self) -> ObjectMode {
        self.mode
    }

    /// Switch object mode.
    pub fn set_mode(&mut self, mode: ObjectMode) {
        self.mode = mode;
    }

    /// Current edit-mode selection type.
    pub fn select_mode(&self) -> SelectMode {
        self.select_mode
    }

    /// Switch edit-mode selection type.
    pub fn set_select_mode(&mut self, select_mode: SelectMode) {
        self.select_mode = select_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> ShapeKeyMesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        ShapeKeyMesh::new(positions, vec![vec![0, 1, 2, 3]]).unwrap()
    }

    #[test]
    fn test_invalid_face_index() {
        let err = ShapeKeyMesh::new(vec![Point3::origin()], vec![vec![0, 1, 2]]).unwrap_err();
        assert!(matches!(
            err,
            ShapeKeyError::InvalidVertexIndex { face: 0, vertex: 1 }
        ));
    }

    #[test]
    fn test_face_queries() {
        let mesh = ShapeKeyMesh::from_triangles(
            quad().positions().to_vec(),
            &[[0, 1, 2], [0, 2, 3]],
        )
        .unwrap();
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.face_vertices(FaceId::new(1)), &[0, 2, 3]);
        assert_eq!(mesh.face_ids().count(), 2);
    }

    #[test]
    #[should_panic]
    fn test_selection_query_out_of_range() {
        quad().is_vertex_selected(VertexId::new(4));
    }

    #[test]
    fn test_first_key_creates_basis() {
        let mut mesh = quad();
        assert!(!mesh.has_shape_keys());
        assert!(mesh.basis().is_none());

        let positions = mesh.positions().to_vec();
        mesh.add_shape_key("Key 1", positions.clone()).unwrap();
        mesh.add_shape_key("Key 2", positions).unwrap();

        let names: Vec<_> = mesh.shape_keys().iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec![BASIS_NAME, "Key 1", "Key 2"]);
        assert_eq!(mesh.active_shape_key_index(), 2);
        assert_eq!(mesh.basis().unwrap().positions, mesh.positions());
    }

    #[test]
    fn test_shape_key_length_mismatch() {
        let mut mesh = quad();
        let err = mesh.add_shape_key("Short", vec![Point3::origin()]).unwrap_err();
        assert!(matches!(
            err,
            ShapeKeyError::ShapeMismatch { expected: 4, found: 1 }
        ));
        assert!(!mesh.has_shape_keys());
    }

    #[test]
    fn test_set_active_index() {
        let mut mesh = quad();
        assert!(matches!(
            mesh.set_active_shape_key_index(0),
            Err(ShapeKeyError::NoShapeKeys)
        ));

        let positions = mesh.positions().to_vec();
        mesh.add_shape_key("Key 1", positions).unwrap();
        mesh.set_active_shape_key_index(0).unwrap();
        assert_eq!(mesh.active_shape_key().unwrap().name, BASIS_NAME);
        assert!(matches!(
            mesh.set_active_shape_key_index(5),
            Err(ShapeKeyError::ShapeKeyIndexOutOfRange { index: 5, count: 2 })
        ));
    }

    #[test]
    fn test_basis_is_never_overwritten() {
        let mut mesh = quad();
        let positions = mesh.positions().to_vec();
        mesh.add_shape_key("Key 1", positions.clone()).unwrap();
        mesh.set_active_shape_key_index(0).unwrap();

        let moved = vec![Point3::new(9.0, 9.0, 9.0); 4];
        assert!(matches!(
            mesh.set_active_shape_key_positions(moved),
            Err(ShapeKeyError::ActiveIsBasis)
        ));
        assert_eq!(mesh.basis().unwrap().positions, positions);
    }

    #[test]
    fn test_selection_replaces_previous() {
        let mut mesh = quad();
        mesh.select_vertices(&[VertexId::new(0), VertexId::new(1)]);
        mesh.select_vertices(&[VertexId::new(3)]);
        assert_eq!(mesh.selected_vertices(), vec![VertexId::new(3)]);

        mesh.select_faces(&[FaceId::new(0)]);
        assert!(mesh.is_face_selected(FaceId::new(0)));
        mesh.select_faces(&[]);
        assert!(mesh.selected_faces().is_empty());
    }

    #[test]
    fn test_vertex_group_replaced_by_name() {
        let mut mesh = quad();
        mesh.add_vertex_group(VertexGroup::from_dense("Mask", &[1.0; 4]));
        mesh.add_vertex_group(VertexGroup::from_dense("Mask", &[0.5; 4]));
        assert_eq!(mesh.vertex_groups().len(), 1);
        assert_eq!(
            mesh.vertex_group("Mask").unwrap().weight(VertexId::new(0)),
            Some(0.5)
        );
        assert!(mesh.vertex_group("Other").is_none());
    }
}
