//! Shape keys and vertex groups.

use std::collections::HashMap;

use nalgebra::Point3;

use super::index::VertexId;

/// A named alternate vertex-position set on the mesh topology.
///
/// Shape key 0 of a [`ShapeKeyMesh`](super::ShapeKeyMesh) is the basis; all
/// displacements are measured against it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeKey {
    /// Display name of the key.
    pub name: String,

    /// One position per vertex, index-aligned with the basis.
    pub positions: Vec<Point3<f64>>,
}

impl ShapeKey {
    /// Create a shape key from a name and a position per vertex.
    pub fn new(name: impl Into<String>, positions: Vec<Point3<f64>>) -> Self {
        Self {
            name: name.into(),
            positions,
        }
    }

    /// Number of vertices stored in this key.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether this key stores no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of a vertex in this key.
    ///
    /// # Panics
    /// Panics if `v` is not a vertex of this key.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.positions[v.index()]
    }
}

/// A named, sparse mapping from vertex to influence weight.
///
/// Vertices that were never assigned to the group have no entry. Weights are
/// stored as given; nothing here clamps them to `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexGroup {
    /// Group name.
    pub name: String,

    weights: HashMap<usize, f64>,
}

impl VertexGroup {
    /// Create an empty vertex group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weights: HashMap::new(),
        }
    }

    /// Create a group that assigns every vertex, taking weights in vertex order.
    pub fn from_dense(name: impl Into<String>, weights: &[f64]) -> Self {
        Self {
            name: name.into(),
            weights: weights.iter().copied().enumerate().collect(),
        }
    }

    /// Assign (or overwrite) the weight of a vertex.
    pub fn assign(&mut self, v: VertexId, weight: f64) {
        self.weights.insert(v.index(), weight);
    }

    /// Remove a vertex from the group.
    pub fn remove(&mut self, v: VertexId) -> Option<f64> {
        self.weights.remove(&v.index())
    }

    /// Weight of a vertex, or `None` if it is not a member.
    #[inline]
    pub fn weight(&self, v: VertexId) -> Option<f64> {
        self.weights.get(&v.index()).copied()
    }

    /// Number of member vertices.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether no vertex is a member.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Expand into one weight per vertex for a mesh of `num_vertices`,
    /// substituting `default` for non-members.
    ///
    /// Entries beyond `num_vertices` are ignored.
    pub fn dense_weights(&self, num_vertices: usize, default: f64) -> Vec<f64> {
        (0..num_vertices)
            .map(|i| self.weights.get(&i).copied().unwrap_or(default))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_weights() {
        let mut group = VertexGroup::new("Mask");
        group.assign(VertexId::new(1), 0.25);
        group.assign(VertexId::new(3), 1.0);

        assert_eq!(group.len(), 2);
        assert_eq!(group.weight(VertexId::new(0)), None);
        assert_eq!(group.weight(VertexId::new(1)), Some(0.25));
        assert_eq!(group.dense_weights(4, 0.0), vec![0.0, 0.25, 0.0, 1.0]);
    }

    #[test]
    fn test_weights_are_not_clamped() {
        let group = VertexGroup::from_dense("Overshoot", &[1.5, -0.5]);
        assert_eq!(group.weight(VertexId::new(0)), Some(1.5));
        assert_eq!(group.weight(VertexId::new(1)), Some(-0.5));
    }

    #[test]
    fn test_remove() {
        let mut group = VertexGroup::from_dense("All", &[1.0, 1.0]);
        assert_eq!(group.remove(VertexId::new(0)), Some(1.0));
        assert_eq!(group.dense_weights(2, 0.0), vec![0.0, 1.0]);
    }

    #[test]
    fn test_shape_key_accessors() {
        let key = ShapeKey::new("Smile", vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]);
        assert_eq!(key.len(), 2);
        assert!(!key.is_empty());
        assert_eq!(key.position(VertexId::new(1)).x, 1.0);
    }
}
