//! Selection of vertices and faces moved by a shape key.

use crate::mesh::{FaceId, VertexId};

use super::displacement::Displacement;

/// Vertices whose displacement magnitude exceeds `epsilon`, in ascending order.
///
/// # Example
///
/// ```
/// use shapekey::algo::displacement::compute_displacements;
/// use shapekey::algo::select::select_affected_vertices;
/// use shapekey::mesh::VertexId;
/// use nalgebra::Point3;
///
/// let basis = vec![Point3::origin(); 3];
/// let shape = vec![Point3::origin(), Point3::new(0.0, 1.0, 0.0), Point3::origin()];
/// let d = compute_displacements(&basis, &shape).unwrap();
///
/// assert_eq!(select_affected_vertices(&d, 1e-6), vec![VertexId::new(1)]);
/// ```
pub fn select_affected_vertices(displacements: &[Displacement], epsilon: f64) -> Vec<VertexId> {
    displacements
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_affected(epsilon))
        .map(|(i, _)| VertexId::new(i))
        .collect()
}

/// Faces that contain at least one affected vertex, in ascending order.
///
/// `faces` lists the vertex indices of each face. Vertex indices outside the
/// range covered by `affected` are treated as unaffected.
pub fn select_affected_faces(affected: &[VertexId], faces: &[Vec<usize>]) -> Vec<FaceId> {
    let len = affected
        .iter()
        .map(|v| v.index() + 1)
        .max()
        .unwrap_or(0);
    let mut is_affected = vec![false; len];
    for v in affected {
        is_affected[v.index()] = true;
    }

    faces
        .iter()
        .enumerate()
        .filter(|(_, face)| {
            face.iter()
                .any(|&vi| is_affected.get(vi).copied().unwrap_or(false))
        })
        .map(|(fi, _)| FaceId::new(fi))
        .collect()
}
