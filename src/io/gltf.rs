//! glTF format support (loading only).
//!
//! glTF stores shape keys as morph targets: per-primitive arrays of position
//! deltas relative to the base positions. All mesh primitives are merged into
//! one [`ShapeKeyMesh`]; the base positions become the basis and morph target
//! `k` becomes shape key `Key {k + 1}` with coordinates `base + delta`.
//! Primitives that lack a target present elsewhere contribute zero deltas.

use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::error::{Result, ShapeKeyError};
use crate::mesh::ShapeKeyMesh;

/// Load a mesh with its morph targets from a glTF or GLB file.
///
/// # Example
///
/// ```no_run
/// use shapekey::io::gltf;
///
/// let mesh = gltf::load("face.glb").unwrap();
/// for key in mesh.shape_keys() {
///     println!("{}", key.name);
/// }
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<ShapeKeyMesh> {
    let path = path.as_ref();

    let (document, buffers, _images) = ::gltf::import(path).map_err(|e| ShapeKeyError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut all_vertices: Vec<Point3<f64>> = Vec::new();
    let mut all_faces: Vec<Vec<usize>> = Vec::new();
    let mut all_deltas: Vec<Vec<Vector3<f64>>> = Vec::new();

    for mesh in document.meshes() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let Some(positions) = reader.read_positions() else {
                continue;
            };

            let vertex_offset = all_vertices.len();
            all_vertices.extend(
                positions.map(|p| Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
            );
            let primitive_len = all_vertices.len() - vertex_offset;

            let indices: Vec<usize> = match reader.read_indices() {
                Some(indices) => indices.into_u32().map(|i| i as usize).collect(),
                None => (0..primitive_len).collect(),
            };

            match primitive.mode() {
                ::gltf::mesh::Mode::Triangles => {
                    for chunk in indices.chunks_exact(3) {
                        all_faces.push(chunk.iter().map(|&i| i + vertex_offset).collect());
                    }
                }
                ::gltf::mesh::Mode::TriangleStrip => {
                    for i in 0..indices.len().saturating_sub(2) {
                        let (a, b) = if i % 2 == 0 { (i + 1, i + 2) } else { (i + 2, i + 1) };
                        all_faces.push(vec![
                            indices[i] + vertex_offset,
                            indices[a] + vertex_offset,
                            indices[b] + vertex_offset,
                        ]);
                    }
                }
                ::gltf::mesh::Mode::TriangleFan => {
                    for i in 1..indices.len().saturating_sub(1) {
                        all_faces.push(vec![
                            indices[0] + vertex_offset,
                            indices[i] + vertex_offset,
                            indices[i + 1] + vertex_offset,
                        ]);
                    }
                }
                mode => {
                    // Vertices still count: their shape-key motion is meaningful.
                    log::debug!("primitive mode {:?} contributes no faces", mode);
                }
            }

            for (target, (deltas, _, _)) in reader.read_morph_targets().enumerate() {
                if all_deltas.len() <= target {
                    all_deltas.push(vec![Vector3::zeros(); vertex_offset]);
                }
                let target_deltas = &mut all_deltas[target];
                target_deltas.resize(vertex_offset, Vector3::zeros());
                if let Some(deltas) = deltas {
                    target_deltas.extend(
                        deltas.map(|d| Vector3::new(d[0] as f64, d[1] as f64, d[2] as f64)),
                    );
                }
                target_deltas.resize(all_vertices.len(), Vector3::zeros());
            }
        }
    }

    if all_vertices.is_empty() {
        return Err(ShapeKeyError::LoadError {
            path: path.to_path_buf(),
            message: "glTF file contains no mesh positions".to_string(),
        });
    }

    let mut result = ShapeKeyMesh::new(all_vertices, all_faces)?;
    for (k, mut deltas) in all_deltas.into_iter().enumerate() {
        deltas.resize(result.num_vertices(), Vector3::zeros());
        let positions = result
            .positions()
            .iter()
            .zip(&deltas)
            .map(|(p, d)| p + d)
            .collect();
        result.add_shape_key(format!("Key {}", k + 1), positions)?;
    }

    log::debug!(
        "loaded {}: {} vertices, {} faces, {} morph targets",
        path.display(),
        result.num_vertices(),
        result.num_faces(),
        result.shape_keys().len().saturating_sub(1)
    );
    Ok(result)
}
