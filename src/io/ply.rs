//! PLY (Stanford polygon) format support.
//!
//! Vertices are read from the `x`, `y`, `z` properties and faces from
//! `vertex_indices` (or `vertex_index`). Polygons are kept as they are, since
//! face selection works per polygon. Any other scalar vertex property that is
//! not a normal, colour or texture coordinate is read as a vertex group of the
//! same name, one weight per vertex.
//!
//! Saving writes the active shape key's coordinates with the mesh faces and
//! every vertex group as a `float` property, so a file written here loads back
//! with its groups intact.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{Result, ShapeKeyError};
use crate::mesh::{ShapeKeyMesh, VertexGroup};

/// Vertex properties that never become vertex groups.
const RESERVED_VERTEX_PROPERTIES: &[&str] = &[
    "x", "y", "z", "nx", "ny", "nz", "red", "green", "blue", "alpha", "r", "g", "b", "a", "s",
    "t", "u", "v", "texture_u", "texture_v",
];

/// Load a mesh and its vertex groups from a PLY file.
///
/// The returned mesh has no shape keys.
///
/// # Example
///
/// ```no_run
/// use shapekey::io::ply;
///
/// let mesh = ply::load("head.ply").unwrap();
/// println!("{} vertex groups", mesh.vertex_groups().len());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<ShapeKeyMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let load_error = |message: String| ShapeKeyError::LoadError {
        path: path.to_path_buf(),
        message,
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(e.to_string()))?;

    // Extract vertices
    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element".to_string()))?;

    let mut positions: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let coord = |name: &str| {
            get_float_property(vertex, name)
                .ok_or_else(|| load_error(format!("vertex missing {} coordinate", name)))
        };
        positions.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    // Faces are optional: a point cloud still carries shape-key data.
    let mut faces: Vec<Vec<usize>> = Vec::new();
    if let Some(face_element) = ply.payload.get("face") {
        faces.reserve(face_element.len());
        for face in face_element {
            let indices = get_list_property(face, "vertex_indices")
                .or_else(|| get_list_property(face, "vertex_index"))
                .ok_or_else(|| load_error("face missing vertex_indices property".to_string()))?;
            faces.push(indices);
        }
    }

    let groups = read_vertex_groups(vertex_element);

    let mut mesh = ShapeKeyMesh::new(positions, faces)?;
    for group in groups {
        mesh.add_vertex_group(group);
    }

    log::debug!(
        "loaded {}: {} vertices, {} faces, {} vertex groups",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces(),
        mesh.vertex_groups().len()
    );
    Ok(mesh)
}

fn read_vertex_groups(vertices: &[DefaultElement]) -> Vec<VertexGroup> {
    let Some(first) = vertices.first() else {
        return Vec::new();
    };

    first
        .iter()
        .filter(|(name, property)| {
            !RESERVED_VERTEX_PROPERTIES.contains(&name.as_str()) && scalar_to_f64(property).is_some()
        })
        .map(|(name, _)| {
            let weights: Vec<f64> = vertices
                .iter()
                .map(|v| get_float_property(v, name).unwrap_or(0.0))
                .collect();
            VertexGroup::from_dense(name.clone(), &weights)
        })
        .collect()
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    scalar_to_f64(element.get(name)?)
}

fn scalar_to_f64(property: &Property) -> Option<f64> {
    match property {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// PLY property names cannot contain whitespace.
fn property_name(group_name: &str) -> String {
    group_name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Save a mesh to a PLY file (ASCII format).
///
/// Vertex positions come from the active shape key, or from the mesh itself
/// when it has no shape keys. Vertices outside a vertex group are written
/// with weight 0.
///
/// # Example
///
/// ```no_run
/// use shapekey::io::ply;
/// use shapekey::mesh::ShapeKeyMesh;
/// use nalgebra::Point3;
///
/// let mesh = ShapeKeyMesh::new(vec![Point3::origin()], vec![]).unwrap();
/// ply::save(&mesh, "output.ply").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &ShapeKeyMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let positions = mesh
        .active_shape_key()
        .map(|k| k.positions.as_slice())
        .unwrap_or_else(|| mesh.positions());
    let groups: Vec<(String, Vec<f64>)> = mesh
        .vertex_groups()
        .iter()
        .map(|g| (property_name(&g.name), g.dense_weights(mesh.num_vertices(), 0.0)))
        .collect();

    // Write header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by shapekey")?;
    if let Some(key) = mesh.active_shape_key() {
        writeln!(writer, "comment shape key {}", key.name)?;
    }
    writeln!(writer, "element vertex {}", positions.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    for (name, _) in &groups {
        writeln!(writer, "property float {}", name)?;
    }
    if mesh.num_faces() > 0 {
        writeln!(writer, "element face {}", mesh.num_faces())?;
        writeln!(writer, "property list uchar int vertex_indices")?;
    }
    writeln!(writer, "end_header")?;

    // Write vertices
    for (i, p) in positions.iter().enumerate() {
        write!(writer, "{} {} {}", p.x, p.y, p.z)?;
        for (_, weights) in &groups {
            write!(writer, " {}", weights[i])?;
        }
        writeln!(writer)?;
    }

    // Write faces
    for face in mesh.faces() {
        if face.len() > u8::MAX as usize {
            return Err(ShapeKeyError::SaveError {
                path: path.to_path_buf(),
                message: format!("face with {} vertices exceeds PLY list limit", face.len()),
            });
        }
        write!(writer, "{}", face.len())?;
        for vi in face {
            write!(writer, " {}", vi)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}
