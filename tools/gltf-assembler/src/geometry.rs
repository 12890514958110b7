//! Geometry records handed over by the asset parser
//!
//! A [`Geometry`] is one parsed entry: columnar vertex attributes plus triangle
//! faces. The assembler consumes these as-is; [`Geometry::validate`] is available
//! to callers that want to reject malformed input before assembly.

/// Vertex position or normal
pub type Vec3 = [f32; 3];

/// Texture coordinate
pub type Vec2 = [f32; 2];

/// Triangle as three vertex indices (a, b, c)
pub type Face = [u32; 3];

/// Axis-aligned normals referenced by index in the source asset format
/// (0..=5 maps to -X, -Y, -Z, +X, +Y, +Z).
pub const AXIS_NORMALS: [Vec3; 6] = [
    [-1.0, 0.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, -1.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];

/// Look up an axis normal by its source-format index
pub fn axis_normal(index: usize) -> Option<Vec3> {
    AXIS_NORMALS.get(index).copied()
}

/// Validation failures reported by [`Geometry::validate`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("'{name}': {attribute} count {count} does not match vertex count {vertices}")]
    CountMismatch {
        name: String,
        attribute: &'static str,
        count: usize,
        vertices: usize,
    },

    #[error("'{name}': face {face} references vertex {index}, but only {vertices} vertices exist")]
    IndexOutOfRange {
        name: String,
        face: usize,
        index: u32,
        vertices: usize,
    },

    #[error("'{name}': has {faces} faces but no vertices")]
    FacesWithoutVertices { name: String, faces: usize },
}

/// One parsed geometry entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub name: String,
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
    pub faces: Vec<Face>,
}

impl Geometry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// True when the entry carries no vertices and should become a plain node
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of scalar indices the faces flatten to
    pub fn index_count(&self) -> usize {
        self.faces.len() * 3
    }

    /// Check attribute counts and index ranges.
    ///
    /// Normals and texcoords may be empty (the attribute is then omitted);
    /// otherwise they must match the vertex count.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let vertices = self.vertices.len();

        if vertices == 0 {
            if !self.faces.is_empty() {
                return Err(GeometryError::FacesWithoutVertices {
                    name: self.name.clone(),
                    faces: self.faces.len(),
                });
            }
            return Ok(());
        }

        for (attribute, count) in [
            ("normal", self.normals.len()),
            ("texcoord", self.texcoords.len()),
        ] {
            if count != 0 && count != vertices {
                return Err(GeometryError::CountMismatch {
                    name: self.name.clone(),
                    attribute,
                    count,
                    vertices,
                });
            }
        }

        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices) {
                return Err(GeometryError::IndexOutOfRange {
                    name: self.name.clone(),
                    face,
                    index,
                    vertices,
                });
            }
        }

        Ok(())
    }
}
