//! Incremental scene construction
//!
//! [`GltfBuilder`] collects nodes and meshes in creation order. Attribute
//! setters always target the most recently created mesh, tracked explicitly
//! in `current_mesh`, so one geometry entry reads as a single chain:
//!
//! ```
//! use gltf_assembler::GltfBuilder;
//!
//! # fn main() -> gltf_assembler::Result<()> {
//! let mut builder = GltfBuilder::new("Triangle");
//! builder
//!     .create_mesh("tri", [0.0; 3])
//!     .set_vertices(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])?
//!     .set_indices(&[[0, 1, 2]])?;
//!
//! assert_eq!(builder.meshes().len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::buffer::{AccessorIndex, BufferBuilder};
use crate::document::AssetInfo;
use crate::error::{AssemblyError, Result};
use crate::geometry::{Face, Geometry, Vec2, Vec3};
use crate::material::{ImageMode, MaterialSet};
use crate::mesh::{MeshAccessors, MeshIndex, MeshRecord};
use gltf_json as json;

/// Node index, equal to the node's creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(pub u32);

/// Builder for a single glTF document
#[derive(Debug)]
pub struct GltfBuilder {
    pub(crate) name: String,
    pub(crate) buffer: BufferBuilder,
    pub(crate) nodes: Vec<json::Node>,
    pub(crate) meshes: Vec<MeshRecord>,
    pub(crate) current_mesh: Option<MeshIndex>,
    pub(crate) materials: MaterialSet,
    pub(crate) asset: AssetInfo,
}

impl GltfBuilder {
    /// Create an empty builder; `name` becomes the scene name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buffer: BufferBuilder::new(),
            nodes: Vec::new(),
            meshes: Vec::new(),
            current_mesh: None,
            materials: MaterialSet::new(),
            asset: AssetInfo::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared binary blob and its views/accessors
    pub fn buffer(&self) -> &BufferBuilder {
        &self.buffer
    }

    pub fn nodes(&self) -> &[json::Node] {
        &self.nodes
    }

    pub fn meshes(&self) -> &[MeshRecord] {
        &self.meshes
    }

    /// The mesh attribute setters currently write to
    pub fn current_mesh(&self) -> Option<MeshIndex> {
        self.current_mesh
    }

    pub fn materials(&self) -> &MaterialSet {
        &self.materials
    }

    /// Append a plain node without a mesh
    pub fn create_node(&mut self, name: &str, translation: Vec3) -> &mut Self {
        self.push_node(name, None, translation);
        self
    }

    /// Append an empty mesh plus a node referencing it; the mesh becomes current
    pub fn create_mesh(&mut self, name: &str, translation: Vec3) -> &mut Self {
        let mesh = MeshIndex(self.meshes.len() as u32);
        self.meshes.push(MeshRecord::new(name));
        self.push_node(name, Some(mesh), translation);
        self.current_mesh = Some(mesh);
        self
    }

    /// Record positions (with bounds) into the current mesh
    pub fn set_vertices(&mut self, vertices: &[Vec3]) -> Result<&mut Self> {
        let mut slots = self.open_mesh("set_vertices")?;
        slots.positions = self.buffer.pack_positions(vertices).or(slots.positions);
        self.store(slots);
        Ok(self)
    }

    /// Record normals into the current mesh
    pub fn set_normals(&mut self, normals: &[Vec3]) -> Result<&mut Self> {
        let mut slots = self.open_mesh("set_normals")?;
        slots.normals = self.buffer.pack_vec3(normals).or(slots.normals);
        self.store(slots);
        Ok(self)
    }

    /// Record texture coordinates into the current mesh
    pub fn set_texcoords(&mut self, texcoords: &[Vec2]) -> Result<&mut Self> {
        let mut slots = self.open_mesh("set_texcoords")?;
        slots.texcoords = self.buffer.pack_vec2(texcoords).or(slots.texcoords);
        self.store(slots);
        Ok(self)
    }

    /// Record triangle indices into the current mesh as flat u32 scalars
    pub fn set_indices(&mut self, faces: &[Face]) -> Result<&mut Self> {
        let mut slots = self.open_mesh("set_indices")?;
        slots.indices = self.buffer.pack_faces(faces).or(slots.indices);
        self.store(slots);
        Ok(self)
    }

    /// Add one parsed entry: a plain node when it has no vertices, otherwise
    /// a mesh with all four attributes.
    pub fn add_geometry(&mut self, geometry: &Geometry, translation: Vec3) -> Result<&mut Self> {
        if geometry.is_empty() {
            return Ok(self.create_node(&geometry.name, translation));
        }

        self.create_mesh(&geometry.name, translation)
            .set_vertices(&geometry.vertices)?
            .set_normals(&geometry.normals)?
            .set_texcoords(&geometry.texcoords)?
            .set_indices(&geometry.faces)
    }

    /// [`GltfBuilder::add_geometry`] after [`Geometry::validate`]; invalid
    /// entries are rejected before anything is recorded.
    pub fn add_checked_geometry(
        &mut self,
        geometry: &Geometry,
        translation: Vec3,
    ) -> Result<&mut Self> {
        if let Err(err) = geometry.validate() {
            tracing::warn!("rejecting geometry: {}", err);
            return Err(err.into());
        }
        self.add_geometry(geometry, translation)
    }

    /// Set the texture image; see [`MaterialSet::set_image`]
    pub fn set_image(&mut self, name: &str, mode: ImageMode) -> &mut Self {
        self.materials.set_image(name, mode);
        self
    }

    /// Set the shared material's name
    pub fn set_material(&mut self, name: &str) -> &mut Self {
        self.materials.set_material(name);
        self
    }

    fn push_node(&mut self, name: &str, mesh: Option<MeshIndex>, translation: Vec3) {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(json::Node {
            camera: None,
            children: None,
            extensions: Default::default(),
            extras: Default::default(),
            matrix: None,
            mesh: mesh.map(|m| m.as_json_index()),
            name: Some(name.to_string()),
            rotation: None,
            scale: None,
            skin: None,
            translation: Some(translation),
            weights: None,
        });
        tracing::debug!(node = index.0, mesh = ?mesh.map(|m| m.0), "created node '{}'", name);
    }

    /// Copy out the current mesh's slots, failing before the blob is touched
    fn open_mesh(&self, operation: &'static str) -> Result<MeshAccessors> {
        self.current_mesh
            .and_then(|m| self.meshes.get(m.0 as usize))
            .map(|m| m.accessors)
            .ok_or(AssemblyError::NoOpenMesh { operation })
    }

    fn store(&mut self, slots: MeshAccessors) {
        if let Some(mesh) = self
            .current_mesh
            .and_then(|m| self.meshes.get_mut(m.0 as usize))
        {
            mesh.accessors = slots;
        }
    }

    /// Accessor slots of the current mesh, if any
    pub fn current_accessors(&self) -> Option<&MeshAccessors> {
        self.current_mesh
            .and_then(|m| self.meshes.get(m.0 as usize))
            .map(|m| &m.accessors)
    }

    /// Accessor index of the current mesh's positions, if recorded
    pub fn current_positions(&self) -> Option<AccessorIndex> {
        self.current_accessors().and_then(|a| a.positions)
    }
}
