//! glTF 2.0 document assembly for converted game assets
//!
//! Takes parsed geometry (positions, normals, texture coordinates, triangle
//! faces) plus placement data and produces one glTF document:
//! - BufferBuilder: the single append-only binary blob with its views and accessors
//! - GltfBuilder: nodes and meshes in creation order, attribute setters on the current mesh
//! - MaterialSet: the one material/texture/sampler/image of a document
//! - GridLayout: placement of many meshes on a grid
//! - ExportSettings: TOML-driven output and asset options
//!
//! # Example
//!
//! ```no_run
//! use gltf_assembler::*;
//! use std::path::Path;
//!
//! # fn main() -> gltf_assembler::Result<()> {
//! let mut builder = GltfBuilder::new("Triangle");
//! builder
//!     .set_image("atlas", ImageMode::Embedded)
//!     .set_material("Atlas")
//!     .create_mesh("tri", [0.0, 0.0, 0.0])
//!     .set_vertices(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])?
//!     .set_normals(&[[0.0, 0.0, 1.0]; 3])?
//!     .set_texcoords(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]])?
//!     .set_indices(&[[0, 1, 2]])?;
//!
//! builder
//!     .set_asset("converted by someone", "kompass", Default::default())
//!     .create_node("spawn", [0.0, 1.0, 0.0]);
//!
//! // Reads textures/atlas.png and writes a self-contained document
//! builder.build(Path::new("textures"), Path::new("triangle.gltf"))?;
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod utils;

pub use buffer::{AccessorIndex, BufferBuilder};
pub use config::{load_settings, ExportSettings};
pub use document::{AssetInfo, OutputFormat};
pub use error::{AssemblyError, Result};
pub use geometry::{Face, Geometry, GeometryError, Vec2, Vec3};
pub use layout::GridLayout;
pub use material::{ImageMode, MaterialSet};
pub use mesh::{MeshAccessors, MeshIndex, MeshRecord};
pub use scene::{GltfBuilder, NodeIndex};
pub use utils::{assemble_glb, compute_bounds, Bounds};

// Re-export commonly used gltf-json types
pub use gltf_json as json;
