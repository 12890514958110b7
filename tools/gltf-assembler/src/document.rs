//! Final document assembly and serialization

use std::path::Path;

use crate::error::{AssemblyError, Result};
use crate::scene::GltfBuilder;
use crate::utils::{assemble_glb, data_uri};
use gltf_json as json;
use serde::Deserialize;

pub const GLTF_VERSION: &str = "2.0";
pub const DEFAULT_GENERATOR: &str = "gltf-assembler";
const BUFFER_MIME_TYPE: &str = "application/octet-stream";

/// Document-level `asset` metadata
#[derive(Debug, Clone, PartialEq)]
pub struct AssetInfo {
    pub copyright: Option<String>,
    pub generator: String,
    /// Arbitrary named values written to `asset.extras`
    pub extras: serde_json::Map<String, serde_json::Value>,
}

impl Default for AssetInfo {
    fn default() -> Self {
        Self {
            copyright: None,
            generator: DEFAULT_GENERATOR.to_string(),
            extras: serde_json::Map::new(),
        }
    }
}

impl AssetInfo {
    fn to_json(&self) -> Result<json::Asset> {
        let extras = if self.extras.is_empty() {
            None
        } else {
            Some(serde_json::value::to_raw_value(&self.extras)?)
        };

        Ok(json::Asset {
            copyright: self.copyright.clone(),
            extensions: Default::default(),
            extras,
            generator: Some(self.generator.clone()),
            min_version: None,
            version: GLTF_VERSION.to_string(),
        })
    }
}

/// Container written by [`GltfBuilder::build`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON document, binary buffer inlined as a base64 data URI
    #[default]
    Gltf,
    /// Binary container with JSON and BIN chunks
    Glb,
}

impl OutputFormat {
    /// `.glb` selects the binary container, anything else JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("glb") => OutputFormat::Glb,
            _ => OutputFormat::Gltf,
        }
    }
}

impl GltfBuilder {
    /// Attach `asset` metadata; later calls replace earlier ones
    pub fn set_asset(
        &mut self,
        copyright: &str,
        generator: &str,
        extras: serde_json::Map<String, serde_json::Value>,
    ) -> &mut Self {
        self.asset = AssetInfo {
            copyright: Some(copyright.to_string()),
            generator: generator.to_string(),
            extras,
        };
        self
    }

    /// Replace the `asset` metadata wholesale
    pub fn set_asset_info(&mut self, asset: AssetInfo) -> &mut Self {
        self.asset = asset;
        self
    }

    pub fn asset(&self) -> &AssetInfo {
        &self.asset
    }

    /// Check every cross-reference the builder handed out
    fn check_references(&self) -> Result<()> {
        let accessor_count = self.buffer.accessors().len();
        for (index, mesh) in self.meshes.iter().enumerate() {
            mesh.check(index, accessor_count)?;
        }

        let view_count = self.buffer.views().len();
        for (index, accessor) in self.buffer.accessors().iter().enumerate() {
            if let Some(view) = accessor.buffer_view {
                if view.value() >= view_count {
                    return Err(AssemblyError::ViewOutOfRange {
                        accessor: index,
                        view: view.value(),
                        count: view_count,
                    });
                }
            }
        }

        Ok(())
    }

    /// Assemble the glTF root without writing anything.
    ///
    /// The scene lists every node in creation order. With
    /// [`OutputFormat::Gltf`] the blob is inlined as a data URI; with
    /// [`OutputFormat::Glb`] the buffer has no URI and the blob travels as
    /// the BIN chunk. An empty blob produces no buffer at all.
    pub fn to_root(&self, texture_dir: &Path, format: OutputFormat) -> Result<json::Root> {
        self.check_references()?;

        let textures = self.materials.to_json(&self.name, texture_dir)?;

        let blob = self.buffer.data();
        let buffers = if blob.is_empty() {
            Vec::new()
        } else {
            let uri = match format {
                OutputFormat::Gltf => Some(data_uri(BUFFER_MIME_TYPE, blob)),
                OutputFormat::Glb => None,
            };
            vec![json::Buffer {
                byte_length: blob.len().into(),
                extensions: Default::default(),
                extras: Default::default(),
                name: None,
                uri,
            }]
        };

        let scene = json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(self.name.clone()),
            nodes: (0..self.nodes.len() as u32).map(json::Index::new).collect(),
        };

        Ok(json::Root {
            accessors: self.buffer.accessors().to_vec(),
            animations: Vec::new(),
            asset: self.asset.to_json()?,
            buffers,
            buffer_views: self.buffer.views().to_vec(),
            cameras: Vec::new(),
            extensions: Default::default(),
            extensions_required: Vec::new(),
            extensions_used: Vec::new(),
            extras: Default::default(),
            images: textures.images,
            materials: textures.materials,
            meshes: self.meshes.iter().map(|m| m.to_json(0)).collect(),
            nodes: self.nodes.clone(),
            samplers: textures.samplers,
            scene: Some(json::Index::new(0)),
            scenes: vec![scene],
            skins: Vec::new(),
            textures: textures.textures,
        })
    }

    /// Serialize the document into the bytes of the chosen container
    pub fn to_bytes(&self, texture_dir: &Path, format: OutputFormat) -> Result<Vec<u8>> {
        let root = self.to_root(texture_dir, format)?;
        let bytes = match format {
            OutputFormat::Gltf => serde_json::to_vec_pretty(&root)?,
            OutputFormat::Glb => assemble_glb(&root, self.buffer.data())?,
        };
        Ok(bytes)
    }

    /// Write the document to `out_path`, choosing the container from its
    /// extension. Embedded images are read from `texture_dir`.
    pub fn build(self, texture_dir: &Path, out_path: &Path) -> Result<()> {
        let format = OutputFormat::from_path(out_path);
        self.build_as(texture_dir, out_path, format)
    }

    /// Like [`GltfBuilder::build`] with an explicit container
    pub fn build_as(self, texture_dir: &Path, out_path: &Path, format: OutputFormat) -> Result<()> {
        let bytes = self.to_bytes(texture_dir, format)?;
        std::fs::write(out_path, &bytes).map_err(|source| AssemblyError::Io {
            path: out_path.to_path_buf(),
            source,
        })?;

        tracing::info!(
            nodes = self.nodes.len(),
            meshes = self.meshes.len(),
            blob = self.buffer.len(),
            "wrote {:?} ({} bytes)",
            out_path,
            bytes.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::AccessorIndex;
    use crate::material::ImageMode;
    use crate::mesh::MeshRecord;

    fn triangle_builder() -> GltfBuilder {
        let mut builder = GltfBuilder::new("Triangle");
        builder
            .set_image("atlas", ImageMode::External)
            .set_material("Atlas")
            .create_mesh("tri", [0.0; 3])
            .set_vertices(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
            .unwrap()
            .set_normals(&[[0.0, 0.0, 1.0]; 3])
            .unwrap()
            .set_texcoords(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]])
            .unwrap()
            .set_indices(&[[0, 1, 2]])
            .unwrap();
        builder
    }

    #[test]
    fn test_single_node_document() {
        let mut builder = GltfBuilder::new("Markers");
        builder.create_node("marker", [0.0; 3]);

        let root = builder.to_root(Path::new("."), OutputFormat::Gltf).unwrap();
        assert_eq!(root.scenes.len(), 1);
        assert_eq!(root.scenes[0].nodes.len(), 1);
        assert!(root.nodes[0].mesh.is_none());
        assert!(root.meshes.is_empty());
        assert!(root.buffers.is_empty());
        assert!(root.buffer_views.is_empty());
        assert!(root.images.is_empty());
        assert!(root.samplers.is_empty());
        assert!(root.textures.is_empty());
        assert_eq!(root.materials.len(), 1);
        assert_eq!(root.materials[0].name.as_deref(), Some("Markers"));
        assert_eq!(root.scene.map(|s| s.value()), Some(0));
    }

    #[test]
    fn test_scene_lists_nodes_in_order() {
        let mut builder = triangle_builder();
        builder.create_node("b", [0.0; 3]).create_node("c", [0.0; 3]);

        let root = builder.to_root(Path::new("."), OutputFormat::Gltf).unwrap();
        let order: Vec<usize> = root.scenes[0].nodes.iter().map(|n| n.value()).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(root.scenes[0].name.as_deref(), Some("Triangle"));
    }

    #[test]
    fn test_buffer_inlined_as_data_uri() {
        let builder = triangle_builder();
        let root = builder.to_root(Path::new("."), OutputFormat::Gltf).unwrap();

        assert_eq!(root.buffers.len(), 1);
        assert_eq!(root.buffers[0].byte_length.0, builder.buffer().len() as u64);
        let uri = root.buffers[0].uri.as_deref().unwrap();
        assert!(uri.starts_with("data:application/octet-stream;base64,"));

        let glb_root = builder.to_root(Path::new("."), OutputFormat::Glb).unwrap();
        assert!(glb_root.buffers[0].uri.is_none());
    }

    #[test]
    fn test_asset_metadata() {
        let mut extras = serde_json::Map::new();
        extras.insert("meshId".to_string(), serde_json::json!(3));
        extras.insert("hasMesh".to_string(), serde_json::json!(true));

        let mut builder = triangle_builder();
        builder.set_asset("converted by someone", "kompass", extras);

        let root = builder.to_root(Path::new("."), OutputFormat::Gltf).unwrap();
        assert_eq!(root.asset.version, "2.0");
        assert_eq!(root.asset.copyright.as_deref(), Some("converted by someone"));
        assert_eq!(root.asset.generator.as_deref(), Some("kompass"));

        let extras: serde_json::Value =
            serde_json::from_str(root.asset.extras.as_ref().unwrap().get()).unwrap();
        assert_eq!(extras["meshId"], 3);
        assert_eq!(extras["hasMesh"], true);
    }

    #[test]
    fn test_default_asset() {
        let builder = triangle_builder();
        let root = builder.to_root(Path::new("."), OutputFormat::Gltf).unwrap();
        assert_eq!(root.asset.generator.as_deref(), Some(DEFAULT_GENERATOR));
        assert!(root.asset.copyright.is_none());
        assert!(root.asset.extras.is_none());
    }

    #[test]
    fn test_dangling_accessor_rejected() {
        let mut builder = triangle_builder();
        let mut broken = MeshRecord::new("broken");
        broken.accessors.positions = Some(AccessorIndex(42));
        builder.meshes.push(broken);

        match builder.to_root(Path::new("."), OutputFormat::Gltf) {
            Err(AssemblyError::AccessorOutOfRange { mesh, accessor, count }) => {
                assert_eq!((mesh, accessor, count), (1, 42, 4));
            }
            other => panic!("expected AccessorOutOfRange, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_output_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("a/b.glb")), OutputFormat::Glb);
        assert_eq!(OutputFormat::from_path(Path::new("a/b.GLB")), OutputFormat::Glb);
        assert_eq!(OutputFormat::from_path(Path::new("a/b.gltf")), OutputFormat::Gltf);
        assert_eq!(OutputFormat::from_path(Path::new("noext")), OutputFormat::Gltf);
    }
}
