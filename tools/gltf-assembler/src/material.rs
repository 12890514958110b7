//! The document's single material, texture, sampler and image

use std::path::Path;

use crate::error::{AssemblyError, Result};
use crate::utils::data_uri;
use gltf_json as json;
use gltf_json::validation::Checked::Valid;

pub const IMAGE_MIME_TYPE: &str = "image/png";
const IMAGE_EXTENSION: &str = "png";

/// How the image ends up in the written document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageMode {
    /// Relative `name.png` reference resolved next to the document at load time
    #[default]
    External,
    /// PNG bytes inlined as a base64 data URI
    Embedded,
}

impl ImageMode {
    pub fn from_embed(embed: bool) -> Self {
        if embed {
            ImageMode::Embedded
        } else {
            ImageMode::External
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ImageSource {
    name: String,
    mode: ImageMode,
}

/// Holds at most one image and one material; setters overwrite
#[derive(Debug, Clone, Default)]
pub struct MaterialSet {
    image: Option<ImageSource>,
    material_name: Option<String>,
}

/// glTF records produced from a [`MaterialSet`]
#[derive(Debug, Clone)]
pub struct TextureSet {
    pub images: Vec<json::Image>,
    pub samplers: Vec<json::texture::Sampler>,
    pub textures: Vec<json::Texture>,
    pub materials: Vec<json::Material>,
}

impl MaterialSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the image base name (without extension) and how to encode it
    pub fn set_image(&mut self, name: impl Into<String>, mode: ImageMode) {
        self.image = Some(ImageSource {
            name: name.into(),
            mode,
        });
    }

    pub fn set_material(&mut self, name: impl Into<String>) {
        self.material_name = Some(name.into());
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn image_mode(&self) -> Option<ImageMode> {
        self.image.as_ref().map(|i| i.mode)
    }

    /// File name of the image, e.g. `tiles.png`
    pub fn image_file_name(&self) -> Option<String> {
        self.image
            .as_ref()
            .map(|i| format!("{}.{}", i.name, IMAGE_EXTENSION))
    }

    /// Resolve the image URI according to the embedding mode.
    ///
    /// Embedded mode reads `texture_dir/name.png`; external mode never touches
    /// the filesystem.
    fn image_uri(&self, texture_dir: &Path) -> Result<Option<String>> {
        let (Some(image), Some(file_name)) = (&self.image, self.image_file_name()) else {
            return Ok(None);
        };

        match image.mode {
            ImageMode::External => Ok(Some(file_name)),
            ImageMode::Embedded => {
                let path = texture_dir.join(&file_name);
                if !path.is_file() {
                    return Err(AssemblyError::MissingImage { path });
                }
                let bytes = std::fs::read(&path)
                    .map_err(|source| AssemblyError::Io { path: path.clone(), source })?;
                tracing::debug!("embedding {} ({} bytes)", path.display(), bytes.len());
                Ok(Some(data_uri(IMAGE_MIME_TYPE, &bytes)))
            }
        }
    }

    /// Produce the image/sampler/texture/material records.
    ///
    /// A material is always emitted because every mesh primitive points at
    /// material 0. Texture, sampler and image only exist once an image is set.
    pub fn to_json(&self, fallback_name: &str, texture_dir: &Path) -> Result<TextureSet> {
        let mut set = TextureSet {
            images: Vec::new(),
            samplers: Vec::new(),
            textures: Vec::new(),
            materials: Vec::new(),
        };

        if let Some(uri) = self.image_uri(texture_dir)? {
            set.images.push(json::Image {
                buffer_view: None,
                mime_type: Some(json::image::MimeType(IMAGE_MIME_TYPE.to_string())),
                name: None,
                uri: Some(uri),
                extensions: Default::default(),
                extras: Default::default(),
            });
            set.samplers.push(json::texture::Sampler {
                mag_filter: Some(Valid(json::texture::MagFilter::Nearest)),
                min_filter: Some(Valid(json::texture::MinFilter::NearestMipmapNearest)),
                name: None,
                wrap_s: Valid(json::texture::WrappingMode::Repeat),
                wrap_t: Valid(json::texture::WrappingMode::Repeat),
                extensions: Default::default(),
                extras: Default::default(),
            });
            set.textures.push(json::Texture {
                name: None,
                sampler: Some(json::Index::new(0)),
                source: json::Index::new(0),
                extensions: Default::default(),
                extras: Default::default(),
            });
        }

        let base_color_texture = self.has_image().then(|| json::texture::Info {
            index: json::Index::new(0),
            tex_coord: 0,
            extensions: Default::default(),
            extras: Default::default(),
        });

        let name = self.material_name.as_deref().unwrap_or(fallback_name);
        set.materials.push(json::Material {
            alpha_cutoff: None,
            alpha_mode: Valid(json::material::AlphaMode::Opaque),
            double_sided: true,
            name: Some(name.to_string()),
            pbr_metallic_roughness: json::material::PbrMetallicRoughness {
                base_color_factor: json::material::PbrBaseColorFactor([1.0, 1.0, 1.0, 1.0]),
                base_color_texture,
                metallic_factor: json::material::StrengthFactor(0.0),
                roughness_factor: json::material::StrengthFactor(1.0),
                metallic_roughness_texture: None,
                extensions: Default::default(),
                extras: Default::default(),
            },
            normal_texture: None,
            occlusion_texture: None,
            emissive_texture: None,
            emissive_factor: json::material::EmissiveFactor([0.0, 0.0, 0.0]),
            extensions: Default::default(),
            extras: Default::default(),
        });

        Ok(set)
    }
}
