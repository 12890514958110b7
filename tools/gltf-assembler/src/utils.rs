//! Byte encoding, bounds and container helpers

use gltf_json as json;

/// glTF binary chunk type for JSON ("JSON" little-endian)
pub const GLB_CHUNK_JSON: u32 = 0x4E4F534A;
/// glTF binary chunk type for the binary buffer ("BIN\0" little-endian)
pub const GLB_CHUNK_BIN: u32 = 0x004E4942;

const GLB_HEADER_LEN: usize = 12;
const GLB_CHUNK_HEADER_LEN: usize = 8;

/// Per-component minimum and maximum over a tuple sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub min: Vec<f32>,
    pub max: Vec<f32>,
}

impl Bounds {
    pub(crate) fn to_json(&self) -> (json::Value, json::Value) {
        (
            json::Value::Array(self.min.iter().copied().map(json::Value::from).collect()),
            json::Value::Array(self.max.iter().copied().map(json::Value::from).collect()),
        )
    }
}

/// View a slice of plain tuples as raw bytes, tuple-major, no padding.
///
/// glTF buffers are little-endian; this relies on a little-endian host.
pub fn as_bytes<T: bytemuck::Pod>(items: &[T]) -> &[u8] {
    bytemuck::cast_slice(items)
}

/// Compute per-component bounds, or `None` for an empty sequence
pub fn compute_bounds<const N: usize>(items: &[[f32; N]]) -> Option<Bounds> {
    let (first, rest) = items.split_first()?;
    let mut min = *first;
    let mut max = *first;

    for item in rest {
        for i in 0..N {
            min[i] = min[i].min(item[i]);
            max[i] = max[i].max(item[i]);
        }
    }

    Some(Bounds {
        min: min.to_vec(),
        max: max.to_vec(),
    })
}

/// Encode bytes as a base64 `data:` URI
pub fn data_uri(mime_type: &str, data: &[u8]) -> String {
    let encoded = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, data);
    format!("data:{};base64,{}", mime_type, encoded)
}

/// Assemble GLB binary from JSON and buffer data.
///
/// The BIN chunk is omitted when `buffer_data` is empty.
pub fn assemble_glb(root: &json::Root, buffer_data: &[u8]) -> serde_json::Result<Vec<u8>> {
    let json_string = json::serialize::to_string(root)?;
    let json_bytes = json_string.as_bytes();

    let json_padding = padding(json_bytes.len());
    let json_chunk_length = json_bytes.len() + json_padding;

    let buffer_padding = padding(buffer_data.len());
    let buffer_chunk_length = buffer_data.len() + buffer_padding;

    let mut total_length = GLB_HEADER_LEN + GLB_CHUNK_HEADER_LEN + json_chunk_length;
    if !buffer_data.is_empty() {
        total_length += GLB_CHUNK_HEADER_LEN + buffer_chunk_length;
    }

    let mut glb = Vec::with_capacity(total_length);

    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&GLB_CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(json_bytes);
    glb.resize(glb.len() + json_padding, b' ');

    if !buffer_data.is_empty() {
        glb.extend_from_slice(&(buffer_chunk_length as u32).to_le_bytes());
        glb.extend_from_slice(&GLB_CHUNK_BIN.to_le_bytes());
        glb.extend_from_slice(buffer_data);
        glb.resize(glb.len() + buffer_padding, 0);
    }

    Ok(glb)
}

fn padding(len: usize) -> usize {
    (4 - (len % 4)) % 4
}
