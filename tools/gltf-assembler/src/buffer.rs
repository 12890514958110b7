//! Append-only binary blob with buffer view and accessor bookkeeping

use crate::geometry::{Face, Vec2, Vec3};
use crate::utils::{as_bytes, compute_bounds, Bounds};
use gltf_json as json;
use gltf_json::accessor::{ComponentType, Type};
use gltf_json::validation::Checked::Valid;

/// Accessor index returned by buffer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccessorIndex(pub u32);

impl AccessorIndex {
    pub fn as_json_index(&self) -> json::Index<json::Accessor> {
        json::Index::new(self.0)
    }

    pub fn value(&self) -> usize {
        self.0 as usize
    }
}

/// The single binary blob of a document and the views/accessors into it.
///
/// Every record appends at the current end of the blob. Nothing is ever
/// removed, so issued accessor indices stay valid.
#[derive(Debug, Default)]
pub struct BufferBuilder {
    buffer: Vec<u8>,
    views: Vec<json::buffer::View>,
    accessors: Vec<json::Accessor>,
}

impl BufferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current accessor count
    pub fn accessor_count(&self) -> u32 {
        self.accessors.len() as u32
    }

    /// Get the binary buffer data
    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Get the buffer views
    pub fn views(&self) -> &[json::buffer::View] {
        &self.views
    }

    /// Get the accessors
    pub fn accessors(&self) -> &[json::Accessor] {
        &self.accessors
    }

    /// Append `data` to the blob and register a view plus an accessor over it.
    ///
    /// `count` is the number of elements of `type_`, not bytes; the caller
    /// keeps it consistent with `data.len()`.
    pub fn record(
        &mut self,
        data: &[u8],
        type_: Type,
        component_type: ComponentType,
        count: usize,
        bounds: Option<Bounds>,
    ) -> AccessorIndex {
        let offset = self.buffer.len();
        self.buffer.extend_from_slice(data);

        let view_idx = self.views.len() as u32;
        self.views.push(json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: data.len().into(),
            byte_offset: Some((offset as u64).into()),
            byte_stride: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            target: None,
        });

        let (min, max) = match bounds.as_ref().map(Bounds::to_json) {
            Some((min, max)) => (Some(min), Some(max)),
            None => (None, None),
        };

        let accessor_idx = self.accessors.len() as u32;
        self.accessors.push(json::Accessor {
            buffer_view: Some(json::Index::new(view_idx)),
            byte_offset: Some(0u64.into()),
            count: count.into(),
            component_type: Valid(json::accessor::GenericComponentType(component_type)),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(type_),
            min,
            max,
            name: None,
            normalized: false,
            sparse: None,
        });

        tracing::debug!(
            accessor = accessor_idx,
            view = view_idx,
            offset,
            length = data.len(),
            count,
            "recorded {:?} accessor",
            type_
        );

        AccessorIndex(accessor_idx)
    }

    /// Pack Vec3 positions with bounds calculation
    pub fn pack_positions(&mut self, positions: &[Vec3]) -> Option<AccessorIndex> {
        let bounds = compute_bounds(positions)?;
        Some(self.record(
            as_bytes(positions),
            Type::Vec3,
            ComponentType::F32,
            positions.len(),
            Some(bounds),
        ))
    }

    /// Pack Vec3 data without bounds (normals)
    pub fn pack_vec3(&mut self, data: &[Vec3]) -> Option<AccessorIndex> {
        if data.is_empty() {
            return None;
        }
        Some(self.record(as_bytes(data), Type::Vec3, ComponentType::F32, data.len(), None))
    }

    /// Pack Vec2 data (texture coordinates)
    pub fn pack_vec2(&mut self, data: &[Vec2]) -> Option<AccessorIndex> {
        if data.is_empty() {
            return None;
        }
        Some(self.record(as_bytes(data), Type::Vec2, ComponentType::F32, data.len(), None))
    }

    /// Pack triangles as a flat list of u32 scalar indices
    pub fn pack_faces(&mut self, faces: &[Face]) -> Option<AccessorIndex> {
        if faces.is_empty() {
            return None;
        }
        Some(self.record(
            as_bytes(faces),
            Type::Scalar,
            ComponentType::U32,
            faces.len() * 3,
            None,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_range(builder: &BufferBuilder, index: usize) -> (u64, u64) {
        let view = &builder.views()[index];
        let offset = view.byte_offset.map(|o| o.0).unwrap_or(0);
        (offset, view.byte_length.0)
    }

    #[test]
    fn test_buffer_builder_positions() {
        let mut builder = BufferBuilder::new();
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]];
        let idx = builder.pack_positions(&positions);

        assert_eq!(idx, Some(AccessorIndex(0)));
        assert_eq!(builder.accessor_count(), 1);
        assert_eq!(builder.views().len(), 1);
        // 3 positions * 12 bytes
        assert_eq!(builder.data().len(), 36);

        let accessor = &builder.accessors()[0];
        assert_eq!(accessor.count.0, 3);
        assert_eq!(accessor.min, Some(serde_json::json!([0.0, 0.0, 0.0])));
        assert_eq!(accessor.max, Some(serde_json::json!([1.0, 1.0, 0.0])));
    }

    #[test]
    fn test_buffer_builder_faces() {
        let mut builder = BufferBuilder::new();
        let idx = builder.pack_faces(&[[0, 1, 2], [2, 1, 3]]).unwrap();

        let accessor = &builder.accessors()[idx.value()];
        assert_eq!(accessor.count.0, 6);
        assert_eq!(accessor.type_, Valid(Type::Scalar));
        assert!(matches!(
            accessor.component_type,
            Valid(json::accessor::GenericComponentType(ComponentType::U32))
        ));
        assert!(accessor.min.is_none());
        // 2 faces * 3 indices * 4 bytes
        assert_eq!(builder.data().len(), 24);
    }

    #[test]
    fn test_records_are_contiguous() {
        let mut builder = BufferBuilder::new();
        builder.pack_positions(&[[0.0; 3]; 4]);
        builder.pack_vec2(&[[0.0; 2]; 4]);
        builder.pack_faces(&[[0, 1, 2]]);
        builder.pack_vec3(&[[0.0, 1.0, 0.0]; 4]);

        let mut expected_offset = 0;
        for i in 0..builder.views().len() {
            let (offset, length) = view_range(&builder, i);
            assert_eq!(offset, expected_offset);
            expected_offset = offset + length;
        }
        assert_eq!(expected_offset, builder.len() as u64);
        assert_eq!(builder.len(), 48 + 32 + 12 + 48);
    }

    #[test]
    fn test_empty_input_records_nothing() {
        let mut builder = BufferBuilder::new();
        assert_eq!(builder.pack_positions(&[]), None);
        assert_eq!(builder.pack_vec3(&[]), None);
        assert_eq!(builder.pack_vec2(&[]), None);
        assert_eq!(builder.pack_faces(&[]), None);

        assert!(builder.is_empty());
        assert!(builder.views().is_empty());
        assert_eq!(builder.accessor_count(), 0);
    }

    #[test]
    fn test_record_accessor_points_at_new_view() {
        let mut builder = BufferBuilder::new();
        builder.record(&[0; 8], Type::Vec2, ComponentType::F32, 1, None);
        let idx = builder.record(&[0; 4], Type::Scalar, ComponentType::U32, 1, None);

        let accessor = &builder.accessors()[idx.value()];
        assert_eq!(accessor.buffer_view.map(|v| v.value()), Some(1));
        assert_eq!(view_range(&builder, 1), (8, 4));
    }
}
