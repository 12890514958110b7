//! Mesh records and their single primitive

use std::collections::BTreeMap;

use crate::buffer::AccessorIndex;
use crate::error::{AssemblyError, Result};
use gltf_json as json;
use gltf_json::validation::Checked::Valid;

/// Mesh index, equal to the mesh's creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeshIndex(pub u32);

impl MeshIndex {
    pub fn as_json_index(&self) -> json::Index<json::Mesh> {
        json::Index::new(self.0)
    }
}

/// Accessor slots of a mesh primitive; `None` means unset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshAccessors {
    pub positions: Option<AccessorIndex>,
    pub normals: Option<AccessorIndex>,
    pub texcoords: Option<AccessorIndex>,
    pub indices: Option<AccessorIndex>,
}

impl MeshAccessors {
    fn iter(&self) -> impl Iterator<Item = AccessorIndex> + '_ {
        [self.positions, self.normals, self.texcoords, self.indices]
            .into_iter()
            .flatten()
    }
}

/// A mesh under construction: a name plus one triangle primitive
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRecord {
    pub name: String,
    pub accessors: MeshAccessors,
}

impl MeshRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accessors: MeshAccessors::default(),
        }
    }

    /// Fail if any slot points at an accessor that was never recorded
    pub(crate) fn check(&self, mesh: usize, accessor_count: usize) -> Result<()> {
        match self.accessors.iter().find(|a| a.value() >= accessor_count) {
            Some(accessor) => Err(AssemblyError::AccessorOutOfRange {
                mesh,
                accessor: accessor.value(),
                count: accessor_count,
            }),
            None => Ok(()),
        }
    }

    /// Convert to a glTF mesh; unset attribute slots are omitted
    pub fn to_json(&self, material: u32) -> json::Mesh {
        let mut attributes = BTreeMap::new();

        let slots = [
            (json::mesh::Semantic::Positions, self.accessors.positions),
            (json::mesh::Semantic::Normals, self.accessors.normals),
            (json::mesh::Semantic::TexCoords(0), self.accessors.texcoords),
        ];
        for (semantic, accessor) in slots {
            if let Some(accessor) = accessor {
                attributes.insert(Valid(semantic), accessor.as_json_index());
            }
        }

        let primitive = json::mesh::Primitive {
            attributes,
            extensions: Default::default(),
            extras: Default::default(),
            indices: self.accessors.indices.map(|i| i.as_json_index()),
            material: Some(json::Index::new(material)),
            mode: Valid(json::mesh::Mode::Triangles),
            targets: None,
        };

        json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(self.name.clone()),
            primitives: vec![primitive],
            weights: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_omits_unset_slots() {
        let mut record = MeshRecord::new("Crate");
        record.accessors.positions = Some(AccessorIndex(0));
        record.accessors.indices = Some(AccessorIndex(1));

        let mesh = record.to_json(0);
        let primitive = &mesh.primitives[0];

        assert_eq!(mesh.name.as_deref(), Some("Crate"));
        assert_eq!(primitive.attributes.len(), 1);
        assert!(primitive
            .attributes
            .contains_key(&Valid(json::mesh::Semantic::Positions)));
        assert_eq!(primitive.indices.map(|i| i.value()), Some(1));
        assert_eq!(primitive.material.map(|m| m.value()), Some(0));
    }

    #[test]
    fn test_check_rejects_unknown_accessor() {
        let mut record = MeshRecord::new("Crate");
        record.accessors.positions = Some(AccessorIndex(0));
        record.accessors.normals = Some(AccessorIndex(5));

        assert!(record.check(0, 6).is_ok());
        match record.check(3, 2) {
            Err(AssemblyError::AccessorOutOfRange {
                mesh,
                accessor,
                count,
            }) => {
                assert_eq!((mesh, accessor, count), (3, 5, 2));
            }
            other => panic!("expected out of range error, got {:?}", other),
        }
    }
}
