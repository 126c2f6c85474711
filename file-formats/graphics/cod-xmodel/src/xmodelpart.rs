//! Skeletons (`xmodelparts`): bone hierarchy with bind pose transforms.
//!
//! Bones are stored roots first. Every non-root bone names a parent with a
//! lower index, so world transforms resolve in a single forward pass.

use byteorder::{LittleEndian, ReadBytesExt};
use cod_data::io_ext::CodReadExt;
use cod_data::types::{Quaternion, Vec3};
use cod_data::version::{ModelType, ModelVersion};
use log::{debug, trace};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::error::{Result, XModelError};
use crate::file_stem;
use crate::viewhands::{ViewhandTable, viewhand_position, viewhand_table};
use crate::xmodel::read_model_version;

/// Per-version bone name layout
#[derive(Debug, Clone, Copy)]
pub struct SkeletonLayout {
    /// Bytes skipped after each bone name
    pub name_padding: u64,
    /// Post-name padding for view-hands parts.
    ///
    /// Every file seen so far uses the same span as other parts; kept
    /// separate until a wider corpus confirms it.
    pub viewhands_name_padding: u64,
    pub viewhands: Option<&'static ViewhandTable>,
}

impl SkeletonLayout {
    pub fn for_version(version: ModelVersion) -> Self {
        let (name_padding, viewhands_name_padding) = match version {
            ModelVersion::V14 => (24, 24),
            ModelVersion::V20 | ModelVersion::V25 => (0, 0),
        };
        Self {
            name_padding,
            viewhands_name_padding,
            viewhands: viewhand_table(version),
        }
    }

    pub fn name_padding_for(&self, model_type: ModelType) -> u64 {
        if model_type.is_viewhands() {
            self.viewhands_name_padding
        } else {
            self.name_padding
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct BoneTransform {
    pub position: Vec3,
    pub rotation: Quaternion,
}

impl BoneTransform {
    /// Composes a parent's world transform with a child's local one.
    pub fn compose(&self, local: &Self) -> Self {
        Self {
            position: self.position + self.rotation.rotate(local.position),
            rotation: self.rotation * local.rotation,
        }
    }

    /// Moves a bind-space point into this bone's frame.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation.rotate(point) + self.position
    }

    pub fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation.rotate(direction)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Bone {
    pub name: String,
    /// `None` for root bones
    pub parent: Option<usize>,
    pub local: BoneTransform,
    pub world: BoneTransform,
}

impl Bone {
    fn root() -> Self {
        Self {
            name: String::new(),
            parent: None,
            local: BoneTransform::default(),
            world: BoneTransform::default(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct XModelPart {
    pub name: String,
    pub version: ModelVersion,
    pub model_type: ModelType,
    pub bones: Vec<Bone>,
}

impl XModelPart {
    /// Loads a skeleton, deriving the model type from the file name.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = file_stem(path);
        let model_type = ModelType::from_part_name(&name);
        let mut reader = BufReader::new(File::open(path)?);
        Self::parse(&mut reader, name, model_type)
    }

    pub fn parse<R: Read + Seek>(
        reader: &mut R,
        name: impl Into<String>,
        model_type: ModelType,
    ) -> Result<Self> {
        let version = read_model_version(reader, "xmodelpart")?;
        let layout = SkeletonLayout::for_version(version);

        let bone_count = usize::from(reader.read_u16::<LittleEndian>()?);
        let root_count = usize::from(reader.read_u16::<LittleEndian>()?);

        let mut bones = Vec::with_capacity(root_count + bone_count);
        bones.extend((0..root_count).map(|_| Bone::root()));

        for _ in 0..bone_count {
            let index = bones.len();
            let parent = reader.read_i8()?;
            let position = reader.read_vec3()?;
            let rotation = Quaternion::from_quantized(
                reader.read_i16::<LittleEndian>()?,
                reader.read_i16::<LittleEndian>()?,
                reader.read_i16::<LittleEndian>()?,
            );

            let parent = match usize::try_from(parent) {
                Ok(p) if p < index => Some(p),
                Ok(_) => return Err(XModelError::InvalidParent { bone: index, parent }),
                Err(_) => None,
            };

            let local = BoneTransform { position, rotation };
            bones.push(Bone {
                name: String::new(),
                parent,
                local,
                world: local,
            });
        }

        let viewhands = layout.viewhands.filter(|_| model_type.is_viewhands());
        let padding = layout.name_padding_for(model_type);

        for index in 0..bones.len() {
            let bone_name = reader.read_cstring()?;
            reader.skip_bytes(padding)?;

            if let Some(position) = viewhands.and_then(|table| viewhand_position(table, &bone_name)) {
                trace!("Replacing view-hands bone {bone_name} position with {position:?}");
                bones[index].local.position = position;
                bones[index].world.position = position;
            }

            if let Some(parent) = bones[index].parent {
                let parent_world = bones[parent].world;
                let bone = &mut bones[index];
                bone.world = parent_world.compose(&bone.local);
            }

            bones[index].name = bone_name;
        }

        let name = name.into();
        debug!(
            "XModelPart {} ({}, {:?}) has {} bones, {} roots",
            name,
            version,
            model_type,
            bones.len(),
            root_count
        );

        Ok(Self {
            name,
            version,
            model_type,
            bones,
        })
    }

    pub fn bone(&self, index: u16) -> Result<&Bone> {
        self.bones
            .get(usize::from(index))
            .ok_or(XModelError::BoneIndexOutOfRange {
                index,
                count: self.bones.len(),
            })
    }

    pub fn find_bone(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|bone| bone.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_layout_padding() {
        let v14 = SkeletonLayout::for_version(ModelVersion::V14);
        assert_eq!(v14.name_padding_for(ModelType::Animated), 24);
        assert_eq!(v14.name_padding_for(ModelType::Viewhands), 24);
        assert!(v14.viewhands.is_some());

        let v25 = SkeletonLayout::for_version(ModelVersion::V25);
        assert_eq!(v25.name_padding_for(ModelType::Rigid), 0);
        assert!(v25.viewhands.is_none());
    }

    #[test]
    fn test_compose_two_levels() {
        let quarter_z = Quaternion::new(0.0, 0.0, FRAC_1_SQRT_2, FRAC_1_SQRT_2);
        let root = BoneTransform {
            position: Vec3::new(10.0, 0.0, 0.0),
            rotation: quarter_z,
        };
        let child = BoneTransform {
            position: Vec3::new(1.0, 0.0, 0.0),
            rotation: Quaternion::IDENTITY,
        };

        let world = root.compose(&child);
        assert!((world.position.x - 10.0).abs() < 1e-5);
        assert!((world.position.y - 1.0).abs() < 1e-5);
        assert!(world.position.z.abs() < 1e-5);
        assert!((world.rotation.z - FRAC_1_SQRT_2).abs() < 1e-5);
        assert!((world.rotation.w - FRAC_1_SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn test_transform_point_and_direction() {
        let transform = BoneTransform {
            position: Vec3::new(0.0, 0.0, 5.0),
            rotation: Quaternion::new(0.0, 0.0, FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        };
        let point = transform.transform_point(Vec3::new(0.0, 2.0, 0.0));
        assert!((point.x + 2.0).abs() < 1e-5);
        assert!(point.y.abs() < 1e-5);
        assert!((point.z - 5.0).abs() < 1e-5);

        let normal = transform.transform_direction(Vec3::new(1.0, 0.0, 0.0));
        assert!(normal.x.abs() < 1e-5);
        assert!((normal.y - 1.0).abs() < 1e-5);
        assert!(normal.z.abs() < 1e-5);
    }
}
