use cod_data::types::{Color, Quaternion, Triangle, Uv, Vec3};
use cod_data::version::{ModelType, ModelVersion};
use cod_xmodel::{Model, SkippedSurface, XModel, XModelError, XModelPart, XModelSurf};
use pretty_assertions::assert_eq;
use std::f32::consts::FRAC_1_SQRT_2;
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

/// Rotations are read back from 16-bit components
const EPSILON: f32 = 1e-4;

fn assert_vec3_near(actual: Vec3, expected: Vec3) {
    assert!(
        (actual.x - expected.x).abs() < EPSILON
            && (actual.y - expected.y).abs() < EPSILON
            && (actual.z - expected.z).abs() < EPSILON,
        "{actual:?} != {expected:?}"
    );
}

#[derive(Default)]
struct Bytes(Vec<u8>);

impl Bytes {
    fn u8(mut self, v: u8) -> Self {
        self.0.push(v);
        self
    }
    fn u16(mut self, v: u16) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }
    fn i16(mut self, v: i16) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }
    fn u32(mut self, v: u32) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }
    fn f32s(mut self, values: &[f32]) -> Self {
        for v in values {
            self.0.extend_from_slice(&v.to_le_bytes());
        }
        self
    }
    fn cstr(mut self, s: &str) -> Self {
        self.0.extend_from_slice(s.as_bytes());
        self.0.push(0);
        self
    }
    fn pad(mut self, count: usize) -> Self {
        self.0.resize(self.0.len() + count, 0);
        self
    }
}

/// Quarter turn about Z, quantized
const QUARTER_Z: i16 = 23170;

/// One root and one child offset along X by 2, rotated a quarter turn about Z,
/// plus a grandchild offset along X by 1.
fn skeleton_bytes(version: u16, name_padding: usize) -> Vec<u8> {
    Bytes::default()
        .u16(version)
        .u16(2)
        .u16(1)
        // child of root
        .u8(0)
        .f32s(&[2.0, 0.0, 0.0])
        .i16(0)
        .i16(0)
        .i16(QUARTER_Z)
        // child of the first bone
        .u8(1)
        .f32s(&[1.0, 0.0, 0.0])
        .i16(0)
        .i16(0)
        .i16(0)
        .cstr("tag_origin")
        .pad(name_padding)
        .cstr("tag_torso")
        .pad(name_padding)
        .cstr("j_shoulder_le")
        .pad(name_padding)
        .0
}

#[test]
fn test_skeleton_world_transforms() {
    let data = skeleton_bytes(0x14, 0);
    let part = XModelPart::parse(&mut Cursor::new(data), "body_mp1", ModelType::Animated).unwrap();

    assert_eq!(part.version, ModelVersion::V20);
    assert_eq!(part.bones.len(), 3);
    assert_eq!(part.bones[0].name, "tag_origin");
    assert!(part.bones[0].is_root());
    assert_eq!(part.bones[0].world.rotation, Quaternion::IDENTITY);
    assert_eq!(part.bones[1].parent, Some(0));
    assert_eq!(part.bones[2].parent, Some(1));

    assert_vec3_near(part.bones[1].world.position, Vec3::new(2.0, 0.0, 0.0));
    // The grandchild's +X offset is rotated onto +Y by its parent
    assert_vec3_near(part.bones[2].world.position, Vec3::new(2.0, 1.0, 0.0));
    assert!((part.bones[2].world.rotation.z - FRAC_1_SQRT_2).abs() < EPSILON);
    assert_eq!(part.find_bone("tag_torso"), Some(&part.bones[1]));
}

#[test]
fn test_v14_skeleton_skips_name_padding() {
    let data = skeleton_bytes(0x0E, 24);
    let part = XModelPart::parse(&mut Cursor::new(data), "soldier1", ModelType::Animated).unwrap();
    let names: Vec<&str> = part.bones.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["tag_origin", "tag_torso", "j_shoulder_le"]);
}

#[test]
fn test_viewhands_override() {
    let data = skeleton_bytes(0x14, 0);
    let part = XModelPart::parse(&mut Cursor::new(data), "viewmodel_hands4", ModelType::Viewhands)
        .unwrap();

    let torso = Vec3::new(-11.76486, 0.0, -3.497466).div_scalar(2.54);
    assert_vec3_near(part.bones[1].local.position, torso);
    assert_vec3_near(part.bones[1].world.position, torso);

    let shoulder = Vec3::new(2.859542, 20.16072, -4.597286).div_scalar(2.54);
    assert_vec3_near(part.bones[2].local.position, shoulder);
    let rotated = part.bones[1].world.rotation.rotate(shoulder);
    assert_vec3_near(part.bones[2].world.position, torso + rotated);
}

#[test]
fn test_v25_has_no_viewhands_table() {
    let data = skeleton_bytes(0x19, 0);
    let part = XModelPart::parse(&mut Cursor::new(data), "viewhands4", ModelType::Viewhands)
        .unwrap();
    assert_vec3_near(part.bones[1].local.position, Vec3::new(2.0, 0.0, 0.0));
}

#[test]
fn test_forward_parent_is_rejected() {
    let data = Bytes::default()
        .u16(0x14)
        .u16(1)
        .u16(1)
        .u8(5)
        .f32s(&[0.0, 0.0, 0.0])
        .i16(0)
        .i16(0)
        .i16(0)
        .0;
    let err = XModelPart::parse(&mut Cursor::new(data), "bad1", ModelType::Animated).unwrap_err();
    assert!(matches!(
        err,
        XModelError::InvalidParent { bone: 1, parent: 5 }
    ));
}

#[test]
fn test_unsupported_part_version() {
    let data = Bytes::default().u16(0x3E).u16(0).u16(0).0;
    let err = XModelPart::parse(&mut Cursor::new(data), "mw2", ModelType::Rigid).unwrap_err();
    assert!(matches!(
        err,
        XModelError::UnsupportedVersion {
            kind: "xmodelpart",
            version: 0x3E
        }
    ));
}

/// One rigid triangle surface per default bone
fn rigid_v20_surfaces(default_bones: &[u16]) -> Vec<u8> {
    let mut bytes = Bytes::default().u16(0x14).u16(default_bones.len() as u16);
    for &default_bone in default_bones {
        bytes = bytes.pad(1).u16(3).u16(1).u16(default_bone);
        for x in [0.0, 1.0, 0.0] {
            bytes = bytes
                .f32s(&[0.0, 0.0, 1.0])
                .u8(255)
                .u8(0)
                .u8(0)
                .u8(255)
                .f32s(&[0.5, 0.25])
                .pad(24)
                .f32s(&[x, if x == 0.0 { 0.0 } else { 1.0 }, 0.0]);
        }
        bytes = bytes.u16(0).u16(1).u16(2);
    }
    bytes.0
}

fn rigid_v20_surface(default_bone: u16) -> Vec<u8> {
    rigid_v20_surfaces(&[default_bone])
}

#[test]
fn test_v20_rigid_surface() {
    let surf = XModelSurf::parse(&mut Cursor::new(rigid_v20_surface(0)), "crate", None).unwrap();

    assert_eq!(surf.surfaces.len(), 1);
    let surface = &surf.surfaces[0];
    assert_eq!(surface.triangles, vec![Triangle::new(0, 1, 2)]);
    assert_eq!(surface.vertices.len(), 3);

    let vertex = &surface.vertices[0];
    assert_eq!(vertex.color, Color::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(vertex.uv, Uv::new(0.5, 0.75));
    assert_eq!(vertex.weights.len(), 1);
    assert_eq!(vertex.weights[0].influence, 1.0);
}

#[test]
fn test_surface_transformed_by_skeleton() {
    let part = XModelPart::parse(
        &mut Cursor::new(skeleton_bytes(0x14, 0)),
        "crate1",
        ModelType::Animated,
    )
    .unwrap();
    let surf =
        XModelSurf::parse(&mut Cursor::new(rigid_v20_surface(1)), "crate", Some(&part)).unwrap();

    let vertex = &surf.surfaces[0].vertices[1];
    // (1, 1, 0) rotated a quarter turn about Z, then moved to (2, 0, 0)
    assert_vec3_near(vertex.position, Vec3::new(1.0, 1.0, 0.0));
    assert_vec3_near(vertex.normal, Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn test_surface_with_bad_bone_is_skipped() {
    let part = XModelPart::parse(
        &mut Cursor::new(skeleton_bytes(0x14, 0)),
        "crate1",
        ModelType::Animated,
    )
    .unwrap();
    let surf = XModelSurf::parse(
        &mut Cursor::new(rigid_v20_surfaces(&[1, 9, 1])),
        "crate",
        Some(&part),
    )
    .unwrap();

    assert_eq!(surf.surfaces.len(), 2);
    assert_eq!(
        surf.skipped_surfaces,
        vec![SkippedSurface {
            index: 1,
            error: "Bone index 9 out of range (3 bones)".to_string(),
        }]
    );
    // The surface after the skipped one is still read in step
    for surface in &surf.surfaces {
        assert_eq!(surface.triangles, vec![Triangle::new(0, 1, 2)]);
        assert_vec3_near(surface.vertices[1].position, Vec3::new(1.0, 1.0, 0.0));
    }
}

#[test]
fn test_apply_skeleton_leaves_surface_unchanged_on_error() {
    let part = XModelPart::parse(
        &mut Cursor::new(skeleton_bytes(0x14, 0)),
        "crate1",
        ModelType::Animated,
    )
    .unwrap();
    let mut surf =
        XModelSurf::parse(&mut Cursor::new(rigid_v20_surface(9)), "crate", None).unwrap();
    let before = surf.surfaces[0].clone();

    let err = surf.surfaces[0].apply_skeleton(&part).unwrap_err();
    assert!(matches!(
        err,
        XModelError::BoneIndexOutOfRange { index: 9, count: 3 }
    ));
    assert_eq!(surf.surfaces[0], before);
}

#[test]
fn test_v20_rigged_weights() {
    let data = Bytes::default()
        .u16(0x14)
        .u16(1)
        .pad(1)
        .u16(1)
        .u16(0)
        .u16(65535)
        .pad(2)
        .f32s(&[0.0, 0.0, 1.0])
        .u8(255)
        .u8(255)
        .u8(255)
        .u8(255)
        .f32s(&[0.0, 0.0])
        .pad(24)
        .u8(2)
        .u16(3)
        .f32s(&[1.0, 2.0, 3.0])
        .pad(1)
        .u16(4)
        .pad(12)
        .u16(16384)
        .u16(5)
        .pad(12)
        .u16(8192)
        .0;

    let surf = XModelSurf::parse(&mut Cursor::new(data), "soldier", None).unwrap();
    let vertex = &surf.surfaces[0].vertices[0];
    assert_eq!(vertex.bone, 3);
    assert_eq!(vertex.position, Vec3::new(1.0, 2.0, 3.0));

    let bones: Vec<u16> = vertex.weights.iter().map(|w| w.bone).collect();
    assert_eq!(bones, vec![3, 4, 5]);
    let extra = (16384.0 + 8192.0) / 65535.0;
    assert!((vertex.weights[0].influence - (1.0 - extra)).abs() < 1e-6);
    assert!((vertex.total_influence() - 1.0).abs() <= 1.0 / 65535.0);
}

#[test]
fn test_v14_rigged_surface_with_strips() {
    let data = Bytes::default()
        .u16(0x0E)
        .u16(1)
        .pad(1)
        .u16(2)
        .u16(1)
        .pad(2)
        .u16(65535)
        .pad(4)
        // one strip
        .u8(3)
        .u16(0)
        .u16(1)
        .u16(2)
        // vertex 0 with one extra weight
        .f32s(&[0.0, 0.0, 1.0])
        .f32s(&[0.0, 0.0])
        .u16(1)
        .u16(0)
        .f32s(&[1.0, 0.0, 0.0])
        .pad(4)
        // vertex 1 without
        .f32s(&[0.0, 0.0, 1.0])
        .f32s(&[1.0, 1.0])
        .u16(0)
        .u16(2)
        .f32s(&[0.0, 1.0, 0.0])
        // trailing weights of vertex 0
        .u16(7)
        .pad(12)
        .f32s(&[32767.5])
        .0;

    let surf = XModelSurf::parse(&mut Cursor::new(data), "tree", None).unwrap();
    let surface = &surf.surfaces[0];
    assert_eq!(surface.triangles, vec![Triangle::new(0, 1, 2)]);
    assert_eq!(surface.vertices[0].color, Color::WHITE);
    assert_eq!(surface.vertices[1].bone, 2);
    assert_eq!(surface.vertices[1].uv, Uv::new(1.0, 0.0));

    let weights = &surface.vertices[0].weights;
    assert_eq!(weights.len(), 2);
    assert_eq!(weights[1].bone, 7);
    assert!((weights[1].influence - 0.5).abs() < 1e-6);
    assert!((weights[0].influence - 0.5).abs() < 1e-6);
}

#[test]
fn test_v25_rigged_header_skip_stream() {
    let data = Bytes::default()
        .u16(0x19)
        .u16(1)
        .pad(3)
        .u16(1)
        .u16(0)
        .u16(2)
        // opaque stream up to a zero, then two bytes
        .u16(9)
        .u16(4)
        .u16(0)
        .pad(2)
        .f32s(&[0.0, 1.0, 0.0])
        .u8(0)
        .u8(0)
        .u8(255)
        .u8(255)
        .f32s(&[0.0, 1.0])
        .pad(24)
        .u8(1)
        .u16(6)
        .f32s(&[4.0, 5.0, 6.0])
        .u16(8)
        .u16(65535)
        .0;

    let surf = XModelSurf::parse(&mut Cursor::new(data), "vehicle", None).unwrap();
    let vertex = &surf.surfaces[0].vertices[0];
    assert_eq!(vertex.bone, 6);
    assert_eq!(vertex.position, Vec3::new(4.0, 5.0, 6.0));
    assert_eq!(vertex.color, Color::new(0.0, 0.0, 1.0, 1.0));
    assert_eq!(vertex.weights[1].bone, 8);
    assert!((vertex.weights[1].influence - 1.0).abs() < 1e-6);
    assert!(vertex.weights[0].influence.abs() < 1e-6);
}

fn descriptor_bytes() -> Vec<u8> {
    Bytes::default()
        .u16(0x14)
        .pad(25)
        .f32s(&[0.0])
        .cstr("barrel_lod0")
        .f32s(&[500.0])
        .cstr("")
        .f32s(&[1000.0])
        .cstr("barrel_lod1")
        .f32s(&[0.0])
        .cstr("")
        .pad(4)
        .u32(1)
        .u32(2)
        .pad(2 * 48 + 36)
        .u16(2)
        .cstr("mtl_barrel")
        .cstr("mtl_barrel_lid")
        .u16(1)
        .cstr("mtl_barrel")
        .0
}

#[test]
fn test_descriptor() {
    let model = XModel::parse(&mut Cursor::new(descriptor_bytes()), "barrel").unwrap();
    assert_eq!(model.version, ModelVersion::V20);
    assert_eq!(model.lods.len(), 2);
    assert_eq!(model.lods[0].name, "barrel_lod0");
    assert_eq!(model.lods[0].materials, vec!["mtl_barrel", "mtl_barrel_lid"]);
    assert_eq!(model.lods[1].name, "barrel_lod1");
    assert_eq!(model.lods[1].distance, 1000.0);
    assert_eq!(model.lods[1].materials, vec!["mtl_barrel"]);
}

#[test]
fn test_model_load_without_skeleton() {
    let dir = TempDir::new().unwrap();
    let parts = dir.path().join("xmodelparts");
    let surfs = dir.path().join("xmodelsurfs");
    fs::create_dir_all(&parts).unwrap();
    fs::create_dir_all(&surfs).unwrap();

    fs::write(parts.join("barrel_lod0"), skeleton_bytes(0x14, 0)).unwrap();
    fs::write(surfs.join("barrel_lod0"), rigid_v20_surface(0)).unwrap();
    // barrel_lod1 has a surface but no skeleton
    fs::write(surfs.join("barrel_lod1"), rigid_v20_surface(0)).unwrap();
    fs::write(dir.path().join("barrel"), descriptor_bytes()).unwrap();

    let descriptor = XModel::load(dir.path().join("barrel")).unwrap();
    assert_eq!(descriptor.name, "barrel");

    let model = Model::load(descriptor, &parts, &surfs).unwrap();
    assert_eq!(model.lods.len(), 2);
    assert!(model.lods[0].skeleton.is_some());
    assert!(model.lods[1].skeleton.is_none());
    assert_eq!(model.lods[1].surface.triangle_count(), 1);
    assert_eq!(model.material_names(), vec!["mtl_barrel", "mtl_barrel_lid"]);
}

#[test]
fn test_model_missing_surface_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("barrel"), descriptor_bytes()).unwrap();
    let descriptor = XModel::load(dir.path().join("barrel")).unwrap();

    let err = Model::load(descriptor, dir.path(), dir.path()).unwrap_err();
    assert!(matches!(err, XModelError::Surface { ref surface, .. } if surface == "barrel_lod0"));
}
