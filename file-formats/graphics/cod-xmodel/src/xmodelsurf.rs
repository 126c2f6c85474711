//! Skinned surfaces (`xmodelsurfs`): vertices with bone weights and the
//! triangles that index them.
//!
//! Version 14 encodes triangles as strips ahead of the vertex block and
//! stores extra weights after all vertices. Versions 20 and 25 keep weights
//! inline and end each surface with a flat triangle list.

use byteorder::{LittleEndian, ReadBytesExt};
use cod_data::io_ext::CodReadExt;
use cod_data::types::{Color, Triangle, Uv, Vec3};
use cod_data::version::ModelVersion;
use log::{debug, trace, warn};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::error::{Result, XModelError};
use crate::file_stem;
use crate::xmodel::read_model_version;
use crate::xmodelpart::XModelPart;

/// Default bone value marking a surface whose vertices carry their own bone
pub const RIGGED: u16 = 65535;
/// Divisor for quantized weight influences
pub const INFLUENCE_SCALE: f32 = 65535.0;
/// Smallest strip: a count byte and three indices
const MIN_STRIP_SIZE: u64 = 7;

/// Fixed spans per surface version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLayout {
    /// Bytes before the vertex count
    pub header_padding: u64,
    /// Bytes after the default bone of a rigged surface
    pub rigged_header_padding: u64,
    pub has_color: bool,
    /// Bytes between the UV and the bone data of each vertex
    pub vertex_padding: u64,
    /// Bytes between the bone index and influence of each extra weight
    pub weight_padding: u64,
}

impl SurfaceLayout {
    pub const fn for_version(version: ModelVersion) -> Self {
        match version {
            ModelVersion::V14 => Self {
                header_padding: 1,
                rigged_header_padding: 4,
                has_color: false,
                vertex_padding: 0,
                weight_padding: 12,
            },
            ModelVersion::V20 => Self {
                header_padding: 1,
                rigged_header_padding: 2,
                has_color: true,
                vertex_padding: 24,
                weight_padding: 12,
            },
            ModelVersion::V25 => Self {
                header_padding: 3,
                rigged_header_padding: 0,
                has_color: true,
                vertex_padding: 24,
                weight_padding: 0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Weight {
    pub bone: u16,
    pub influence: f32,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct SurfaceVertex {
    pub normal: Vec3,
    pub color: Color,
    pub uv: Uv,
    /// Primary bone
    pub bone: u16,
    pub position: Vec3,
    /// Primary weight first, then the extra weights in file order
    pub weights: Vec<Weight>,
}

impl SurfaceVertex {
    fn add_weight(&mut self, bone: u16, influence: f32) {
        if let Some(primary) = self.weights.first_mut() {
            primary.influence -= influence;
        }
        self.weights.push(Weight { bone, influence });
    }

    pub fn total_influence(&self) -> f32 {
        self.weights.iter().map(|w| w.influence).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Surface {
    pub vertices: Vec<SurfaceVertex>,
    pub triangles: Vec<Triangle>,
}

impl Surface {
    /// Moves every vertex into the world space of its primary bone.
    ///
    /// All bones are checked before any vertex is touched, so a failed call
    /// leaves the surface unchanged.
    pub fn apply_skeleton(&mut self, skeleton: &XModelPart) -> Result<()> {
        let worlds = self
            .vertices
            .iter()
            .map(|vertex| skeleton.bone(vertex.bone).map(|bone| bone.world))
            .collect::<Result<Vec<_>>>()?;

        for (vertex, world) in self.vertices.iter_mut().zip(worlds) {
            vertex.position = world.transform_point(vertex.position);
            vertex.normal = world.transform_direction(vertex.normal);
        }
        Ok(())
    }
}

/// A surface dropped because the skeleton could not place its vertices
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct SkippedSurface {
    /// Position of the surface in the file
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Clone, Copy)]
struct SurfaceHeader {
    vertex_count: u16,
    triangle_count: u16,
    default_bone: u16,
    rigged: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct XModelSurf {
    pub name: String,
    pub version: ModelVersion,
    pub surfaces: Vec<Surface>,
    pub skipped_surfaces: Vec<SkippedSurface>,
}

impl XModelSurf {
    /// Loads surfaces, moving vertices into world space when a skeleton is
    /// given. A surface whose vertices name a bone the skeleton lacks is
    /// read in full, then left out and listed in `skipped_surfaces`.
    pub fn load<P: AsRef<Path>>(path: P, skeleton: Option<&XModelPart>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        Self::parse(&mut reader, file_stem(path), skeleton)
    }

    pub fn parse<R: Read + Seek>(
        reader: &mut R,
        name: impl Into<String>,
        skeleton: Option<&XModelPart>,
    ) -> Result<Self> {
        let name = name.into();
        let end = reader.total_len()?;
        let version = read_model_version(reader, "xmodelsurf")?;
        let layout = SurfaceLayout::for_version(version);

        let surface_count = reader.read_u16::<LittleEndian>()?;
        let mut surfaces = Vec::with_capacity(usize::from(surface_count));
        let mut skipped_surfaces = Vec::new();
        for index in 0..usize::from(surface_count) {
            let mut surface = read_surface(reader, version, &layout, end)?;
            trace!(
                "Surface {index}: {} vertices, {} triangles",
                surface.vertices.len(),
                surface.triangles.len()
            );

            if let Some(skeleton) = skeleton
                && let Err(error) = surface.apply_skeleton(skeleton)
            {
                warn!("Skipping surface {index} of {name}: {error}");
                skipped_surfaces.push(SkippedSurface {
                    index,
                    error: error.to_string(),
                });
                continue;
            }
            surfaces.push(surface);
        }

        debug!(
            "XModelSurf {} ({}) has {} surfaces, {} skipped",
            name,
            version,
            surfaces.len(),
            skipped_surfaces.len()
        );

        Ok(Self {
            name,
            version,
            surfaces,
            skipped_surfaces,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.surfaces.iter().map(|s| s.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.surfaces.iter().map(|s| s.triangles.len()).sum()
    }
}

fn read_surface<R: Read + Seek>(
    reader: &mut R,
    version: ModelVersion,
    layout: &SurfaceLayout,
    end: u64,
) -> Result<Surface> {
    let header = read_header(reader, version, layout)?;

    let mut triangles = if version == ModelVersion::V14 {
        read_triangle_strips(reader, usize::from(header.triangle_count), end)?
    } else {
        Vec::new()
    };

    let mut vertices = Vec::with_capacity(usize::from(header.vertex_count));
    let mut trailing_weights = Vec::new();
    for _ in 0..header.vertex_count {
        let normal = reader.read_vec3()?;
        let color = if layout.has_color {
            reader.read_color_rgba8()?
        } else {
            Color::WHITE
        };
        let uv = reader.read_uv()?.flip_v();
        reader.skip_bytes(layout.vertex_padding)?;

        let (weight_count, bone) = if header.rigged {
            let count = match version {
                ModelVersion::V14 => reader.read_u16::<LittleEndian>()?,
                ModelVersion::V20 | ModelVersion::V25 => u16::from(reader.read_u8()?),
            };
            (count, reader.read_u16::<LittleEndian>()?)
        } else {
            (0, header.default_bone)
        };

        let position = reader.read_vec3()?;

        let mut vertex = SurfaceVertex {
            normal,
            color,
            uv,
            bone,
            position,
            weights: vec![Weight {
                bone,
                influence: 1.0,
            }],
        };

        match version {
            ModelVersion::V14 => {
                if weight_count != 0 {
                    reader.skip_bytes(4)?;
                }
                trailing_weights.push(weight_count);
            }
            ModelVersion::V20 => {
                if weight_count > 0 {
                    reader.skip_bytes(1)?;
                }
                for _ in 0..weight_count {
                    let bone = reader.read_u16::<LittleEndian>()?;
                    reader.skip_bytes(layout.weight_padding)?;
                    let influence = f32::from(reader.read_u16::<LittleEndian>()?) / INFLUENCE_SCALE;
                    vertex.add_weight(bone, influence);
                }
            }
            ModelVersion::V25 => {
                for _ in 0..weight_count {
                    let bone = reader.read_u16::<LittleEndian>()?;
                    let influence = f32::from(reader.read_u16::<LittleEndian>()?) / INFLUENCE_SCALE;
                    vertex.add_weight(bone, influence);
                }
            }
        }

        vertices.push(vertex);
    }

    // Version 14 keeps extra weights after the vertex block
    for (vertex, count) in vertices.iter_mut().zip(trailing_weights) {
        for _ in 0..count {
            let bone = reader.read_u16::<LittleEndian>()?;
            reader.skip_bytes(layout.weight_padding)?;
            let influence = reader.read_f32::<LittleEndian>()? / INFLUENCE_SCALE;
            vertex.add_weight(bone, influence);
        }
    }

    if version != ModelVersion::V14 {
        triangles.reserve(usize::from(header.triangle_count));
        for _ in 0..header.triangle_count {
            triangles.push(Triangle::new(
                reader.read_u16::<LittleEndian>()?,
                reader.read_u16::<LittleEndian>()?,
                reader.read_u16::<LittleEndian>()?,
            ));
        }
    }

    Ok(Surface {
        vertices,
        triangles,
    })
}

fn read_header<R: Read + Seek>(
    reader: &mut R,
    version: ModelVersion,
    layout: &SurfaceLayout,
) -> Result<SurfaceHeader> {
    reader.skip_bytes(layout.header_padding)?;
    let vertex_count = reader.read_u16::<LittleEndian>()?;
    let triangle_count = reader.read_u16::<LittleEndian>()?;

    let (default_bone, rigged) = match version {
        ModelVersion::V14 | ModelVersion::V20 => {
            if version == ModelVersion::V14 {
                reader.skip_bytes(2)?;
            }
            let default_bone = reader.read_u16::<LittleEndian>()?;
            if default_bone == RIGGED {
                reader.skip_bytes(layout.rigged_header_padding)?;
                (0, true)
            } else {
                (default_bone, false)
            }
        }
        ModelVersion::V25 => {
            let vertex_count2 = reader.read_u16::<LittleEndian>()?;
            let rigged = vertex_count != vertex_count2;
            if rigged {
                while reader.read_u16::<LittleEndian>()? != 0 {}
                reader.skip_bytes(2)?;
            } else {
                reader.skip_bytes(4)?;
            }
            (0, rigged)
        }
    };

    Ok(SurfaceHeader {
        vertex_count,
        triangle_count,
        default_bone,
        rigged,
    })
}

/// Decodes version 14 triangle strips until `expected` triangles exist.
///
/// Each strip is a count byte and that many indices. The first three form a
/// triangle, then every further index pair emits two more that share the
/// previous third index. Triangles with a repeated vertex are dropped.
pub fn read_triangle_strips<R: Read + Seek>(
    reader: &mut R,
    expected: usize,
    end: u64,
) -> Result<Vec<Triangle>> {
    let mut triangles = Vec::with_capacity(expected);

    loop {
        if end.saturating_sub(reader.stream_position()?) < MIN_STRIP_SIZE {
            return Err(XModelError::TriangleStreamExhausted {
                produced: triangles.len(),
                expected,
            });
        }

        let count = usize::from(reader.read_u8()?);
        let idx1 = reader.read_u16::<LittleEndian>()?;
        let mut idx2 = reader.read_u16::<LittleEndian>()?;
        let mut idx3 = reader.read_u16::<LittleEndian>()?;
        push_distinct(&mut triangles, Triangle::new(idx1, idx2, idx3));

        let mut j = 3;
        while j < count {
            let idx4 = idx3;
            let idx5 = reader.read_u16::<LittleEndian>()?;
            push_distinct(&mut triangles, Triangle::new(idx4, idx2, idx5));

            if j + 1 >= count {
                break;
            }

            idx2 = idx5;
            idx3 = reader.read_u16::<LittleEndian>()?;
            push_distinct(&mut triangles, Triangle::new(idx4, idx2, idx3));

            j += 2;
        }

        if triangles.len() >= expected {
            return Ok(triangles);
        }
    }
}

fn push_distinct(triangles: &mut Vec<Triangle>, triangle: Triangle) {
    if !triangle.is_degenerate() {
        triangles.push(triangle);
    }
}
