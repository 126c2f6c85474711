use cod_data::types::Triangle;
use std::collections::BTreeMap;

use crate::error::{IbspError, Result};
use crate::geometry::{BspMaterial, TriangleSoup, Vertex};

/// Geometry of one triangle soup
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Surface {
    pub material: String,
    pub draw_order: u16,
    /// Referenced vertices keyed by their index in the level vertex array
    pub vertices: BTreeMap<u32, Vertex>,
    /// Triangles as level vertex indices, in file winding
    pub triangles: Vec<[u32; 3]>,
}

/// A soup that could not be resolved against the level arrays
#[derive(Debug)]
pub struct SkippedSurface {
    pub soup_index: usize,
    pub error: IbspError,
}

/// Resolves a soup's material and index ranges.
///
/// Every lookup is bounds-checked. Indices are never truncated, so a soup
/// whose offset points past the vertex array fails instead of wrapping.
pub fn build_surface(
    soup: &TriangleSoup,
    materials: &[BspMaterial],
    vertices: &[Vertex],
    triangles: &[Triangle],
) -> Result<Surface> {
    let material_index = usize::from(soup.material_index);
    let material = materials
        .get(material_index)
        .ok_or(IbspError::MaterialIndexOutOfRange {
            index: material_index,
            count: materials.len(),
        })?;

    let mut surface = Surface {
        material: material.name.clone(),
        draw_order: soup.draw_order,
        vertices: BTreeMap::new(),
        triangles: Vec::with_capacity(soup.triangle_count()),
    };

    for triangle_index in soup.first_triangle()..soup.first_triangle() + soup.triangle_count() {
        let triangle = triangles
            .get(triangle_index)
            .ok_or(IbspError::TriangleIndexOutOfRange {
                index: triangle_index,
                count: triangles.len(),
            })?;

        let mut global = [0u32; 3];
        for (slot, local) in global.iter_mut().zip(triangle.indices()) {
            let index = u64::from(soup.vertices_offset) + u64::from(local);
            let vertex = usize::try_from(index)
                .ok()
                .and_then(|i| vertices.get(i))
                .ok_or(IbspError::VertexIndexOutOfRange {
                    index,
                    count: vertices.len(),
                })?;
            let index = u32::try_from(index).map_err(|_| IbspError::VertexIndexOutOfRange {
                index,
                count: vertices.len(),
            })?;
            surface.vertices.entry(index).or_insert(*vertex);
            *slot = index;
        }
        surface.triangles.push(global);
    }

    Ok(surface)
}
