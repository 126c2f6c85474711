//! Formatting utilities

use cod_data::types::{Quaternion, Vec3};
use humansize::{DECIMAL, format_size};

/// Format file size in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

pub fn format_vec3(v: Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}

pub fn format_quat(q: Quaternion) -> String {
    format!("({:.4}, {:.4}, {:.4}, {:.4})", q.x, q.y, q.z, q.w)
}
