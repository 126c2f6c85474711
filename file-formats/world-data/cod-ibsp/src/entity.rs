//! The entity lump: brace-delimited key/value blocks that become JSON after
//! a handful of textual repairs.

use cod_data::types::{Vec3, parse_float};
use log::trace;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::error::Result;

/// Model references that resolve to placed xmodels
pub const MODEL_PATTERN: &str = r"(?i)^xmodel/(.*)";

static MODEL_REGEX: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(MODEL_PATTERN));

/// A placed model instance
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Entity {
    /// Model name with the `xmodel/` prefix removed
    pub name: String,
    pub classname: String,
    pub angles: Vec3,
    pub origin: Vec3,
    pub scale: Vec3,
}

/// String value of `key`, or empty when missing or not a string.
///
/// Blocks may repeat a key; the last occurrence wins.
fn field<'a>(record: &'a Map<String, Value>, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Turns the lump text into a JSON array of objects.
///
/// Each block is `{` newline, then `"key" "value"` lines, then `}`.
pub fn repair_entity_text(raw: &str) -> String {
    format!("[{}]", raw.trim_matches('\0'))
        .replace("}\n{\n", "},\n{\n")
        .replace("\"\n\"", "\",\n\"")
        .replace("\" \"", "\":\"")
        .replace('\\', "/")
}

/// Splits a transform on whitespace.
///
/// Three numbers give one value per axis and a single number applies to all
/// three. Anything else, including empty text, yields `default` on every
/// axis.
pub fn parse_transform(text: &str, default: f32) -> Vec3 {
    let values: Option<Vec<f32>> = text.split_whitespace().map(parse_float).collect();
    match values.as_deref() {
        Some(&[x, y, z]) => Vec3::new(x, y, z),
        Some(&[v]) => Vec3::splat(v),
        _ => Vec3::splat(default),
    }
}

/// Parses the raw lump bytes and keeps the `xmodel/...` instances.
///
/// Entities whose model does not match are dropped silently.
pub fn parse_entities(raw: &[u8]) -> Result<Vec<Entity>> {
    let text = repair_entity_text(&String::from_utf8_lossy(raw));
    let records: Vec<Map<String, Value>> = serde_json::from_str(&text)?;
    let pattern = MODEL_REGEX.as_ref().map_err(Clone::clone)?;

    let entities = records
        .iter()
        .filter_map(|record| {
            let name = pattern
                .captures(field(record, "model"))
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .filter(|name| !name.is_empty())?;
            let classname = field(record, "classname").to_string();
            trace!("Entity {} ({})", name, classname);

            Some(Entity {
                name,
                classname,
                angles: parse_transform(field(record, "angles"), 0.0),
                origin: parse_transform(field(record, "origin"), 0.0),
                scale: parse_transform(field(record, "modelscale"), 1.0),
            })
        })
        .collect();

    Ok(entities)
}
