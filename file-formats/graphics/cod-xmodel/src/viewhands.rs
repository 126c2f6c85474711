//! Canonical bone offsets for first-person hand models.
//!
//! View-hands parts ship with bind positions that do not line up with the
//! weapon rigs, so the importer replaces them with these values. Offsets are
//! in inches and get divided by [`INCH_TO_CM`] when applied.

use cod_data::types::Vec3;
use cod_data::version::ModelVersion;

pub const INCH_TO_CM: f32 = 2.54;

/// Bone name to position offset
pub type ViewhandTable = [(&'static str, [f32; 3])];

/// Call of Duty and United Offensive. Every entry is the origin.
pub static VIEWHANDS_V14: &ViewhandTable = &[
    ("tag_view", [0.0, 0.0, 0.0]),
    ("tag_torso", [0.0, 0.0, 0.0]),
    ("tag_weapon", [0.0, 0.0, 0.0]),
    ("bip01 l upperarm", [0.0, 0.0, 0.0]),
    ("bip01 l forearm", [0.0, 0.0, 0.0]),
    ("bip01 l hand", [0.0, 0.0, 0.0]),
    ("bip01 l finger0", [0.0, 0.0, 0.0]),
    ("bip01 l finger01", [0.0, 0.0, 0.0]),
    ("bip01 l finger02", [0.0, 0.0, 0.0]),
    ("bip01 l finger0nub", [0.0, 0.0, 0.0]),
    ("bip01 l finger1", [0.0, 0.0, 0.0]),
    ("bip01 l finger11", [0.0, 0.0, 0.0]),
    ("bip01 l finger12", [0.0, 0.0, 0.0]),
    ("bip01 l finger1nub", [0.0, 0.0, 0.0]),
    ("bip01 l finger2", [0.0, 0.0, 0.0]),
    ("bip01 l finger21", [0.0, 0.0, 0.0]),
    ("bip01 l finger22", [0.0, 0.0, 0.0]),
    ("bip01 l finger2nub", [0.0, 0.0, 0.0]),
    ("bip01 l finger3", [0.0, 0.0, 0.0]),
    ("bip01 l finger31", [0.0, 0.0, 0.0]),
    ("bip01 l finger32", [0.0, 0.0, 0.0]),
    ("bip01 l finger3nub", [0.0, 0.0, 0.0]),
    ("bip01 l finger4", [0.0, 0.0, 0.0]),
    ("bip01 l finger41", [0.0, 0.0, 0.0]),
    ("bip01 l finger42", [0.0, 0.0, 0.0]),
    ("bip01 l finger4nub", [0.0, 0.0, 0.0]),
    ("bip01 r upperarm", [0.0, 0.0, 0.0]),
    ("bip01 r forearm", [0.0, 0.0, 0.0]),
    ("bip01 r hand", [0.0, 0.0, 0.0]),
    ("bip01 r finger0", [0.0, 0.0, 0.0]),
    ("bip01 r finger01", [0.0, 0.0, 0.0]),
    ("bip01 r finger02", [0.0, 0.0, 0.0]),
    ("bip01 r finger0nub", [0.0, 0.0, 0.0]),
    ("bip01 r finger1", [0.0, 0.0, 0.0]),
    ("bip01 r finger11", [0.0, 0.0, 0.0]),
    ("bip01 r finger12", [0.0, 0.0, 0.0]),
    ("bip01 r finger1nub", [0.0, 0.0, 0.0]),
    ("bip01 r finger2", [0.0, 0.0, 0.0]),
    ("bip01 r finger21", [0.0, 0.0, 0.0]),
    ("bip01 r finger22", [0.0, 0.0, 0.0]),
    ("bip01 r finger2nub", [0.0, 0.0, 0.0]),
    ("bip01 r finger3", [0.0, 0.0, 0.0]),
    ("bip01 r finger31", [0.0, 0.0, 0.0]),
    ("bip01 r finger32", [0.0, 0.0, 0.0]),
    ("bip01 r finger3nub", [0.0, 0.0, 0.0]),
    ("bip01 r finger4", [0.0, 0.0, 0.0]),
    ("bip01 r finger41", [0.0, 0.0, 0.0]),
    ("bip01 r finger42", [0.0, 0.0, 0.0]),
    ("bip01 r finger4nub", [0.0, 0.0, 0.0]),
    ("l hand webbing", [0.0, 0.0, 0.0]),
    ("r hand webbing", [0.0, 0.0, 0.0]),
    ("r cuff", [0.0, 0.0, 0.0]),
    ("r cuff01", [0.0, 0.0, 0.0]),
    ("r wrist", [0.0, 0.0, 0.0]),
    ("r wrist01", [0.0, 0.0, 0.0]),
];

/// Call of Duty 2
#[allow(clippy::excessive_precision)]
pub static VIEWHANDS_V20: &ViewhandTable = &[
    ("tag_view", [0.0, 0.0, 0.0]),
    ("tag_torso", [-11.76486, 0.0, -3.497466]),
    ("j_shoulder_le", [2.859542, 20.16072, -4.597286]),
    ("j_elbow_le", [30.7185, -8E-06, 3E-06]),
    ("j_wrist_le", [29.3906, 1.9E-05, -3E-06]),
    ("j_thumb_le_0", [2.786345, 2.245192, 0.85161]),
    ("j_thumb_le_1", [4.806596, -1E-06, 3E-06]),
    ("j_thumb_le_2", [2.433519, -2E-06, 1E-06]),
    ("j_thumb_le_3", [3.0, -1E-06, -1E-06]),
    ("j_flesh_le", [4.822557, 1.176307, -0.110341]),
    ("j_index_le_0", [10.53435, 2.786251, -3E-06]),
    ("j_index_le_1", [4.563, -3E-06, 1E-06]),
    ("j_index_le_2", [2.870304, 3E-06, -2E-06]),
    ("j_index_le_3", [2.999999, 4E-06, 1E-06]),
    ("j_mid_le_0", [10.71768, 0.362385, -0.38647]),
    ("j_mid_le_1", [4.842623, -1E-06, -1E-06]),
    ("j_mid_le_2", [2.957112, -1E-06, -1E-06]),
    ("j_mid_le_3", [3.000005, 4E-06, 0.0]),
    ("j_ring_le_0", [9.843364, -1.747671, -0.401116]),
    ("j_ring_le_1", [4.842618, 4E-06, -3E-06]),
    ("j_ring_le_2", [2.755294, -2E-06, 5E-06]),
    ("j_ring_le_3", [2.999998, -2E-06, -4E-06]),
    ("j_pinky_le_0", [8.613766, -3.707476, 0.16818]),
    ("j_pinky_le_1", [3.942609, 1E-06, 1E-06]),
    ("j_pinky_le_2", [1.794117, 3E-06, -3E-06]),
    ("j_pinky_le_3", [2.83939, -1E-06, 4E-06]),
    ("j_wristtwist_le", [21.60379, 1.2E-05, -3E-06]),
    ("j_shoulder_ri", [2.859542, -20.16072, -4.597286]),
    ("j_elbow_ri", [-30.71852, 4E-06, -2.4E-05]),
    ("j_wrist_ri", [-29.39067, 4.4E-05, 2.2E-05]),
    ("j_thumb_ri_0", [-2.786155, -2.245166, -0.851634]),
    ("j_thumb_ri_1", [-4.806832, -6.6E-05, 0.000141]),
    ("j_thumb_ri_2", [-2.433458, -3.8E-05, -5.3E-05]),
    ("j_thumb_ri_3", [-3.000123, 0.00016, 2.5E-05]),
    ("j_flesh_ri", [-4.822577, -1.176315, 0.110318]),
    ("j_index_ri_0", [-10.53432, -2.786281, -7E-06]),
    ("j_index_ri_1", [-4.562927, -5.8E-05, 5.4E-05]),
    ("j_index_ri_2", [-2.870313, -6.5E-05, 0.0001]),
    ("j_index_ri_3", [-2.999938, 0.000165, -6.5E-05]),
    ("j_mid_ri_0", [-10.71752, -0.362501, 0.386463]),
    ("j_mid_ri_1", [-4.842728, 0.000151, 2.8E-05]),
    ("j_mid_ri_2", [-2.957152, -8.7E-05, -2.2E-05]),
    ("j_mid_ri_3", [-3.00006, -6.8E-05, -1.9E-05]),
    ("j_ring_ri_0", [-9.843175, 1.747613, 0.401109]),
    ("j_ring_ri_1", [-4.842774, 0.000176, -6.3E-05]),
    ("j_ring_ri_2", [-2.755269, -1.1E-05, 0.000149]),
    ("j_ring_ri_3", [-3.000048, -4.1E-05, -4.9E-05]),
    ("j_pinky_ri_0", [-8.613756, 3.707438, -0.168202]),
    ("j_pinky_ri_1", [-3.942537, -0.000117, -6.5E-05]),
    ("j_pinky_ri_2", [-1.794038, 0.000134, 0.000215]),
    ("j_pinky_ri_3", [-2.839375, 5.6E-05, -0.000115]),
    ("j_wristtwist_ri", [-21.60388, 9.7E-05, 8E-06]),
    ("tag_weapon", [38.5059, 0.0, -17.15191]),
    ("tag_cambone", [0.0, 0.0, 0.0]),
    ("tag_camera", [0.0, 0.0, 0.0]),
];

/// Table for a model version; the newest format has none.
pub fn viewhand_table(version: ModelVersion) -> Option<&'static ViewhandTable> {
    match version {
        ModelVersion::V14 => Some(VIEWHANDS_V14),
        ModelVersion::V20 => Some(VIEWHANDS_V20),
        ModelVersion::V25 => None,
    }
}

/// Looks up a bone and converts its offset to the importer's units.
pub fn viewhand_position(table: &ViewhandTable, bone_name: &str) -> Option<Vec3> {
    table
        .iter()
        .find(|(name, _)| *name == bone_name)
        .map(|&(_, [x, y, z])| Vec3::new(x, y, z).div_scalar(INCH_TO_CM))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_per_version() {
        assert_eq!(VIEWHANDS_V14.len(), 55);
        assert_eq!(VIEWHANDS_V20.len(), 55);
        assert!(viewhand_table(ModelVersion::V25).is_none());
    }

    #[test]
    fn test_position_is_scaled() {
        let position = viewhand_position(VIEWHANDS_V20, "tag_torso").unwrap();
        assert!((position.x - (-11.76486 / 2.54)).abs() < 1e-6);
        assert_eq!(position.y, 0.0);
        assert!((position.z - (-3.497466 / 2.54)).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_bone() {
        assert!(viewhand_position(VIEWHANDS_V20, "j_knee_le").is_none());
        assert_eq!(
            viewhand_position(VIEWHANDS_V14, "bip01 l hand"),
            Some(Vec3::ZERO)
        );
    }
}
