use crate::error::{FleroviumError, Result};
use crate::prediction::types::{PredictionBundle, TargetCoordinate, TextRoleScore};

/// Separator used to batch text fragments into one classification request
pub const FRAGMENT_DELIMITER: &str = "||";

/// Join fragments for the batch text classifier
pub fn join_fragments(fragments: &[String]) -> String {
    fragments.join(FRAGMENT_DELIMITER)
}

/// Index of the highest-probability score for `role`.
///
/// The comparison is strict, so the first of several equal maxima wins.
/// Returns `None` when no score has the role.
pub fn highest_probability_index(scores: &[TextRoleScore], role: &str) -> Option<usize> {
    let mut highest_index = None;
    let mut highest_probability = f64::NEG_INFINITY;

    for (index, score) in scores.iter().enumerate() {
        if score.role == role && score.probability > highest_probability {
            highest_probability = score.probability;
            highest_index = Some(index);
        }
    }

    highest_index
}

/// Resolve a fillable field from text-role scores.
///
/// The scores pick the index; the detection at that index supplies the
/// coordinate. Detection classes are not consulted.
pub fn resolve_form_field(bundle: &PredictionBundle, scores: &[TextRoleScore], label: &str) -> Result<TargetCoordinate> {
    let index =
        highest_probability_index(scores, label).ok_or_else(|| FleroviumError::NoMatchingClass(label.to_string()))?;

    let region = bundle.get(index).ok_or_else(|| {
        FleroviumError::InvalidCoordinate(format!(
            "text score {} for '{}' has no detection ({} regions)",
            index,
            label,
            bundle.len()
        ))
    })?;

    log::debug!(
        "Field '{}' resolved to region {} ('{}', p={})",
        label,
        index,
        scores[index].text,
        scores[index].probability
    );

    Ok(region.detection.center())
}
