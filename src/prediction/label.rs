use crate::error::{FleroviumError, Result};
use crate::prediction::types::{PredictionBundle, TargetCoordinate};

/// Which signal picked the region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// A detection of the requested class. `classification_agrees` records whether
    /// the paired classifier also named the label; it never changes the outcome.
    Detection { classification_agrees: bool },

    /// No detection had the class, the classifier's top class matched instead
    Classification,
}

/// Outcome of resolving a label against a prediction bundle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelResolution {
    pub coordinate: TargetCoordinate,
    /// Position of the chosen region in the bundle
    pub index: usize,
    pub source: ResolutionSource,
}

impl LabelResolution {
    /// False when detection and classification disagreed about the chosen region
    pub fn classification_agrees(&self) -> bool {
        match self.source {
            ResolutionSource::Detection { classification_agrees } => classification_agrees,
            ResolutionSource::Classification => true,
        }
    }
}

/// Resolve a semantic label to a single pixel coordinate.
///
/// Detections whose class equals `label` win, and among them the lowest index.
/// Confidence is not consulted. When no detection carries the class, the first
/// region whose classification top class equals `label` is used.
pub fn resolve_label(bundle: &PredictionBundle, label: &str) -> Result<LabelResolution> {
    if bundle.is_empty() {
        return Err(FleroviumError::NoPredictions);
    }

    let candidates: Vec<usize> = bundle
        .regions()
        .iter()
        .enumerate()
        .filter(|(_, region)| region.detection.class_name == label)
        .map(|(index, _)| index)
        .collect();

    log::debug!("{} detection(s) of class '{}' out of {}", candidates.len(), label, bundle.len());

    match candidates.first() {
        Some(&index) => {
            let region = &bundle.regions()[index];
            let classification_agrees = region.classification.top_class == label;

            if !classification_agrees {
                log::warn!(
                    "Detection {} is '{}' but its classification is '{}', keeping the detection",
                    index,
                    label,
                    region.classification.top_class
                );
            }

            Ok(LabelResolution {
                coordinate: region.detection.center(),
                index,
                source: ResolutionSource::Detection { classification_agrees },
            })
        }
        None => resolve_by_classification(bundle, label),
    }
}

fn resolve_by_classification(bundle: &PredictionBundle, label: &str) -> Result<LabelResolution> {
    bundle
        .regions()
        .iter()
        .position(|region| region.classification.top_class == label)
        .map(|index| {
            log::debug!("Label '{}' resolved by classification at region {}", label, index);
            LabelResolution {
                coordinate: bundle.regions()[index].detection.center(),
                index,
                source: ResolutionSource::Classification,
            }
        })
        .ok_or_else(|| FleroviumError::NoMatchingClass(label.to_string()))
}
