//! Component resolver: which optional fields a step collects.

use crate::error::ValidationError;
use crate::onboarding::model::{ComponentId, OnboardingConfig, Step};

/// The configured component list for a step.
///
/// Steps 2 and 3 read their lists from the config; step 1 collects no
/// optional components. An absent config yields the empty list. Both
/// the rendering payload and the submission filter use this exact list,
/// so the two can never disagree.
pub fn components_for_step(config: Option<&OnboardingConfig>, step: Step) -> Vec<ComponentId> {
    let Some(config) = config else {
        return Vec::new();
    };
    match step {
        Step::One => Vec::new(),
        Step::Two => config.step2_components.clone(),
        Step::Three => config.step3_components.clone(),
    }
}

/// Validate raw component ids from an admin submission against the
/// fixed vocabulary.
///
/// Duplicates collapse (first occurrence wins); any unknown id rejects
/// the whole set before persistence.
pub fn parse_component_set(raw: &[String]) -> Result<Vec<ComponentId>, ValidationError> {
    let mut known = Vec::new();
    let mut unknown = Vec::new();
    for id in raw {
        match id.parse::<ComponentId>() {
            Ok(component) => {
                if !known.contains(&component) {
                    known.push(component);
                }
            }
            Err(_) => unknown.push(id.clone()),
        }
    }
    if unknown.is_empty() {
        Ok(known)
    } else {
        Err(ValidationError::UnknownComponents(unknown))
    }
}
