//! Deterministic synthesized results for mock mode.
//!
//! No randomness: the decision depends only on the case and principle, and
//! confidence only on the target, the provider and the number of modifiers.

use crate::core::provider::ProviderId;
use crate::experiment::input::{MAX_CONFIDENCE, MIN_CONFIDENCE, ThoughtExperimentInput};
use crate::experiment::principle::Principle;
use crate::result::model_result::{Decision, FIRST_RUN, MAX_KEY_ASSUMPTIONS, ModelResult};

/// Confidence added per conditional modifier
const CONDITION_BOOST: i64 = 2;

/// Extra confidence the care-oriented provider gets under the care principle
const CARE_BIAS: i64 = 3;

/// Clamp a confidence value into the valid result range
pub fn clamp_confidence(value: i64) -> i64 {
    value.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Decision a mock provider makes for a case under a principle
pub fn mock_decision(case_id: &str, principle: Principle) -> Decision {
    match principle {
        Principle::Utilitarian | Principle::Care | Principle::Fairness => Decision::A,
        Principle::Deontology | Principle::SelfDetermination => Decision::B,
        Principle::Risk if case_id == "trolley" => Decision::A,
        Principle::Risk => Decision::B,
        Principle::None => Decision::A,
    }
}

/// Synthesize one provider's result for an already validated input
pub fn mock_result(provider: ProviderId, input: &ThoughtExperimentInput) -> ModelResult {
    let decision = mock_decision(&input.case_id, input.principle_id);

    let care_bias = if provider == ProviderId::Claude && input.principle_id == Principle::Care {
        CARE_BIAS
    } else {
        0
    };
    let condition_boost = input.if_conditions.len() as i64 * CONDITION_BOOST;
    let confidence = clamp_confidence(
        input.target_confidence + i64::from(provider.mock_bias()) + care_bias + condition_boost,
    );

    let (key_assumptions, what_changed_by_if) = if input.if_conditions.is_empty() {
        (vec!["前提条件は特になし".to_string()], FIRST_RUN.to_string())
    } else {
        (
            input
                .if_conditions
                .iter()
                .take(MAX_KEY_ASSUMPTIONS)
                .cloned()
                .collect(),
            "if条件により前提を調整".to_string(),
        )
    };

    ModelResult {
        decision,
        confidence,
        key_assumptions,
        reasoning_summary: format!("{}の観点から{}を選ぶ。", input.principle_id.id(), decision),
        what_changed_by_if,
    }
}
