//! Febrile triage rules
//!
//! Maps vitals, warning signs and blood counts to a triage outcome
//! (emergency referral, bacterial, viral or inconclusive), the NLCR and the
//! reference sensitivity/specificity of the rule.

pub mod classifier;
pub mod evaluator;
pub mod nlcr;
pub mod normalize;
pub mod recommendation;
pub mod referral;

pub use classifier::{Classification, Confidence, classify, confidence_for};
pub use evaluator::{assess, evaluate, evaluate_batch, reevaluate_records};
pub use nlcr::compute_nlcr;
pub use normalize::{normalize, normalize_count, normalize_form, normalize_opt, normalize_or};
pub use recommendation::compose_recommendation;
pub use referral::{collect_referral_reasons, emergency_gate};
