//! Referral reason collection
//!
//! The order of reasons is surfaced verbatim to the clinician: emergency
//! vitals first, then warning signs in their declared order.

use crate::models::assessment::{EmergencyFlags, WarningFlags, WarningSign};

/// SpO2 at or below this percentage calls for referral
pub const SPO2_REFERRAL_THRESHOLD: f64 = 94.0;

/// Reason recorded for a weak pulse
pub const WEAK_PULSE_REASON: &str = "Weak pulse (Nadi lemah)";
/// Reason recorded for reduced consciousness
pub const POOR_CONSCIOUSNESS_REASON: &str = "Poor consciousness (Kesadaran buruk)";
/// Reason recorded for low oxygen saturation
pub const LOW_SPO2_REASON: &str = "SpO₂ ≤ 94%";

/// Whether a measured SpO2 is at or below the referral threshold
#[must_use]
pub fn is_low_oxygen(oxygen_saturation: Option<f64>) -> bool {
    oxygen_saturation.is_some_and(|spo2| spo2 <= SPO2_REFERRAL_THRESHOLD)
}

/// Emergency gate: any emergency vital sign overrides the lab diagnosis
#[must_use]
pub fn emergency_gate(emergency: &EmergencyFlags) -> bool {
    emergency.pulse_weak || emergency.consciousness_poor || is_low_oxygen(emergency.oxygen_saturation)
}

/// Collect the reasons for hospital referral in display order
#[must_use]
pub fn collect_referral_reasons(
    emergency: &EmergencyFlags,
    warnings: &WarningFlags,
) -> Vec<&'static str> {
    let mut reasons = Vec::new();

    if emergency.pulse_weak {
        reasons.push(WEAK_PULSE_REASON);
    }
    if emergency.consciousness_poor {
        reasons.push(POOR_CONSCIOUSNESS_REASON);
    }
    if is_low_oxygen(emergency.oxygen_saturation) {
        reasons.push(LOW_SPO2_REASON);
    }

    reasons.extend(
        WarningSign::ALL
            .into_iter()
            .filter(|sign| warnings.is_set(*sign))
            .map(WarningSign::label),
    );

    reasons
}
