//! Expert symptom severity rules
//!
//! Hand-authored mapping from known-critical symptom flags to a guaranteed
//! minimum ESI level. Table order is significant: the decision engine scans
//! entries in definition order and the first rule wins on severity ties.

/// A single expert rule: symptom flag name and its ESI severity rank.
///
/// Severity is on the ESI scale, 1 = most critical, 5 = least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityRule {
    pub symptom: &'static str,
    pub severity: u8,
}

const fn rule(symptom: &'static str, severity: u8) -> SeverityRule {
    SeverityRule { symptom, severity }
}

/// The symptom severity table, in definition order.
///
/// Ranks 1-3 cause the decision engine to bypass the model entirely;
/// a matched keyword alone is sufficient signal for urgent conditions.
pub const SYMPTOM_SEVERITY_TABLE: &[SeverityRule] = &[
    rule("cardiaarrst", 1),
    rule("cc_unresponsive", 1),
    rule("shock", 1),
    rule("acutemi", 2),
    rule("acutecvd", 2),
    rule("respdistres", 2),
    rule("septicemia", 2),
    rule("syncope", 2),
    rule("burns", 2),
    rule("intracrninj", 2),
    rule("gihemorrhag", 2),
    rule("coaghemrdx", 2),
    rule("aneurysm", 2),
    rule("chestpain", 3),
    rule("abdomnlpain", 3),
    rule("pneumonia", 3),
    rule("dysrhythmia", 3),
    rule("chfnonhp", 3),
];

/// Look up the severity rank for a symptom identifier.
pub fn severity_for(symptom: &str) -> Option<u8> {
    SYMPTOM_SEVERITY_TABLE
        .iter()
        .find(|r| r.symptom == symptom)
        .map(|r| r.severity)
}
