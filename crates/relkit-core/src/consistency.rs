use relkit_model::IncidentRecord;

/// Returns true when `current` regresses in operating time relative to
/// `previous`. Both records are expected to belong to the same unit.
pub fn is_inconsistent(previous: &IncidentRecord, current: &IncidentRecord) -> bool {
    current.age_at_incident < previous.age_at_incident
}
