//! Shared fixtures for unit tests.

use crate::fields::{FieldId, StepSnapshot};

/// A fully valid set of four step snapshots.
pub fn valid_steps() -> [StepSnapshot; 4] {
    let mut client_info = StepSnapshot::new();
    client_info.insert(FieldId::ClientType, "citizen".to_string());
    client_info.insert(FieldId::Date, "2024-05-10".to_string());
    client_info.insert(FieldId::Age, "35".to_string());
    client_info.insert(FieldId::ServiceAvailed, "Business permit".to_string());
    client_info.insert(FieldId::RegionOfResidence, "Region IV-A".to_string());
    client_info.insert(FieldId::Sex, "Female".to_string());

    let mut charter = StepSnapshot::new();
    charter.insert(FieldId::Cc1, "1".to_string());
    charter.insert(FieldId::Cc2, "Easy to see".to_string());
    charter.insert(FieldId::Cc3, "Helped very much".to_string());

    let mut service_quality = StepSnapshot::new();
    for (i, field) in [
        FieldId::Sqd0,
        FieldId::Sqd1,
        FieldId::Sqd2,
        FieldId::Sqd3,
        FieldId::Sqd4,
        FieldId::Sqd5,
        FieldId::Sqd6,
        FieldId::Sqd7,
        FieldId::Sqd8,
    ]
    .iter()
    .enumerate()
    {
        service_quality.insert(*field, ((i % 5) + 1).to_string());
    }

    let mut feedback = StepSnapshot::new();
    feedback.insert(FieldId::Suggestions, "Faster queues please".to_string());
    feedback.insert(FieldId::Email, "user@example.com".to_string());

    [client_info, charter, service_quality, feedback]
}
