//! Declares validations for a contact record from JSON and validates a few records.
//!
//! Run with `RUST_LOG=debug VALIDATION_LOG_FORMAT=json` to see composition events.

use serde_json::json;
use validated_attrs::prelude::*;
use validated_attrs::utils::logging::init_logging;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_logging()?;

    let validations = RecordValidations::from_json(
        &Composer::builtin(),
        &json!({
            "username": {"format": "username", "maximum_length": 32},
            "email": {"format": "email"},
            "phone": {"format": "phone_number"},
            "extension": {"format": "phone_extension", "if_present": "phone"},
            "zip": {"format": "zipcode"},
            "notes": {"format": "safe_text"},
        }),
    )?
    .with_engine(ValidationEngine::with_config(ValidationConfig::from_env()));

    let records = [
        json!({"username": "kansascity", "email": "kc@example.com", "zip": "64105"}),
        json!({"username": "kc", "email": "kc@example", "phone": "555", "extension": "x12"}),
        json!({"username": "omaha.ne", "email": "omaha@example.com", "notes": "<b>hi</b>"}),
    ];

    for record in &records {
        let Some(fields) = record.as_object() else {
            continue;
        };
        let errors = validations.validate(fields);
        if errors.is_valid() {
            println!("{} is valid", record);
        } else {
            println!("{} has errors:", record);
            for message in errors.full_messages() {
                println!("  - {}", message);
            }
        }
    }

    Ok(())
}
