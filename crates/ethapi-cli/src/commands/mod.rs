//! CLI command implementations

pub mod account;
pub mod query;
pub mod tx;

use serde::Serialize;

use crate::{output::Output, CliError};

/// Print a lookup result, or a not-found note when the node returned null
pub(crate) fn print_lookup<T: Serialize>(
    json: bool,
    key: &str,
    value: Option<T>,
    what: &str,
) -> Result<(), CliError> {
    match value {
        Some(value) => {
            let pretty = serde_json::to_string_pretty(&value)?;
            Output::new(json)
                .field_json(key, &value)?
                .field_bool("found", true)
                .message(&pretty)
                .print();
        }
        None => {
            Output::new(json)
                .field_value(key, serde_json::Value::Null)
                .field_bool("found", false)
                .message(&format!("{} not found", what))
                .print();
        }
    }
    Ok(())
}
