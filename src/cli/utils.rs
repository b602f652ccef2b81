use anyhow::Context;
use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::config;
use crate::database::{DatabaseManager, PgRepository};

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let (Some(response), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                response.extend(extra);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a list under `collection_name`, or `text_row` per item as text.
pub fn output_collection<T: Serialize>(
    output_format: OutputFormat,
    collection_name: &str,
    items: &[T],
    empty_message: &str,
    text_row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: items }))?);
        }
        OutputFormat::Text if items.is_empty() => println!("{}", empty_message),
        OutputFormat::Text => {
            for item in items {
                println!("{}", text_row(item));
            }
        }
    }
    Ok(())
}

/// Connect to the configured database for administrative commands.
pub async fn connect_repository() -> anyhow::Result<PgRepository> {
    let pool = DatabaseManager::connect(&config::config().database)
        .await
        .context("failed to connect to database")?;
    Ok(PgRepository::new(pool))
}
