use anyhow::{Context, Result};
use colored::Colorize;
use medcheck_core::config::{CheckerConfig, RecorderMode};
use medcheck_infrastructure::{ConfigService, JsonlSessionRecordRepository};

pub async fn list(service: &ConfigService, config: &CheckerConfig) -> Result<()> {
    let path = service
        .records_file(config)
        .context("Failed to resolve record file")?;
    if config.recorder.mode != RecorderMode::File {
        println!(
            "{}",
            format!(
                "Recorder mode is '{:?}'; only file-mode sessions are listed here.",
                config.recorder.mode
            )
            .bright_black()
        );
    }

    let repository = JsonlSessionRecordRepository::new(&path);
    let records = repository
        .read_all()
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if records.is_empty() {
        println!("No recorded sessions in {}", path.display());
        return Ok(());
    }

    for record in records {
        let patient = match (record.age, record.sex) {
            (Some(age), Some(sex)) => format!("{age}, {sex}"),
            _ => "unknown patient".to_string(),
        };
        let condition = record
            .selected_condition
            .map(|c| format!("{} ({})", c.name, c.probability))
            .unwrap_or_else(|| "no selection".to_string());

        println!(
            "{}  {}  {}",
            record.completed_at.bright_black(),
            patient.cyan(),
            condition.bold()
        );
        println!("    {}", record.symptoms);
    }
    Ok(())
}
