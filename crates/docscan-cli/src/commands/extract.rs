//! Extract command - scan a single image file locally.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use docscan_core::{DocumentFields, DocumentScanner, FieldKind};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input image
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let filename = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    if !config.server.is_allowed_file(filename) {
        anyhow::bail!(
            "Unsupported file type: {} (accepted: {})",
            args.input.display(),
            config.server.allowed_extensions.join(", ")
        );
    }

    info!("Processing file: {}", args.input.display());

    let input = args.input.clone();
    let fields = tokio::task::spawn_blocking(move || -> anyhow::Result<DocumentFields> {
        let scanner = DocumentScanner::from_config(&config.ocr)?;
        Ok(scanner.scan_path(&input)?)
    })
    .await??;

    let output = format_fields(&fields, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if fields.is_empty() {
        eprintln!(
            "{} No fields could be extracted",
            style("ℹ").blue()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_fields(fields: &DocumentFields, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
        OutputFormat::Csv => format_csv(fields),
        OutputFormat::Text => Ok(format_text(fields)),
    }
}

fn format_csv(fields: &DocumentFields) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(FieldKind::ALL.map(FieldKind::key))?;
    wtr.write_record(FieldKind::ALL.map(|kind| fields.get(kind).unwrap_or("")))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(fields: &DocumentFields) -> String {
    let mut output = String::new();

    for (label, kind) in [
        ("Name", FieldKind::Name),
        ("Document number", FieldKind::DocumentNumber),
        ("Expiration date", FieldKind::ExpirationDate),
    ] {
        let value = fields.get(kind).unwrap_or("-");
        output.push_str(&format!("{:<16} {}\n", format!("{}:", label), value));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DocumentFields {
        DocumentFields {
            name: Some("JANE DOE".to_string()),
            document_number: None,
            expiration_date: Some("12/31/2099".to_string()),
        }
    }

    #[test]
    fn test_format_csv() {
        let csv = format_fields(&sample(), OutputFormat::Csv).unwrap();

        assert_eq!(
            csv,
            "name,document_number,expiration_date\nJANE DOE,,12/31/2099\n"
        );
    }

    #[test]
    fn test_format_text() {
        let text = format_fields(&sample(), OutputFormat::Text).unwrap();

        assert_eq!(
            text,
            "Name:            JANE DOE\n\
             Document number: -\n\
             Expiration date: 12/31/2099\n"
        );
    }

    #[test]
    fn test_format_json() {
        let json = format_fields(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["document_number"], serde_json::Value::Null);
        assert_eq!(value["name"], "JANE DOE");
    }
}
