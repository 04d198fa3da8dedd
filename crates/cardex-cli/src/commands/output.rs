//! Record formatting shared by `extract` and `batch`.

use cardex_core::{ExtractedRecord, FieldCategory};

/// Output format for extracted records.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// CSV columns for a record.
pub const CSV_HEADER: [&str; 9] = [
    "name",
    "email",
    "phone",
    "company",
    "job_title",
    "website",
    "address",
    "confidence",
    "level",
];

/// CSV cells for a record, matching [`CSV_HEADER`].
pub fn csv_row(record: &ExtractedRecord) -> Vec<String> {
    let mut row: Vec<String> = FieldCategory::ALL
        .into_iter()
        .map(|c| record.field(c).to_string())
        .collect();
    row.push(format!("{:.2}", record.confidence));
    row.push(record.level().to_string());
    row
}

pub fn format_record(
    record: &ExtractedRecord,
    format: OutputFormat,
    include_raw: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(record, include_raw),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_json(record: &ExtractedRecord, include_raw: bool) -> anyhow::Result<String> {
    if include_raw {
        return Ok(serde_json::to_string_pretty(record)?);
    }
    let trimmed = ExtractedRecord {
        raw_response: None,
        ..record.clone()
    };
    Ok(serde_json::to_string_pretty(&trimmed)?)
}

fn format_csv(record: &ExtractedRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(record))?;
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ExtractedRecord) -> String {
    let mut output = String::new();

    for category in FieldCategory::ALL {
        let value = record.field(category);
        if !value.is_empty() {
            output.push_str(&format!("{:<10} {}\n", format!("{}:", category.label()), value));
        }
    }
    if record.is_empty() {
        output.push_str("No fields extracted\n");
    }

    output.push_str(&format!(
        "\nConfidence: {:.1}% ({})\n",
        record.confidence * 100.0,
        record.level()
    ));

    if let Some(error) = &record.error {
        output.push_str(&format!("Parse error: {}\n", error));
    }

    output
}
