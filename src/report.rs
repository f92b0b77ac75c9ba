//! Rendering of analysis results for the terminal.

use crate::abjad;
use crate::pipeline::InferenceResult;
use owo_colors::OwoColorize;

/// Output format for the analysis report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}. Available: text, json", s)),
        }
    }
}

/// JSON report with the stable key set
/// (`text`, `surah`, `ayah`, `tajweed_errors`, `pronunciation_score`).
pub fn render_json(result: &InferenceResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// Human-readable report, enriched with the Abjad value of the
/// transcription.
pub fn print_text(result: &InferenceResult) {
    println!("Recitation analysis:");
    println!("  {}      {}", "Text:".dimmed(), result.text);
    println!("  {}     {}", "Surah:".dimmed(), result.surah);
    println!("  {}      {}", "Ayah:".dimmed(), result.ayah);

    if result.tajweed_errors.is_empty() {
        println!("  {}   {}", "Tajweed:".dimmed(), "no errors detected".green());
    } else {
        let joined = result
            .tajweed_errors
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {}   {}", "Tajweed:".dimmed(), joined.yellow());
    }

    println!(
        "  {}     {}/100",
        "Score:".dimmed(),
        result.pronunciation_score
    );

    println!("  {}     {}", "Abjad:".dimmed(), abjad::value(&result.text));
    if abjad::validate_bismillah(&result.text) {
        println!("  {} {}", "Bismillah:".dimmed(), "valid (786)".green());
    }
}
