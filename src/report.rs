use std::fmt::Write as FmtWrite;

use colored::*;

use crate::aggregate::{Aggregate, AggregateStats};
use crate::language::LANGUAGES;
use crate::scan::ScanOutcome;

const LANG_WIDTH: usize = 16;
const TABLE_WIDTH: usize = LANG_WIDTH + 5 * 11;

fn format_row(label: &str, stats: &AggregateStats) -> String {
    format!(
        "{:<width$} {:>10} {:>10} {:>10} {:>10} {:>10}",
        label,
        stats.files,
        stats.total,
        stats.empty,
        stats.comment,
        stats.code,
        width = LANG_WIDTH
    )
}

fn safe_percentage(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        (numerator as f64 / denominator as f64) * 100.0
    }
}

/// Render the per-language table followed by a `TOTAL` row.
pub fn build_table(aggregate: &Aggregate) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<width$} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Language",
        "Files",
        "Total",
        "Empty",
        "Comment",
        "Code",
        width = LANG_WIDTH
    );
    let _ = writeln!(output, "{}", "-".repeat(TABLE_WIDTH));
    for (lang, stats) in aggregate.iter() {
        let _ = writeln!(output, "{}", format_row(lang, stats));
    }
    let _ = writeln!(output, "{}", "-".repeat(TABLE_WIDTH));
    let _ = writeln!(output, "{}", format_row("TOTAL", &aggregate.grand_total()));
    output
}

pub fn build_analysis_report(outcome: &ScanOutcome) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "\n{}", "Line statistics by language:".blue().bold());
    output.push_str(&build_table(&outcome.aggregate));

    if !outcome.aggregate.is_empty() {
        let grand = outcome.aggregate.grand_total();
        let _ = writeln!(output, "\n{}", "Overall Summary:".blue().bold());
        for (label, value) in [
            ("Code lines:   ", grand.code),
            ("Comment lines:", grand.comment),
            ("Empty lines:  ", grand.empty),
        ] {
            let _ = writeln!(
                output,
                "{} {} ({})",
                label,
                value.to_string().bright_yellow(),
                format!("{:.1}%", safe_percentage(value, grand.total)).bright_yellow()
            );
        }
    }

    if outcome.warning_count() > 0 {
        let _ = writeln!(
            output,
            "\n{}: {} unreadable file(s), {} traversal error(s)",
            "Warning".red().bold(),
            outcome.unreadable_files.to_string().bright_yellow(),
            outcome.traversal_errors.to_string().bright_yellow()
        );
    }
    output
}

pub fn build_language_list() -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Supported languages:");
    for lang in LANGUAGES {
        let _ = writeln!(
            output,
            "  {:<width$} {}",
            lang.name,
            lang.extensions.join(" "),
            width = LANG_WIDTH
        );
    }
    output
}
