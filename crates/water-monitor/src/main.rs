mod bootstrap;
mod report;

use anyhow::{Context, Result};
use water_core::models::Selection;
use water_core::settings::Settings;
use water_core::targets::ReferenceTable;
use water_core::time_utils::TimezoneHandler;
use water_data::analysis::compute_analytics;
use water_data::filter::{filter_valid, unique_labels};
use water_data::reader::load_records;

use crate::report::Report;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Water Monitor v{} starting", env!("CARGO_PKG_VERSION"));

    let tz = TimezoneHandler::try_new(&settings.timezone)?;
    let selection = build_selection(&settings, &tz)?;
    let data_path = settings.resolved_data_path();

    tracing::info!(
        "Data: {}, timezone: {}, date: {}, label: {}",
        data_path.display(),
        settings.timezone,
        selection
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "all".to_string()),
        selection.label.as_deref().unwrap_or("all")
    );

    let records = load_records(&data_path)
        .with_context(|| format!("loading readings from {}", data_path.display()))?;
    let readings = filter_valid(&records);
    let labels = unique_labels(&readings);
    tracing::info!(
        "{} of {} records usable, {} sources",
        readings.len(),
        records.len(),
        labels.len()
    );

    let analytics = compute_analytics(&readings, &selection, &tz, &ReferenceTable::new());
    if analytics.is_empty() {
        tracing::warn!("No readings match the current selection");
    }

    let report = Report::new(&analytics, &selection, &labels, &settings.timezone);
    match settings.format.as_str() {
        "json" => println!("{}", report.to_json()?),
        _ => print!("{}", report.to_text()),
    }

    Ok(())
}

/// Translate the `--date` / `--label` arguments into a [`Selection`].
///
/// `today` resolves against the configured timezone; `all` disables the
/// date filter.
fn build_selection(settings: &Settings, tz: &TimezoneHandler) -> Result<Selection> {
    let date = match settings.date.trim() {
        d if d.eq_ignore_ascii_case("all") => None,
        d if d.eq_ignore_ascii_case("today") => Some(tz.today().format("%Y-%m-%d").to_string()),
        d => Some(d.to_string()),
    };
    Ok(Selection::parse(date.as_deref(), settings.selected_label())?)
}
