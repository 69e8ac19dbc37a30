//! Export and import commands

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use diem_core::db::Database;
use diem_core::{export_finance_csv, export_full, import_full, FullExport, ImportStats, PeriodMode};

use super::today;

/// Write finance CSV to `output`, or stdout when no file is given
pub fn cmd_export_finance(
    db: &Database,
    user: &str,
    output: Option<&Path>,
    period: Option<&str>,
) -> Result<()> {
    let mode = period
        .map(|p| PeriodMode::parse(p, None, None))
        .transpose()?;
    let csv = export_finance_csv(db, user, mode, today())?;
    let rows = csv.lines().count().saturating_sub(1);

    db.log_audit(
        user,
        "export_finance",
        Some("finance"),
        None,
        Some(&format!(
            "period={}, rows={}",
            mode.map(|m| m.label()).unwrap_or_else(|| "all".to_string()),
            rows
        )),
    )?;

    match output {
        Some(path) => {
            fs::write(path, &csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✅ Exported {} finance entries to {}", rows, path.display());
        }
        None => print!("{}", csv),
    }

    Ok(())
}

pub fn cmd_export_full(db: &Database, user: &str, output: &Path) -> Result<()> {
    let export = export_full(db, user)?;
    let json = serde_json::to_string_pretty(&export)?;
    fs::write(output, json).with_context(|| format!("Failed to write {}", output.display()))?;

    db.log_audit(
        user,
        "export_full",
        None,
        None,
        Some(&format!(
            "version={}, total_records={}",
            export.version,
            export.total_records()
        )),
    )?;

    println!(
        "✅ Exported {} entries across {} trackers to {}",
        export.total_records(),
        export.entries.len(),
        output.display()
    );
    Ok(())
}

pub fn cmd_import(db: &Database, user: &str, file: &Path, clear: bool) -> Result<ImportStats> {
    let content =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let export: FullExport = serde_json::from_str(&content).context("Invalid export file")?;

    println!(
        "📥 Importing {} entries (exported {} by {})...",
        export.total_records(),
        export.exported_at,
        export.user_id
    );

    if clear {
        let removed = db.clear_entries(user)?;
        println!("   Removed {} existing entries", removed);
    }

    let stats = import_full(db, user, &export)?;

    db.log_audit(
        user,
        "import_full",
        None,
        None,
        Some(&format!(
            "imported={}, skipped={}, clear={}",
            stats.total_imported(),
            stats.skipped,
            clear
        )),
    )?;

    for (kind, count) in &stats.imported {
        println!("   {:<12} {}", kind.title(), count);
    }
    if stats.skipped > 0 {
        println!("   ⚠️  Skipped {} invalid entries:", stats.skipped);
        for error in &stats.errors {
            println!("      {}", error);
        }
    }
    println!("✅ Imported {} entries", stats.total_imported());

    Ok(stats)
}
