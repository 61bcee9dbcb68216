use crate::error::CartResult;
use crate::models::RunReport;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

fn ensure_parent(path: &Path) -> CartResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// 写出 JSON 报告 (自动创建父目录)
pub fn write_json(report: &RunReport, output_path: &Path) -> CartResult<()> {
    ensure_parent(output_path)?;
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    tracing::info!("Report written to {}", output_path.display());
    Ok(())
}

fn option_to_csv(val: &Option<String>) -> String {
    val.clone().unwrap_or_default()
}

/// 导出逐行结果到 CSV
pub fn write_csv(report: &RunReport, output_path: &Path) -> CartResult<()> {
    use csv::Writer;

    ensure_parent(output_path)?;
    let file = File::create(output_path)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record([
        "raw",
        "query",
        "alt_query",
        "status",
        "confidence",
        "used_alternate",
        "chosen_title",
        "chosen_url",
        "chosen_size",
        "chosen_price",
        "relevance",
    ])?;

    for item in &report.items {
        writer.write_record(&[
            item.raw.clone(),
            item.query.clone(),
            option_to_csv(&item.alt_query),
            item.status.to_string(),
            item.confidence.clone(),
            item.used_alternate.to_string(),
            option_to_csv(&item.chosen_title),
            option_to_csv(&item.chosen_url),
            option_to_csv(&item.chosen_size),
            option_to_csv(&item.chosen_price),
            item.relevance.map(|r| format!("{:.3}", r)).unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
