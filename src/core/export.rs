use crate::domain::model::{Dataset, Table};
use crate::utils::error::{ReportError, Result};
use chrono::{DateTime, TimeZone};
use csv::{QuoteStyle, Terminator, WriterBuilder};

/// Header plus one record per row; every field quoted, quotes doubled.
pub fn to_csv(table: &Table) -> Result<String> {
    if table.columns.is_empty() {
        return Ok(String::new());
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::processing(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| ReportError::processing(format!("CSV is not valid UTF-8: {}", e)))
}

/// `cloudbeds_<dataset>_<property>_<YYYYMMDD_HHMMSS>.csv`
pub fn export_filename<Tz: TimeZone>(
    dataset: Dataset,
    property_id: &str,
    at: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let property: String = property_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    format!(
        "{}_{}_{}.csv",
        dataset.file_stem(),
        property,
        at.format("%Y%m%d_%H%M%S")
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

pub fn render_html_table(table: &Table) -> String {
    if table.is_empty() {
        return "<p class=\"no-data\">No data</p>".to_string();
    }

    let mut html = String::from("<table class=\"report\">\n<thead><tr>");
    for col in &table.columns {
        html.push_str("<th>");
        html.push_str(&escape_html(col));
        html.push_str("</th>");
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str("<td>");
            html.push_str(&escape_html(cell));
            html.push_str("</td>");
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>");
    html
}
