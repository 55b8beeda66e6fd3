use crate::core::client::{ApiClient, SOURCES_PATH};
use crate::core::table::{cell_text, normalize, Row};
use crate::domain::model::{Credentials, Record, Table};
use crate::domain::ports::{ConfigProvider, ReportPipeline};
use crate::utils::error::Result;
use serde_json::Value;

pub const SOURCE_FIELDS: [&str; 7] = [
    "propertyID",
    "sourceID",
    "sourceName",
    "isThirdParty",
    "status",
    "commission",
    "paymentCollect",
];
pub const TAX_FIELDS: [&str; 5] = ["taxID", "name", "amount", "amountType", "type"];
pub const FEE_FIELDS: [&str; 5] = ["feeID", "name", "amount", "amountType", "type"];

/// Booking-channel sources of a property, one row per source.
pub struct SourcesReport<'a, C: ConfigProvider> {
    client: &'a ApiClient<C>,
    credentials: Credentials,
}

impl<'a, C: ConfigProvider> SourcesReport<'a, C> {
    pub fn new(client: &'a ApiClient<C>, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }
}

#[async_trait::async_trait]
impl<'a, C: ConfigProvider> ReportPipeline for SourcesReport<'a, C> {
    type Raw = Vec<Record>;

    fn name(&self) -> &str {
        "sources"
    }

    async fn extract(&self) -> Result<Vec<Record>> {
        tracing::info!(
            "🚀 Fetching sources for property {}",
            self.credentials.property_id
        );
        self.client
            .fetch_all_pages(SOURCES_PATH, &self.credentials)
            .await
    }

    async fn transform(&self, raw: Vec<Record>) -> Result<Table> {
        Ok(flatten_sources(&raw))
    }
}

/// Flattens sources with the fixed column order: base fields, then `tax_<n>_*`
/// groups, then `fee_<n>_*` groups.
pub fn flatten_sources(sources: &[Record]) -> Table {
    let mut max_taxes = 0;
    let mut max_fees = 0;
    let mut rows = Vec::with_capacity(sources.len());

    for source in sources {
        let mut row = Row::new();
        for field in SOURCE_FIELDS {
            row.insert(field.to_string(), field_text(source.get(field)));
        }
        max_taxes = max_taxes.max(flatten_group(source.get("taxes"), "tax", &TAX_FIELDS, &mut row));
        max_fees = max_fees.max(flatten_group(source.get("fees"), "fee", &FEE_FIELDS, &mut row));
        rows.push(row);
    }

    let mut columns: Vec<String> = SOURCE_FIELDS.iter().map(|f| f.to_string()).collect();
    columns.extend(group_columns("tax", &TAX_FIELDS, max_taxes));
    columns.extend(group_columns("fee", &FEE_FIELDS, max_fees));

    normalize(rows, columns)
}

fn field_text(value: Option<&Value>) -> String {
    value.map(cell_text).unwrap_or_default()
}

/// Writes `<prefix>_<n>_<field>` cells for each object in `items`; returns the
/// highest group number written.
fn flatten_group(items: Option<&Value>, prefix: &str, fields: &[&str], row: &mut Row) -> usize {
    let Some(Value::Array(items)) = items else {
        return 0;
    };

    let mut highest = 0;
    for (idx, item) in items.iter().enumerate() {
        if let Value::Object(obj) = item {
            let num = idx + 1;
            for field in fields {
                row.insert(
                    format!("{}_{}_{}", prefix, num, field),
                    field_text(obj.get(*field)),
                );
            }
            highest = num;
        }
    }
    highest
}

fn group_columns(prefix: &str, fields: &[&str], count: usize) -> Vec<String> {
    (1..=count)
        .flat_map(|num| {
            fields
                .iter()
                .map(move |field| format!("{}_{}_{}", prefix, num, field))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(obj) => Record::new(obj),
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_flatten_sources_base_fields_only() {
        let sources = vec![record(json!({
            "propertyID": "6000",
            "sourceID": "s-1",
            "sourceName": "Walk-In",
            "isThirdParty": false,
            "status": true,
            "commission": 0,
            "paymentCollect": null
        }))];

        let table = flatten_sources(&sources);

        assert_eq!(table.columns, SOURCE_FIELDS.to_vec());
        assert_eq!(
            table.rows[0],
            vec!["6000", "s-1", "Walk-In", "false", "true", "0", ""]
        );
    }

    #[test]
    fn test_flatten_sources_taxes_and_fees_column_order() {
        let sources = vec![
            record(json!({
                "sourceID": "s-1",
                "taxes": [
                    {"taxID": "t1", "name": "VAT", "amount": 10, "amountType": "percentage", "type": "exclusive"},
                    {"taxID": "t2", "name": "City", "amount": 2, "amountType": "fixed", "type": "inclusive"}
                ],
                "fees": [{"feeID": "f1", "name": "Cleaning", "amount": 15, "amountType": "fixed", "type": "exclusive"}]
            })),
            record(json!({"sourceID": "s-2", "taxes": [], "fees": null})),
        ];

        let table = flatten_sources(&sources);

        let expected_tail = [
            "tax_1_taxID", "tax_1_name", "tax_1_amount", "tax_1_amountType", "tax_1_type",
            "tax_2_taxID", "tax_2_name", "tax_2_amount", "tax_2_amountType", "tax_2_type",
            "fee_1_feeID", "fee_1_name", "fee_1_amount", "fee_1_amountType", "fee_1_type",
        ];
        assert_eq!(table.columns.len(), SOURCE_FIELDS.len() + expected_tail.len());
        assert_eq!(&table.columns[SOURCE_FIELDS.len()..], &expected_tail);

        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.iter().all(|row| row.len() == table.columns.len()));

        let tax_2_name = table.columns.iter().position(|c| c == "tax_2_name").unwrap();
        assert_eq!(table.rows[0][tax_2_name], "City");
        assert_eq!(table.rows[1][tax_2_name], "");
    }

    #[test]
    fn test_flatten_sources_skips_null_tax_entries_but_keeps_numbering() {
        let sources = vec![record(json!({
            "sourceID": "s-1",
            "taxes": [null, {"taxID": "t2", "name": "City"}]
        }))];

        let table = flatten_sources(&sources);

        let idx = table.columns.iter().position(|c| c == "tax_2_taxID").unwrap();
        assert_eq!(table.rows[0][idx], "t2");
        let idx = table.columns.iter().position(|c| c == "tax_1_taxID").unwrap();
        assert_eq!(table.rows[0][idx], "");
    }

    #[test]
    fn test_flatten_sources_empty_input() {
        let table = flatten_sources(&[]);
        assert!(table.is_empty());
        assert_eq!(table.columns, SOURCE_FIELDS.to_vec());
    }
}
