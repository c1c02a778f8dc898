//! CLI integration tests.
//!
//! Tests cover:
//! - Settings resolution (build_settings) from flags, INI files and defaults
//! - Query execution and rendering in text and JSON
//! - Summary and info reports over real CSV files on disk

mod common;

use common::*;
use salesagg::adapters::csv_adapter::CsvAdapter;
use salesagg::adapters::file_config_adapter::FileConfigAdapter;
use salesagg::cli::{self, OutputFormat, Query, Settings, SourceArgs};
use salesagg::domain::engine::SalesEngine;
use salesagg::domain::error::SalesError;
use salesagg::domain::snapshot::SalesSnapshot;
use std::path::PathBuf;

const VALID_INI: &str = r#"
[data]
path = /srv/sales/sales_data.csv

[output]
format = json
pretty = false
"#;

fn settings(format: OutputFormat) -> Settings {
    Settings {
        data_path: PathBuf::from("sales_data.csv"),
        format,
        pretty: false,
    }
}

fn run_query(query: Query, engine: &SalesEngine, format: OutputFormat) -> (bool, String) {
    let mut out = Vec::new();
    let ok = cli::execute(query, engine, &settings(format), &mut out).unwrap();
    (ok, String::from_utf8(out).unwrap())
}

fn sample_engine() -> SalesEngine {
    SalesEngine::new(SalesSnapshot::new(sample_records()))
}

mod settings_resolution {
    use super::*;

    #[test]
    fn config_values_are_used() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let settings = cli::build_settings(&SourceArgs::default(), &adapter).unwrap();

        assert_eq!(settings.data_path, PathBuf::from("/srv/sales/sales_data.csv"));
        assert_eq!(settings.format, OutputFormat::Json);
        assert!(!settings.pretty);
    }

    #[test]
    fn flags_override_config() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let args = SourceArgs {
            config: None,
            data: Some(PathBuf::from("/tmp/other.csv")),
            format: Some(OutputFormat::Text),
        };
        let settings = cli::build_settings(&args, &adapter).unwrap();

        assert_eq!(settings.data_path, PathBuf::from("/tmp/other.csv"));
        assert_eq!(settings.format, OutputFormat::Text);
    }

    #[test]
    fn defaults_without_config() {
        let settings =
            cli::build_settings(&SourceArgs::default(), &FileConfigAdapter::empty()).unwrap();

        assert!(settings.data_path.ends_with(cli::DEFAULT_DATA_PATH));
        assert_eq!(settings.format, OutputFormat::Text);
        assert!(settings.pretty);
    }

    #[test]
    fn format_is_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[output]\nformat = JSON\n").unwrap();
        let settings = cli::build_settings(&SourceArgs::default(), &adapter).unwrap();
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn unknown_format_is_config_error() {
        let adapter = FileConfigAdapter::from_string("[output]\nformat = xml\n").unwrap();
        let err = cli::build_settings(&SourceArgs::default(), &adapter).unwrap_err();
        assert!(matches!(err, SalesError::ConfigInvalid { key, .. } if key == "format"));
    }

    #[test]
    fn load_config_missing_file_is_parse_error() {
        let err = cli::load_config(&PathBuf::from("/nonexistent/salesagg.ini"))
            .err()
            .unwrap();
        assert!(matches!(err, SalesError::ConfigParse { .. }));
    }

    #[test]
    fn load_config_from_disk() {
        let file = write_temp_file(VALID_INI);
        let adapter = cli::load_config(file.path()).unwrap();
        let settings = cli::build_settings(&SourceArgs::default(), &adapter).unwrap();
        assert_eq!(settings.format, OutputFormat::Json);
    }
}

mod query_output {
    use super::*;

    #[test]
    fn monthly_text_lists_months() {
        let (ok, text) = run_query(Query::Monthly, &sample_engine(), OutputFormat::Text);
        assert!(ok);
        assert!(text.starts_with("Monthly Sales Retrieved [200] records=3"));
        assert!(text.contains("  2024-01  95.00\n"));
        assert!(text.contains("  2024-02  67.50\n"));
        assert!(!text.contains("2024-03"));
    }

    #[test]
    fn popular_items_json_payload() {
        let (ok, json) = run_query(Query::PopularItems, &sample_engine(), OutputFormat::Json);
        assert!(ok);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["is_success"], true);
        assert_eq!(value["status_code"], 200);
        assert_eq!(value["status_message"], "Most Popular Item Each Month Retrieved");
        assert_eq!(value["total_records"], 3);
        assert_eq!(value["payload"][0]["sku"], "WIDGET");
        assert_eq!(value["payload"][0]["total_quantity_sold"], 10);
    }

    #[test]
    fn total_sales_json_is_exact_decimal_string() {
        let (_, json) = run_query(Query::TotalSales, &sample_engine(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["payload"], "172.50");
        assert_eq!(value["total_records"], 1);
    }

    #[test]
    fn popular_item_stats_json_tags_no_sales_month() {
        let (_, json) = run_query(Query::PopularItemStats, &sample_engine(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["payload"][0]["status"], "sales");
        assert_eq!(value["payload"][0]["min_orders"], 4);
        assert_eq!(value["payload"][2]["status"], "no_sales_data");
        assert_eq!(value["payload"][2]["month"], 3);
    }

    #[test]
    fn top_revenue_text() {
        let (_, text) = run_query(Query::TopRevenueItems, &sample_engine(), OutputFormat::Text);
        assert!(text.contains("  2024-01  GIZMO  revenue=50.00\n"));
    }

    #[test]
    fn summary_json_has_all_five_queries() {
        let (ok, json) = run_query(Query::Summary, &sample_engine(), OutputFormat::Json);
        assert!(ok);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for key in [
            "total_sales",
            "monthly_sales",
            "popular_items",
            "top_revenue_items",
            "popular_item_stats",
        ] {
            assert_eq!(value[key]["is_success"], true, "{key}");
        }
    }

    #[test]
    fn summary_text_prints_each_query() {
        let (_, text) = run_query(Query::Summary, &sample_engine(), OutputFormat::Text);
        assert!(text.contains("Total Sales Retrieved"));
        assert!(text.contains("Monthly Sales Retrieved"));
        assert!(text.contains("Most Popular Item Each Month Retrieved"));
        assert!(text.contains("Top Revenue Items Each Month Retrieved"));
        assert!(text.contains("Popular Item Stats Retrieved"));
        assert!(text.contains("  2024-03  no sales data\n"));
    }
}

mod info_report {
    use super::*;

    #[test]
    fn info_reports_loaded_and_skipped_rows() {
        let file = write_temp_file(&format!(
            "{HEADER}2024-01-05,A,10,2\n2024-01-06,B,oops,1\n"
        ));
        let engine = SalesEngine::new(SalesSnapshot::load(&CsvAdapter::new(
            file.path().to_path_buf(),
        )));

        let (ok, text) = run_query(Query::Info, &engine, OutputFormat::Text);
        assert!(ok);
        assert!(text.contains("records: 1\n"));
        assert!(text.contains("skipped: 1\n"));
        assert!(!text.contains("fault:"));
    }

    #[test]
    fn info_reports_missing_source() {
        let dir = tempfile::TempDir::new().unwrap();
        let engine = SalesEngine::new(SalesSnapshot::load(&CsvAdapter::new(
            dir.path().join("sales_data.csv"),
        )));

        let (ok, json) = run_query(Query::Info, &engine, OutputFormat::Json);
        assert!(ok);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["records"], 0);
        assert!(value["load_fault"].as_str().unwrap().contains("not found"));
    }
}
