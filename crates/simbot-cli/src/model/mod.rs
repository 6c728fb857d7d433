pub mod run_report;
pub mod training_summary;
