//! Thin file-backed stores built directly on [`JsonDocumentStore`](crate::storage::JsonDocumentStore).

pub mod charts;
pub mod settings;

pub use charts::ChartRegistry;
pub use settings::SettingsStore;
