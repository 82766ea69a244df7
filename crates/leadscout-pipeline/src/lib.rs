//! Discovery orchestration and export for leadscout.
//!
//! [`DiscoveryPipeline`] walks the configured source chain, classifies the
//! winning batch and aggregates totals; [`CsvExporter`] writes the result to
//! disk.

pub mod chain;
pub mod events;
pub mod export;
pub mod pipeline;

pub use chain::build_sources;
pub use events::{DiscoveryEvent, DiscoveryObserver, TracingObserver};
pub use export::{export_filename, render_csv, write_csv, CsvExporter, ExportError, CSV_COLUMNS};
pub use pipeline::{exhausted_message, DiscoveryPipeline};

