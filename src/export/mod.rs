//! High-resolution export of the diagram to a single-page PDF.

mod browser;
pub mod fit;
mod orchestrator;
pub mod pdf;

pub use browser::BrowserDownload;
pub use fit::{PageGeometry, Placement, contain_fit};
pub use orchestrator::{
	DocumentSink, ExportError, ExportOrchestrator, ExportOutcome, ExportPhase, ExportSurface,
	FAILURE_MESSAGE, SurfaceSize,
};
