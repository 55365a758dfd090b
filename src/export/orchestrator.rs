use std::cell::Cell;
use std::future::Future;

use chrono::NaiveDate;
use log::{error, info, warn};
use thiserror::Error;

use super::fit::contain_fit;
use super::pdf::{JpegImage, PdfPage};
use crate::config::ExportConfig;

#[derive(Debug, Error)]
pub enum ExportError {
	#[error("diagram surface unavailable: {0}")]
	Surface(String),
	#[error("rasterization failed: {0}")]
	Raster(String),
	#[error("could not save document: {0}")]
	Save(String),
}

/// Logical size of the drawing surface and its device pixel multiplier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
	pub width: f64,
	pub height: f64,
	pub pixel_ratio: f64,
}

/// The rendered diagram as seen by the exporter.
pub trait ExportSurface {
	fn snapshot(&self) -> SurfaceSize;

	fn apply(&self, size: SurfaceSize);

	/// While held, the surface must not resize itself for any other reason.
	fn hold(&self, held: bool);

	/// Resolves once the diagram has been redrawn at the last applied size.
	fn settle(&self) -> impl Future<Output = ()>;

	fn rasterize(&self) -> impl Future<Output = Result<JpegImage, ExportError>>;
}

/// Where finished documents and failure notices go.
pub trait DocumentSink {
	fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), ExportError>;

	fn notify_failure(&self, message: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExportPhase {
	#[default]
	Idle,
	Busy,
}

#[derive(Debug)]
pub enum ExportOutcome {
	Saved { bytes: usize },
	/// Another export was already running; nothing was produced.
	Skipped,
	Failed(ExportError),
}

/// Returns the phase to idle when dropped, whatever path the export took.
struct BusyToken<'a> {
	phase: &'a Cell<ExportPhase>,
}

impl Drop for BusyToken<'_> {
	fn drop(&mut self) {
		self.phase.set(ExportPhase::Idle);
	}
}

/// Puts the surface back to its pre-export size and releases it when dropped.
struct RestoreSize<'a, S: ExportSurface> {
	surface: &'a S,
	original: SurfaceSize,
}

impl<S: ExportSurface> Drop for RestoreSize<'_, S> {
	fn drop(&mut self) {
		self.surface.apply(self.original);
		self.surface.hold(false);
	}
}

pub const FAILURE_MESSAGE: &str = "Une erreur est survenue lors de la génération du PDF.";

/// Runs at most one diagram-to-PDF export at a time.
pub struct ExportOrchestrator {
	config: ExportConfig,
	phase: Cell<ExportPhase>,
}

impl ExportOrchestrator {
	pub fn new(config: ExportConfig) -> Self {
		Self {
			config,
			phase: Cell::new(ExportPhase::Idle),
		}
	}

	pub fn phase(&self) -> ExportPhase {
		self.phase.get()
	}

	pub fn is_busy(&self) -> bool {
		self.phase() == ExportPhase::Busy
	}

	fn try_begin(&self) -> Option<BusyToken<'_>> {
		if self.phase.replace(ExportPhase::Busy) == ExportPhase::Busy {
			return None;
		}
		Some(BusyToken { phase: &self.phase })
	}

	/// Resize the surface to the print geometry, rasterize it, place it on the page and save.
	///
	/// The surface size and the idle phase are restored on every path.
	pub async fn run<S, D>(&self, surface: &S, sink: &D, generated_on: NaiveDate) -> ExportOutcome
	where
		S: ExportSurface,
		D: DocumentSink,
	{
		let Some(_busy) = self.try_begin() else {
			warn!("export already in progress, ignoring request");
			return ExportOutcome::Skipped;
		};
		info!(
			"exporting diagram at {}x{} (x{})",
			self.config.width, self.config.height, self.config.pixel_ratio
		);

		let result = {
			surface.hold(true);
			let _restore = RestoreSize {
				surface,
				original: surface.snapshot(),
			};
			self.render_document(surface, generated_on).await
		};

		let outcome = result.and_then(|document| {
			let bytes = document.to_bytes();
			sink.save(&self.config.filename, &bytes)?;
			Ok(bytes.len())
		});
		match outcome {
			Ok(bytes) => {
				info!("exported {} ({bytes} bytes)", self.config.filename);
				ExportOutcome::Saved { bytes }
			}
			Err(e) => {
				error!("export failed: {e}");
				sink.notify_failure(FAILURE_MESSAGE);
				ExportOutcome::Failed(e)
			}
		}
	}

	async fn render_document<S: ExportSurface>(
		&self,
		surface: &S,
		generated_on: NaiveDate,
	) -> Result<PdfPage, ExportError> {
		surface.apply(SurfaceSize {
			width: self.config.width,
			height: self.config.height,
			pixel_ratio: self.config.pixel_ratio,
		});
		surface.settle().await;
		let raster = surface.rasterize().await?;
		if raster.width == 0 || raster.height == 0 {
			return Err(ExportError::Raster("empty raster".into()));
		}

		let page = self.config.page;
		let at = contain_fit(f64::from(raster.width), f64::from(raster.height), &page);
		let document = PdfPage::new(page.width, page.height)
			.text(15.0, 20.0, 22.0, [30, 41, 59], self.config.title.as_str())
			.text(
				15.0,
				27.0,
				10.0,
				[100, 100, 100],
				format!("Document généré le {}", generated_on.format("%d/%m/%Y")),
			)
			.image(raster, at);
		Ok(document)
	}
}
