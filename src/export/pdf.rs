//! Single-page PDF: Helvetica text runs and one embedded JPEG.

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str};

use super::fit::Placement;

const PT_PER_MM: f32 = 72.0 / 25.4;

const FONT_NAME: Name<'static> = Name(b"F1");
const IMAGE_NAME: Name<'static> = Name(b"Im1");

/// JPEG bytes as produced by the canvas encoder, embedded as-is with `DCTDecode`.
#[derive(Clone, Debug, PartialEq)]
pub struct JpegImage {
	pub width: u32,
	pub height: u32,
	pub data: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq)]
struct TextRun {
	x: f64,
	y: f64,
	size: f64,
	rgb: [u8; 3],
	text: String,
}

/// One page, millimetre coordinates from the top-left corner.
#[derive(Clone, Debug)]
pub struct PdfPage {
	width: f64,
	height: f64,
	texts: Vec<TextRun>,
	image: Option<(JpegImage, Placement)>,
}

fn pt(mm: f64) -> f32 {
	mm as f32 * PT_PER_MM
}

impl PdfPage {
	pub fn new(width_mm: f64, height_mm: f64) -> Self {
		Self {
			width: width_mm,
			height: height_mm,
			texts: Vec::new(),
			image: None,
		}
	}

	/// Text whose baseline starts at `(x, y)`.
	pub fn text(mut self, x: f64, y: f64, size_pt: f64, rgb: [u8; 3], text: impl Into<String>) -> Self {
		self.texts.push(TextRun {
			x,
			y,
			size: size_pt,
			rgb,
			text: text.into(),
		});
		self
	}

	pub fn image(mut self, image: JpegImage, at: Placement) -> Self {
		self.image = Some((image, at));
		self
	}

	/// Text runs in drawing order.
	pub fn texts(&self) -> impl Iterator<Item = &str> {
		self.texts.iter().map(|run| run.text.as_str())
	}

	pub fn placement(&self) -> Option<Placement> {
		self.image.as_ref().map(|(_, at)| *at)
	}

	fn content(&self) -> Content {
		let page_h = pt(self.height);
		let mut content = Content::new();

		if let Some((_, at)) = &self.image {
			let (w, h) = (pt(at.width), pt(at.height));
			content.save_state();
			content.transform([w, 0.0, 0.0, h, pt(at.x), page_h - pt(at.y + at.height)]);
			content.x_object(IMAGE_NAME);
			content.restore_state();
		}

		for run in &self.texts {
			let [r, g, b] = run.rgb.map(|c| f32::from(c) / 255.0);
			let encoded = win_ansi(&run.text);
			content.begin_text();
			content.set_font(FONT_NAME, run.size as f32);
			content.set_fill_rgb(r, g, b);
			content.next_line(pt(run.x), page_h - pt(run.y));
			content.show(Str(&encoded));
			content.end_text();
		}
		content
	}

	/// Serialize the complete document.
	pub fn to_bytes(&self) -> Vec<u8> {
		let [catalog_id, pages_id, page_id, content_id, font_id, image_id] =
			[1, 2, 3, 4, 5, 6].map(Ref::new);
		let mut pdf = Pdf::new();
		pdf.catalog(catalog_id).pages(pages_id);
		pdf.pages(pages_id).kids([page_id]).count(1);

		let mut page = pdf.page(page_id);
		page.media_box(Rect::new(0.0, 0.0, pt(self.width), pt(self.height)));
		page.parent(pages_id);
		page.contents(content_id);
		{
			let mut resources = page.resources();
			resources.fonts().pair(FONT_NAME, font_id);
			if self.image.is_some() {
				resources.x_objects().pair(IMAGE_NAME, image_id);
			}
		}
		page.finish();

		let content = self.content().finish();
		pdf.stream(content_id, &content);

		pdf.type1_font(font_id)
			.base_font(Name(b"Helvetica"))
			.encoding_predefined(Name(b"WinAnsiEncoding"));

		if let Some((image, _)) = &self.image {
			let mut xobject = pdf.image_xobject(image_id, &image.data);
			xobject.filter(Filter::DctDecode);
			xobject.width(image.width as i32);
			xobject.height(image.height as i32);
			xobject.color_space().device_rgb();
			xobject.bits_per_component(8);
			xobject.finish();
		}

		pdf.finish()
	}
}

/// Encode for the standard fonts' WinAnsi table; unmappable characters become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
	text.chars()
		.map(|c| match c {
			'€' => 0x80,
			'‘' => 0x91,
			'’' => 0x92,
			'“' => 0x93,
			'”' => 0x94,
			'–' => 0x96,
			'—' => 0x97,
			c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
			_ => b'?',
		})
		.collect()
}
