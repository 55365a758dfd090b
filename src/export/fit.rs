//! Contain-fit placement of the raster on the page.

/// Page area in millimetres, with the margins kept free of the image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
	pub width: f64,
	pub height: f64,
	pub margin: f64,
	/// Height reserved at the top for the title block.
	pub header: f64,
}

impl PageGeometry {
	/// ISO A3, landscape.
	pub const A3_LANDSCAPE: PageGeometry = PageGeometry {
		width: 420.0,
		height: 297.0,
		margin: 15.0,
		header: 25.0,
	};

	pub fn available_width(&self) -> f64 {
		self.width - self.margin * 2.0
	}

	pub fn available_height(&self) -> f64 {
		self.height - self.margin - self.header
	}
}

/// Image rectangle on the page, top-left origin, millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

/// Largest aspect-preserving rectangle fitting the available area, centred in it.
pub fn contain_fit(image_width: f64, image_height: f64, page: &PageGeometry) -> Placement {
	let (avail_w, avail_h) = (page.available_width(), page.available_height());
	let image_ratio = image_width / image_height;
	let page_ratio = avail_w / avail_h;

	let (width, height) = if image_ratio > page_ratio {
		(avail_w, avail_w / image_ratio)
	} else {
		(avail_h * image_ratio, avail_h)
	};

	Placement {
		x: page.margin + (avail_w - width) / 2.0,
		y: page.header + (avail_h - height) / 2.0,
		width,
		height,
	}
}
