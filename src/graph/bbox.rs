/// Axis-aligned bounding box with its derived center and circumscribing radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
	/// Smallest x.
	pub left: f64,
	/// Smallest y.
	pub top: f64,
	/// Largest x.
	pub right: f64,
	/// Largest y.
	pub bottom: f64,
	/// `right - left`.
	pub width: f64,
	/// `bottom - top`.
	pub height: f64,
	/// Horizontal center.
	pub cx: f64,
	/// Vertical center.
	pub cy: f64,
	/// Largest distance from the center to any of the four corners.
	pub r: f64,
}

impl BBox {
	/// Box from its edges; the derived fields are computed.
	pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
		let (width, height) = (right - left, bottom - top);
		let (cx, cy) = (left + width / 2.0, top + height / 2.0);
		let r = [(left, top), (right, top), (right, bottom), (left, bottom)]
			.into_iter()
			.map(|(x, y)| (x - cx).hypot(y - cy))
			.fold(0.0, f64::max);
		Self {
			left,
			top,
			right,
			bottom,
			width,
			height,
			cx,
			cy,
			r,
		}
	}

	/// Bounds of a circle, the shape every vertex is drawn with.
	pub fn circle(x: f64, y: f64, radius: f64) -> Self {
		Self::new(x - radius, y - radius, x + radius, y + radius)
	}

	/// Smallest box holding both.
	pub fn union(&self, other: &Self) -> Self {
		Self::new(
			self.left.min(other.left),
			self.top.min(other.top),
			self.right.max(other.right),
			self.bottom.max(other.bottom),
		)
	}

	/// Envelope of all boxes, `None` when there are none.
	pub fn envelope(boxes: impl IntoIterator<Item = BBox>) -> Option<Self> {
		boxes.into_iter().reduce(|a, b| a.union(&b))
	}

	/// Whether the point lies inside or on the border.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		(self.left..=self.right).contains(&x) && (self.top..=self.bottom).contains(&y)
	}
}
