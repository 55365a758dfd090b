/// Result of a name-keyed lookup that always yields a usable value.
///
/// A miss carries the fallback the caller chose, so the silent case stays visible
/// at every call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup<T> {
	Found(T),
	Fallback(T),
}

impl<T> Lookup<T> {
	pub fn from_option(found: Option<T>, fallback: T) -> Self {
		match found {
			Some(value) => Lookup::Found(value),
			None => Lookup::Fallback(fallback),
		}
	}

	pub fn is_found(&self) -> bool {
		matches!(self, Lookup::Found(_))
	}

	pub fn value(self) -> T {
		match self {
			Lookup::Found(value) | Lookup::Fallback(value) => value,
		}
	}
}
