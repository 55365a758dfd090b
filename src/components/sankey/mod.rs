mod component;
mod handle;
pub mod layout;
pub mod lookup;
mod render;
pub mod resolve;
pub mod state;
pub mod style;
pub mod tooltip;

pub use component::SankeyChart;
pub use handle::DiagramHandle;
pub use layout::{LayoutConfig, SankeyLayout};
pub use lookup::Lookup;
pub use resolve::{ResolvedGraph, ResolvedLink, resolve};
pub use style::{FALLBACK_COLOR, Palette};
pub use tooltip::{HoverPayload, Tooltip, tooltip_for};
