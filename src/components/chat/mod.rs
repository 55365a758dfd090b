mod component;

pub use component::ChatPanel;
