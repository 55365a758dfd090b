pub mod chat;
pub mod sankey;
