pub mod bleed;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod mask;
pub mod photo;
pub mod radius;
pub mod store;
pub mod widget;

pub use error::MaskError;
pub use mask::apply_rounded_mask;
pub use radius::{compute, RadiusPercent};
pub use store::{WidgetId, WidgetStore};
