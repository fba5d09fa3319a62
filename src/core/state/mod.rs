// Watermark model and acquisition

pub mod manager;
pub mod watermark;

pub use manager::WatermarkManager;
pub use watermark::Watermark;
