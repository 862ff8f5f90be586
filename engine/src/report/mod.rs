// Presentation of a prepared series: text table and SVG line chart
pub mod chart;
pub mod table;

pub use chart::{render_svg, save_svg};
pub use table::render_table;
