//! Visualization of simulation results
//!
//! This module draws charts with the `plotters` library. The backend follows
//! the output file extension: `.svg` gives vector output, anything else a
//! bitmap.
//!
//! # Organization
//!
//! - **config**: Shared plot configuration (`PlotConfig`)
//! - **series**: Concentration over time with a dashed safe-level line
//! - **heatmap**: One layer of the farm grid
//!
//! # Text in bitmaps
//!
//! Captions, tick labels and legends are always present in SVG output.
//! Bitmap output carries them only when the crate is built with the `ttf`
//! feature.
//!
//! # When to Use Which Function
//!
//! | Use Case | Function |
//! |----------|----------|
//! | Surface concentration vs time | [`plot_series`] |
//! | Final field of a 2D run | [`plot_field_heatmap`] |

pub mod config;
pub mod heatmap;
pub mod series;

pub use config::{NO_TITLE, PlotConfig};
pub use heatmap::plot_field_heatmap;
pub use series::plot_series;
