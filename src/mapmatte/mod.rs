pub mod apply_alpha_mask;
pub mod background_mask;
pub mod color_quantizer;
pub mod extraction;
pub mod flatten_colors;
pub mod foreground_bounds;
