//! Framebuffer resolutions the preview can switch between

/// Low-res preview width (PS1 resolution)
pub const WIDTH: usize = 320;

/// Low-res preview height (PS1 resolution)
pub const HEIGHT: usize = 240;

/// High-res preview width
pub const WIDTH_HI: usize = 640;

/// High-res preview height
pub const HEIGHT_HI: usize = 480;
