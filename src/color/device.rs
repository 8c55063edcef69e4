//! The device color spaces.

/// Convert a gray value to RGB by replicating it to all three channels.
pub(crate) fn gray_to_rgb(gray: f32) -> [f32; 3] {
    [gray, gray, gray]
}

/// Convert CMYK components to RGB.
pub(crate) fn cmyk_to_rgb(c: f32, m: f32, y: f32, k: f32) -> [f32; 3] {
    [
        1.0 - (c + k).min(1.0),
        1.0 - (m + k).min(1.0),
        1.0 - (y + k).min(1.0),
    ]
}
