//! sRGB to CIELab conversion for perceptual color distances
//!
//! Uses the standard sRGB transfer curve and a fixed sRGB/D65 matrix. The
//! clustering only compares relative distances, so no chromatic adaptation
//! is applied.

// D65 reference white
const WHITE_X: f32 = 0.950_47;
const WHITE_Y: f32 = 1.0;
const WHITE_Z: f32 = 1.088_83;

/// Undo the sRGB transfer curve for a unit-interval sample
#[inline]
pub fn srgb_to_linear(value: f32) -> f32 {
    if value <= 0.040_45 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert gamma-encoded sRGB in `[0, 1]` to CIELab `[L, a, b]`
#[inline]
pub fn srgb_to_lab(r: f32, g: f32, b: f32) -> [f32; 3] {
    let (r, g, b) = (srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b));

    let x = 0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b;
    let y = 0.212_672_9 * r + 0.715_152_2 * g + 0.072_175 * b;
    let z = 0.019_333_9 * r + 0.119_192 * g + 0.950_304_1 * b;

    let fx = lab_f(x / WHITE_X);
    let fy = lab_f(y / WHITE_Y);
    let fz = lab_f(z / WHITE_Z);

    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

#[inline]
fn lab_f(t: f32) -> f32 {
    const DELTA_CUBED: f32 = (6.0 / 29.0) * (6.0 / 29.0) * (6.0 / 29.0);
    const LINEAR_SCALE: f32 = 1.0 / (3.0 * (6.0 / 29.0) * (6.0 / 29.0));
    const LINEAR_OFFSET: f32 = 4.0 / 29.0;

    if t > DELTA_CUBED {
        t.cbrt()
    } else {
        t * LINEAR_SCALE + LINEAR_OFFSET
    }
}

/// Squared Euclidean distance between two Lab colors
#[inline]
pub fn lab_distance_squared(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}
