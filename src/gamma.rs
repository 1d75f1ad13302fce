// Translucent strokes (fading trail, ripple rings, shadows) are blended in
// linear light. Table lookups replace powf so a frame of blending stays cheap.

use std::sync::LazyLock;

use crate::types::Rgba;

static LUT: LazyLock<GammaLut> = LazyLock::new(GammaLut::new);

pub struct GammaLut {
    // sRGB(0..255) -> linear (0..1) as f32
    srgb_to_linear: [f32; 256],
    // linear(0..1) -> sRGB(0..255) via 4096-step quantization
    // (index = (linear * 4095).round())
    linear_to_srgb: [u8; 4096],
}

impl GammaLut {
    pub fn new() -> Self {
        let mut s2l = [0.0f32; 256];
        for (v, slot) in s2l.iter_mut().enumerate() {
            let c = v as f32 / 255.0;
            *slot = if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) };
        }

        let mut l2s = [0u8; 4096];
        for (i, slot) in l2s.iter_mut().enumerate() {
            let l = (i as f32) / 4095.0;
            let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { srgb_to_linear: s2l, linear_to_srgb: l2s }
    }

    /// Process-wide table, built on first use.
    pub fn shared() -> &'static GammaLut {
        &LUT
    }

    #[inline]
    pub fn srgb_u8_to_linear(&self, v: u8) -> f32 {
        self.srgb_to_linear[v as usize]
    }

    #[inline]
    pub fn linear_to_srgb_u8(&self, l: f32) -> u8 {
        let idx = (l.clamp(0.0, 1.0) * 4095.0).round() as usize;
        self.linear_to_srgb[idx]
    }

    /// Source-over blend of `src` onto the 0x00RRGGBB pixel `dst`.
    /// `coverage` scales the source alpha (antialiased edges).
    pub fn blend(&self, dst: u32, src: Rgba, coverage: f32) -> u32 {
        let a = (src.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
        if a <= 0.0 {
            return dst;
        }
        if a >= 1.0 {
            return src.to_rgb_u32();
        }
        let d = Rgba::from_rgb_u32(dst);
        let mix = |d: u8, s: u8| {
            let dl = self.srgb_u8_to_linear(d);
            let sl = self.srgb_u8_to_linear(s);
            self.linear_to_srgb_u8(dl + (sl - dl) * a)
        };
        Rgba::rgb(mix(d.r, src.r), mix(d.g, src.g), mix(d.b, src.b)).to_rgb_u32()
    }
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}
