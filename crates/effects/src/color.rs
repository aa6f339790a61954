use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Linear RGBA colour, each channel in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    pub const WHITE: Rgba = Rgba([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Rgba = Rgba([0.0, 0.0, 0.0, 1.0]);

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
    }

    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ])
    }

    pub fn alpha(&self) -> f32 {
        self.0[3]
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, alpha.clamp(0.0, 1.0)])
    }

    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
    /// `rgba(r, g, b, a)` (alpha in `[0, 1]`) and a handful of names.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(body) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(body);
        }
        named(&lower)
    }

    /// Reads a colour from JSON: a string accepted by [`Rgba::parse`], or an
    /// array of 3 or 4 channels in `0..=255`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Array(items) if items.len() == 3 || items.len() == 4 => {
                let mut out = [1.0f32; 4];
                for (slot, item) in out.iter_mut().zip(items) {
                    let v = item.as_f64()?;
                    if !(0.0..=255.0).contains(&v) {
                        return None;
                    }
                    *slot = (v / 255.0) as f32;
                }
                Some(Self(out))
            }
            _ => None,
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => {
            let nib = |i: usize| {
                let v = u8::from_str_radix(hex.get(i..i + 1)?, 16).ok()?;
                Some(v * 17)
            };
            Some(Rgba::rgb8(nib(0)?, nib(1)?, nib(2)?))
        }
        6 => Some(Rgba::rgb8(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_functional(body: &str) -> Option<Rgba> {
    let parts: Vec<f64> = body
        .split(',')
        .map(|p| p.trim().parse::<f64>().ok())
        .collect::<Option<_>>()?;
    let channel = |v: f64| (v.clamp(0.0, 255.0) / 255.0) as f32;
    match parts.as_slice() {
        [r, g, b] => Some(Rgba([channel(*r), channel(*g), channel(*b), 1.0])),
        [r, g, b, a] => Some(Rgba([
            channel(*r),
            channel(*g),
            channel(*b),
            a.clamp(0.0, 1.0) as f32,
        ])),
        _ => None,
    }
}

fn named(name: &str) -> Option<Rgba> {
    let c = match name {
        "white" => Rgba::WHITE,
        "black" => Rgba::BLACK,
        "red" => Rgba::rgb8(255, 0, 0),
        "green" => Rgba::rgb8(0, 128, 0),
        "blue" => Rgba::rgb8(0, 0, 255),
        "yellow" => Rgba::rgb8(255, 255, 0),
        "orange" => Rgba::rgb8(255, 165, 0),
        "cyan" => Rgba::rgb8(0, 255, 255),
        "magenta" => Rgba::rgb8(255, 0, 255),
        "transparent" => Rgba([0.0, 0.0, 0.0, 0.0]),
        _ => return None,
    };
    Some(c)
}
