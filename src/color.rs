//! Color types and sequential ramps for class colors.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};

/// Neutral fill for regions and bars without a usable value.
pub const MISSING_COLOR: &str = "#cccccc";

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    /// Format as CSS: rgb(r,g,b)
    pub fn css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    /// Linear interpolation in RGB space, `t` clamped to [0, 1].
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb { r: mix(self.r, other.r), g: mix(self.g, other.g), b: mix(self.b, other.b) }
    }
}

impl fmt::Display for Rgb {
    /// Format as lowercase hex: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = anyhow::Error;

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        ensure_hex(hex).map_err(|e| anyhow!("[color::Rgb] Invalid color {:?}: {}", s, e))?;
        let channel = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16);
        match hex.len() {
            3 => {
                let (r, g, b) = (channel(0, 1)?, channel(1, 1)?, channel(2, 1)?);
                Ok(Rgb { r: r * 17, g: g * 17, b: b * 17 })
            }
            6 => Ok(Rgb { r: channel(0, 2)?, g: channel(2, 2)?, b: channel(4, 2)? }),
            n => bail!("[color::Rgb] Invalid color {:?}: expected 3 or 6 hex digits, got {}", s, n),
        }
    }
}

/// Whether two color strings denote the same color (hex forms compared by value).
pub fn same_color(a: &str, b: &str) -> bool {
    match (a.parse::<Rgb>(), b.parse::<Rgb>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => a.trim().eq_ignore_ascii_case(b.trim()),
    }
}

fn ensure_hex(hex: &str) -> Result<()> {
    if hex.chars().all(|c| c.is_ascii_hexdigit()) { return Ok(()) }
    bail!("non-hex digit")
}

/// Named sequential color schemes (ColorBrewer, 9-class anchors, light to dark).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ramp {
    Blues,
    Greens,
    Greys,
    Oranges,
    Purples,
    PuRd,
    Reds,
    YlOrRd,
}

impl Ramp {
    pub const ALL: [Ramp; 8] = [
        Ramp::Blues, Ramp::Greens, Ramp::Greys, Ramp::Oranges,
        Ramp::Purples, Ramp::PuRd, Ramp::Reds, Ramp::YlOrRd,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Ramp::Blues => "Blues",
            Ramp::Greens => "Greens",
            Ramp::Greys => "Greys",
            Ramp::Oranges => "Oranges",
            Ramp::Purples => "Purples",
            Ramp::PuRd => "PuRd",
            Ramp::Reds => "Reds",
            Ramp::YlOrRd => "YlOrRd",
        }
    }

    fn anchors(&self) -> &'static [Rgb; 9] {
        const BLUES: [Rgb; 9] = [
            Rgb::new(247, 251, 255), Rgb::new(222, 235, 247), Rgb::new(198, 219, 239),
            Rgb::new(158, 202, 225), Rgb::new(107, 174, 214), Rgb::new( 66, 146, 198),
            Rgb::new( 33, 113, 181), Rgb::new(  8,  81, 156), Rgb::new(  8,  48, 107),
        ];
        const GREENS: [Rgb; 9] = [
            Rgb::new(247, 252, 245), Rgb::new(229, 245, 224), Rgb::new(199, 233, 192),
            Rgb::new(161, 217, 155), Rgb::new(116, 196, 118), Rgb::new( 65, 171,  93),
            Rgb::new( 35, 139,  69), Rgb::new(  0, 109,  44), Rgb::new(  0,  68,  27),
        ];
        const GREYS: [Rgb; 9] = [
            Rgb::new(255, 255, 255), Rgb::new(240, 240, 240), Rgb::new(217, 217, 217),
            Rgb::new(189, 189, 189), Rgb::new(150, 150, 150), Rgb::new(115, 115, 115),
            Rgb::new( 82,  82,  82), Rgb::new( 37,  37,  37), Rgb::new(  0,   0,   0),
        ];
        const ORANGES: [Rgb; 9] = [
            Rgb::new(255, 245, 235), Rgb::new(254, 230, 206), Rgb::new(253, 208, 162),
            Rgb::new(253, 174, 107), Rgb::new(253, 141,  60), Rgb::new(241, 105,  19),
            Rgb::new(217,  72,   1), Rgb::new(166,  54,   3), Rgb::new(127,  39,   4),
        ];
        const PURPLES: [Rgb; 9] = [
            Rgb::new(252, 251, 253), Rgb::new(239, 237, 245), Rgb::new(218, 218, 235),
            Rgb::new(188, 189, 220), Rgb::new(158, 154, 200), Rgb::new(128, 125, 186),
            Rgb::new(106,  81, 163), Rgb::new( 84,  39, 143), Rgb::new( 63,   0, 125),
        ];
        const PURD: [Rgb; 9] = [
            Rgb::new(247, 244, 249), Rgb::new(231, 225, 239), Rgb::new(212, 185, 218),
            Rgb::new(201, 148, 199), Rgb::new(223, 101, 176), Rgb::new(231,  41, 138),
            Rgb::new(206,  18,  86), Rgb::new(152,   0,  67), Rgb::new(103,   0,  31),
        ];
        const REDS: [Rgb; 9] = [
            Rgb::new(255, 245, 240), Rgb::new(254, 224, 210), Rgb::new(252, 187, 161),
            Rgb::new(252, 146, 114), Rgb::new(251, 106,  74), Rgb::new(239,  59,  44),
            Rgb::new(203,  24,  29), Rgb::new(165,  15,  21), Rgb::new(103,   0,  13),
        ];
        const YLORRD: [Rgb; 9] = [
            Rgb::new(255, 255, 204), Rgb::new(255, 237, 160), Rgb::new(254, 217, 118),
            Rgb::new(254, 178,  76), Rgb::new(253, 141,  60), Rgb::new(252,  78,  42),
            Rgb::new(227,  26,  28), Rgb::new(189,   0,  38), Rgb::new(128,   0,  38),
        ];

        match self {
            Ramp::Blues => &BLUES,
            Ramp::Greens => &GREENS,
            Ramp::Greys => &GREYS,
            Ramp::Oranges => &ORANGES,
            Ramp::Purples => &PURPLES,
            Ramp::PuRd => &PURD,
            Ramp::Reds => &REDS,
            Ramp::YlOrRd => &YLORRD,
        }
    }

    /// Sample `n` colors from light to dark. The palest anchor is skipped so the
    /// lowest class stays visible against a white background.
    pub fn colors(&self, n: usize) -> Vec<Rgb> {
        let anchors = self.anchors();
        match n {
            0 => Vec::new(),
            1 => vec![anchors[4]],
            _ => (0..n).map(|i| {
                // position along anchors[1..=8]
                let pos = 1.0 + 7.0 * i as f64 / (n - 1) as f64;
                let lo = (pos.floor() as usize).min(7);
                anchors[lo].lerp(anchors[lo + 1], pos - lo as f64)
            }).collect(),
        }
    }
}

impl FromStr for Ramp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ramp::ALL.into_iter()
            .find(|ramp| ramp.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!(
                "[color::Ramp] Unknown ramp {:?}. Expected one of: {}",
                s,
                Ramp::ALL.map(|r| r.name()).join(", "),
            ))
    }
}
