//! Flattening of translucent CSS colours before rasterization.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// `#fff` or `#ffffff`.
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.trim().strip_prefix('#')?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let mut it = digits.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
                Some(Rgb(it.next()??, it.next()??, it.next()??))
            }
            6 => Some(Rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Parses `rgba(r, g, b, a)` or `rgb(r g b / a)` into channels plus alpha.
/// Colours without an alpha component come back with alpha `1.0`.
pub fn parse_rgba(css: &str) -> Option<(Rgb, f64)> {
    let css = css.trim();
    let body = css
        .strip_prefix("rgba(")
        .or_else(|| css.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = body
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    let channel = |s: &str| s.parse::<f64>().ok().map(|v| v.round().clamp(0.0, 255.0) as u8);
    let (r, g, b) = match parts.as_slice() {
        [r, g, b] | [r, g, b, _] => (channel(r)?, channel(g)?, channel(b)?),
        _ => return None,
    };
    let alpha = match parts.get(3) {
        None => 1.0,
        Some(a) => match a.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? / 100.0,
            None => a.parse::<f64>().ok()?,
        },
    };
    Some((Rgb(r, g, b), alpha.clamp(0.0, 1.0)))
}

/// Opaque replacement for a partially transparent colour, composited over
/// `backdrop`. `None` means leave the colour as it is: already opaque, fully
/// transparent, or not an `rgb()`/`rgba()` value.
pub fn flatten(css: &str, backdrop: Rgb) -> Option<String> {
    let (Rgb(r, g, b), alpha) = parse_rgba(css)?;
    if alpha <= 0.0 || alpha >= 1.0 {
        return None;
    }
    let mix = |fg: u8, bg: u8| (alpha * f64::from(fg) + (1.0 - alpha) * f64::from(bg)).round() as u8;
    Some(Rgb(mix(r, backdrop.0), mix(g, backdrop.1), mix(b, backdrop.2)).css())
}
