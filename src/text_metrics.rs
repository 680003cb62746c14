use std::collections::HashMap;
use std::sync::Mutex;

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use ttf_parser::Face;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Width of `text` at `font_size` in the first resolvable family, or `None`
/// when no system font matches (callers fall back to a per-char estimate).
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    cache: HashMap<String, Option<FontMetrics>>,
}

/// Advance widths sampled once per loaded face. ASCII gets an exact table;
/// everything else uses the face's average advance.
struct FontMetrics {
    units_per_em: u16,
    ascii_advances: [u16; 128],
    average_advance: f32,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            cache: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = font_family.trim().to_string();
        if !self.cache.contains_key(&key) {
            let metrics = self.load_metrics(font_family);
            self.cache.insert(key.clone(), metrics);
        }
        let metrics = self.cache.get(&key)?.as_ref()?;

        let scale = font_size / metrics.units_per_em.max(1) as f32;
        let fallback = metrics.average_advance * scale;
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            if ch.is_ascii() {
                let advance = metrics.ascii_advances[ch as usize];
                width += if advance == 0 { fallback } else { advance as f32 * scale };
            } else {
                width += fallback;
            }
        }
        Some(width.max(0.0))
    }

    fn load_metrics(&mut self, font_family: &str) -> Option<FontMetrics> {
        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let mut names: Vec<String> = Vec::new();
        let mut families: Vec<Family<'_>> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            match raw.to_ascii_lowercase().as_str() {
                "serif" => families.push(Family::Serif),
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    families.push(Family::SansSerif)
                }
                "monospace" | "ui-monospace" => families.push(Family::Monospace),
                "cursive" => families.push(Family::Cursive),
                "fantasy" => families.push(Family::Fantasy),
                _ => names.push(raw.to_string()),
            }
        }
        // fontdb borrows name families, so rebuild with names first.
        let mut query_families: Vec<Family<'_>> = names.iter().map(|name| Family::Name(name)).collect();
        query_families.extend(families);
        if query_families.is_empty() {
            query_families.push(Family::SansSerif);
        }

        let query = Query {
            families: &query_families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut loaded: Option<FontMetrics> = None;
        self.db.with_face_data(id, |data, index| {
            if let Ok(face) = Face::parse(data, index) {
                loaded = Some(FontMetrics::from_face(&face));
            }
        });
        loaded
    }
}

impl FontMetrics {
    fn from_face(face: &Face<'_>) -> Self {
        let mut ascii_advances = [0u16; 128];
        let mut total = 0u32;
        let mut counted = 0u32;
        for byte in 0x20u8..0x7F {
            let ch = byte as char;
            if let Some(glyph) = face.glyph_index(ch) {
                let advance = face.glyph_hor_advance(glyph).unwrap_or(0);
                ascii_advances[byte as usize] = advance;
                if advance > 0 {
                    total += advance as u32;
                    counted += 1;
                }
            }
        }
        let units_per_em = face.units_per_em().max(1);
        let average_advance = if counted > 0 {
            total as f32 / counted as f32
        } else {
            units_per_em as f32 * 0.56
        };
        Self {
            units_per_em,
            ascii_advances,
            average_advance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_measures_zero() {
        assert_eq!(measure_text_width("", 13.0, "sans-serif"), Some(0.0));
    }

    #[test]
    fn longer_text_is_never_narrower() {
        // Headless environments may have no fonts at all; only assert the
        // monotonicity when measurement succeeds.
        if let (Some(short), Some(long)) = (
            measure_text_width("abc", 13.0, "sans-serif"),
            measure_text_width("abcdef", 13.0, "sans-serif"),
        ) {
            assert!(long >= short);
        }
    }
}
