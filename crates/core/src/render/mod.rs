/// Block glyphs from shortest to tallest.
const GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Text backend that draws one bar per value. Bar height grows linearly with
/// the value, relative to the largest value in the sequence.
#[derive(Debug, Default, Clone)]
pub struct BarRenderer {
    frames: usize,
}

impl BarRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines rendered so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn render_line(&mut self, values: &[f64]) -> String {
        self.frames += 1;
        let max = values.iter().copied().fold(0.0_f64, f64::max);
        values.iter().map(|&value| glyph(value, max)).collect()
    }
}

fn glyph(value: f64, max: f64) -> char {
    if value.is_nan() || value <= 0.0 || max <= 0.0 {
        return GLYPHS[0];
    }
    let level = (value / max * GLYPHS.len() as f64).ceil() as usize;
    GLYPHS[level.clamp(1, GLYPHS.len()) - 1]
}
