//! Text measurement for the PDF base-14 fonts.
//!
//! Documents are drawn with the builtin Helvetica, Times and Courier faces, so
//! measurement uses their published advance widths instead of loading font
//! files. Widths are in 1/1000 em.

use serde::{Deserialize, Serialize};

/// Generic family, mapped onto a builtin PDF face at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
    Mono,
}

impl FontFamily {
    /// Pick a family from a CSS `font-family` list using its first entry.
    pub fn from_css(value: &str) -> Self {
        let first = value
            .split(',')
            .next()
            .unwrap_or("")
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .to_ascii_lowercase();
        if first.contains("mono") || first.contains("courier") {
            FontFamily::Mono
        } else if first == "serif" || first.contains("times") || first.contains("georgia") {
            FontFamily::Serif
        } else {
            FontFamily::Sans
        }
    }
}

/// One concrete face: family plus weight and slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontFace {
    pub family: FontFamily,
    pub bold: bool,
    pub italic: bool,
}

/// Ascent as a fraction of the font size.
const ASCENT: f32 = 0.75;

/// Helvetica advance widths for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // 0..9
    278, 278, 584, 584, 584, 556, 1015,                                             // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // N..Z
    278, 278, 278, 469, 556, 333,                                                   // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // n..z
    334, 260, 334, 584,                                                             // {..~
];

fn helvetica_advance(ch: char) -> f32 {
    let code = ch as u32;
    let units = if (0x20..=0x7E).contains(&code) {
        HELVETICA_ASCII[(code - 0x20) as usize]
    } else {
        match ch {
            '\u{2022}' => 350, // bullet
            '\u{2014}' => 1000,
            '\u{2013}' => 556,
            '\u{2018}' | '\u{2019}' => 222,
            '\u{201C}' | '\u{201D}' => 333,
            '\u{00A0}' => 278,
            _ => 556,
        }
    };
    units as f32
}

impl FontFace {
    pub fn new(family: FontFamily, bold: bool, italic: bool) -> Self {
        Self {
            family,
            bold,
            italic,
        }
    }

    fn advance(&self, ch: char) -> f32 {
        match self.family {
            FontFamily::Mono => 600.0,
            FontFamily::Sans => {
                let w = helvetica_advance(ch);
                if self.bold {
                    w * 1.07
                } else {
                    w
                }
            }
            FontFamily::Serif => {
                let w = helvetica_advance(ch) * 0.92;
                if self.bold {
                    w * 1.05
                } else {
                    w
                }
            }
        }
    }

    /// Advance of a single character in points.
    pub fn char_width(&self, ch: char, font_size: f32) -> f32 {
        self.advance(ch) * font_size / 1000.0
    }

    /// Width of `text` in points at `font_size`.
    pub fn measure(&self, text: &str, font_size: f32) -> f32 {
        let units: f32 = text.chars().map(|c| self.advance(c)).sum();
        units * font_size / 1000.0
    }

    /// Distance from the top of the line box to the baseline.
    pub fn ascender(&self, font_size: f32) -> f32 {
        font_size * ASCENT
    }
}

/// One stretch of inline text sharing a face and size.
#[derive(Debug, Clone, Copy)]
pub struct RunSpec<'a> {
    pub text: &'a str,
    pub face: FontFace,
    pub size: f32,
}

/// Part of a wrapped line that came from a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePiece {
    /// Index into the runs passed to [`wrap_runs`].
    pub run: usize,
    pub text: String,
    /// Offset from the start of the line, in points.
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WrappedLine {
    pub pieces: Vec<LinePiece>,
    pub width: f32,
}

impl WrappedLine {
    pub fn text(&self) -> String {
        self.pieces.iter().map(|p| p.text.as_str()).collect()
    }
}

type Glyph = (char, usize);

/// Word-wrap a sequence of styled runs to fit within `max_width` points.
///
/// Whitespace collapses across run boundaries the way HTML inline content
/// does. Words wider than a whole line (long URLs) are broken between
/// characters. Each line keeps track of which run every piece came from.
pub fn wrap_runs(runs: &[RunSpec<'_>], max_width: f32) -> Vec<WrappedLine> {
    let max_width = if max_width > 0.0 {
        max_width
    } else {
        f32::INFINITY
    };
    let width = |(ch, run): Glyph| runs[run].face.char_width(ch, runs[run].size);

    let mut glyphs: Vec<Glyph> = Vec::new();
    let mut pending_space: Option<usize> = None;
    for (i, run) in runs.iter().enumerate() {
        for ch in run.text.chars() {
            if ch.is_whitespace() && ch != '\u{00A0}' {
                if !glyphs.is_empty() && pending_space.is_none() {
                    pending_space = Some(i);
                }
            } else {
                if let Some(space_run) = pending_space.take() {
                    glyphs.push((' ', space_run));
                }
                glyphs.push((ch, i));
            }
        }
    }

    let mut lines = Vec::new();
    let mut line: Vec<Glyph> = Vec::new();
    let mut line_width = 0.0f32;
    let mut start = 0;
    while start < glyphs.len() {
        let end = glyphs[start..]
            .iter()
            .position(|g| g.0 == ' ')
            .map_or(glyphs.len(), |p| start + p);
        let word = &glyphs[start..end];
        let word_width: f32 = word.iter().map(|&g| width(g)).sum();
        let space = if line.is_empty() || start == 0 {
            None
        } else {
            Some(glyphs[start - 1])
        };
        let space_width = space.map_or(0.0, width);

        if line_width + space_width + word_width <= max_width {
            line.extend(space);
            line.extend_from_slice(word);
            line_width += space_width + word_width;
        } else {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0.0;
            }
            if word_width <= max_width {
                line.extend_from_slice(word);
                line_width = word_width;
            } else {
                for &glyph in word {
                    let w = width(glyph);
                    if line_width + w > max_width && !line.is_empty() {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0.0;
                    }
                    line.push(glyph);
                    line_width += w;
                }
            }
        }
        start = end + 1;
    }
    if !line.is_empty() {
        lines.push(line);
    }

    lines
        .iter()
        .map(|glyphs| assemble(glyphs, &width))
        .collect()
}

/// Group consecutive glyphs from the same run into pieces.
fn assemble(glyphs: &[Glyph], width: &impl Fn(Glyph) -> f32) -> WrappedLine {
    let mut out = WrappedLine::default();
    for &(ch, run) in glyphs {
        let w = width((ch, run));
        match out.pieces.last_mut() {
            Some(piece) if piece.run == run => {
                piece.text.push(ch);
                piece.width += w;
            }
            _ => out.pieces.push(LinePiece {
                run,
                text: ch.to_string(),
                x: out.width,
                width: w,
            }),
        }
        out.width += w;
    }
    out
}
