//! Paint command set and SVG serialization

use std::fmt::Write as _;

pub type Rgb = (u8, u8, u8);

pub const BLACK: Rgb = (0, 0, 0);
pub const WHITE: Rgb = (255, 255, 255);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub rgb: Rgb,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub rgb: Rgb,
    pub bold: bool,
    pub monospace: bool,
    pub anchor: Anchor,
}

impl TextStyle {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            rgb: BLACK,
            bold: false,
            monospace: false,
            anchor: Anchor::Start,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn mono(mut self) -> Self {
        self.monospace = true;
        self
    }

    pub fn color(mut self, rgb: Rgb) -> Self {
        self.rgb = rgb;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
        radius: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Stroke,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        style: TextStyle,
    },
}

/// An ordered list of paint commands for one page
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<PaintCommand>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, commands: Vec::new() }
    }

    pub fn push(&mut self, cmd: PaintCommand) {
        self.commands.push(cmd);
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Option<Rgb>, stroke: Option<Stroke>) {
        self.push(PaintCommand::SolidRect { x, y, width, height, fill, stroke, radius: 0.0 });
    }

    pub fn rounded_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64, fill: Rgb) {
        self.push(PaintCommand::SolidRect {
            x,
            y,
            width,
            height,
            fill: Some(fill),
            stroke: None,
            radius,
        });
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: Option<Rgb>, stroke: Option<Stroke>) {
        self.push(PaintCommand::Circle { cx, cy, r, fill, stroke });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke) {
        self.push(PaintCommand::Line { x1, y1, x2, y2, stroke });
    }

    pub fn text(&mut self, x: f64, y: f64, text: impl Into<String>, style: TextStyle) {
        self.push(PaintCommand::Text { x, y, text: text.into(), style });
    }

    /// Serialize to a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut out = String::with_capacity(256 + self.commands.len() * 96);
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        for cmd in &self.commands {
            write_command(&mut out, cmd);
        }
        out.push_str("</svg>");
        out
    }
}

fn write_command(out: &mut String, cmd: &PaintCommand) {
    match cmd {
        PaintCommand::SolidRect { x, y, width, height, fill, stroke, radius } => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                num(*x),
                num(*y),
                num(width.max(0.0)),
                num(height.max(0.0))
            );
            if *radius > 0.0 {
                let _ = write!(out, r#" rx="{}""#, num(*radius));
            }
            write_paint(out, *fill, *stroke);
            out.push_str("/>");
        }
        PaintCommand::Circle { cx, cy, r, fill, stroke } => {
            let _ = write!(out, r#"<circle cx="{}" cy="{}" r="{}""#, num(*cx), num(*cy), num(r.max(0.0)));
            write_paint(out, *fill, *stroke);
            out.push_str("/>");
        }
        PaintCommand::Line { x1, y1, x2, y2, stroke } => {
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                num(*x1),
                num(*y1),
                num(*x2),
                num(*y2)
            );
            write_paint(out, None, Some(*stroke));
            out.push_str("/>");
        }
        PaintCommand::Text { x, y, text, style } => {
            let anchor = match style.anchor {
                Anchor::Start => "start",
                Anchor::Middle => "middle",
                Anchor::End => "end",
            };
            let family = if style.monospace { "monospace" } else { "sans-serif" };
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-family="{}" font-size="{}" text-anchor="{}" fill="{}""#,
                num(*x),
                num(*y),
                family,
                num(style.size),
                anchor,
                hex(style.rgb)
            );
            if style.bold {
                out.push_str(r#" font-weight="bold""#);
            }
            out.push('>');
            out.push_str(&escape(text));
            out.push_str("</text>");
        }
    }
}

fn write_paint(out: &mut String, fill: Option<Rgb>, stroke: Option<Stroke>) {
    match fill {
        Some(rgb) => {
            let _ = write!(out, r#" fill="{}""#, hex(rgb));
        }
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(s) = stroke {
        let _ = write!(out, r#" stroke="{}" stroke-width="{}""#, hex(s.rgb), num(s.width));
    }
}

fn hex((r, g, b): Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Fixed two-decimal formatting with trailing zeros trimmed, so output is
/// stable across platforms.
fn num(v: f64) -> String {
    let v = if v.is_finite() { v } else { 0.0 };
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// XML-escape text content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if (c as u32) < 0x20 && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}
