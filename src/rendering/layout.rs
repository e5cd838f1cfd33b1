/// Box helpers for page layout

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn inset(&self, by: f64) -> Rect {
        Rect {
            x: self.x + by,
            y: self.y + by,
            width: (self.width - 2.0 * by).max(0.0),
            height: (self.height - 2.0 * by).max(0.0),
        }
    }

    /// Split horizontally; `fraction` of the width (minus `gap`) goes left.
    pub fn split_columns(&self, fraction: f64, gap: f64) -> (Rect, Rect) {
        let usable = (self.width - gap).max(0.0);
        let left_w = usable * fraction.clamp(0.0, 1.0);
        let left = Rect::new(self.x, self.y, left_w, self.height);
        let right = Rect::new(self.x + left_w + gap, self.y, usable - left_w, self.height);
        (left, right)
    }

    /// Largest square centred in this rect.
    pub fn centered_square(&self) -> Rect {
        let side = self.width.min(self.height).max(0.0);
        Rect::new(
            self.x + (self.width - side) / 2.0,
            self.y + (self.height - side) / 2.0,
            side,
            side,
        )
    }
}

/// Header, body and footer regions of an activity page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    pub page: Rect,
    pub header: Rect,
    pub content: Rect,
    pub footer: Rect,
}

pub const PAGE_PADDING: f64 = 24.0;
pub const HEADER_HEIGHT: f64 = 48.0;
pub const FOOTER_HEIGHT: f64 = 32.0;

pub fn page_frame(width: u32, height: u32) -> PageFrame {
    let page = Rect::new(0.0, 0.0, width as f64, height as f64);
    let inner = page.inset(PAGE_PADDING);
    let header = Rect::new(inner.x, inner.y, inner.width, HEADER_HEIGHT);
    let footer = Rect::new(inner.x, inner.bottom() - FOOTER_HEIGHT, inner.width, FOOTER_HEIGHT);
    let content = Rect::new(
        inner.x,
        header.bottom(),
        inner.width,
        (footer.y - header.bottom()).max(0.0),
    );
    PageFrame { page, header, content, footer }
}

/// Rough advance width of `text` for a proportional face.
pub fn estimate_text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * 0.55
}

/// Number of characters that fit in `width` at font `size`.
pub fn chars_per_line(width: f64, size: f64) -> usize {
    let per = size * 0.55;
    if per <= 0.0 {
        return 1;
    }
    ((width / per).floor() as usize).max(1)
}

/// Greedy word wrap. Words longer than a line are hard-split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut cur = String::new();
    let mut cur_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !cur.is_empty() {
                lines.push(std::mem::take(&mut cur));
                cur_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }
        if cur_len > 0 && cur_len + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut cur));
            cur_len = 0;
        }
        if cur_len > 0 {
            cur.push(' ');
            cur_len += 1;
        }
        cur_len += word.len();
        cur.extend(word);
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

/// Cut `text` to `max_chars`, marking the cut with an ellipsis.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
