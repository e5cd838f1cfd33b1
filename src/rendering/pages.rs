//! Per-variant page layouts.
//!
//! Every layout tolerates malformed model geometry: cells and letters that
//! fall outside the declared grid are skipped, and text that runs past the
//! bottom of the page is dropped rather than overflowing the footer.

use std::collections::BTreeSet;

use log::{debug, warn};

use crate::activity::{
    ConnectTheDotsData, CoverPage, CrosswordData, Direction, GeneratedActivity, PrintablePage, QuizData,
    WordSearchData,
};
use crate::rendering::layout::{
    chars_per_line, estimate_text_width, page_frame, truncate, wrap_text, PageFrame, Rect,
};
use crate::rendering::paint::{Anchor, DisplayList, Rgb, Stroke, TextStyle, BLACK, WHITE};
use crate::rendering::{PageSurface, PAGE_HEIGHT, PAGE_WIDTH};

/// Grid sides above this are clamped; a model asking for a 10^6 grid must
/// not allocate it.
pub const MAX_GRID_SIDE: usize = 40;

const COVER_BG: Rgb = (254, 252, 232);
const SLATE_700: Rgb = (51, 65, 85);
const SLATE_800: Rgb = (30, 41, 59);
const GRAY_200: Rgb = (229, 231, 235);
const GRAY_400: Rgb = (156, 163, 175);
const GRAY_600: Rgb = (75, 85, 99);
const PILL_BG: Rgb = (254, 249, 195);
const PILL_TEXT: Rgb = (133, 77, 14);

const COVER_TITLE: &str = "Meu Livrinho de Atividades";
const THEME_LABEL: &str = "Tema:";
const NAME_LABEL: &str = "Nome:";
const PAGE_LABEL: &str = "Página";
const ACROSS_LABEL: &str = "Horizontal";
const DOWN_LABEL: &str = "Vertical";
const WORD_BANK_LABEL: &str = "Encontre estas palavras:";

/// Render every page in booklet order. Page numbers are sequence indices,
/// so the cover is page 0 and carries no number.
pub fn render_booklet(pages: &[PrintablePage]) -> Vec<PageSurface> {
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| render_page(page, i))
        .collect()
}

/// Render one page to an SVG surface.
pub fn render_page(page: &PrintablePage, page_number: usize) -> PageSurface {
    let mut dl = DisplayList::new(PAGE_WIDTH, PAGE_HEIGHT);
    match page {
        PrintablePage::Cover(cover) => draw_cover(&mut dl, cover),
        PrintablePage::Activity(activity) => {
            let frame = page_frame(PAGE_WIDTH, PAGE_HEIGHT);
            draw_chrome(&mut dl, &frame, activity.title(), page_number);
            match activity {
                GeneratedActivity::ConnectTheDots(d) => draw_connect_the_dots(&mut dl, frame.content, d),
                GeneratedActivity::Crossword(d) => draw_crossword(&mut dl, frame.content, d),
                GeneratedActivity::WordSearch(d) => draw_word_search(&mut dl, frame.content, d),
                GeneratedActivity::Quiz(d) => draw_quiz(&mut dl, frame.content, d),
            }
        }
    }
    debug!("page {} rendered with {} paint commands", page_number, dl.commands.len());
    PageSurface {
        width: dl.width,
        height: dl.height,
        svg: dl.to_svg(),
    }
}

fn draw_cover(dl: &mut DisplayList, cover: &CoverPage) {
    let page = Rect::new(0.0, 0.0, PAGE_WIDTH as f64, PAGE_HEIGHT as f64);
    dl.rect(page.x, page.y, page.width, page.height, Some(COVER_BG), None);

    // double border
    let outer = page.inset(32.0);
    let inner = page.inset(42.0);
    let border = Some(Stroke { rgb: SLATE_700, width: 3.0 });
    dl.rect(outer.x, outer.y, outer.width, outer.height, None, border);
    dl.rect(inner.x, inner.y, inner.width, inner.height, None, border);

    let cx = page.center_x();
    dl.text(
        cx,
        page.height * 0.32,
        COVER_TITLE,
        TextStyle::new(44.0).bold().color(SLATE_800).anchor(Anchor::Middle),
    );

    let theme_style = TextStyle::new(24.0).color(GRAY_600).anchor(Anchor::Middle);
    let theme_line = format!("{} {}", THEME_LABEL, cover.theme);
    let mut y = page.height * 0.32 + 64.0;
    for line in wrap_text(&theme_line, chars_per_line(inner.width - 48.0, 24.0)) {
        dl.text(cx, y, line, theme_style);
        y += 32.0;
    }

    let name_style = TextStyle::new(32.0).bold().color(SLATE_800).anchor(Anchor::Middle);
    let mut y = page.height * 0.72;
    for line in wrap_text(&cover.recipient_name, chars_per_line(inner.width - 48.0, 32.0)) {
        dl.text(cx, y, line, name_style);
        y += 40.0;
    }
}

/// Shared header (title + name blank) and footer (page number).
fn draw_chrome(dl: &mut DisplayList, frame: &PageFrame, title: &str, page_number: usize) {
    let rule = Stroke { rgb: GRAY_200, width: 2.0 };
    let header = frame.header;

    let name_blank = 128.0;
    let name_right = header.right();
    let name_x = name_right - name_blank - 8.0;
    let baseline = header.y + 30.0;
    dl.text(name_x, baseline, NAME_LABEL, TextStyle::new(14.0).bold().anchor(Anchor::End));
    dl.line(
        name_x + 4.0,
        baseline + 2.0,
        name_right,
        baseline + 2.0,
        Stroke { rgb: GRAY_400, width: 2.0 },
    );

    let title_room = name_x - header.x - estimate_text_width(NAME_LABEL, 14.0) - 16.0;
    dl.text(
        header.x,
        baseline,
        truncate(title, chars_per_line(title_room, 20.0)),
        TextStyle::new(20.0).bold(),
    );
    dl.line(header.x, header.bottom() - 6.0, header.right(), header.bottom() - 6.0, rule);

    let footer = frame.footer;
    dl.line(footer.x, footer.y + 4.0, footer.right(), footer.y + 4.0, rule);
    dl.text(
        footer.center_x(),
        footer.y + 24.0,
        format!("{} {}", PAGE_LABEL, page_number),
        TextStyle::new(12.0).color(GRAY_400).anchor(Anchor::Middle),
    );
}

fn draw_connect_the_dots(dl: &mut DisplayList, area: Rect, data: &ConnectTheDotsData) {
    // 0..100 plane padded by 2.5 on each side, as a 105-unit square
    let square = area.inset(16.0).centered_square();
    let unit = square.width / 105.0;
    let label = TextStyle::new(5.0 * unit).bold().anchor(Anchor::Middle);

    for (i, p) in data.points.iter().enumerate() {
        let cx = square.x + (p.x + 2.5) * unit;
        let cy = square.y + (p.y + 2.5) * unit;
        dl.circle(cx, cy, 1.2 * unit, Some(BLACK), None);
        dl.text(cx, cy - 3.0 * unit, (i + 1).to_string(), label);
    }
}

/// Cells covered by the crossword answers, as `(row, col)` pairs.
///
/// Each answer walks from its starting cell: across increments the column,
/// down increments the row. Cells outside `[0, grid_size)` are skipped.
pub fn crossword_cells(data: &CrosswordData) -> BTreeSet<(usize, usize)> {
    let size = clamp_grid(data.grid_size) as i64;
    let mut cells = BTreeSet::new();
    for clue in &data.clues {
        for i in 0..clue.answer.chars().count() as i64 {
            let (r, c) = match clue.direction {
                Direction::Across => (clue.row, clue.col.saturating_add(i)),
                Direction::Down => (clue.row.saturating_add(i), clue.col),
            };
            if (0..size).contains(&r) && (0..size).contains(&c) {
                cells.insert((r as usize, c as usize));
            }
        }
    }
    cells
}

fn clamp_grid(grid_size: i64) -> usize {
    if grid_size > MAX_GRID_SIDE as i64 {
        warn!(
            "grid size {} clamped to {}; cells past the edge are not drawn",
            grid_size, MAX_GRID_SIDE
        );
    }
    grid_size.clamp(0, MAX_GRID_SIDE as i64) as usize
}

fn draw_crossword(dl: &mut DisplayList, area: Rect, data: &CrosswordData) {
    let (grid_col, clue_col) = area.split_columns(0.5, 16.0);
    let size = clamp_grid(data.grid_size);

    if size > 0 {
        let square = grid_col.inset(8.0).centered_square();
        let cell = square.width / size as f64;
        let k = cell / 40.0;
        let stroke = Some(Stroke { rgb: BLACK, width: 2.0 * k });
        for (r, c) in crossword_cells(data) {
            dl.rect(
                square.x + c as f64 * cell,
                square.y + r as f64 * cell,
                cell,
                cell,
                Some(WHITE),
                stroke,
            );
        }
        let num_style = TextStyle::new(10.0 * k);
        for clue in &data.clues {
            let in_bounds = (0..size as i64).contains(&clue.row) && (0..size as i64).contains(&clue.col);
            if !in_bounds {
                continue;
            }
            dl.text(
                square.x + clue.col as f64 * cell + 3.0 * k,
                square.y + clue.row as f64 * cell + 12.0 * k,
                clue.num.to_string(),
                num_style,
            );
        }
    }

    let mut cursor = TextCursor::new(clue_col.inset(8.0));
    for (heading, direction) in [(ACROSS_LABEL, Direction::Across), (DOWN_LABEL, Direction::Down)] {
        cursor.gap(8.0);
        cursor.line(dl, heading, TextStyle::new(18.0).bold(), 0.0);
        let mut clues: Vec<_> = data.clues.iter().filter(|c| c.direction == direction).collect();
        clues.sort_by_key(|c| c.num);
        for clue in clues {
            cursor.paragraph(dl, &format!("{}. {}", clue.num, clue.clue), TextStyle::new(13.0), 8.0);
        }
    }
}

fn draw_word_search(dl: &mut DisplayList, area: Rect, data: &WordSearchData) {
    let (grid_col, bank_col) = area.split_columns(2.0 / 3.0, 16.0);
    let size = clamp_grid(data.grid_size);

    if size > 0 {
        let square = grid_col.inset(8.0).centered_square();
        let cell = square.width / size as f64;
        let style = TextStyle::new(cell * 0.55).bold().mono().anchor(Anchor::Middle);
        for (r, row) in data.grid.iter().enumerate().take(size) {
            for (c, letter) in row.iter().enumerate().take(size) {
                dl.text(
                    square.x + c as f64 * cell + cell / 2.0,
                    square.y + r as f64 * cell + cell / 2.0 + cell * 0.2,
                    letter.clone(),
                    style,
                );
            }
        }
    }

    let bank = bank_col.inset(8.0);
    let pill_h = 28.0;
    let pill_gap = 10.0;
    let block_h = 40.0 + data.words.len() as f64 * (pill_h + pill_gap);
    let mut y = bank.y + ((bank.height - block_h) / 2.0).max(0.0);

    dl.text(
        bank.center_x(),
        y + 20.0,
        WORD_BANK_LABEL,
        TextStyle::new(15.0).bold().anchor(Anchor::Middle),
    );
    y += 40.0;

    let pill_text = TextStyle::new(15.0).bold().color(PILL_TEXT).anchor(Anchor::Middle);
    for word in &data.words {
        if y + pill_h > bank.bottom() {
            break;
        }
        let shown = truncate(word, chars_per_line(bank.width - 24.0, 15.0));
        let w = (estimate_text_width(&shown, 15.0) + 24.0).min(bank.width);
        dl.rounded_rect(bank.center_x() - w / 2.0, y, w, pill_h, pill_h / 2.0, PILL_BG);
        dl.text(bank.center_x(), y + 19.0, shown, pill_text);
        y += pill_h + pill_gap;
    }
}

fn draw_quiz(dl: &mut DisplayList, area: Rect, data: &QuizData) {
    let mut cursor = TextCursor::new(area.inset(16.0));
    let option_style = TextStyle::new(15.0);
    let last = data.questions.len().saturating_sub(1);

    for (i, q) in data.questions.iter().enumerate() {
        cursor.gap(6.0);
        cursor.paragraph(dl, &format!("{}. {}", i + 1, q.question), TextStyle::new(17.0).bold(), 0.0);
        cursor.gap(4.0);
        for option in &q.options {
            if let Some(baseline) = cursor.paragraph(dl, option, option_style, 44.0) {
                // unselected choice marker
                dl.circle(
                    cursor.area.x + 26.0,
                    baseline - 5.0,
                    8.0,
                    None,
                    Some(Stroke { rgb: GRAY_400, width: 1.5 }),
                );
            }
        }
        if i != last {
            cursor.gap(8.0);
            cursor.rule(dl);
        }
    }
}

/// Top-down text flow inside a column; anything past the bottom is dropped.
struct TextCursor {
    area: Rect,
    y: f64,
}

impl TextCursor {
    fn new(area: Rect) -> Self {
        Self { area, y: area.y }
    }

    fn gap(&mut self, by: f64) {
        self.y += by;
    }

    fn line_height(style: &TextStyle) -> f64 {
        style.size * 1.4
    }

    /// Draw a single line; returns its baseline if it fit.
    fn line(&mut self, dl: &mut DisplayList, text: &str, style: TextStyle, indent: f64) -> Option<f64> {
        let lh = Self::line_height(&style);
        if self.y + lh > self.area.bottom() {
            return None;
        }
        let baseline = self.y + style.size;
        dl.text(self.area.x + indent, baseline, text, style);
        self.y += lh;
        Some(baseline)
    }

    /// Draw wrapped text; returns the first line's baseline if any line fit.
    fn paragraph(&mut self, dl: &mut DisplayList, text: &str, style: TextStyle, indent: f64) -> Option<f64> {
        let max = chars_per_line(self.area.width - indent, style.size);
        let mut first = None;
        for line in wrap_text(text, max) {
            match self.line(dl, &line, style, indent) {
                Some(b) => {
                    first.get_or_insert(b);
                }
                None => break,
            }
        }
        first
    }

    fn rule(&mut self, dl: &mut DisplayList) {
        if self.y < self.area.bottom() {
            dl.line(
                self.area.x,
                self.y,
                self.area.right(),
                self.y,
                Stroke { rgb: GRAY_200, width: 1.0 },
            );
        }
    }
}
