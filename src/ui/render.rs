use crate::quotes::{Phase, QuoteScale};
use crate::search::ENGINES;
use crate::ui::app::App;
use crate::ui::layout::{Regions, MENU_TITLE, MOTTO, REFRESH_LABEL};
use crate::wallpaper::WallpaperView;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Glyph drawn under the next character slot of a vertical quote.
const VERTICAL_CURSOR: &str = "▁▁";
const HORIZONTAL_CURSOR: &str = "▏";
const SEAL: &str = "搜";

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let regions = app.regions();

    render_wallpaper(frame, app, area);

    if app.focus_mode {
        render_search_bar(frame, app, &regions);
        render_suggestions(frame, app, &regions);
        render_engine_menu(frame, app, &regions);
    } else {
        if let Some(orb) = regions.orb {
            render_orb(frame, app, orb);
        }
        render_footer(frame, app, &regions);
    }
}

fn render_wallpaper(frame: &mut Frame, app: &App, area: Rect) {
    match app.wallpaper.grid() {
        Some(grid) => frame.render_widget(WallpaperView::new(grid), area),
        None => frame.render_widget(
            Block::new().style(Style::default().bg(app.theme.backdrop)),
            area,
        ),
    }
}

fn glass_block(app: &App) -> Block<'static> {
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.glass_border))
        .style(Style::default().bg(app.theme.glass))
}

// ---------------------------------------------------------------------------
// Quote orb
// ---------------------------------------------------------------------------

fn render_orb(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.glass_border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if is_vertical(&app.typewriter.quote().text) {
        render_vertical_quote(frame.buffer_mut(), app, inner);
    } else {
        render_horizontal_quote(frame, app, inner);
    }
}

/// Whether `text` should be set in vertical columns: every visible glyph is
/// double width.
pub fn is_vertical(text: &str) -> bool {
    let mut glyphs = text.chars().filter(|c| !c.is_whitespace()).peekable();
    glyphs.peek().is_some() && glyphs.all(|c| c.width() == Some(2))
}

fn is_clause_break(c: char) -> bool {
    matches!(c, '，' | '。' | '；' | '、' | '！' | '？' | '：')
}

/// Break `text` into columns of at most `max_rows` glyphs. A column also
/// ends after clause punctuation.
pub fn vertical_columns(text: &str, max_rows: usize) -> Vec<Vec<char>> {
    let max_rows = max_rows.max(1);
    let mut columns = Vec::new();
    let mut current = Vec::new();
    for c in text.chars() {
        current.push(c);
        if current.len() == max_rows || is_clause_break(c) {
            columns.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        columns.push(current);
    }
    columns
}

/// Write `symbol` only if it fits entirely inside `bounds`.
fn put(buf: &mut Buffer, bounds: Rect, x: u16, y: u16, symbol: &str, style: Style) {
    let width = symbol.width() as u16;
    if width == 0 || x < bounds.x || y < bounds.y || y >= bounds.bottom() {
        return;
    }
    if x + width > bounds.right() {
        return;
    }
    buf.set_string(x, y, symbol, style);
}

fn render_vertical_quote(buf: &mut Buffer, app: &App, inner: Rect) {
    let typewriter = &app.typewriter;
    let quote = typewriter.quote();
    let theme = app.theme;

    let scale = QuoteScale::for_text(&quote.text);
    let gap = scale.glyph_gap();
    let step = 1 + gap;
    let capacity = usize::from((inner.height + gap) / step);
    let columns = vertical_columns(&quote.text, capacity);
    if columns.is_empty() {
        return;
    }

    // Quote columns on the right, author column on the left.
    let pitch = 2 + scale.column_gap();
    let quote_width = (columns.len() as u16 * pitch).saturating_sub(scale.column_gap());
    let author_vertical = is_vertical(&quote.author);
    let total = quote_width + if author_vertical { pitch } else { 0 };
    let left = inner.x + inner.width.saturating_sub(total) / 2;
    let right = left + total;

    let tallest = columns.iter().map(Vec::len).max().unwrap_or(0) as u16;
    let block_height = (tallest * step).saturating_sub(gap);
    let top = inner.y + inner.height.saturating_sub(block_height) / 2;

    let ink = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    let revealed = typewriter.revealed();
    let mut index = 0;
    let mut cursor = None;
    let slot = |c: usize, r: usize| -> Option<(u16, u16)> {
        let x = right.checked_sub(2 + c as u16 * pitch)?;
        Some((x, top + r as u16 * step))
    };

    for (c, column) in columns.iter().enumerate() {
        for (r, glyph) in column.iter().enumerate() {
            if let Some((x, y)) = slot(c, r) {
                if index < revealed {
                    let mut tmp = [0u8; 4];
                    put(buf, inner, x, y, glyph.encode_utf8(&mut tmp), ink);
                } else if index == revealed {
                    cursor = Some((x, y));
                }
            }
            index += 1;
        }
    }
    if cursor.is_none() {
        let last = columns.len() - 1;
        cursor = slot(last, columns[last].len());
    }
    if app.cursor_visible() {
        if let Some((x, y)) = cursor {
            put(buf, inner, x, y, VERTICAL_CURSOR, Style::default().fg(theme.text));
        }
    }

    if typewriter.phase() != Phase::Waiting {
        return;
    }

    let bottom = top + block_height;
    if author_vertical {
        let author: Vec<char> = quote.author.chars().collect();
        let rows = author.len() as u16;
        let author_top = bottom.saturating_sub(rows + 2).max(inner.y);
        let style = Style::default().fg(theme.text_dim).add_modifier(Modifier::BOLD);
        for (i, glyph) in author.iter().enumerate() {
            let mut tmp = [0u8; 4];
            put(buf, inner, left, author_top + i as u16, glyph.encode_utf8(&mut tmp), style);
        }
        put(buf, inner, left, author_top + rows + 1, SEAL, seal_style(app));
    } else {
        let line = format!("—— {}", quote.author);
        let x = right.saturating_sub(line.width() as u16 + 3);
        put(buf, inner, x, bottom + 1, &line, Style::default().fg(theme.text_dim));
        put(buf, inner, right.saturating_sub(2), bottom + 1, SEAL, seal_style(app));
    }
}

fn seal_style(app: &App) -> Style {
    Style::default()
        .fg(Color::White)
        .bg(app.theme.seal)
        .add_modifier(Modifier::BOLD)
}

fn render_horizontal_quote(frame: &mut Frame, app: &App, inner: Rect) {
    let typewriter = &app.typewriter;
    let theme = app.theme;

    let mut text = vec![Span::styled(
        typewriter.displayed().to_string(),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    )];
    if app.cursor_visible() {
        text.push(Span::styled(HORIZONTAL_CURSOR, Style::default().fg(theme.text)));
    }
    let mut lines = vec![Line::from(text), Line::from("")];
    if typewriter.phase() == Phase::Waiting {
        lines.push(Line::from(vec![
            Span::styled(
                format!("—— {}  ", typewriter.quote().author),
                Style::default().fg(theme.text_dim),
            ),
            Span::styled(SEAL, seal_style(app)),
        ]));
    }

    let y = inner.y + inner.height / 3;
    let area = Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), inner.bottom() - y);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

// ---------------------------------------------------------------------------
// Search bar, suggestions, engine menu
// ---------------------------------------------------------------------------

fn render_search_bar(frame: &mut Frame, app: &App, regions: &Regions) {
    let Some(bar) = regions.bar else {
        return;
    };
    let theme = app.theme;
    let search_box = &app.search_box;
    let engine = search_box.engine();

    frame.render_widget(Clear, bar);
    frame.render_widget(glass_block(app), bar);

    if let Some(button) = regions.engine_button {
        let (r, g, b) = engine.icon.rgb;
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                engine.icon.glyph,
                Style::default().fg(Color::Rgb(r, g, b)).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ▾", Style::default().fg(theme.text_dim)),
        ]);
        frame.render_widget(Paragraph::new(line), button);
    }

    if let Some(input) = regions.input {
        if input.x > bar.x {
            let separator = Rect::new(input.x - 1, input.y, 1, 1);
            frame.render_widget(
                Paragraph::new("│").style(Style::default().fg(theme.glass_border)),
                separator,
            );
        }

        let query = search_box.query();
        let visible = tail_fitting(query, input.width.saturating_sub(1));
        let content = if query.is_empty() {
            Span::styled(
                engine.placeholder,
                Style::default()
                    .fg(theme.text_dim)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::styled(visible, Style::default().fg(theme.text))
        };
        frame.render_widget(Paragraph::new(Line::from(content)), input);

        if search_box.input_focused() {
            let x = input.x + visible.width() as u16;
            frame.set_cursor_position(Position::new(x.min(input.right()), input.y));
        }
    }

    if let Some(button) = regions.search_button {
        frame.render_widget(
            Paragraph::new("→")
                .alignment(Alignment::Center)
                .style(seal_style(app)),
            button,
        );
    }
}

/// Longest suffix of `text` that fits in `width` columns.
fn tail_fitting(text: &str, width: u16) -> &str {
    let mut used = 0usize;
    let mut start = text.len();
    for (i, c) in text.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > usize::from(width) {
            break;
        }
        start = i;
    }
    &text[start..]
}

fn render_suggestions(frame: &mut Frame, app: &App, regions: &Regions) {
    let Some(panel) = regions.suggestions else {
        return;
    };
    let theme = app.theme;
    frame.render_widget(Clear, panel);
    frame.render_widget(glass_block(app), panel);

    let suggestions = app.search_box.suggestions();
    for (i, row) in regions.suggestion_rows.iter().enumerate() {
        let Some(text) = suggestions.get(i) else {
            break;
        };
        let selected = app.search_box.selected() == Some(i);
        let style = if selected {
            Style::default().bg(theme.highlight_bg)
        } else {
            Style::default()
        };
        let line = Line::from(vec![
            Span::styled(" ⌕ ", Style::default().fg(theme.text_dim)),
            Span::styled(
                text.as_str(),
                Style::default().fg(theme.text).add_modifier(if selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                }),
            ),
        ]);
        frame.render_widget(Paragraph::new(line).style(style), *row);
    }
}

fn render_engine_menu(frame: &mut Frame, app: &App, regions: &Regions) {
    let Some(menu_area) = regions.menu else {
        return;
    };
    let theme = app.theme;
    let menu = app.search_box.menu();
    frame.render_widget(Clear, menu_area);
    frame.render_widget(glass_block(app), menu_area);

    if menu_area.height > 2 {
        let header = Rect::new(menu_area.x + 1, menu_area.y + 1, menu_area.width.saturating_sub(2), 1);
        frame.render_widget(
            Paragraph::new(format!(" {MENU_TITLE}")).style(Style::default().fg(theme.text_dim)),
            header,
        );
    }

    for (i, (row, engine)) in regions.menu_rows.iter().zip(ENGINES.iter()).enumerate() {
        let active = engine.id == menu.active_id();
        let style = if i == menu.highlighted() {
            Style::default().bg(theme.highlight_bg)
        } else {
            Style::default()
        };
        let (r, g, b) = engine.icon.rgb;
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(engine.icon.glyph, Style::default().fg(Color::Rgb(r, g, b))),
            Span::raw(" "),
            Span::styled(
                engine.name,
                if active {
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text)
                },
            ),
            Span::styled(if active { " ✓" } else { "" }, Style::default().fg(theme.accent)),
        ]);
        frame.render_widget(Paragraph::new(line).style(style), *row);
    }
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

fn render_footer(frame: &mut Frame, app: &App, regions: &Regions) {
    let theme = app.theme;
    if let Some(motto) = regions.motto {
        frame.render_widget(
            Paragraph::new(MOTTO).style(Style::default().fg(theme.text_dim)),
            motto,
        );
    }
    if let Some(refresh) = regions.refresh {
        let fg = if app.wallpaper.is_loading() {
            theme.accent
        } else {
            theme.text
        };
        frame.render_widget(
            Paragraph::new(REFRESH_LABEL).style(Style::default().fg(fg).bg(theme.glass)),
            refresh,
        );
    }
}
