//! # Screen Layout
//!
//! Pure geometry shared by the renderer and the mouse handler. Both call
//! [`Regions::compute`] with the same inputs, so a click always lands on
//! what was drawn.
//!
//! ```text
//! idle                                  focus mode
//! ┌──────────────────────────────┐      ┌──────────────────────────────┐
//! │                              │      │                              │
//! │          ╭────────╮          │      │  ╭────┬──────────────┬───╮   │
//! │          │ quote  │          │      │  │ 百▾│ query        │ → │   │
//! │          │  orb   │          │      │  ╰────┴──────────────┴───╯   │
//! │          ╰────────╯          │      │  ╭────────────────────────╮  │
//! │                              │      │  │ suggestions            │  │
//! │ 专注 · 沉浸    ⟳ 切换壁纸 [r] │      │  ╰────────────────────────╯  │
//! └──────────────────────────────┘      └──────────────────────────────┘
//! ```

use ratatui::layout::{Position, Rect};
use unicode_width::UnicodeWidthStr;

use crate::search::ENGINES;

/// Label of the wallpaper refresh affordance.
pub const REFRESH_LABEL: &str = " ⟳ 切换壁纸 [r] ";
/// Footer motto.
pub const MOTTO: &str = "专注 · 沉浸";
/// Engine menu header.
pub const MENU_TITLE: &str = "搜索引擎";

const ORB_MAX_WIDTH: u16 = 44;
const ORB_MAX_HEIGHT: u16 = 20;
const BAR_MAX_WIDTH: u16 = 68;
const BAR_HEIGHT: u16 = 3;
const ENGINE_BUTTON_WIDTH: u16 = 5;
const SEARCH_BUTTON_WIDTH: u16 = 5;
const MENU_WIDTH: u16 = 20;

/// What a screen position points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Orb,
    EngineButton,
    Input,
    SearchButton,
    /// Somewhere on the search bar frame.
    Bar,
    Suggestion(usize),
    /// The suggestion panel outside any row.
    SuggestionPanel,
    MenuRow(usize),
    /// The engine menu outside any row.
    Menu,
    Refresh,
    Nothing,
}

impl Hit {
    /// Whether the position belongs to the active search box (bar, dropdown
    /// or engine menu). Clicks elsewhere leave focus mode.
    pub fn inside_search_box(self) -> bool {
        matches!(
            self,
            Hit::EngineButton
                | Hit::Input
                | Hit::SearchButton
                | Hit::Bar
                | Hit::Suggestion(_)
                | Hit::SuggestionPanel
                | Hit::MenuRow(_)
                | Hit::Menu
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Regions {
    pub area: Rect,
    pub orb: Option<Rect>,
    pub bar: Option<Rect>,
    pub engine_button: Option<Rect>,
    pub input: Option<Rect>,
    pub search_button: Option<Rect>,
    pub suggestions: Option<Rect>,
    pub suggestion_rows: Vec<Rect>,
    pub menu: Option<Rect>,
    pub menu_rows: Vec<Rect>,
    pub motto: Option<Rect>,
    pub refresh: Option<Rect>,
}

impl Regions {
    pub fn compute(area: Rect, focus_mode: bool, menu_open: bool, suggestion_count: usize) -> Self {
        let mut regions = Regions {
            area,
            ..Default::default()
        };
        if area.width < 8 || area.height < 5 {
            return regions;
        }

        if !focus_mode {
            regions.orb = Some(centered(area, ORB_MAX_WIDTH, ORB_MAX_HEIGHT, 2, 3));
            regions.layout_footer();
            return regions;
        }

        let width = BAR_MAX_WIDTH.min(area.width.saturating_sub(4)).max(area.width.min(20));
        let bar_y = area.y + (area.height.saturating_sub(BAR_HEIGHT)) / 2;
        let bar = Rect::new(area.x + (area.width - width) / 2, bar_y, width, BAR_HEIGHT)
            .intersection(area);
        regions.bar = Some(bar);

        let inner_y = bar.y + 1;
        let engine_button = Rect::new(bar.x + 1, inner_y, ENGINE_BUTTON_WIDTH, 1);
        let search_x = bar.right().saturating_sub(1 + SEARCH_BUTTON_WIDTH);
        let search_button = Rect::new(search_x, inner_y, SEARCH_BUTTON_WIDTH, 1);
        let input_x = engine_button.right() + 1;
        let input = Rect::new(input_x, inner_y, search_x.saturating_sub(input_x + 1), 1);
        regions.engine_button = Some(engine_button.intersection(area));
        regions.search_button = Some(search_button.intersection(area));
        regions.input = Some(input.intersection(area));

        let below = bar.bottom();
        if menu_open {
            let height = ENGINES.len() as u16 + 3;
            let menu = Rect::new(bar.x, below, MENU_WIDTH.min(bar.width), height).intersection(area);
            regions.menu_rows = rows_within(menu, 2, ENGINES.len());
            regions.menu = Some(menu);
        } else if suggestion_count > 0 {
            let height = suggestion_count as u16 + 2;
            let panel = Rect::new(bar.x, below, bar.width, height).intersection(area);
            regions.suggestion_rows = rows_within(panel, 1, suggestion_count);
            regions.suggestions = Some(panel);
        }
        regions
    }

    fn layout_footer(&mut self) {
        let area = self.area;
        let y = area.bottom() - 1;
        let motto_width = MOTTO.width() as u16;
        let refresh_width = REFRESH_LABEL.width() as u16;
        if area.width >= motto_width + refresh_width + 4 {
            self.motto = Some(Rect::new(area.x + 2, y, motto_width, 1));
        }
        if area.width >= refresh_width + 2 {
            let x = area.right() - refresh_width - 1;
            self.refresh = Some(Rect::new(x, y, refresh_width, 1));
        }
    }

    /// Resolve a click position. Overlays win over what lies beneath them.
    pub fn hit(&self, column: u16, row: u16) -> Hit {
        let pos = Position::new(column, row);
        let contains = |rect: &Option<Rect>| rect.is_some_and(|r| r.contains(pos));

        if contains(&self.menu) {
            return self
                .menu_rows
                .iter()
                .position(|r| r.contains(pos))
                .map_or(Hit::Menu, Hit::MenuRow);
        }
        if contains(&self.suggestions) {
            return self
                .suggestion_rows
                .iter()
                .position(|r| r.contains(pos))
                .map_or(Hit::SuggestionPanel, Hit::Suggestion);
        }
        if contains(&self.engine_button) {
            return Hit::EngineButton;
        }
        if contains(&self.search_button) {
            return Hit::SearchButton;
        }
        if contains(&self.input) {
            return Hit::Input;
        }
        if contains(&self.bar) {
            return Hit::Bar;
        }
        if contains(&self.orb) {
            return Hit::Orb;
        }
        if contains(&self.refresh) {
            return Hit::Refresh;
        }
        Hit::Nothing
    }
}

/// A `max_w × max_h` rectangle centred in `area`, shrunk to leave at least
/// `margin_x` / `margin_y` cells on each side.
fn centered(area: Rect, max_w: u16, max_h: u16, margin_x: u16, margin_y: u16) -> Rect {
    let width = max_w.min(area.width.saturating_sub(margin_x * 2)).max(1);
    let height = max_h.min(area.height.saturating_sub(margin_y * 2)).max(1);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// One-row rects inside a bordered panel, starting `skip` rows below its top
/// edge and dropping rows that fall off the bottom border.
fn rows_within(panel: Rect, skip: u16, count: usize) -> Vec<Rect> {
    let inner_x = panel.x + 1;
    let inner_w = panel.width.saturating_sub(2);
    let last = panel.bottom().saturating_sub(1);
    (0..count)
        .map(|i| Rect::new(inner_x, panel.y + skip + i as u16, inner_w, 1))
        .take_while(|r| r.y < last)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Rect {
        Rect::new(0, 0, 120, 40)
    }

    #[test]
    fn test_idle_layout_has_orb_and_footer() {
        let regions = Regions::compute(screen(), false, false, 0);
        let orb = regions.orb.expect("orb");
        assert_eq!((orb.width, orb.height), (ORB_MAX_WIDTH, ORB_MAX_HEIGHT));
        assert!(regions.bar.is_none());
        assert!(regions.refresh.is_some());
        assert!(regions.motto.is_some());

        let center = (orb.x + orb.width / 2, orb.y + orb.height / 2);
        assert_eq!(regions.hit(center.0, center.1), Hit::Orb);
    }

    #[test]
    fn test_focus_layout_hides_footer() {
        let regions = Regions::compute(screen(), true, false, 0);
        assert!(regions.orb.is_none());
        assert!(regions.refresh.is_none());
        assert!(regions.motto.is_none());
        assert!(regions.bar.is_some());
    }

    #[test]
    fn test_bar_parts_are_hit() {
        let regions = Regions::compute(screen(), true, false, 0);
        let engine = regions.engine_button.expect("engine button");
        let input = regions.input.expect("input");
        let search = regions.search_button.expect("search button");
        let bar = regions.bar.expect("bar");

        assert_eq!(regions.hit(engine.x, engine.y), Hit::EngineButton);
        assert_eq!(regions.hit(input.x + 3, input.y), Hit::Input);
        assert_eq!(regions.hit(search.x + 1, search.y), Hit::SearchButton);
        assert_eq!(regions.hit(bar.x, bar.y), Hit::Bar);
        assert_eq!(regions.hit(0, 0), Hit::Nothing);
        assert!(engine.right() < input.x + 1);
        assert!(input.right() <= search.x);
    }

    #[test]
    fn test_suggestion_rows() {
        let regions = Regions::compute(screen(), true, false, 3);
        assert_eq!(regions.suggestion_rows.len(), 3);
        let second = regions.suggestion_rows[1];
        assert_eq!(regions.hit(second.x + 2, second.y), Hit::Suggestion(1));

        let panel = regions.suggestions.expect("panel");
        assert_eq!(regions.hit(panel.x, panel.y), Hit::SuggestionPanel);
        assert!(Hit::SuggestionPanel.inside_search_box());
    }

    #[test]
    fn test_menu_replaces_suggestions() {
        let regions = Regions::compute(screen(), true, true, 4);
        assert!(regions.suggestions.is_none());
        assert_eq!(regions.menu_rows.len(), ENGINES.len());
        let first = regions.menu_rows[0];
        assert_eq!(regions.hit(first.x, first.y), Hit::MenuRow(0));
        let menu = regions.menu.expect("menu");
        // Title row sits above the first engine.
        assert_eq!(regions.hit(menu.x + 2, menu.y + 1), Hit::Menu);
    }

    #[test]
    fn test_refresh_hit() {
        let regions = Regions::compute(screen(), false, false, 0);
        let refresh = regions.refresh.expect("refresh");
        assert_eq!(regions.hit(refresh.x + 1, refresh.y), Hit::Refresh);
        assert!(!Hit::Refresh.inside_search_box());
        assert!(!Hit::Nothing.inside_search_box());
    }

    #[test]
    fn test_small_terminal_clips_rows() {
        let regions = Regions::compute(Rect::new(0, 0, 40, 9), true, false, 6);
        let panel = regions.suggestions.expect("panel");
        assert!(panel.bottom() <= 9);
        assert!(regions.suggestion_rows.len() < 6);
        assert!(regions
            .suggestion_rows
            .iter()
            .all(|r| r.y < panel.bottom() - 1));
    }

    #[test]
    fn test_tiny_terminal_has_no_regions() {
        let regions = Regions::compute(Rect::new(0, 0, 4, 2), true, false, 0);
        assert!(regions.bar.is_none());
        assert_eq!(regions.hit(1, 1), Hit::Nothing);
    }
}
