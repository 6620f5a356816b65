use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥70 cols: category column in the menu, keypad hints on the card
    Narrow, // <70 cols: titles and averages only
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 70 {
            LayoutTier::Wide
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_category(&self) -> bool {
        *self == LayoutTier::Wide
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(2),
            ])
            .split(area);

        Self {
            header: vertical[0],
            main: vertical[1],
            footer: vertical[2],
            tier: LayoutTier::from_area(area),
        }
    }
}

/// Greedily pack `hints` into lines no wider than `width`.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width || !has_hint {
            current = candidate;
        } else {
            out.push(current);
            current = format!("{prefix}{hint}");
        }
        has_hint = true;
    }

    if has_hint {
        out.push(current);
    }
    out
}

/// A `width` x `height` rect centred in `area`, clamped to fit.
pub fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let left = area.x.saturating_add((area.width - w) / 2);
    let top = area.y.saturating_add((area.height - h) / 2);
    Rect::new(left, top, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_threshold() {
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 69, 20)), LayoutTier::Narrow);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 70, 20)), LayoutTier::Wide);
    }

    #[test]
    fn test_pack_hint_lines_wraps() {
        let lines = pack_hint_lines(&["[0-9] digit", "[-] sign", "[Tab] next"], 22);
        assert_eq!(lines, vec![" [0-9] digit  [-] sign", " [Tab] next"]);
    }

    #[test]
    fn test_pack_hint_lines_overlong_hint_gets_own_line() {
        let lines = pack_hint_lines(&["[Esc] back to menu"], 5);
        assert_eq!(lines, vec![" [Esc] back to menu"]);
        assert!(pack_hint_lines(&[], 40).is_empty());
    }

    #[test]
    fn test_centered_box_clamps() {
        let area = Rect::new(10, 5, 40, 10);
        assert_eq!(centered_box(20, 4, area), Rect::new(20, 8, 20, 4));
        assert_eq!(centered_box(100, 100, area), area);
    }
}
