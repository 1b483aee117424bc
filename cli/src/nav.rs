//! Navigation sidebar model
//!
//! Holds the ordered list of menu items and the collapsed flag. Reordering
//! and collapsing are plain state changes here; the caller persists them
//! through [`UiPrefs`](crate::prefs::UiPrefs) so the layout survives
//! restarts. Unknown names in a stored order are dropped and screens missing
//! from it are appended in default order, so an old preferences file never
//! hides a screen.

use crate::guard::{Screen, DEFAULT_MENU};
use crate::prefs::UiPrefs;

/// Sidebar state: item order plus collapsed flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavMenu {
    items: Vec<Screen>,
    collapsed: bool,
}

impl NavMenu {
    /// Sidebar in default order, expanded
    pub fn new() -> Self {
        Self {
            items: DEFAULT_MENU.to_vec(),
            collapsed: false,
        }
    }

    /// Rebuild the sidebar from stored preferences
    pub fn from_prefs(prefs: &UiPrefs) -> Self {
        let mut items: Vec<Screen> = Vec::with_capacity(DEFAULT_MENU.len());
        for name in &prefs.menu_order {
            if let Some(screen) = Screen::parse(name) {
                if DEFAULT_MENU.contains(&screen) && !items.contains(&screen) {
                    items.push(screen);
                }
            }
        }

        // Screens a stored order doesn't mention keep their default slot
        for screen in DEFAULT_MENU {
            if !items.contains(screen) {
                items.push(*screen);
            }
        }

        Self {
            items,
            collapsed: prefs.sidebar_collapsed,
        }
    }

    /// Write the sidebar state back into preferences
    pub fn store(&self, prefs: &mut UiPrefs) {
        prefs.sidebar_collapsed = self.collapsed;
        prefs.menu_order = self.items.iter().map(|s| s.name().to_string()).collect();
    }

    pub fn items(&self) -> &[Screen] {
        &self.items
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    /// Move the item at `from` to position `to` (both 1-based, as displayed)
    ///
    /// Returns false and leaves the order untouched when either position is
    /// out of range.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from == 0 || to == 0 || from > self.items.len() || to > self.items.len() {
            return false;
        }
        let item = self.items.remove(from - 1);
        self.items.insert(to - 1, item);
        true
    }

    /// Render the sidebar, marking the current screen
    pub fn render(&self, current: Screen) -> String {
        if self.collapsed {
            let line = self
                .items
                .iter()
                .map(|s| {
                    if *s == current {
                        format!("[{}]", s.name())
                    } else {
                        s.name().to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join("  ");
            return format!("{}\n", line);
        }

        let mut output = String::new();
        for (idx, screen) in self.items.iter().enumerate() {
            let marker = if *screen == current { ">" } else { " " };
            output.push_str(&format!("{} {:2}. {}\n", marker, idx + 1, screen.label()));
        }
        output
    }
}

impl Default for NavMenu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let nav = NavMenu::new();
        assert_eq!(nav.items(), DEFAULT_MENU);
        assert!(!nav.is_collapsed());
    }

    #[test]
    fn test_move_item_is_one_based() {
        let mut nav = NavMenu::new();
        assert!(nav.move_item(2, 1));
        assert_eq!(nav.items()[0], Screen::Products);
        assert_eq!(nav.items()[1], Screen::Home);
    }

    #[test]
    fn test_move_item_out_of_range_is_rejected() {
        let mut nav = NavMenu::new();
        let before = nav.items().to_vec();
        assert!(!nav.move_item(0, 1));
        assert!(!nav.move_item(1, 99));
        assert_eq!(nav.items(), &before[..]);
    }

    #[test]
    fn test_round_trip_through_prefs() {
        let mut nav = NavMenu::new();
        nav.move_item(11, 1);
        nav.toggle_collapsed();

        let mut prefs = UiPrefs::default();
        nav.store(&mut prefs);
        let restored = NavMenu::from_prefs(&prefs);

        assert_eq!(restored, nav);
        assert_eq!(restored.items()[0], Screen::Chat);
        assert!(restored.is_collapsed());
    }

    #[test]
    fn test_unknown_names_in_stored_order_are_dropped() {
        let prefs = UiPrefs {
            sidebar_collapsed: false,
            chat_panel_rows: 8,
            menu_order: vec![
                "invoices".to_string(),
                "ledger".to_string(),
                "chat".to_string(),
            ],
        };

        let nav = NavMenu::from_prefs(&prefs);

        assert_eq!(nav.items()[0], Screen::Invoices);
        assert_eq!(nav.items()[1], Screen::Chat);
        // Everything else follows in default order, nothing lost
        assert_eq!(nav.items().len(), DEFAULT_MENU.len());
        assert!(nav.items().contains(&Screen::Home));
    }

    #[test]
    fn test_duplicate_names_in_stored_order_are_dropped() {
        let prefs = UiPrefs {
            sidebar_collapsed: false,
            chat_panel_rows: 8,
            menu_order: vec![
                "home".to_string(),
                "invoices".to_string(),
                "home".to_string(),
            ],
        };

        let nav = NavMenu::from_prefs(&prefs);

        assert_eq!(nav.items().len(), DEFAULT_MENU.len());
        assert_eq!(
            nav.items().iter().filter(|s| **s == Screen::Home).count(),
            1
        );
    }

    #[test]
    fn test_partial_stored_order_appends_missing_screens() {
        let prefs = UiPrefs {
            sidebar_collapsed: true,
            chat_panel_rows: 8,
            menu_order: vec!["reports".to_string()],
        };

        let nav = NavMenu::from_prefs(&prefs);

        assert_eq!(nav.items()[0], Screen::Reports);
        assert_eq!(nav.items()[1], Screen::Home);
        assert_eq!(nav.items().len(), DEFAULT_MENU.len());
    }

    #[test]
    fn test_render_marks_current_screen() {
        let nav = NavMenu::new();
        let output = nav.render(Screen::Invoices);
        let line = output.lines().find(|l| l.contains("Invoices")).unwrap();
        assert!(line.starts_with('>'));
        let other = output.lines().find(|l| l.contains("Home")).unwrap();
        assert!(other.starts_with(' '));
    }

    #[test]
    fn test_render_collapsed_is_single_line() {
        let mut nav = NavMenu::new();
        nav.set_collapsed(true);
        let output = nav.render(Screen::Home);
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("[home]"));
    }
}
