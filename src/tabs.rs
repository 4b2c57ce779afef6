#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Game,
    SaveLoad,
    Control,
    Options,
    System,
    About,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Game,
        Tab::SaveLoad,
        Tab::Control,
        Tab::Options,
        Tab::System,
        Tab::About,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Game => "Game",
            Tab::SaveLoad => "Save/Load",
            Tab::Control => "Control",
            Tab::Options => "Options",
            Tab::System => "System",
            Tab::About => "About",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Save/Load and System only make sense with a game running.
    pub fn is_visible(self, game_loaded: bool) -> bool {
        game_loaded || !matches!(self, Tab::SaveLoad | Tab::System)
    }

    pub fn next(self, game_loaded: bool) -> Tab {
        self.step(1, game_loaded)
    }

    pub fn prev(self, game_loaded: bool) -> Tab {
        self.step(Tab::ALL.len() - 1, game_loaded)
    }

    fn step(self, by: usize, game_loaded: bool) -> Tab {
        let n = Tab::ALL.len();
        let mut i = self.index();
        for _ in 0..n {
            i = (i + by) % n;
            if Tab::ALL[i].is_visible(game_loaded) {
                return Tab::ALL[i];
            }
        }
        self
    }

    pub fn visible(game_loaded: bool) -> impl Iterator<Item = Tab> {
        Tab::ALL.into_iter().filter(move |t| t.is_visible(game_loaded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tabs_with_game() {
        assert_eq!(Tab::Game.next(true), Tab::SaveLoad);
        assert_eq!(Tab::About.next(true), Tab::Game);
        assert_eq!(Tab::Game.prev(true), Tab::About);
        assert_eq!(Tab::visible(true).count(), 6);
    }

    #[test]
    fn test_hidden_tabs_are_skipped_without_game() {
        assert_eq!(Tab::Game.next(false), Tab::Control);
        assert_eq!(Tab::Options.next(false), Tab::About);
        assert_eq!(Tab::About.prev(false), Tab::Options);
        assert_eq!(Tab::Control.prev(false), Tab::Game);
        assert_eq!(Tab::Game.prev(false), Tab::About);
        let labels: Vec<&str> = Tab::visible(false).map(Tab::label).collect();
        assert_eq!(labels, ["Game", "Control", "Options", "About"]);
    }

    #[test]
    fn test_hidden_current_tab_moves_to_visible_one() {
        assert_eq!(Tab::SaveLoad.next(false), Tab::Control);
        assert_eq!(Tab::System.prev(false), Tab::Options);
    }
}
