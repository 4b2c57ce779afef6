//! Quick-load file browser state.

use std::path::{Path, PathBuf};

/// ROM extensions the browser lists, compared case-insensitively.
pub const ROM_EXTENSIONS: [&str; 8] = ["smc", "fig", "sfc", "gd3", "gd7", "dx2", "bsx", "swc"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Parent,
    Dir,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

pub fn is_rom(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ROM_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// List `dir`: `..` first when it has a parent, then subdirectories, then
/// ROMs, each group sorted by name.
pub fn scan_dir(dir: &Path) -> Vec<Entry> {
    let mut dirs: Vec<Entry> = Vec::new();
    let mut files: Vec<Entry> = Vec::new();

    match dir.read_dir() {
        Ok(entries) => {
            for e in entries.flatten() {
                let p = e.path();
                let name = e.file_name().to_string_lossy().into_owned();
                if name.starts_with('.') {
                    continue;
                }
                match e.file_type() {
                    Ok(ft) if ft.is_dir() => dirs.push(Entry {
                        name,
                        path: p,
                        kind: EntryKind::Dir,
                    }),
                    Ok(ft) if ft.is_file() && is_rom(&p) => files.push(Entry {
                        name,
                        path: p,
                        kind: EntryKind::File,
                    }),
                    _ => {}
                }
            }
        }
        Err(e) => log::warn!("Failed to list {}: {}", dir.display(), e),
    }

    let by_name = |a: &Entry, b: &Entry| a.name.to_lowercase().cmp(&b.name.to_lowercase());
    dirs.sort_by(by_name);
    files.sort_by(by_name);

    let mut out = Vec::with_capacity(dirs.len() + files.len() + 1);
    if let Some(parent) = dir.parent() {
        out.push(Entry {
            name: "..".to_string(),
            path: parent.to_path_buf(),
            kind: EntryKind::Parent,
        });
    }
    out.extend(dirs);
    out.extend(files);
    out
}

/// What activating the entry under the cursor did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activated {
    ChangedDir,
    Game(PathBuf),
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Browser {
    pub dir: PathBuf,
    pub entries: Vec<Entry>,
    pub cursor: usize,
}

impl Browser {
    pub fn new(dir: &Path) -> Self {
        let mut b = Browser {
            dir: dir.to_path_buf(),
            entries: Vec::new(),
            cursor: 0,
        };
        b.refresh();
        b
    }

    pub fn refresh(&mut self) {
        self.entries = scan_dir(&self.dir);
        self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
    }

    /// Change to `dir` and put the cursor on `select` if it is listed there.
    pub fn open(&mut self, dir: &Path, select: Option<&Path>) {
        self.dir = dir.to_path_buf();
        self.entries = scan_dir(&self.dir);
        self.cursor = select
            .and_then(|s| self.entries.iter().position(|e| e.path == s))
            .unwrap_or(0);
    }

    pub fn selected(&self) -> Option<&Entry> {
        self.entries.get(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: i32) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() as i32 - 1;
        self.cursor = (self.cursor as i32 + delta).clamp(0, last) as usize;
    }

    pub fn activate(&mut self) -> Activated {
        let Some(entry) = self.selected().cloned() else {
            return Activated::Nothing;
        };
        match entry.kind {
            EntryKind::Parent => {
                let from = self.dir.clone();
                self.open(&entry.path, Some(&from));
                Activated::ChangedDir
            }
            EntryKind::Dir => {
                self.open(&entry.path, None);
                Activated::ChangedDir
            }
            EntryKind::File => Activated::Game(entry.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("rpg")).unwrap();
        fs::create_dir(dir.path().join("Action")).unwrap();
        fs::write(dir.path().join("zelda.SFC"), b"").unwrap();
        fs::write(dir.path().join("mario.smc"), b"").unwrap();
        fs::write(dir.path().join("readme.txt"), b"").unwrap();
        fs::write(dir.path().join("rpg").join("chrono.sfc"), b"").unwrap();
        dir
    }

    #[test]
    fn test_rom_filter_is_case_insensitive() {
        assert!(is_rom(Path::new("a.SMC")));
        assert!(is_rom(Path::new("a.Gd7")));
        assert!(!is_rom(Path::new("a.zip")));
        assert!(!is_rom(Path::new("noext")));
    }

    #[test]
    fn test_listing_order() {
        let dir = tree();
        let names: Vec<String> = scan_dir(dir.path()).into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["..", "Action", "rpg", "mario.smc", "zelda.SFC"]);
    }

    #[test]
    fn test_enter_and_leave_directory() {
        let dir = tree();
        let mut b = Browser::new(dir.path());
        b.move_cursor(2);
        assert_eq!(b.selected().unwrap().name, "rpg");
        assert_eq!(b.activate(), Activated::ChangedDir);
        assert_eq!(b.dir, dir.path().join("rpg"));

        b.move_cursor(1);
        assert_eq!(b.activate(), Activated::Game(dir.path().join("rpg").join("chrono.sfc")));

        b.cursor = 0;
        assert_eq!(b.activate(), Activated::ChangedDir);
        assert_eq!(b.dir, dir.path());
        // cursor returns to the directory we came from
        assert_eq!(b.selected().unwrap().name, "rpg");
    }

    #[test]
    fn test_open_selects_game() {
        let dir = tree();
        let mut b = Browser::new(dir.path());
        b.open(dir.path(), Some(&dir.path().join("zelda.SFC")));
        assert_eq!(b.selected().unwrap().name, "zelda.SFC");
    }

    #[test]
    fn test_cursor_is_clamped() {
        let dir = tree();
        let mut b = Browser::new(dir.path());
        b.move_cursor(-3);
        assert_eq!(b.cursor, 0);
        b.move_cursor(100);
        assert_eq!(b.cursor, 4);
    }
}
