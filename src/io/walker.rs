use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Discovers C# source files under a project root, honoring gitignore
pub struct FileWalker {
    root: PathBuf,
    ignore_patterns: Vec<String>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ignore_patterns: vec![],
        }
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        let is_csharp = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("cs"))
            .unwrap_or(false);
        if !is_csharp {
            return false;
        }

        let path_str = path.to_string_lossy();
        !self
            .ignore_patterns
            .iter()
            .any(|pattern| path_str.contains(pattern.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_walk_finds_only_csharp_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.cs"), "class A { }").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip").unwrap();
        fs::create_dir(dir.path().join("States")).unwrap();
        fs::write(dir.path().join("States/AState.cs"), "enum AState { }").unwrap();

        let files = FileWalker::new(dir.path().to_path_buf()).walk().unwrap();
        let names: Vec<String> = files
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["A.cs", "AState.cs"]);
    }

    #[test]
    fn test_ignore_patterns() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.cs"), "class A { }").unwrap();
        fs::create_dir(dir.path().join("obj")).unwrap();
        fs::write(dir.path().join("obj/Gen.cs"), "class Gen { }").unwrap();

        let files = FileWalker::new(dir.path().to_path_buf())
            .with_ignore_patterns(vec!["obj".to_string()])
            .walk()
            .unwrap();
        assert_eq!(files.len(), 1);
    }
}
