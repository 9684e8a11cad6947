//! In-memory indices over a workspace directory.
//!
//! Classes and symbols are found with per-language declaration patterns,
//! one line at a time. Scopes and nesting are not tracked, only where a name
//! is declared.

use super::{FileRef, Position};
use crate::io::{self, IoError};
use regex::Regex;
use relative_path::RelativePathBuf;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Top-level directories whose contents count as library code
pub const LIBRARY_DIRS: &[&str] = &["vendor", "node_modules", "third_party"];

/// A declared class or symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    /// Name prefixed by its module or package, e.g. `router::LinkRouter`
    pub qualified_name: String,
    pub file: PathBuf,
    pub relative_path: RelativePathBuf,
    pub position: Position,
    pub library: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFile {
    pub file: FileRef,
    pub library: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Language {
    Rust,
    Jvm,
    Python,
    Go,
    Script,
}

impl Language {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "rs" => Some(Self::Rust),
            "java" | "kt" | "kts" | "scala" => Some(Self::Jvm),
            "py" => Some(Self::Python),
            "go" => Some(Self::Go),
            "js" | "jsx" | "ts" | "tsx" | "mjs" => Some(Self::Script),
            _ => None,
        }
    }

    fn separator(self) -> &'static str {
        match self {
            Self::Rust => "::",
            _ => ".",
        }
    }
}

struct Patterns {
    class: Regex,
    symbol: Regex,
    package: Option<Regex>,
}

fn patterns(language: Language) -> &'static Patterns {
    static PATTERNS: OnceLock<HashMap<Language, Patterns>> = OnceLock::new();
    let table = PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("declaration pattern is valid");
        HashMap::from([
            (
                Language::Rust,
                Patterns {
                    class: compile(
                        r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:struct|enum|trait|union)\s+([A-Za-z_]\w*)",
                    ),
                    symbol: compile(
                        r#"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:(?:const|async|unsafe)\s+)*(?:extern\s+"[^"]*"\s+)?fn\s+([A-Za-z_]\w*)"#,
                    ),
                    package: None,
                },
            ),
            (
                Language::Jvm,
                Patterns {
                    class: compile(
                        r"^\s*(?:(?:public|private|protected|internal|abstract|final|sealed|open|data|static|inner|enum|annotation)\s+)*(?:class|interface|object|enum)\s+([A-Za-z_]\w*)",
                    ),
                    symbol: compile(
                        r"^\s*(?:(?:public|private|protected|internal|static|final|abstract|synchronized|override|open|suspend)\s+)*(?:fun\s+(?:<[^>]*>\s*)?([A-Za-z_]\w*)|(?:public|private|protected|static)\s+[\w<>\[\],\s]*?\s+([a-z_]\w*)\s*\()",
                    ),
                    package: Some(compile(r"^\s*package\s+([\w.]+)")),
                },
            ),
            (
                Language::Python,
                Patterns {
                    class: compile(r"^\s*class\s+([A-Za-z_]\w*)"),
                    symbol: compile(r"^\s*(?:async\s+)?def\s+([A-Za-z_]\w*)"),
                    package: None,
                },
            ),
            (
                Language::Go,
                Patterns {
                    class: compile(r"^\s*type\s+([A-Za-z_]\w*)\s+(?:struct|interface)\b"),
                    symbol: compile(r"^\s*func\s+(?:\([^)]*\)\s*)?([A-Za-z_]\w*)"),
                    package: Some(compile(r"^\s*package\s+(\w+)")),
                },
            ),
            (
                Language::Script,
                Patterns {
                    class: compile(
                        r"^\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?(?:class|interface)\s+([A-Za-z_$][\w$]*)",
                    ),
                    symbol: compile(
                        r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)",
                    ),
                    package: None,
                },
            ),
        ])
    });
    &table[&language]
}

/// Filename, class and symbol indices for one workspace root
#[derive(Debug, Default)]
pub struct WorkspaceIndex {
    files: Vec<IndexedFile>,
    by_file_name: BTreeMap<String, Vec<usize>>,
    classes: Vec<IndexEntry>,
    symbols: Vec<IndexEntry>,
}

impl WorkspaceIndex {
    /// Scan `root` and index every file beneath it
    pub fn build(root: &Path) -> Result<Self, IoError> {
        let mut index = Self::default();
        for path in io::scan_workspace_files(root)? {
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let Ok(relative_path) = RelativePathBuf::from_path(relative) else {
                continue;
            };
            let library = is_library(&relative_path);

            if let Some(language) = Language::from_path(&path) {
                match std::fs::read_to_string(&path) {
                    Ok(source) => {
                        index.index_source(language, &path, &relative_path, library, &source)
                    }
                    Err(e) => log::debug!("Skipping unreadable source {}: {e}", path.display()),
                }
            }

            index.add_file(path, relative_path, library);
        }
        log::info!(
            "Indexed {} files, {} classes, {} symbols under {}",
            index.files.len(),
            index.classes.len(),
            index.symbols.len(),
            root.display()
        );
        Ok(index)
    }

    fn add_file(&mut self, path: PathBuf, relative_path: RelativePathBuf, library: bool) {
        let position = self.files.len();
        if let Some(name) = relative_path.file_name() {
            self.by_file_name
                .entry(name.to_string())
                .or_default()
                .push(position);
        }
        self.files.push(IndexedFile {
            file: FileRef {
                path,
                relative_path: Some(relative_path),
            },
            library,
        });
    }

    fn index_source(
        &mut self,
        language: Language,
        path: &Path,
        relative_path: &RelativePathBuf,
        library: bool,
        source: &str,
    ) {
        let patterns = patterns(language);
        let module = match &patterns.package {
            Some(package) => source
                .lines()
                .find_map(|line| package.captures(line))
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            None => module_path(relative_path, language),
        };

        for (line_index, line) in source.lines().enumerate() {
            for (regex, target) in [
                (&patterns.class, &mut self.classes),
                (&patterns.symbol, &mut self.symbols),
            ] {
                let Some(name) = regex
                    .captures(line)
                    .and_then(|caps| caps.iter().skip(1).flatten().next())
                else {
                    continue;
                };
                let qualified_name = if module.is_empty() {
                    name.as_str().to_string()
                } else {
                    format!("{module}{}{}", language.separator(), name.as_str())
                };
                let column = line[..name.start()].chars().count() as u32;
                target.push(IndexEntry {
                    name: name.as_str().to_string(),
                    qualified_name,
                    file: path.to_path_buf(),
                    relative_path: relative_path.clone(),
                    position: Position::new(line_index as u32, column),
                    library,
                });
            }
        }
    }

    pub fn files(&self) -> impl Iterator<Item = &IndexedFile> {
        self.files.iter()
    }

    pub fn classes(&self) -> impl Iterator<Item = &IndexEntry> {
        self.classes.iter()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &IndexEntry> {
        self.symbols.iter()
    }

    /// Project-scope files whose name is exactly `file_name`
    pub fn files_named(&self, file_name: &str) -> Vec<FileRef> {
        self.by_file_name
            .get(file_name)
            .into_iter()
            .flatten()
            .map(|&i| &self.files[i])
            .filter(|indexed| !indexed.library)
            .map(|indexed| indexed.file.clone())
            .collect()
    }

    pub fn classes_named(&self, name: &str, include_libraries: bool) -> Vec<IndexEntry> {
        lookup(&self.classes, name, include_libraries)
    }

    pub fn symbols_named(&self, name: &str, include_libraries: bool) -> Vec<IndexEntry> {
        lookup(&self.symbols, name, include_libraries)
    }
}

/// Entries matching `name`, exact qualified matches first
fn lookup(entries: &[IndexEntry], name: &str, include_libraries: bool) -> Vec<IndexEntry> {
    let query = normalize(name);
    let mut found: Vec<_> = entries
        .iter()
        .filter(|entry| include_libraries || !entry.library)
        .filter(|entry| matches_name(entry, &query))
        .cloned()
        .collect();
    found.sort_by_key(|entry| normalize(&entry.qualified_name) != query);
    found
}

fn matches_name(entry: &IndexEntry, query: &str) -> bool {
    let qualified = normalize(&entry.qualified_name);
    entry.name == query || qualified == query || qualified.ends_with(&format!(".{query}"))
}

fn normalize(name: &str) -> String {
    name.replace("::", ".")
}

fn is_library(relative_path: &RelativePathBuf) -> bool {
    relative_path
        .components()
        .next()
        .is_some_and(|first| LIBRARY_DIRS.contains(&first.as_str()))
}

/// Module path derived from the file location, e.g. `src/link/mod.rs` -> `link`
fn module_path(relative_path: &RelativePathBuf, language: Language) -> String {
    let mut components: Vec<&str> = relative_path
        .components()
        .map(|component| component.as_str())
        .collect();
    if let Some(src) = components.iter().rposition(|c| *c == "src") {
        components.drain(..=src);
    }
    if let Some(last) = components.last_mut() {
        let file_name: &str = *last;
        *last = file_name.split('.').next().unwrap_or(file_name);
    }
    components.retain(|c| !matches!(*c, "mod" | "lib" | "main" | "__init__" | "index"));
    components.join(language.separator())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_file, create_test_workspace};

    #[test]
    fn test_indexes_rust_declarations() {
        let workspace = create_test_workspace();
        create_test_file(
            &workspace,
            "src/router.rs",
            "use std::sync::Arc;\n\npub struct LinkRouter {\n}\n\nimpl LinkRouter {\n    pub fn route(&self) {}\n}\n",
        );

        let index = WorkspaceIndex::build(workspace.path()).unwrap();

        let classes = index.classes_named("LinkRouter", false);
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].qualified_name, "router::LinkRouter");
        assert_eq!(classes[0].position, Position::new(2, 11));

        let symbols = index.symbols_named("route", false);
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].position, Position::new(6, 11));
    }

    #[test]
    fn test_qualified_lookup_uses_java_package() {
        let workspace = create_test_workspace();
        create_test_file(
            &workspace,
            "src/main/java/com/example/Foo.java",
            "package com.example;\n\npublic class Foo {\n    public void bar() {}\n}\n",
        );

        let index = WorkspaceIndex::build(workspace.path()).unwrap();

        for query in ["Foo", "example.Foo", "com.example.Foo"] {
            let found = index.classes_named(query, false);
            assert_eq!(found.len(), 1, "query {query}");
            assert_eq!(found[0].qualified_name, "com.example.Foo");
        }
        assert!(index.classes_named("other.Foo", false).is_empty());
        assert_eq!(index.symbols_named("bar", false).len(), 1);
    }

    #[test]
    fn test_rust_path_separator_accepted_either_way() {
        let workspace = create_test_workspace();
        create_test_file(&workspace, "src/link/mod.rs", "pub enum LinkError {}\n");

        let index = WorkspaceIndex::build(workspace.path()).unwrap();

        assert_eq!(index.classes_named("link::LinkError", false).len(), 1);
        assert_eq!(index.classes_named("link.LinkError", false).len(), 1);
    }

    #[test]
    fn test_library_scope_excluded_by_default() {
        let workspace = create_test_workspace();
        create_test_file(&workspace, "vendor/dep/src/lib.rs", "pub struct Widget;\n");
        create_test_file(&workspace, "vendor/dep/README.md", "");

        let index = WorkspaceIndex::build(workspace.path()).unwrap();

        assert!(index.classes_named("Widget", false).is_empty());
        assert_eq!(index.classes_named("Widget", true).len(), 1);
        assert!(index.files_named("README.md").is_empty());
    }

    #[test]
    fn test_exact_qualified_match_sorted_first() {
        let workspace = create_test_workspace();
        create_test_file(&workspace, "src/a.rs", "pub struct Config;\n");
        create_test_file(&workspace, "src/b.rs", "pub struct Config;\n");

        let index = WorkspaceIndex::build(workspace.path()).unwrap();

        let found = index.classes_named("b::Config", false);
        assert_eq!(found.len(), 1);
        let found = index.classes_named("Config", false);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].qualified_name, "a::Config");
    }

    #[test]
    fn test_files_named_matches_file_name_only() {
        let workspace = create_test_workspace();
        create_test_file(&workspace, "docs/guide/readme.md", "");
        create_test_file(&workspace, "readme.md.bak", "");

        let index = WorkspaceIndex::build(workspace.path()).unwrap();

        let found = index.files_named("readme.md");
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].relative_path.as_deref(),
            Some(relative_path::RelativePath::new("docs/guide/readme.md"))
        );
    }

    #[test]
    fn test_python_and_script_declarations() {
        let workspace = create_test_workspace();
        create_test_file(
            &workspace,
            "tools/sync.py",
            "class Syncer:\n    async def run(self):\n        pass\n",
        );
        create_test_file(
            &workspace,
            "web/src/index.ts",
            "export default class App {}\nexport async function boot() {}\n",
        );

        let index = WorkspaceIndex::build(workspace.path()).unwrap();

        assert_eq!(
            index.classes_named("Syncer", false)[0].qualified_name,
            "tools.sync.Syncer"
        );
        assert_eq!(index.symbols_named("run", false).len(), 1);
        assert_eq!(index.classes_named("App", false)[0].qualified_name, "App");
        assert_eq!(index.symbols_named("boot", false).len(), 1);
    }

    #[test]
    fn test_column_counts_characters_not_bytes() {
        let workspace = create_test_workspace();
        create_test_file(
            &workspace,
            "resume/resume.go",
            "package resume\n\nfunc (r *Résumé) run() {}\n",
        );

        let index = WorkspaceIndex::build(workspace.path()).unwrap();

        let symbols = index.symbols_named("run", false);
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].position, Position::new(2, 17));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_indexes_each_file_once() {
        let workspace = create_test_workspace();
        create_test_file(&workspace, "src/lib.rs", "pub fn run() {}\n");
        std::os::unix::fs::symlink(workspace.path(), workspace.path().join("src/loop")).unwrap();

        let index = WorkspaceIndex::build(workspace.path()).unwrap();

        assert_eq!(index.symbols_named("run", false).len(), 1);
        assert_eq!(index.files().count(), 1);
    }
}
