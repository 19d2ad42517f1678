//! Keeps `tests/unit` in lockstep with the `src` module tree
//!
//! Every module file under `src` has a unit test file at the same relative
//! path, that file names the module it exercises, and every file on both
//! sides is reachable from its parent module so none of them silently drops
//! out of the build.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::{Path, PathBuf};

    const SRC: &str = "src";
    const UNIT: &str = "tests/unit";

    // Files that only declare modules or start a binary
    fn is_module_root(path: &Path) -> bool {
        matches!(
            path.file_name().and_then(|name| name.to_str()),
            Some("lib.rs" | "main.rs" | "mod.rs")
        )
    }

    // Every `.rs` file below `root`, relative to it
    fn rust_files(root: &Path) -> BTreeSet<PathBuf> {
        let mut found = BTreeSet::new();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir).into_iter().flatten().flatten() {
                let path = entry.path();
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == "rs") {
                    if let Ok(relative) = path.strip_prefix(root) {
                        found.insert(relative.to_path_buf());
                    }
                }
            }
        }
        found
    }

    fn module_files(root: &str) -> BTreeSet<PathBuf> {
        rust_files(Path::new(root))
            .into_iter()
            .filter(|path| !is_module_root(path))
            .collect()
    }

    fn listing(paths: &BTreeSet<&PathBuf>, prefix: &str) -> String {
        paths
            .iter()
            .map(|path| format!("  - {prefix}/{}", path.display()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // Tests both directions of the src <-> tests/unit mirror
    #[test]
    fn test_unit_tree_mirrors_src() {
        let sources = module_files(SRC);
        let units = module_files(UNIT);

        let untested: BTreeSet<_> = sources.difference(&units).collect();
        assert!(untested.is_empty(), "no unit test file for:\n{}", listing(&untested, SRC));

        let orphaned: BTreeSet<_> = units.difference(&sources).collect();
        assert!(orphaned.is_empty(), "unit tests without a module:\n{}", listing(&orphaned, UNIT));
    }

    // Tests that each unit file holds tests for the module at its own path
    #[test]
    fn test_unit_files_exercise_their_module() {
        for relative in module_files(UNIT) {
            let path = Path::new(UNIT).join(&relative);
            let content = fs::read_to_string(&path).unwrap_or_default();
            let module = relative
                .with_extension("")
                .components()
                .map(|part| part.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("::");

            assert!(content.contains("#[test]"), "{} has no #[test]", path.display());
            assert!(
                content.contains(&format!("patchwork::{module}")),
                "{} never uses patchwork::{module}",
                path.display()
            );
        }
    }

    // Tests that every file and directory is declared by its parent module
    #[test]
    fn test_every_file_is_declared() {
        for root in [SRC, UNIT] {
            let crate_root = if root == SRC { "lib.rs" } else { "main.rs" };
            for relative in rust_files(Path::new(root)) {
                // A directory is declared through its mod.rs, one level up
                let declared = if relative.file_name().is_some_and(|name| name == "mod.rs") {
                    relative.parent().map(Path::to_path_buf).unwrap_or_default()
                } else {
                    relative.with_extension("")
                };
                let Some(name) = declared.file_name().and_then(|name| name.to_str()) else {
                    continue;
                };
                if declared.parent().is_none() || declared == Path::new("lib") || declared == Path::new("main") {
                    continue;
                }

                let parent = declared.parent().unwrap_or_else(|| Path::new(""));
                let declaring = if parent.as_os_str().is_empty() {
                    Path::new(root).join(crate_root)
                } else {
                    Path::new(root).join(parent).join("mod.rs")
                };

                let content = fs::read_to_string(&declaring).unwrap_or_default();
                assert!(
                    content.contains(&format!("mod {name};")),
                    "{} does not declare `mod {name};`",
                    declaring.display()
                );
            }
        }
    }
}
