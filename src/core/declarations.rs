//! Flat, newline-delimited declaration files.
//!
//! Projects declare their needs in three optional files, one item per line.
//! A missing file means "no declarations"; blank lines are ignored.

use std::fs;
use std::path::Path;

/// Library names resolvable under the shared libraries root.
pub const LIBRARIES_LIST: &str = "libraries_list.txt";

/// Tool project names resolvable under a `tools` subfolder.
pub const TOOLS_LIST: &str = "tools_list.txt";

/// vcpkg package identifiers; the triplet is applied at install time, never
/// stored in the file.
pub const VCPKG_LIST: &str = "vcpkg_list.txt";

/// Read one declaration kind from an ordered list of candidate folders.
///
/// Folders are consulted in the order supplied; each file's internal line
/// order is preserved. A folder without the file contributes nothing.
pub fn read_list<'a>(
    folders: impl IntoIterator<Item = &'a Path>,
    file_name: &str,
) -> Vec<String> {
    let mut items = Vec::new();
    for folder in folders {
        let path = folder.join(file_name);
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        items.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from),
        );
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_blank_lines_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(VCPKG_LIST),
            "\nzlib\n\n   \nlibpng\ncurl\n\n",
        )
        .unwrap();

        let items = read_list([tmp.path()], VCPKG_LIST);
        assert_eq!(items, vec!["zlib", "libpng", "curl"]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_list([tmp.path()], LIBRARIES_LIST).is_empty());
    }

    #[test]
    fn test_folder_order_is_preserved() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        fs::write(first.join(TOOLS_LIST), "alpha\nbeta\n").unwrap();
        fs::write(second.join(TOOLS_LIST), "gamma\n").unwrap();

        let items = read_list([first.as_path(), second.as_path()], TOOLS_LIST);
        assert_eq!(items, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(VCPKG_LIST), "  zlib  \n\tcurl\n").unwrap();

        let items = read_list([tmp.path()], VCPKG_LIST);
        assert_eq!(items, vec!["zlib", "curl"]);
    }
}
