use std::path::PathBuf;

/// Expand a leading `~` in a user-supplied path.
pub fn expand_tilde(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_home() {
        let expanded = expand_tilde("~/zac/db.sqlite");
        assert!(!expanded.to_string_lossy().contains('~'));
        assert!(expanded.is_absolute());
    }

    #[test]
    fn leaves_absolute_paths_alone() {
        assert_eq!(
            expand_tilde("/var/lib/zac/db.sqlite"),
            PathBuf::from("/var/lib/zac/db.sqlite")
        );
    }
}
