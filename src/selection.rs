use crate::job::{Job, Skipped};
use crate::media::detect_input_kind;
use crate::prelude::*;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectionItem {
    pub(crate) path: Utf8PathBuf,
    pub(crate) is_dir: bool,
}

#[derive(Debug, Default)]
pub(crate) struct ExpandResult {
    pub(crate) jobs: Vec<Job>,
    pub(crate) dir_count: usize,
    pub(crate) file_count: usize,
    pub(crate) total_files: usize,
    pub(crate) output_dirs: Vec<Utf8PathBuf>,
    pub(crate) skipped: Vec<Skipped>,
}

/// Recursive, files-only directory walk, injected so tests can feed a fixed
/// file list instead of touching the real filesystem.
#[async_trait]
pub(crate) trait ListFiles: fmt::Debug + Send + Sync {
    async fn list_files(&self, root: &Utf8Path) -> Result<Vec<Utf8PathBuf>>;
}

/// `expand` is a pure function of `(selections, output_dir, list_files_output)`:
/// files are processed before directories, duplicates (by exact path string)
/// are dropped silently, and `output_dirs` comes back sorted.
pub(crate) async fn expand(
    list_files: &dyn ListFiles,
    selections: &[SelectionItem],
    output_dir: &str,
) -> Result<ExpandResult> {
    let output_dir: Utf8PathBuf = if output_dir.is_empty() { "./output".into() } else { output_dir.into() };

    let mut result = ExpandResult::default();
    let mut seen = BTreeSet::new();
    let mut output_set = BTreeSet::new();

    let (dirs, files): (Vec<_>, Vec<_>) = selections.iter().partition(|s| s.is_dir);

    for selection in &files {
        let outcome = classify_and_push(
            &selection.path,
            &output_dir,
            &mut seen,
            &mut output_set,
            &mut result.jobs,
            &mut result.skipped,
        );
        if outcome == ClassifyOutcome::Added {
            result.file_count += 1;
            result.total_files += 1;
        }
    }

    for selection in &dirs {
        let files_in_dir = list_files.list_files(&selection.path).await?;
        result.dir_count += 1;
        for path in files_in_dir {
            let outcome = classify_and_push(&path, &output_dir, &mut seen, &mut output_set, &mut result.jobs, &mut result.skipped);
            if outcome == ClassifyOutcome::Added {
                result.total_files += 1;
            }
        }
    }

    result.output_dirs = output_set.into_iter().collect();
    Ok(result)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassifyOutcome {
    Added,
    Skipped,
    Duplicate,
}

#[allow(clippy::too_many_arguments)]
fn classify_and_push(
    path: &Utf8Path,
    output_dir: &Utf8Path,
    seen: &mut BTreeSet<Utf8PathBuf>,
    output_set: &mut BTreeSet<Utf8PathBuf>,
    jobs: &mut Vec<Job>,
    skipped: &mut Vec<Skipped>,
) -> ClassifyOutcome {
    let kind = match detect_input_kind(path) {
        Ok(kind) => kind,
        Err(err) => {
            skipped.push(Skipped { path: path.to_owned(), reason: err.to_string() });
            return ClassifyOutcome::Skipped;
        }
    };

    if !seen.insert(path.to_owned()) {
        return ClassifyOutcome::Duplicate;
    }

    jobs.push(Job { input_path: path.to_owned(), kind, output_dir: Some(output_dir.to_owned()) });
    output_set.insert(output_dir.to_owned());
    ClassifyOutcome::Added
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FixedListFiles(Vec<Utf8PathBuf>);

    #[async_trait]
    impl ListFiles for FixedListFiles {
        async fn list_files(&self, _root: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn unsupported_file_is_skipped_with_empty_output_dirs() {
        let list_files = FixedListFiles(Vec::new());
        let selections = vec![SelectionItem { path: "/a/b.txt".into(), is_dir: false }];
        let result = expand(&list_files, &selections, "").await.unwrap();
        assert!(result.jobs.is_empty());
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].path, Utf8PathBuf::from("/a/b.txt"));
        assert!(result.output_dirs.is_empty());
    }

    #[tokio::test]
    async fn duplicate_paths_are_deduped() {
        let list_files = FixedListFiles(vec!["/dir/a.png".into(), "/dir/a.png".into()]);
        let selections = vec![
            SelectionItem { path: "/dir/a.png".into(), is_dir: false },
            SelectionItem { path: "/dir".into(), is_dir: true },
        ];
        let result = expand(&list_files, &selections, "/out").await.unwrap();
        assert_eq!(result.jobs.len(), 1);
        assert_eq!(result.output_dirs, vec![Utf8PathBuf::from("/out")]);
    }

    #[tokio::test]
    async fn empty_output_dir_defaults_to_dot_slash_output() {
        let list_files = FixedListFiles(Vec::new());
        let selections = vec![SelectionItem { path: "/a.png".into(), is_dir: false }];
        let result = expand(&list_files, &selections, "").await.unwrap();
        assert_eq!(result.jobs[0].output_dir.as_deref(), Some(Utf8Path::new("./output")));
    }
}
