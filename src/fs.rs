use crate::prelude::*;
use crate::selection::ListFiles;
use crate::util::input;
use async_trait::async_trait;

/// Recursive, files-only directory walk, arbitrary order — the production
/// collaborator behind [`crate::selection::expand`].
#[derive(Debug)]
pub(crate) struct RealListFiles;

#[async_trait]
impl ListFiles for RealListFiles {
    async fn list_files(&self, root: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
        let mut out = Vec::new();
        let mut pending = vec![root.to_owned()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await.with_context(|| format!("failed to read directory: {dir}"))?;

            while let Some(entry) = entries.next_entry().await.err_into()? {
                let path: Utf8PathBuf = entry.path().try_into().context("encountered a non-UTF8 path")?;

                if entry.file_type().await.err_into()?.is_dir() {
                    pending.push(path);
                } else {
                    out.push(path);
                }
            }
        }

        Ok(out)
    }
}

pub(crate) async fn validate_output_files_overwriting(
    overwrite: bool,
    paths: impl IntoIterator<Item = Utf8PathBuf>,
) -> Result {
    let existing_files: Vec<_> = paths
        .into_iter()
        .filter_map(|path| {
            path.try_exists()
                .with_context(|| format!("failed to check if the output file exists: `{path}`"))
                .map(|exists| exists.then_some(path))
                .transpose()
        })
        .try_collect()?;

    if existing_files.is_empty() {
        return Ok(());
    }

    let files = existing_files.iter().format_with("\n", |path, f| f(&format_args!("- {path}")));
    let message = format!("The following output files already exist.\n{files}\nOverwrite them?");

    input::read_confirmation(&message, overwrite).await
}
