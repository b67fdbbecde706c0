//! The manifest listing image paths and their labels.
//!
//! Each non-empty line has the form `<image-path> <label>[,<label>...]`, where
//! the image path is relative to the image directory. A single trailing space
//! or comma is tolerated.

use crate::common::*;

/// An image path with its labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManifestEntry {
    pub image_path: PathBuf,
    pub labels: Vec<i32>,
}

/// Load the manifest file. Image paths are prefixed with `image_dir` but not
/// checked for existence.
pub fn load_manifest(
    image_dir: impl AsRef<Path>,
    manifest_file: impl AsRef<Path>,
) -> Result<Vec<ManifestEntry>> {
    let manifest_file = manifest_file.as_ref();
    let file = File::open(manifest_file).map_err(|source| Error::ManifestIo {
        path: manifest_file.to_owned(),
        source,
    })?;
    parse_manifest(image_dir, manifest_file, BufReader::new(file))
}

/// Parse manifest lines from `reader`. `manifest_file` is only used in error reports.
pub fn parse_manifest<R>(
    image_dir: impl AsRef<Path>,
    manifest_file: impl AsRef<Path>,
    reader: R,
) -> Result<Vec<ManifestEntry>>
where
    R: BufRead,
{
    let image_dir = image_dir.as_ref();
    let manifest_file = manifest_file.as_ref();
    let mut entries = vec![];

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| Error::ManifestIo {
            path: manifest_file.to_owned(),
            source,
        })?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if line.is_empty() {
            continue;
        }

        let entry = parse_line(image_dir, line).map_err(|err| match err {
            LineError::Format => Error::ManifestFormat {
                path: manifest_file.to_owned(),
                line: index + 1,
            },
            LineError::Label { token, source } => Error::InvalidLabel {
                path: manifest_file.to_owned(),
                line: index + 1,
                token,
                source,
            },
        })?;
        entries.push(entry);
    }

    Ok(entries)
}

enum LineError {
    Format,
    Label {
        token: String,
        source: std::num::ParseIntError,
    },
}

fn parse_line(image_dir: &Path, line: &str) -> Result<ManifestEntry, LineError> {
    let tokens: Vec<_> = split_fields(line, ' ').collect();
    let (image_file, labels) = match *tokens.as_slice() {
        [image_file, labels] => (image_file, labels),
        _ => return Err(LineError::Format),
    };

    // keep the path under image_dir even if the token is absolute
    let image_file = image_file.trim_start_matches(std::path::is_separator);
    if image_file.is_empty() || labels.is_empty() {
        return Err(LineError::Format);
    }

    let labels: Vec<i32> = split_fields(labels, ',')
        .map(|token| {
            token.parse().map_err(|source| LineError::Label {
                token: token.to_owned(),
                source,
            })
        })
        .try_collect()?;

    Ok(ManifestEntry {
        image_path: image_dir.join(image_file),
        labels,
    })
}

/// Split on `sep`, dropping the empty field after a trailing separator.
fn split_fields(text: &str, sep: char) -> impl Iterator<Item = &str> {
    text.strip_suffix(sep).unwrap_or(text).split(sep)
}
