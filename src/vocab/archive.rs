//! Vocabulary archive parsing.
//!
//! The archive is a zip whose article files live under
//! `bible/<category>/<slug>.md`, possibly below a top-level release
//! directory. Only the first line of each file matters: a comma-separated
//! headword list, optionally prefixed with `#`.

use std::io::{Cursor, Read};

use anyhow::Context;
use zip::ZipArchive;

use super::{Vocabulary, VocabEntry, normalize_headwords};
use crate::error::{ArchiveError, Result};
use crate::types::ArticleId;

/// Parse vocabulary archive bytes into a [`Vocabulary`].
///
/// Entries that are not `bible/<category>/<slug>.md` files are skipped;
/// articles with an empty headword list are retained (they participate in
/// disambiguation). Fails when the bytes are not a zip or no article file is
/// found at all.
pub fn from_archive_bytes(bytes: &[u8]) -> Result<Vocabulary> {
    let mut zip =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| ArchiveError::Unreadable {
            reason: e.to_string(),
        })?;

    let mut vocab = Vocabulary::new();
    for index in 0..zip.len() {
        let mut file = zip
            .by_index(index)
            .map_err(|e| ArchiveError::Unreadable {
                reason: e.to_string(),
            })?;
        if file.is_dir() {
            continue;
        }
        let Some(article) = article_path(file.name()) else {
            continue;
        };

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .with_context(|| format!("reading archive entry for {article}"))?;
        let first_line = contents.lines().next().unwrap_or_default();
        vocab.insert(
            article,
            VocabEntry {
                terms: normalize_headwords(first_line),
                strongs: Vec::new(),
            },
        );
    }

    if vocab.is_empty() {
        return Err(ArchiveError::Empty.into());
    }
    tracing::debug!(articles = vocab.len(), "Parsed vocabulary archive");
    Ok(vocab)
}

/// Recognize `…/bible/<category>/<slug>.md` archive paths.
fn article_path(name: &str) -> Option<ArticleId> {
    let mut segments = name.split('/');
    let _ = segments.by_ref().find(|s| *s == "bible")?;
    let category = segments.next()?;
    let file = segments.next()?;
    if segments.next().is_some() {
        return None;
    }
    let slug = file.strip_suffix(".md")?;
    ArticleId::new(format!("{category}/{slug}")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_parse_basic_archive() {
        let bytes = build_zip(&[
            ("en_tw/bible/kt/god.md", "# God\n\nDefinition here."),
            ("en_tw/bible/names/joseph.md", "# Joseph (OT), Joseph\n"),
            ("en_tw/bible/other/bread.md", "bread, loaf\n"),
            ("en_tw/README.md", "not an article"),
        ]);
        let vocab = from_archive_bytes(&bytes).unwrap();
        check!(vocab.len() == 3);

        let joseph = vocab.get(&ArticleId::new("names/joseph").unwrap()).unwrap();
        check!(joseph.terms == vec!["Joseph"]);

        let bread = vocab.get(&ArticleId::new("other/bread").unwrap()).unwrap();
        check!(bread.terms == vec!["bread", "loaf"]);
    }

    #[test]
    fn test_empty_headwords_retained() {
        let bytes = build_zip(&[
            ("bible/kt/god.md", "# God"),
            ("bible/kt/obscure.md", "\nno headwords on line one"),
        ]);
        let vocab = from_archive_bytes(&bytes).unwrap();
        let obscure = vocab.get(&ArticleId::new("kt/obscure").unwrap()).unwrap();
        check!(obscure.terms.is_empty());
    }

    #[test]
    fn test_nested_paths_skipped() {
        let bytes = build_zip(&[
            ("bible/kt/god.md", "# God"),
            ("bible/kt/deep/file.md", "# nope"),
            ("elsewhere/kt/god.md", "# nope"),
        ]);
        let vocab = from_archive_bytes(&bytes).unwrap();
        check!(vocab.len() == 1);
    }

    #[test]
    fn test_not_a_zip() {
        let err = from_archive_bytes(b"definitely not a zip").unwrap_err();
        check!(err.to_string().contains("archive"));
    }

    #[test]
    fn test_no_articles() {
        let bytes = build_zip(&[("README.md", "hello")]);
        check!(from_archive_bytes(&bytes).is_err());
    }
}
