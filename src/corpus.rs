// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Corpus loading: read `label<TAB>...<TAB>text` files into one
//! concatenated, sentinel-delimited text buffer with per-label example
//! windows — the same arena-plus-offsets shape [`crate::features::FeatureSet`]
//! uses, so the whole pipeline from raw corpus to trained model addresses
//! text exactly one way.

use std::fs;
use std::path::Path;

use crate::error::{LdigError, Result};
use crate::normalize::normalize;
use crate::types::{Text, LINE_FEED_SENTINEL};

/// A single example's window into [`Corpus::text`].
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub begin: usize,
    pub len: usize,
}

/// A loaded, labeled corpus: one text buffer, and per-label example lists
/// into it.
#[derive(Debug, Default)]
pub struct Corpus {
    text: Text,
    labels: Vec<String>,
    examples_by_label: Vec<Vec<Example>>,
}

impl Corpus {
    /// Load every file in `paths`, building the label set from the first
    /// tab-delimited field of each line. Blank lines are skipped; a line
    /// with no tab is treated as unlabeled text (useful for `--detection`
    /// input, where there may be no gold label).
    pub fn load(paths: &[impl AsRef<Path>]) -> Result<Self> {
        let mut corpus = Corpus::default();
        for path in paths {
            corpus.load_file(path.as_ref())?;
        }
        Ok(corpus)
    }

    /// Build a corpus directly from in-memory `label<TAB>...<TAB>text`
    /// lines, without touching the filesystem. Used by the cross-validation
    /// driver to build a per-trial training corpus from a held-out split of
    /// an already-loaded one.
    pub fn load_from_lines(lines: &[String]) -> Self {
        let mut corpus = Corpus::default();
        for line in lines {
            corpus.load_line(line);
        }
        corpus
    }

    fn load_file(&mut self, path: &Path) -> Result<()> {
        let contents = fs::read_to_string(path)?;
        for line in contents.lines() {
            self.load_line(line);
        }
        Ok(())
    }

    fn load_line(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        let (label, text_field) = match line.rsplit_once('\t') {
            Some((rest, text)) => {
                let label = rest.split('\t').next().unwrap_or("");
                (label, text)
            }
            None => ("", line),
        };
        self.push_example(label, text_field);
    }

    fn push_example(&mut self, label: &str, text_field: &str) {
        let label_idx = self.label_index_or_insert(label);
        let normalized = normalize(text_field);

        let begin = self.text.len();
        self.text.push(LINE_FEED_SENTINEL);
        self.text.extend(normalized.chars());
        self.text.push(LINE_FEED_SENTINEL);
        let len = self.text.len() - begin;

        self.examples_by_label[label_idx].push(Example { begin, len });
    }

    fn label_index_or_insert(&mut self, label: &str) -> usize {
        if let Some(idx) = self.labels.iter().position(|l| l == label) {
            return idx;
        }
        self.labels.push(label.to_string());
        self.examples_by_label.push(Vec::new());
        self.labels.len() - 1
    }

    pub fn text(&self) -> &[char] {
        &self.text
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn examples(&self, label: usize) -> &[Example] {
        &self.examples_by_label[label]
    }

    pub fn slice(&self, example: Example) -> &[char] {
        &self.text[example.begin..example.begin + example.len]
    }

    pub fn max_label_count(&self) -> usize {
        self.examples_by_label.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Find `label` in this corpus's label list, trying `label` first and
    /// `fallback` second — tolerates an extra leading id column in
    /// detection input, where the first field might not match a known
    /// training label.
    pub fn find_label(&self, label: &str, fallback: Option<&str>) -> Option<usize> {
        self.labels
            .iter()
            .position(|l| l == label)
            .or_else(|| fallback.and_then(|f| self.labels.iter().position(|l| l == f)))
    }
}

/// Format check used by the corpus loader's CLI caller when a path doesn't
/// exist or isn't readable.
pub fn check_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(LdigError::Usage(format!("no such file: {}", path.display())));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn loads_labeled_lines_into_shared_buffer() {
        let f = write_temp("en\thello world\nfr\tbonjour\nen\tgoodbye\n");
        let corpus = Corpus::load(&[f.path()]).unwrap();
        assert_eq!(corpus.labels(), &["en".to_string(), "fr".to_string()]);
        assert_eq!(corpus.examples(0).len(), 2);
        assert_eq!(corpus.examples(1).len(), 1);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let f = write_temp("en\thello\n\n\nfr\tbonjour\n");
        let corpus = Corpus::load(&[f.path()]).unwrap();
        assert_eq!(corpus.labels().len(), 2);
    }

    #[test]
    fn untabbed_line_becomes_unlabeled() {
        let f = write_temp("just some text with no label\n");
        let corpus = Corpus::load(&[f.path()]).unwrap();
        assert_eq!(corpus.labels(), &["".to_string()]);
    }

    #[test]
    fn examples_are_sentinel_wrapped() {
        let f = write_temp("en\thi\n");
        let corpus = Corpus::load(&[f.path()]).unwrap();
        let ex = corpus.examples(0)[0];
        let slice = corpus.slice(ex);
        assert_eq!(slice[0], LINE_FEED_SENTINEL);
        assert_eq!(*slice.last().unwrap(), LINE_FEED_SENTINEL);
    }
}
