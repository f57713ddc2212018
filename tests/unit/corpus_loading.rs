//! Corpus loading from the public API: files, in-memory lines, and the
//! detection-time label fallback.

use std::io::Write;

use ldig::corpus::Corpus;

#[test]
fn load_from_lines_matches_load_from_file() {
    let lines: Vec<String> = vec!["en\thello world".into(), "fr\tbonjour monde".into()];

    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in &lines {
        writeln!(file, "{line}").unwrap();
    }

    let from_file = Corpus::load(&[file.path()]).unwrap();
    let from_lines = Corpus::load_from_lines(&lines);

    assert_eq!(from_file.labels(), from_lines.labels());
    assert_eq!(from_file.text(), from_lines.text());
}

#[test]
fn multiple_files_share_one_text_buffer() {
    let mut a = tempfile::NamedTempFile::new().unwrap();
    writeln!(a, "en\tfirst file line").unwrap();
    let mut b = tempfile::NamedTempFile::new().unwrap();
    writeln!(b, "en\tsecond file line").unwrap();

    let corpus = Corpus::load(&[a.path(), b.path()]).unwrap();
    assert_eq!(corpus.labels(), &["en".to_string()]);
    assert_eq!(corpus.examples(0).len(), 2);
}

#[test]
fn find_label_falls_back_to_second_field() {
    let lines = vec!["en\thello world".to_string()];
    let corpus = Corpus::load_from_lines(&lines);

    assert_eq!(corpus.find_label("en", None), Some(0));
    assert_eq!(corpus.find_label("doc-42", Some("en")), Some(0));
    assert_eq!(corpus.find_label("doc-42", Some("unknown")), None);
}
