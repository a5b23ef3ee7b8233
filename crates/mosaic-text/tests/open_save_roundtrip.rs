use mosaic_text::File;

#[test]
fn save_then_open_round_trips_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("round.c");

    let mut file = File::create(&path, &[]);
    file.lines.get_mut(0).unwrap().chars = b"int main() {".to_vec();
    file.insert_line(1);
    file.lines.get_mut(1).unwrap().chars = b"    return 0;".to_vec();
    file.insert_line(2);
    file.lines.get_mut(2).unwrap().chars = b"}".to_vec();

    file.save().unwrap();

    let reopened = File::open(&path, &[]).unwrap();
    assert_eq!(reopened.lines.len(), 3);
    assert_eq!(reopened.lines.get(0).unwrap().chars, b"int main() {");
    assert_eq!(reopened.lines.get(1).unwrap().chars, b"    return 0;");
    assert_eq!(reopened.lines.get(2).unwrap().chars, b"}");
}

#[test]
fn open_rejects_cr_not_before_lf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.c");
    std::fs::write(&path, b"abc\rdef\n").unwrap();

    let err = mosaic_text::File::open(&path, &[]).unwrap_err();
    assert!(matches!(err, mosaic_text::OpenError::CrBeforeLf(_)));
}

#[test]
fn open_missing_file_is_not_found() {
    let err = mosaic_text::File::open("/nonexistent/path/to/file.c", &[]).unwrap_err();
    assert!(matches!(err, mosaic_text::OpenError::NotFound(_)));
}

#[test]
fn empty_file_has_one_empty_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.c");
    std::fs::write(&path, b"").unwrap();

    let file = mosaic_text::File::open(&path, &[]).unwrap();
    assert_eq!(file.lines.len(), 1);
    assert!(file.lines.get(0).unwrap().is_empty());
}
