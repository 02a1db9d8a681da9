use wisp_lang::{SharedBuffer, Wisp};

/// Runs `source` to completion and returns everything it printed.
///
/// Panics if the script fails to scan, parse, resolve or run; tests that
/// want to assert on failure should drive the `wisp` binary directly
/// through `assert_cmd` instead, since only the compiled binary reports a
/// process exit code.
pub fn run(source: &str) -> String {
    let buffer = SharedBuffer::new();
    let mut wisp = Wisp::new(Box::new(buffer.clone()));

    let path = write_script(source);
    let code = wisp.run_file(path.path().to_str().expect("temp path is valid UTF-8"));
    assert_eq!(code, 0, "expected {source:?} to run cleanly, got exit code {code}");

    buffer.contents()
}

/// Writes `source` to a temporary `.wisp` file and returns the handle,
/// keeping the file alive for as long as the caller holds it.
pub fn write_script(source: &str) -> tempfile::NamedTempFile {
    use std::io::Write;

    let mut file = tempfile::Builder::new()
        .suffix(".wisp")
        .tempfile()
        .expect("failed to create temp script");
    file.write_all(source.as_bytes()).expect("failed to write temp script");
    file
}
