use aggregate_txt::{sha256_hex, Aggregator, Config, Locale};
use base64::Engine;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn build_tree(root: &Path) {
    fs::create_dir_all(root.join("src/nested")).unwrap();
    fs::create_dir_all(root.join("empty")).unwrap();
    fs::write(root.join("Makefile"), "all:\n\tcc main.c\n").unwrap();
    fs::write(root.join("src/main.c"), "int main(void) {\n    return 0;\n}\n").unwrap();
    fs::write(root.join("src/nested/run"), "#!/bin/sh\necho done").unwrap();
    fs::write(root.join("src/nested/logo.ico"), (0u8..=255).collect::<Vec<_>>()).unwrap();
    fs::write(root.join("notes.txt"), "").unwrap();
    fs::write(root.join("unicode.rst"), "Привет, мир\n").unwrap();
    fs::write(root.join("win.bat"), "a\r\nb\r\n").unwrap();
}

fn aggregate(config: Config) -> String {
    let mut out = Vec::new();
    Aggregator::new(config).run(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

/// Rebuilds file contents from an English base64 stream, keyed by path
fn restore(stream: &str) -> HashMap<String, Vec<u8>> {
    let mut files = HashMap::new();
    // Only `\n` ends a line; a `\r` before it belongs to the content
    let stream = stream.strip_suffix('\n').unwrap_or(stream);
    let mut lines = stream.split('\n').filter(|_| !stream.is_empty());

    while let Some(line) = lines.next() {
        let (binary, path) = if let Some(path) = line.strip_prefix("--- Text file: ") {
            (false, path.to_string())
        } else if let Some(path) = line.strip_prefix("--- Binary file: ") {
            (true, path.to_string())
        } else {
            panic!("unexpected line outside block: {:?}", line);
        };

        let mut sha = None;
        let count = loop {
            let line = lines.next().unwrap();
            if let Some(hex) = line.strip_prefix("--- SHA256: ") {
                sha = Some(hex.to_string());
            } else if line.starts_with("--- Last modified: ") {
                continue;
            } else {
                let count = line.trim_end_matches(" ---").rsplit(' ').next().unwrap();
                break count.parse::<usize>().unwrap();
            }
        };

        let body: Vec<&str> = (0..count).map(|_| lines.next().unwrap()).collect();
        assert_eq!(lines.next(), Some("--- end of file ---"));
        let sha = sha.unwrap();

        let data = if binary {
            base64::engine::general_purpose::STANDARD
                .decode(body.concat())
                .unwrap()
        } else {
            // A trailing newline is not visible in the body; the digest decides
            let joined = body.join("\n");
            let with_newline = format!("{}\n", joined);
            if !body.is_empty() && sha256_hex(with_newline.as_bytes()) == sha {
                with_newline.into_bytes()
            } else {
                joined.into_bytes()
            }
        };
        assert_eq!(sha256_hex(&data), sha, "digest mismatch for {}", path);
        files.insert(path, data);
    }

    files
}

#[test]
fn test_stream_restores_every_file() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path());

    let stream = aggregate(Config {
        use_base64: true,
        ..Config::new(dir.path())
    });
    let restored = restore(&stream);

    let expected = [
        "Makefile",
        "src/main.c",
        "src/nested/run",
        "src/nested/logo.ico",
        "notes.txt",
        "unicode.rst",
        "win.bat",
    ];
    assert_eq!(restored.len(), expected.len());
    for rel in expected {
        let path = dir.path().join(rel);
        let key = path.display().to_string();
        assert_eq!(restored[&key], fs::read(&path).unwrap(), "content mismatch for {}", rel);
    }
}

#[test]
fn test_crlf_text_keeps_carriage_returns() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("win.bat"), "a\r\nb\r\n").unwrap();

    let stream = aggregate(Config::new(dir.path()));
    assert!(stream.contains("--- file contents, total lines: 2 ---\na\r\nb\r\n--- end of file ---\n"));

    let restored = restore(&stream);
    let key = dir.path().join("win.bat").display().to_string();
    assert_eq!(restored[&key], b"a\r\nb\r\n");
}

#[test]
fn test_stream_is_stable_apart_from_timestamps() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path());

    let strip = |s: String| -> Vec<String> {
        let mut blocks: Vec<String> = s
            .split("--- end of file ---\n")
            .map(|block| {
                block
                    .lines()
                    .filter(|l| !l.starts_with("--- Last modified: "))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect();
        blocks.sort();
        blocks
    };

    let first = strip(aggregate(Config::new(dir.path())));
    let second = strip(aggregate(Config::new(dir.path())));
    assert_eq!(first, second);
}

#[test]
fn test_hex_dump_block_layout() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("blob.dat"), [0x00, 0x01, 0x02]).unwrap();

    let stream = aggregate(Config::new(dir.path()));
    let lines: Vec<&str> = stream.lines().collect();

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], format!("--- Binary file: {}", dir.path().join("blob.dat").display()));
    assert!(lines[1].starts_with("--- Last modified: "));
    assert_eq!(
        lines[2],
        format!("--- SHA256: {}", sha256_hex(&[0x00, 0x01, 0x02]))
    );
    assert_eq!(lines[3], "--- binary file dump, total lines: 1 ---");
    assert_eq!(lines[4], format!("0000  {:<47}  ...", "00 01 02"));
    assert_eq!(lines[5], "--- end of file ---");
}

#[test]
fn test_dry_run_report() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path());

    let report = aggregate(Config {
        dry_run: true,
        locale: Locale::Russian,
        ..Config::new(dir.path())
    });

    let file_lines: Vec<&str> = report.lines().filter(|l| l.starts_with("File ")).collect();
    let dir_lines: Vec<&str> = report.lines().filter(|l| l.starts_with("Dir ")).collect();
    assert_eq!(file_lines.len(), 7);
    assert_eq!(dir_lines.len(), 3);

    let tag = |rel: &str| format!("{}", dir.path().join(rel).display());
    assert!(file_lines.contains(&format!("File T {}", tag("Makefile")).as_str()));
    assert!(file_lines.contains(&format!("File T {}", tag("src/nested/run")).as_str()));
    assert!(file_lines.contains(&format!("File T {}", tag("unicode.rst")).as_str()));
    assert!(file_lines.contains(&format!("File B {}", tag("src/nested/logo.ico")).as_str()));
    assert!(file_lines.contains(&format!("File T {}", tag("win.bat")).as_str()));
    assert!(report.ends_with("Following unknown extensions are treated as binary:\n.ico\n"));
}
