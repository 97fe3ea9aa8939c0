use std::fs::File;
use std::io::{self, BufRead, Seek, SeekFrom};

/// True when the first non-blank line starts with `>`. The stream position is restored.
pub fn looks_like_fasta<R: BufRead + Seek>(mut r: R) -> io::Result<bool> {
    let pos = r.stream_position()?;
    let mut line = String::new();
    let found = loop {
        line.clear();
        if r.read_line(&mut line)? == 0 {
            break false;
        }
        let text = line.trim();
        if !text.is_empty() {
            break text.starts_with('>');
        }
    };
    r.seek(SeekFrom::Start(pos))?;
    Ok(found)
}

pub fn open_file(path: &std::path::Path) -> io::Result<File> {
    std::fs::File::open(path)
}
