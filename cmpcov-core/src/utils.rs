use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> io::Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("Failed to open file {}: {}", path.display(), err),
        )
    })?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Read a list file: one path per line, blank lines and `#` comments skipped.
/// Relative paths are kept as written.
///
pub fn read_path_list<P: AsRef<Path>>(file_path: P) -> io::Result<Vec<PathBuf>> {
    let reader = get_dynamic_reader(file_path.as_ref())?;

    let mut paths = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        paths.push(PathBuf::from(line));
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_read_path_list() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("bams.list");
        let mut file = File::create(&list).unwrap();
        writeln!(file, "# samples").unwrap();
        writeln!(file, "a.bam").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  /data/b.bam  ").unwrap();

        let paths = read_path_list(&list).unwrap();
        assert_eq!(
            paths,
            vec![PathBuf::from("a.bam"), PathBuf::from("/data/b.bam")]
        );
    }

    #[rstest]
    fn test_missing_file_mentions_path() {
        let err = get_dynamic_reader(Path::new("/no/such/file.txt")).err().unwrap();
        assert!(err.to_string().contains("/no/such/file.txt"));
    }
}
