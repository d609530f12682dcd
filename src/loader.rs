use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

/// File formats supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Gzip,
    Zstd,
}

impl TextFormat {
    /// Guesses the format from the file extension, defaulting to plain text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("gz") => Self::Gzip,
            Some("zst") => Self::Zstd,
            _ => Self::Plain,
        }
    }
}

impl FromStr for TextFormat {
    type Err = &'static str;

    fn from_str(fmt: &str) -> Result<Self, Self::Err> {
        match fmt {
            "plain" => Ok(Self::Plain),
            "gzip" => Ok(Self::Gzip),
            "zstd" => Ok(Self::Zstd),
            _ => Err("Invalid format"),
        }
    }
}

/// Reads the whole text at `path`, decompressing it if needed. When `limit`
/// is given, at most that many bytes of decompressed text are kept.
pub fn read_text<P>(path: P, format: TextFormat, limit: Option<usize>) -> Result<Vec<u8>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader: Box<dyn Read> = match format {
        TextFormat::Plain => Box::new(BufReader::new(file)),
        TextFormat::Gzip => Box::new(MultiGzDecoder::new(BufReader::new(file))),
        TextFormat::Zstd => Box::new(zstd::stream::read::Decoder::new(file)?),
    };
    if let Some(max_bytes) = limit {
        reader = Box::new(reader.take(max_bytes as u64));
    }

    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sais-table-{}-{}", std::process::id(), name))
    }

    #[test]
    fn format_from_str_and_path() {
        assert_eq!("gzip".parse::<TextFormat>(), Ok(TextFormat::Gzip));
        assert!("bzip2".parse::<TextFormat>().is_err());
        assert_eq!(TextFormat::from_path(Path::new("a/b.txt.zst")), TextFormat::Zstd);
        assert_eq!(TextFormat::from_path(Path::new("corpus.gz")), TextFormat::Gzip);
        assert_eq!(TextFormat::from_path(Path::new("corpus")), TextFormat::Plain);
    }

    #[test]
    fn read_plain_with_limit() {
        let path = temp_path("plain.txt");
        std::fs::write(&path, b"mississippi").unwrap();
        assert_eq!(read_text(&path, TextFormat::Plain, None).unwrap(), b"mississippi");
        assert_eq!(read_text(&path, TextFormat::Plain, Some(4)).unwrap(), b"miss");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn read_gzip() {
        let path = temp_path("text.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"banana").unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();
        assert_eq!(read_text(&path, TextFormat::Gzip, None).unwrap(), b"banana");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn read_zstd() {
        let path = temp_path("text.zst");
        std::fs::write(&path, zstd::encode_all(&b"abracadabra"[..], 0).unwrap()).unwrap();
        assert_eq!(read_text(&path, TextFormat::Zstd, Some(4)).unwrap(), b"abra");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_text(temp_path("missing"), TextFormat::Plain, None).unwrap_err();
        assert!(err.to_string().contains("failed to open"));
    }
}
