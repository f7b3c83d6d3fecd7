//! Archive packaging and delivery.

use rustc_hash::FxHashMap;
use std::{
    fs,
    io::{self, Cursor, Write},
    path::PathBuf,
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// In-memory set of named entries. Adding a name twice keeps the later
/// content at the earlier position.
#[derive(Debug, Default)]
pub struct IconArchive {
    entries: Vec<(String, String)>,
    index: FxHashMap<String, usize>,
}

impl IconArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: String, content: String) {
        match self.index.get(&name) {
            Some(&i) => self.entries[i].1 = content,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, content));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode as a deflate-compressed zip.
    pub fn finish(self) -> zip::result::ZipResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, content) in &self.entries {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(content.as_bytes())?;
        }

        Ok(writer.finish()?.into_inner())
    }
}

/// Delivers a finished archive.
pub trait FileSaver {
    /// Persist `bytes` as `file_name`, returning where it ended up.
    fn save(&self, bytes: &[u8], file_name: &str) -> io::Result<PathBuf>;
}

/// Writes archives into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DiskSaver {
    dir: PathBuf,
}

impl DiskSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FileSaver for DiskSaver {
    fn save(&self, bytes: &[u8], file_name: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_back(bytes: Vec<u8>) -> Vec<(String, String)> {
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..zip.len())
            .map(|i| {
                let mut file = zip.by_index(i).unwrap();
                let mut content = String::new();
                file.read_to_string(&mut content).unwrap();
                (file.name().to_string(), content)
            })
            .collect()
    }

    #[test]
    fn test_last_writer_wins() {
        let mut archive = IconArchive::new();
        archive.add("A_.svg".into(), "<svg>first</svg>".into());
        archive.add("b.svg".into(), "<svg>b</svg>".into());
        archive.add("A_.svg".into(), "<svg>second</svg>".into());
        assert_eq!(archive.len(), 2);

        let entries = read_back(archive.finish().unwrap());
        assert_eq!(
            entries,
            vec![
                ("A_.svg".to_string(), "<svg>second</svg>".to_string()),
                ("b.svg".to_string(), "<svg>b</svg>".to_string()),
            ]
        );
    }

    #[test]
    fn test_disk_saver_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let saver = DiskSaver::new(dir.path().join("out"));

        let path = saver.save(b"PK", "icons_1.zip").unwrap();
        assert_eq!(path, dir.path().join("out/icons_1.zip"));
        assert_eq!(fs::read(path).unwrap(), b"PK");
    }
}
