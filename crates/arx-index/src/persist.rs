//! Flat-file persistence for the article table.
//!
//! The backing file holds one encoded article per line (see [`crate::codec`])
//! with no header. Loading is lenient: malformed lines are skipped. Saving is
//! a snapshot write: the whole table is rewritten every time, through a
//! temporary file in the same directory that is synced and then renamed over
//! the target, so a crash mid-save leaves the previous file intact.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use arx_store::write_atomic;
use tracing::{debug, info};

use crate::codec::{decode, encode};
use crate::error::IndexResult;
use crate::index::ArticleIndex;

/// Build an index from encoded lines, skipping lines that do not decode.
pub fn load_lines<I, S>(lines: I) -> ArticleIndex
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index = ArticleIndex::new();
    let mut skipped = 0usize;
    for (lineno, line) in lines.into_iter().enumerate() {
        match decode(line.as_ref()) {
            Some(article) => {
                index.insert(article);
            }
            None => {
                if !line.as_ref().trim().is_empty() {
                    debug!(line = lineno + 1, "skipping malformed record");
                }
                skipped += 1;
            }
        }
    }
    debug!(loaded = index.len(), skipped, "records decoded");
    index
}

/// Encode every article as a line, in table order.
pub fn dump_lines(index: &ArticleIndex) -> Vec<String> {
    index.iter().map(encode).collect()
}

/// Read an index from a line-oriented reader.
///
/// Malformed records are skipped; read failures (including invalid UTF-8)
/// are returned as errors.
pub fn read_from<R: BufRead>(reader: R) -> IndexResult<ArticleIndex> {
    let lines = reader.lines().collect::<io::Result<Vec<String>>>()?;
    Ok(load_lines(lines))
}

/// Write every article as a newline-terminated line.
pub fn write_to<W: Write>(index: &ArticleIndex, mut writer: W) -> IndexResult<()> {
    for article in index.iter() {
        writer.write_all(encode(article).as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Load the index stored at `path`.
///
/// A missing file is a catalog with no records yet and yields an empty
/// index. Any other failure is returned.
pub fn load_file(path: &Path) -> IndexResult<ArticleIndex> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no database yet; starting empty");
            return Ok(ArticleIndex::new());
        }
        Err(e) => return Err(e.into()),
    };

    let index = read_from(BufReader::new(file))?;
    info!(path = %path.display(), articles = index.len(), "database loaded");
    Ok(index)
}

/// Replace the file at `path` with a snapshot of `index`.
///
/// Missing parent directories are created.
pub fn save_file(path: &Path, index: &ArticleIndex) -> IndexResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    write_atomic(path, |file: &mut File| write_to(index, BufWriter::new(file)))?;

    info!(path = %path.display(), articles = index.len(), "database saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;
    use arx_types::{Article, ArticleId};
    use proptest::prelude::*;

    fn article(id: &str, title: &str, contributors: &str, year: &str) -> Article {
        Article::new(ArticleId::new(id), title, contributors, year, format!("{id}.txt"))
    }

    fn sample_index() -> ArticleIndex {
        [
            article("a1", "T1", "Alice, Bob", "2020"),
            article("b2", "T2", "Carol", "2021"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn load_lines_skips_malformed() {
        let lines = [
            "a1|T1|Alice, Bob|2020|a1.txt",
            "",
            "garbage",
            "b2|T2|Carol|2021|b2.txt|extra",
            "c3|T3|Dave|2022|c3.txt",
            "   ",
        ];
        let index = load_lines(lines);
        assert_eq!(index.len(), 2);
        assert!(index.lookup("a1").is_some());
        assert!(index.lookup("c3").is_some());
        assert!(index.check_consistency().is_ok());
    }

    #[test]
    fn later_lines_override_earlier_ones() {
        let index = load_lines([
            "a1|Old|Alice|2020|a1.txt",
            "a1|New|Bob|2021|a1.txt",
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("a1").unwrap().title, "New");
        assert!(index.by_contributor("Alice").is_empty());
        assert!(index.check_consistency().is_ok());
    }

    #[test]
    fn dump_lines_encodes_every_article() {
        let lines = dump_lines(&sample_index());
        assert_eq!(
            lines,
            vec!["a1|T1|Alice, Bob|2020|a1.txt", "b2|T2|Carol|2021|b2.txt"]
        );
    }

    #[test]
    fn dump_then_load_roundtrip() {
        let index = sample_index();
        assert_eq!(load_lines(dump_lines(&index)), index);
    }

    #[test]
    fn write_to_and_read_from() {
        let index = sample_index();
        let mut buf = Vec::new();
        write_to(&index, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf.clone()).unwrap(),
            "a1|T1|Alice, Bob|2020|a1.txt\nb2|T2|Carol|2021|b2.txt\n"
        );
        assert_eq!(read_from(buf.as_slice()).unwrap(), index);
    }

    #[test]
    fn read_from_tolerates_crlf_and_trailing_blank_lines() {
        let data = b"a1|T1|Alice, Bob|2020|a1.txt\r\n\r\n\n";
        let index = read_from(&data[..]).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("a1").unwrap().payload_key, "a1.txt");
    }

    #[test]
    fn read_from_surfaces_invalid_utf8() {
        let data = [b'a', b'|', 0xff, b'\n'];
        assert!(matches!(read_from(&data[..]), Err(IndexError::Io(_))));
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = load_file(&dir.path().join("absent.txt")).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn load_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_file(dir.path()).is_err());
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db").join("articles_db.txt");
        let index = sample_index();

        save_file(&path, &index).unwrap();
        assert_eq!(load_file(&path).unwrap(), index);
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.txt");

        let mut index = sample_index();
        save_file(&path, &index).unwrap();
        index.delete("a1");
        save_file(&path, &index).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "b2|T2|Carol|2021|b2.txt\n");

        let names: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(names.len(), 1, "temporary files must not be left behind");
    }

    #[cfg(unix)]
    #[test]
    fn save_keeps_database_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.txt");
        save_file(&path, &sample_index()).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        save_file(&path, &ArticleIndex::new()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn save_empty_index_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.txt");
        save_file(&path, &ArticleIndex::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    fn field() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 ,.'-]{0,12}"
    }

    proptest! {
        #[test]
        fn load_dump_roundtrip(
            records in proptest::collection::vec(
                ("[0-9a-f]{1,16}", field(), field(), "[0-9]{4}"),
                0..20,
            )
        ) {
            // Leading/trailing whitespace on a line is not preserved, so keep
            // the outer fields free of it.
            let index: ArticleIndex = records
                .into_iter()
                .map(|(id, title, contributors, year)| {
                    Article::new(ArticleId::new(id.clone()), title, contributors, year, format!("{id}.txt"))
                })
                .collect();

            let reloaded = load_lines(dump_lines(&index));
            prop_assert_eq!(&reloaded, &index);
            prop_assert!(reloaded.check_consistency().is_ok());
        }
    }
}
