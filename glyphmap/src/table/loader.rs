//! テキスト形式のマッピングファイルの読み込み
//!
//! 1行に1レコード、2つのフィールドを区切り文字で区切った形式を読み込みます。
//! ヘッダ行、コメント、エスケープはサポートしません。
//!
//! ```text
//! ka:क
//! kha:ख
//! k:क़
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::errors::{Field, GlyphMapError, Result};
use crate::table::{MappingEntry, MappingTable};
use crate::utils::{UTF8_BOM, split_record};

/// フィールド長の既定の上限（文字数）
pub const DEFAULT_MAX_FIELD_LEN: usize = 39;

/// マッピングファイルを読み込んで[`MappingTable`]を構築するローダー
///
/// # 例
///
/// ```
/// use glyphmap::TableLoader;
///
/// let table = TableLoader::new(':')?
///     .max_field_len(8)
///     .load_text("ka:क\nkha:ख\n")?;
/// assert_eq!(table.len(), 2);
/// # Ok::<(), glyphmap::errors::GlyphMapError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TableLoader {
    delimiter: u8,
    max_field_len: Option<usize>,
}

impl TableLoader {
    /// 区切り文字を指定して新しいローダーを作成します。
    ///
    /// # 引数
    ///
    /// * `delimiter` - フィールドの区切り文字。ASCIIの記号、スペース、タブのいずれか。
    ///
    /// # エラー
    ///
    /// 区切り文字として使用できない文字が指定された場合、
    /// [`GlyphMapError::InvalidArgument`]を返します。
    pub fn new(delimiter: char) -> Result<Self> {
        if !(delimiter.is_ascii_punctuation() || delimiter == ' ' || delimiter == '\t') {
            return Err(GlyphMapError::invalid_argument(
                "delimiter",
                format!("{delimiter:?} cannot be used; use an ASCII punctuation, space or tab"),
            ));
        }
        Ok(Self {
            delimiter: delimiter as u8,
            max_field_len: Some(DEFAULT_MAX_FIELD_LEN),
        })
    }

    /// フィールド長の上限を文字数で指定します。
    ///
    /// デフォルトは[`DEFAULT_MAX_FIELD_LEN`]です。
    /// `0`を指定すると上限なしになります。
    pub const fn max_field_len(mut self, max_field_len: usize) -> Self {
        if max_field_len != 0 {
            self.max_field_len = Some(max_field_len);
        } else {
            self.max_field_len = None;
        }
        self
    }

    /// ファイルからテーブルを読み込みます。
    ///
    /// # エラー
    ///
    /// - パスがディレクトリの場合は[`GlyphMapError::PathIsDirectory`]
    /// - ファイルを開けない、または読み込めない場合は[`GlyphMapError::Io`]
    /// - 内容が不正な場合は[`Self::load_reader`]と同じエラー
    pub fn load<P>(&self, path: P) -> Result<MappingTable>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if path.is_dir() {
            return Err(GlyphMapError::PathIsDirectory(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let table = self.load_reader(file)?;
        log::debug!(
            "[glyphmap] Loaded {} entries from {} (max key length {})",
            table.len(),
            path.display(),
            table.max_key_len(),
        );
        Ok(table)
    }

    /// リーダーからテーブルを読み込みます。
    ///
    /// 行末の`\r`と、先頭行のUTF-8 BOMは取り除かれます。空行は無視されます。
    ///
    /// # エラー
    ///
    /// - 区切り文字がちょうど1つでない行、フィールドが空の行、UTF-8として不正な行は
    ///   [`GlyphMapError::MalformedRecord`]
    /// - フィールドが上限より長い場合は[`GlyphMapError::FieldTooLong`]
    /// - キーが重複する場合は[`GlyphMapError::DuplicateKey`]
    /// - 読み込みに失敗した場合は[`GlyphMapError::Io`]
    pub fn load_reader<R>(&self, rdr: R) -> Result<MappingTable>
    where
        R: Read,
    {
        let mut rdr = BufReader::new(rdr);
        let mut entries = vec![];
        let mut buf = vec![];
        let mut line = 0;
        loop {
            buf.clear();
            if rdr.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line += 1;

            let mut row = buf.as_slice();
            if let Some(stripped) = row.strip_suffix(b"\n") {
                row = stripped;
            }
            if let Some(stripped) = row.strip_suffix(b"\r") {
                row = stripped;
            }
            if line == 1
                && let Some(stripped) = row.strip_prefix(UTF8_BOM)
            {
                log::debug!("[glyphmap] Skipped a UTF-8 byte order mark");
                row = stripped;
            }
            if row.is_empty() {
                continue;
            }

            entries.push((line, self.parse_record(row, line)?));
        }
        MappingTable::from_numbered(entries)
    }

    /// 文字列からテーブルを読み込みます。
    ///
    /// [`Self::load_reader`]と同じ規則で解析します。
    pub fn load_text(&self, text: &str) -> Result<MappingTable> {
        self.load_reader(text.as_bytes())
    }

    fn parse_record(&self, row: &[u8], line: usize) -> Result<MappingEntry> {
        let delimiter = char::from(self.delimiter);
        let mut fields = split_record(row, self.delimiter)
            .map_err(|e| GlyphMapError::malformed(line, format!("invalid UTF-8: {e}")))?;

        match fields.len() {
            2 => {}
            0 | 1 => {
                return Err(GlyphMapError::malformed(
                    line,
                    format!("missing delimiter {delimiter:?}"),
                ));
            }
            n => {
                return Err(GlyphMapError::malformed(
                    line,
                    format!("expected exactly one {delimiter:?}, found {}", n - 1),
                ));
            }
        }

        let value = fields.pop().unwrap_or_default();
        let key = fields.pop().unwrap_or_default();
        if key.is_empty() {
            return Err(GlyphMapError::malformed(line, "empty key"));
        }
        if value.is_empty() {
            return Err(GlyphMapError::malformed(line, "empty value"));
        }
        self.check_len(&key, Field::Key, line)?;
        self.check_len(&value, Field::Value, line)?;

        Ok(MappingEntry { key, value })
    }

    fn check_len(&self, field: &str, kind: Field, line: usize) -> Result<()> {
        let Some(max) = self.max_field_len else {
            return Ok(());
        };
        let len = field.chars().count();
        if len > max {
            return Err(GlyphMapError::FieldTooLong {
                line,
                field: kind,
                len,
                max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> TableLoader {
        TableLoader::new(':').unwrap()
    }

    #[test]
    fn test_load_text() {
        let table = loader().load_text("ka:\u{0915}\nkha:\u{0916}\nk:\u{0958}\n").unwrap();
        let pairs: Vec<_> = table.iter().map(|e| (e.key(), e.value())).collect();
        assert_eq!(
            pairs,
            [("k", "\u{0958}"), ("ka", "\u{0915}"), ("kha", "\u{0916}")]
        );
    }

    #[test]
    fn test_load_text_without_trailing_newline() {
        let table = loader().load_text("a:1\nb:2").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("b").unwrap().value(), "2");
    }

    #[test]
    fn test_skip_empty_lines() {
        let table = loader().load_text("\na:1\n\n\nb:2\n\n").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_crlf() {
        let table = loader().load_text("a:1\r\nb:2\r\n\r\n").unwrap();
        assert_eq!(table.get("a").unwrap().value(), "1");
        assert_eq!(table.get("b").unwrap().value(), "2");
    }

    #[test]
    fn test_bom() {
        let table = loader().load_text("\u{feff}a:1\nb:2\n").unwrap();
        assert_eq!(table.get("a").unwrap().value(), "1");
    }

    #[test]
    fn test_bom_only_on_first_line() {
        let result = loader().load_text("a:1\n\u{feff}b:2\n").unwrap();
        assert!(result.get("b").is_none());
        assert!(result.get("\u{feff}b").is_some());
    }

    #[test]
    fn test_bom_prefixed_key_is_distinct() {
        let table = loader().load_text("b:1\n\u{feff}b:2\n").unwrap();
        assert_eq!(table.get("b").unwrap().value(), "1");
        assert_eq!(table.get("\u{feff}b").unwrap().value(), "2");

        let table = loader().load_text("x:1\n\u{feff}\u{feff}b:2\n").unwrap();
        let keys: Vec<_> = table.iter().map(|e| e.key()).collect();
        assert_eq!(keys, ["x", "\u{feff}\u{feff}b"]);

        // Only the first BOM of line 1 is a byte order mark.
        let table = loader().load_text("\u{feff}\u{feff}a:1\n").unwrap();
        assert!(table.get("\u{feff}a").is_some());
    }

    #[test]
    fn test_missing_delimiter() {
        let result = loader().load_text("a:1\nb2\n");
        match result {
            Err(GlyphMapError::MalformedRecord { line, reason }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("missing delimiter"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_two_delimiters() {
        let result = loader().load_text("a:1\n\nb:2:3\n");
        match result {
            Err(GlyphMapError::MalformedRecord { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("found 2"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_empty_fields() {
        assert!(matches!(
            loader().load_text(":1\n"),
            Err(GlyphMapError::MalformedRecord { line: 1, .. })
        ));
        assert!(matches!(
            loader().load_text("a:1\nb:\n"),
            Err(GlyphMapError::MalformedRecord { line: 2, .. })
        ));
        assert!(matches!(
            loader().load_text(":"),
            Err(GlyphMapError::MalformedRecord { line: 1, .. })
        ));
    }

    #[test]
    fn test_field_too_long() {
        let key = "k".repeat(DEFAULT_MAX_FIELD_LEN + 1);
        let result = loader().load_text(&format!("a:1\n{key}:2\n"));
        match result {
            Err(GlyphMapError::FieldTooLong {
                line,
                field,
                len,
                max,
            }) => {
                assert_eq!(line, 2);
                assert_eq!(field, Field::Key);
                assert_eq!(len, DEFAULT_MAX_FIELD_LEN + 1);
                assert_eq!(max, DEFAULT_MAX_FIELD_LEN);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let result = loader().max_field_len(2).load_text("a:123\n");
        assert!(matches!(
            result,
            Err(GlyphMapError::FieldTooLong {
                field: Field::Value,
                len: 3,
                max: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_field_len_counts_chars() {
        // 39 chars, 117 bytes.
        let value = "\u{0915}".repeat(DEFAULT_MAX_FIELD_LEN);
        let table = loader().load_text(&format!("ka:{value}\n")).unwrap();
        assert_eq!(table.get("ka").unwrap().value(), value);
    }

    #[test]
    fn test_unlimited_field_len() {
        let key = "k".repeat(1000);
        let table = loader()
            .max_field_len(0)
            .load_text(&format!("{key}:1\n"))
            .unwrap();
        assert_eq!(table.max_key_len(), 1000);
    }

    #[test]
    fn test_duplicate_key() {
        let result = loader().load_text("a:1\nb:2\n\na:3\n");
        match result {
            Err(GlyphMapError::DuplicateKey {
                key,
                first_line,
                line,
            }) => {
                assert_eq!(key, "a");
                assert_eq!(first_line, 1);
                assert_eq!(line, 4);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8() {
        let result = loader().load_reader(&b"a:1\nb:\xff\n"[..]);
        assert!(matches!(
            result,
            Err(GlyphMapError::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn test_other_delimiters() {
        let table = TableLoader::new('\t').unwrap().load_text("a\t1\n").unwrap();
        assert_eq!(table.get("a").unwrap().value(), "1");

        let table = TableLoader::new(',').unwrap().load_text("a:b,1\n").unwrap();
        assert_eq!(table.get("a:b").unwrap().value(), "1");
    }

    #[test]
    fn test_invalid_delimiter() {
        for delimiter in ['a', '\n', '\r', '9', '\u{0915}'] {
            assert!(matches!(
                TableLoader::new(delimiter),
                Err(GlyphMapError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_empty_source() {
        let table = loader().load_text("").unwrap();
        assert!(table.is_empty());
        let table = loader().load_text("\n\r\n").unwrap();
        assert!(table.is_empty());
    }
}
