//! 最長一致に基づくセグメンター。
//!
//! 入力文字列の先頭から、テーブルのキーに一致する最長の接頭辞を貪欲に切り出し、
//! そのエントリの値を出力します。どのキーにも一致しない場合は、1文字を
//! そのまま出力して次に進みます。そのため、どのような入力に対しても処理は
//! 必ず終了し、入力を取りこぼすことはありません。
//!
//! 長さはすべて文字（Unicodeスカラー値）単位で数えます。
//!
//! # 例
//!
//! ```
//! use glyphmap::{segment, MappingTable};
//!
//! let table = MappingTable::from_entries([("ka", "क"), ("kha", "ख"), ("k", "क़")])?;
//! let outputs: Vec<_> = segment(&table, "kakha").outputs().collect();
//! assert_eq!(outputs, ["क", "ख"]);
//! # Ok::<(), glyphmap::errors::GlyphMapError>(())
//! ```
pub mod worker;

use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

use crate::segmenter::worker::Worker;
use crate::table::MappingTable;
use crate::token::Segment;

/// 入力をテーブルで分割する遅延イテレータを返します。
///
/// イテレータは入力を一度だけ走査します。再度分割する場合は
/// この関数を再び呼び出してください。
///
/// # 引数
///
/// * `table` - マッピングテーブル
/// * `input` - 分割する文字列
#[inline]
pub fn segment<'a>(table: &'a MappingTable, input: &'a str) -> Segments<'a> {
    Segments::new(table, input)
}

/// 分割結果の出力を連結した文字列を返します。
///
/// # 例
///
/// ```
/// use glyphmap::{transliterate, MappingTable};
///
/// let table = MappingTable::from_entries([("z", "Q")])?;
/// assert_eq!(transliterate(&table, "xyz"), "xyQ");
/// # Ok::<(), glyphmap::errors::GlyphMapError>(())
/// ```
pub fn transliterate(table: &MappingTable, input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for seg in segment(table, input) {
        out.push_str(seg.output());
    }
    out
}

/// 1トークン分の位置情報
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SegmentRecord {
    pub start_char: usize,
    pub end_char: usize,
    pub start_byte: usize,
    pub end_byte: usize,
    pub entry: Option<usize>,
}

/// [`segment`]が返す遅延イテレータ
///
/// 未消費の入力の先頭位置（カーソル）だけを状態として保持します。
pub struct Segments<'a> {
    table: &'a MappingTable,
    input: &'a str,
    pos_char: usize,
    pos_byte: usize,
}

impl<'a> Segments<'a> {
    fn new(table: &'a MappingTable, input: &'a str) -> Self {
        Self {
            table,
            input,
            pos_char: 0,
            pos_byte: 0,
        }
    }

    /// 出力文字列だけを返すイテレータに変換します。
    pub fn outputs(self) -> impl Iterator<Item = &'a str> + 'a {
        self.map(|seg| seg.output())
    }

    /// 次のトークンの位置情報を計算し、カーソルを進めます。
    pub(crate) fn next_record(&mut self) -> Option<SegmentRecord> {
        let rest = self.input.get(self.pos_byte..)?;
        let first = rest.chars().next()?;

        let (len_char, len_byte, entry) = match self.table.longest_match(rest) {
            Some((len_char, len_byte, idx)) => (len_char, len_byte, Some(idx)),
            None => (1, first.len_utf8(), None),
        };

        let record = SegmentRecord {
            start_char: self.pos_char,
            end_char: self.pos_char + len_char,
            start_byte: self.pos_byte,
            end_byte: self.pos_byte + len_byte,
            entry,
        };
        self.pos_char = record.end_char;
        self.pos_byte = record.end_byte;
        Some(record)
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let r = self.next_record()?;
        let table = self.table;
        Some(Segment::new(
            self.input,
            r.entry.map(|idx| &table.entries()[idx]),
            r.start_char..r.end_char,
            r.start_byte..r.end_byte,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.input.len() - self.pos_byte;
        (usize::from(rest != 0), Some(rest))
    }
}

impl FusedIterator for Segments<'_> {}

impl fmt::Debug for Segments<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segments")
            .field("table_len", &self.table.len())
            .field("rest", &&self.input[self.pos_byte..])
            .field("pos_char", &self.pos_char)
            .field("pos_byte", &self.pos_byte)
            .finish()
    }
}

/// テーブルを所有するセグメンター。
///
/// テーブルは`Arc`で保持されるため、`Segmenter`の複製やワーカーの生成は
/// テーブルをコピーしません。複数スレッドで同じテーブルを共有する場合は、
/// スレッドごとに`Segmenter`を複製するか[`Worker`]を生成してください。
///
/// # 例
///
/// ```
/// use glyphmap::{MappingTable, Segmenter};
///
/// let table = MappingTable::from_entries([("ab", "X"), ("a", "Y")])?;
/// let segmenter = Segmenter::new(table);
///
/// let outputs: Vec<_> = segmenter.segment("abab").outputs().collect();
/// assert_eq!(outputs, ["X", "X"]);
/// # Ok::<(), glyphmap::errors::GlyphMapError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Segmenter {
    table: Arc<MappingTable>,
}

impl Segmenter {
    /// 新しいセグメンターを作成します。
    pub fn new(table: MappingTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// 共有されたテーブルから新しいセグメンターを作成します。
    pub fn from_shared_table(table: Arc<MappingTable>) -> Self {
        Self { table }
    }

    /// テーブルへの参照を取得します。
    #[inline(always)]
    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// 入力を分割する遅延イテレータを返します。
    #[inline]
    pub fn segment<'a>(&'a self, input: &'a str) -> Segments<'a> {
        segment(&self.table, input)
    }

    /// 分割結果の出力を連結した文字列を返します。
    pub fn transliterate(&self, input: &str) -> String {
        transliterate(&self.table, input)
    }

    /// 新しいワーカーを作成します。
    pub fn new_worker(&self) -> Worker {
        Worker::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outputs<'a>(table: &'a MappingTable, input: &'a str) -> Vec<&'a str> {
        segment(table, input).outputs().collect()
    }

    #[test]
    fn test_empty_input() {
        let table = MappingTable::from_entries([("a", "1")]).unwrap();
        assert_eq!(segment(&table, "").count(), 0);
        assert_eq!(transliterate(&table, ""), "");
    }

    #[test]
    fn test_longest_match_preferred() {
        let table = MappingTable::from_entries([("ab", "X"), ("a", "Y")]).unwrap();
        assert_eq!(outputs(&table, "ab"), ["X"]);
        assert_eq!(outputs(&table, "aab"), ["Y", "X"]);
    }

    #[test]
    fn test_pass_through() {
        let table = MappingTable::from_entries([("z", "Q")]).unwrap();
        assert_eq!(outputs(&table, "xyz"), ["x", "y", "Q"]);
    }

    #[test]
    fn test_kakha() {
        let table = MappingTable::from_entries([
            ("ka", "\u{0915}"),
            ("kha", "\u{0916}"),
            ("k", "\u{0958}"),
        ])
        .unwrap();
        assert_eq!(outputs(&table, "kakha"), ["\u{0915}", "\u{0916}"]);
        assert_eq!(outputs(&table, "kk"), ["\u{0958}", "\u{0958}"]);
    }

    #[test]
    fn test_no_backtracking() {
        // Greedy: "ab" is taken even though "a" + "bc" would map everything.
        let table = MappingTable::from_entries([("ab", "X"), ("a", "Y"), ("bc", "Z")]).unwrap();
        assert_eq!(outputs(&table, "abc"), ["X", "c"]);
    }

    #[test]
    fn test_ranges() {
        let table = MappingTable::from_entries([("\u{0915}\u{094d}", "k")]).unwrap();
        let segs: Vec<_> = segment(&table, "a\u{0915}\u{094d}b").collect();
        assert_eq!(segs.len(), 3);

        assert_eq!(segs[0].range_char(), 0..1);
        assert_eq!(segs[0].range_byte(), 0..1);

        assert_eq!(segs[1].output(), "k");
        assert_eq!(segs[1].surface(), "\u{0915}\u{094d}");
        assert_eq!(segs[1].range_char(), 1..3);
        assert_eq!(segs[1].range_byte(), 1..7);

        assert_eq!(segs[2].range_char(), 3..4);
        assert_eq!(segs[2].range_byte(), 7..8);
    }

    #[test]
    fn test_multibyte_pass_through() {
        let table = MappingTable::from_entries([("a", "1")]).unwrap();
        assert_eq!(outputs(&table, "\u{0915}a\u{1F600}"), ["\u{0915}", "1", "\u{1F600}"]);
    }

    #[test]
    fn test_empty_table() {
        let table = MappingTable::default();
        assert_eq!(outputs(&table, "abc"), ["a", "b", "c"]);
    }

    #[test]
    fn test_key_longer_than_input() {
        let table = MappingTable::from_entries([("abcdef", "X"), ("b", "B")]).unwrap();
        assert_eq!(outputs(&table, "ab"), ["a", "B"]);
    }

    #[test]
    fn test_fused() {
        let table = MappingTable::from_entries([("a", "1")]).unwrap();
        let mut it = segment(&table, "a");
        assert!(it.next().is_some());
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    #[test]
    fn test_size_hint() {
        let table = MappingTable::from_entries([("ab", "X")]).unwrap();
        let mut it = segment(&table, "abc");
        assert_eq!(it.size_hint(), (1, Some(3)));
        it.next();
        assert_eq!(it.size_hint(), (1, Some(1)));
        it.next();
        assert_eq!(it.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_debug_shows_cursor() {
        let table = MappingTable::from_entries([("\u{0915}", "k")]).unwrap();
        let mut it = segment(&table, "\u{0915}ab");
        it.next();
        assert_eq!(
            format!("{it:?}"),
            r#"Segments { table_len: 1, rest: "ab", pos_char: 1, pos_byte: 3 }"#
        );
    }

    #[test]
    fn test_segmenter() {
        let segmenter = Segmenter::new(MappingTable::from_entries([("z", "Q")]).unwrap());
        assert_eq!(segmenter.transliterate("xyz"), "xyQ");
        assert_eq!(segmenter.table().len(), 1);
    }
}
