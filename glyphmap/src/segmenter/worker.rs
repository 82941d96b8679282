//! 再利用可能なセグメンテーション用ワーカー。
//!
//! ワーカーは入力文字列と分割結果を内部バッファに保持し、文ごとに
//! それらを再利用することで不要なメモリ再割り当てを回避します。
use crate::segmenter::{SegmentRecord, Segmenter, Segments};
use crate::token::Segment;

/// セグメンテーション処理のためのルーチンを提供する構造体。
///
/// # 例
///
/// ```
/// use glyphmap::{MappingTable, Segmenter};
///
/// let table = MappingTable::from_entries([("ka", "क"), ("kha", "ख")])?;
/// let mut worker = Segmenter::new(table).new_worker();
///
/// worker.reset_sentence("kakha!");
/// worker.segment();
/// assert_eq!(worker.num_tokens(), 3);
/// assert_eq!(worker.token(1).output(), "ख");
/// assert_eq!(worker.token(2).surface(), "!");
/// # Ok::<(), glyphmap::errors::GlyphMapError>(())
/// ```
pub struct Worker {
    segmenter: Segmenter,
    input: String,
    records: Vec<SegmentRecord>,
}

impl Worker {
    /// 新しいインスタンスを作成します。
    pub(crate) fn new(segmenter: Segmenter) -> Self {
        Self {
            segmenter,
            input: String::new(),
            records: vec![],
        }
    }

    /// 分割する入力文をリセットします。
    ///
    /// 新しい文を設定し、以前の分割結果をクリアします。
    pub fn reset_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.input.clear();
        self.records.clear();
        self.input.push_str(input.as_ref());
    }

    /// 設定された入力文を分割します。
    ///
    /// 結果は内部状態に保存され、`token()`や`token_iter()`でアクセスできます。
    pub fn segment(&mut self) {
        self.records.clear();
        let mut it = Segments::new(self.segmenter.table(), &self.input);
        while let Some(record) = it.next_record() {
            self.records.push(record);
        }
    }

    /// 分割結果のトークン数を取得します。
    #[inline(always)]
    pub fn num_tokens(&self) -> usize {
        self.records.len()
    }

    /// `i`番目のトークンを取得します。
    ///
    /// # パニック
    ///
    /// `i`が[`Self::num_tokens()`]以上の場合、パニックします。
    #[inline]
    pub fn token(&self, i: usize) -> Segment<'_> {
        self.make_segment(&self.records[i])
    }

    /// 分割結果のイテレータを作成します。
    pub fn token_iter(&self) -> impl Iterator<Item = Segment<'_>> + '_ {
        self.records.iter().map(|r| self.make_segment(r))
    }

    /// 分割結果の出力を連結した文字列を返します。
    pub fn output(&self) -> String {
        self.token_iter().map(|t| t.output()).collect()
    }

    fn make_segment(&self, r: &SegmentRecord) -> Segment<'_> {
        let table = self.segmenter.table();
        Segment::new(
            &self.input,
            r.entry.map(|idx| &table.entries()[idx]),
            r.start_char..r.end_char,
            r.start_byte..r.end_byte,
        )
    }
}
