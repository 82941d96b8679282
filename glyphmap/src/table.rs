//! グリフ列から出力タグへのマッピングテーブル
//!
//! このモジュールは、キー（グリフ列）の昇順に整列された不変のテーブルと、
//! その読み込み・直列化の機能を提供します。
//!
//! テーブルの不変条件は次のとおりです。
//!
//! - エントリはキーのバイト列の辞書順で厳密に昇順に並ぶ
//! - キーは一意である
//! - キーと値はどちらも空でない
//!
//! これらはすべてのコンストラクタで検査され、構築後にテーブルを変更する
//! 公開APIは存在しません。

mod compiled;
pub mod loader;

use std::slice::Iter;

use rkyv::{Archive, Deserialize, Serialize};

use crate::errors::{GlyphMapError, Result};

pub use crate::table::compiled::TABLE_MAGIC;
pub use crate::table::loader::{DEFAULT_MAX_FIELD_LEN, TableLoader};

/// テーブルの1エントリ
#[derive(Archive, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MappingEntry {
    key: String,
    value: String,
}

impl MappingEntry {
    /// 新しいエントリを作成します。
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// キー（グリフ列）を取得します。
    #[inline(always)]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// 値（出力タグ）を取得します。
    #[inline(always)]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// キーの昇順に整列された不変のマッピングテーブル
///
/// 構築後は読み取り専用のため、`Arc`などで複数スレッドから
/// ロックなしに共有できます。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
    // Counted in chars.
    max_key_len: usize,
}

impl MappingTable {
    /// キーと値の組から新しいテーブルを構築します。
    ///
    /// 入力の順序は問いません。内部でキーの昇順に整列します。
    /// フィールド長の上限は[`TableLoader`]の規則であり、ここでは検査しません。
    ///
    /// # 引数
    ///
    /// * `entries` - キーと値の組のイテレータ
    ///
    /// # エラー
    ///
    /// キーまたは値が空の場合は[`GlyphMapError::MalformedRecord`]を、
    /// キーが重複する場合は[`GlyphMapError::DuplicateKey`]を返します。
    /// 行番号には1始まりのエントリ位置が入ります。
    ///
    /// # 例
    ///
    /// ```
    /// use glyphmap::MappingTable;
    ///
    /// let table = MappingTable::from_entries([("kha", "ख"), ("ka", "क")])?;
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.get("ka").unwrap().value(), "क");
    /// assert_eq!(table.max_key_len(), 3);
    /// # Ok::<(), glyphmap::errors::GlyphMapError>(())
    /// ```
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut numbered = vec![];
        for (i, (key, value)) in entries.into_iter().enumerate() {
            let entry = MappingEntry::new(key, value);
            let line = i + 1;
            if entry.key.is_empty() {
                return Err(GlyphMapError::malformed(line, "empty key"));
            }
            if entry.value.is_empty() {
                return Err(GlyphMapError::malformed(line, "empty value"));
            }
            numbered.push((line, entry));
        }
        Self::from_numbered(numbered)
    }

    /// 行番号付きのエントリから構築します。
    ///
    /// エントリの空チェックは呼び出し側で済んでいることを前提とします。
    pub(crate) fn from_numbered(mut numbered: Vec<(usize, MappingEntry)>) -> Result<Self> {
        // Stable, so equal keys keep their input order.
        numbered.sort_by(|(_, a), (_, b)| a.key.cmp(&b.key));

        let duplicate = numbered
            .windows(2)
            .filter(|w| w[0].1.key == w[1].1.key)
            .min_by_key(|w| w[1].0);
        if let Some(w) = duplicate {
            return Err(GlyphMapError::DuplicateKey {
                key: w[1].1.key.clone(),
                first_line: w[0].0,
                line: w[1].0,
            });
        }

        Ok(Self::from_sorted_unchecked(
            numbered.into_iter().map(|(_, e)| e).collect(),
        ))
    }

    /// 整列済みであることを検査してから構築します。
    pub(crate) fn from_sorted(entries: Vec<MappingEntry>) -> Result<Self> {
        for (i, w) in entries.windows(2).enumerate() {
            if w[0].key >= w[1].key {
                return Err(GlyphMapError::UnsortedTable { index: i + 1 });
            }
        }
        if let Some(i) = entries
            .iter()
            .position(|e| e.key.is_empty() || e.value.is_empty())
        {
            return Err(GlyphMapError::malformed(i + 1, "empty key or value"));
        }
        Ok(Self::from_sorted_unchecked(entries))
    }

    fn from_sorted_unchecked(entries: Vec<MappingEntry>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].key < w[1].key));
        let max_key_len = entries
            .iter()
            .map(|e| e.key.chars().count())
            .max()
            .unwrap_or(0);
        Self {
            entries,
            max_key_len,
        }
    }

    /// エントリ数を返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// エントリが1つもない場合に`true`を返します。
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 最長キーの文字数を返します。空のテーブルでは0です。
    #[inline(always)]
    pub fn max_key_len(&self) -> usize {
        self.max_key_len
    }

    /// キーの昇順に並んだエントリのスライスを返します。
    #[inline(always)]
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// エントリをキーの昇順に走査するイテレータを返します。
    #[inline(always)]
    pub fn iter(&self) -> Iter<'_, MappingEntry> {
        self.entries.iter()
    }

    /// キーに完全一致するエントリを二分探索で検索します。
    ///
    /// # 引数
    ///
    /// * `key` - 検索するキー
    ///
    /// # 戻り値
    ///
    /// 見つかった場合は`Some(エントリ)`、見つからない場合は`None`
    #[inline]
    pub fn get(&self, key: &str) -> Option<&MappingEntry> {
        self.position(key).map(|i| &self.entries[i])
    }

    #[inline]
    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .binary_search_by(|e| e.key.as_str().cmp(key))
            .ok()
    }

    /// 入力の先頭に一致する最長のキーを探します。
    ///
    /// 長さは文字（Unicodeスカラー値）単位で数えます。
    ///
    /// # 引数
    ///
    /// * `input` - 検索対象の文字列
    ///
    /// # 戻り値
    ///
    /// 一致した場合は`Some((一致した文字数, エントリ))`
    ///
    /// # 例
    ///
    /// ```
    /// use glyphmap::MappingTable;
    ///
    /// let table = MappingTable::from_entries([("a", "Y"), ("ab", "X")])?;
    /// let (len, entry) = table.longest_prefix_match("abc").unwrap();
    /// assert_eq!(len, 2);
    /// assert_eq!(entry.value(), "X");
    /// assert!(table.longest_prefix_match("c").is_none());
    /// # Ok::<(), glyphmap::errors::GlyphMapError>(())
    /// ```
    pub fn longest_prefix_match(&self, input: &str) -> Option<(usize, &MappingEntry)> {
        self.longest_match(input)
            .map(|(len, _, idx)| (len, &self.entries[idx]))
    }

    /// [`Self::longest_prefix_match`]の本体です。
    ///
    /// 戻り値は`(一致した文字数, 一致したバイト数, エントリの位置)`です。
    /// 候補の接頭辞を末尾から1文字ずつ縮めるため、メモリ確保は行いません。
    pub(crate) fn longest_match(&self, input: &str) -> Option<(usize, usize, usize)> {
        let end = input
            .char_indices()
            .nth(self.max_key_len)
            .map_or(input.len(), |(i, _)| i);
        let mut prefix = &input[..end];
        let mut len = prefix.chars().count();
        while len != 0 {
            if let Some(idx) = self.position(prefix) {
                return Some((len, prefix.len(), idx));
            }
            let (last, _) = prefix.char_indices().next_back()?;
            prefix = &prefix[..last];
            len -= 1;
        }
        None
    }
}

impl<'a> IntoIterator for &'a MappingTable {
    type Item = &'a MappingEntry;
    type IntoIter = Iter<'a, MappingEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
