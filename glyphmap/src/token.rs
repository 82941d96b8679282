//! セグメンテーションの結果トークン
//!
//! [`Segment`]は入力文字列とテーブルへの軽量な参照で、
//! 消費した入力の範囲と出力文字列へのアクセスを提供します。

use std::fmt;
use std::ops::Range;

use crate::table::MappingEntry;

/// トークンの種類
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// テーブルのキーに一致した
    Mapped,
    /// 一致するキーがなく、1文字をそのまま出力した
    PassThrough,
}

/// セグメンテーションの結果トークン
///
/// 入力とテーブルを借用しているため、どちらかが生存している間のみ有効です。
/// 所有型が必要な場合は[`Segment::to_buf`]を使用してください。
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    surface: &'a str,
    entry: Option<&'a MappingEntry>,
    range_char: (usize, usize),
    range_byte: (usize, usize),
}

impl<'a> Segment<'a> {
    #[inline(always)]
    pub(crate) fn new(
        input: &'a str,
        entry: Option<&'a MappingEntry>,
        range_char: Range<usize>,
        range_byte: Range<usize>,
    ) -> Self {
        Self {
            surface: &input[range_byte.clone()],
            entry,
            range_char: (range_char.start, range_char.end),
            range_byte: (range_byte.start, range_byte.end),
        }
    }

    /// トークンの出力文字列を取得します。
    ///
    /// 一致したエントリの値、または素通しされた1文字です。
    #[inline(always)]
    pub fn output(&self) -> &'a str {
        match self.entry {
            Some(entry) => entry.value(),
            None => self.surface,
        }
    }

    /// トークンが消費した入力の部分文字列を取得します。
    #[inline(always)]
    pub fn surface(&self) -> &'a str {
        self.surface
    }

    /// 一致したテーブルのエントリを取得します。
    #[inline(always)]
    pub fn entry(&self) -> Option<&'a MappingEntry> {
        self.entry
    }

    /// トークンの種類を取得します。
    #[inline(always)]
    pub fn kind(&self) -> SegmentKind {
        if self.entry.is_some() {
            SegmentKind::Mapped
        } else {
            SegmentKind::PassThrough
        }
    }

    /// 入力中の文字単位の位置範囲を取得します。
    #[inline(always)]
    pub fn range_char(&self) -> Range<usize> {
        self.range_char.0..self.range_char.1
    }

    /// 入力中のバイト単位の位置範囲を取得します。
    #[inline(always)]
    pub fn range_byte(&self) -> Range<usize> {
        self.range_byte.0..self.range_byte.1
    }

    /// 所有型の[`SegmentBuf`]に変換します。
    pub fn to_buf(&self) -> SegmentBuf {
        SegmentBuf {
            output: self.output().to_string(),
            surface: self.surface.to_string(),
            kind: self.kind(),
            range_char: self.range_char(),
            range_byte: self.range_byte(),
        }
    }
}

impl fmt::Debug for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("output", &self.output())
            .field("surface", &self.surface)
            .field("kind", &self.kind())
            .field("range_char", &self.range_char())
            .field("range_byte", &self.range_byte())
            .finish()
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.output())
    }
}

/// [`Segment`]の所有型
///
/// スレッド間で送信したり、入力より長く保持したりする場合に使用します。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SegmentBuf {
    /// 出力文字列
    pub output: String,
    /// 消費した入力の部分文字列
    pub surface: String,
    /// トークンの種類
    pub kind: SegmentKind,
    /// 文字単位の位置範囲
    pub range_char: Range<usize>,
    /// バイト単位の位置範囲
    pub range_byte: Range<usize>,
}
