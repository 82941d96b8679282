//! # glyphmap
//!
//! glyphmapは、グリフ列から出力タグ（ISCIIなど）への対応表を用いて、
//! 入力文字列を最長一致で分割・変換するライブラリです。
//!
//! ## 概要
//!
//! 処理は一方向に流れます: ファイル → テーブル → 分割 → 出力列
//!
//! - **テーブルの読み込み**: 1行1レコード、区切り文字で2フィールドに分けた
//!   テキストファイルを読み込み、キーの昇順に整列した不変のテーブルを構築します
//! - **最長一致分割**: 入力の先頭から最長のキーを貪欲に切り出し、対応する値を出力します。
//!   一致しない文字はそのまま出力されるため、入力が失われることはありません
//! - **コンパイル済みテーブル**: rkyvによる検証付きのバイナリ形式での読み書き
//!
//! 長さはすべて文字（Unicodeスカラー値）単位で数えます。
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use glyphmap::{segment, TableLoader};
//!
//! let table = TableLoader::new(':')?.load_text("ka:\u{0915}\nkha:\u{0916}\nk:\u{0958}\n")?;
//!
//! let outputs: Vec<_> = segment(&table, "kakha").outputs().collect();
//! assert_eq!(outputs, ["\u{0915}", "\u{0916}"]);
//!
//! let segs: Vec<_> = segment(&table, "kx").collect();
//! assert_eq!(segs[0].output(), "\u{0958}");
//! assert_eq!(segs[1].output(), "x");
//! assert_eq!(segs[1].range_char(), 1..2);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

/// エラー型の定義
pub mod errors;

/// 最長一致セグメンター
pub mod segmenter;

/// マッピングテーブルとその読み込み
pub mod table;

/// トークン型の定義
pub mod token;

/// 内部ユーティリティ関数
pub mod utils;


use std::path::Path;

// Re-exports
pub use errors::GlyphMapError;
pub use segmenter::worker::Worker;
pub use segmenter::{Segmenter, Segments, segment, transliterate};
pub use table::{MappingEntry, MappingTable, TableLoader};
pub use token::{Segment, SegmentBuf, SegmentKind};

/// マッピングファイルを読み込みます。
///
/// `TableLoader::new(delimiter)?.load(path)`の短縮形です。
/// フィールド長の上限は[`table::DEFAULT_MAX_FIELD_LEN`]です。
///
/// # 引数
///
/// * `path` - マッピングファイルへのパス
/// * `delimiter` - フィールドの区切り文字
///
/// # エラー
///
/// [`TableLoader::new`]および[`TableLoader::load`]と同じエラーを返します。
pub fn load_table<P>(path: P, delimiter: char) -> errors::Result<MappingTable>
where
    P: AsRef<Path>,
{
    TableLoader::new(delimiter)?.load(path)
}

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
