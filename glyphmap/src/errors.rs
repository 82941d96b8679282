//! エラー型の定義
//!
//! このモジュールは、glyphmapライブラリで使用されるすべてのエラー型を定義します。
//! テーブル読み込み時のエラーは、問題のある行番号とフィールドを必ず含みます。

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// glyphmap専用のResult型
///
/// エラー型としてデフォルトで[`GlyphMapError`]を使用します。
pub type Result<T, E = GlyphMapError> = std::result::Result<T, E>;

/// レコード内のフィールドの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// 1番目のフィールド（グリフ列）
    Key,
    /// 2番目のフィールド（出力タグ）
    Value,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Key => f.write_str("key"),
            Self::Value => f.write_str("value"),
        }
    }
}

/// glyphmapのエラー型
///
/// このライブラリで発生する可能性のあるすべてのエラーを表現します。
/// セグメンテーション処理自体はエラーを返さないため、ここに含まれるのは
/// テーブルの構築・読み込みに関するエラーのみです。
#[derive(Debug, thiserror::Error)]
pub enum GlyphMapError {
    /// 標準I/Oエラー
    ///
    /// ファイルが存在しない、または読み込めない場合に発生します。
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// ディレクトリが指定されたエラー
    ///
    /// ファイルが期待される場所にディレクトリが指定された場合に発生します。
    #[error("The path '{0}' is a directory, but a file was expected.")]
    PathIsDirectory(PathBuf),

    /// 不正なレコード
    ///
    /// 区切り文字が1つでない行、空のフィールドを持つ行、
    /// UTF-8として不正な行などで発生します。
    #[error("line {line}: malformed record: {reason}")]
    MalformedRecord {
        /// 1始まりの行番号
        line: usize,
        /// 理由
        reason: String,
    },

    /// フィールド長の上限超過
    #[error("line {line}: {field} is {len} chars long, exceeding the limit of {max}")]
    FieldTooLong {
        /// 1始まりの行番号
        line: usize,
        /// 上限を超えたフィールド
        field: Field,
        /// フィールドの文字数
        len: usize,
        /// 文字数の上限
        max: usize,
    },

    /// キーの重複
    #[error("line {line}: duplicate key {key:?} (first defined on line {first_line})")]
    DuplicateKey {
        /// 重複したキー
        key: String,
        /// 最初に定義された行
        first_line: usize,
        /// 重複が見つかった行
        line: usize,
    },

    /// ソート順序の破損
    ///
    /// コンパイル済みテーブルのエントリがキーの昇順に並んでいない場合に発生します。
    #[error("entry {index} is not in ascending key order")]
    UnsortedTable {
        /// 順序が崩れている最初のエントリの位置
        index: usize,
    },

    /// 無効な引数エラー
    ///
    /// [`InvalidArgumentError`]のエラーバリアント。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 無効なフォーマットエラー
    ///
    /// [`InvalidFormatError`]のエラーバリアント。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 無効な状態エラー
    ///
    /// [`InvalidStateError`]のエラーバリアント。
    #[error(transparent)]
    InvalidState(InvalidStateError),
}

impl GlyphMapError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - フォーマット名
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効な状態エラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    /// * `cause` - エラーの原因
    pub(crate) fn invalid_state<S, M>(msg: S, cause: M) -> Self
    where
        S: Into<String>,
        M: Into<String>,
    {
        Self::InvalidState(InvalidStateError {
            msg: msg.into(),
            cause: cause.into(),
        })
    }

    pub(crate) fn malformed<S>(line: usize, reason: S) -> Self
    where
        S: Into<String>,
    {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// エラーの原因となった行番号を返します。
    ///
    /// 行に紐付かないエラーの場合は`None`を返します。
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedRecord { line, .. }
            | Self::FieldTooLong { line, .. }
            | Self::DuplicateKey { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// 入力フォーマットが無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidFormatError {
    /// フォーマットの名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// 状態が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidStateError {
    /// エラーメッセージ
    pub(crate) msg: String,

    /// エラーの根本原因
    pub(crate) cause: String,
}

impl fmt::Display for InvalidStateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidStateError: {}: {}", self.msg, self.cause)
    }
}

impl Error for InvalidStateError {}
