//! コンパイル済みテーブルのバイナリ形式
//!
//! マジックバイト、16バイト境界までのパディング、エントリ列のrkyvアーカイブの
//! 順に並びます。読み込み時はrkyvの検証に加えて、テーブルの不変条件を
//! 再検査します。

use std::io::{Read, Write};

use rkyv::rancor::Error;
use rkyv::util::AlignedVec;
use rkyv::{
    api::serialize_using, ser::allocator::Arena, ser::sharing::Share, ser::writer::IoWriter,
    ser::Serializer, util::with_arena,
};

use crate::errors::{GlyphMapError, Result};
use crate::table::{MappingEntry, MappingTable};

/// コンパイル済みテーブルを識別するマジックバイト。
///
/// "0.1"はファイル形式のバージョンで、クレートのバージョンとは独立しています。
pub const TABLE_MAGIC: &[u8] = b"GlyphMapTableRkyv 0.1\n";

const TABLE_MAGIC_LEN: usize = TABLE_MAGIC.len();
const RKYV_ALIGNMENT: usize = 16;
const PADDING_LEN: usize = (RKYV_ALIGNMENT - (TABLE_MAGIC_LEN % RKYV_ALIGNMENT)) % RKYV_ALIGNMENT;

impl MappingTable {
    /// テーブルをコンパイル済みのバイナリ形式で書き出します。
    ///
    /// # 例
    ///
    /// ```
    /// use glyphmap::MappingTable;
    ///
    /// let table = MappingTable::from_entries([("ka", "क")])?;
    ///
    /// let mut buf = vec![];
    /// table.write_compiled(&mut buf)?;
    ///
    /// let restored = MappingTable::read_compiled(buf.as_slice())?;
    /// assert_eq!(table, restored);
    /// # Ok::<(), glyphmap::errors::GlyphMapError>(())
    /// ```
    ///
    /// # エラー
    ///
    /// 書き込みに失敗した場合、またはrkyvの直列化に失敗した場合にエラーを返します。
    pub fn write_compiled<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        wtr.write_all(TABLE_MAGIC)?;

        let padding_bytes = [0xFF; PADDING_LEN];
        wtr.write_all(&padding_bytes)?;

        with_arena(|arena: &mut Arena| {
            let writer = IoWriter::new(&mut wtr);
            let mut serializer = Serializer::new(writer, arena.acquire(), Share::new());
            serialize_using::<_, Error>(&self.entries, &mut serializer)
        })
        .map_err(|e| GlyphMapError::invalid_state("rkyv serialization failed", e.to_string()))?;

        Ok(())
    }

    /// コンパイル済みのバイナリ形式からテーブルを読み込みます。
    ///
    /// # エラー
    ///
    /// - マジックバイトが一致しない場合は[`GlyphMapError::InvalidFormat`]
    /// - アーカイブが破損している場合は[`GlyphMapError::InvalidState`]
    /// - エントリが昇順でない、またはキーが重複している場合は
    ///   [`GlyphMapError::UnsortedTable`]
    pub fn read_compiled<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut magic = [0; TABLE_MAGIC_LEN];
        rdr.read_exact(&mut magic)?;
        if magic.as_slice() != TABLE_MAGIC {
            return Err(GlyphMapError::invalid_format(
                "rdr",
                "The magic number of the input table mismatches.",
            ));
        }

        let mut padding_buf = [0; PADDING_LEN];
        rdr.read_exact(&mut padding_buf)?;

        let mut buffer = vec![];
        rdr.read_to_end(&mut buffer)?;

        let mut aligned_bytes = AlignedVec::<RKYV_ALIGNMENT>::with_capacity(buffer.len());
        aligned_bytes.extend_from_slice(&buffer);

        let entries = rkyv::from_bytes::<Vec<MappingEntry>, Error>(&aligned_bytes).map_err(|e| {
            GlyphMapError::invalid_state(
                "rkyv validation failed. The table file may be corrupted or incompatible.",
                e.to_string(),
            )
        })?;

        let table = Self::from_sorted(entries)?;
        log::debug!(
            "[glyphmap] Read a compiled table with {} entries",
            table.len()
        );
        Ok(table)
    }
}
