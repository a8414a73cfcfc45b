use alloc::boxed::Box;
use core::any::Any;

use futures_lite::io::AsyncRead;

use super::DecodeDriver;

use crate::CodecError;
use crate::object::FieldValue;
use crate::registry::{ScalarKind, TypeTraitScalar};

impl<R: AsyncRead + Unpin + Send> DecodeDriver<'_, R> {
    pub(super) async fn decode_scalar(
        &mut self,
        ops: TypeTraitScalar,
    ) -> Result<Box<dyn Any + Send>, CodecError> {
        let field = self.read_payload(ops.kind()).await?;
        // Kinds always match, so only absent text read as a `String` fails.
        ops.from_field(field)
            .ok_or(CodecError::CorruptStream("absent text where a string is required"))
    }

    /// Reads an untagged scalar of `kind`.
    pub(super) async fn read_payload(&mut self, kind: ScalarKind) -> Result<FieldValue, CodecError> {
        let reader = &mut self.reader;
        Ok(match kind {
            ScalarKind::Bool => FieldValue::Bool(reader.read_bool().await?),
            ScalarKind::I8 => FieldValue::I8(reader.read_i8().await?),
            ScalarKind::I16 => FieldValue::I16(reader.read_i16().await?),
            ScalarKind::I32 => FieldValue::I32(reader.read_i32().await?),
            ScalarKind::I64 => FieldValue::I64(reader.read_i64().await?),
            ScalarKind::U8 => FieldValue::U8(reader.read_u8().await?),
            ScalarKind::U16 => FieldValue::U16(reader.read_u16().await?),
            ScalarKind::U32 => FieldValue::U32(reader.read_u32().await?),
            ScalarKind::U64 => FieldValue::U64(reader.read_u64().await?),
            ScalarKind::F32 => FieldValue::F32(reader.read_f32().await?),
            ScalarKind::F64 => FieldValue::F64(reader.read_f64().await?),
            ScalarKind::Char => FieldValue::Char(reader.read_char().await?),
            ScalarKind::String | ScalarKind::OptionString => {
                FieldValue::Text(reader.read_text(self.config.text_limit()).await?)
            }
        })
    }
}
