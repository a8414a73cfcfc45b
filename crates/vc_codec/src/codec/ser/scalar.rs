use core::any::Any;

use crate::CodecError;
use crate::object::FieldValue;
use crate::registry::{DeclaredType, TypeTraitScalar};
use crate::wire::WireWriter;

pub(super) fn encode_scalar(
    writer: &mut WireWriter,
    ty: DeclaredType,
    ops: &TypeTraitScalar,
    value: &dyn Any,
) -> Result<(), CodecError> {
    let field = ops.to_field(value).ok_or(CodecError::TypeMismatch(ty))?;
    write_payload(writer, &field)
}

/// Writes a scalar field value without its tag.
pub(super) fn write_payload(writer: &mut WireWriter, field: &FieldValue) -> Result<(), CodecError> {
    match field {
        FieldValue::Bool(v) => writer.write_bool(*v),
        FieldValue::I8(v) => writer.write_i8(*v),
        FieldValue::I16(v) => writer.write_i16(*v),
        FieldValue::I32(v) => writer.write_i32(*v),
        FieldValue::I64(v) => writer.write_i64(*v),
        FieldValue::U8(v) => writer.write_u8(*v),
        FieldValue::U16(v) => writer.write_u16(*v),
        FieldValue::U32(v) => writer.write_u32(*v),
        FieldValue::U64(v) => writer.write_u64(*v),
        FieldValue::F32(v) => writer.write_f32(*v),
        FieldValue::F64(v) => writer.write_f64(*v),
        FieldValue::Char(v) => writer.write_char(*v),
        FieldValue::Text(v) => writer.write_text(v.as_deref())?,
        FieldValue::Nested(nested) => return Err(CodecError::TypeMismatch(nested.ty())),
    }
    Ok(())
}
