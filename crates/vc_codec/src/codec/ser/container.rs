use core::any::Any;

use super::EncodeDriver;

use crate::CodecError;
use crate::registry::{DeclaredType, TypeTraitContainer};
use crate::strategy::EncodingStrategy;
use crate::wire::WireWriter;

impl EncodeDriver<'_> {
    pub(super) fn encode_container(
        &mut self,
        writer: &mut WireWriter,
        ty: DeclaredType,
        element: DeclaredType,
        element_strategy: &EncodingStrategy,
        ops: &TypeTraitContainer,
        value: &dyn Any,
    ) -> Result<(), CodecError> {
        let len = ops.len(value).ok_or(CodecError::TypeMismatch(ty))?;
        writer.write_len(len)?;

        self.nested(|this| {
            for index in 0..len {
                let item = ops.item(value, index).ok_or(CodecError::TypeMismatch(ty))?;
                this.encode_with(writer, element, element_strategy, item)?;
            }
            Ok(())
        })
    }
}
