use core::any::Any;

use super::EncodeDriver;

use crate::CodecError;
use crate::registry::{DeclaredType, TypeTraitProxy};
use crate::wire::WireWriter;

impl EncodeDriver<'_> {
    pub(super) fn encode_proxy(
        &mut self,
        writer: &mut WireWriter,
        ty: DeclaredType,
        ops: &TypeTraitProxy,
        value: &dyn Any,
    ) -> Result<(), CodecError> {
        let object = ops.to_object(value).ok_or(CodecError::TypeMismatch(ty))?;
        let id = self.resolver.identity_for(&object)?;
        log::trace!("proxy `{ty}` encoded as id {id}");
        writer.write_proxy_id(id);
        Ok(())
    }
}
