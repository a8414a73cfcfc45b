use alloc::boxed::Box;
use core::any::Any;

use futures_lite::io::AsyncRead;

use super::DecodeDriver;

use crate::registry::TypeTraitProxy;
use crate::{CodecError, ProxyError};

impl<R: AsyncRead + Unpin + Send> DecodeDriver<'_, R> {
    pub(super) async fn decode_proxy(
        &mut self,
        ops: TypeTraitProxy,
    ) -> Result<Box<dyn Any + Send>, CodecError> {
        let id = self.reader.read_proxy_id().await?;
        let target = ops.target();

        log::trace!("resolving proxy id {id} as `{target}`");
        let object = self.resolver.object_for(target, id)?;

        ops.from_object(object).ok_or(CodecError::ProxyResolution(
            ProxyError::TypeMismatch {
                id,
                expected: target,
            },
        ))
    }
}

// -----------------------------------------------------------------------------
// Tests
