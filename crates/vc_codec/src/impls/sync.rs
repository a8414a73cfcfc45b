use alloc::sync::Arc;

use crate::proxy::ProxyReference;
use crate::registry::{GetTypeMeta, TypeMeta};

impl<T: ProxyReference> GetTypeMeta for Arc<T> {
    #[inline]
    fn get_type_meta() -> TypeMeta {
        TypeMeta::proxy::<T>()
    }
}
