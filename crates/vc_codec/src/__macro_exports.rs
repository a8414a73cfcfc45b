//! Items referenced by code generated from `vc_codec_derive`.
//!
//! Not part of the public API.

// -----------------------------------------------------------------------------
// auto_register

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};

    /// A registration function submitted by `#[codec(auto_register)]`.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    /// Bridges a derived type to [`TypeRegistry::register`].
    pub trait __RegisterType {
        fn __register(registry: &mut TypeRegistry);
    }

    impl<T: GetTypeMeta> __RegisterType for T {
        #[inline]
        fn __register(registry: &mut TypeRegistry) {
            registry.register::<T>();
        }
    }

    /// Registered by this crate's own submission, so its presence in a
    /// registry proves `inventory` works on the current platform.
    pub struct __AvailFlag;

    fn register_avail_flag(registry: &mut TypeRegistry) {
        registry.try_insert_type_meta(TypeMeta::of::<__AvailFlag>());
    }

    inventory::submit! {
        __AutoRegisterFunc(register_avail_flag)
    }

    pub fn __register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}
