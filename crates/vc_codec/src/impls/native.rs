use alloc::string::String;

use crate::registry::{GetTypeMeta, TypeMeta};

macro_rules! impl_scalar_type_meta {
    ($($ty:ty),* $(,)?) => {
        $(
            impl GetTypeMeta for $ty {
                #[inline]
                fn get_type_meta() -> TypeMeta {
                    TypeMeta::scalar::<Self>()
                }
            }
        )*
    };
}

impl_scalar_type_meta! {
    bool, char,
    i8, i16, i32, i64,
    u8, u16, u32, u64,
    f32, f64,
    String, Option<String>,
}
