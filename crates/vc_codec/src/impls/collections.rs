use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::any::Any;

use crate::registry::{Container, GetTypeMeta, TypeMeta, TypeRegistry};

// -----------------------------------------------------------------------------
// Vec

impl<T: Any + Send> Container for Vec<T> {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn item(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    #[inline]
    fn with_capacity(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }

    #[inline]
    fn push_item(&mut self, item: T) {
        self.push(item);
    }
}

impl<T: GetTypeMeta + Send> GetTypeMeta for Vec<T> {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::container::<Self>()
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

// -----------------------------------------------------------------------------
// VecDeque

impl<T: Any + Send> Container for VecDeque<T> {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    #[inline]
    fn item(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    #[inline]
    fn with_capacity(capacity: usize) -> Self {
        VecDeque::with_capacity(capacity)
    }

    #[inline]
    fn push_item(&mut self, item: T) {
        self.push_back(item);
    }
}

impl<T: GetTypeMeta + Send> GetTypeMeta for VecDeque<T> {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::container::<Self>()
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

// -----------------------------------------------------------------------------
// Tests
