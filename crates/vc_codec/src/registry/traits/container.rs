use alloc::boxed::Box;
use core::any::Any;

use crate::registry::{DeclaredType, FromType};

// -----------------------------------------------------------------------------
// Container

/// An ordered, homogeneous, growable sequence.
///
/// Implemented for [`Vec`](alloc::vec::Vec) and
/// [`VecDeque`](alloc::collections::VecDeque). Decoding builds a fresh
/// container of the same concrete kind and appends elements in wire order.
pub trait Container: Any + Send + Sized {
    type Item: Any + Send;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn item(&self, index: usize) -> Option<&Self::Item>;

    fn with_capacity(capacity: usize) -> Self;

    fn push_item(&mut self, item: Self::Item);
}

// -----------------------------------------------------------------------------
// TypeTraitContainer

/// Type-erased access to a [`Container`] implementation.
#[derive(Clone, Copy)]
pub struct TypeTraitContainer {
    element: fn() -> DeclaredType,
    len: fn(&dyn Any) -> Option<usize>,
    item: fn(&dyn Any, usize) -> Option<&dyn Any>,
    with_capacity: fn(usize) -> Box<dyn Any + Send>,
    push: fn(&mut dyn Any, Box<dyn Any + Send>) -> bool,
}

impl TypeTraitContainer {
    /// Returns the declared type of the elements.
    #[inline]
    pub fn element(&self) -> DeclaredType {
        (self.element)()
    }

    /// Returns the number of elements.
    ///
    /// Returns `None` if `container` is not of the registered type.
    #[inline]
    pub fn len(&self, container: &dyn Any) -> Option<usize> {
        (self.len)(container)
    }

    /// Returns the element at `index`.
    #[inline]
    pub fn item<'a>(&self, container: &'a dyn Any, index: usize) -> Option<&'a dyn Any> {
        (self.item)(container, index)
    }

    /// Creates an empty container with room for `capacity` elements.
    #[inline]
    pub fn with_capacity(&self, capacity: usize) -> Box<dyn Any + Send> {
        (self.with_capacity)(capacity)
    }

    /// Appends `item`.
    ///
    /// Returns `false`, leaving `container` unchanged, if either argument is
    /// not of the expected type.
    #[inline]
    pub fn push(&self, container: &mut dyn Any, item: Box<dyn Any + Send>) -> bool {
        (self.push)(container, item)
    }
}

impl<C: Container> FromType<C> for TypeTraitContainer {
    fn from_type() -> Self {
        Self {
            element: DeclaredType::of::<C::Item>,
            len: |container| container.downcast_ref::<C>().map(C::len),
            item: item_of::<C>,
            with_capacity: |capacity| Box::new(C::with_capacity(capacity)),
            push: |container, item| {
                let Some(container) = container.downcast_mut::<C>() else {
                    return false;
                };
                match item.downcast::<C::Item>() {
                    Ok(item) => {
                        container.push_item(*item);
                        true
                    }
                    Err(_) => false,
                }
            },
        }
    }
}

fn item_of<C: Container>(container: &dyn Any, index: usize) -> Option<&dyn Any> {
    match container.downcast_ref::<C>() {
        Some(container) => container.item(index).map(|item| item as &dyn Any),
        None => None,
    }
}
