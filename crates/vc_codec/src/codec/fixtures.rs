//! Values and resolvers shared by the codec tests.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use futures_lite::io::AsyncRead;

use crate::derive::SelfDescribing;
use crate::proxy::ProxyObject;
use crate::registry::TypeRegistry;
use crate::{CancelSignal, DeclaredType, ProxyError, ProxyId, ProxyReference, ResolveProxyIds, Serializer};

/// A value whose normal construction is observable.
#[derive(SelfDescribing, Debug, Clone, PartialEq)]
pub(crate) struct SampleClass {
    pub(crate) number: i32,
    #[codec(rename = "str")]
    pub(crate) text: Option<String>,
    #[codec(skip)]
    pub(crate) created_by_default: bool,
}

impl SampleClass {
    pub(crate) fn new(number: i32, text: Option<&str>) -> Self {
        Self {
            number,
            text: text.map(String::from),
            ..Self::default()
        }
    }
}

impl Default for SampleClass {
    fn default() -> Self {
        Self {
            number: 0,
            text: None,
            created_by_default: true,
        }
    }
}

/// A shared object that crosses the boundary by identity.
#[derive(Debug)]
pub(crate) struct Printer {
    pub(crate) name: String,
}

impl ProxyReference for Printer {}

impl Printer {
    pub(crate) fn shared(name: &str) -> Arc<Printer> {
        Arc::new(Printer { name: name.into() })
    }
}

/// An order mixing scalars, containers, nested objects and proxies.
#[derive(SelfDescribing, Debug, Clone)]
pub(crate) struct Order {
    pub(crate) id: u64,
    #[codec(nested)]
    pub(crate) lines: Vec<String>,
    #[codec(nested)]
    pub(crate) sample: Option<SampleClass>,
    #[codec(nested)]
    pub(crate) printer: Option<Arc<Printer>>,
}

/// Assigns increasing ids per object and keeps every object alive, so an
/// address is never reused within a session.
#[derive(Default)]
pub(crate) struct MockResolver {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    next: u64,
    ids: HashMap<usize, ProxyId>,
    objects: HashMap<ProxyId, ProxyObject>,
}

impl MockResolver {
    pub(crate) fn issued(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .objects
            .len()
    }
}

impl ResolveProxyIds for MockResolver {
    fn identity_for(&self, object: &ProxyObject) -> Result<ProxyId, ProxyError> {
        let key = Arc::as_ptr(object) as *const () as usize;
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(id) = state.ids.get(&key) {
            return Ok(*id);
        }

        state.next += 1;
        let id = ProxyId::new(state.next);
        state.ids.insert(key, id);
        state.objects.insert(id, object.clone());
        Ok(id)
    }

    fn object_for(&self, _ty: DeclaredType, id: ProxyId) -> Result<ProxyObject, ProxyError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .objects
            .get(&id)
            .cloned()
            .ok_or(ProxyError::UnknownIdentity(id))
    }
}

/// A source that raises `signal` on its first read.
pub(crate) struct CancelOnRead<'a> {
    pub(crate) inner: &'a [u8],
    pub(crate) signal: CancelSignal,
}

impl AsyncRead for CancelOnRead<'_> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<std::io::Result<usize>> {
        let this = self.get_mut();
        this.signal.cancel();
        Pin::new(&mut this.inner).poll_read(cx, buf)
    }
}

/// A source that records the largest buffer a read asked to fill.
pub(crate) struct LargestRead<'a> {
    inner: &'a [u8],
    pub(crate) largest: usize,
}

impl<'a> LargestRead<'a> {
    pub(crate) fn new(inner: &'a [u8]) -> Self {
        Self { inner, largest: 0 }
    }
}

impl AsyncRead for LargestRead<'_> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<std::io::Result<usize>> {
        let this = self.get_mut();
        this.largest = this.largest.max(buf.len());
        Pin::new(&mut this.inner).poll_read(cx, buf)
    }
}

/// A serializer with every fixture registered.
pub(crate) fn serializer() -> Serializer {
    let mut registry = TypeRegistry::new();
    registry.register::<SampleClass>();
    registry.register::<Order>();
    registry.register::<Vec<SampleClass>>();
    registry.register::<Vec<Arc<Printer>>>();
    Serializer::new(registry)
}
