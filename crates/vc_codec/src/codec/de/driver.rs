use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::pin::Pin;

use futures_lite::io::AsyncRead;

use crate::proxy::ResolveProxyIds;
use crate::registry::DeclaredType;
use crate::strategy::{EncodingStrategy, StrategyDispatcher};
use crate::wire::WireReader;
use crate::{CancelSignal, CodecConfig, CodecError};

// -----------------------------------------------------------------------------
// BoxedDecode

/// A boxed, `Send` decoding future.
///
/// Nested values decode through this type so the recursion has a fixed size.
pub type BoxedDecode<'a> =
    Pin<Box<dyn Future<Output = Result<Box<dyn Any + Send>, CodecError>> + Send + 'a>>;

// -----------------------------------------------------------------------------
// DecodeDriver

/// Decodes values of declared types from an asynchronous byte source.
///
/// A driver belongs to one call. The only state it keeps is the reader and
/// the current nesting depth.
///
/// # Examples
///
/// ```
/// use futures_lite::future::block_on;
/// use vc_codec::{CancelSignal, CodecConfig};
/// use vc_codec::codec::DecodeDriver;
/// use vc_codec::proxy::NoProxyResolver;
/// use vc_codec::registry::{DeclaredType, TypeRegistry, TypeRegistryArc};
/// use vc_codec::strategy::StrategyDispatcher;
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Vec<u16>>();
/// let dispatcher = StrategyDispatcher::new(TypeRegistryArc::new(registry));
/// let config = CodecConfig::new();
/// let cancel = CancelSignal::never();
///
/// let bytes: &[u8] = &[2, 0, 0, 0, 1, 0, 2, 0];
/// let mut driver = DecodeDriver::new(bytes, &dispatcher, &NoProxyResolver, &config, &cancel);
///
/// let value = block_on(driver.decode(DeclaredType::of::<Vec<u16>>())).unwrap();
/// assert_eq!(*value.downcast::<Vec<u16>>().unwrap(), [1, 2]);
/// ```
pub struct DecodeDriver<'a, R> {
    pub(super) reader: WireReader<R>,
    pub(super) dispatcher: &'a StrategyDispatcher,
    pub(super) resolver: &'a dyn ResolveProxyIds,
    pub(super) config: &'a CodecConfig,
    pub(super) cancel: &'a CancelSignal,
    depth: usize,
}

impl<'a, R: AsyncRead + Unpin + Send> DecodeDriver<'a, R> {
    #[inline]
    pub fn new(
        source: R,
        dispatcher: &'a StrategyDispatcher,
        resolver: &'a dyn ResolveProxyIds,
        config: &'a CodecConfig,
        cancel: &'a CancelSignal,
    ) -> Self {
        Self {
            reader: WireReader::new(source),
            dispatcher,
            resolver,
            config,
            cancel,
            depth: 0,
        }
    }

    /// Returns the underlying source.
    #[inline]
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Decodes one value of `ty`.
    ///
    /// Fails with [`CodecError::UnsupportedType`] before reading anything if
    /// `ty` has no strategy, and with [`CodecError::Cancelled`] if the signal
    /// is already set.
    pub async fn decode(&mut self, ty: DeclaredType) -> Result<Box<dyn Any + Send>, CodecError> {
        self.cancel.check()?;
        let strategy = self.dispatcher.strategy_for(ty);
        if !strategy.is_supported() {
            return Err(CodecError::UnsupportedType(ty));
        }
        self.decode_with(ty, strategy).await
    }

    pub(super) fn decode_with(
        &mut self,
        ty: DeclaredType,
        strategy: Arc<EncodingStrategy>,
    ) -> BoxedDecode<'_> {
        Box::pin(async move {
            if self.depth > self.config.depth_limit() {
                return Err(CodecError::CorruptStream("value nests deeper than the configured limit"));
            }

            match &*strategy {
                EncodingStrategy::Scalar(ops) => self.decode_scalar(*ops).await,
                EncodingStrategy::SelfDescribing(ops) => self.decode_object(ty, *ops).await,
                EncodingStrategy::Container {
                    element,
                    element_strategy,
                    ops,
                } => {
                    self.decode_container(*element, element_strategy.clone(), *ops)
                        .await
                }
                EncodingStrategy::ProxyReference(ops) => self.decode_proxy(*ops).await,
                EncodingStrategy::Unsupported => Err(CodecError::UnsupportedType(ty)),
            }
        })
    }

    /// Decodes a child value one nesting level deeper.
    pub(super) async fn decode_nested(
        &mut self,
        ty: DeclaredType,
        strategy: Arc<EncodingStrategy>,
    ) -> Result<Box<dyn Any + Send>, CodecError> {
        self.depth += 1;
        let result = self.decode_with(ty, strategy).await;
        self.depth -= 1;
        result
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use futures_lite::future::block_on;

    use crate::codec::fixtures::{CancelOnRead, LargestRead, SampleClass, serializer};
    use crate::proxy::NoProxyResolver;
    use crate::registry::TypeRegistry;
    use crate::wire::{PREALLOC_LIMIT, WireWriter, tag};
    use crate::{CancelSignal, CodecConfig, CodecError, DeclaredType, FieldBag, SelfDescribing};
    use crate::{Serializer, StateError};

    fn decode_error<T: core::any::Any>(serializer: &Serializer, bytes: &[u8]) -> CodecError {
        match serializer.from_bytes::<T>(bytes, &NoProxyResolver) {
            Ok(_) => panic!("decoding `{}` should fail", core::any::type_name::<T>()),
            Err(err) => err,
        }
    }

    // -----------------------------------------------------------------------------
    // Unsupported types

    struct Unregistered;

    #[test]
    fn unsupported_type_writes_nothing() {
        let serializer = serializer();
        let mut sink = Vec::new();

        let err = block_on(serializer.serialize_value(&mut sink, &Unregistered, &NoProxyResolver))
            .unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedType(ty) if ty.is::<Unregistered>()));
        assert!(sink.is_empty());
    }

    #[test]
    fn unsupported_type_reads_nothing() {
        let serializer = serializer();
        let bytes = [1_u8, 2, 3, 4];
        let mut source: &[u8] = &bytes;

        let err = block_on(serializer.deserialize(
            &mut source,
            DeclaredType::of::<Unregistered>(),
            &NoProxyResolver,
            &CancelSignal::never(),
        ))
        .unwrap_err();

        assert!(matches!(err, CodecError::UnsupportedType(_)));
        assert_eq!(source.len(), bytes.len());
    }

    #[test]
    fn unsupported_field_fails_the_whole_encode() {
        // `u128` is not a wire scalar and `Vec<u128>` is never registered.
        struct Holder {
            inner: Vec<u128>,
        }

        impl SelfDescribing for Holder {
            fn export_state(&self) -> Result<FieldBag, StateError> {
                let mut bag = FieldBag::new();
                bag.add_nested("inner", &self.inner)?;
                Ok(bag)
            }

            fn from_state(mut bag: FieldBag) -> Result<Self, StateError> {
                Ok(Holder {
                    inner: bag.take_nested("inner")?,
                })
            }

            fn nested_field_type(name: &str) -> Option<DeclaredType> {
                (name == "inner").then(DeclaredType::of::<Vec<u128>>)
            }
        }

        let serializer = serializer();
        serializer.register_with(TypeRegistry::register_self_describing::<Holder>);

        let mut sink = Vec::new();
        let value = Holder { inner: vec![1] };
        let err = block_on(serializer.serialize_value(&mut sink, &value, &NoProxyResolver)).unwrap_err();

        assert!(matches!(err, CodecError::UnsupportedType(ty) if ty.is::<Vec<u128>>()));
        assert!(sink.is_empty());
    }

    #[test]
    fn value_of_another_type() {
        let serializer = serializer();
        let err = serializer
            .encode(DeclaredType::of::<SampleClass>(), &5_i32, &NoProxyResolver)
            .unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch(ty) if ty.is::<SampleClass>()));
    }

    // -----------------------------------------------------------------------------
    // Corrupt streams

    #[test]
    fn every_truncation_is_corrupt() {
        let serializer = serializer();
        let bytes = serializer
            .to_bytes(&SampleClass::new(i32::MAX, Some("Hello World")), &NoProxyResolver)
            .unwrap();

        for len in 0..bytes.len() {
            let err = decode_error::<SampleClass>(&serializer, &bytes[..len]);
            assert!(err.is_corrupt(), "prefix of {len} bytes gave {err:?}");
        }
    }

    #[test]
    fn trailing_bytes_are_corrupt() {
        let serializer = serializer();
        serializer.register::<Vec<i32>>();

        let mut bytes = serializer.to_bytes(&vec![1_i32], &NoProxyResolver).unwrap();
        bytes.push(0);
        assert!(decode_error::<Vec<i32>>(&serializer, &bytes).is_corrupt());
    }

    #[test]
    fn negative_length_is_corrupt() {
        let serializer = serializer();
        serializer.register::<Vec<i32>>();
        assert!(decode_error::<Vec<i32>>(&serializer, &[0xFF; 4]).is_corrupt());
    }

    #[test]
    fn invalid_bytes_are_corrupt() {
        let serializer = serializer();
        serializer.register_with(|registry| {
            registry.register::<Vec<bool>>();
            registry.register::<Vec<char>>();
            registry.register::<Vec<Option<String>>>();
            registry.register::<Vec<String>>();
        });

        // bool other than 0 or 1
        assert!(decode_error::<Vec<bool>>(&serializer, &[1, 0, 0, 0, 2]).is_corrupt());
        // surrogate code point as a char
        assert!(decode_error::<Vec<char>>(&serializer, &[1, 0, 0, 0, 0x00, 0xD8, 0, 0]).is_corrupt());
        // presence flag other than 0 or 1
        assert!(decode_error::<Vec<Option<String>>>(&serializer, &[1, 0, 0, 0, 7]).is_corrupt());
        // absent text where text is required
        assert!(decode_error::<Vec<String>>(&serializer, &[1, 0, 0, 0, 0]).is_corrupt());
        // unpaired surrogate
        assert!(
            decode_error::<Vec<String>>(&serializer, &[1, 0, 0, 0, 1, 1, 0, 0, 0, 0x00, 0xDC])
                .is_corrupt()
        );
    }

    #[test]
    fn bad_field_bags_are_corrupt() {
        let serializer = serializer();

        let mut unknown_tag = WireWriter::new();
        unknown_tag.write_len(1).unwrap();
        unknown_tag.write_text(Some("number")).unwrap();
        unknown_tag.write_u8(0x7F);
        assert!(decode_error::<SampleClass>(&serializer, unknown_tag.as_bytes()).is_corrupt());

        let mut duplicate = WireWriter::new();
        duplicate.write_len(2).unwrap();
        for _ in 0..2 {
            duplicate.write_text(Some("number")).unwrap();
            duplicate.write_u8(tag::I32);
            duplicate.write_i32(1);
        }
        assert!(decode_error::<SampleClass>(&serializer, duplicate.as_bytes()).is_corrupt());

        let mut absent_name = WireWriter::new();
        absent_name.write_len(1).unwrap();
        absent_name.write_text(None).unwrap();
        assert!(decode_error::<SampleClass>(&serializer, absent_name.as_bytes()).is_corrupt());

        // `SampleClass` declares no nested field.
        let mut undeclared_nested = WireWriter::new();
        undeclared_nested.write_len(1).unwrap();
        undeclared_nested.write_text(Some("number")).unwrap();
        undeclared_nested.write_u8(tag::NESTED);
        assert!(decode_error::<SampleClass>(&serializer, undeclared_nested.as_bytes()).is_corrupt());
    }

    // -----------------------------------------------------------------------------
    // State errors

    #[test]
    fn missing_field_is_a_state_error() {
        let serializer = serializer();
        let err = decode_error::<SampleClass>(&serializer, &[0, 0, 0, 0]);

        match err {
            CodecError::State { ty, source } => {
                assert!(ty.is::<SampleClass>());
                assert_eq!(source, StateError::MissingField("number".into()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn mistyped_field_is_a_state_error() {
        let serializer = serializer();

        let mut bytes = WireWriter::new();
        bytes.write_len(2).unwrap();
        bytes.write_text(Some("number")).unwrap();
        bytes.write_u8(tag::I64);
        bytes.write_i64(1);
        bytes.write_text(Some("str")).unwrap();
        bytes.write_u8(tag::TEXT);
        bytes.write_text(None).unwrap();

        let err = decode_error::<SampleClass>(&serializer, bytes.as_bytes());
        assert!(matches!(
            err,
            CodecError::State {
                source: StateError::FieldTypeMismatch { .. },
                ..
            }
        ));
    }

    // -----------------------------------------------------------------------------
    // Limits

    #[test]
    fn lengths_past_the_limits_are_corrupt() {
        let config = CodecConfig::new()
            .max_container_len(2)
            .max_text_len(4)
            .max_field_count(1);
        let serializer = Serializer::with_config(TypeRegistry::new(), config);
        serializer.register_with(|registry| {
            registry.register::<Vec<u8>>();
            registry.register::<Vec<String>>();
            registry.register::<SampleClass>();
        });

        assert!(decode_error::<Vec<u8>>(&serializer, &[3, 0, 0, 0, 1, 2, 3]).is_corrupt());
        assert!(decode_error::<Vec<String>>(&serializer, &[1, 0, 0, 0, 1, 5, 0, 0, 0]).is_corrupt());
        assert!(decode_error::<SampleClass>(&serializer, &[2, 0, 0, 0]).is_corrupt());

        // At the limit is fine.
        let back: Vec<u8> = serializer.from_bytes(&[2, 0, 0, 0, 1, 2], &NoProxyResolver).unwrap();
        assert_eq!(back, [1, 2]);
    }

    #[test]
    fn huge_declared_length_does_not_preallocate() {
        let serializer = serializer();
        serializer.register::<Vec<u64>>();

        // Claims 16M elements, carries one.
        let mut bytes = WireWriter::new();
        bytes.write_len(16 * 1024 * 1024).unwrap();
        bytes.write_u64(1);
        assert!(decode_error::<Vec<u64>>(&serializer, bytes.as_bytes()).is_corrupt());
    }

    #[test]
    fn huge_declared_text_length_does_not_preallocate() {
        let serializer = serializer();
        serializer.register::<Vec<String>>();

        // One present string claiming 16M code units, carrying none.
        let mut bytes = WireWriter::new();
        bytes.write_len(1).unwrap();
        bytes.write_u8(1);
        bytes.write_len(16 * 1024 * 1024).unwrap();
        let bytes = bytes.into_inner();

        let mut source = LargestRead::new(&bytes);
        let cancel = CancelSignal::never();
        let result = block_on(serializer.deserialize_value::<Vec<String>, _>(
            &mut source,
            &NoProxyResolver,
            &cancel,
        ));

        assert!(result.unwrap_err().is_corrupt());
        assert!(source.largest <= 2 * PREALLOC_LIMIT);
    }

    #[test]
    fn depth_limit() {
        let config = CodecConfig::new().max_depth(1);
        let serializer = Serializer::with_config(TypeRegistry::new(), config);
        serializer.register::<Vec<Vec<Vec<u8>>>>();

        // Empty inner containers never reach depth 2.
        let shallow = vec![Vec::<Vec<u8>>::new()];
        let bytes = serializer.to_bytes(&shallow, &NoProxyResolver).unwrap();
        assert_eq!(bytes, [1, 0, 0, 0, 0, 0, 0, 0]);

        let deep = vec![vec![vec![1_u8]]];
        let err = serializer.to_bytes(&deep, &NoProxyResolver).unwrap_err();
        assert!(matches!(err, CodecError::DepthExceeded(1)));

        let unlimited = Serializer::new(TypeRegistry::new());
        unlimited.register::<Vec<Vec<Vec<u8>>>>();
        let bytes = unlimited.to_bytes(&deep, &NoProxyResolver).unwrap();
        assert!(decode_error::<Vec<Vec<Vec<u8>>>>(&serializer, &bytes).is_corrupt());
    }

    // -----------------------------------------------------------------------------
    // Cancellation

    #[test]
    fn cancelled_before_start() {
        let serializer = serializer();
        let bytes = serializer
            .to_bytes(&SampleClass::new(1, None), &NoProxyResolver)
            .unwrap();

        let cancel = CancelSignal::new();
        cancel.cancel();

        let err = block_on(serializer.deserialize(
            bytes.as_slice(),
            DeclaredType::of::<SampleClass>(),
            &NoProxyResolver,
            &cancel,
        ))
        .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn cancelled_mid_decode() {
        let serializer = serializer();
        serializer.register::<Vec<i32>>();
        let bytes = serializer.to_bytes(&vec![1_i32, 2, 3], &NoProxyResolver).unwrap();

        let cancel = CancelSignal::new();
        let source = CancelOnRead {
            inner: &bytes,
            signal: cancel.clone(),
        };

        let err = block_on(serializer.deserialize(
            source,
            DeclaredType::of::<Vec<i32>>(),
            &NoProxyResolver,
            &cancel,
        ))
        .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn cancelled_between_fields() {
        let serializer = serializer();
        let bytes = serializer
            .to_bytes(&SampleClass::new(1, None), &NoProxyResolver)
            .unwrap();

        let cancel = CancelSignal::new();
        let source = CancelOnRead {
            inner: &bytes,
            signal: cancel.clone(),
        };

        let err = block_on(serializer.deserialize(
            source,
            DeclaredType::of::<SampleClass>(),
            &NoProxyResolver,
            &cancel,
        ))
        .unwrap_err();
        assert!(err.is_cancelled());
    }
}
