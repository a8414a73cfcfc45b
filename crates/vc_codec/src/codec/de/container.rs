use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;

use futures_lite::io::AsyncRead;

use super::DecodeDriver;

use crate::CodecError;
use crate::wire::PREALLOC_LIMIT;
use crate::registry::{DeclaredType, TypeTraitContainer};
use crate::strategy::EncodingStrategy;

impl<R: AsyncRead + Unpin + Send> DecodeDriver<'_, R> {
    pub(super) async fn decode_container(
        &mut self,
        element: DeclaredType,
        element_strategy: Arc<EncodingStrategy>,
        ops: TypeTraitContainer,
    ) -> Result<Box<dyn Any + Send>, CodecError> {
        let count = self.reader.read_len(self.config.container_limit()).await?;
        let mut container = ops.with_capacity(count.min(PREALLOC_LIMIT));

        for _ in 0..count {
            self.cancel.check()?;
            let item = self.decode_nested(element, element_strategy.clone()).await?;
            if !ops.push(&mut *container, item) {
                return Err(CodecError::TypeMismatch(element));
            }
        }

        Ok(container)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::Any;
    use core::fmt::Debug;

    use crate::codec::fixtures::{SampleClass, serializer};
    use crate::proxy::NoProxyResolver;
    use crate::registry::{ScalarKind, TypeMeta};
    use crate::strategy::StrategyKind;
    use crate::{CodecError, DeclaredType, Serializer};

    #[test]
    fn integer_vec_round_trip() {
        let serializer = serializer();
        serializer.register::<Vec<i32>>();

        for value in [vec![i32::MIN, 0, i32::MAX], Vec::new()] {
            let bytes = serializer.to_bytes(&value, &NoProxyResolver).unwrap();
            let back: Vec<i32> = serializer.from_bytes(&bytes, &NoProxyResolver).unwrap();
            assert_eq!(back, value);
        }
    }

    #[test]
    fn container_wire_layout() {
        let serializer = serializer();
        serializer.register::<Vec<i32>>();

        let bytes = serializer
            .to_bytes(&vec![i32::MIN, 0, i32::MAX], &NoProxyResolver)
            .unwrap();
        assert_eq!(
            bytes,
            [
                3, 0, 0, 0, // count
                0x00, 0x00, 0x00, 0x80, // i32::MIN
                0, 0, 0, 0, // 0
                0xFF, 0xFF, 0xFF, 0x7F, // i32::MAX
            ]
        );

        let empty = serializer.to_bytes(&Vec::<i32>::new(), &NoProxyResolver).unwrap();
        assert_eq!(empty, [0, 0, 0, 0]);
    }

    #[test]
    fn nullable_text_elements() {
        let serializer = serializer();
        serializer.register::<VecDeque<Option<String>>>();

        let value: VecDeque<Option<String>> =
            VecDeque::from([Some(String::from("a")), None, Some(String::new())]);
        let bytes = serializer.to_bytes(&value, &NoProxyResolver).unwrap();
        let back: VecDeque<Option<String>> = serializer.from_bytes(&bytes, &NoProxyResolver).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn text_counts_utf16_units() {
        let serializer = serializer();
        serializer.register::<Vec<String>>();

        // One astral character is a surrogate pair.
        let value = vec![String::from("\u{1F600}é")];
        let bytes = serializer.to_bytes(&value, &NoProxyResolver).unwrap();
        // count, presence, unit count
        assert_eq!(&bytes[..9], &[1, 0, 0, 0, 1, 3, 0, 0, 0]);
        assert_eq!(bytes.len(), 9 + 3 * 2);

        let back: Vec<String> = serializer.from_bytes(&bytes, &NoProxyResolver).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn nested_containers_round_trip() {
        let serializer = serializer();
        serializer.register::<Vec<Vec<u8>>>();

        let value = vec![vec![0_u8, 255], Vec::new(), vec![7]];
        let bytes = serializer.to_bytes(&value, &NoProxyResolver).unwrap();
        let back: Vec<Vec<u8>> = serializer.from_bytes(&bytes, &NoProxyResolver).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn self_describing_elements() {
        let serializer = serializer();
        let value = vec![SampleClass::new(1, None), SampleClass::new(2, Some("two"))];

        let bytes = serializer.to_bytes(&value, &NoProxyResolver).unwrap();
        let back: Vec<SampleClass> = serializer.from_bytes(&bytes, &NoProxyResolver).unwrap();

        assert_eq!(back.len(), 2);
        assert_eq!(back[1].text.as_deref(), Some("two"));
        assert!(back.iter().all(|item| !item.created_by_default));
    }

    #[test]
    fn every_scalar_kind_round_trips() {
        let serializer = serializer();
        serializer.register_with(|registry| {
            registry.register::<Vec<bool>>();
            registry.register::<Vec<char>>();
            registry.register::<Vec<i8>>();
            registry.register::<Vec<i64>>();
            registry.register::<Vec<u16>>();
            registry.register::<Vec<u32>>();
            registry.register::<Vec<f32>>();
            registry.register::<Vec<f64>>();
        });

        fn round_trip<T: Any + PartialEq + Debug>(serializer: &Serializer, value: T) {
            let bytes = serializer.to_bytes(&value, &NoProxyResolver).unwrap();
            let back: T = serializer.from_bytes(&bytes, &NoProxyResolver).unwrap();
            assert_eq!(back, value);
        }

        round_trip(&serializer, vec![true, false]);
        round_trip(&serializer, vec!['a', '\u{10FFFF}']);
        round_trip(&serializer, vec![i8::MIN, i8::MAX]);
        round_trip(&serializer, vec![i64::MIN, i64::MAX]);
        round_trip(&serializer, vec![u16::MAX]);
        round_trip(&serializer, vec![u32::MAX, 0]);
        round_trip(&serializer, vec![f32::MIN_POSITIVE, -0.5]);
        round_trip(&serializer, vec![f64::MAX, f64::EPSILON]);
    }

    #[test]
    fn unsupported_element_makes_the_container_unsupported() {
        struct Opaque;

        let serializer = serializer();
        serializer.register_with(|registry| {
            registry.try_insert_type_meta(TypeMeta::container::<Vec<Opaque>>());
        });

        let ty = DeclaredType::of::<Vec<Opaque>>();
        assert_eq!(serializer.strategy_of(ty), StrategyKind::Unsupported);

        let err = serializer.to_bytes(&vec![Opaque], &NoProxyResolver).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedType(found) if found == ty));
    }

    #[test]
    fn container_strategy_shape() {
        let serializer = serializer();
        serializer.register::<Vec<Vec<u8>>>();

        assert_eq!(
            serializer.strategy_of(DeclaredType::of::<Vec<Vec<u8>>>()),
            StrategyKind::Container(alloc::boxed::Box::new(StrategyKind::Container(
                alloc::boxed::Box::new(StrategyKind::Scalar(ScalarKind::U8))
            )))
        );
    }
}
