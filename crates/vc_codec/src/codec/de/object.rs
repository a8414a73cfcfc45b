use alloc::boxed::Box;
use core::any::Any;

use futures_lite::io::AsyncRead;

use super::DecodeDriver;

use crate::CodecError;
use crate::wire::PREALLOC_LIMIT;
use crate::object::{FieldBag, FieldValue, NestedValue};
use crate::registry::{DeclaredType, ScalarKind, TypeTraitSelfDescribing};
use crate::wire::tag;

impl<R: AsyncRead + Unpin + Send> DecodeDriver<'_, R> {
    pub(super) async fn decode_object(
        &mut self,
        ty: DeclaredType,
        ops: TypeTraitSelfDescribing,
    ) -> Result<Box<dyn Any + Send>, CodecError> {
        let count = self.reader.read_len(self.config.field_limit()).await?;
        let mut bag = FieldBag::with_capacity(count.min(PREALLOC_LIMIT));

        for _ in 0..count {
            self.cancel.check()?;

            let name = self
                .reader
                .read_text(self.config.text_limit())
                .await?
                .ok_or(CodecError::CorruptStream("absent field name"))?;

            let value = match self.reader.read_u8().await? {
                tag::NESTED => {
                    let nested_ty = ops
                        .nested_field_type(&name)
                        .ok_or(CodecError::CorruptStream("nested field the type does not declare"))?;
                    self.read_nested(nested_ty).await?
                }
                tag => {
                    let kind = ScalarKind::from_tag(tag)
                        .ok_or(CodecError::CorruptStream("unknown field tag"))?;
                    self.read_payload(kind).await?
                }
            };

            bag.insert(name, value)
                .map_err(|_| CodecError::CorruptStream("duplicate field name"))?;
        }

        ops.import(bag)
            .map_err(|source| CodecError::State { ty, source })
    }

    async fn read_nested(&mut self, ty: DeclaredType) -> Result<FieldValue, CodecError> {
        if !self.reader.read_presence().await? {
            return Ok(FieldValue::Nested(NestedValue::new(ty, None)));
        }

        let strategy = self.dispatcher.strategy_for(ty);
        if !strategy.is_supported() {
            return Err(CodecError::UnsupportedType(ty));
        }

        let value = self.decode_nested(ty, strategy).await?;
        Ok(FieldValue::Nested(NestedValue::new(ty, Some(value))))
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
    use futures_lite::io::Cursor;

    use crate::codec::fixtures::{MockResolver, Order, Printer, SampleClass, serializer};
    use crate::proxy::NoProxyResolver;
    use crate::wire::{WireWriter, tag};
    use crate::{CancelSignal, DeclaredType};

    #[test]
    fn sample_class_round_trip() {
        let serializer = serializer();
        let cases = [
            SampleClass::new(0, None),
            SampleClass::new(i32::MIN, Some("")),
            SampleClass::new(i32::MAX, Some("Hello World")),
        ];

        for value in cases {
            assert!(value.created_by_default);

            let bytes = serializer.to_bytes(&value, &NoProxyResolver).unwrap();
            let back: SampleClass = serializer.from_bytes(&bytes, &NoProxyResolver).unwrap();

            assert_eq!(back.number, value.number);
            assert_eq!(back.text, value.text);
            // Rebuilt from the bag only, never through `Default`.
            assert!(!back.created_by_default);
        }
    }

    #[test]
    fn absent_and_empty_text_differ() {
        let serializer = serializer();
        let absent = serializer
            .to_bytes(&SampleClass::new(1, None), &NoProxyResolver)
            .unwrap();
        let empty = serializer
            .to_bytes(&SampleClass::new(1, Some("")), &NoProxyResolver)
            .unwrap();
        assert_ne!(absent, empty);
    }

    #[test]
    fn field_bag_wire_layout() {
        let serializer = serializer();
        let bytes = serializer
            .to_bytes(&SampleClass::new(7, None), &NoProxyResolver)
            .unwrap();

        let mut expected = WireWriter::new();
        expected.write_len(2).unwrap();
        expected.write_text(Some("number")).unwrap();
        expected.write_u8(tag::I32);
        expected.write_i32(7);
        expected.write_text(Some("str")).unwrap();
        expected.write_u8(tag::TEXT);
        expected.write_text(None).unwrap();

        assert_eq!(bytes, expected.as_bytes());
        // count, name prefix "number" (1 + 4 + 12), tag, i32, ...
        assert_eq!(&bytes[..9], &[2, 0, 0, 0, 1, 6, 0, 0, 0]);
    }

    #[test]
    fn field_order_on_the_wire_is_free() {
        let serializer = serializer();

        let mut reversed = WireWriter::new();
        reversed.write_len(2).unwrap();
        reversed.write_text(Some("str")).unwrap();
        reversed.write_u8(tag::TEXT);
        reversed.write_text(Some("swapped")).unwrap();
        reversed.write_text(Some("number")).unwrap();
        reversed.write_u8(tag::I32);
        reversed.write_i32(-3);

        let back: SampleClass = serializer
            .from_bytes(reversed.as_bytes(), &NoProxyResolver)
            .unwrap();
        assert_eq!(back.number, -3);
        assert_eq!(back.text.as_deref(), Some("swapped"));
    }

    #[test]
    fn unknown_scalar_fields_are_ignored() {
        let serializer = serializer();

        let mut bytes = WireWriter::new();
        bytes.write_len(3).unwrap();
        bytes.write_text(Some("number")).unwrap();
        bytes.write_u8(tag::I32);
        bytes.write_i32(5);
        bytes.write_text(Some("added_later")).unwrap();
        bytes.write_u8(tag::U64);
        bytes.write_u64(99);
        bytes.write_text(Some("str")).unwrap();
        bytes.write_u8(tag::TEXT);
        bytes.write_text(None).unwrap();

        let back: SampleClass = serializer
            .from_bytes(bytes.as_bytes(), &NoProxyResolver)
            .unwrap();
        assert_eq!(back.number, 5);
    }

    #[test]
    fn async_round_trip_through_cursor() {
        let serializer = serializer();
        let value = SampleClass::new(42, Some("over the wire"));

        let mut sink = Cursor::new(Vec::new());
        block_on(serializer.serialize_value(&mut sink, &value, &NoProxyResolver)).unwrap();

        let mut source = Cursor::new(sink.into_inner());
        let back: SampleClass = block_on(serializer.deserialize_value(
            &mut source,
            &NoProxyResolver,
            &CancelSignal::never(),
        ))
        .unwrap();

        assert_eq!(back.number, 42);
        assert_eq!(back.text.as_deref(), Some("over the wire"));
    }

    #[test]
    fn values_follow_each_other_in_one_stream() {
        let serializer = serializer();

        let mut sink = Vec::new();
        for number in [1, 2, 3] {
            let value = SampleClass::new(number, None);
            block_on(serializer.serialize_value(&mut sink, &value, &NoProxyResolver)).unwrap();
        }

        let mut source = Cursor::new(sink);
        for number in [1, 2, 3] {
            let back: SampleClass = block_on(serializer.deserialize_value(
                &mut source,
                &NoProxyResolver,
                &CancelSignal::never(),
            ))
            .unwrap();
            assert_eq!(back.number, number);
        }
    }

    #[test]
    fn untyped_deserialize_returns_the_declared_type() {
        let serializer = serializer();
        let bytes = serializer
            .to_bytes(&SampleClass::new(9, Some("x")), &NoProxyResolver)
            .unwrap();

        let value = block_on(serializer.deserialize(
            bytes.as_slice(),
            DeclaredType::of::<SampleClass>(),
            &NoProxyResolver,
            &CancelSignal::never(),
        ))
        .unwrap();

        let value = value.downcast::<SampleClass>().unwrap();
        assert_eq!(value.number, 9);
    }

    #[test]
    fn nested_fields_round_trip() {
        let serializer = serializer();
        let resolver = MockResolver::default();
        let printer = Printer::shared("front desk");

        let order = Order {
            id: u64::MAX,
            lines: vec![String::from("tea"), String::new(), String::from("milk")],
            sample: Some(SampleClass::new(-1, Some("nested"))),
            printer: Some(printer.clone()),
        };

        let bytes = serializer.to_bytes(&order, &resolver).unwrap();
        let back: Order = serializer.from_bytes(&bytes, &resolver).unwrap();

        assert_eq!(back.id, u64::MAX);
        assert_eq!(back.lines, order.lines);

        let sample = back.sample.unwrap();
        assert_eq!(sample.number, -1);
        assert_eq!(sample.text.as_deref(), Some("nested"));
        assert!(!sample.created_by_default);

        let back_printer = back.printer.unwrap();
        assert!(alloc::sync::Arc::ptr_eq(&back_printer, &printer));
        assert_eq!(back_printer.name, "front desk");
    }

    #[test]
    fn absent_nested_fields_round_trip() {
        let serializer = serializer();
        let order = Order {
            id: 0,
            lines: Vec::new(),
            sample: None,
            printer: None,
        };

        // No proxy is reached, so no resolver is needed.
        let bytes = serializer.to_bytes(&order, &NoProxyResolver).unwrap();
        let back: Order = serializer.from_bytes(&bytes, &NoProxyResolver).unwrap();

        assert!(back.lines.is_empty());
        assert!(back.sample.is_none());
        assert!(back.printer.is_none());
    }
}
