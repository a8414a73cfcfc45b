use core::any::Any;

use super::EncodeDriver;
use super::scalar::write_payload;

use crate::CodecError;
use crate::object::FieldValue;
use crate::registry::{DeclaredType, TypeTraitSelfDescribing};
use crate::wire::{ABSENT, PRESENT, WireWriter, tag};

impl EncodeDriver<'_> {
    pub(super) fn encode_object(
        &mut self,
        writer: &mut WireWriter,
        ty: DeclaredType,
        ops: &TypeTraitSelfDescribing,
        value: &dyn Any,
    ) -> Result<(), CodecError> {
        let bag = match ops.export(value) {
            Some(Ok(bag)) => bag,
            Some(Err(source)) => return Err(CodecError::State { ty, source }),
            None => return Err(CodecError::TypeMismatch(ty)),
        };

        writer.write_len(bag.len())?;
        for (name, field) in bag.into_fields() {
            writer.write_text(Some(&*name))?;

            match field {
                FieldValue::Nested(nested) => {
                    writer.write_u8(tag::NESTED);
                    match nested.value() {
                        Some(value) => {
                            writer.write_u8(PRESENT);
                            self.nested(|this| this.encode(writer, nested.ty(), value))?;
                        }
                        None => writer.write_u8(ABSENT),
                    }
                }
                scalar => {
                    let Some(kind) = scalar.kind() else {
                        return Err(CodecError::UnsupportedType(ty));
                    };
                    writer.write_u8(kind.tag());
                    write_payload(writer, &scalar)?;
                }
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::Serializer;
    use crate::derive::SelfDescribing;
    use crate::proxy::NoProxyResolver;
    use crate::registry::TypeRegistry;
    use crate::wire::{WireWriter, tag};

    #[derive(SelfDescribing, Debug, PartialEq)]
    struct Endpoint {
        port: u16,
    }

    #[derive(SelfDescribing, Debug, PartialEq)]
    struct EveryScalar {
        flag: bool,
        tiny: i8,
        short: i16,
        int: i32,
        long: i64,
        byte: u8,
        word: u16,
        dword: u32,
        qword: u64,
        single: f32,
        double: f64,
        letter: char,
        name: String,
        note: Option<String>,
    }

    #[test]
    fn scalar_fields_carry_their_tag() {
        let serializer = Serializer::new(TypeRegistry::new());
        serializer.register::<Endpoint>();

        let mut expected = WireWriter::new();
        expected.write_len(1).unwrap();
        expected.write_text(Some("port")).unwrap();
        expected.write_u8(tag::U16);
        expected.write_u16(8080);

        let bytes = serializer
            .to_bytes(&Endpoint { port: 8080 }, &NoProxyResolver)
            .unwrap();
        assert_eq!(bytes, expected.as_bytes());
    }

    #[test]
    fn every_scalar_kind_is_tagged() {
        let serializer = Serializer::new(TypeRegistry::new());
        serializer.register::<EveryScalar>();

        let value = EveryScalar {
            flag: true,
            tiny: i8::MIN,
            short: i16::MIN,
            int: i32::MIN,
            long: i64::MIN,
            byte: u8::MAX,
            word: u16::MAX,
            dword: u32::MAX,
            qword: u64::MAX,
            single: 1.5,
            double: -2.25,
            letter: '\u{1F600}',
            name: String::from("name"),
            note: None,
        };

        let bytes = serializer.to_bytes(&value, &NoProxyResolver).unwrap();
        let back: EveryScalar = serializer.from_bytes(&bytes, &NoProxyResolver).unwrap();
        assert_eq!(back, value);
    }
}
