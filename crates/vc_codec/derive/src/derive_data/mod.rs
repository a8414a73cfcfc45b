//! Parses the derive input into the data the generators need.

use std::collections::BTreeMap;

use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Type};

mod attributes;

pub(crate) use attributes::{FieldAttributes, FieldMode, TypeAttributes};

// -----------------------------------------------------------------------------
// CodecField

/// One named field of the derived struct.
pub(crate) struct CodecField<'a> {
    pub(crate) ident: &'a Ident,
    pub(crate) ty: &'a Type,
    pub(crate) attrs: FieldAttributes,
}

impl CodecField<'_> {
    /// The name written to the wire.
    pub(crate) fn wire_name(&self) -> LitStr {
        match &self.attrs.rename {
            Some(name) => name.clone(),
            None => {
                let name = self.ident.to_string();
                let name = name.strip_prefix("r#").unwrap_or(&name);
                LitStr::new(name, self.ident.span())
            }
        }
    }

    /// For a nested field, the declared type of its value and whether it
    /// is nullable.
    ///
    /// An `Option<T>` field is nullable with declared type `T`.
    pub(crate) fn nested_type(&self) -> (&Type, bool) {
        match crate::utils::option_inner(self.ty) {
            Some(inner) => (inner, true),
            None => (self.ty, false),
        }
    }
}

// -----------------------------------------------------------------------------
// CodecDerive

/// A struct that `#[derive(SelfDescribing)]` accepts.
pub(crate) struct CodecDerive<'a> {
    ident: &'a Ident,
    attrs: TypeAttributes,
    fields: Vec<CodecField<'a>>,
    /// `struct Foo;`, built without braces.
    is_unit: bool,
    vc_codec_path: syn::Path,
}

impl<'a> CodecDerive<'a> {
    pub(crate) fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        if !input.generics.params.is_empty() || input.generics.where_clause.is_some() {
            return Err(syn::Error::new(
                input.generics.span(),
                "`SelfDescribing` can not be derived for generic types",
            ));
        }

        let data = match &input.data {
            Data::Struct(data) => data,
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "`SelfDescribing` can not be derived for enums",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "`SelfDescribing` can not be derived for unions",
                ));
            }
        };

        let attrs = TypeAttributes::parse(&input.attrs)?;

        let (fields, is_unit) = match &data.fields {
            Fields::Named(named) => (Self::parse_fields(named)?, false),
            Fields::Unit => (Vec::new(), true),
            Fields::Unnamed(unnamed) => {
                return Err(syn::Error::new(
                    unnamed.span(),
                    "`SelfDescribing` needs named fields to name them on the wire",
                ));
            }
        };

        Ok(Self {
            ident: &input.ident,
            attrs,
            fields,
            is_unit,
            vc_codec_path: crate::path::vc_codec(),
        })
    }

    fn parse_fields(named: &'a syn::FieldsNamed) -> syn::Result<Vec<CodecField<'a>>> {
        let mut fields = Vec::with_capacity(named.named.len());
        let mut names: BTreeMap<String, &Ident> = BTreeMap::new();
        let mut errors: Option<syn::Error> = None;

        for field in &named.named {
            let attrs = match FieldAttributes::parse(&field.attrs) {
                Ok(attrs) => attrs,
                Err(err) => {
                    combine(&mut errors, err);
                    continue;
                }
            };

            let Some(ident) = &field.ident else {
                continue;
            };

            let field = CodecField {
                ident,
                ty: &field.ty,
                attrs,
            };

            if field.attrs.mode != FieldMode::Skip {
                let wire_name = field.wire_name();
                if let Some(first) = names.insert(wire_name.value(), ident) {
                    combine(
                        &mut errors,
                        syn::Error::new(
                            wire_name.span(),
                            format!("wire name `{}` is already used by `{first}`", wire_name.value()),
                        ),
                    );
                }
            }

            fields.push(field);
        }

        match errors {
            Some(err) => Err(err),
            None => Ok(fields),
        }
    }

    #[inline]
    pub(crate) fn ident(&self) -> &Ident {
        self.ident
    }

    #[inline]
    pub(crate) fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub(crate) fn fields(&self) -> &[CodecField<'a>] {
        &self.fields
    }

    /// Fields that cross the boundary, in declaration order.
    pub(crate) fn active_fields(&self) -> impl Iterator<Item = &CodecField<'a>> {
        self.fields
            .iter()
            .filter(|field| field.attrs.mode != FieldMode::Skip)
    }

    #[inline]
    pub(crate) fn is_unit(&self) -> bool {
        self.is_unit
    }

    #[inline]
    pub(crate) fn vc_codec_path(&self) -> &syn::Path {
        &self.vc_codec_path
    }
}

fn combine(errors: &mut Option<syn::Error>, err: syn::Error) {
    match errors {
        Some(errors) => errors.combine(err),
        None => *errors = Some(err),
    }
}
