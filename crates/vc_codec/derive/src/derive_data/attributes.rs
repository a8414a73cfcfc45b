use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::{Attribute, LitStr};

use crate::CODEC_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// TypeAttributes

/// Attributes applied to the type: `#[codec(...)]` above the struct.
#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    /// `#[codec(auto_register)]`, with the span of the keyword.
    pub(crate) auto_register: Option<Span>,
}

impl TypeAttributes {
    pub(crate) fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(CODEC_ATTRIBUTE_NAME) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("auto_register") {
                    if result.auto_register.is_some() {
                        return Err(meta.error("duplicate `auto_register`"));
                    }
                    result.auto_register = Some(meta.path.span());
                    Ok(())
                } else {
                    Err(meta.error("unknown type attribute, expected `auto_register`"))
                }
            })?;
        }

        Ok(result)
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// How a field crosses the boundary.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldMode {
    /// A wire scalar, the default.
    #[default]
    Scalar,
    /// `#[codec(nested)]`: encoded with the strategy of its own type.
    Nested,
    /// `#[codec(skip)]`: not exported, restored from the field type's `Default`.
    Skip,
}

/// Attributes applied to a field.
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    pub(crate) mode: FieldMode,
    /// `#[codec(rename = "...")]`.
    pub(crate) rename: Option<LitStr>,
}

impl FieldAttributes {
    pub(crate) fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(CODEC_ATTRIBUTE_NAME) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("nested") {
                    result.set_mode(FieldMode::Nested, &meta)
                } else if meta.path.is_ident("skip") {
                    result.set_mode(FieldMode::Skip, &meta)
                } else if meta.path.is_ident("rename") {
                    if result.rename.is_some() {
                        return Err(meta.error("duplicate `rename`"));
                    }
                    let name: LitStr = meta.value()?.parse()?;
                    if name.value().is_empty() {
                        return Err(syn::Error::new(name.span(), "field name must not be empty"));
                    }
                    result.rename = Some(name);
                    Ok(())
                } else {
                    Err(meta.error("unknown field attribute, expected `nested`, `skip` or `rename`"))
                }
            })?;
        }

        if result.mode == FieldMode::Skip
            && let Some(rename) = &result.rename
        {
            return Err(syn::Error::new(rename.span(), "a `skip` field has no wire name to rename"));
        }

        Ok(result)
    }

    fn set_mode(&mut self, mode: FieldMode, meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
        if self.mode != FieldMode::Scalar {
            return Err(meta.error("`nested` and `skip` may appear once, and not together"));
        }
        self.mode = mode;
        Ok(())
    }
}
