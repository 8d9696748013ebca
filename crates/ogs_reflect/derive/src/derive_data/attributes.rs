use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::{Attribute, LitStr};

use crate::REFLECT_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// TypeAttributes

/// `#[reflect(...)]` on the type.
#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    pub type_path: Option<LitStr>,
    pub by_value: Option<Span>,
    pub opaque: Option<Span>,
    pub surrogate: Option<Span>,
    pub default: Option<Span>,
    #[cfg_attr(not(feature = "auto_register"), allow(dead_code))]
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                let span = meta.path.span();
                if meta.path.is_ident("type_path") {
                    let lit: LitStr = meta.value()?.parse()?;
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "`type_path` cannot be empty"));
                    }
                    parsed.type_path = Some(lit);
                } else if meta.path.is_ident("by_value") {
                    parsed.by_value = Some(span);
                } else if meta.path.is_ident("opaque") {
                    parsed.opaque = Some(span);
                } else if meta.path.is_ident("surrogate") {
                    parsed.surrogate = Some(span);
                } else if meta.path.is_ident("default") {
                    parsed.default = Some(span);
                } else if meta.path.is_ident("auto_register") {
                    parsed.auto_register = Some(span);
                } else {
                    return Err(meta.error(
                        "expected one of `type_path`, `by_value`, `opaque`, `surrogate`, `default`, `auto_register`",
                    ));
                }
                Ok(())
            })?;
        }

        if let (Some(span), true) = (parsed.by_value, parsed.is_opaque()) {
            return Err(syn::Error::new(
                span,
                "opaque types set `by_value` through `Surrogate::BY_VALUE`",
            ));
        }
        Ok(parsed)
    }

    /// `surrogate` implies `opaque`.
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.opaque.is_some() || self.surrogate.is_some()
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// `#[reflect(...)]` on a named field.
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    pub skip: Option<Span>,
    pub extra: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    parsed.skip = Some(meta.path.span());
                } else if meta.path.is_ident("extra") {
                    parsed.extra = Some(meta.path.span());
                } else {
                    return Err(meta.error("expected `skip` or `extra`"));
                }
                Ok(())
            })?;
        }

        if let (Some(_), Some(span)) = (parsed.skip, parsed.extra) {
            return Err(syn::Error::new(span, "`skip` and `extra` cannot be combined"));
        }
        Ok(parsed)
    }
}
