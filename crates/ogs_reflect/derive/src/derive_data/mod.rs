//! Parsed form of a `#[derive(Reflect)]` input.

// -----------------------------------------------------------------------------
// Modules

mod attributes;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes};

use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Ident, Path, Type};

/// A member that takes part in serialization.
pub(crate) struct ReflectField {
    pub ident: Ident,
    pub ty: Type,
}

/// What the derive generates reflection for.
pub(crate) enum ReflectKind {
    /// Named members, in declaration order. A unit struct has none.
    Struct {
        fields: Vec<ReflectField>,
        extra: Option<Ident>,
    },
    /// No visible layout.
    Opaque,
}

pub(crate) struct ReflectMeta {
    ogs_reflect_path: Path,
    ident: Ident,
    attrs: TypeAttributes,
    kind: ReflectKind,
}

impl ReflectMeta {
    pub fn from_ast(ast: &DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new(
                ast.generics.span(),
                "`Reflect` cannot be derived for generic types",
            ));
        }

        let kind = if attrs.is_opaque() {
            ReflectKind::Opaque
        } else {
            match &ast.data {
                Data::Struct(data) => match &data.fields {
                    Fields::Named(named) => Self::parse_fields(named.named.iter())?,
                    Fields::Unit => ReflectKind::Struct {
                        fields: Vec::new(),
                        extra: None,
                    },
                    Fields::Unnamed(unnamed) => {
                        return Err(syn::Error::new(
                            unnamed.span(),
                            "tuple structs need `#[reflect(opaque)]` and a surrogate",
                        ));
                    }
                },
                Data::Enum(data) => {
                    return Err(syn::Error::new(
                        data.enum_token.span(),
                        "enums need `#[reflect(opaque)]` and a surrogate",
                    ));
                }
                Data::Union(data) => {
                    return Err(syn::Error::new(
                        data.union_token.span(),
                        "`Reflect` cannot be derived for unions",
                    ));
                }
            }
        };

        Ok(Self {
            ogs_reflect_path: crate::path::ogs_reflect(),
            ident: ast.ident.clone(),
            attrs,
            kind,
        })
    }

    fn parse_fields<'a>(fields: impl Iterator<Item = &'a syn::Field>) -> syn::Result<ReflectKind> {
        let mut members = Vec::new();
        let mut extra: Option<Ident> = None;

        for field in fields {
            let attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            let Some(ident) = field.ident.clone() else {
                continue;
            };
            if attrs.skip.is_some() {
                continue;
            }
            if let Some(span) = attrs.extra {
                if extra.is_some() {
                    return Err(syn::Error::new(span, "only one field can be `extra`"));
                }
                extra = Some(ident);
                continue;
            }
            members.push(ReflectField {
                ident,
                ty: field.ty.clone(),
            });
        }

        Ok(ReflectKind::Struct {
            fields: members,
            extra,
        })
    }

    #[inline]
    pub fn ogs_reflect_path(&self) -> &Path {
        &self.ogs_reflect_path
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        &self.ident
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn kind(&self) -> &ReflectKind {
        &self.kind
    }

    /// Written as bare members of the owner: a struct with a fixed layout.
    pub fn is_inline(&self) -> bool {
        matches!(&self.kind, ReflectKind::Struct { extra: None, .. })
    }

    /// The `type_path` expression: the custom path, or the module path
    /// followed by the ident.
    pub fn type_path_expr(&self) -> TokenStream {
        match &self.attrs.type_path {
            Some(path) => quote! { #path },
            None => {
                let name = self.ident.to_string();
                quote! { ::core::concat!(::core::module_path!(), "::", #name) }
            }
        }
    }

    /// The last segment of the type path.
    pub fn type_name(&self) -> String {
        match &self.attrs.type_path {
            Some(path) => {
                let path = path.value();
                match path.rsplit_once("::") {
                    Some((_, name)) => name.to_owned(),
                    None => path,
                }
            }
            None => self.ident.to_string(),
        }
    }
}
