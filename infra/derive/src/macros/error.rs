use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Attribute, Data, DeriveInput, Field, Fields, FieldsNamed, GenericArgument, Ident,
    PathArguments, PathSegment, Type, Variant,
};

/// What the generator needs to know about one enum variant.
struct VariantShape<'a> {
    ident: &'a Ident,
    source: Option<(&'a Ident, &'a Type)>,
    has_context: bool,
    /// Fields other than `source` and `context`.
    extra_fields: usize,
    cfg_attrs: Vec<Attribute>,
}

impl VariantShape<'_> {
    /// A `From<Source>` impl is only possible when nothing but the source needs a value.
    fn is_plain_wrapper(&self) -> bool {
        self.source.is_some() && self.has_context && self.extra_fields == 0
    }
}

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    let name = &input.ident;
    let ext_trait = format_ident!("{}Ext", name);

    let Data::Enum(data) = &input.data else {
        return quote! { compile_error!("sailor_error can only be applied to enums"); };
    };

    let shapes = match data.variants.iter().map(inspect_variant).collect::<Result<Vec<_>, _>>() {
        Ok(shapes) => shapes,
        Err(err) => return err,
    };
    if let Some(err) = missing_context_error(&shapes) {
        return err;
    }

    let existing = existing_derives(&input);
    let mut derives = Vec::new();
    if !existing.contains("Debug") {
        derives.push(quote! { Debug });
    }
    if !existing.contains("Error") {
        derives.push(quote! { ::thiserror::Error });
    }
    let derive_attr = if derives.is_empty() {
        quote! {}
    } else {
        quote! { #[derive(#(#derives),*)] }
    };

    let context_trait = context_trait(name, &ext_trait, &shapes);
    let conversions = shapes.iter().filter_map(|shape| source_conversion(name, &ext_trait, shape));
    let internal = internal_conversions(name, &shapes);

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #derive_attr
        #input

        #context_trait
        #(#conversions)*
        #internal

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    }
}

fn inspect_variant(variant: &Variant) -> Result<VariantShape<'_>, TokenStream> {
    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(
            &variant.ident,
            "sailor_error requires named fields so source/context can be wired",
        )
        .to_compile_error());
    };

    let context = context_field(fields)?;
    let source = source_field(fields);
    let extra_fields = fields
        .named
        .iter()
        .filter(|field| !is_named(field, "context"))
        .filter(|field| source.is_none_or(|src| !std::ptr::eq(*field, src)))
        .count();

    Ok(VariantShape {
        ident: &variant.ident,
        source: source.and_then(|field| field.ident.as_ref().map(|ident| (ident, &field.ty))),
        has_context: context.is_some(),
        extra_fields,
        cfg_attrs: variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).cloned().collect(),
    })
}

fn context_field(fields: &FieldsNamed) -> Result<Option<&Field>, TokenStream> {
    let Some(field) = fields.named.iter().find(|field| is_named(field, "context")) else {
        return Ok(None);
    };
    if is_context_type(&field.ty) {
        Ok(Some(field))
    } else {
        Err(syn::Error::new_spanned(&field.ty, "context field must be Option<Cow<'static, str>>")
            .to_compile_error())
    }
}

fn source_field(fields: &FieldsNamed) -> Option<&Field> {
    fields.named.iter().find(|field| {
        is_named(field, "source") || has_attr(field, "source") || has_attr(field, "from")
    })
}

fn context_trait(name: &Ident, ext_trait: &Ident, shapes: &[VariantShape<'_>]) -> TokenStream {
    let arms = shapes.iter().filter(|shape| shape.has_context).map(|shape| {
        let cfg_attrs = &shape.cfg_attrs;
        let ident = shape.ident;
        quote! { #(#cfg_attrs)* #name::#ident { context: c, .. } => *c = Some(context.into()), }
    });

    quote! {
        pub trait #ext_trait<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext_trait<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut e| {
                    match &mut e {
                        #( #arms )*
                        _ => {}
                    }
                    e
                })
            }
        }
    }
}

fn source_conversion(
    name: &Ident,
    ext_trait: &Ident,
    shape: &VariantShape<'_>,
) -> Option<TokenStream> {
    if shape.ident == "Internal" || !shape.is_plain_wrapper() {
        return None;
    }
    let (field, ty) = shape.source?;
    let variant = shape.ident;
    let cfg_attrs = &shape.cfg_attrs;

    Some(quote! {
        #(#cfg_attrs)*
        #[automatically_derived]
        impl From<#ty> for #name {
            #[inline]
            fn from(#field: #ty) -> Self { Self::#variant { #field, context: None } }
        }

        #(#cfg_attrs)*
        impl<T> #ext_trait<T> for std::result::Result<T, #ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|#field| #name::#variant { #field, context: Some(context.into()) })
            }
        }
    })
}

fn internal_conversions(name: &Ident, shapes: &[VariantShape<'_>]) -> TokenStream {
    let Some(internal) = shapes.iter().find(|shape| shape.ident == "Internal") else {
        return quote!();
    };
    let cfg_attrs = &internal.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
        }
        #(#cfg_attrs)*
        impl From<String> for #name {
            #[inline]
            fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
        }
    }
}

fn missing_context_error(shapes: &[VariantShape<'_>]) -> Option<TokenStream> {
    shapes.iter().find(|shape| shape.source.is_some() && !shape.has_context).map(|shape| {
        syn::Error::new_spanned(
            shape.ident,
            "sailor_error requires `context: Option<Cow<'static, str>>` on variants with a source",
        )
        .to_compile_error()
    })
}

fn existing_derives(input: &DeriveInput) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();

    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                traits.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }

    traits
}

fn is_named(field: &Field, name: &str) -> bool {
    field.ident.as_ref().is_some_and(|ident| ident == name)
}

fn has_attr(field: &Field, name: &str) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident(name))
}

fn last_segment(ty: &Type) -> Option<&PathSegment> {
    let Type::Path(path) = ty else {
        return None;
    };
    path.path.segments.last()
}

fn angle_args(segment: &PathSegment) -> impl Iterator<Item = &GenericArgument> {
    let args = match &segment.arguments {
        PathArguments::AngleBracketed(args) => Some(args.args.iter()),
        _ => None,
    };
    args.into_iter().flatten()
}

/// Matches `Option<Cow<'static, str>>` by trailing path segments.
fn is_context_type(ty: &Type) -> bool {
    let inner = last_segment(ty)
        .filter(|seg| seg.ident == "Option")
        .and_then(|seg| angle_args(seg).next())
        .and_then(|arg| match arg {
            GenericArgument::Type(inner) => Some(inner),
            _ => None,
        });
    let Some(cow) = inner.and_then(last_segment).filter(|seg| seg.ident == "Cow") else {
        return false;
    };

    let mut args = angle_args(cow);
    let is_static =
        matches!(args.next(), Some(GenericArgument::Lifetime(lt)) if lt.ident == "static");
    let is_str = matches!(
        args.next(),
        Some(GenericArgument::Type(target)) if last_segment(target).is_some_and(|seg| seg.ident == "str")
    );
    is_static && is_str
}
