use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields, GenericArgument, PathArguments, Type};

/// Derive macro generating the field accessor table of a record type.
///
/// Implements `recast_api::record::Record` for the annotated struct:
///
/// - `shape()`: one `Field` per named field (getter, clone-assign,
///   move-store), built once and kept in a static.
/// - `instantiate()`: `Default::default()`, or `InstantiationError` when the
///   struct is marked `#[record(no_default)]`.
///
/// `Option<T>` fields are declared as `T` with `nullable = true`, so
/// `Option<T>` and `T` fields exchange values without a converter.
///
/// # Example
///
/// ```ignore
/// #[derive(Record, Default, Clone)]
/// pub struct UserDto {
///     pub name: Option<String>,
///     pub age: i64,
///
///     #[record(skip)]
///     pub cache: SomeNonCloneHandle,
/// }
/// ```
///
/// Field types must be `'static + Clone`. Generic structs are not supported.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Record only supports structs",
            ))
        }
    };

    // Parse #[record(...)] on the struct.
    let mut no_default = false;
    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("no_default") {
                no_default = true;
                Ok(())
            } else {
                Err(meta.error("unknown record attribute (expected `no_default`)"))
            }
        })?;
    }

    let mut accessor_fns = Vec::new();
    let mut field_tokens = Vec::new();

    for field in fields {
        let field_name = field.ident.as_ref().ok_or_else(|| {
            syn::Error::new_spanned(field, "expected named field")
        })?;

        // Parse #[record(...)] on the field.
        let mut skip = false;
        for attr in &field.attrs {
            if !attr.path().is_ident("record") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown record field attribute (expected `skip`)"))
                }
            })?;
        }
        if skip {
            continue;
        }

        let field_name_str = field_name.unraw().to_string();
        let get_fn = format_ident!("__recast_get_{}", field_name);
        let assign_fn = format_ident!("__recast_assign_{}", field_name);
        let store_fn = format_ident!("__recast_store_{}", field_name);

        let (value_ty, nullable, get_body, assign_helper, store_helper) =
            match option_inner(&field.ty) {
                Some(inner) => (
                    inner,
                    true,
                    quote! {
                        record.#field_name
                            .as_ref()
                            .map(|v| v as &dyn ::core::any::Any)
                    },
                    quote! { ::recast_api::schema::assign_optional },
                    quote! { ::recast_api::schema::store_optional },
                ),
                None => (
                    &field.ty,
                    false,
                    quote! {
                        ::core::option::Option::Some(&record.#field_name as &dyn ::core::any::Any)
                    },
                    quote! { ::recast_api::schema::assign_required },
                    quote! { ::recast_api::schema::store_required },
                ),
            };

        accessor_fns.push(quote! {
            fn #get_fn(record: &#name) -> ::core::option::Option<&dyn ::core::any::Any> {
                #get_body
            }

            fn #assign_fn(
                record: &mut #name,
                value: ::core::option::Option<&dyn ::core::any::Any>,
            ) -> ::core::result::Result<(), ::recast_api::error::FieldError> {
                #assign_helper(&mut record.#field_name, value, #field_name_str)
            }

            fn #store_fn(
                record: &mut #name,
                value: ::core::option::Option<::recast_api::value::BoxedValue>,
            ) -> ::core::result::Result<(), ::recast_api::error::FieldError> {
                #store_helper(&mut record.#field_name, value, #field_name_str)
            }
        });

        field_tokens.push(quote! {
            ::recast_api::schema::Field {
                name: #field_name_str,
                ty: ::recast_api::schema::TypeInfo::of::<#value_ty>(),
                nullable: #nullable,
                get: #get_fn,
                assign: #assign_fn,
                store: #store_fn,
            }
        });
    }

    let instantiate_body = if no_default {
        quote! {
            ::core::result::Result::Err(::recast_api::error::InstantiationError::new(
                ::recast_api::schema::TypeInfo::of::<#name>(),
                "type is marked #[record(no_default)]",
            ))
        }
    } else {
        quote! {
            ::core::result::Result::Ok(<#name as ::core::default::Default>::default())
        }
    };

    let expanded = quote! {
        impl ::recast_api::record::Record for #name {
            fn shape() -> &'static ::recast_api::schema::Shape<Self> {
                #(#accessor_fns)*

                static SHAPE: ::std::sync::LazyLock<::recast_api::schema::Shape<#name>> =
                    ::std::sync::LazyLock::new(|| {
                        ::recast_api::schema::Shape::new(::std::vec![
                            #(#field_tokens),*
                        ])
                    });
                &SHAPE
            }

            fn instantiate() -> ::core::result::Result<Self, ::recast_api::error::InstantiationError> {
                #instantiate_body
            }
        }
    };

    Ok(expanded)
}

/// `Some(T)` if `ty` is written as `Option<T>` (last path segment `Option`
/// with a single type argument).
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
