use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, LitStr, Meta, Type};

/// Derive macro describing the columns of a flat record read with `csv`.
///
/// For each named field it records:
/// - the column name (`#[serde(rename = "...")]` wins over the field name)
/// - whether the column is required (not `Option<T>` and no `#[serde(default)]`)
/// - the description, taken from the field's doc comments
///
/// Generates `fn field_schema() -> &'static [FieldDoc]` and
/// `fn column_names() -> Vec<&'static str>`. `FieldDoc` must be in scope
/// where the derive is used.
#[proc_macro_derive(FieldSchema, attributes(serde))]
pub fn derive_field_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "FieldSchema needs named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "FieldSchema only supports structs")
                .to_compile_error()
                .into()
        }
    };

    let mut entries = Vec::new();
    for field in fields {
        let ident = match field.ident.as_ref() {
            Some(ident) => ident,
            None => continue,
        };
        let serde = match serde_options(&field.attrs) {
            Ok(opts) => opts,
            Err(err) => return err.to_compile_error().into(),
        };
        let column = serde.rename.unwrap_or_else(|| ident.to_string());
        let required = !serde.has_default && !is_option_type(&field.ty);
        let description = doc_comment(&field.attrs);

        entries.push(quote! {
            FieldDoc {
                name: #column,
                required: #required,
                description: #description,
            }
        });
    }

    let expanded = quote! {
        impl #name {
            pub fn field_schema() -> &'static [FieldDoc] {
                static SCHEMA: &[FieldDoc] = &[
                    #(#entries),*
                ];
                SCHEMA
            }

            pub fn column_names() -> Vec<&'static str> {
                Self::field_schema().iter().map(|f| f.name).collect()
            }
        }
    };

    TokenStream::from(expanded)
}

#[derive(Default)]
struct SerdeOptions {
    rename: Option<String>,
    has_default: bool,
}

fn serde_options(attrs: &[syn::Attribute]) -> syn::Result<SerdeOptions> {
    let mut opts = SerdeOptions::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                opts.rename = Some(lit.value());
            } else if meta.path.is_ident("default") {
                // `default` or `default = "path"`
                if meta.input.peek(syn::Token![=]) {
                    let _: LitStr = meta.value()?.parse()?;
                }
                opts.has_default = true;
            } else if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }
    Ok(opts)
}

fn doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                syn::Expr::Lit(syn::ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
