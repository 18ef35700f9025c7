//! Parsing and expansion of the `response { ... }` block

use proc_macro2::TokenStream;
use quote::quote;
use syn::{braced, parse::ParseStream, Attribute, Expr, ExprClosure, Field, Ident, Token, Visibility};

/// A single status-word byte pattern: a literal, or `_` for wildcard
enum BytePattern {
    Wildcard,
    Literal(Expr),
}

/// Parsed `#[sw(...)]` annotation: either a single status-word constant, or a pair of byte patterns
enum SwAnnotation {
    Const(Expr),
    Pair(BytePattern, BytePattern),
}

struct ResponseVariant {
    doc_attrs: Vec<Attribute>,
    error_attr: Option<Attribute>,
    sw: SwAnnotation,
    name: Ident,
    fields: Vec<Field>,
}

pub(crate) struct ResponseDef {
    ok_variants: Vec<ResponseVariant>,
    error_variants: Vec<ResponseVariant>,
    custom_parser: Option<ExprClosure>,
}

fn parse_sw_annotation(attr: &Attribute) -> syn::Result<SwAnnotation> {
    let args: TokenStream = attr.parse_args()?;
    let parsed: syn::punctuated::Punctuated<Expr, Token![,]> =
        syn::parse::Parser::parse2(syn::punctuated::Punctuated::parse_terminated, args)?;

    match parsed.len() {
        1 => Ok(SwAnnotation::Const(parsed[0].clone())),
        2 => {
            let to_pattern = |e: &Expr| -> BytePattern {
                if let Expr::Infer(_) = e {
                    BytePattern::Wildcard
                } else if matches!(e, Expr::Path(p) if p.path.is_ident("_")) {
                    BytePattern::Wildcard
                } else {
                    BytePattern::Literal(e.clone())
                }
            };
            Ok(SwAnnotation::Pair(to_pattern(&parsed[0]), to_pattern(&parsed[1])))
        }
        _ => Err(syn::Error::new_spanned(attr, "expected `#[sw(CONST)]` or `#[sw(sw1, sw2)]`")),
    }
}

fn parse_variants(input: &ParseStream<'_>, is_error: bool) -> syn::Result<Vec<ResponseVariant>> {
    let mut variants = Vec::new();

    while !input.is_empty() {
        let attrs = input.call(Attribute::parse_outer)?;
        let mut doc_attrs = Vec::new();
        let mut error_attr = None;
        let mut sw = None;

        for attr in attrs {
            if attr.path().is_ident("sw") {
                sw = Some(parse_sw_annotation(&attr)?);
            } else if attr.path().is_ident("error") {
                error_attr = Some(attr);
            } else {
                doc_attrs.push(attr);
            }
        }

        let sw = sw.ok_or_else(|| input.error("response variant is missing a `#[sw(...)]` annotation"))?;
        let name: Ident = input.parse()?;

        let fields = if input.peek(syn::token::Brace) {
            let content;
            braced!(content in input);
            let parsed: syn::punctuated::Punctuated<Field, Token![,]> =
                content.parse_terminated(Field::parse_named, Token![,])?;
            parsed.into_iter().collect()
        } else {
            Vec::new()
        };

        if !input.is_empty() {
            let _ = input.parse::<Token![,]>();
        }

        variants.push(ResponseVariant {
            doc_attrs,
            error_attr: if is_error { error_attr } else { None },
            sw,
            name,
            fields,
        });
    }

    Ok(variants)
}

impl ResponseDef {
    pub(crate) fn parse(input: &ParseStream<'_>) -> syn::Result<Self> {
        let mut ok_variants = Vec::new();
        let mut error_variants = Vec::new();
        let mut custom_parser = None;

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            match key.to_string().as_str() {
                "ok" => {
                    let content;
                    braced!(content in input);
                    ok_variants.extend(parse_variants(&&content, false)?);
                    let _ = input.parse::<Token![,]>();
                }
                "errors" => {
                    let content;
                    braced!(content in input);
                    error_variants.extend(parse_variants(&&content, true)?);
                    let _ = input.parse::<Token![,]>();
                }
                "custom_parse" => {
                    input.parse::<Token![=]>()?;
                    custom_parser = Some(input.parse()?);
                    let _ = input.parse::<Token![,]>();
                }
                other => {
                    return Err(syn::Error::new(key.span(), format!("unknown response field: {other}")));
                }
            }
        }

        Ok(Self {
            ok_variants,
            error_variants,
            custom_parser,
        })
    }
}

fn variant_tokens(variant: &ResponseVariant, with_error_attr: bool) -> TokenStream {
    let doc_attrs = &variant.doc_attrs;
    let name = &variant.name;
    let error_attr = if with_error_attr { variant.error_attr.as_ref() } else { None };

    if variant.fields.is_empty() {
        quote! {
            #(#doc_attrs)*
            #error_attr
            #name
        }
    } else {
        let fields = &variant.fields;
        quote! {
            #(#doc_attrs)*
            #error_attr
            #name { #(#fields),* }
        }
    }
}

fn sw_condition(sw: &SwAnnotation) -> TokenStream {
    match sw {
        SwAnnotation::Const(expr) => quote! { response.status() == #expr },
        SwAnnotation::Pair(sw1, sw2) => {
            let sw1_cond = match sw1 {
                BytePattern::Wildcard => quote! { true },
                BytePattern::Literal(e) => quote! { response.status().sw1() == (#e) },
            };
            let sw2_cond = match sw2 {
                BytePattern::Wildcard => quote! { true },
                BytePattern::Literal(e) => quote! { response.status().sw2() == (#e) },
            };
            quote! { (#sw1_cond) && (#sw2_cond) }
        }
    }
}

/// Expand a parsed [`ResponseDef`] into the ok/error enums and the `parse_response` body
pub(crate) fn expand_response(
    response: &ResponseDef,
    vis: &Visibility,
    ok_name: &Ident,
    error_name: &Ident,
) -> syn::Result<(TokenStream, TokenStream)> {
    let ok_variant_tokens: Vec<_> = response.ok_variants.iter().map(|v| variant_tokens(v, false)).collect();
    let error_variant_tokens: Vec<_> = response.error_variants.iter().map(|v| variant_tokens(v, true)).collect();

    let needs_payload_derive = response.ok_variants.iter().any(|v| !v.fields.is_empty())
        || response.error_variants.iter().any(|v| !v.fields.is_empty());
    let extra_derives = if needs_payload_derive {
        quote! { #[derive(Debug, Clone)] }
    } else {
        quote! { #[derive(Debug, Clone, PartialEq, Eq)] }
    };

    let response_tokens = quote! {
        /// Successful responses to this command
        #extra_derives
        #vis enum #ok_name {
            #(#ok_variant_tokens),*
        }

        /// Errors returned by this command
        #[derive(Debug, Clone, thiserror::Error)]
        #vis enum #error_name {
            #(#error_variant_tokens,)*

            /// The underlying transport or response layer failed
            #[error(transparent)]
            Response(#[from] apdu_core::ResponseError),

            /// Transmitting the command through an executor's processor chain failed
            #[error(transparent)]
            Execution(#[from] apdu_core::ExecutionError),

            /// The response payload did not have the expected shape
            #[error("{0}")]
            ParseError(&'static str),

            /// The card returned a status word this command does not recognize
            #[error("Unknown status word: {sw1:02X}{sw2:02X}")]
            Unknown {
                /// First status byte
                sw1: u8,
                /// Second status byte
                sw2: u8,
            },
        }

        type Error = #error_name;
        #[allow(dead_code)]
        type Ok = #ok_name;
    };

    let parse_impl = if let Some(custom_parser) = &response.custom_parser {
        quote! {
            fn parse_response(&self, response: apdu_core::Response) -> Result<Self::Success, Self::Error> {
                (#custom_parser)(&response)
            }
        }
    } else {
        let ok_arms = response.ok_variants.iter().map(|v| {
            let cond = sw_condition(&v.sw);
            let name = &v.name;
            let ctor = if v.fields.is_empty() {
                quote! { #ok_name::#name }
            } else {
                quote! { return Err(#error_name::ParseError("variant with fields requires custom_parse")) }
            };
            if v.fields.is_empty() {
                quote! { if #cond { return Ok(#ctor); } }
            } else {
                quote! { if #cond { #ctor; } }
            }
        });
        let error_arms = response.error_variants.iter().map(|v| {
            let cond = sw_condition(&v.sw);
            let name = &v.name;
            let ctor = if v.fields.is_empty() {
                quote! { #error_name::#name }
            } else {
                quote! { #error_name::ParseError("variant with fields requires custom_parse") }
            };
            quote! { if #cond { return Err(#ctor); } }
        });

        quote! {
            fn parse_response(&self, response: apdu_core::Response) -> Result<Self::Success, Self::Error> {
                #(#ok_arms)*
                #(#error_arms)*
                Err(#error_name::Unknown { sw1: response.status().sw1(), sw2: response.status().sw2() })
            }
        }
    };

    Ok((response_tokens, parse_impl))
}
