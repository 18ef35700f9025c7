//! Parsing and expansion of the `command { ... }` block

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{braced, parse::ParseStream, Expr, Ident, ItemFn, Token, Visibility};

/// Parsed contents of a `command { ... }` block
pub(crate) struct CommandDef {
    pub cla: Expr,
    pub ins: Expr,
    pub required_security_level: Option<Expr>,
    pub builders: Vec<ItemFn>,
}

impl CommandDef {
    pub(crate) fn parse(input: &ParseStream<'_>) -> syn::Result<Self> {
        let mut cla = None;
        let mut ins = None;
        let mut required_security_level = None;
        let mut builders = Vec::new();

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            match key.to_string().as_str() {
                "cla" => {
                    input.parse::<Token![:]>()?;
                    cla = Some(input.parse()?);
                    let _ = input.parse::<Token![,]>();
                }
                "ins" => {
                    input.parse::<Token![:]>()?;
                    ins = Some(input.parse()?);
                    let _ = input.parse::<Token![,]>();
                }
                "required_security_level" => {
                    input.parse::<Token![:]>()?;
                    required_security_level = Some(input.parse()?);
                    let _ = input.parse::<Token![,]>();
                }
                "builders" => {
                    let content;
                    braced!(content in input);
                    while !content.is_empty() {
                        builders.push(content.parse()?);
                    }
                    let _ = input.parse::<Token![,]>();
                }
                other => {
                    return Err(syn::Error::new(key.span(), format!("unknown command field: {other}")));
                }
            }
        }

        let cla = cla.ok_or_else(|| syn::Error::new(Span::call_site(), "missing `cla` in command block"))?;
        let ins = ins.ok_or_else(|| syn::Error::new(Span::call_site(), "missing `ins` in command block"))?;

        Ok(Self {
            cla,
            ins,
            required_security_level,
            builders,
        })
    }
}

/// Expand a parsed [`CommandDef`] into the command struct and its `ApduCommand` impl
pub(crate) fn expand_command(
    command: &CommandDef,
    vis: &Visibility,
    command_name: &Ident,
    ok_name: &Ident,
    error_name: &Ident,
    parse_impl: &TokenStream,
) -> syn::Result<TokenStream> {
    let cla = &command.cla;
    let ins = &command.ins;
    let required_security_level = command
        .required_security_level
        .as_ref()
        .map_or_else(|| quote! { SecurityLevel::none() }, |expr| quote! { #expr });
    let builders = &command.builders;

    Ok(quote! {
        #vis struct #command_name {
            p1: u8,
            p2: u8,
            data: Option<::bytes::Bytes>,
            le: Option<ExpectedLength>,
        }

        impl #command_name {
            /// Construct the command from its P1/P2 parameters, with no data or Le
            pub const fn new(p1: u8, p2: u8) -> Self {
                Self { p1, p2, data: None, le: None }
            }

            /// Attach command data (Lc + data)
            pub fn with_data(mut self, data: impl Into<::bytes::Bytes>) -> Self {
                self.data = Some(data.into());
                self
            }

            /// Attach an expected response length (Le)
            pub const fn with_le(mut self, le: ExpectedLength) -> Self {
                self.le = Some(le);
                self
            }

            #(#builders)*
        }

        impl ApduCommand for #command_name {
            type Success = #ok_name;
            type Error = #error_name;

            fn convert_error(error: apdu_core::ResponseError) -> Self::Error {
                #error_name::from(error)
            }

            fn class(&self) -> u8 {
                #cla
            }

            fn instruction(&self) -> u8 {
                #ins
            }

            fn p1(&self) -> u8 {
                self.p1
            }

            fn p2(&self) -> u8 {
                self.p2
            }

            fn data(&self) -> Option<::bytes::Bytes> {
                self.data.clone()
            }

            fn expected_length(&self) -> Option<ExpectedLength> {
                self.le
            }

            fn required_security_level(&self) -> SecurityLevel {
                #required_security_level
            }

            #parse_impl
        }
    })
}
