//! Procedural macros for defining paired APDU command/response types
//!
//! The [`apdu_pair!`] macro takes a single `command { ... } response { ... }`
//! definition and expands it into a command struct implementing
//! [`apdu_core::ApduCommand`], plus the success (`*Ok`) and error (`*Error`)
//! enums its responses parse into.

use heck::ToSnakeCase;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{braced, parse::Parse, parse::ParseStream, parse_macro_input, Attribute, Ident, Token, Visibility};

mod command;
mod response;
mod utils;

use command::CommandDef;
use response::ResponseDef;
use utils::error_tokens;

/// Defines a paired APDU command and response.
///
/// ```ignore
/// apdu_pair! {
///     pub struct Select {
///         command {
///             cla: 0x00,
///             ins: 0xA4,
///             required_security_level: SecurityLevel::none(),
///
///             builders {
///                 pub fn by_aid(aid: impl Into<bytes::Bytes>) -> Self {
///                     Self::new(0x04, 0x00).with_data(aid.into()).with_le(0)
///                 }
///             }
///         }
///
///         response {
///             ok {
///                 #[sw(SW_NO_ERROR)]
///                 Selected { fci: Vec<u8> }
///             }
///
///             errors {
///                 #[sw(SW_FILE_NOT_FOUND)]
///                 #[error("File not found")]
///                 NotFound
///             }
///
///             custom_parse = |response: &apdu_core::Response| -> Result<SelectOk, SelectError> {
///                 // ...
///             }
///         }
///     }
/// }
/// ```
#[proc_macro]
pub fn apdu_pair(input: TokenStream) -> TokenStream {
    let pair = parse_macro_input!(input as ApduPair);

    match expand_apdu_pair(&pair) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.into(),
    }
}

struct ApduPair {
    vis: Visibility,
    struct_name: Ident,
    attrs: Vec<Attribute>,
    command: CommandDef,
    response: ResponseDef,
}

impl Parse for ApduPair {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis = input.parse()?;

        input.parse::<Token![struct]>()?;
        let struct_name = input.parse()?;

        let content;
        braced!(content in input);

        content.parse::<Ident>()?; // `command`
        let command_content;
        braced!(command_content in content);
        let command_def = CommandDef::parse(&&command_content)?;

        content.parse::<Ident>()?; // `response`
        let response_content;
        braced!(response_content in content);
        let response_def = ResponseDef::parse(&&response_content)?;

        Ok(Self {
            vis,
            struct_name,
            attrs,
            command: command_def,
            response: response_def,
        })
    }
}

fn expand_apdu_pair(pair: &ApduPair) -> Result<TokenStream2, TokenStream2> {
    let command_name = Ident::new(&format!("{}Command", pair.struct_name), pair.struct_name.span());
    let ok_name = Ident::new(&format!("{}Ok", pair.struct_name), pair.struct_name.span());
    let error_name = Ident::new(&format!("{}Error", pair.struct_name), pair.struct_name.span());
    let module_name = Ident::new(&pair.struct_name.to_string().to_snake_case(), pair.struct_name.span());

    let (response_tokens, parse_impl) = response::expand_response(&pair.response, &pair.vis, &ok_name, &error_name)
        .map_err(|e| error_tokens("expanding response", e))?;

    let command_tokens = command::expand_command(
        &pair.command,
        &pair.vis,
        &command_name,
        &ok_name,
        &error_name,
        &parse_impl,
    )
    .map_err(|e| error_tokens("expanding command", e))?;

    let attrs = &pair.attrs;

    Ok(quote! {
        #(#attrs)*
        mod #module_name {
            use super::*;
            use apdu_core::ApduCommand;
            use apdu_core::prelude::*;

            #command_tokens

            #response_tokens
        }

        pub use #module_name::{#command_name, #ok_name, #error_name};
    })
}
