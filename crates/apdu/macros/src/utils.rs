//! Small shared helpers for the proc-macro crate

use proc_macro2::TokenStream;
use quote::quote;

/// Wrap a `syn::Error` (or any error convertible to one) as a `compile_error!` token stream
pub(crate) fn error_tokens(context: &str, err: syn::Error) -> TokenStream {
    let msg = format!("{context}: {err}");
    quote! { compile_error!(#msg); }
}
