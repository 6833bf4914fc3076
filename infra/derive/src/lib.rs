#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the shell workspace.
//!
//! * [`macro@main`] bootstraps a Tokio runtime from a named profile.
//! * [`macro@sailor_error`] turns a plain enum into a context-aware error type.
//!
//! Examples are `ignore`d here because they reference downstream crates.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, parse_macro_input};

/// Attribute macro to bootstrap a Tokio runtime with a named profile.
///
/// Transforms an `async fn main` returning `Result` into a synchronous `fn main`
/// that builds the runtime through `sailor_runtime::build_runtime_with_config`.
///
/// # Profiles
///
/// * `cooperative` - a current-thread runtime; every task shares one event loop.
/// * `default` - multi-thread runtime sized from available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[sailor_runtime::main(cooperative)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro for defining domain error enums.
///
/// # Features
///
/// * Injects `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * Generates a companion `<Name>Ext` trait adding `.context(..)` to results.
/// * Implements `From<Source>` for variants made of exactly a `source` and a
///   `context` field, so `?` works on upstream errors.
/// * Implements `From<&'static str>` and `From<String>` when an `Internal`
///   variant exists.
///
/// # Requirements
///
/// 1. The item must be an enum with named-field variants only.
/// 2. Context fields must be typed `Option<Cow<'static, str>>`.
/// 3. A variant holding a source must also hold a context field.
///
/// Variants that carry additional fields next to their source (for example the
/// name of the module that failed) still receive `.context(..)` support but no
/// `From` conversion, since the extra data cannot be invented.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[sailor_derive::sailor_error]
/// pub enum SessionError {
///     #[error("Entitlement file error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal session error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn sailor_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
