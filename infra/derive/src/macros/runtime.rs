use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, ItemFn, ReturnType, Type};

const PROFILES: &str = "cooperative or default";

/// Expands the `#[sailor_runtime::main]` attribute macro.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if input.sig.asyncness.is_none() {
        return Error::new_spanned(
            &input.sig.ident,
            "#[sailor_runtime::main] can only be used on async functions",
        )
        .to_compile_error();
    }

    if !returns_result(&input.sig.output) {
        return Error::new_spanned(
            &input.sig.output,
            "#[sailor_runtime::main] requires a Result return type",
        )
        .to_compile_error();
    }

    let config = match profile_config(args) {
        Ok(config) => config,
        Err(err) => return err,
    };

    let ItemFn { attrs, vis, sig, block } = input;
    let name = &sig.ident;
    let output = &sig.output;

    quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let config = #config;
            let rt = ::sailor_runtime::build_runtime_with_config(&config)?;
            rt.block_on(async #block)
        }
    }
}

fn profile_config(args: TokenStream) -> Result<TokenStream, TokenStream> {
    if args.is_empty() {
        return Ok(quote! { ::sailor_runtime::RuntimeConfig::default() });
    }

    let ident: syn::Ident = syn::parse2(args).map_err(|err| err.to_compile_error())?;
    let config = match ident.to_string().as_str() {
        "cooperative" => quote! { ::sailor_runtime::RuntimeConfig::cooperative() },
        "default" => quote! { ::sailor_runtime::RuntimeConfig::default() },
        _ => {
            return Err(Error::new_spanned(
                ident,
                format!("Unknown runtime profile. Use: {PROFILES}"),
            )
            .to_compile_error());
        },
    };
    Ok(config)
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = &**ty else {
        return false;
    };
    path.path.segments.last().is_some_and(|seg| seg.ident == "Result")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_profiles() {
        let cooperative = profile_config(quote!(cooperative)).unwrap().to_string();
        assert!(cooperative.contains("cooperative"), "{cooperative}");

        let implicit = profile_config(TokenStream::new()).unwrap().to_string();
        assert_eq!(implicit, profile_config(quote!(default)).unwrap().to_string());
    }

    #[test]
    fn test_unknown_profile_is_a_compile_error() {
        let err = profile_config(quote!(memory_efficient)).unwrap_err().to_string();
        assert!(err.contains("Unknown runtime profile"), "{err}");
        assert!(err.contains("cooperative or default"), "{err}");
    }
}
