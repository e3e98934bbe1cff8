//! RateBench Macros
//!
//! Procedural macros for suite registration.
//!
//! ## Macros
//!
//! - `#[ratebench::suite]` - Register a function that populates a suite

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{ItemFn, ReturnType, parse_macro_input};

mod attr {
    use syn::meta::ParseNestedMeta;

    /// Get the attribute name as a string
    pub fn name(meta: &ParseNestedMeta) -> String {
        meta.path
            .get_ident()
            .map(|i| i.to_string())
            .unwrap_or_default()
    }

    /// Parse a string literal attribute: `attr = "value"`
    pub fn string(meta: &ParseNestedMeta) -> syn::Result<String> {
        let value: syn::LitStr = meta.value()?.parse()?;
        Ok(value.value())
    }

    /// Create an unknown attribute error
    pub fn unknown(meta: &ParseNestedMeta, name: &str) -> syn::Error {
        meta.error(format!("unknown attribute: {}", name))
    }
}

/// Register a suite definition
///
/// The function receives the suite to populate. It may return `()` or
/// `Result<(), SuiteError>`; errors abort discovery.
///
/// # Example
///
/// ```ignore
/// #[ratebench::suite]
/// fn array_map(suite: &mut Suite) -> Result<(), SuiteError> {
///     suite.add("map", || { let _ = [1, 2, 3].map(|x| x * 2); })
/// }
///
/// // Custom display name, also the baseline key
/// #[ratebench::suite(name = "Array.prototype.forEach")]
/// fn array_foreach(suite: &mut Suite) { ... }
/// ```
#[proc_macro_attribute]
pub fn suite(args: TokenStream, item: TokenStream) -> TokenStream {
    let args = TokenStream2::from(args);
    let func = parse_macro_input!(item as ItemFn);

    suite_impl(args, func)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn suite_impl(args: TokenStream2, func: ItemFn) -> Result<TokenStream2, syn::Error> {
    validate_signature(&func)?;

    let config = parse_suite_config(args)?;

    let fn_name = &func.sig.ident;
    let wrapper_name = format_ident!("_ratebench_define_{}", fn_name);
    let name = config.name.unwrap_or_else(|| fn_name.to_string());

    let body = match &func.sig.output {
        ReturnType::Default => quote! {
            #fn_name(suite);
            ::core::result::Result::Ok(())
        },
        ReturnType::Type(..) => quote! {
            #fn_name(suite)
        },
    };

    Ok(quote! {
        #func

        #[doc(hidden)]
        #[allow(non_snake_case)]
        fn #wrapper_name(
            suite: &mut ::ratebench::internal::Suite,
        ) -> ::core::result::Result<(), ::ratebench::internal::SuiteError> {
            #body
        }

        ::ratebench::internal::inventory::submit! {
            ::ratebench::internal::SuiteDef {
                name: #name,
                define: #wrapper_name,
                file: file!(),
                line: line!(),
                module_path: module_path!(),
            }
        }
    })
}

#[derive(Default)]
struct SuiteAttrs {
    name: Option<String>,
}

fn parse_suite_config(args: TokenStream2) -> Result<SuiteAttrs, syn::Error> {
    let mut config = SuiteAttrs::default();

    if args.is_empty() {
        return Ok(config);
    }

    let parser = syn::meta::parser(|meta| {
        let name = attr::name(&meta);
        match name.as_str() {
            "name" => {
                let value = attr::string(&meta)?;
                if value.is_empty() {
                    return Err(meta.error("suite name must not be empty"));
                }
                config.name = Some(value);
            }
            _ => return Err(attr::unknown(&meta, &name)),
        }
        Ok(())
    });

    syn::parse::Parser::parse2(parser, args)?;
    Ok(config)
}

fn validate_signature(func: &ItemFn) -> syn::Result<()> {
    if let Some(asyncness) = &func.sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "RateBench: Suite definitions must be synchronous; register async setup with `suite.before(..)`",
        ));
    }
    if !func.sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &func.sig.generics,
            "RateBench: Suite definitions cannot be generic",
        ));
    }
    if func.sig.inputs.len() != 1 {
        return Err(syn::Error::new_spanned(
            &func.sig,
            "RateBench: Function must take exactly one argument: `&mut Suite`",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(args: TokenStream2, item: TokenStream2) -> Result<String, syn::Error> {
        let func: ItemFn = syn::parse2(item)?;
        suite_impl(args, func).map(|tokens| tokens.to_string())
    }

    #[test]
    fn test_default_name_is_function_name() {
        let out = expand(
            quote! {},
            quote! { fn array_map(suite: &mut Suite) -> Result<(), SuiteError> { Ok(()) } },
        )
        .unwrap();
        assert!(out.contains("name : \"array_map\""));
        assert!(out.contains("_ratebench_define_array_map"));
        assert!(out.contains("inventory :: submit !"));
    }

    #[test]
    fn test_custom_name() {
        let out = expand(
            quote! { name = "Array.map" },
            quote! { fn array_map(suite: &mut Suite) {} },
        )
        .unwrap();
        assert!(out.contains("name : \"Array.map\""));
        assert!(out.contains(":: core :: result :: Result :: Ok (())"));
    }

    #[test]
    fn test_rejects_bad_signatures() {
        let err = expand(quote! {}, quote! { async fn s(suite: &mut Suite) {} }).unwrap_err();
        assert!(err.to_string().contains("synchronous"));

        let err = expand(quote! {}, quote! { fn s() {} }).unwrap_err();
        assert!(err.to_string().contains("exactly one argument"));

        let err = expand(quote! { group = "x" }, quote! { fn s(suite: &mut Suite) {} })
            .unwrap_err();
        assert!(err.to_string().contains("unknown attribute: group"));
    }
}
