//! # arch-conform-macros
//!
//! Procedural macros for running arch-conform rules as `cargo test` cases.
//!
//! [`architecture_tests!`] expands to one `#[test]` function per catalog rule,
//! so each rule passes or fails on its own in the test report. Use it through
//! the `arch-conform` facade crate.

#![forbid(unsafe_code)]

use arch_conform_rules::{descriptor, CATALOG};
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote};
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{bracketed, parse_macro_input, Ident, LitStr, Token};

/// Generates one test per architecture rule.
///
/// All arguments are optional:
///
/// - `config = "path/to/arch-conform.toml"`: configuration file, relative to
///   the workspace root (default: `arch-conform.toml` or `.arch-conform.toml`)
/// - `preset = "strict"`: overrides the configured preset
/// - `fail_on = "warning"`: overrides the configured failure threshold
/// - `rules = ["no-field-injection", "AC001"]`: test only these rules,
///   regardless of the preset
///
/// Without `rules`, a test is generated for every catalog rule; rules outside
/// the effective preset or disabled in the configuration pass trivially.
/// A `declarative_rules` test runs the `[[restrict-use]]`, `[[naming]]` and
/// `[[deny-scope-dep]]` rules of the configuration.
///
/// ```rust,ignore
/// // tests/architecture.rs
/// arch_conform::architecture_tests!(config = "demos/spring-demo/arch-conform.toml");
/// ```
#[proc_macro]
pub fn architecture_tests(input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(input as MacroArgs);

    let names: Vec<&'static str> = match &args.rules {
        Some(rules) => {
            let mut names = Vec::new();
            for lit in rules {
                match descriptor(&lit.value()) {
                    Some(d) if names.contains(&d.name) => {}
                    Some(d) => names.push(d.name),
                    None => {
                        return syn::Error::new(
                            lit.span(),
                            format!(
                                "unknown arch-conform rule `{}`; run `arch-conform list-rules`",
                                lit.value()
                            ),
                        )
                        .to_compile_error()
                        .into();
                    }
                }
            }
            names
        }
        None => CATALOG.iter().map(|d| d.name).collect(),
    };

    let config = option_tokens(args.config.as_ref());
    let preset = option_tokens(args.preset.as_ref());
    let fail_on = option_tokens(args.fail_on.as_ref());
    let listed = args.rules.is_some();
    let options = quote! {
        ::arch_conform::__internal::RunOptions {
            config: #config,
            preset: #preset,
            fail_on: #fail_on,
            listed: #listed,
        }
    };

    let tests = names.iter().map(|name| {
        let ident = format_ident!("{}", name.replace('-', "_"));
        quote! {
            #[test]
            fn #ident() {
                ::arch_conform::__internal::run_rule(#name, &#options);
            }
        }
    });

    quote! {
        #(#tests)*

        #[test]
        fn declarative_rules() {
            ::arch_conform::__internal::run_declarative(&#options);
        }
    }
    .into()
}

fn option_tokens(value: Option<&LitStr>) -> proc_macro2::TokenStream {
    match value {
        Some(lit) => quote!(::core::option::Option::Some(#lit)),
        None => quote!(::core::option::Option::None),
    }
}

/// Parsed `key = value` arguments.
#[derive(Default)]
struct MacroArgs {
    config: Option<LitStr>,
    preset: Option<LitStr>,
    fail_on: Option<LitStr>,
    rules: Option<Vec<LitStr>>,
}

impl Parse for MacroArgs {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let mut args = Self::default();
        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            match key.to_string().as_str() {
                "config" => set_once(&mut args.config, &key, input.parse()?)?,
                "preset" => set_once(&mut args.preset, &key, input.parse()?)?,
                "fail_on" => set_once(&mut args.fail_on, &key, input.parse()?)?,
                "rules" => {
                    let content;
                    bracketed!(content in input);
                    let list: Punctuated<LitStr, Token![,]> =
                        content.parse_terminated(<LitStr as Parse>::parse, Token![,])?;
                    set_once(&mut args.rules, &key, list.into_iter().collect())?;
                }
                other => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!(
                            "unknown argument `{other}`; expected config, preset, fail_on or rules"
                        ),
                    ));
                }
            }
            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }
        if let Some(preset) = &args.preset {
            if preset.value().parse::<arch_conform_rules::Preset>().is_err() {
                return Err(syn::Error::new(
                    preset.span(),
                    "unknown preset; use one of: minimal, standard, strict",
                ));
            }
        }
        if let Some(rules) = &args.rules {
            if rules.is_empty() {
                return Err(syn::Error::new(Span::call_site(), "`rules` must not be empty"));
            }
        }
        Ok(args)
    }
}

fn set_once<T>(slot: &mut Option<T>, key: &Ident, value: T) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new(key.span(), format!("duplicate argument `{key}`")));
    }
    *slot = Some(value);
    Ok(())
}
