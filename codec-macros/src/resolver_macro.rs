//! The `jsonapi_resolver!` macro for building a `ContractResolver` from a
//! list of `#[derive(JsonApiResource)]` types.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Path, Result, Token,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
};

pub struct ResolverInvocation {
    types: Punctuated<Path, Token![,]>,
}

impl Parse for ResolverInvocation {
    fn parse(input: ParseStream) -> Result<Self> {
        let types = Punctuated::<Path, Token![,]>::parse_terminated(input)?;
        if types.is_empty() {
            return Err(syn::Error::new(
                proc_macro2::Span::call_site(),
                "jsonapi_resolver! requires at least one type",
            ));
        }
        Ok(Self { types })
    }
}

impl ResolverInvocation {
    pub fn emit(&self) -> TokenStream2 {
        let registrations = self.types.iter().map(|path| {
            quote! { .register::<#path>() }
        });

        quote! {
            ::jsonapi_codec::ContractResolver::new()
                #(#registrations)*
        }
    }
}
