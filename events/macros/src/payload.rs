use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

pub fn derive_payload(ast: &DeriveInput) -> TokenStream {
    let name = &ast.ident;
    let (impl_generics, type_generics, where_clause) = ast.generics.split_for_impl();

    // `::rusty_events` resolves inside the crate through `extern crate self as rusty_events;`
    // in lib.rs, and to the dependency everywhere else.
    quote! {
        impl #impl_generics ::rusty_events::Payload for #name #type_generics #where_clause {
        }
    }
}
