mod payload;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

#[proc_macro_derive(Payload)]
pub fn derive_payload(item: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(item as DeriveInput);
    payload::derive_payload(&ast).into()
}
