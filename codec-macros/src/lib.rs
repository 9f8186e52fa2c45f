use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod codegen;
mod parsed;
mod resolver_macro;
mod type_shape;

use resolver_macro::ResolverInvocation;

/// Derives `JsonApiResource` by reading `#[jsonapi(...)]` attributes off a
/// struct's fields and emitting a `Contract` built from closures over
/// `Handle`.
///
/// ```text
/// #[derive(Default, JsonApiResource)]
/// #[jsonapi(type = "articles")]
/// struct Article {
///     #[jsonapi(id)]
///     id: String,
///     title: String,
///     #[jsonapi(belongs_to(target = "Person"))]
///     author: Option<Rc<RefCell<Person>>>,
///     #[jsonapi(has_many(target = "Comment"))]
///     comments: Vec<Rc<RefCell<Comment>>>,
/// }
/// ```
#[proc_macro_derive(JsonApiResource, attributes(jsonapi))]
pub fn derive_json_api_resource(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match parsed::parse(&input) {
        Ok(resource) => codegen::expand(&resource).into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Builds a `ContractResolver` pre-registered with the given types.
///
/// ```text
/// let resolver = jsonapi_resolver!(Article, Person, Comment);
/// ```
#[proc_macro]
pub fn jsonapi_resolver(input: TokenStream) -> TokenStream {
    let invocation = parse_macro_input!(input as ResolverInvocation);
    invocation.emit().into()
}
