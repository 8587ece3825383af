use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{
    parse_macro_input, Data, DeriveInput, Expr, Fields, Ident, LitStr, Result as SynResult, Token,
};

/// `#[route("/path", "VERBS", priority = N, summary = "..", notes = "..")]`
struct RouteAttr {
    path: LitStr,
    verbs: Option<LitStr>,
    priority: Option<Expr>,
    summary: Option<LitStr>,
    notes: Option<LitStr>,
}

impl Parse for RouteAttr {
    fn parse(input: ParseStream) -> SynResult<Self> {
        let mut attr = RouteAttr {
            path: input.parse()?,
            verbs: None,
            priority: None,
            summary: None,
            notes: None,
        };
        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            if input.peek(LitStr) {
                let verbs: LitStr = input.parse()?;
                if attr.verbs.is_some() {
                    return Err(syn::Error::new(verbs.span(), "verbs given twice"));
                }
                attr.verbs = Some(verbs);
                continue;
            }
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            match key.to_string().as_str() {
                "verbs" => attr.verbs = Some(input.parse()?),
                "priority" => attr.priority = Some(input.parse()?),
                "summary" => attr.summary = Some(input.parse()?),
                "notes" => attr.notes = Some(input.parse()?),
                other => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("unexpected route option `{other}`"),
                    ))
                }
            }
        }
        Ok(attr)
    }
}

impl RouteAttr {
    fn route_def(&self) -> TokenStream2 {
        let path = &self.path;
        let mut def = quote! { ::restpath::router::RouteDef::new(#path) };
        if let Some(verbs) = &self.verbs {
            def = quote! { #def.verbs(#verbs) };
        }
        if let Some(priority) = &self.priority {
            def = quote! { #def.priority(#priority) };
        }
        if let Some(summary) = &self.summary {
            def = quote! { #def.summary(#summary) };
        }
        if let Some(notes) = &self.notes {
            def = quote! { #def.notes(#notes) };
        }
        def
    }
}

#[derive(Default)]
struct MemberAttr {
    rename: Option<LitStr>,
    field: bool,
    skip: bool,
}

fn member_attr(attrs: &[syn::Attribute]) -> SynResult<MemberAttr> {
    let mut member = MemberAttr::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("rest")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                member.rename = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("field") {
                member.field = true;
            } else if meta.path.is_ident("skip") {
                member.skip = true;
            } else {
                return Err(meta.error("expected `rename = \"..\"`, `field` or `skip`"));
            }
            Ok(())
        })?;
    }
    Ok(member)
}

/// Derive `restpath::typed::RestRequest`.
///
/// Each `#[route(..)]` on the struct becomes a route definition; each named
/// field becomes a bindable member under its own name unless renamed or
/// skipped. Fields marked `#[rest(field)]` are only bound when public-field
/// binding is enabled.
///
/// ```ignore
/// #[derive(Default, RestRequest)]
/// #[route("/users/{Id}", "GET", summary = "Fetch a user")]
/// #[route("/users/{Id}", "PUT,PATCH", priority = 1)]
/// struct User {
///     id: u64,
///     #[rest(rename = "display-name")]
///     name: Option<String>,
///     #[rest(skip)]
///     cache: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(RestRequest, attributes(route, rest))]
pub fn derive_rest_request(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> SynResult<TokenStream2> {
    let name = &input.ident;
    let fields: Vec<&syn::Field> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "RestRequest needs named fields to bind path variables",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "RestRequest can only be derived for structs",
            ))
        }
    };

    let type_name = match member_attr(&input.attrs)?.rename {
        Some(rename) => rename,
        None => LitStr::new(&name.to_string(), name.span()),
    };

    let routes = input
        .attrs
        .iter()
        .filter(|a| a.path().is_ident("route"))
        .map(|a| a.parse_args::<RouteAttr>().map(|r| r.route_def()))
        .collect::<SynResult<Vec<_>>>()?;

    let mut members = Vec::new();
    for field in fields {
        let attr = member_attr(&field.attrs)?;
        if attr.skip {
            continue;
        }
        let Some(ident) = &field.ident else {
            continue;
        };
        let ty = &field.ty;
        let member = match attr.rename {
            Some(rename) => rename,
            None => {
                let raw = ident.to_string();
                let raw = raw.strip_prefix("r#").unwrap_or(&raw);
                LitStr::new(raw, ident.span())
            }
        };
        let register = if attr.field {
            quote! { field }
        } else {
            quote! { property }
        };
        members.push(quote! {
            .#register(#member, |req: &mut Self, value: #ty| { req.#ident = value; })
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::restpath::typed::RestRequest for #name #ty_generics #where_clause {
            fn descriptor() -> ::restpath::typed::RequestDescriptor<Self> {
                ::restpath::typed::RequestDescriptor::new(#type_name)
                    #(#members)*
            }

            fn routes() -> ::std::vec::Vec<::restpath::router::RouteDef> {
                ::std::vec![#(#routes),*]
            }
        }
    })
}
