use proc_macro::TokenStream;
use proc_macro2::{TokenStream as TokenStream2, TokenTree};
use quote::{quote, ToTokens};
use syn::{
    FnArg, GenericArgument, ImplItem, ImplItemFn, ItemImpl, LitStr, Pat, PathArguments,
    ReturnType, Type, TypeParamBound,
};

pub fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let block = syn::parse_macro_input!(item as ItemImpl);

    if !attr.is_empty() {
        let attr = TokenStream2::from(attr);
        let err = syn::Error::new_spanned(attr, "#[handlers] takes no arguments").to_compile_error();
        return TokenStream::from(quote! { #err #block });
    }

    match expand_block(&block) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => {
            let err = err.to_compile_error();
            TokenStream::from(quote! { #err #block })
        }
    }
}

fn expand_block(block: &ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &block.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[handlers] goes on an inherent impl block, not a trait impl",
        ));
    }
    if !block.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &block.generics,
            "generic handler types are not supported",
        ));
    }

    let methods = block
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(method) if method.attrs.iter().any(is_marker) => Some(method),
            _ => None,
        })
        .map(method_info)
        .collect::<syn::Result<Vec<_>>>()?;

    let self_ty = &block.self_ty;

    Ok(quote! {
        #block

        impl ::wired_rust::Handlers for #self_ty {
            fn handler_methods() -> ::std::vec::Vec<::wired_rust::MethodInfo> {
                ::std::vec![#(#methods),*]
            }
        }

        ::wired_rust::__submit_handler_type!(#self_ty);
    })
}

fn is_marker(attr: &syn::Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == "handler")
}

/// One declared parameter, receiver excluded.
struct Param<'a> {
    name: String,
    ty: &'a Type,
    opaque: bool,
}

fn method_info(method: &ImplItemFn) -> syn::Result<TokenStream2> {
    let sig = &method.sig;

    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "generic handler methods are not supported",
        ));
    }

    match sig.inputs.first() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some()
                && receiver.mutability.is_none()
                && receiver.colon_token.is_none() => {}
        _ => {
            return Err(syn::Error::new_spanned(
                sig,
                "handler methods must take `&self`",
            ))
        }
    }

    let params: Vec<Param> = sig
        .inputs
        .iter()
        .skip(1)
        .enumerate()
        .filter_map(|(index, arg)| match arg {
            FnArg::Typed(pat_type) => Some(Param {
                name: match &*pat_type.pat {
                    Pat::Ident(pat) => pat.ident.to_string(),
                    _ => format!("arg{}", index),
                },
                ty: &pat_type.ty,
                opaque: is_opaque(&pat_type.ty),
            }),
            FnArg::Receiver(_) => None,
        })
        .collect();

    let returns = Returns::of(sig);

    let name = &sig.ident;
    let name_lit = LitStr::new(&name.to_string(), name.span());
    let param_infos = params.iter().map(param_info);
    let return_info = returns.to_info();
    let binding = match binding(name, &params, &returns) {
        Some(binding) => quote! { ::std::option::Option::Some(#binding) },
        None => quote! { ::std::option::Option::None },
    };

    Ok(quote! {
        ::wired_rust::MethodInfo::new(
            #name_lit,
            ::std::vec![#(#param_infos),*],
            #return_info,
            #binding,
        )
    })
}

fn param_info(param: &Param) -> TokenStream2 {
    let name = &param.name;
    let ty = param.ty;
    if param.opaque {
        let text = ty.to_token_stream().to_string();
        quote! { ::wired_rust::ParamInfo::opaque(#name, #text) }
    } else {
        quote! { ::wired_rust::ParamInfo::of::<#ty>(#name) }
    }
}

/// Types that cannot be named with a `'static` `TypeId`.
fn is_opaque(ty: &Type) -> bool {
    match ty {
        Type::Reference(_) | Type::Ptr(_) | Type::ImplTrait(_) | Type::BareFn(_) | Type::Infer(_) => {
            true
        }
        Type::Paren(inner) => is_opaque(&inner.elem),
        Type::Group(inner) => is_opaque(&inner.elem),
        _ => carries_lifetime_or_impl(ty.to_token_stream()),
    }
}

fn carries_lifetime_or_impl(tokens: TokenStream2) -> bool {
    tokens.into_iter().any(|token| match token {
        TokenTree::Punct(punct) => punct.as_char() == '\'',
        TokenTree::Ident(ident) => ident == "impl",
        TokenTree::Group(group) => carries_lifetime_or_impl(group.stream()),
        TokenTree::Literal(_) => false,
    })
}

enum Shape {
    Unit,
    Fallible,
    Other(String),
}

struct Returns {
    is_async: bool,
    shape: Shape,
}

impl Returns {
    fn of(sig: &syn::Signature) -> Self {
        let declared = match &sig.output {
            ReturnType::Default => None,
            ReturnType::Type(_, ty) => Some(&**ty),
        };

        if sig.asyncness.is_some() {
            return Self {
                is_async: true,
                shape: shape_of(declared),
            };
        }

        // a returned future counts as asynchronous
        match declared.and_then(future_output) {
            Some(output) => Self {
                is_async: true,
                shape: shape_of(Some(output)),
            },
            None => Self {
                is_async: false,
                shape: shape_of(declared),
            },
        }
    }

    fn to_info(&self) -> TokenStream2 {
        let is_async = self.is_async;
        match &self.shape {
            Shape::Unit => quote! { ::wired_rust::ReturnInfo::unit(#is_async) },
            Shape::Fallible => quote! { ::wired_rust::ReturnInfo::fallible(#is_async) },
            Shape::Other(text) => quote! { ::wired_rust::ReturnInfo::other(#is_async, #text) },
        }
    }

    fn completes(&self) -> bool {
        !matches!(self.shape, Shape::Other(_))
    }
}

fn shape_of(ty: Option<&Type>) -> Shape {
    let Some(ty) = ty else {
        return Shape::Unit;
    };
    match ty {
        Type::Tuple(tuple) if tuple.elems.is_empty() => Shape::Unit,
        Type::Paren(inner) => shape_of(Some(&inner.elem)),
        Type::Group(inner) => shape_of(Some(&inner.elem)),
        Type::Path(path) if path.qself.is_none() => {
            let is_fallible = path.path.segments.last().is_some_and(|segment| {
                segment.ident == "Result"
                    && first_type_arg(&segment.arguments).is_some_and(is_unit)
            });
            if is_fallible {
                Shape::Fallible
            } else {
                Shape::Other(ty.to_token_stream().to_string())
            }
        }
        _ => Shape::Other(ty.to_token_stream().to_string()),
    }
}

fn first_type_arg(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

fn is_unit(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}

/// `T` of a future-returning signature: `impl Future<Output = T>`,
/// `Pin<Box<dyn Future<Output = T> + ..>>` or `BoxFuture<'_, T>`.
fn future_output(ty: &Type) -> Option<&Type> {
    match ty {
        Type::ImplTrait(impl_trait) => bound_output(impl_trait.bounds.iter()),
        Type::Paren(inner) => future_output(&inner.elem),
        Type::Group(inner) => future_output(&inner.elem),
        Type::Path(path) if path.qself.is_none() => {
            let segment = path.path.segments.last()?;
            if segment.ident == "BoxFuture" {
                first_type_arg(&segment.arguments)
            } else if segment.ident == "Pin" {
                first_type_arg(&segment.arguments).and_then(boxed_dyn_output)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// `T` of `Box<dyn Future<Output = T> + ..>`.
fn boxed_dyn_output(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Box" {
        return None;
    }
    match first_type_arg(&segment.arguments)? {
        Type::TraitObject(object) => bound_output(object.bounds.iter()),
        _ => None,
    }
}

fn bound_output<'a>(mut bounds: impl Iterator<Item = &'a TypeParamBound>) -> Option<&'a Type> {
    bounds.find_map(|bound| {
        let TypeParamBound::Trait(bound) = bound else {
            return None;
        };
        let segment = bound.path.segments.last()?;
        if segment.ident != "Future" {
            return None;
        }
        let PathArguments::AngleBracketed(args) = &segment.arguments else {
            return None;
        };
        args.args.iter().find_map(|arg| match arg {
            GenericArgument::AssocType(assoc) if assoc.ident == "Output" => Some(&assoc.ty),
            _ => None,
        })
    })
}

fn is_token_type(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "CancellationToken"),
        _ => false,
    }
}

/// Typed call wrapper for the three supported shapes; `None` for anything
/// else, which discovery then rejects with a precise reason.
fn binding(name: &syn::Ident, params: &[Param], returns: &Returns) -> Option<TokenStream2> {
    if !returns.completes() || params.iter().any(|p| p.opaque) {
        return None;
    }

    match (returns.is_async, params) {
        (false, [message]) => {
            let message_ty = message.ty;
            Some(quote! {
                ::wired_rust::Binding::sync(|this: &Self, message: #message_ty| this.#name(message))
            })
        }
        (true, [message]) => {
            let message_ty = message.ty;
            Some(quote! {
                ::wired_rust::Binding::future(
                    |this: ::std::sync::Arc<Self>, message: #message_ty| async move {
                        this.#name(message).await
                    },
                )
            })
        }
        (true, [message, token]) if is_token_type(token.ty) => {
            let message_ty = message.ty;
            let token_ty = token.ty;
            Some(quote! {
                ::wired_rust::Binding::cancellable(
                    |this: ::std::sync::Arc<Self>, message: #message_ty, token: #token_ty| async move {
                        this.#name(message, token).await
                    },
                )
            })
        }
        _ => None,
    }
}
