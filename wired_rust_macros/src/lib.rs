mod handlers;

use proc_macro::TokenStream;
use quote::quote;

// ============================================================================
// #[handler] marker
// ============================================================================

/// Marks a method of a `#[handlers]` impl block as a message handler.
///
/// The attribute carries no data and leaves the method untouched; the
/// enclosing `#[handlers]` block reads it. Outside such a block it has no
/// effect.
///
/// Accepted shapes:
///
/// ```ignore
/// #[handler]
/// fn on_created(&self, event: OrderCreated) { .. }
///
/// #[handler]
/// fn on_paid(&self, event: OrderPaid) -> Result<(), BillingError> { .. }
///
/// #[handler]
/// async fn on_shipped(&self, event: OrderShipped) { .. }
///
/// #[handler]
/// async fn on_returned(&self, event: OrderReturned, token: CancellationToken) -> Result<(), E> { .. }
/// ```
///
/// Anything else is reported by discovery as a `ShapeError`.
#[proc_macro_attribute]
pub fn handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        let attr = proc_macro2::TokenStream::from(attr);
        let err = syn::Error::new_spanned(attr, "#[handler] takes no arguments").to_compile_error();
        let item = proc_macro2::TokenStream::from(item);
        return TokenStream::from(quote! { #err #item });
    }
    item
}

// ============================================================================
// #[handlers] impl block
// ============================================================================

/// Generates handler metadata for the `#[handler]` methods of an inherent
/// impl block.
///
/// # Usage
///
/// ```ignore
/// use wired_rust::{handler, handlers, CancellationToken};
///
/// #[derive(Default)]
/// struct Inventory;
///
/// #[handlers]
/// impl Inventory {
///     #[handler]
///     fn reserve(&self, command: ReserveStock) -> Result<(), StockError> { .. }
///
///     #[handler]
///     async fn restock(&self, command: Restock, token: CancellationToken) { .. }
///
///     // not a handler
///     fn level(&self, sku: &str) -> u32 { .. }
/// }
/// ```
///
/// The block is emitted unchanged, followed by:
/// - `impl wired_rust::Handlers for Inventory`, listing each marked method
///   with its parameter and return metadata and a typed call wrapper;
/// - a link-time registration of `Inventory` (feature `inventory`), picked
///   up by `ComponentUnit::collect`.
///
/// Generic impl blocks, generic methods and methods without a `&self`
/// receiver are rejected at compile time. One `#[handlers]` block per type.
#[proc_macro_attribute]
pub fn handlers(attr: TokenStream, item: TokenStream) -> TokenStream {
    handlers::expand(attr, item)
}
