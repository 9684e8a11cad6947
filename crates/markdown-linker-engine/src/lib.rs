//! # markdown-linker-engine
//!
//! Routes links clicked in a Markdown preview to editor navigation.
//!
//! ```text
//! preview click ─▶ interceptor script ─▶ MessagePipe ─▶ UiExecutor ─▶ LinkRouter
//!                                                                      │
//!                                  ┌───────────────────────────────────┤
//!                                  ▼                                   ▼
//!                       lucky resolvers (jump-*)             search dialog request
//!                                  │                                   │
//!                                  └────────▶ NavigationService ◀──────┘
//! ```
//!
//! Links take the form `mdlink://[jump-]<kind>/<path>[#L<line>]` where `kind`
//! is one of `all`, `class`, `file`, `symbol` or `action`. See [`link`] for
//! the grammar and [`targets`] for the kinds.

pub mod executor;
pub mod interceptor;
pub mod io;
pub mod link;
pub mod pipe;
pub mod provider;
pub mod resolve;
pub mod router;
pub mod targets;
pub mod workspace;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use executor::{TaskQueue, UiExecutor};
pub use interceptor::InterceptorScript;
pub use link::{LinkError, NavigationLink};
pub use pipe::{MessagePipe, Subscription};
pub use provider::{LinkExtensionProvider, LinkPreviewExtension, PreviewPanel};
pub use router::{LinkRouter, RouteOutcome, RouterOptions};
pub use targets::{TargetDescriptor, TargetKind, TargetTable};
pub use workspace::{
    FsWorkspace, NavigationError, NavigationRequest, NavigationService, Position, Project,
    RequestSink, SearchRequest,
};
