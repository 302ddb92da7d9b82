//! Offload trait for background task execution.
//!
//! This module provides the [`Offload`] trait which abstracts over
//! different implementations for spawning background tasks.

use std::future::Future;

use smol_str::SmolStr;

/// Trait for spawning background tasks.
///
/// Routes use this to hand off work that must not delay the reply to the
/// caller, such as delivering a write to replicas other than the one whose
/// reply is returned.
///
/// # Ownership
///
/// The spawned future is `'static`: it must own everything it touches. A
/// caller may return, and its request may be dropped, before the task runs.
///
/// # Clone bound
///
/// Implementors should use `Arc` internally to ensure all cloned instances
/// share the same configuration and state.
///
/// # Example
///
/// ```ignore
/// use keysplit_core::Offload;
///
/// fn offload_delete<O: Offload>(offload: &O, child: SharedRoute, req: Request) {
///     offload.spawn("fanout", async move {
///         let _ = child.route(&req).await;
///     });
/// }
/// ```
pub trait Offload: Send + Sync + Clone {
    /// Spawn a future to be executed in the background.
    ///
    /// # Arguments
    ///
    /// * `kind` - A label categorizing the task type (e.g., "fanout").
    ///   Used for metrics and tracing.
    /// * `future` - The future to execute in the background. Must be `Send + 'static`
    ///   as it may be executed on a different thread.
    fn spawn<F>(&self, kind: impl Into<SmolStr>, future: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
