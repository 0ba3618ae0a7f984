//! Progress notification port
//!
//! Defines the interface for reporting progress while providers are queried.

use dilemma_domain::ProviderId;

/// Callback for progress updates during an evaluation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console spinner, server logs, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once the enabled providers have been dispatched
    fn on_dispatch(&self, providers: &[ProviderId]);

    /// Called when one provider has settled
    fn on_provider_complete(&self, provider: ProviderId, success: bool);

    /// Called after every provider has settled
    fn on_complete(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_dispatch(&self, _providers: &[ProviderId]) {}
    fn on_provider_complete(&self, _provider: ProviderId, _success: bool) {}
}
