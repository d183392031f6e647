pub mod gemini;

pub use gemini::GeminiAdvisor;

use crate::model::{ProductEntry, ShoppingAdvice};
use async_trait::async_trait;

/// Boundary to the natural-language advice service. Implementations never
/// fail outward: every error is folded into fallback advice text.
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn advise(&self, products: &[ProductEntry], use_search: bool) -> ShoppingAdvice;
}

/// Lifecycle of the single advice request the application allows at a time.
/// The only transition out of `InFlight` is `finish`/`fail`; `begin` refuses
/// re-entry while a request is outstanding.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AdviceState {
    #[default]
    Idle,
    InFlight,
    Succeeded(ShoppingAdvice),
    Failed(String),
}

impl AdviceState {
    /// Moves into `InFlight`. Returns false (and stays put) when a request
    /// is already outstanding.
    pub fn begin(&mut self) -> bool {
        if matches!(self, AdviceState::InFlight) {
            return false;
        }
        *self = AdviceState::InFlight;
        true
    }

    /// Records a completed request. Only valid while `InFlight`.
    pub fn finish(&mut self, advice: ShoppingAdvice) -> bool {
        if !matches!(self, AdviceState::InFlight) {
            return false;
        }
        *self = AdviceState::Succeeded(advice);
        true
    }

    /// Records a request that could not complete. Only valid while `InFlight`.
    pub fn fail(&mut self, reason: impl Into<String>) -> bool {
        if !matches!(self, AdviceState::InFlight) {
            return false;
        }
        *self = AdviceState::Failed(reason.into());
        true
    }

    /// Drops any previous outcome. Used when the product set is replaced.
    pub fn clear(&mut self) {
        *self = AdviceState::Idle;
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, AdviceState::InFlight)
    }

    pub fn latest(&self) -> Option<&ShoppingAdvice> {
        match self {
            AdviceState::Succeeded(advice) => Some(advice),
            _ => None,
        }
    }
}
