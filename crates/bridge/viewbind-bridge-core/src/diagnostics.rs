use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use viewbind_api_core::PropertyKind;

use crate::error::RuntimeError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsCfg {
    pub enabled: bool,
    /// Log mutation failures that the gateway recovers from.
    pub log_mutation_failures: bool,
}

impl Default for DiagnosticsCfg {
    fn default() -> Self {
        DiagnosticsCfg {
            enabled: true,
            log_mutation_failures: true,
        }
    }
}

/// Which handle a swallowed mutation failure was raised against.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FailureStage {
    CachedHandle,
    FreshHandle,
}

/// A mutation the gateway caught and did not surface to its caller.
#[derive(Clone, Debug, PartialEq)]
pub struct MutationFailure {
    pub kind: PropertyKind,
    pub path: String,
    pub stage: FailureStage,
    pub error: RuntimeError,
}

impl fmt::Display for MutationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self.stage {
            FailureStage::CachedHandle => "cached",
            FailureStage::FreshHandle => "fresh",
        };
        write!(
            f,
            "{} mutation at '{}' failed on {} handle: {}",
            self.kind, self.path, stage, self.error
        )
    }
}

pub type FailureHook = Rc<dyn Fn(&MutationFailure)>;

/// Channel for failures the bridge recovers from locally.
#[derive(Clone, Default)]
pub struct Diagnostics {
    cfg: DiagnosticsCfg,
    hook: Option<FailureHook>,
}

impl Diagnostics {
    pub fn new(cfg: DiagnosticsCfg) -> Self {
        Self { cfg, hook: None }
    }

    pub fn with_hook(mut self, hook: impl Fn(&MutationFailure) + 'static) -> Self {
        self.hook = Some(Rc::new(hook));
        self
    }

    pub fn cfg(&self) -> &DiagnosticsCfg {
        &self.cfg
    }

    pub fn report(&self, failure: &MutationFailure) {
        if !self.cfg.enabled {
            return;
        }
        if self.cfg.log_mutation_failures {
            log::warn!("{failure}");
        }
        if let Some(hook) = &self.hook {
            hook(failure);
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("cfg", &self.cfg)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn failure() -> MutationFailure {
        MutationFailure {
            kind: PropertyKind::Number,
            path: "count".into(),
            stage: FailureStage::CachedHandle,
            error: RuntimeError::StaleHandle,
        }
    }

    #[test]
    fn hook_receives_reports() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let diag = Diagnostics::new(DiagnosticsCfg::default())
            .with_hook(move |f| sink.borrow_mut().push(f.to_string()));
        diag.report(&failure());
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            "number mutation at 'count' failed on cached handle: stale property handle"
        );
    }

    #[test]
    fn disabled_diagnostics_are_silent() {
        let hits = Rc::new(RefCell::new(0));
        let sink = hits.clone();
        let diag = Diagnostics::new(DiagnosticsCfg {
            enabled: false,
            log_mutation_failures: true,
        })
        .with_hook(move |_| *sink.borrow_mut() += 1);
        diag.report(&failure());
        assert_eq!(*hits.borrow(), 0);
    }
}
