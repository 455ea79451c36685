//! Builder for constructing machines.

use crate::builder::config::HsmConfig;
use crate::core::State;
use crate::machine::{Hsm, HsmError, MachineHook};
use crate::registry::StateRegistry;
use stillwater::validation::Validation;

/// Builder for constructing machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use hsm::builder::HsmBuilder;
/// use hsm::core::{Signal, SignalStatus, State, StateHandler};
/// use hsm::machine::Context;
///
/// struct Idle;
///
/// impl StateHandler for Idle {
///     fn on_signal(&self, _ctx: &mut Context<'_>, _signal: Signal) -> SignalStatus {
///         SignalStatus::Handled
///     }
/// }
///
/// static IDLE: State = State::new("Idle", 0, None, &Idle);
///
/// let hsm = HsmBuilder::new()
///     .name("idler")
///     .top(&IDLE)
///     .on_entry(|hsm| println!("{} starting", hsm.name()))
///     .history_limit(16)
///     .build()
///     .unwrap();
///
/// hsm.enter().unwrap();
/// assert_eq!(hsm.current_state(), 0);
/// ```
pub struct HsmBuilder {
    top: Option<&'static State>,
    on_entry: Option<MachineHook>,
    on_exit: Option<MachineHook>,
    config: HsmConfig,
    registry: Option<StateRegistry>,
}

impl HsmBuilder {
    pub fn new() -> Self {
        Self {
            top: None,
            on_entry: None,
            on_exit: None,
            config: HsmConfig::default(),
            registry: None,
        }
    }

    /// Set the top state (required).
    pub fn top(mut self, state: &'static State) -> Self {
        self.top = Some(state);
        self
    }

    /// Hook run once per `enter`, before the top state's entry callback.
    pub fn on_entry<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Hsm) + Send + Sync + 'static,
    {
        self.on_entry = Some(Box::new(hook));
        self
    }

    /// Hook run once per `exit`, after the current state's exit callback.
    pub fn on_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Hsm) + Send + Sync + 'static,
    {
        self.on_exit = Some(Box::new(hook));
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: HsmConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate these states at build time. The top state must be among
    /// them.
    pub fn registry(mut self, registry: StateRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the machine.
    pub fn build(self) -> Result<Hsm, HsmError> {
        let top = self
            .top
            .ok_or(HsmError::InvalidArgument("top state not specified. Call .top(state)"))?;

        if let Some(registry) = &self.registry {
            if !registry.contains(top) {
                return Err(HsmError::InvalidArgument(
                    "top state is not part of the registry",
                ));
            }
            if let Validation::Failure(violations) = registry.validate() {
                return Err(HsmError::InvalidRegistry(violations.iter().cloned().collect()));
            }
        }

        Hsm::with_config(Some(top), self.on_entry, self.on_exit, self.config)
    }
}

impl Default for HsmBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Signal, SignalStatus, StateHandler};
    use crate::machine::Context;
    use crate::registry::RegistryViolation;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Inert;

    impl StateHandler for Inert {
        fn on_signal(&self, _ctx: &mut Context<'_>, _signal: Signal) -> SignalStatus {
            SignalStatus::NotHandled
        }
    }

    static A: State = State::new("A", 1, None, &Inert);
    static B: State = State::new("B", 2, Some(&A), &Inert);
    static B_AGAIN: State = State::new("BAgain", 2, Some(&A), &Inert);

    #[test]
    fn builder_validates_required_fields() {
        let result = HsmBuilder::new().build();

        assert!(matches!(result, Err(HsmError::InvalidArgument(_))));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let entries = Arc::new(AtomicUsize::new(0));
        let exits = Arc::new(AtomicUsize::new(0));
        let (e, x) = (Arc::clone(&entries), Arc::clone(&exits));

        let hsm = HsmBuilder::new()
            .top(&B)
            .name("fluent")
            .history_limit(4)
            .on_entry(move |_| {
                e.fetch_add(1, Ordering::SeqCst);
            })
            .on_exit(move |_| {
                x.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        assert_eq!(hsm.name(), "fluent");
        hsm.enter().unwrap();
        hsm.exit().unwrap();

        assert_eq!(entries.load(Ordering::SeqCst), 1);
        assert_eq!(exits.load(Ordering::SeqCst), 1);
        assert_eq!(hsm.history().unwrap().limit(), 4);
    }

    #[test]
    fn config_replaces_name_and_limit() {
        let hsm = HsmBuilder::new()
            .name("ignored")
            .config(HsmConfig {
                name: "configured".into(),
                history_limit: 2,
            })
            .top(&A)
            .build()
            .unwrap();

        assert_eq!(hsm.name(), "configured");
        assert_eq!(hsm.history().unwrap().limit(), 2);
    }

    #[test]
    fn registry_must_contain_top() {
        let result = HsmBuilder::new()
            .top(&B)
            .registry(StateRegistry::new().with(&A))
            .build();

        assert!(matches!(result, Err(HsmError::InvalidArgument(_))));
    }

    #[test]
    fn invalid_registry_is_rejected() {
        let result = HsmBuilder::new()
            .top(&A)
            .registry(StateRegistry::new().with(&A).with(&B).with(&B_AGAIN))
            .build();

        match result {
            Err(HsmError::InvalidRegistry(violations)) => {
                assert!(violations
                    .iter()
                    .any(|v| matches!(v, RegistryViolation::DuplicateId { id: 2, .. })));
            }
            other => panic!("expected registry rejection, got {:?}", other),
        }
    }

    #[test]
    fn valid_registry_builds() {
        let hsm = HsmBuilder::new()
            .top(&A)
            .registry(StateRegistry::new().with(&A).with(&B))
            .build();

        assert!(hsm.is_ok());
    }
}
