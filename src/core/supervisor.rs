//! Instance supervisor: owns every polling instance and its lifecycle.
//!
//! ```text
//! create(config) ──► validate ──► ResultStore(UNKNOWN) ──► scheduler::start
//!
//! reconfigure(id, config)
//!   ├─ invalid            ─► error, nothing changes
//!   ├─ action/params diff ─► stop old scheduler, start new one (same store)
//!   ├─ interval diff      ─► update_interval
//!   └─ identical          ─► no-op
//!
//! remove(id) ──► stop scheduler ──► drop store (subscriber streams end)
//! ```
//!
//! The instance map is the only mutation path; there is no ambient global
//! registry. Instances are independent and never lock each other.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::{PollConfig, SupervisorConfig};
use crate::core::scheduler::{self, PollJob, SchedulerHandle};
use crate::core::stats::InstanceCounters;
use crate::core::{
    ActionInvoker, BridgeError, InstanceStats, PollResult, ResultStore, ResultStream, Spawn,
};
use crate::runtime::api::{self, Attributes, Diagnostics};
use crate::util::serde::InstanceId;

struct Instance {
    config: PollConfig,
    store: Arc<ResultStore>,
    counters: Arc<InstanceCounters>,
    scheduler: SchedulerHandle,
}

/// Supervises a set of polling instances sharing one action invoker.
pub struct Supervisor<S: Spawn> {
    config: SupervisorConfig,
    invoker: Arc<dyn ActionInvoker>,
    spawner: S,
    instances: RwLock<HashMap<InstanceId, Instance>>,
}

impl<S: Spawn> Supervisor<S> {
    /// Create a supervisor.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigValidation`] if `config` is invalid.
    pub fn new(
        config: SupervisorConfig,
        invoker: Arc<dyn ActionInvoker>,
        spawner: S,
    ) -> Result<Self, BridgeError> {
        config.validate()?;
        Ok(Self {
            config,
            invoker,
            spawner,
            instances: RwLock::new(HashMap::new()),
        })
    }

    /// Supervisor-wide settings.
    #[must_use]
    pub const fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// Validate `config`, seed a store at UNKNOWN and start polling.
    ///
    /// # Errors
    ///
    /// Returns a validation error; no instance is created in that case.
    pub fn create(&self, config: PollConfig) -> Result<InstanceId, BridgeError> {
        config.validate(&self.config)?;

        let id = InstanceId::new();
        let store = Arc::new(ResultStore::new(PollResult::unknown(
            config.action_id.clone(),
        )));
        let counters = Arc::new(InstanceCounters::default());
        let handle = self.start_scheduler(&config, &store, &counters);

        info!(
            instance = %id,
            action = %config.action_id,
            interval_secs = config.interval_seconds,
            "instance created"
        );
        self.instances.write().insert(
            id,
            Instance {
                config,
                store,
                counters,
                scheduler: handle,
            },
        );
        Ok(id)
    }

    /// Apply a new configuration to an existing instance.
    ///
    /// Action or parameter changes restart the scheduler; the old
    /// scheduler's in-flight call can no longer write. Interval-only changes
    /// reschedule the running timer.
    ///
    /// # Errors
    ///
    /// Returns a validation error (the old config stays active) or
    /// [`BridgeError::NotFound`].
    pub fn reconfigure(&self, id: InstanceId, config: PollConfig) -> Result<(), BridgeError> {
        config.validate(&self.config)?;

        let mut instances = self.instances.write();
        let instance = instances.get_mut(&id).ok_or(BridgeError::NotFound(id))?;

        if instance.config.requires_restart(&config) {
            instance.scheduler.stop();
            instance.scheduler = self.start_scheduler(&config, &instance.store, &instance.counters);
            info!(
                instance = %id,
                action = %config.action_id,
                "instance restarted with new action configuration"
            );
        } else if instance.config.interval_seconds != config.interval_seconds {
            instance.scheduler.update_interval(config.interval());
            info!(
                instance = %id,
                interval_secs = config.interval_seconds,
                "instance interval updated"
            );
        } else {
            debug!(instance = %id, "reconfigure with identical config ignored");
        }
        instance.config = config;
        Ok(())
    }

    /// Options-change notification: only the interval changes.
    ///
    /// # Errors
    ///
    /// Same as [`Supervisor::reconfigure`].
    pub fn update_interval(&self, id: InstanceId, interval_seconds: u64) -> Result<(), BridgeError> {
        let next = self.config_of(id)?.with_interval(interval_seconds);
        self.reconfigure(id, next)
    }

    /// Stop the instance and release its store.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] for an unknown id.
    pub fn remove(&self, id: InstanceId) -> Result<(), BridgeError> {
        let instance = self
            .instances
            .write()
            .remove(&id)
            .ok_or(BridgeError::NotFound(id))?;
        instance.scheduler.stop();
        info!(instance = %id, action = %instance.config.action_id, "instance removed");
        Ok(())
    }

    /// Latest result of an instance.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] for an unknown id.
    pub fn get(&self, id: InstanceId) -> Result<Arc<PollResult>, BridgeError> {
        self.with_instance(id, |i| i.store.read())
    }

    /// Stream of results for an instance, starting with the current one.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] for an unknown id.
    pub fn subscribe(&self, id: InstanceId) -> Result<ResultStream, BridgeError> {
        self.with_instance(id, |i| i.store.subscribe())
    }

    /// Manual refresh: invoke now unless a call is already in flight.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] for an unknown id.
    pub fn refresh(&self, id: InstanceId) -> Result<(), BridgeError> {
        self.with_instance(id, |i| i.scheduler.trigger_now())
    }

    /// Active configuration of an instance.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] for an unknown id.
    pub fn config_of(&self, id: InstanceId) -> Result<PollConfig, BridgeError> {
        self.with_instance(id, |i| i.config.clone())
    }

    /// State scalar of an instance: `ok`, `error` or `unknown`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] for an unknown id.
    pub fn state(&self, id: InstanceId) -> Result<&'static str, BridgeError> {
        self.with_instance(id, |i| api::state(&i.store.read()))
    }

    /// Attribute bundle of an instance.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] for an unknown id.
    pub fn attributes(&self, id: InstanceId) -> Result<Attributes, BridgeError> {
        self.with_instance(id, |i| Attributes::from_result(&i.store.read()))
    }

    /// Whether the most recent completed call succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] for an unknown id.
    pub fn is_connected(&self, id: InstanceId) -> Result<bool, BridgeError> {
        self.with_instance(id, |i| i.store.read().is_ok())
    }

    /// Polling statistics of an instance.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] for an unknown id.
    pub fn stats(&self, id: InstanceId) -> Result<InstanceStats, BridgeError> {
        self.with_instance(id, |i| i.counters.snapshot())
    }

    /// Diagnostics snapshot with sensitive parameters redacted.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] for an unknown id.
    pub fn diagnostics(&self, id: InstanceId) -> Result<Diagnostics, BridgeError> {
        self.with_instance(id, |i| {
            Diagnostics::build(
                id,
                &i.config,
                i.scheduler.interval().as_secs(),
                &i.store.read(),
                i.scheduler.is_in_flight(),
                i.counters.snapshot(),
            )
        })
    }

    /// Ids of all live instances, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<InstanceId> {
        let mut ids: Vec<InstanceId> = self.instances.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.read().len()
    }

    /// Whether no instance is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.read().is_empty()
    }

    /// Stop and remove every instance.
    pub fn shutdown(&self) {
        let drained: Vec<(InstanceId, Instance)> = self.instances.write().drain().collect();
        for (_, instance) in &drained {
            instance.scheduler.stop();
        }
        info!(count = drained.len(), "supervisor shut down");
    }

    fn with_instance<T>(
        &self,
        id: InstanceId,
        f: impl FnOnce(&Instance) -> T,
    ) -> Result<T, BridgeError> {
        self.instances
            .read()
            .get(&id)
            .map(f)
            .ok_or(BridgeError::NotFound(id))
    }

    fn start_scheduler(
        &self,
        config: &PollConfig,
        store: &Arc<ResultStore>,
        counters: &Arc<InstanceCounters>,
    ) -> SchedulerHandle {
        let job = PollJob {
            action_id: config.action_id.clone(),
            parameters: config.parameters.clone(),
            interval: config.interval(),
            timeout: self.invocation_timeout(),
        };
        scheduler::start_with_counters(
            &self.spawner,
            job,
            Arc::clone(&self.invoker),
            Arc::clone(store),
            Arc::clone(counters),
        )
    }

    const fn invocation_timeout(&self) -> Duration {
        self.config.invocation_timeout()
    }
}
