//! Build a supervisor and its instances from a [`BridgeConfig`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::core::{ActionInvoker, BridgeError, Spawn, Supervisor};
use crate::util::serde::InstanceId;

/// Build a supervisor and start one instance per configured entry.
///
/// Returns the supervisor together with the instance name → id mapping.
/// Nothing is started when validation fails.
///
/// # Errors
///
/// Returns the first validation error of the configuration.
pub fn build_supervisor<S: Spawn>(
    cfg: &BridgeConfig,
    invoker: Arc<dyn ActionInvoker>,
    spawner: S,
) -> Result<(Supervisor<S>, HashMap<String, InstanceId>), BridgeError> {
    cfg.validate()?;

    let supervisor = Supervisor::new(cfg.supervisor.clone(), invoker, spawner)?;
    let mut ids = HashMap::with_capacity(cfg.instances.len());
    for (name, poll) in &cfg.instances {
        let id = supervisor.create(poll.clone())?;
        tracing::debug!(instance = %id, %name, "configured instance started");
        ids.insert(name.clone(), id);
    }

    Ok((supervisor, ids))
}
