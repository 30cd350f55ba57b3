//! Metric label computation.
//!
//! Converts a bare metric name into its fully qualified form, e.g.
//! `duration` → `<namespace>.<action>.<activation>.duration`.

use crate::config::MeterConfig;

/// Env var holding the namespace of the executing action.
pub const NAMESPACE_VAR: &str = "GRID_NAMESPACE";
/// Env var holding the qualified action name, of the form
/// `/<namespace>/[<package>/]<action>`.
pub const ACTION_NAME_VAR: &str = "GRID_ACTION_NAME";
/// Env var holding the activation id of the current invocation.
pub const ACTIVATION_ID_VAR: &str = "GRID_ACTIVATION_ID";

/// Identity of the executing action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity {
    pub namespace: String,
    /// Fully qualified: `/<namespace>/[<package>/]<action>`.
    pub action_name: String,
    pub activation_id: String,
}

/// Source of the current [`Identity`].
///
/// Queried once per invocation, so labels reflect the identity at call
/// time rather than whatever it was when the wrapper was built.
pub trait IdentitySource: Send + Sync {
    fn identity(&self) -> Identity;
}

/// A fixed identity is its own source.
impl IdentitySource for Identity {
    fn identity(&self) -> Identity {
        self.clone()
    }
}

/// Reads identity from the `GRID_*` environment variables, defaulting
/// each field to the empty string.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvIdentity;

impl IdentitySource for EnvIdentity {
    fn identity(&self) -> Identity {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        Identity {
            namespace: var(NAMESPACE_VAR),
            action_name: var(ACTION_NAME_VAR),
            activation_id: var(ACTIVATION_ID_VAR),
        }
    }
}

// '.' is the structural separator in metric names; a literal dot inside
// a namespace or action name would split path segments downstream.
fn escape(field: &str) -> String {
    field.replace('.', "_")
}

/// Compute the fully qualified label for one metric name.
///
/// Joins the escaped namespace, the escaped unqualified action name
/// (the portion of the qualified name after `/<namespace>/`), the
/// activation id, and the raw metric name with `.`. When
/// `ignore_activation_ids` is set, the activation segment and its
/// separator are omitted entirely. Only `.` is escaped, only in the
/// namespace and action name.
pub fn label(identity: &Identity, config: &MeterConfig, name: &str) -> String {
    let ns = &identity.namespace;
    // Strip the `/<namespace>/` prefix by length; a malformed qualified
    // name degrades to an empty action segment.
    let action = identity
        .action_name
        .get(ns.len() + 2..)
        .unwrap_or_default();

    if config.ignore_activation_ids {
        format!("{}.{}.{}", escape(ns), escape(action), name)
    } else {
        format!(
            "{}.{}.{}.{}",
            escape(ns),
            escape(action),
            identity.activation_id,
            name
        )
    }
}
