use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::DispatchError;

/// Data-access actions the ORM routes through its middleware chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    FindUnique,
    FindMany,
    FindFirst,
    Create,
    CreateMany,
    Update,
    UpdateMany,
    Upsert,
    Delete,
    DeleteMany,
    ExecuteRaw,
    QueryRaw,
    Aggregate,
    Count,
}

impl Action {
    pub const ALL: [Action; 14] = [
        Action::FindUnique,
        Action::FindMany,
        Action::FindFirst,
        Action::Create,
        Action::CreateMany,
        Action::Update,
        Action::UpdateMany,
        Action::Upsert,
        Action::Delete,
        Action::DeleteMany,
        Action::ExecuteRaw,
        Action::QueryRaw,
        Action::Aggregate,
        Action::Count,
    ];

    /// Wire name, as used in event names and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::FindUnique => "findUnique",
            Action::FindMany => "findMany",
            Action::FindFirst => "findFirst",
            Action::Create => "create",
            Action::CreateMany => "createMany",
            Action::Update => "update",
            Action::UpdateMany => "updateMany",
            Action::Upsert => "upsert",
            Action::Delete => "delete",
            Action::DeleteMany => "deleteMany",
            Action::ExecuteRaw => "executeRaw",
            Action::QueryRaw => "queryRaw",
            Action::Aggregate => "aggregate",
            Action::Count => "count",
        }
    }

    /// Raw actions carry SQL instead of a model operation
    pub fn is_raw(&self) -> bool {
        matches!(self, Action::ExecuteRaw | Action::QueryRaw)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| DispatchError::UnknownAction(s.to_string()))
    }
}

/// Lifecycle phase relative to the wrapped operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum When {
    Before,
    After,
}

impl When {
    pub fn as_str(&self) -> &'static str {
        match self {
            When::Before => "before",
            When::After => "after",
        }
    }
}

impl fmt::Display for When {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for When {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(When::Before),
            "after" => Ok(When::After),
            other => Err(DispatchError::UnknownPhase(other.to_string())),
        }
    }
}

/// Operation descriptor handed to each middleware by the ORM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareParams {
    /// Target model; `None` for raw queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub action: Action,
    #[serde(default)]
    pub args: Value,
    #[serde(default)]
    pub data_path: Vec<String>,
    #[serde(default)]
    pub run_in_transaction: bool,
}

impl MiddlewareParams {
    pub fn new(model: impl Into<String>, action: Action) -> Self {
        Self {
            model: Some(model.into()),
            action,
            args: Value::Null,
            data_path: Vec::new(),
            run_in_transaction: false,
        }
    }

    /// Descriptor for an operation that targets no model (raw SQL)
    pub fn raw(action: Action) -> Self {
        Self {
            model: None,
            action,
            args: Value::Null,
            data_path: Vec::new(),
            run_in_transaction: false,
        }
    }

    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }

    pub fn with_data_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_path = path.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_transaction(mut self, run_in_transaction: bool) -> Self {
        self.run_in_transaction = run_in_transaction;
        self
    }
}

/// Filters deciding which operations produce notifications.
/// A `None` field places no restriction on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatcherOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Action>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<Vec<When>>,
}

impl DispatcherOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = Some(models.into_iter().map(Into::into).collect());
        self
    }

    pub fn actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions = Some(actions.into_iter().collect());
        self
    }

    pub fn when(mut self, when: impl IntoIterator<Item = When>) -> Self {
        self.when = Some(when.into_iter().collect());
        self
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, DispatchError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, DispatchError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load options from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, DispatchError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&source),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&source),
            _ => Err(DispatchError::Config(format!(
                "unsupported options file extension: {}",
                path.display()
            ))),
        }
    }

    pub fn allows_model(&self, model: &str) -> bool {
        match &self.models {
            Some(models) => models.iter().any(|m| m == model),
            None => true,
        }
    }

    pub fn allows_action(&self, action: Action) -> bool {
        match &self.actions {
            Some(actions) => actions.contains(&action),
            None => true,
        }
    }

    pub fn allows_phase(&self, when: When) -> bool {
        match &self.when {
            Some(phases) => phases.contains(&when),
            None => true,
        }
    }
}

/// `<model>.<when>.<action>`, e.g. `User.before.create`
pub fn event_name(model: &str, when: When, action: Action) -> String {
    format!("{}.{}.{}", model, when, action)
}

/// Whether an operation result counts as present for the after-phase.
/// `null`, `false`, zero and the empty string are falsy; arrays and objects never are.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
