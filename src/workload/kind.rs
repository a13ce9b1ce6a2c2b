//! Workload kinds and where their pod templates live.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// PathDescriptor is the ordered list of keys leading from a document's root
/// to its workload template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathDescriptor {
    keys: &'static [&'static str],
}

impl PathDescriptor {
    pub const fn new(keys: &'static [&'static str]) -> Self {
        PathDescriptor { keys }
    }

    pub fn keys(&self) -> &'static [&'static str] {
        self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Display for PathDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keys.join("."))
    }
}

const SPEC_TEMPLATE: PathDescriptor = PathDescriptor::new(&["spec", "template"]);
const JOB_TEMPLATE: PathDescriptor = PathDescriptor::new(&["spec", "jobTemplate", "spec", "template"]);

/// WorkloadKind enumerates the kinds whose documents embed a pod template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
    DaemonSet,
    Job,
    ReplicaSet,
    ReplicationController,
    CronJob,
    /// A Pod is its own template.
    Pod,
}

static KINDS_BY_NAME: Lazy<HashMap<&'static str, WorkloadKind>> = Lazy::new(|| {
    WorkloadKind::all()
        .iter()
        .map(|kind| (kind.as_str(), *kind))
        .collect()
});

impl WorkloadKind {
    pub fn all() -> &'static [WorkloadKind] {
        &[
            WorkloadKind::Deployment,
            WorkloadKind::StatefulSet,
            WorkloadKind::DaemonSet,
            WorkloadKind::Job,
            WorkloadKind::ReplicaSet,
            WorkloadKind::ReplicationController,
            WorkloadKind::CronJob,
            WorkloadKind::Pod,
        ]
    }

    /// Looks up a kind label such as `"StatefulSet"`. Matching is exact.
    pub fn from_kind(kind: &str) -> Option<WorkloadKind> {
        KINDS_BY_NAME.get(kind).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkloadKind::Deployment => "Deployment",
            WorkloadKind::StatefulSet => "StatefulSet",
            WorkloadKind::DaemonSet => "DaemonSet",
            WorkloadKind::Job => "Job",
            WorkloadKind::ReplicaSet => "ReplicaSet",
            WorkloadKind::ReplicationController => "ReplicationController",
            WorkloadKind::CronJob => "CronJob",
            WorkloadKind::Pod => "Pod",
        }
    }

    /// Returns the path to the workload template, or `None` for Pod.
    pub fn template_path(self) -> Option<PathDescriptor> {
        match self {
            WorkloadKind::Deployment
            | WorkloadKind::StatefulSet
            | WorkloadKind::DaemonSet
            | WorkloadKind::Job
            | WorkloadKind::ReplicaSet
            | WorkloadKind::ReplicationController => Some(SPEC_TEMPLATE),
            WorkloadKind::CronJob => Some(JOB_TEMPLATE),
            WorkloadKind::Pod => None,
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("kind {kind:?} is not a workload kind")]
pub struct UnknownKindError {
    pub kind: String,
}

impl FromStr for WorkloadKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkloadKind::from_kind(s).ok_or_else(|| UnknownKindError { kind: s.to_string() })
    }
}
