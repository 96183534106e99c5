use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Replica {
    #[serde(default)]
    pub metadata: Option<ReplicaMetadata>,
    #[serde(default)]
    pub status: Option<ReplicaStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReplicaMetadata {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReplicaStatus {
    pub state: Option<ReplicaState>,
    pub public_ip: Option<String>,
    pub private_ip: Option<String>,
}

impl Replica {
    pub fn public_ip(&self) -> Option<&str> {
        self.status.as_ref()?.public_ip.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicaState {
    Starting,
    Ready,
    NotReady,
    Failed,
    Unknown(String),
}

impl<'de> Deserialize<'de> for ReplicaState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "starting" => Self::Starting,
            "ready" => Self::Ready,
            "not_ready" => Self::NotReady,
            "failed" => Self::Failed,
            _ => Self::Unknown(value),
        })
    }
}

impl Serialize for ReplicaState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl ReplicaState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::NotReady => "not_ready",
            Self::Failed => "failed",
            Self::Unknown(v) => v.as_str(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskUsage {
    pub path: Option<String>,
    pub size_bytes: u64,
}
