//! Thin calls into the workspace API.

use reqwest::Method;
use tracing::trace;

use crate::api_types::{DiskUsage, Replica};
use crate::error::CliError;
use crate::guard::{check, guard_api};
use crate::http_client::{encode_segment, ApiError, Client};
use crate::response::ApiResponse;

fn deployment_path(name: &str) -> String {
    format!("/api/v1/deployments/{}", encode_segment(name))
}

pub async fn get_deployment(client: &Client, name: &str) -> Result<serde_json::Value, ApiError> {
    client.get_json(&deployment_path(name), &[]).await
}

pub async fn get_replicas(client: &Client, name: &str) -> Result<Vec<Replica>, ApiError> {
    client
        .get_json(&format!("{}/replicas", deployment_path(name)), &[])
        .await
}

pub async fn delete_deployment(client: &Client, name: &str) -> Result<ApiResponse, ApiError> {
    client
        .send_raw(Method::DELETE, &deployment_path(name), &[])
        .await
}

pub async fn storage_du(client: &Client, path: &str) -> Result<DiskUsage, ApiError> {
    client
        .get_json("/api/v1/storage/du", &[("path", path)])
        .await
}

/// Public IP of a deployment that must have exactly one replica.
pub async fn only_replica_public_ip(
    client: &Client,
    name: &str,
) -> Result<Option<String>, CliError> {
    let replicas = guard_api(
        get_replicas(client, name).await,
        true,
        Some(format!(
            "Cannot obtain replica info for {name}. See error above."
        )),
    )?;
    trace!(deployment = name, ?replicas, "replicas");
    check(
        replicas.len() == 1,
        format!("Pod {name} has more than one replica. This is not supported."),
    )?;
    Ok(replicas[0].public_ip().map(str::to_string))
}
