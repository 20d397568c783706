//! Wire types shared by the server and the CLI.

use serde::{Deserialize, Serialize};

/// Body of `POST /vrc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionRequest {
    /// Image name without tag, matched case-insensitively.
    pub image_name: String,
}

/// Successful answer of `POST /vrc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionResult {
    /// Engine id of the running container.
    pub container_id: String,
    /// Engine id of the image the container runs.
    pub image_id: String,
    /// Primary `repository:tag` of that image.
    pub image_repo_tag: String,
    /// Where an editor reaches the engine, e.g. `ssh://ubuntu@203.0.113.7`.
    pub docker_host: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_uses_camel_case() {
        let result = ProvisionResult {
            container_id: "c1".into(),
            image_id: "sha256:1".into(),
            image_repo_tag: "thunderbolt:latest".into(),
            docker_host: "ssh://ubuntu@127.0.0.1".into(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "containerId": "c1",
                "imageId": "sha256:1",
                "imageRepoTag": "thunderbolt:latest",
                "dockerHost": "ssh://ubuntu@127.0.0.1"
            })
        );
    }

    #[test]
    fn test_request_requires_image_name() {
        let req: ProvisionRequest = serde_json::from_str(r#"{"imageName":"web"}"#).unwrap();
        assert_eq!(req.image_name, "web");
        assert!(serde_json::from_str::<ProvisionRequest>(r#"{"image":"web"}"#).is_err());
    }
}
