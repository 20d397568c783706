//! Launching the local editor against a provisioned container.
//!
//! The editor is attached through a `vscode-remote://attached-container+…`
//! folder URI and pointed at the remote engine with `DOCKER_HOST`. It is
//! started detached: nothing waits on it or looks at its exit status.

use serde::Serialize;
use std::process::{Command, Stdio};

/// Editor binary used when `VRC_EDITOR` is unset.
pub const DEFAULT_EDITOR: &str = "code";

/// Folder opened inside the container.
const CONTAINER_FOLDER: &str = "/com.docker.devenvironments.code";

/// Errors starting the editor.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("failed to encode container descriptor: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to launch {editor}: {source}")]
    Spawn {
        editor: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachedContainer<'a> {
    container_name: &'a str,
}

/// A launched editor process. Holds no handle to the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetachedEditor {
    /// OS process id at launch time.
    pub pid: u32,
}

/// Build the folder URI that attaches the editor to `container_id`.
pub fn folder_uri(container_id: &str) -> Result<String, EditorError> {
    let name = format!("/{container_id}");
    let descriptor = serde_json::to_string(&AttachedContainer {
        container_name: &name,
    })?;
    Ok(format!(
        "vscode-remote://attached-container+{}{CONTAINER_FOLDER}",
        hex::encode(descriptor)
    ))
}

/// Command line shown to the user before launching.
pub fn command_line(editor: &str, uri: &str) -> String {
    format!("{editor} --folder-uri={uri}")
}

/// Start `editor` on the folder `uri` (see [`folder_uri`]) with
/// `DOCKER_HOST=docker_host`.
///
/// Returns as soon as the process is spawned. The child's stdio is
/// detached and, on Unix, it gets its own process group so it outlives the
/// terminal session of this CLI.
pub fn launch_detached(
    editor: &str,
    docker_host: &str,
    uri: &str,
) -> Result<DetachedEditor, EditorError> {
    let mut command = Command::new(editor);
    command
        .arg(format!("--folder-uri={uri}"))
        .env("DOCKER_HOST", docker_host)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let child = command.spawn().map_err(|source| EditorError::Spawn {
        editor: editor.to_string(),
        source,
    })?;

    let pid = child.id();
    tracing::debug!(pid, %editor, %docker_host, "Editor launched");
    // Dropping a std Child neither waits on nor kills the process.
    drop(child);

    Ok(DetachedEditor { pid })
}
