// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::infrastructure::constants::{
    CONTROL_SOCKET_HOST_PATH, CONTROL_SOCKET_MOUNT_PATH, DEFAULT_NAMESPACE, IMAGE_PULL_SECRET,
    SIDECAR_COMMAND, SIDECAR_IMAGE, SIDECAR_SERVER_ENDPOINT,
};
use crate::shared::error::{Result, VortexError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VortexConfig {
    /// Namespace for claims and for pods that declare none
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// YAML seed for the document store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_file: Option<String>,
    pub image_pull_secret: String,
    pub sidecar: SidecarConfig,
}

impl Default for VortexConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            kubeconfig: None,
            context: None,
            store_file: None,
            image_pull_secret: IMAGE_PULL_SECRET.to_string(),
            sidecar: SidecarConfig::default(),
        }
    }
}

/// Network attachment sidecar settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SidecarConfig {
    pub image: String,
    pub command: String,
    pub server: String,
    pub socket_host_path: String,
    pub socket_mount_path: String,
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            image: SIDECAR_IMAGE.to_string(),
            command: SIDECAR_COMMAND.to_string(),
            server: SIDECAR_SERVER_ENDPOINT.to_string(),
            socket_host_path: CONTROL_SOCKET_HOST_PATH.to_string(),
            socket_mount_path: CONTROL_SOCKET_MOUNT_PATH.to_string(),
        }
    }
}

impl VortexConfig {
    pub fn from<T: AsRef<str>>(path: T) -> Result<Self> {
        let path = Path::new(path.as_ref());
        let content = std::fs::read_to_string(path).map_err(|e| {
            VortexError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let conf: VortexConfig = toml::from_str(&content)?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_k8s_name(&self.namespace) {
            return Err(VortexError::ConfigError(format!(
                "Invalid namespace: {}",
                self.namespace
            )));
        }

        if self.sidecar.image.trim().is_empty() {
            return Err(VortexError::config_error("sidecar.image must not be empty"));
        }

        if self.sidecar.command.trim().is_empty() {
            return Err(VortexError::config_error(
                "sidecar.command must not be empty",
            ));
        }

        if !self.sidecar.server.starts_with("unix://") {
            return Err(VortexError::ConfigError(format!(
                "sidecar.server must be a unix:// socket URI: {}",
                self.sidecar.server
            )));
        }

        if !Path::new(&self.sidecar.socket_host_path).is_absolute() {
            return Err(VortexError::ConfigError(format!(
                "sidecar.socket_host_path must be absolute: {}",
                self.sidecar.socket_host_path
            )));
        }

        if self.image_pull_secret.trim().is_empty() {
            return Err(VortexError::config_error(
                "image_pull_secret must not be empty",
            ));
        }

        Ok(())
    }
}

/// DNS-1123 label check used for namespaces
pub(crate) fn is_valid_k8s_name(name: &str) -> bool {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    let re = LABEL.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("DNS-1123 label pattern")
    });
    name.len() <= 63 && re.is_match(name)
}

/// DNS-1123 subdomain check used for pod names: dot-separated labels, 253 chars max
pub(crate) fn is_valid_k8s_subdomain(name: &str) -> bool {
    static SUBDOMAIN: OnceLock<Regex> = OnceLock::new();
    let re = SUBDOMAIN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
            .expect("DNS-1123 subdomain pattern")
    });
    name.len() <= 253 && re.is_match(name)
}
