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

use crate::domain::config::VortexConfig;
use crate::shared::error::{Result, VortexError};
use std::collections::HashMap;

/// Parse `-D key=value` properties
pub fn parse_dynamic_configs(properties: &[String]) -> Result<HashMap<String, String>> {
    let mut configs = HashMap::new();

    for prop in properties {
        let (key, value) = prop.split_once('=').ok_or_else(|| {
            VortexError::ConfigError(format!(
                "Invalid property '{}', expected key=value",
                prop
            ))
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(VortexError::ConfigError(format!(
                "Invalid property '{}', key is empty",
                prop
            )));
        }

        configs.insert(key.to_string(), value.trim().to_string());
    }

    Ok(configs)
}

pub fn apply_to_vortex_config(configs: &HashMap<String, String>, conf: &mut VortexConfig) {
    for (key, value) in configs {
        match key.as_str() {
            "vortex.namespace" => conf.namespace = value.clone(),
            "vortex.kubeconfig" => conf.kubeconfig = Some(value.clone()),
            "vortex.context" => conf.context = Some(value.clone()),
            "vortex.store-file" => conf.store_file = Some(value.clone()),
            "vortex.image-pull-secret" => conf.image_pull_secret = value.clone(),
            "vortex.sidecar.image" => conf.sidecar.image = value.clone(),
            "vortex.sidecar.command" => conf.sidecar.command = value.clone(),
            "vortex.sidecar.server" => conf.sidecar.server = value.clone(),
            "vortex.sidecar.socket-host-path" => conf.sidecar.socket_host_path = value.clone(),
            "vortex.sidecar.socket-mount-path" => conf.sidecar.socket_mount_path = value.clone(),
            other => tracing::warn!("Ignoring unknown property: {}", other),
        }
    }
}
