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

//! Environment variable builder
//!
//! Sidecars receive the pod identity through the downward API; application
//! containers receive the pod's declared variables. Declared variables are
//! emitted sorted by name so repeated synthesis yields identical manifests.

use crate::infrastructure::constants::{
    ENV_POD_NAME, ENV_POD_NAMESPACE, ENV_POD_UUID, FIELD_PATH_NAME, FIELD_PATH_NAMESPACE,
    FIELD_PATH_UID,
};
use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, ObjectFieldSelector};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
pub struct EnvironmentBuilder {
    pod_identity: bool,
    custom_vars: BTreeMap<String, String>,
}

impl EnvironmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject `POD_NAME`, `POD_NAMESPACE` and `POD_UUID` from the pod metadata
    pub fn with_pod_identity(mut self) -> Self {
        self.pod_identity = true;
        self
    }

    pub fn with_custom_vars(mut self, vars: &HashMap<String, String>) -> Self {
        self.custom_vars
            .extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn build(self) -> Vec<EnvVar> {
        let mut env_vars = Vec::new();
        if self.pod_identity {
            env_vars.extend(Self::build_identity_env_vars());
        }
        env_vars.extend(self.build_custom_env_vars());
        env_vars
    }

    fn build_identity_env_vars() -> Vec<EnvVar> {
        [
            (ENV_POD_NAME, FIELD_PATH_NAME),
            (ENV_POD_NAMESPACE, FIELD_PATH_NAMESPACE),
            (ENV_POD_UUID, FIELD_PATH_UID),
        ]
        .into_iter()
        .map(|(name, field_path)| EnvVar {
            name: name.to_string(),
            value_from: Some(EnvVarSource {
                field_ref: Some(ObjectFieldSelector {
                    field_path: field_path.to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        })
        .collect()
    }

    fn build_custom_env_vars(&self) -> Vec<EnvVar> {
        self.custom_vars
            .iter()
            .map(|(key, value)| EnvVar {
                name: key.clone(),
                value: Some(value.clone()),
                ..Default::default()
            })
            .collect()
    }
}
