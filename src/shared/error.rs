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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, VortexError>;

#[derive(Error, Debug)]
pub enum VortexError {
    #[error("The {kind} named {name} doesn't exist")]
    ReferenceNotFound { kind: String, name: String },

    #[error("delete the volume [{volume}] fail, since the following pods still use it: {}", .pods.join(","))]
    DependencyConflict { volume: String, pods: Vec<String> },

    #[error("Unsupported pod network type: {0}")]
    UnsupportedNetworkType(String),

    #[error("{context}: {message}")]
    Upstream { context: String, message: String },

    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Coarse classification used by the transport boundary to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ReferenceNotFound,
    DependencyConflict,
    UnsupportedMode,
    UpstreamFailure,
    InvalidInput,
}

impl From<kube::Error> for VortexError {
    fn from(err: kube::Error) -> Self {
        VortexError::upstream("Kubernetes API error", err)
    }
}

impl VortexError {
    pub fn reference_not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::ReferenceNotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn dependency_conflict(volume: impl Into<String>, pods: Vec<String>) -> Self {
        Self::DependencyConflict {
            volume: volume.into(),
            pods,
        }
    }

    pub fn upstream(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Upstream {
            context: context.into(),
            message: err.to_string(),
        }
    }

    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ReferenceNotFound { .. } => ErrorKind::ReferenceNotFound,
            Self::DependencyConflict { .. } => ErrorKind::DependencyConflict,
            Self::UnsupportedNetworkType(_) => ErrorKind::UnsupportedMode,
            Self::Upstream { .. } | Self::Io(_) => ErrorKind::UpstreamFailure,
            Self::InvalidResource(_)
            | Self::ConfigError(_)
            | Self::YamlParse(_)
            | Self::TomlParse(_)
            | Self::JsonParse(_) => ErrorKind::InvalidInput,
        }
    }
}
