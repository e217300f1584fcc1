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

use crate::infrastructure::constants::{CAP_NET_ADMIN, CAP_NET_RAW, CAP_SYS_ADMIN};
use k8s_openapi::api::core::v1::{Capabilities, SecurityContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    NetAdmin,
    SysAdmin,
    NetRaw,
}

impl Capability {
    /// The complete set granted to a privileged pod
    pub const ELEVATED: [Capability; 3] = [
        Capability::NetAdmin,
        Capability::SysAdmin,
        Capability::NetRaw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::NetAdmin => CAP_NET_ADMIN,
            Capability::SysAdmin => CAP_SYS_ADMIN,
            Capability::NetRaw => CAP_NET_RAW,
        }
    }
}

pub struct SecurityContextBuilder;

impl SecurityContextBuilder {
    /// Empty context for ordinary pods, privileged with [`Capability::ELEVATED`]
    /// when the pod asks for capabilities.
    pub fn build(capability: bool) -> SecurityContext {
        if !capability {
            return SecurityContext::default();
        }

        SecurityContext {
            privileged: Some(true),
            capabilities: Some(Capabilities {
                add: Some(
                    Capability::ELEVATED
                        .iter()
                        .map(|cap| cap.as_str().to_string())
                        .collect(),
                ),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}
