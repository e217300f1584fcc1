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

use crate::infrastructure::constants::CLAIM_NAME_PREFIX;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub name: String,
    pub storage_name: String,
    #[serde(default = "default_access_mode")]
    pub access_mode: String,
    pub capacity: String,
}

fn default_access_mode() -> String {
    "ReadWriteOnce".to_string()
}

impl Volume {
    /// Name of the persistent claim backing this volume
    pub fn claim_name(&self) -> String {
        format!("{}{}", CLAIM_NAME_PREFIX, self.name)
    }
}
