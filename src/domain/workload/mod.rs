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

//! Workload orchestration
//!
//! Requests run as one synchronous chain: guard, builders, cluster API.
//! The first failure aborts the chain and nothing already created is
//! rolled back.

pub mod guard;
pub mod pod;
pub mod volume;

pub use self::guard::{is_terminal_phase, ReferenceGuard};
pub use self::pod::PodDescriptor;
pub use self::volume::VolumeDescriptor;
