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

//! Manifest builders
//!
//! Everything in here is a pure function of the declaration and the
//! records resolved from the document store. Submission happens in the
//! workload descriptors.

pub mod builders;
pub mod network;
pub mod node_set;
pub mod pod;
pub mod volume;

pub use self::builders::{Capability, EnvironmentBuilder, SecurityContextBuilder};
pub use self::network::{ip_to_cidr, sidecar_args, NetworkAttachmentPlanner, NetworkPlan};
pub use self::node_set::{build_node_affinity, NodeSetResolver};
pub use self::pod::{PodManifestBuilder, SynthesizedPod};
pub use self::volume::{control_socket_volume, parse_quantity, ClaimBuilder, ResolvedVolumes, VolumeResolver};
