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

/// Namespace used when a pod declares none
pub const DEFAULT_NAMESPACE: &str = "default";

/// Network attachment sidecar
pub const SIDECAR_IMAGE: &str = "sdnvortex/network-controller:v0.4.8";
pub const SIDECAR_COMMAND: &str = "/go/bin/client";
pub const SIDECAR_NAME_PREFIX: &str = "init-network-client-";
pub const SIDECAR_SERVER_ENDPOINT: &str = "unix:///tmp/vortex.sock";

/// Control socket shared between the host agent and the sidecars
pub const VOLUME_NAME_CONTROL_SOCKET: &str = "grpc-sock";
pub const CONTROL_SOCKET_HOST_PATH: &str = "/tmp/vortex";
pub const CONTROL_SOCKET_MOUNT_PATH: &str = "/tmp/";

/// Sidecar CLI flags
pub const ARG_SERVER: &str = "--server=";
pub const ARG_BRIDGE: &str = "--bridge=";
pub const ARG_NIC: &str = "--nic=";
pub const ARG_IP: &str = "--ip=";
pub const ARG_VLAN: &str = "--vlan=";
pub const ARG_ROUTE_GW: &str = "--route-gw=";
pub const ARG_ROUTE_INTF: &str = "--route-intf=";

/// Downward API variables injected into every sidecar
pub const ENV_POD_NAME: &str = "POD_NAME";
pub const ENV_POD_NAMESPACE: &str = "POD_NAMESPACE";
pub const ENV_POD_UUID: &str = "POD_UUID";
pub const FIELD_PATH_NAME: &str = "metadata.name";
pub const FIELD_PATH_NAMESPACE: &str = "metadata.namespace";
pub const FIELD_PATH_UID: &str = "metadata.uid";

/// Pod-local volume entries are named by position: `volume-0`, `volume-1`, ...
pub const VOLUME_NAME_PREFIX: &str = "volume-";

/// Claim names are derived from the volume record: `pvc-<volume name>`
pub const CLAIM_NAME_PREFIX: &str = "pvc-";
pub const RESOURCE_STORAGE: &str = "storage";

/// Image pull secret attached to every synthesized pod
pub const IMAGE_PULL_SECRET: &str = "dockerhub-token";

/// Node affinity
pub const NODE_LABEL_HOSTNAME: &str = "kubernetes.io/hostname";
pub const NODE_SELECTOR_OP_IN: &str = "In";

/// Elevated capabilities granted to privileged pods
pub const CAP_NET_ADMIN: &str = "NET_ADMIN";
pub const CAP_SYS_ADMIN: &str = "SYS_ADMIN";
pub const CAP_NET_RAW: &str = "NET_RAW";

/// Pod phases after which a pod no longer holds its volumes
pub const POD_PHASE_SUCCEEDED: &str = "Succeeded";
pub const POD_PHASE_FAILED: &str = "Failed";

/// Document store collections
pub const COLLECTION_PODS: &str = "pods";
pub const COLLECTION_NETWORKS: &str = "networks";
pub const COLLECTION_VOLUMES: &str = "volumes";
pub const COLLECTION_STORAGES: &str = "storages";
