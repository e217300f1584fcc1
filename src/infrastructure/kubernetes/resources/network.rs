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

//! Network attachment planning
//!
//! For a custom-network pod every attachment becomes one init container
//! running the network client, which plumbs a single NIC into the pod's
//! network namespace before the application containers start. The set of
//! nodes that can reach all attached networks is handed back for the
//! affinity predicate.

use crate::domain::config::SidecarConfig;
use crate::domain::entity::{Network, PodNetwork};
use crate::domain::store::{resolve, DocumentStore};
use crate::infrastructure::constants::{
    ARG_BRIDGE, ARG_IP, ARG_NIC, ARG_ROUTE_GW, ARG_ROUTE_INTF, ARG_SERVER, ARG_VLAN,
    SIDECAR_NAME_PREFIX, VOLUME_NAME_CONTROL_SOCKET,
};
use crate::infrastructure::kubernetes::resources::builders::EnvironmentBuilder;
use crate::infrastructure::kubernetes::resources::node_set::NodeSetResolver;
use crate::shared::error::{Result, VortexError};
use k8s_openapi::api::core::v1::{Container, VolumeMount};
use std::net::IpAddr;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkPlan {
    /// Nodes that can reach every attached network
    pub node_names: Vec<String>,
    /// One sidecar per attachment, in declaration order
    pub init_containers: Vec<Container>,
}

pub struct NetworkAttachmentPlanner<'a> {
    store: &'a dyn DocumentStore,
    sidecar: &'a SidecarConfig,
}

impl<'a> NetworkAttachmentPlanner<'a> {
    pub fn new(store: &'a dyn DocumentStore, sidecar: &'a SidecarConfig) -> Self {
        Self { store, sidecar }
    }

    /// Resolve every attachment's network and build its sidecar.
    ///
    /// The resolved bridge name is written back onto each attachment.
    pub async fn plan(&self, attachments: &mut [PodNetwork]) -> Result<NetworkPlan> {
        let mut reachable = Vec::with_capacity(attachments.len());
        for attachment in attachments.iter_mut() {
            let network: Network = resolve(self.store, &attachment.name).await?;
            attachment.bridge_name = network.bridge_name.clone();
            reachable.push(network.node_names());
        }

        let node_names = NodeSetResolver::intersect_all(&reachable);
        if !attachments.is_empty() && node_names.is_empty() {
            tracing::warn!(
                networks = attachments.len(),
                "Attached networks share no common node, scheduling is left unconstrained"
            );
        } else {
            tracing::debug!(nodes = ?node_names, "Derived reachable node set");
        }

        let init_containers = attachments
            .iter()
            .enumerate()
            .map(|(index, attachment)| self.build_sidecar(index, attachment))
            .collect::<Result<Vec<_>>>()?;

        Ok(NetworkPlan {
            node_names,
            init_containers,
        })
    }

    pub fn build_sidecar(&self, index: usize, attachment: &PodNetwork) -> Result<Container> {
        let args = sidecar_args(&self.sidecar.server, attachment)?;
        tracing::debug!(index, args = ?args, "Generated network client arguments");

        Ok(Container {
            name: format!("{}{}", SIDECAR_NAME_PREFIX, index),
            image: Some(self.sidecar.image.clone()),
            command: Some(vec![self.sidecar.command.clone()]),
            args: Some(args),
            env: Some(EnvironmentBuilder::new().with_pod_identity().build()),
            volume_mounts: Some(vec![VolumeMount {
                name: VOLUME_NAME_CONTROL_SOCKET.to_string(),
                mount_path: self.sidecar.socket_mount_path.clone(),
                ..Default::default()
            }]),
            ..Default::default()
        })
    }
}

/// Command-line arguments for the network client of one attachment
pub fn sidecar_args(server: &str, attachment: &PodNetwork) -> Result<Vec<String>> {
    let cidr = ip_to_cidr(&attachment.ip_address, &attachment.netmask)?;

    let mut args = vec![
        format!("{}{}", ARG_SERVER, server),
        format!("{}{}", ARG_BRIDGE, attachment.bridge_name),
        format!("{}{}", ARG_NIC, attachment.if_name),
        format!("{}{}", ARG_IP, cidr),
    ];

    if let Some(vlan) = attachment.vlan_tag {
        args.push(format!("{}{}", ARG_VLAN, vlan));
    }

    args.extend(
        attachment
            .routes_gw
            .iter()
            .map(|route| format!("{}{},{}", ARG_ROUTE_GW, route.dst_cidr, route.gateway)),
    );
    args.extend(
        attachment
            .routes_intf
            .iter()
            .map(|route| format!("{}{}", ARG_ROUTE_INTF, route.dst_cidr)),
    );

    Ok(args)
}

/// `10.0.0.5` + `255.255.255.0` -> `10.0.0.5/24`
pub fn ip_to_cidr(ip: &str, netmask: &str) -> Result<String> {
    let address: IpAddr = ip
        .parse()
        .map_err(|_| VortexError::InvalidResource(format!("Invalid IP address: {}", ip)))?;
    let mask: IpAddr = netmask
        .parse()
        .map_err(|_| VortexError::InvalidResource(format!("Invalid netmask: {}", netmask)))?;

    let (ones, leading) = match (address, mask) {
        (IpAddr::V4(_), IpAddr::V4(mask)) => {
            let bits = u32::from(mask);
            (bits.count_ones(), bits.leading_ones())
        }
        (IpAddr::V6(_), IpAddr::V6(mask)) => {
            let bits = u128::from(mask);
            (bits.count_ones(), bits.leading_ones())
        }
        _ => {
            return Err(VortexError::InvalidResource(format!(
                "IP address {} and netmask {} belong to different families",
                ip, netmask
            )))
        }
    };

    if ones != leading {
        return Err(VortexError::InvalidResource(format!(
            "Netmask {} is not contiguous",
            netmask
        )));
    }

    Ok(format!("{}/{}", address, ones))
}
