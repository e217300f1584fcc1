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

//! Node-set resolution and the node affinity predicate derived from it
//!
//! An empty node set never constrains scheduling. Output order follows the
//! first input collection so results are stable across runs.

use crate::infrastructure::constants::{NODE_LABEL_HOSTNAME, NODE_SELECTOR_OP_IN};
use k8s_openapi::api::core::v1::{
    Affinity, NodeAffinity, NodeSelector, NodeSelectorRequirement, NodeSelectorTerm,
};
use std::collections::HashSet;

pub struct NodeSetResolver;

impl NodeSetResolver {
    /// Nodes present in every collection; no collections yields no nodes.
    pub fn intersect_all(collections: &[Vec<String>]) -> Vec<String> {
        let Some((first, rest)) = collections.split_first() else {
            return Vec::new();
        };

        let others: Vec<HashSet<&str>> = rest
            .iter()
            .map(|names| names.iter().map(String::as_str).collect())
            .collect();

        let mut seen = HashSet::new();
        first
            .iter()
            .filter(|name| others.iter().all(|set| set.contains(name.as_str())))
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }

    /// Narrow the network-derived set with the pod's explicit hints.
    ///
    /// Either side being empty leaves the other unchanged.
    pub fn constrain(hints: &[String], derived: &[String]) -> Vec<String> {
        match (hints.is_empty(), derived.is_empty()) {
            (true, _) => Self::intersect_all(&[derived.to_vec()]),
            (false, true) => Self::intersect_all(&[hints.to_vec()]),
            (false, false) => Self::intersect_all(&[hints.to_vec(), derived.to_vec()]),
        }
    }
}

/// Required node affinity on the hostname label, or `None` for an empty set
pub fn build_node_affinity(node_names: &[String]) -> Option<Affinity> {
    if node_names.is_empty() {
        return None;
    }

    Some(Affinity {
        node_affinity: Some(NodeAffinity {
            required_during_scheduling_ignored_during_execution: Some(NodeSelector {
                node_selector_terms: vec![NodeSelectorTerm {
                    match_expressions: Some(vec![NodeSelectorRequirement {
                        key: NODE_LABEL_HOSTNAME.to_string(),
                        operator: NODE_SELECTOR_OP_IN.to_string(),
                        values: Some(node_names.to_vec()),
                    }]),
                    ..Default::default()
                }],
            }),
            ..Default::default()
        }),
        ..Default::default()
    })
}
