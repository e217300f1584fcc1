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

use k8s_openapi::api::core::v1::Pod as KubePod;
use std::collections::HashMap;
use std::sync::Arc;
use vortex_kube::*;

mod test_utils {
    use super::*;
    use k8s_openapi::api::core::v1::{PersistentVolumeClaim, PodStatus};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use serde_json::Value;
    use std::sync::Mutex;
    use vortex_kube::domain::store::{Collection, Filter};

    /// Records every successful call. Pods listed in `phases` exist with that
    /// phase and every other pod is absent from the cluster.
    #[derive(Default)]
    pub struct FakeKubeClient {
        pub created_pods: Mutex<Vec<(String, KubePod)>>,
        pub deleted_pods: Mutex<Vec<(String, String)>>,
        pub created_pvcs: Mutex<Vec<(String, PersistentVolumeClaim)>>,
        pub deleted_pvcs: Mutex<Vec<(String, String)>>,
        pub phases: Mutex<HashMap<String, String>>,
        pub fail_lookups: bool,
        pub fail_submissions: bool,
        pub fail_claims: bool,
    }

    impl FakeKubeClient {
        pub fn with_phase(self, namespace: &str, name: &str, phase: &str) -> Self {
            self.phases
                .lock()
                .unwrap()
                .insert(format!("{}/{}", namespace, name), phase.to_string());
            self
        }
    }

    #[async_trait::async_trait]
    impl VortexKubeClient for FakeKubeClient {
        async fn create_pod(&self, pod: &KubePod, namespace: &str) -> Result<()> {
            if self.fail_submissions {
                return Err(VortexError::upstream(
                    format!("Failed to create pod in {}", namespace),
                    "admission webhook denied the request",
                ));
            }
            self.created_pods
                .lock()
                .unwrap()
                .push((namespace.to_string(), pod.clone()));
            Ok(())
        }

        async fn delete_pod(&self, name: &str, namespace: &str) -> Result<()> {
            if self.fail_submissions {
                return Err(VortexError::upstream(
                    format!("Failed to delete pod {}", name),
                    "forbidden",
                ));
            }
            self.deleted_pods
                .lock()
                .unwrap()
                .push((namespace.to_string(), name.to_string()));
            Ok(())
        }

        async fn get_pod(&self, name: &str, namespace: &str) -> Result<Option<KubePod>> {
            if self.fail_lookups {
                return Err(VortexError::upstream("Failed to get pod", "connection refused"));
            }

            let key = format!("{}/{}", namespace, name);
            Ok(self.phases.lock().unwrap().get(&key).map(|phase| KubePod {
                metadata: ObjectMeta {
                    name: Some(name.to_string()),
                    namespace: Some(namespace.to_string()),
                    ..Default::default()
                },
                status: Some(PodStatus {
                    phase: Some(phase.clone()),
                    ..Default::default()
                }),
                ..Default::default()
            }))
        }

        async fn create_pvc(&self, pvc: &PersistentVolumeClaim, namespace: &str) -> Result<()> {
            if self.fail_claims {
                return Err(VortexError::upstream(
                    format!("Failed to create PVC in {}", namespace),
                    "exceeded quota",
                ));
            }
            self.created_pvcs
                .lock()
                .unwrap()
                .push((namespace.to_string(), pvc.clone()));
            Ok(())
        }

        async fn delete_pvc(&self, name: &str, namespace: &str) -> Result<()> {
            if self.fail_claims {
                return Err(VortexError::upstream(
                    format!("Failed to delete PVC {}", name),
                    "etcdserver: request timed out",
                ));
            }
            self.deleted_pvcs
                .lock()
                .unwrap()
                .push((namespace.to_string(), name.to_string()));
            Ok(())
        }
    }

    /// A store whose backend is unreachable.
    pub struct FailingStore;

    #[async_trait::async_trait]
    impl DocumentStore for FailingStore {
        async fn find_one(&self, _: Collection, _: &Filter) -> Result<Option<Value>> {
            Err(VortexError::upstream("store", "connection reset"))
        }

        async fn find_all(&self, _: Collection, _: &Filter) -> Result<Vec<Value>> {
            Err(VortexError::upstream("store", "connection reset"))
        }

        async fn count(&self, _: Collection, _: &Filter) -> Result<u64> {
            Err(VortexError::upstream("store", "connection reset"))
        }
    }

    fn network(name: &str, bridge: &str, nodes: &[&str]) -> Network {
        Network {
            name: name.to_string(),
            bridge_name: bridge.to_string(),
            nodes: nodes
                .iter()
                .map(|n| NetworkNode {
                    name: n.to_string(),
                })
                .collect(),
        }
    }

    pub fn data_volume() -> Volume {
        Volume {
            name: "data".to_string(),
            storage_name: "nfs".to_string(),
            access_mode: "ReadWriteMany".to_string(),
            capacity: "500Mi".to_string(),
        }
    }

    pub fn stored_pod(name: &str, namespace: &str, volume: &str) -> Pod {
        Pod {
            name: name.to_string(),
            namespace: namespace.to_string(),
            network_type: NetworkType::ClusterNetwork,
            volumes: vec![PodVolume {
                name: volume.to_string(),
                mount_path: "/data".to_string(),
            }],
            ..Default::default()
        }
    }

    pub fn create_test_store() -> Arc<MemoryStore> {
        let seed = StoreSeed {
            networks: vec![
                network("net-a", "br-a", &["node-a", "node-b", "node-c"]),
                network("net-b", "br-b", &["node-b", "node-c", "node-d"]),
                network("net-far", "br-far", &["node-x"]),
            ],
            storages: vec![Storage {
                name: "nfs".to_string(),
                storage_class_name: "nfs-client".to_string(),
            }],
            volumes: vec![
                data_volume(),
                Volume {
                    name: "orphan".to_string(),
                    storage_name: "missing".to_string(),
                    access_mode: "ReadWriteOnce".to_string(),
                    capacity: "1Gi".to_string(),
                },
            ],
            pods: vec![
                stored_pod("web", "", "data"),
                stored_pod("batch", "jobs", "data"),
            ],
        };
        Arc::new(MemoryStore::from_seed(seed).unwrap())
    }

    pub fn attachment(network: &str, if_name: &str, ip: &str) -> PodNetwork {
        PodNetwork {
            name: network.to_string(),
            if_name: if_name.to_string(),
            ip_address: ip.to_string(),
            netmask: "255.255.255.0".to_string(),
            ..Default::default()
        }
    }

    pub fn create_test_pod(network_type: NetworkType) -> Pod {
        Pod {
            name: "web".to_string(),
            network_type,
            containers: vec![PodContainer {
                name: "nginx".to_string(),
                image: "nginx:1.25".to_string(),
                command: Vec::new(),
            }],
            ..Default::default()
        }
    }

    pub fn descriptors(
        client: FakeKubeClient,
    ) -> (PodDescriptor, VolumeDescriptor, Arc<FakeKubeClient>) {
        descriptors_with_store(create_test_store(), client)
    }

    pub fn descriptors_with_store(
        store: Arc<dyn DocumentStore>,
        client: FakeKubeClient,
    ) -> (PodDescriptor, VolumeDescriptor, Arc<FakeKubeClient>) {
        let client = Arc::new(client);
        let pods = PodDescriptor::new(store.clone(), client.clone(), VortexConfig::default());
        let volumes = VolumeDescriptor::new(store, client.clone(), "default".to_string());
        (pods, volumes, client)
    }

    pub fn affinity_nodes(manifest: &KubePod) -> Option<Vec<String>> {
        let affinity = manifest.spec.as_ref()?.affinity.as_ref()?;
        let required = affinity
            .node_affinity
            .as_ref()?
            .required_during_scheduling_ignored_during_execution
            .as_ref()?;
        let expr = &required.node_selector_terms[0].match_expressions.as_ref()?[0];
        assert_eq!(expr.key, "kubernetes.io/hostname");
        assert_eq!(expr.operator, "In");
        expr.values.clone()
    }
}

use test_utils::*;

// ============================================================================
// Tests for Custom Network Synthesis
// ============================================================================

#[tokio::test]
async fn test_affinity_is_intersection_of_attached_networks() {
    let (pods, _, _) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::CustomNetwork);
    pod.networks = vec![
        attachment("net-a", "eth1", "10.1.0.10"),
        attachment("net-b", "eth2", "10.2.0.10"),
    ];

    let synthesized = pods.render_pod(&pod).await.unwrap();

    assert_eq!(synthesized.node_names, vec!["node-b", "node-c"]);
    assert_eq!(
        affinity_nodes(&synthesized.manifest),
        Some(vec!["node-b".to_string(), "node-c".to_string()])
    );
}

#[tokio::test]
async fn test_one_sidecar_per_attachment_with_exact_args() {
    let (pods, _, _) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::CustomNetwork);
    let mut first = attachment("net-a", "eth1", "10.1.0.10");
    first.vlan_tag = Some(100);
    first.routes_gw = vec![PodRouteGw {
        dst_cidr: "10.9.0.0/16".to_string(),
        gateway: "10.1.0.1".to_string(),
    }];
    first.routes_intf = vec![PodRouteIntf {
        dst_cidr: "10.8.0.0/16".to_string(),
    }];
    pod.networks = vec![first, attachment("net-b", "eth2", "10.2.0.10")];

    let synthesized = pods.render_pod(&pod).await.unwrap();
    let spec = synthesized.manifest.spec.unwrap();
    let sidecars = spec.init_containers.unwrap();

    assert_eq!(sidecars.len(), 2);
    assert_eq!(sidecars[0].name, "init-network-client-0");
    assert_eq!(sidecars[1].name, "init-network-client-1");
    assert_eq!(
        sidecars[0].image.as_deref(),
        Some("sdnvortex/network-controller:v0.4.8")
    );
    assert_eq!(
        sidecars[0].command,
        Some(vec!["/go/bin/client".to_string()])
    );
    assert_eq!(
        sidecars[0].args,
        Some(vec![
            "--server=unix:///tmp/vortex.sock".to_string(),
            "--bridge=br-a".to_string(),
            "--nic=eth1".to_string(),
            "--ip=10.1.0.10/24".to_string(),
            "--vlan=100".to_string(),
            "--route-gw=10.9.0.0/16,10.1.0.1".to_string(),
            "--route-intf=10.8.0.0/16".to_string(),
        ])
    );
    assert_eq!(
        sidecars[1].args.as_ref().unwrap()[1],
        "--bridge=br-b".to_string()
    );

    // Sidecars read the pod identity and reach the agent through the socket volume
    let env_names: Vec<String> = sidecars[0]
        .env
        .clone()
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(env_names, vec!["POD_NAME", "POD_NAMESPACE", "POD_UUID"]);
    let mounts = sidecars[0].volume_mounts.clone().unwrap();
    assert_eq!(mounts[0].name, "grpc-sock");
    assert_eq!(mounts[0].mount_path, "/tmp/");
}

#[tokio::test]
async fn test_bridge_name_is_written_back_to_attachments() {
    let store = create_test_store();
    let config = VortexConfig::default();
    let mut pod = create_test_pod(NetworkType::CustomNetwork);
    pod.networks = vec![attachment("net-b", "eth1", "10.2.0.10")];

    PodManifestBuilder::new(store.as_ref(), &config)
        .build(&mut pod)
        .await
        .unwrap();

    assert_eq!(pod.networks[0].bridge_name, "br-b");
}

#[tokio::test]
async fn test_disjoint_networks_leave_scheduling_unconstrained() {
    let (pods, _, _) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::CustomNetwork);
    pod.networks = vec![
        attachment("net-a", "eth1", "10.1.0.10"),
        attachment("net-far", "eth2", "10.3.0.10"),
    ];

    let synthesized = pods.render_pod(&pod).await.unwrap();

    assert!(synthesized.node_names.is_empty());
    assert!(affinity_nodes(&synthesized.manifest).is_none());
}

#[tokio::test]
async fn test_hints_narrow_network_nodes() {
    let (pods, _, _) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::CustomNetwork);
    pod.networks = vec![
        attachment("net-a", "eth1", "10.1.0.10"),
        attachment("net-b", "eth2", "10.2.0.10"),
    ];
    pod.node_affinity = vec!["node-c".to_string(), "node-z".to_string()];

    let synthesized = pods.render_pod(&pod).await.unwrap();
    assert_eq!(synthesized.node_names, vec!["node-c"]);
}

#[tokio::test]
async fn test_missing_network_is_reference_not_found() {
    let (pods, _, client) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::CustomNetwork);
    pod.networks = vec![attachment("net-missing", "eth1", "10.1.0.10")];

    let err = pods.create_pod(&pod).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ReferenceNotFound);
    assert_eq!(err.to_string(), "The network named net-missing doesn't exist");
    assert!(client.created_pods.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_netmask_is_rejected() {
    let (pods, _, _) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::CustomNetwork);
    let mut bad = attachment("net-a", "eth1", "10.1.0.10");
    bad.netmask = "255.0.255.0".to_string();
    pod.networks = vec![bad];

    let err = pods.render_pod(&pod).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

// ============================================================================
// Tests for Host and Cluster Network Modes
// ============================================================================

#[tokio::test]
async fn test_host_network_mode() {
    let (pods, _, _) = descriptors(FakeKubeClient::default());
    let pod = create_test_pod(NetworkType::HostNetwork);

    let synthesized = pods.render_pod(&pod).await.unwrap();
    let spec = synthesized.manifest.spec.unwrap();

    assert_eq!(spec.host_network, Some(true));
    assert!(spec.init_containers.is_none());
    assert!(spec.affinity.is_none());
}

#[tokio::test]
async fn test_cluster_network_mode_uses_hints_only() {
    let (pods, _, _) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::ClusterNetwork);
    // Networks are ignored outside the custom mode
    pod.networks = vec![attachment("net-missing", "eth1", "10.1.0.10")];
    pod.node_affinity = vec!["node-a".to_string()];

    let synthesized = pods.render_pod(&pod).await.unwrap();
    let spec = synthesized.manifest.spec.clone().unwrap();

    assert_eq!(spec.host_network, Some(false));
    assert!(spec.init_containers.is_none());
    assert_eq!(
        affinity_nodes(&synthesized.manifest),
        Some(vec!["node-a".to_string()])
    );
}

#[tokio::test]
async fn test_unsupported_network_type_never_reaches_the_cluster() {
    let (pods, _, client) = descriptors(FakeKubeClient::default());
    let pod = create_test_pod(NetworkType::from("overlay".to_string()));

    let err = pods.create_pod(&pod).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnsupportedMode);
    assert!(err.to_string().contains("overlay"));
    assert!(client.created_pods.lock().unwrap().is_empty());
}

// ============================================================================
// Tests for Volumes, Security Context and Environment
// ============================================================================

#[tokio::test]
async fn test_volumes_and_control_socket() {
    let (pods, _, _) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::ClusterNetwork);
    pod.volumes = vec![PodVolume {
        name: "data".to_string(),
        mount_path: "/var/lib/data".to_string(),
    }];

    let synthesized = pods.render_pod(&pod).await.unwrap();
    let spec = synthesized.manifest.spec.unwrap();
    let volumes = spec.volumes.unwrap();

    assert_eq!(volumes.len(), 2);
    assert_eq!(volumes[0].name, "volume-0");
    assert_eq!(
        volumes[0]
            .persistent_volume_claim
            .as_ref()
            .map(|pvc| pvc.claim_name.as_str()),
        Some("pvc-data")
    );
    assert_eq!(volumes[1].name, "grpc-sock");
    assert_eq!(
        volumes[1].host_path.as_ref().map(|hp| hp.path.as_str()),
        Some("/tmp/vortex")
    );

    let mounts = spec.containers[0].volume_mounts.clone().unwrap();
    assert_eq!(mounts.len(), 1);
    assert_eq!(mounts[0].name, "volume-0");
    assert_eq!(mounts[0].mount_path, "/var/lib/data");
}

#[tokio::test]
async fn test_missing_volume_fails_synthesis() {
    let (pods, _, _) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::ClusterNetwork);
    pod.volumes = vec![PodVolume {
        name: "nope".to_string(),
        mount_path: "/data".to_string(),
    }];

    let err = pods.render_pod(&pod).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferenceNotFound);
}

#[tokio::test]
async fn test_capability_grants_privileged_context() {
    let (pods, _, _) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::ClusterNetwork);
    pod.capability = true;

    let synthesized = pods.render_pod(&pod).await.unwrap();
    let ctx = synthesized.manifest.spec.unwrap().containers[0]
        .security_context
        .clone()
        .unwrap();

    assert_eq!(ctx.privileged, Some(true));
    assert_eq!(
        ctx.capabilities.and_then(|c| c.add),
        Some(vec![
            "NET_ADMIN".to_string(),
            "SYS_ADMIN".to_string(),
            "NET_RAW".to_string()
        ])
    );
}

#[tokio::test]
async fn test_declared_env_vars_are_sorted() {
    let (pods, _, _) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::ClusterNetwork);
    pod.env_vars = HashMap::from([
        ("ZONE".to_string(), "east".to_string()),
        ("MODE".to_string(), "demo".to_string()),
    ]);

    let synthesized = pods.render_pod(&pod).await.unwrap();
    let env = synthesized.manifest.spec.unwrap().containers[0]
        .env
        .clone()
        .unwrap();

    let pairs: Vec<(String, Option<String>)> =
        env.into_iter().map(|e| (e.name, e.value)).collect();
    assert_eq!(
        pairs,
        vec![
            ("MODE".to_string(), Some("demo".to_string())),
            ("ZONE".to_string(), Some("east".to_string())),
        ]
    );
}

#[tokio::test]
async fn test_default_namespace_and_pull_secret() {
    let (pods, _, _) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::ClusterNetwork);
    pod.restart_policy = "Never".to_string();

    let synthesized = pods.render_pod(&pod).await.unwrap();

    assert_eq!(synthesized.namespace, "default");
    assert_eq!(
        synthesized.manifest.metadata.namespace.as_deref(),
        Some("default")
    );
    let spec = synthesized.manifest.spec.unwrap();
    assert_eq!(spec.restart_policy.as_deref(), Some("Never"));
    assert_eq!(
        spec.image_pull_secrets.unwrap()[0].name,
        "dockerhub-token".to_string()
    );
}

#[tokio::test]
async fn test_invalid_pod_name_is_rejected() {
    let (pods, _, _) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::ClusterNetwork);
    pod.name = "Web_1".to_string();

    let err = pods.render_pod(&pod).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_dotted_and_long_pod_names_render() {
    let (pods, _, _) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::ClusterNetwork);
    pod.name = "web.v1".to_string();

    let synthesized = pods.render_pod(&pod).await.unwrap();
    assert_eq!(synthesized.manifest.metadata.name.as_deref(), Some("web.v1"));

    pod.name = format!("web-{}", "a".repeat(66));
    assert_eq!(pod.name.len(), 70);
    assert!(pods.render_pod(&pod).await.is_ok());

    // Namespaces stay single DNS labels
    pod.name = "web".to_string();
    pod.namespace = "edge.v1".to_string();
    let err = pods.render_pod(&pod).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

// ============================================================================
// Tests for Pod Admission
// ============================================================================

#[tokio::test]
async fn test_admit_with_missing_volume_submits_nothing() {
    let (pods, _, client) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::ClusterNetwork);
    pod.volumes = vec![PodVolume {
        name: "ghost".to_string(),
        mount_path: "/data".to_string(),
    }];

    let err = pods.admit_pod(&pod).await.unwrap_err();

    assert_eq!(err.to_string(), "The volume named ghost doesn't exist");
    assert!(client.created_pods.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_admit_submits_to_resolved_namespace() {
    let (pods, _, client) = descriptors(FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::CustomNetwork);
    pod.namespace = "edge".to_string();
    pod.networks = vec![attachment("net-a", "eth1", "10.1.0.10")];

    pods.admit_pod(&pod).await.unwrap();

    let created = client.created_pods.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].0, "edge");
    assert_eq!(created[0].1.metadata.name.as_deref(), Some("web"));
}

#[tokio::test]
async fn test_submission_failure_is_returned_unchanged() {
    let client = FakeKubeClient {
        fail_submissions: true,
        ..Default::default()
    };
    let (pods, _, client) = descriptors(client);
    let pod = create_test_pod(NetworkType::ClusterNetwork);

    let err = pods.admit_pod(&pod).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    assert_eq!(
        err.to_string(),
        "Failed to create pod in default: admission webhook denied the request"
    );
    assert!(client.created_pods.lock().unwrap().is_empty());

    let err = pods.delete_pod(&pod).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    assert!(client.deleted_pods.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_store_failure_during_admission_submits_nothing() {
    let (pods, _, client) =
        descriptors_with_store(Arc::new(FailingStore), FakeKubeClient::default());
    let mut pod = create_test_pod(NetworkType::ClusterNetwork);
    pod.volumes = vec![PodVolume {
        name: "data".to_string(),
        mount_path: "/data".to_string(),
    }];

    let err = pods.admit_pod(&pod).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    assert!(err.to_string().starts_with("Check the volume name data: "));
    assert!(err.to_string().contains("connection reset"));
    assert!(client.created_pods.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_pod_falls_back_to_default_namespace() {
    let (pods, _, client) = descriptors(FakeKubeClient::default());
    let pod = create_test_pod(NetworkType::ClusterNetwork);

    pods.delete_pod(&pod).await.unwrap();

    assert_eq!(
        client.deleted_pods.lock().unwrap().as_slice(),
        &[("default".to_string(), "web".to_string())]
    );
}

// ============================================================================
// Tests for Volume Lifecycle
// ============================================================================

#[tokio::test]
async fn test_create_volume_claim_shape() {
    let (_, volumes, client) = descriptors(FakeKubeClient::default());

    volumes.create_volume(&data_volume()).await.unwrap();

    let created = client.created_pvcs.lock().unwrap();
    assert_eq!(created.len(), 1);
    let (namespace, pvc) = &created[0];
    assert_eq!(namespace, "default");
    assert_eq!(pvc.metadata.name.as_deref(), Some("pvc-data"));

    let spec = pvc.spec.clone().unwrap();
    assert_eq!(spec.access_modes, Some(vec!["ReadWriteMany".to_string()]));
    assert_eq!(spec.storage_class_name.as_deref(), Some("nfs-client"));
    let resources = spec.resources.unwrap();
    assert_eq!(resources.limits, resources.requests);
    assert_eq!(resources.requests.unwrap()["storage"].0, "500Mi");
}

#[tokio::test]
async fn test_create_volume_with_missing_storage() {
    let (_, volumes, client) = descriptors(FakeKubeClient::default());
    let volume = Volume {
        name: "orphan".to_string(),
        storage_name: "missing".to_string(),
        access_mode: "ReadWriteOnce".to_string(),
        capacity: "1Gi".to_string(),
    };

    let err = volumes.create_volume(&volume).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ReferenceNotFound);
    assert!(client.created_pvcs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_volume_in_use_names_active_pods() {
    let client = FakeKubeClient::default()
        .with_phase("default", "web", "Running")
        .with_phase("jobs", "batch", "Pending");
    let (_, volumes, client) = descriptors(client);

    let err = volumes.delete_volume(&data_volume()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DependencyConflict);
    assert_eq!(
        err.to_string(),
        "delete the volume [data] fail, since the following pods still use it: web,batch"
    );
    assert!(client.deleted_pvcs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_volume_after_pods_terminate() {
    let client = FakeKubeClient::default()
        .with_phase("default", "web", "Succeeded")
        .with_phase("jobs", "batch", "Failed");
    let (_, volumes, client) = descriptors(client);

    volumes.delete_volume(&data_volume()).await.unwrap();

    assert_eq!(
        client.deleted_pvcs.lock().unwrap().as_slice(),
        &[("default".to_string(), "pvc-data".to_string())]
    );
}

#[tokio::test]
async fn test_delete_volume_ignores_pods_missing_from_cluster() {
    // Only "batch" is live; "web" has already been removed
    let client = FakeKubeClient::default().with_phase("jobs", "batch", "Running");
    let (_, volumes, client) = descriptors(client);

    let err = volumes.delete_volume(&data_volume()).await.unwrap_err();
    assert!(err.to_string().ends_with(": batch"));
    assert!(client.deleted_pvcs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_unused_volume() {
    let (_, volumes, client) = descriptors(FakeKubeClient::default());
    let volume = Volume {
        name: "scratch".to_string(),
        ..data_volume()
    };

    volumes.delete_volume(&volume).await.unwrap();
    assert_eq!(client.deleted_pvcs.lock().unwrap()[0].1, "pvc-scratch");
}

#[tokio::test]
async fn test_delete_volume_propagates_lookup_failure() {
    let client = FakeKubeClient {
        fail_lookups: true,
        ..Default::default()
    };
    let (_, volumes, client) = descriptors(client);

    let err = volumes.delete_volume(&data_volume()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    assert!(client.deleted_pvcs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_claim_creation_failure_propagates() {
    let client = FakeKubeClient {
        fail_claims: true,
        ..Default::default()
    };
    let (_, volumes, client) = descriptors(client);

    let err = volumes.create_volume(&data_volume()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    assert_eq!(err.to_string(), "Failed to create PVC in default: exceeded quota");
    assert!(client.created_pvcs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_claim_deletion_failure_after_clean_scan() {
    let client = FakeKubeClient {
        fail_claims: true,
        ..Default::default()
    }
    .with_phase("default", "web", "Succeeded");
    let (_, volumes, client) = descriptors(client);

    let err = volumes.delete_volume(&data_volume()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    assert!(err.to_string().starts_with("Failed to delete PVC pvc-data"));
    assert!(client.deleted_pvcs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_store_failure_during_scan_keeps_the_claim() {
    let (_, volumes, client) =
        descriptors_with_store(Arc::new(FailingStore), FakeKubeClient::default());

    let err = volumes.delete_volume(&data_volume()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    assert!(err
        .to_string()
        .starts_with("List the pods using volume data: "));
    assert!(client.deleted_pvcs.lock().unwrap().is_empty());
}

// ============================================================================
// Tests for Reference Guard
// ============================================================================

#[tokio::test]
async fn test_check_pod_parameter_reports_first_missing_network() {
    let guard = ReferenceGuard::new(create_test_store());
    let mut pod = create_test_pod(NetworkType::CustomNetwork);
    pod.volumes = vec![PodVolume {
        name: "data".to_string(),
        mount_path: "/data".to_string(),
    }];
    pod.networks = vec![
        attachment("net-a", "eth1", "10.1.0.10"),
        attachment("net-gone", "eth2", "10.2.0.10"),
    ];

    let err = guard.check_pod_parameter(&pod).await.unwrap_err();
    assert_eq!(err.to_string(), "The network named net-gone doesn't exist");
}

#[tokio::test]
async fn test_check_pod_parameter_wraps_store_failure() {
    let guard = ReferenceGuard::new(Arc::new(FailingStore));
    let mut pod = create_test_pod(NetworkType::CustomNetwork);
    pod.networks = vec![attachment("net-a", "eth1", "10.1.0.10")];

    let err = guard.check_pod_parameter(&pod).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    assert_eq!(
        err.to_string(),
        "Check the network name net-a: store: connection reset"
    );
}

#[tokio::test]
async fn test_check_pod_parameter_accepts_pod_without_references() {
    let guard = ReferenceGuard::new(create_test_store());
    let pod = create_test_pod(NetworkType::HostNetwork);
    assert!(guard.check_pod_parameter(&pod).await.is_ok());
}
