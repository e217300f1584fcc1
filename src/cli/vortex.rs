//! Pod and volume commands

use crate::cli::display::{StatusIcon, TableRenderer};
use crate::domain::config::{apply_to_vortex_config, parse_dynamic_configs, VortexConfig};
use crate::domain::entity::{Pod, Volume};
use crate::domain::store::{resolve, DocumentStore, MemoryStore};
use crate::domain::workload::{PodDescriptor, ReferenceGuard, VolumeDescriptor};
use crate::infrastructure::kubernetes::client::VortexKubeClientImpl;
use crate::infrastructure::kubernetes::resources::PodManifestBuilder;
use clap::{Args, Parser};
use colored::Colorize;
use std::sync::Arc;

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to the vortex configuration file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Path to the document store seed (YAML with pods/networks/volumes/storages)
    /// Overrides store_file from the configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<String>,

    /// Namespace for claims and for pods that declare none
    #[arg(long, short = 'n', global = true)]
    pub namespace: Option<String>,

    /// Path to kubeconfig file
    /// If not specified, uses default kubeconfig resolution (KUBECONFIG env or ~/.kube/config)
    #[arg(long, global = true)]
    pub kubeconfig: Option<String>,

    /// Kubernetes context to use
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Configuration overrides (-D key=value)
    ///
    /// Keys: vortex.namespace, vortex.image-pull-secret, vortex.sidecar.image,
    /// vortex.sidecar.command, vortex.sidecar.server, vortex.sidecar.socket-host-path,
    /// vortex.sidecar.socket-mount-path
    ///
    /// Example: -Dvortex.sidecar.image=sdnvortex/network-controller:v0.5.0
    #[arg(short = 'D', global = true, value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

impl GlobalArgs {
    /// Resolve configuration: command line flags override -D properties, which
    /// override the config file
    pub fn load_config(&self) -> anyhow::Result<VortexConfig> {
        let mut conf = match self.config {
            Some(ref path) => VortexConfig::from(path)
                .map_err(|e| anyhow::anyhow!("Failed to load configuration from {}: {}", path, e))?,
            None => VortexConfig::default(),
        };

        if !self.properties.is_empty() {
            let configs = parse_dynamic_configs(&self.properties)
                .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;
            apply_to_vortex_config(&configs, &mut conf);
        }

        if let Some(ref namespace) = self.namespace {
            conf.namespace = namespace.clone();
        }
        if self.kubeconfig.is_some() {
            conf.kubeconfig = self.kubeconfig.clone();
        }
        if self.context.is_some() {
            conf.context = self.context.clone();
        }
        if self.store.is_some() {
            conf.store_file = self.store.clone();
        }

        conf.validate()?;
        Ok(conf)
    }

    pub fn load_store(&self, conf: &VortexConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
        let path = conf.store_file.as_ref().ok_or_else(|| {
            anyhow::anyhow!("A document store is required (use --store or store_file in the config)")
        })?;

        let store = MemoryStore::from_yaml_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load store from {}: {}", path, e))?;
        Ok(Arc::new(store))
    }
}

fn load_pod_file(path: &str) -> anyhow::Result<Pod> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read pod file {}: {}", path, e))?;
    serde_yaml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse pod file {}: {}", path, e))
}

#[derive(Parser, Debug, Clone)]
pub struct PodCheckCommand {
    /// Pod declaration (YAML)
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: String,
}

impl PodCheckCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let conf = global.load_config()?;
        let store = global.load_store(&conf)?;
        let pod = load_pod_file(&self.file)?;

        ReferenceGuard::new(store).check_pod_parameter(&pod).await?;

        println!(
            "{} All references of pod {} exist",
            StatusIcon::SUCCESS.green(),
            pod.name
        );
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct PodRenderCommand {
    /// Pod declaration (YAML)
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: String,

    /// Print only the manifest, without the summary table
    #[arg(long)]
    pub quiet: bool,
}

impl PodRenderCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let conf = global.load_config()?;
        let store = global.load_store(&conf)?;
        let mut pod = load_pod_file(&self.file)?;

        let synthesized = PodManifestBuilder::new(store.as_ref(), &conf)
            .build(&mut pod)
            .await?;

        if !self.quiet {
            println!("{}", TableRenderer::new().render_pod_plan(&synthesized));
        }
        println!("{}", serde_yaml::to_string(&synthesized.manifest)?);
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct PodCreateCommand {
    /// Pod declaration (YAML)
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: String,
}

impl PodCreateCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let conf = global.load_config()?;
        let store = global.load_store(&conf)?;
        let pod = load_pod_file(&self.file)?;

        let descriptor = PodDescriptor::new_with_config(store, conf)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create pod descriptor: {}", e))?;

        let synthesized = descriptor
            .admit_pod(&pod)
            .await
            .map_err(|e| anyhow::anyhow!("Pod admission failed: {}", e))?;

        println!(
            "{} Pod {}/{} created",
            StatusIcon::SUCCESS.green(),
            synthesized.namespace,
            pod.name
        );
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct PodDeleteCommand {
    /// Pod name
    pub name: String,
}

impl PodDeleteCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let conf = global.load_config()?;
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let namespace = conf.namespace.clone();

        let pod = Pod {
            name: self.name.clone(),
            namespace: namespace.clone(),
            ..Default::default()
        };

        let descriptor = PodDescriptor::new_with_config(store, conf)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create pod descriptor: {}", e))?;
        descriptor.delete_pod(&pod).await?;

        println!(
            "{} Pod {}/{} deleted",
            StatusIcon::SUCCESS.green(),
            namespace,
            self.name
        );
        Ok(())
    }
}

async fn volume_descriptor(
    global: &GlobalArgs,
) -> anyhow::Result<(VolumeDescriptor, Arc<dyn DocumentStore>)> {
    let conf = global.load_config()?;
    let store = global.load_store(&conf)?;
    let client =
        VortexKubeClientImpl::new_with_config(conf.kubeconfig.clone(), conf.context.clone())
            .await?;

    Ok((
        VolumeDescriptor::new(store.clone(), Arc::new(client), conf.namespace),
        store,
    ))
}

#[derive(Parser, Debug, Clone)]
pub struct VolumeCreateCommand {
    /// Volume record name
    pub name: String,
}

impl VolumeCreateCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let (descriptor, store) = volume_descriptor(global).await?;
        let volume: Volume = resolve(store.as_ref(), &self.name).await?;

        descriptor.create_volume(&volume).await?;
        println!(
            "{} Claim {}/{} created",
            StatusIcon::SUCCESS.green(),
            descriptor.namespace(),
            volume.claim_name()
        );
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct VolumeDeleteCommand {
    /// Volume record name
    pub name: String,
}

impl VolumeDeleteCommand {
    pub async fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let (descriptor, store) = volume_descriptor(global).await?;
        let volume: Volume = resolve(store.as_ref(), &self.name).await?;

        descriptor.delete_volume(&volume).await?;
        println!(
            "{} Claim {}/{} deleted",
            StatusIcon::SUCCESS.green(),
            descriptor.namespace(),
            volume.claim_name()
        );
        Ok(())
    }
}
