// CLI command definitions

use super::vortex::{
    GlobalArgs, PodCheckCommand, PodCreateCommand, PodDeleteCommand, PodRenderCommand,
    VolumeCreateCommand, VolumeDeleteCommand,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "vortex-kube",
    version,
    about = "Multi-network workload synthesis for Kubernetes",
    long_about = "Turns Pod, Network, Volume and Storage declarations into Kubernetes manifests: \
                  network attachment sidecars, node affinity, volume claims and mounts"
)]
pub struct CliArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Pod admission, rendering and removal
    #[command(subcommand)]
    Pod(PodCommands),

    /// Persistent claims backing Volume records
    #[command(subcommand)]
    Volume(VolumeCommands),
}

#[derive(clap::Subcommand, Debug)]
pub enum PodCommands {
    /// Check that every referenced volume and network exists
    Check(PodCheckCommand),

    /// Print the synthesized manifest without submitting it
    Render(PodRenderCommand),

    /// Check references, synthesize and submit the pod
    Create(PodCreateCommand),

    /// Delete a pod
    Delete(PodDeleteCommand),
}

#[derive(clap::Subcommand, Debug)]
pub enum VolumeCommands {
    /// Create the persistent volume claim for a Volume record
    Create(VolumeCreateCommand),

    /// Delete the claim of a Volume record no active pod uses
    Delete(VolumeDeleteCommand),
}
