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

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vortex_kube::cli::commands::{Commands, PodCommands, VolumeCommands};
use vortex_kube::cli::CliArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    let global = &args.global;

    match args.command {
        Commands::Pod(cmd) => match cmd {
            PodCommands::Check(cmd) => cmd.execute(global).await,
            PodCommands::Render(cmd) => cmd.execute(global).await,
            PodCommands::Create(cmd) => cmd.execute(global).await,
            PodCommands::Delete(cmd) => cmd.execute(global).await,
        },
        Commands::Volume(cmd) => match cmd {
            VolumeCommands::Create(cmd) => cmd.execute(global).await,
            VolumeCommands::Delete(cmd) => cmd.execute(global).await,
        },
    }
}
