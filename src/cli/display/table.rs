//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::infrastructure::kubernetes::resources::SynthesizedPod;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use k8s_openapi::api::core::v1::Container;

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render the containers, volumes and placement of a synthesized pod
    pub fn render_pod_plan(&self, pod: &SynthesizedPod) -> String {
        let name = pod.manifest.metadata.name.clone().unwrap_or_default();
        let spec = pod.manifest.spec.clone().unwrap_or_default();

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("KIND").set_alignment(CellAlignment::Center),
                Cell::new("CONTAINER").set_alignment(CellAlignment::Left),
                Cell::new("IMAGE").set_alignment(CellAlignment::Left),
                Cell::new("ARGS").set_alignment(CellAlignment::Left),
            ]);

        let init_containers = spec.init_containers.unwrap_or_default();
        for container in &init_containers {
            table.add_row(self.container_row(container, true));
        }
        for container in &spec.containers {
            table.add_row(self.container_row(container, false));
        }

        let volumes: Vec<String> = spec
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(|v| match v.persistent_volume_claim {
                Some(pvc) => format!("{} ({})", v.name, pvc.claim_name),
                None => v.name,
            })
            .collect();

        let node_count = pod.node_names.len();
        let placement = if node_count == 0 {
            StatusIcon::get_placement_text(node_count).to_string()
        } else {
            format!(
                "{} {}",
                StatusIcon::get_placement_text(node_count),
                pod.node_names.join(", ")
            )
        };

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Pod {}/{} {} ─╮\n",
            pod.namespace,
            name,
            format!("[{} network(s)]", init_containers.len())
                .bright_black()
                .to_string()
        ));
        output.push_str(&table.to_string());
        output.push('\n');

        let placement_icon = StatusIcon::get_placement_icon(node_count);
        let mut summary = Table::new();
        summary
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        summary.add_row(vec![
            Cell::new("Host network"),
            Cell::new(spec.host_network.unwrap_or(false)),
        ]);
        summary.add_row(vec![Cell::new("Volumes"), Cell::new(volumes.join(", "))]);
        summary.add_row(vec![
            Cell::new("Placement"),
            Cell::new(format!("{} {}", placement_icon, placement))
                .fg(self.theme.get_placement_color(node_count)),
        ]);
        output.push_str(&summary.to_string());
        output.push('\n');

        output
    }

    fn container_row(&self, container: &Container, is_init: bool) -> Vec<Cell> {
        let kind = if is_init {
            format!("{} init", StatusIcon::SIDECAR)
        } else {
            format!("{} app", StatusIcon::APP)
        };
        let args = container.args.clone().unwrap_or_default().join(" ");
        let color = self.theme.get_container_color(is_init);

        vec![
            Cell::new(kind).fg(color),
            Cell::new(&container.name),
            Cell::new(container.image.clone().unwrap_or_default()),
            Cell::new(args).fg(self.theme.muted),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{Pod, PodSpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn synthesized(node_names: Vec<String>) -> SynthesizedPod {
        SynthesizedPod {
            namespace: "default".to_string(),
            manifest: Pod {
                metadata: ObjectMeta {
                    name: Some("web".to_string()),
                    ..Default::default()
                },
                spec: Some(PodSpec {
                    init_containers: Some(vec![Container {
                        name: "init-network-client-0".to_string(),
                        image: Some("sdnvortex/network-controller:v0.4.8".to_string()),
                        args: Some(vec!["--bridge=br0".to_string()]),
                        ..Default::default()
                    }]),
                    containers: vec![Container {
                        name: "nginx".to_string(),
                        image: Some("nginx:1.25".to_string()),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
                ..Default::default()
            },
            node_names,
        }
    }

    #[test]
    fn test_render_pinned_pod() {
        let renderer = TableRenderer::new();
        let output =
            renderer.render_pod_plan(&synthesized(vec!["node-b".to_string(), "node-c".to_string()]));

        assert!(output.contains("default/web"));
        assert!(output.contains("init-network-client-0"));
        assert!(output.contains("--bridge=br0"));
        assert!(output.contains("nginx:1.25"));
        assert!(output.contains("node-b, node-c"));
    }

    #[test]
    fn test_render_unconstrained_pod() {
        let renderer = TableRenderer::new();
        let output = renderer.render_pod_plan(&synthesized(vec![]));
        assert!(output.contains("Unconstrained"));
    }
}
