use dawg_viz_protocol::Viewport;

use crate::config::ViewerConfig;
use crate::hierarchy;
use crate::model::{DawgNode, DawgStats};
use crate::parsers::{self, ParseError};
use crate::views::{self, Scene};

/// DAWG → tree → layout → scene, sized for `viewport`.
pub fn build_scene(dawg: &DawgNode, viewport: &Viewport, config: &ViewerConfig) -> Scene {
    let tree = hierarchy::convert(dawg);
    let layout = config.layout.tree_layout(viewport).layout(&tree);
    let scene = views::render_dawg_tree(layout, &config.scene);
    tracing::info!(
        tree_nodes = scene.layout().len(),
        markers = scene.marker_count(),
        edges = scene.edge_count(),
        "DAWG scene ready"
    );
    scene
}

/// Parse raw input and build its scene in one step.
pub fn load_scene(
    data: &[u8],
    viewport: &Viewport,
    config: &ViewerConfig,
) -> Result<(Scene, DawgStats), ParseError> {
    let dawg = parsers::parse_auto(data)?;
    let stats = dawg.stats();
    tracing::info!(
        distinct = stats.distinct_nodes,
        unrolled = stats.unrolled_nodes,
        words = stats.words,
        "DAWG loaded"
    );
    Ok((build_scene(&dawg, viewport, config), stats))
}
