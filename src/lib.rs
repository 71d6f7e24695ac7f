#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use error::HierarchyError;
pub use hierarchy::{Chart, Hierarchy, build_hierarchy};
pub use ir::{Graph, Notation};
pub use layout::{Layout, Point, PositionMap, compute_layout, layout_tree, place_lateral_nodes};
pub use parser::{parse_records, serialize_graph};
pub use render::{DrawCommand, DrawCommands, render, render_svg, render_text};
pub use theme::Theme;

/// Options for [`render_with_options`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub notation: Notation,
    pub config: Config,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self::default()
    }

    pub fn monochrome() -> Self {
        let mut options = Self::default();
        options.config.theme = Theme::monochrome();
        options.config.render.background = options.config.theme.background.clone();
        options
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.config.render.width = width;
        self.config.render.height = height;
        self
    }
}

/// Renders chart notation straight to an SVG document.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let output = render_text(input, options.notation, &options.config)?;
    Ok(render_svg(&output.commands, &options.config.theme))
}
