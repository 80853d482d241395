//! The chart instance: data, configuration and a surface to draw on.
//!
//! Every operation that changes the picture rebuilds the frame and presents
//! it to the surface before returning. Toggling interaction features only
//! affects future input and does not repaint.

use std::fmt;
use std::path::Path;

use crate::config::{
    ConfigPatch, Configuration, ControlFlags, Feature, parse_config_xml, write_config_xml,
};
use crate::datasource::{DataFormat, Dataset, parse_points, write_points};
use crate::error::{ChartError, LoadError};
use crate::export::{ImageFormat, encode_frame};
use crate::geom::{Margins, Point, SurfaceSize};
use crate::hover::{Tooltip, tooltip_at};
use crate::interaction::{ChartEvent, GestureState, viewport_for_event};
use crate::render::{RenderList, Surface, build_frame};
use crate::style::{ColorScheme, GraphType};
use crate::transform::Transform;
use crate::view::{Range, Viewport};

/// Resolves container identifiers to drawing surfaces.
pub trait Host {
    /// Surface type handed out by this host.
    type Surface: Surface;

    /// Create a surface inside the named container, if it exists.
    fn create_surface(&mut self, container_id: &str) -> Option<Self::Surface>;
}

type ErrorHandler = Box<dyn FnMut(&ChartError) + Send + Sync>;

/// A line or scatter chart bound to one surface.
pub struct Chart<S: Surface> {
    surface: S,
    size: SurfaceSize,
    data: Dataset,
    config: Configuration,
    gestures: GestureState,
    tooltip: Option<Tooltip>,
    frame: RenderList,
    error_handlers: Vec<ErrorHandler>,
}

impl<S: Surface> fmt::Debug for Chart<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chart")
            .field("size", &self.size)
            .field("points", &self.data.len())
            .field("config", &self.config)
            .field("tooltip", &self.tooltip)
            .finish_non_exhaustive()
    }
}

impl<S: Surface> Chart<S> {
    /// Create a chart on `surface` with the default configuration and draw it.
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, Configuration::default())
    }

    /// Create a chart with an initial configuration and draw it.
    pub fn with_config(surface: S, config: Configuration) -> Self {
        let size = surface.size();
        let mut chart = Self {
            surface,
            size,
            data: Dataset::new(),
            config,
            gestures: GestureState::default(),
            tooltip: None,
            frame: RenderList::new(),
            error_handlers: Vec::new(),
        };
        chart.redraw();
        chart
    }

    /// Mount a chart in the host container named `container_id`.
    pub fn mount<H>(host: &mut H, container_id: &str) -> Result<Self, ChartError>
    where
        H: Host<Surface = S>,
    {
        let surface = host
            .create_surface(container_id)
            .ok_or_else(|| ChartError::MissingContainer(container_id.to_string()))?;
        log::debug!("mounting chart in `{container_id}`");
        Ok(Self::new(surface))
    }

    /// Set both axis titles.
    pub fn set_axis_labels(&mut self, x_title: impl Into<String>, y_title: impl Into<String>) {
        self.config.graph_style.x_axis.title = x_title.into();
        self.config.graph_style.y_axis.title = y_title.into();
        self.redraw();
    }

    /// Set the visible range of both axes.
    ///
    /// Reversed bounds are swapped and a zero-width axis is padded around its
    /// value. Non-finite bounds leave the range as is.
    pub fn set_axis_range(&mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
        if ![x_min, x_max, y_min, y_max].iter().all(|value| value.is_finite()) {
            log::warn!("ignoring non-finite axis range {x_min}..{x_max}, {y_min}..{y_max}");
            return;
        }
        if x_min > x_max || y_min > y_max {
            log::warn!("swapping reversed axis range {x_min}..{x_max}, {y_min}..{y_max}");
        }
        self.set_viewport(Viewport::new(
            Range::new(x_min, x_max),
            Range::new(y_min, y_max),
        ));
        self.redraw();
    }

    /// Show or hide the legend.
    pub fn show_legend(&mut self, visible: bool) {
        self.config.graph_style.legend_visible = visible;
        self.redraw();
    }

    /// Set the chart title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.config.graph_style.title = title.into();
        self.redraw();
    }

    /// Replace the color scheme.
    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.config.color_scheme = scheme;
        self.redraw();
    }

    /// Switch between line and scatter drawing.
    pub fn set_graph_type(&mut self, graph_type: GraphType) {
        self.config.graph_style.graph_type = graph_type;
        self.redraw();
    }

    /// Set the series name shown in the legend.
    pub fn set_series_name(&mut self, name: impl Into<String>) {
        self.config.graph_style.series_name = name.into();
        self.redraw();
    }

    /// Set the plot area margins.
    pub fn set_margins(&mut self, margins: Margins) {
        self.config.margins = margins;
        self.redraw();
    }

    /// Allow or forbid zooming.
    pub fn enable_zoom(&mut self, enabled: bool) {
        self.config.controls.zoom = enabled;
    }

    /// Allow or forbid panning.
    pub fn enable_pan(&mut self, enabled: bool) {
        self.config.controls.pan = enabled;
        if !enabled {
            self.gestures.pan_anchor = None;
        }
    }

    /// Allow or forbid the tooltip.
    pub fn enable_tooltip(&mut self, enabled: bool) {
        self.config.controls.tooltip = enabled;
    }

    /// Replace every interaction toggle and lock.
    pub fn set_controls(&mut self, controls: ControlFlags) {
        self.config.controls = controls;
    }

    /// Replace the data and fit both axes to it.
    ///
    /// With no finite points the current ranges are kept.
    pub fn replace_data(&mut self, points: impl IntoIterator<Item = Point>) {
        self.data.replace(points);
        self.tooltip = None;
        match self.data.bounds() {
            Some(bounds) => self.set_viewport(bounds.auto_fit()),
            None => log::debug!("no finite points, keeping axis ranges"),
        }
        log::debug!("loaded {} points", self.data.len());
        self.redraw();
    }

    /// Apply a partial configuration.
    pub fn replace_config(&mut self, patch: &ConfigPatch) {
        self.config.apply(patch);
        if patch.touches_range() {
            let viewport = self.viewport();
            self.set_viewport(viewport);
        }
        self.redraw();
    }

    /// Parse `text` in `format` and replace the data with it.
    ///
    /// On failure the chart keeps its previous data.
    pub fn load_data(&mut self, format: DataFormat, text: &str) -> Result<(), ChartError> {
        match parse_points(format, text) {
            Ok(points) => {
                self.replace_data(points);
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Load data from a file, picking the format from its extension.
    pub fn load_data_file(&mut self, path: impl AsRef<Path>) -> Result<(), ChartError> {
        let path = path.as_ref();
        let loaded = DataFormat::from_path(path)
            .and_then(|format| Ok((format, read_file(path)?)))
            .and_then(|(format, text)| parse_points(format, &text));
        match loaded {
            Ok(points) => {
                log::debug!("read data from {}", path.display());
                self.replace_data(points);
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Apply a configuration XML document.
    pub fn load_config_xml(&mut self, text: &str) -> Result<(), ChartError> {
        match parse_config_xml(text) {
            Ok(patch) => {
                self.replace_config(&patch);
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Replace the whole configuration from JSON.
    ///
    /// Missing fields take their default values.
    pub fn load_config_json(&mut self, text: &str) -> Result<(), ChartError> {
        match serde_json::from_str::<Configuration>(text) {
            Ok(config) => {
                self.config = config;
                let viewport = self.viewport();
                self.set_viewport(viewport);
                self.redraw();
                Ok(())
            }
            Err(err) => Err(self.report(err.into())),
        }
    }

    /// Load a configuration file; `.json` files replace the configuration,
    /// anything else is read as XML.
    pub fn load_config_file(&mut self, path: impl AsRef<Path>) -> Result<(), ChartError> {
        let path = path.as_ref();
        let text = match read_file(path) {
            Ok(text) => text,
            Err(err) => return Err(self.report(err)),
        };
        log::debug!("read configuration from {}", path.display());
        let is_json = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        if is_json {
            self.load_config_json(&text)
        } else {
            self.load_config_xml(&text)
        }
    }

    /// Current configuration, including the live axis ranges.
    pub fn current_config(&self) -> &Configuration {
        &self.config
    }

    /// Current data in load order.
    pub fn current_data(&self) -> &[Point] {
        self.data.points()
    }

    /// Current visible ranges.
    pub fn viewport(&self) -> Viewport {
        let style = &self.config.graph_style;
        Viewport::new(style.x_axis.range(), style.y_axis.range())
    }

    /// Serialize the data.
    pub fn export_data(&self, format: DataFormat) -> Result<String, ChartError> {
        Ok(write_points(format, self.data.points())?)
    }

    /// Serialize the configuration as pretty JSON.
    pub fn export_config_json(&self) -> Result<String, ChartError> {
        serde_json::to_string_pretty(&self.config).map_err(|err| LoadError::from(err).into())
    }

    /// Serialize the configuration as XML.
    pub fn export_config_xml(&self) -> String {
        write_config_xml(&self.config)
    }

    /// Encode the current frame as an image the size of the surface.
    pub fn export_image(&self, format: ImageFormat) -> Result<Vec<u8>, ChartError> {
        let bytes = encode_frame(&self.frame, self.size, format)?;
        log::debug!("exported {} image ({} bytes)", format.extension(), bytes.len());
        Ok(bytes)
    }

    /// Feed one input event to the chart.
    ///
    /// Returns true when the chart repainted.
    pub fn handle_event(&mut self, event: ChartEvent) -> bool {
        let Some(transform) = self.transform() else {
            self.gestures.reset();
            return false;
        };

        let mut repaint = false;
        if let Some(viewport) = viewport_for_event(
            &mut self.gestures,
            &self.config.controls,
            &transform,
            &event,
        ) {
            log::debug!(
                "viewport now x {}..{}, y {}..{}",
                viewport.x.min,
                viewport.x.max,
                viewport.y.min,
                viewport.y.max
            );
            self.set_viewport(viewport);
            repaint = true;
        }

        match &event {
            ChartEvent::MouseMove(pointer) => {
                if self.config.controls.allows(Feature::Tooltip, event.device()) {
                    self.tooltip = self
                        .transform()
                        .and_then(|transform| {
                            tooltip_at(self.data.points(), &transform, pointer.position)
                        });
                    repaint = true;
                } else if self.tooltip.take().is_some() {
                    repaint = true;
                }
            }
            ChartEvent::MouseLeave => {
                if self.tooltip.take().is_some() {
                    repaint = true;
                }
            }
            _ => {}
        }

        if repaint {
            self.redraw();
        }
        repaint
    }

    /// Re-read the surface size and repaint.
    pub fn resize(&mut self) {
        let size = self.surface.size();
        if size != self.size {
            log::debug!("surface resized to {}x{}", size.width, size.height);
            self.size = size;
        }
        self.redraw();
    }

    /// Subscribe to load failures.
    pub fn on_error(&mut self, handler: impl FnMut(&ChartError) + Send + Sync + 'static) {
        self.error_handlers.push(Box::new(handler));
    }

    /// The tooltip currently shown, if any.
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// The most recently presented frame.
    pub fn frame(&self) -> &RenderList {
        &self.frame
    }

    /// Access the surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface; call [`Chart::resize`] after changing
    /// its size.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn transform(&self) -> Option<Transform> {
        Transform::new(self.viewport(), self.size, self.config.margins)
    }

    /// Store a new viewport, padding collapsed axes, and move the tooltip to
    /// whatever now lies under its pointer.
    fn set_viewport(&mut self, viewport: Viewport) {
        let x = Range::new(viewport.x.min, viewport.x.max);
        let y = Range::new(viewport.y.min, viewport.y.max);
        let (x_fixed, y_fixed) = (x.normalized(), y.normalized());
        if x_fixed != x || y_fixed != y {
            log::warn!(
                "widening collapsed axis range {}..{}, {}..{}",
                x.min,
                x.max,
                y.min,
                y.max
            );
        }
        let style = &mut self.config.graph_style;
        style.x_axis.set_range(x_fixed);
        style.y_axis.set_range(y_fixed);

        if let Some(previous) = self.tooltip.take() {
            self.tooltip = self
                .transform()
                .and_then(|transform| tooltip_at(self.data.points(), &transform, previous.pointer));
        }
    }

    fn redraw(&mut self) {
        let overlay = self.tooltip.as_ref().map(Tooltip::overlay);
        self.frame = build_frame(
            self.data.points(),
            &self.config,
            self.size,
            &self.surface,
            overlay.as_ref(),
        );
        self.surface.present(&self.frame);
        log::debug!("repainted chart ({} commands)", self.frame.commands().len());
    }

    fn report(&mut self, err: LoadError) -> ChartError {
        let err = ChartError::from(err);
        log::warn!("chart load failed: {err}");
        for handler in &mut self.error_handlers {
            handler(&err);
        }
        err
    }
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
