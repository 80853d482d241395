use gpui::{AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};

use gpui_datachart::{Chart, ColorScheme, GpuiChartView, GpuiSurface, GraphType, Point};

fn main() {
    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(720.0), px(480.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |_window, cx| {
            let mut chart = Chart::new(GpuiSurface::new(720.0, 480.0));
            chart.set_title("Damped oscillation");
            chart.set_axis_labels("Time (s)", "Amplitude");
            chart.set_color_scheme(ColorScheme::dark());
            chart.set_graph_type(GraphType::Line);
            chart.replace_data((0..400).map(|i| {
                let t = i as f64 * 0.03;
                Point::new(t, (-t * 0.2).exp() * (t * 2.0).sin())
            }));

            cx.new(|cx| GpuiChartView::new(chart, cx))
        })
        .unwrap();
    });
}
