use gpui_datachart::{
    Chart, ChartEvent, ColorScheme, DataFormat, GraphType, HeadlessSurface, Host, ImageFormat,
    PointerEvent, ScreenPoint, WheelEvent,
};

/// A host with exactly one container.
struct Page;

impl Host for Page {
    type Surface = HeadlessSurface;

    fn create_surface(&mut self, container_id: &str) -> Option<HeadlessSurface> {
        (container_id == "chart").then(|| HeadlessSurface::new(800.0, 600.0))
    }
}

const SALES: &str = "month,revenue
1,12.5
2,18
3,9.25
4,22
5,-3.5
6,15
";

fn main() -> Result<(), gpui_datachart::ChartError> {
    let mut page = Page;
    if let Err(err) = Chart::mount(&mut page, "missing") {
        println!("mount failed as expected: {err}");
    }

    let mut chart = Chart::mount(&mut page, "chart")?;
    chart.on_error(|err| eprintln!("chart error: {err}"));
    chart.load_data(DataFormat::Csv, SALES)?;
    chart.set_title("Monthly revenue");
    chart.set_axis_labels("Month", "Revenue (k)");
    chart.set_color_scheme(ColorScheme::dark());

    let viewport = chart.viewport();
    println!(
        "auto-fit: x {}..{}, y {}..{}",
        viewport.x.min, viewport.x.max, viewport.y.min, viewport.y.max
    );

    chart.handle_event(ChartEvent::Wheel(WheelEvent {
        position: ScreenPoint::new(420.0, 300.0),
        delta_y: -1.0,
    }));
    chart.handle_event(ChartEvent::MouseMove(PointerEvent {
        position: ScreenPoint::new(300.0, 250.0),
    }));
    if let Some(tooltip) = chart.tooltip() {
        println!("tooltip: {}", tooltip.text);
    }

    chart.set_graph_type(GraphType::Scatter);
    println!(
        "{} frames presented, last frame has {} commands",
        chart.surface().presented(),
        chart.frame().commands().len()
    );

    println!("{}", chart.export_config_xml());
    println!("{}", chart.export_data(DataFormat::Json)?);

    let path = std::env::temp_dir().join(format!("revenue.{}", ImageFormat::Png.extension()));
    match std::fs::write(&path, chart.export_image(ImageFormat::Png)?) {
        Ok(()) => println!("wrote {}", path.display()),
        Err(err) => eprintln!("could not write {}: {err}", path.display()),
    }
    Ok(())
}
