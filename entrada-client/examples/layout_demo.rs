//! Author a small seating plan and save it against a live backend.
//!
//! ```sh
//! BACKEND_URL=http://localhost:8080 cargo run --example layout_demo -- <event_id>
//! ```

use anyhow::{Context, Result};
use entrada_client::{ClientConfig, LayoutStore};
use floorplan::editor::{Editor, EditorResponse, PointerInput, Tool};
use floorplan::geometry::Point;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let event_id: i64 = std::env::args()
        .nth(1)
        .context("usage: layout_demo <event_id>")?
        .parse()?;
    let base_url =
        std::env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:8080".into());

    let store = ClientConfig::new(base_url).build_layout_store();
    let mut model = store.load_model_or_default(event_id).await;

    let tiers = store.client().list_price_tiers(event_id).await?;
    anyhow::ensure!(!tiers.is_empty(), "event {event_id} has no price tiers");
    model.set_price_tiers(tiers.clone());

    // drive the editor the way the authoring surface would
    let mut editor = Editor::new();
    editor.set_active_tier(Some(tiers[0].id));

    editor.set_tool(Tool::Stage);
    press_drag(&mut editor, &mut model, (350.0, 20.0), (650.0, 80.0));

    editor.set_tool(Tool::Area);
    press_drag(&mut editor, &mut model, (50.0, 120.0), (450.0, 520.0));
    editor.commit_area_name(&mut model, "Main Floor");

    editor.set_tool(Tool::Tables);
    editor.set_chair_capacity(6);
    for x in [150.0, 280.0] {
        editor.pointer_down(
            &mut model,
            PointerInput {
                pos: Point::new(x, 300.0),
                ..Default::default()
            },
        );
    }

    editor.set_tool(Tool::ZoneSeats);
    editor.set_zone_seat_count(12);
    press_drag(&mut editor, &mut model, (500.0, 120.0), (950.0, 400.0));

    let report = store
        .save_layout(event_id, &mut model, &|p| {
            println!("[{:>3}%] {}", p.percent, p.message);
        })
        .await?;
    println!(
        "saved: {} tables, {} seats in {:?} (save {})",
        report.tables_created, report.seats_created, report.duration, report.save_id
    );
    Ok(())
}

fn press_drag(
    editor: &mut Editor,
    model: &mut floorplan::model::LayoutModel,
    from: (f64, f64),
    to: (f64, f64),
) -> EditorResponse {
    editor.pointer_down(
        model,
        PointerInput {
            pos: Point::new(from.0, from.1),
            ..Default::default()
        },
    );
    editor.pointer_up(
        model,
        PointerInput {
            pos: Point::new(to.0, to.1),
            ..Default::default()
        },
    )
}
