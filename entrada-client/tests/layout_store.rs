//! Persistence protocol tests against an in-process mock backend

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use chrono::Utc;
use rust_decimal::Decimal;

use entrada_client::{ClientConfig, ClientError, LayoutStore, SaveProgress, SaveStep};
use floorplan::generators;
use floorplan::geometry::{Point, Rect};
use floorplan::model::{ElementId, LayoutModel};
use shared::models::{
    Area, AreaCreate, AreaUpdate, EnclosingShape, Event, EventLayoutUpdate, OccupiedSet,
    PriceTier, Seat, SeatCreate, VenueTable, VenueTableCreate,
};
use shared::response::ApiResponse;

struct MockDb {
    event: Mutex<Event>,
    areas: Mutex<Vec<Area>>,
    tables: Mutex<Vec<VenueTable>>,
    seats: Mutex<Vec<Seat>>,
    tiers: Vec<PriceTier>,
    occupied: Mutex<OccupiedSet>,
    next_id: AtomicI64,
    /// Simulate another actor deleting rows first: every DELETE removes
    /// the row but still answers 404
    delete_returns_404: AtomicBool,
    /// Make `PUT /api/events/{id}` fail with a 500
    fail_event_update: AtomicBool,
}

impl MockDb {
    fn new() -> Arc<Self> {
        let tier = |id: i64, cents: i64| PriceTier {
            id,
            event_id: 1,
            name: format!("Tier {id}"),
            price: Decimal::new(cents, 2),
            color: None,
        };
        Arc::new(Self {
            event: Mutex::new(Event {
                id: 1,
                name: "Test Gala".into(),
                starts_at: Utc::now(),
                is_special: true,
                shape: EnclosingShape::Rectangle,
                stage: None,
                sheet_width: 1000.0,
                sheet_height: 600.0,
                layout_locked: false,
            }),
            areas: Mutex::new(Vec::new()),
            tables: Mutex::new(Vec::new()),
            seats: Mutex::new(Vec::new()),
            tiers: vec![tier(1, 1500), tier(2, 3000)],
            occupied: Mutex::new(OccupiedSet::default()),
            next_id: AtomicI64::new(1000),
            delete_returns_404: AtomicBool::new(false),
            fail_event_update: AtomicBool::new(false),
        })
    }

    fn id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

type Db = Arc<MockDb>;

async fn get_event(State(db): State<Db>, Path(_id): Path<i64>) -> Json<ApiResponse<Event>> {
    Json(ApiResponse::ok(db.event.lock().unwrap().clone()))
}

async fn put_event(
    State(db): State<Db>,
    Path(_id): Path<i64>,
    Json(update): Json<EventLayoutUpdate>,
) -> Result<Json<ApiResponse<Event>>, (StatusCode, String)> {
    if db.fail_event_update.load(Ordering::SeqCst) {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "event update failed".into()));
    }
    let mut event = db.event.lock().unwrap();
    if let Some(shape) = update.shape {
        event.shape = shape;
    }
    if update.stage.is_some() {
        event.stage = update.stage;
    }
    if let Some(w) = update.sheet_width {
        event.sheet_width = w;
    }
    if let Some(h) = update.sheet_height {
        event.sheet_height = h;
    }
    if let Some(locked) = update.layout_locked {
        event.layout_locked = locked;
    }
    Ok(Json(ApiResponse::ok(event.clone())))
}

async fn list_areas(
    State(db): State<Db>,
    Query(_q): Query<HashMap<String, String>>,
) -> Json<ApiResponse<Vec<Area>>> {
    Json(ApiResponse::ok(db.areas.lock().unwrap().clone()))
}

async fn create_area(
    State(db): State<Db>,
    Json(payload): Json<AreaCreate>,
) -> Json<ApiResponse<Area>> {
    let area = Area {
        id: db.id(),
        event_id: payload.event_id,
        name: payload.name,
        x: payload.x,
        y: payload.y,
        width: payload.width,
        height: payload.height,
        color: payload.color,
    };
    db.areas.lock().unwrap().push(area.clone());
    Json(ApiResponse::ok(area))
}

async fn update_area(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(payload): Json<AreaUpdate>,
) -> Result<Json<ApiResponse<Area>>, (StatusCode, String)> {
    let mut areas = db.areas.lock().unwrap();
    let Some(area) = areas.iter_mut().find(|a| a.id == id) else {
        return Err((StatusCode::NOT_FOUND, format!("area {id}")));
    };
    if let Some(name) = payload.name {
        area.name = name;
    }
    if let Some(x) = payload.x {
        area.x = x;
    }
    if let Some(y) = payload.y {
        area.y = y;
    }
    if let Some(w) = payload.width {
        area.width = w;
    }
    if let Some(h) = payload.height {
        area.height = h;
    }
    if let Some(color) = payload.color {
        area.color = color;
    }
    Ok(Json(ApiResponse::ok(area.clone())))
}

async fn delete_area(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, String)> {
    let mut areas = db.areas.lock().unwrap();
    let before = areas.len();
    areas.retain(|a| a.id != id);
    if before == areas.len() || db.delete_returns_404.load(Ordering::SeqCst) {
        return Err((StatusCode::NOT_FOUND, format!("area {id}")));
    }
    Ok(Json(ApiResponse::ok(())))
}

async fn list_tables(
    State(db): State<Db>,
    Query(_q): Query<HashMap<String, String>>,
) -> Json<ApiResponse<Vec<VenueTable>>> {
    Json(ApiResponse::ok(db.tables.lock().unwrap().clone()))
}

async fn create_table(
    State(db): State<Db>,
    Json(payload): Json<VenueTableCreate>,
) -> Json<ApiResponse<VenueTable>> {
    let table = VenueTable {
        id: db.id(),
        event_id: payload.event_id,
        number: payload.number,
        x: payload.x,
        y: payload.y,
        width: payload.width,
        height: payload.height,
        chair_capacity: payload.chair_capacity,
        price_tier_id: payload.price_tier_id,
        area_id: payload.area_id,
    };
    db.tables.lock().unwrap().push(table.clone());
    Json(ApiResponse::ok(table))
}

async fn delete_table(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, String)> {
    let mut tables = db.tables.lock().unwrap();
    let before = tables.len();
    tables.retain(|t| t.id != id);
    if before == tables.len() || db.delete_returns_404.load(Ordering::SeqCst) {
        return Err((StatusCode::NOT_FOUND, format!("table {id}")));
    }
    Ok(Json(ApiResponse::ok(())))
}

async fn list_seats(
    State(db): State<Db>,
    Query(_q): Query<HashMap<String, String>>,
) -> Json<ApiResponse<Vec<Seat>>> {
    Json(ApiResponse::ok(db.seats.lock().unwrap().clone()))
}

async fn create_seat(
    State(db): State<Db>,
    Json(payload): Json<SeatCreate>,
) -> Json<ApiResponse<Seat>> {
    let seat = Seat {
        id: db.id(),
        event_id: payload.event_id,
        label: payload.label,
        x: payload.x,
        y: payload.y,
        price_tier_id: payload.price_tier_id,
        table_id: payload.table_id,
        area_id: payload.area_id,
    };
    db.seats.lock().unwrap().push(seat.clone());
    Json(ApiResponse::ok(seat))
}

async fn delete_seat(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, String)> {
    let mut seats = db.seats.lock().unwrap();
    let before = seats.len();
    seats.retain(|s| s.id != id);
    if before == seats.len() || db.delete_returns_404.load(Ordering::SeqCst) {
        return Err((StatusCode::NOT_FOUND, format!("seat {id}")));
    }
    Ok(Json(ApiResponse::ok(())))
}

async fn get_occupied(State(db): State<Db>, Path(_id): Path<i64>) -> Json<ApiResponse<OccupiedSet>> {
    Json(ApiResponse::ok(db.occupied.lock().unwrap().clone()))
}

async fn list_tiers(
    State(db): State<Db>,
    Query(_q): Query<HashMap<String, String>>,
) -> Json<ApiResponse<Vec<PriceTier>>> {
    Json(ApiResponse::ok(db.tiers.clone()))
}

async fn spawn_backend(db: Db) -> String {
    let app = Router::new()
        .route("/api/events/{id}", get(get_event).put(put_event))
        .route("/api/areas", get(list_areas).post(create_area))
        .route("/api/areas/{id}", put(update_area).delete(delete_area))
        .route("/api/tables", get(list_tables).post(create_table))
        .route("/api/tables/{id}", delete(delete_table))
        .route("/api/seats", get(list_seats).post(create_seat))
        .route("/api/seats/{id}", delete(delete_seat))
        .route("/api/purchases/occupied/{id}", get(get_occupied))
        .route("/api/price-tiers", get(list_tiers))
        .with_state(db);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Authoring session: one area, two chaired tables, three loose seats
fn build_model(tiers: &[PriceTier]) -> LayoutModel {
    let mut model = LayoutModel::new();
    model.set_price_tiers(tiers.to_vec());
    model.set_stage(Rect::new(350.0, 20.0, 300.0, 60.0));
    model.add_area(Rect::new(0.0, 100.0, 400.0, 400.0), "Floor");

    generators::place_table(&mut model, Point::new(100.0, 200.0), 4, 1).unwrap();
    generators::place_table(&mut model, Point::new(250.0, 200.0), 2, 2).unwrap();

    // inside the area
    model.add_seat(Point::new(50.0, 450.0), "x", 1, None).unwrap();
    model.add_seat(Point::new(90.0, 450.0), "x", 1, None).unwrap();
    // outside every area
    model.add_seat(Point::new(700.0, 450.0), "x", 2, None).unwrap();
    model
}

fn progress_sink() -> (Arc<Mutex<Vec<SaveProgress>>>, impl Fn(SaveProgress) + Send + Sync) {
    let events: Arc<Mutex<Vec<SaveProgress>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let events = events.clone();
        move |p: SaveProgress| events.lock().unwrap().push(p)
    };
    (events, sink)
}

#[tokio::test]
async fn full_save_replaces_and_reloads() {
    let db = MockDb::new();
    let url = spawn_backend(db.clone()).await;
    let store = ClientConfig::new(url).build_layout_store();

    let mut model = build_model(&db.tiers);
    let (events, sink) = progress_sink();
    let report = store.save_layout(1, &mut model, &sink).await.unwrap();

    assert_eq!(report.tables_created, 2);
    assert_eq!(report.seats_created, 9); // 4 + 2 chairs + 3 individual
    assert_eq!(report.areas_created, 1);

    // backend got everything and the event is locked
    assert!(db.event.lock().unwrap().layout_locked);
    assert!(db.event.lock().unwrap().stage.is_some());
    assert_eq!(db.tables.lock().unwrap().len(), 2);
    assert_eq!(db.seats.lock().unwrap().len(), 9);

    // chairs reference the authoritative table IDs
    let tables = db.tables.lock().unwrap().clone();
    let seats = db.seats.lock().unwrap().clone();
    for table in &tables {
        let chairs: Vec<_> = seats.iter().filter(|s| s.table_id == Some(table.id)).collect();
        assert_eq!(chairs.len(), table.chair_capacity as usize);
    }

    // individual seats renumbered A1..A3, chairs untouched
    let mut loose: Vec<_> = seats
        .iter()
        .filter(|s| s.table_id.is_none())
        .map(|s| s.label.clone())
        .collect();
    loose.sort();
    assert_eq!(loose, vec!["A1", "A2", "A3"]);

    // area membership inferred by containment: tables sit inside "Floor",
    // the far seat does not
    let area_id = db.areas.lock().unwrap()[0].id;
    assert!(tables.iter().all(|t| t.area_id == Some(area_id)));
    let far = seats.iter().find(|s| s.x == 700.0).unwrap();
    assert_eq!(far.area_id, None);
    let near = seats.iter().find(|s| s.x == 50.0).unwrap();
    assert_eq!(near.area_id, Some(area_id));

    // the reloaded model carries persisted IDs only
    assert!(model.locked());
    assert!(model
        .tables()
        .iter()
        .all(|t| matches!(t.id, ElementId::Persisted(_))));
    assert!(model
        .seats()
        .iter()
        .all(|s| matches!(s.id, ElementId::Persisted(_))));

    // progress ran forward to completion
    let events = events.lock().unwrap();
    assert_eq!(events.first().unwrap().step, SaveStep::Renumber);
    assert_eq!(events.last().unwrap().step, SaveStep::Done);
    assert_eq!(events.last().unwrap().percent, 100);
    assert!(events.windows(2).all(|w| w[0].percent <= w[1].percent));
}

#[tokio::test]
async fn second_save_is_a_stable_full_replace() {
    let db = MockDb::new();
    let url = spawn_backend(db.clone()).await;
    let store = ClientConfig::new(url).build_layout_store();

    let mut model = build_model(&db.tiers);
    let (_, sink) = progress_sink();
    store.save_layout(1, &mut model, &sink).await.unwrap();

    let first_ids: Vec<i64> = db.tables.lock().unwrap().iter().map(|t| t.id).collect();
    let first_labels: Vec<String> = {
        let seats = db.seats.lock().unwrap();
        let mut l: Vec<String> = seats
            .iter()
            .filter(|s| s.table_id.is_none())
            .map(|s| s.label.clone())
            .collect();
        l.sort();
        l
    };

    // no edits in between: same shape of data, fresh backend rows
    store.save_layout(1, &mut model, &sink).await.unwrap();

    let tables = db.tables.lock().unwrap();
    let seats = db.seats.lock().unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(seats.len(), 9);
    assert!(tables.iter().all(|t| !first_ids.contains(&t.id)));

    let mut labels: Vec<String> = seats
        .iter()
        .filter(|s| s.table_id.is_none())
        .map(|s| s.label.clone())
        .collect();
    labels.sort();
    assert_eq!(labels, first_labels);
    // chair labels still count per table
    for table in tables.iter() {
        let mut chair_labels: Vec<i32> = seats
            .iter()
            .filter(|s| s.table_id == Some(table.id))
            .map(|s| s.label.parse().unwrap())
            .collect();
        chair_labels.sort_unstable();
        assert_eq!(chair_labels, (1..=table.chair_capacity).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn unlock_clears_flag_and_keeps_rows() {
    let db = MockDb::new();
    let url = spawn_backend(db.clone()).await;
    let store = ClientConfig::new(url).build_layout_store();

    let mut model = build_model(&db.tiers);
    let (_, sink) = progress_sink();
    store.save_layout(1, &mut model, &sink).await.unwrap();
    assert!(db.event.lock().unwrap().layout_locked);

    store.unlock_layout(1).await.unwrap();
    assert!(!db.event.lock().unwrap().layout_locked);
    assert_eq!(db.tables.lock().unwrap().len(), 2);
    assert_eq!(db.seats.lock().unwrap().len(), 9);
}

#[tokio::test]
async fn purge_swallows_concurrent_deletes() {
    let db = MockDb::new();
    let url = spawn_backend(db.clone()).await;
    let store = ClientConfig::new(url).build_layout_store();

    let mut model = build_model(&db.tiers);
    let (_, sink) = progress_sink();
    store.save_layout(1, &mut model, &sink).await.unwrap();

    // every purge delete now answers 404, as if another actor got there
    // first; the save must still complete
    db.delete_returns_404.store(true, Ordering::SeqCst);
    let report = store.save_layout(1, &mut model, &sink).await.unwrap();
    assert_eq!(report.tables_created, 2);
    assert_eq!(db.tables.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn failed_event_update_aborts_before_purge() {
    let db = MockDb::new();
    let url = spawn_backend(db.clone()).await;
    let store = ClientConfig::new(url).build_layout_store();

    let mut model = build_model(&db.tiers);
    let (_, sink) = progress_sink();
    store.save_layout(1, &mut model, &sink).await.unwrap();

    db.fail_event_update.store(true, Ordering::SeqCst);
    let (events, failing_sink) = progress_sink();
    let err = store
        .save_layout(1, &mut model, &failing_sink)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Internal(_)));

    // abort happened before the purge: previous rows survive
    assert_eq!(db.tables.lock().unwrap().len(), 2);
    assert_eq!(db.seats.lock().unwrap().len(), 9);
    // the progress feed shows where it stopped
    assert_eq!(events.lock().unwrap().last().unwrap().step, SaveStep::UpdateEvent);
}

#[tokio::test]
async fn overlapping_save_is_rejected() {
    let db = MockDb::new();
    let url = spawn_backend(db.clone()).await;
    let store = Arc::new(ClientConfig::new(url).build_layout_store());

    let mut first = build_model(&db.tiers);
    let mut second = build_model(&db.tiers);
    let (_, sink_a) = progress_sink();
    let (_, sink_b) = progress_sink();

    let (a, b) = tokio::join!(
        store.save_layout(1, &mut first, &sink_a),
        store.save_layout(1, &mut second, &sink_b),
    );

    let errors = [a.is_err(), b.is_err()];
    assert_eq!(errors.iter().filter(|e| **e).count(), 1, "exactly one save must lose");
    let loser = [a, b].into_iter().find(Result::is_err).unwrap();
    assert!(matches!(loser.unwrap_err(), ClientError::SaveInProgress));
}

#[tokio::test]
async fn load_model_or_default_falls_back_to_empty() {
    // nothing is listening here
    let store = ClientConfig::new("http://127.0.0.1:9")
        .with_timeout(1)
        .build_layout_store();
    let model = store.load_model_or_default(1).await;
    assert!(model.tables().is_empty());
    assert!(model.seats().is_empty());
    assert!(!model.locked());
}

#[tokio::test]
async fn occupied_set_round_trip() {
    let db = MockDb::new();
    db.occupied.lock().unwrap().table_ids = vec![5];
    db.occupied.lock().unwrap().seat_ids = vec![7, 8];
    let url = spawn_backend(db.clone()).await;
    let store = ClientConfig::new(url).build_layout_store();

    let occupied = store.load_occupied(1).await.unwrap();
    assert!(occupied.contains_table(5));
    assert!(occupied.contains_seat(8));
    assert!(!occupied.contains_seat(9));
}
